use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element kinds known to the cataloguing vocabulary.
///
/// Anything outside this set is carried as an opaque node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    MsDesc,
    MsIdentifier,
    Settlement,
    Repository,
    Idno,
    AltIdentifier,
    Head,
    Title,
    Note,
    P,
    MsContents,
    Summary,
    MsItem,
    Locus,
    Author,
    TextLang,
    PhysDesc,
    ObjectDesc,
    HandDesc,
    HandNote,
    DecoDesc,
    DecoNote,
    MusicNotation,
    BindingDesc,
    Binding,
    History,
    Origin,
    Provenance,
    Additional,
    ListBibl,
    Bibl,
    MsPart,
    MsFrag,
}

impl Kind {
    pub const ALL: &'static [Kind] = &[
        Kind::MsDesc,
        Kind::MsIdentifier,
        Kind::Settlement,
        Kind::Repository,
        Kind::Idno,
        Kind::AltIdentifier,
        Kind::Head,
        Kind::Title,
        Kind::Note,
        Kind::P,
        Kind::MsContents,
        Kind::Summary,
        Kind::MsItem,
        Kind::Locus,
        Kind::Author,
        Kind::TextLang,
        Kind::PhysDesc,
        Kind::ObjectDesc,
        Kind::HandDesc,
        Kind::HandNote,
        Kind::DecoDesc,
        Kind::DecoNote,
        Kind::MusicNotation,
        Kind::BindingDesc,
        Kind::Binding,
        Kind::History,
        Kind::Origin,
        Kind::Provenance,
        Kind::Additional,
        Kind::ListBibl,
        Kind::Bibl,
        Kind::MsPart,
        Kind::MsFrag,
    ];

    /// Tag name as it appears in the serialized vocabulary
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::MsDesc => "msDesc",
            Kind::MsIdentifier => "msIdentifier",
            Kind::Settlement => "settlement",
            Kind::Repository => "repository",
            Kind::Idno => "idno",
            Kind::AltIdentifier => "altIdentifier",
            Kind::Head => "head",
            Kind::Title => "title",
            Kind::Note => "note",
            Kind::P => "p",
            Kind::MsContents => "msContents",
            Kind::Summary => "summary",
            Kind::MsItem => "msItem",
            Kind::Locus => "locus",
            Kind::Author => "author",
            Kind::TextLang => "textLang",
            Kind::PhysDesc => "physDesc",
            Kind::ObjectDesc => "objectDesc",
            Kind::HandDesc => "handDesc",
            Kind::HandNote => "handNote",
            Kind::DecoDesc => "decoDesc",
            Kind::DecoNote => "decoNote",
            Kind::MusicNotation => "musicNotation",
            Kind::BindingDesc => "bindingDesc",
            Kind::Binding => "binding",
            Kind::History => "history",
            Kind::Origin => "origin",
            Kind::Provenance => "provenance",
            Kind::Additional => "additional",
            Kind::ListBibl => "listBibl",
            Kind::Bibl => "bibl",
            Kind::MsPart => "msPart",
            Kind::MsFrag => "msFrag",
        }
    }

    /// Look up a kind by tag name. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }

    /// Structural area a kind belongs to when no template overrides it
    pub fn default_region(&self) -> Region {
        match self {
            Kind::MsIdentifier
            | Kind::Settlement
            | Kind::Repository
            | Kind::Idno
            | Kind::AltIdentifier => Region::Identification,
            Kind::Head | Kind::Title => Region::Heading,
            Kind::MsContents
            | Kind::Summary
            | Kind::MsItem
            | Kind::Locus
            | Kind::Author
            | Kind::TextLang => Region::Content,
            Kind::PhysDesc
            | Kind::ObjectDesc
            | Kind::HandDesc
            | Kind::HandNote
            | Kind::DecoDesc
            | Kind::DecoNote
            | Kind::MusicNotation
            | Kind::BindingDesc
            | Kind::Binding => Region::Physical,
            Kind::History | Kind::Origin | Kind::Provenance => Region::History,
            Kind::Additional | Kind::ListBibl | Kind::Bibl => Region::Literature,
            Kind::MsDesc | Kind::MsPart | Kind::MsFrag => Region::Structure,
            Kind::Note | Kind::P => Region::Text,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::from_tag(s).ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Tag that is not part of the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// Classification used to pick the attribute sub-table for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    Identification,
    Heading,
    Content,
    Physical,
    History,
    Literature,
    Structure,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_tag() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_tag(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(Kind::from_tag("facsimile"), None);
        assert!("facsimile".parse::<Kind>().is_err());
    }

    #[test]
    fn test_serde_uses_tag_names() {
        let json = serde_json::to_string(&Kind::MsIdentifier).unwrap();
        assert_eq!(json, "\"msIdentifier\"");
        let kind: Kind = serde_json::from_str("\"altIdentifier\"").unwrap();
        assert_eq!(kind, Kind::AltIdentifier);
    }
}
