//! Built-in profiles

mod description;
mod retro;
mod sections;

pub use description::description;
pub use retro::retro_description;

use crate::registry::ProfileSchema;
use crate::template::Template;
use msdesc_tree::{Kind, Region};

/// Region attribute tables shared by every built-in profile
pub(crate) fn with_common_attributes(schema: ProfileSchema) -> ProfileSchema {
    schema
        .with_attribute_table(Region::Identification, &["type", "ref", "corresp"])
        .with_attribute_table(Region::Heading, &["type", "xml:lang"])
        .with_attribute_table(
            Region::Content,
            &["n", "type", "xml:lang", "class", "defective", "from", "to"],
        )
        .with_attribute_table(Region::Physical, &["form", "material", "type", "scope", "script"])
        .with_attribute_table(Region::History, &["when", "notBefore", "notAfter", "cert"])
        .with_attribute_table(Region::Literature, &["type", "subtype", "ref"])
        .with_attribute_table(
            Region::Structure,
            &["xml:id", "xml:lang", "type", "subtype", "status", "n"],
        )
        .with_attribute_table(Region::Text, &["rend", "xml:lang"])
}

/// Identifier block used by descriptions, parts and fragments
pub(crate) fn identifier_children() -> Vec<Template> {
    vec![
        Template::text(Kind::Settlement, ""),
        Template::text(Kind::Repository, ""),
        Template::text(Kind::Idno, ""),
    ]
}

/// Default body of a numbered part or fragment
pub(crate) fn part_children() -> Vec<Template> {
    vec![
        Template::new(Kind::MsIdentifier).with_children(vec![Template::text(Kind::Idno, "1")]),
        Template::new(Kind::Head).with_children(vec![Template::text(Kind::Title, "")]),
    ]
}

/// A free-text body collapsed through `chain`, innermost element holding empty text
pub(crate) fn text_body(chain: &[Kind]) -> Vec<Template> {
    match chain.split_last() {
        None => Vec::new(),
        Some((innermost, outer)) => {
            let mut template = Template::text(*innermost, "");
            for kind in outer.iter().rev() {
                template = Template::new(*kind).with_children(vec![template]);
            }
            vec![template]
        }
    }
}
