//! Derives follower and predecessor sets from a declared section order.
//!
//! A section may be followed by any later section up to and including the
//! next required one. Repeatable sections may follow themselves. Sections
//! sharing an exclusive group never follow one another.

use crate::rule::Rule;
use msdesc_tree::Kind;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Section {
    kind: Kind,
    many: bool,
    required: bool,
    group: Option<u8>,
}

impl Section {
    pub(crate) fn required(kind: Kind) -> Self {
        Self {
            kind,
            many: false,
            required: true,
            group: None,
        }
    }

    pub(crate) fn one(kind: Kind) -> Self {
        Self {
            kind,
            many: false,
            required: false,
            group: None,
        }
    }

    pub(crate) fn many(kind: Kind) -> Self {
        Self {
            many: true,
            ..Self::one(kind)
        }
    }

    pub(crate) fn exclusive(mut self, group: u8) -> Self {
        self.group = Some(group);
        self
    }
}

/// Add the ordering implied by `sections` to the matching rules
pub(crate) fn apply_order(sections: &[Section], rules: &mut HashMap<Kind, Rule>) {
    for (i, section) in sections.iter().enumerate() {
        let mut followers = Vec::new();
        if section.many {
            followers.push(section.kind);
        }
        for later in &sections[i + 1..] {
            let excluded = matches!((section.group, later.group), (Some(a), Some(b)) if a == b);
            if !excluded {
                followers.push(later.kind);
            }
            if later.required {
                break;
            }
        }

        for follower in followers {
            if let Some(rule) = rules.get_mut(&section.kind) {
                rule.allowed_follower.insert(follower);
            }
            if let Some(rule) = rules.get_mut(&follower) {
                rule.allowed_predecessor.insert(section.kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(kinds: &[Kind]) -> HashMap<Kind, Rule> {
        kinds.iter().map(|k| (*k, Rule::component(*k))).collect()
    }

    #[test]
    fn test_required_section_stops_the_scan() {
        let mut table = rules(&[Kind::MsIdentifier, Kind::Head, Kind::History]);
        apply_order(
            &[
                Section::required(Kind::MsIdentifier),
                Section::required(Kind::Head),
                Section::one(Kind::History),
            ],
            &mut table,
        );

        let ident = &table[&Kind::MsIdentifier];
        assert!(ident.allows_follower(Kind::Head));
        assert!(!ident.allows_follower(Kind::History));
        assert!(table[&Kind::History].allows_predecessor(Kind::Head));
        assert!(!table[&Kind::History].allows_predecessor(Kind::MsIdentifier));
    }

    #[test]
    fn test_exclusive_group_and_repetition() {
        let mut table = rules(&[Kind::MsPart, Kind::MsFrag]);
        apply_order(
            &[
                Section::many(Kind::MsPart).exclusive(1),
                Section::many(Kind::MsFrag).exclusive(1),
            ],
            &mut table,
        );

        let part = &table[&Kind::MsPart];
        assert!(part.is_self_similar());
        assert!(!part.allows_follower(Kind::MsFrag));
        assert!(!table[&Kind::MsFrag].allows_predecessor(Kind::MsPart));
    }
}
