//! # Schema Registry
//!
//! Immutable lookup table from `(profile, kind)` to a structural [`Rule`].
//! Built once at startup and shared read-only. Template data never leaves
//! the registry by reference: `default_element_for` and
//! `default_children_for` instantiate fresh nodes on every call.
//!
//! A missing rule from `rule_for` means "unmodeled markup, pass it through".
//! Callers that expect a rule to exist use `require_rule`, which turns the
//! miss into [`SchemaError::UnknownRule`].

use crate::error::{SchemaError, SchemaResult};
use crate::profile::Profile;
use crate::profiles;
use crate::rule::{Rule, WrapperSpec};
use msdesc_tree::{Kind, Node, Region};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Rule table of one profile
#[derive(Debug, Clone)]
pub struct ProfileSchema {
    pub profile: Profile,
    /// Kind standing in for the container of top-level components
    pub type_root: Kind,
    /// Fixed order used to sort component suggestions
    pub components_insert_order: Vec<Kind>,
    rules: HashMap<Kind, Rule>,
    attribute_tables: HashMap<Region, BTreeSet<String>>,
}

impl ProfileSchema {
    pub fn new(profile: Profile, type_root: Kind) -> Self {
        Self {
            profile,
            type_root,
            components_insert_order: Vec::new(),
            rules: HashMap::new(),
            attribute_tables: HashMap::new(),
        }
    }

    pub fn with_insert_order(mut self, order: &[Kind]) -> Self {
        self.components_insert_order = order.to_vec();
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule.kind, rule);
        self
    }

    pub fn with_attribute_table(mut self, region: Region, names: &[&str]) -> Self {
        self.attribute_tables
            .entry(region)
            .or_default()
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn rule(&self, kind: Kind) -> Option<&Rule> {
        self.rules.get(&kind)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub(crate) fn rules_mut(&mut self) -> &mut HashMap<Kind, Rule> {
        &mut self.rules
    }

    pub fn attribute_table(&self, region: Region) -> Option<&BTreeSet<String>> {
        self.attribute_tables.get(&region)
    }
}

/// Special guideline rules a kind triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRule {
    /// Last sibling of a self-following kind only offers its own kind
    SelfSimilarFollower,
    /// Insertion into an empty sibling list lands at the reserved index 1
    ReservedWrappedIndex,
}

/// A kind that should get a manual look when the schema changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewFlag {
    pub kind: Kind,
    pub rule: SpecialRule,
}

/// Rule tables for every known profile
#[derive(Debug, Clone)]
pub struct Registry {
    profiles: HashMap<Profile, ProfileSchema>,
}

impl Registry {
    /// Registry holding the built-in profiles
    pub fn builtin() -> Self {
        Self::from_profiles(vec![
            profiles::description(),
            profiles::retro_description(),
        ])
    }

    /// Shared built-in registry, constructed on first use
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::builtin)
    }

    pub fn from_profiles(schemas: Vec<ProfileSchema>) -> Self {
        Self {
            profiles: schemas
                .into_iter()
                .map(|schema| (schema.profile, schema))
                .collect(),
        }
    }

    pub fn profile(&self, profile: Profile) -> SchemaResult<&ProfileSchema> {
        self.profiles
            .get(&profile)
            .ok_or(SchemaError::UnknownProfile(profile))
    }

    /// Rule for `kind`, `None` when the kind is unmodeled in `profile`
    pub fn rule_for(&self, profile: Profile, kind: Kind) -> Option<&Rule> {
        self.profiles.get(&profile)?.rule(kind)
    }

    /// Rule for `kind` where one must exist
    pub fn require_rule(&self, profile: Profile, kind: Kind) -> SchemaResult<&Rule> {
        self.profile(profile)?
            .rule(kind)
            .ok_or_else(|| SchemaError::unknown_rule(profile, kind))
    }

    /// Fresh copy of the declared default element, without default children
    pub fn default_element_for(&self, profile: Profile, kind: Kind) -> SchemaResult<Option<Node>> {
        let rule = self.require_rule(profile, kind)?;
        Ok(rule.default_element.as_ref().map(|t| t.instantiate()))
    }

    /// Fresh copies of the declared default children
    pub fn default_children_for(&self, profile: Profile, kind: Kind) -> SchemaResult<Vec<Node>> {
        let rule = self.require_rule(profile, kind)?;
        Ok(rule.default_children.iter().map(|t| t.instantiate()).collect())
    }

    /// Wrapper required around `kind` when placed inside `container`
    pub fn wrapper_for(
        &self,
        profile: Profile,
        kind: Kind,
        container: Kind,
    ) -> Option<&WrapperSpec> {
        self.rule_for(profile, kind)?
            .wrapper
            .as_ref()
            .filter(|wrapper| wrapper.applies_in(container))
    }

    pub fn type_root(&self, profile: Profile) -> SchemaResult<Kind> {
        Ok(self.profile(profile)?.type_root)
    }

    /// Position of `kind` in the profile's insert order; unlisted kinds sort last
    pub fn insert_rank(&self, profile: Profile, kind: Kind) -> usize {
        self.profiles
            .get(&profile)
            .and_then(|schema| {
                schema
                    .components_insert_order
                    .iter()
                    .position(|k| *k == kind)
            })
            .unwrap_or(usize::MAX)
    }

    pub fn is_component(&self, profile: Profile, kind: Kind) -> bool {
        self.rule_for(profile, kind)
            .map(|rule| rule.component)
            .unwrap_or(false)
    }

    /// Whether any rule of the profile uses `kind` as its wrapper
    pub fn is_wrapper_kind(&self, profile: Profile, kind: Kind) -> bool {
        self.profiles
            .get(&profile)
            .map(|schema| {
                schema
                    .rules()
                    .any(|rule| matches!(&rule.wrapper, Some(w) if w.kind == kind))
            })
            .unwrap_or(false)
    }

    /// Attribute names allowed on an element of `kind` in `region`
    pub fn allowed_attributes(
        &self,
        profile: Profile,
        region: Region,
        kind: Kind,
    ) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if let Some(schema) = self.profiles.get(&profile) {
            if let Some(table) = schema.attribute_table(region) {
                names.extend(table.iter().cloned());
            }
            if let Some(rule) = schema.rule(kind) {
                names.extend(rule.attributes.iter().cloned());
            }
        }
        names
    }

    /// Kinds that trigger one of the special guideline rules
    pub fn review_flags(&self, profile: Profile) -> Vec<ReviewFlag> {
        let Some(schema) = self.profiles.get(&profile) else {
            return Vec::new();
        };

        let mut flags: Vec<ReviewFlag> = schema
            .rules()
            .filter(|rule| rule.component)
            .flat_map(|rule| {
                let mut out = Vec::new();
                if rule.is_self_similar() {
                    out.push(ReviewFlag {
                        kind: rule.kind,
                        rule: SpecialRule::SelfSimilarFollower,
                    });
                }
                if rule.wrapper.is_some() {
                    out.push(ReviewFlag {
                        kind: rule.kind,
                        rule: SpecialRule::ReservedWrappedIndex,
                    });
                }
                out
            })
            .collect();
        flags.sort_by_key(|flag| (self.insert_rank(profile, flag.kind), flag.kind));
        flags
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Cardinality;

    #[test]
    fn test_unknown_kind_is_pass_through() {
        let registry = Registry::builtin();
        assert!(registry.rule_for(Profile::Description, Kind::Locus).is_none());
        assert_eq!(
            registry.require_rule(Profile::Description, Kind::Locus),
            Err(SchemaError::unknown_rule(Profile::Description, Kind::Locus))
        );
    }

    #[test]
    fn test_default_element_is_a_fresh_copy() {
        let registry = Registry::builtin();
        let mut first = registry
            .default_element_for(Profile::Description, Kind::MsItem)
            .unwrap()
            .unwrap();
        first.as_element_mut().unwrap().attributes.insert("n".into(), "9".into());

        let second = registry
            .default_element_for(Profile::Description, Kind::MsItem)
            .unwrap()
            .unwrap();
        assert!(second.as_element().unwrap().attributes.is_empty());
    }

    #[test]
    fn test_type_root_has_no_default_element() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.default_element_for(Profile::Description, Kind::MsDesc),
            Ok(None)
        );
    }

    #[test]
    fn test_wrapper_relevance_depends_on_container() {
        let registry = Registry::builtin();
        let wrapper = registry
            .wrapper_for(Profile::Description, Kind::MsItem, Kind::MsDesc)
            .unwrap();
        assert_eq!(wrapper.kind, Kind::MsContents);
        assert!(registry
            .wrapper_for(Profile::Description, Kind::MsItem, Kind::MsItem)
            .is_none());
        assert!(registry.is_wrapper_kind(Profile::Description, Kind::MsContents));
        assert!(registry.is_wrapper_kind(Profile::Description, Kind::PhysDesc));
        assert!(!registry.is_wrapper_kind(Profile::RetroDescription, Kind::PhysDesc));
    }

    #[test]
    fn test_follower_and_predecessor_sets_are_symmetric() {
        let registry = Registry::builtin();
        for profile in [Profile::Description, Profile::RetroDescription] {
            let schema = registry.profile(profile).unwrap();
            for rule in schema.rules() {
                for follower in &rule.allowed_follower {
                    let other = schema.rule(*follower).unwrap();
                    assert!(
                        other.allows_predecessor(rule.kind),
                        "{} -> {} in {}",
                        rule.kind,
                        follower,
                        profile
                    );
                }
            }
        }
    }

    #[test]
    fn test_required_sections() {
        let registry = Registry::builtin();
        let ident = registry
            .require_rule(Profile::Description, Kind::MsIdentifier)
            .unwrap();
        assert!(ident.required);
        assert_eq!(ident.cardinality, Cardinality::ExactlyOne);
        assert!(ident.allowed_predecessor.is_empty());
    }

    #[test]
    fn test_allowed_attributes_merge_region_and_rule() {
        let registry = Registry::builtin();
        let names = registry.allowed_attributes(
            Profile::Description,
            Region::Identification,
            Kind::AltIdentifier,
        );
        assert!(names.contains("type"));
        assert!(!names.contains("form"));
    }

    #[test]
    fn test_review_flags() {
        let registry = Registry::builtin();
        let flags = registry.review_flags(Profile::Description);
        assert!(flags.contains(&ReviewFlag {
            kind: Kind::MsItem,
            rule: SpecialRule::SelfSimilarFollower
        }));
        assert!(flags.contains(&ReviewFlag {
            kind: Kind::BindingDesc,
            rule: SpecialRule::ReservedWrappedIndex
        }));
        assert!(!flags.iter().any(|f| f.kind == Kind::Head));
    }

    #[test]
    fn test_global_is_shared() {
        let a = Registry::global() as *const Registry;
        let b = Registry::global() as *const Registry;
        assert_eq!(a, b);
    }
}
