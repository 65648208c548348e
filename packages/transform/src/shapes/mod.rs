mod chain;
mod free_text;
mod structured;

pub(crate) use chain::expand as expand_paragraph;
pub use free_text::FreeTextShape;
pub use structured::StructuredShape;

use crate::pipeline::Walk;
use msdesc_tree::{Element, Kind, Path};

/// Dual canonical/editing shape of one component kind.
///
/// `invert(transform(x))` must rebuild `x` exactly.
pub trait ShapeRule {
    /// Unique identifier for this shape family
    fn name(&self) -> &'static str;

    /// Element kind the shape is registered for
    fn kind(&self) -> Kind;

    /// Rewrite a canonical element into its editing shape
    fn transform(&self, element: Element, walk: &mut Walk<'_>, path: &Path) -> Element;

    /// Rebuild the canonical element from its editing shape
    fn invert(&self, element: Element, walk: &mut Walk<'_>, path: &Path) -> Element;
}

/// Registry of shape rules, at most one per kind
pub struct ShapeRegistry {
    rules: Vec<Box<dyn ShapeRule>>,
}

impl ShapeRegistry {
    /// Create a new registry with all built-in shapes
    pub fn new() -> Self {
        let free_text = [
            (Kind::History, &[Kind::P][..]),
            (Kind::ObjectDesc, &[Kind::P][..]),
            (Kind::HandDesc, &[Kind::HandNote, Kind::P][..]),
            (Kind::DecoDesc, &[Kind::DecoNote, Kind::P][..]),
            (Kind::MusicNotation, &[Kind::P][..]),
            (Kind::BindingDesc, &[Kind::Binding, Kind::P][..]),
            (Kind::ListBibl, &[Kind::Bibl][..]),
        ];

        let mut registry = Self::empty();
        for (kind, chain) in free_text {
            registry.add_rule(Box::new(FreeTextShape::new(kind, chain)));
        }
        registry.add_rule(Box::new(StructuredShape::new(
            Kind::MsItem,
            &[Kind::Note, Kind::P],
        )));
        registry
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register `rule`, replacing any rule for the same kind
    pub fn add_rule(&mut self, rule: Box<dyn ShapeRule>) {
        self.rules.retain(|existing| existing.kind() != rule.kind());
        self.rules.push(rule);
    }

    pub fn rule_for(&self, kind: Kind) -> Option<&dyn ShapeRule> {
        self.rules
            .iter()
            .find(|rule| rule.kind() == kind)
            .map(|rule| rule.as_ref())
    }

    pub fn rules(&self) -> &[Box<dyn ShapeRule>] {
        &self.rules
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}
