use crate::template::Template;
use msdesc_tree::Kind;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ExactlyOne,
    Many,
}

/// Implicit container required around a kind inside specific parents
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperSpec {
    pub kind: Kind,
    /// Parent kinds in which the wrapper applies
    pub relevant_in: BTreeSet<Kind>,
}

impl WrapperSpec {
    pub fn applies_in(&self, container: Kind) -> bool {
        self.relevant_in.contains(&container)
    }
}

/// Ordinal written into a new component based on its existing siblings
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingSpec {
    /// Kinds leading from the component down to its numeric leaf
    pub leaf: Vec<Kind>,
}

/// Structural rule for one kind within a profile
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub kind: Kind,
    /// Shown as an entry of the summary tree
    pub component: bool,
    pub cardinality: Cardinality,
    pub required: bool,
    pub allowed_containers: BTreeSet<Kind>,
    /// Child components when this kind acts as a container
    pub allowed_components: Vec<Kind>,
    pub allowed_follower: BTreeSet<Kind>,
    pub allowed_predecessor: BTreeSet<Kind>,
    pub default_element: Option<Template>,
    pub default_children: Vec<Template>,
    pub wrapper: Option<WrapperSpec>,
    pub numbering: Option<NumberingSpec>,
    /// Attributes declared on top of the region table
    pub attributes: BTreeSet<String>,
}

impl Rule {
    /// Component rule with exactly-one cardinality and no ordering yet
    pub fn component(kind: Kind) -> Self {
        Self {
            kind,
            component: true,
            cardinality: Cardinality::ExactlyOne,
            required: false,
            allowed_containers: BTreeSet::new(),
            allowed_components: Vec::new(),
            allowed_follower: BTreeSet::new(),
            allowed_predecessor: BTreeSet::new(),
            default_element: None,
            default_children: Vec::new(),
            wrapper: None,
            numbering: None,
            attributes: BTreeSet::new(),
        }
    }

    /// Rule for a structural kind that never shows up in the summary tree
    pub fn structural(kind: Kind) -> Self {
        Self {
            component: false,
            cardinality: Cardinality::Many,
            ..Self::component(kind)
        }
    }

    pub fn many(mut self) -> Self {
        self.cardinality = Cardinality::Many;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn containers(mut self, kinds: &[Kind]) -> Self {
        self.allowed_containers.extend(kinds.iter().copied());
        self
    }

    pub fn components(mut self, kinds: &[Kind]) -> Self {
        self.allowed_components = kinds.to_vec();
        self
    }

    pub fn default_element(mut self, template: Template) -> Self {
        self.default_element = Some(template);
        self
    }

    pub fn default_children(mut self, templates: Vec<Template>) -> Self {
        self.default_children = templates;
        self
    }

    pub fn wrapped_in(mut self, kind: Kind, relevant_in: &[Kind]) -> Self {
        self.wrapper = Some(WrapperSpec {
            kind,
            relevant_in: relevant_in.iter().copied().collect(),
        });
        self
    }

    pub fn numbered_at(mut self, leaf: &[Kind]) -> Self {
        self.numbering = Some(NumberingSpec {
            leaf: leaf.to_vec(),
        });
        self
    }

    pub fn attributes(mut self, names: &[&str]) -> Self {
        self.attributes
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    /// The same kind may directly follow itself
    pub fn is_self_similar(&self) -> bool {
        self.allowed_follower.contains(&self.kind)
    }

    pub fn allows_follower(&self, kind: Kind) -> bool {
        self.allowed_follower.contains(&kind)
    }

    pub fn allows_predecessor(&self, kind: Kind) -> bool {
        self.allowed_predecessor.contains(&kind)
    }
}
