use msdesc_tree::{Attributes, Element, Kind, Node};

/// Declarative shape of a default element.
///
/// Templates live inside the registry and are never handed out; callers
/// always receive freshly instantiated nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub kind: Kind,
    pub subtype: Option<String>,
    pub attributes: Attributes,
    /// Leading text child, if any
    pub text: Option<String>,
    pub children: Vec<Template>,
}

impl Template {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            subtype: None,
            attributes: Attributes::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Element holding a single text leaf
    pub fn text(kind: Kind, value: impl Into<String>) -> Self {
        Self {
            text: Some(value.into()),
            ..Self::new(kind)
        }
    }

    pub fn with_children(mut self, children: Vec<Template>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Build a new node tree with unassigned identities
    pub fn instantiate(&self) -> Node {
        let mut element = Element::new(self.kind);
        element.subtype = self.subtype.clone();
        element.attributes = self.attributes.clone();
        if let Some(text) = &self.text {
            element.children.push(Node::text(text.clone()));
        }
        element
            .children
            .extend(self.children.iter().map(Template::instantiate));
        Node::Element(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_nests_text_and_children() {
        let template = Template::new(Kind::MsIdentifier)
            .with_children(vec![Template::text(Kind::Idno, "1")]);

        let node = template.instantiate();
        assert!(node.is_kind(Kind::MsIdentifier));
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.text_content(), "1");
        assert!(node.id().is_unassigned());
    }

    #[test]
    fn test_instances_are_independent() {
        let template = Template::text(Kind::P, "");
        let mut a = template.instantiate();
        let b = template.instantiate();

        a.as_element_mut().unwrap().children.clear();
        assert_eq!(b.children().len(), 1);
    }
}
