use crate::kind::{Kind, Region};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Process-assigned node identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Placeholder identity used by templates before assignment
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Attribute map; ordered so equal nodes serialize identically
pub type Attributes = BTreeMap<String, String>;

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Known element kind
    Element(Element),

    /// Leaf text
    Text(Text),

    /// Normalized text body in the editing shape
    Flat(FlatText),

    /// Unmodeled markup, carried verbatim
    Opaque(Opaque),
}

/// Element of a known kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: NodeId,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub region: Region,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: NodeId,
    pub value: String,
}

/// Text-bearing node that replaces one or more collapsed element chains.
///
/// Each paragraph remembers the chain it was collapsed from so the
/// canonical shape can be rebuilt exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatText {
    pub id: NodeId,
    pub paragraphs: Vec<FlatParagraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatParagraph {
    /// Collapsed elements, outermost first
    pub chain: Vec<ChainLink>,
    /// Children of the innermost collapsed element
    pub content: Vec<Node>,
}

/// An element stripped of its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub id: NodeId,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub region: Region,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Unknown or legacy markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opaque {
    pub id: NodeId,
    pub tag: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Node discriminant used by path steps and change notifications
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "variant", content = "tag", rename_all = "camelCase")]
pub enum NodeKind {
    Element(Kind),
    Text,
    Flat,
    Opaque(String),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Element(kind) => write!(f, "{}", kind),
            NodeKind::Text => f.write_str("#text"),
            NodeKind::Flat => f.write_str("#flat"),
            NodeKind::Opaque(tag) => write!(f, "{}?", tag),
        }
    }
}

impl Element {
    /// Bare element of `kind` in its default region
    pub fn new(kind: Kind) -> Self {
        Self {
            id: NodeId::unassigned(),
            kind,
            subtype: None,
            region: kind.default_region(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Drop children, keeping everything needed to rebuild the element
    pub fn to_link(&self) -> ChainLink {
        ChainLink {
            id: self.id.clone(),
            kind: self.kind,
            subtype: self.subtype.clone(),
            region: self.region,
            attributes: self.attributes.clone(),
        }
    }

    /// Direct children that are elements of `kind`
    pub fn child_elements(&self, kind: Kind) -> impl Iterator<Item = &Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .filter(move |el| el.kind == kind)
    }
}

impl ChainLink {
    pub fn into_element(self, children: Vec<Node>) -> Element {
        Element {
            id: self.id,
            kind: self.kind,
            subtype: self.subtype,
            region: self.region,
            attributes: self.attributes,
            children,
        }
    }
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text {
            id: NodeId::unassigned(),
            value: value.into(),
        })
    }

    pub fn element(kind: Kind, children: Vec<Node>) -> Self {
        Node::Element(Element::new(kind).with_children(children))
    }

    pub fn opaque(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Opaque(Opaque {
            id: NodeId::unassigned(),
            tag: tag.into(),
            attributes: Attributes::new(),
            children,
        })
    }

    pub fn id(&self) -> &NodeId {
        match self {
            Node::Element(el) => &el.id,
            Node::Text(text) => &text.id,
            Node::Flat(flat) => &flat.id,
            Node::Opaque(opaque) => &opaque.id,
        }
    }

    pub fn set_id(&mut self, id: NodeId) {
        match self {
            Node::Element(el) => el.id = id,
            Node::Text(text) => text.id = id,
            Node::Flat(flat) => flat.id = id,
            Node::Opaque(opaque) => opaque.id = id,
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        match self {
            Node::Element(el) => NodeKind::Element(el.kind),
            Node::Text(_) => NodeKind::Text,
            Node::Flat(_) => NodeKind::Flat,
            Node::Opaque(opaque) => NodeKind::Opaque(opaque.tag.clone()),
        }
    }

    /// Known kind, if this is an element
    pub fn kind(&self) -> Option<Kind> {
        self.as_element().map(|el| el.kind)
    }

    pub fn is_kind(&self, kind: Kind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Addressable children. Text and flat nodes are leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Opaque(opaque) => &opaque.children,
            Node::Text(_) | Node::Flat(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(el) => Some(&mut el.children),
            Node::Opaque(opaque) => Some(&mut opaque.children),
            Node::Text(_) | Node::Flat(_) => None,
        }
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.value),
            Node::Flat(flat) => {
                for paragraph in &flat.paragraphs {
                    for node in &paragraph.content {
                        node.collect_text(out);
                    }
                }
            }
            Node::Element(_) | Node::Opaque(_) => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_spans_flat_paragraphs() {
        let flat = Node::Flat(FlatText {
            id: NodeId::new("f"),
            paragraphs: vec![
                FlatParagraph {
                    chain: vec![Element::new(Kind::P).to_link()],
                    content: vec![Node::text("first ")],
                },
                FlatParagraph {
                    chain: vec![Element::new(Kind::P).to_link()],
                    content: vec![Node::text("second")],
                },
            ],
        });
        let history = Node::element(Kind::History, vec![flat]);

        assert_eq!(history.text_content(), "first second");
        // Flat bodies are leaves for addressing
        assert!(history.children()[0].children().is_empty());
    }

    #[test]
    fn test_link_round_trip_keeps_attributes() {
        let el = Element::new(Kind::Note).with_attribute("type", "content");
        let rebuilt = el.to_link().into_element(vec![]);
        assert_eq!(rebuilt, el);
    }

    #[test]
    fn test_node_serialization() {
        let node = Node::element(Kind::Idno, vec![Node::text("Cod. 12")]);
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
