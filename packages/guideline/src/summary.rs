//! # Summary Tree
//!
//! Sidebar projection of the live document: one entry per component, nested
//! the way components nest. Wrapper elements are transparent, so the
//! components they enclose show up as siblings of their neighbours and
//! remember the wrapper through `wrapper_id`. Non-component elements and
//! opaque markup are walked through; text leaves never produce entries.
//!
//! The tree is derived, never edited: rebuild it after every structural
//! mutation.

use msdesc_schema::{Profile, Registry};
use msdesc_tree::{Kind, Node, NodeId, Path};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub id: NodeId,
    pub kind: Kind,
    pub path: Path,
    /// Rendered form of `path`, for diagnostics
    pub xmlpath: String,
    pub parent_id: Option<NodeId>,
    pub wrapper_id: Option<NodeId>,
    pub children: Vec<SummaryEntry>,
}

impl SummaryEntry {
    pub fn child_kinds(&self) -> Vec<Kind> {
        self.children.iter().map(|child| child.kind).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTree {
    pub roots: Vec<SummaryEntry>,
}

impl SummaryTree {
    pub fn find(&self, id: &NodeId) -> Option<&SummaryEntry> {
        self.iter().find(|entry| &entry.id == id)
    }

    /// Enclosing component, `None` for roots and unknown ids
    pub fn parent_of(&self, id: &NodeId) -> Option<&SummaryEntry> {
        let parent_id = self.find(id)?.parent_id.as_ref()?;
        self.find(parent_id)
    }

    /// Entries sharing the parent of `id`, the entry itself included
    pub fn siblings_of(&self, id: &NodeId) -> Option<&[SummaryEntry]> {
        let entry = self.find(id)?;
        match &entry.parent_id {
            Some(parent_id) => self.find(parent_id).map(|parent| parent.children.as_slice()),
            None => Some(self.roots.as_slice()),
        }
    }

    /// Pre-order walk over every entry
    pub fn iter(&self) -> SummaryIter<'_> {
        SummaryIter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

pub struct SummaryIter<'a> {
    stack: Vec<&'a SummaryEntry>,
}

impl<'a> Iterator for SummaryIter<'a> {
    type Item = &'a SummaryEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.stack.extend(entry.children.iter().rev());
        Some(entry)
    }
}

/// Derive the summary tree of `forest` under `profile`
pub fn build_summary(registry: &Registry, profile: Profile, forest: &[Node]) -> SummaryTree {
    let mut roots = Vec::new();
    let scope = Scope {
        registry,
        profile,
    };
    scope.collect(forest, &Path::root(), None, None, &mut roots);
    SummaryTree { roots }
}

struct Scope<'a> {
    registry: &'a Registry,
    profile: Profile,
}

impl Scope<'_> {
    fn collect(
        &self,
        nodes: &[Node],
        prefix: &Path,
        parent_id: Option<&NodeId>,
        wrapper_id: Option<&NodeId>,
        out: &mut Vec<SummaryEntry>,
    ) {
        for (index, node) in nodes.iter().enumerate() {
            let path = prefix.child_node(index, node);
            match node {
                Node::Element(el) if self.registry.is_component(self.profile, el.kind) => {
                    let mut children = Vec::new();
                    self.collect(&el.children, &path, Some(&el.id), None, &mut children);
                    out.push(SummaryEntry {
                        id: el.id.clone(),
                        kind: el.kind,
                        xmlpath: path.to_string(),
                        path,
                        parent_id: parent_id.cloned(),
                        wrapper_id: wrapper_id.cloned(),
                        children,
                    });
                }
                Node::Element(el) if self.registry.is_wrapper_kind(self.profile, el.kind) => {
                    self.collect(&el.children, &path, parent_id, Some(&el.id), out);
                }
                Node::Element(_) | Node::Opaque(_) => {
                    self.collect(node.children(), &path, parent_id, wrapper_id, out);
                }
                Node::Text(_) | Node::Flat(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdesc_tree::IdGenerator;

    fn sample() -> Vec<Node> {
        let mut doc = Node::element(
            Kind::MsDesc,
            vec![
                Node::element(
                    Kind::MsIdentifier,
                    vec![Node::element(Kind::Idno, vec![Node::text("12")])],
                ),
                Node::element(Kind::Head, vec![]),
                Node::element(
                    Kind::MsContents,
                    vec![
                        Node::element(Kind::Summary, vec![Node::text("")]),
                        Node::element(Kind::MsItem, vec![]),
                        Node::element(Kind::MsItem, vec![Node::element(Kind::MsItem, vec![])]),
                    ],
                ),
                Node::opaque("msWriting", vec![Node::element(Kind::History, vec![])]),
            ],
        );
        IdGenerator::new("summary").assign_fresh_ids(&mut doc);
        vec![doc]
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let forest = sample();
        let tree = build_summary(Registry::global(), Profile::Description, &forest);

        assert_eq!(tree.roots.len(), 1);
        let root = &tree.roots[0];
        assert_eq!(
            root.child_kinds(),
            vec![Kind::MsIdentifier, Kind::Head, Kind::MsItem, Kind::MsItem, Kind::History]
        );

        let wrapper_id = forest[0].children()[2].id();
        assert_eq!(root.children[2].wrapper_id.as_ref(), Some(wrapper_id));
        assert_eq!(root.children[0].wrapper_id, None);
        assert_eq!(root.children[2].xmlpath, "msDesc[0]/msContents[2]/msItem[1]");
    }

    #[test]
    fn test_nested_components_and_lookup() {
        let forest = sample();
        let tree = build_summary(Registry::global(), Profile::Description, &forest);

        let outer = &tree.roots[0].children[3];
        assert_eq!(outer.children.len(), 1);
        let inner = &outer.children[0];
        assert_eq!(inner.wrapper_id, None);
        assert_eq!(tree.parent_of(&inner.id).map(|e| &e.id), Some(&outer.id));
        assert_eq!(tree.siblings_of(&inner.id).map(|s| s.len()), Some(1));
        assert!(tree.parent_of(&tree.roots[0].id).is_none());
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_iter_is_pre_order() {
        let forest = sample();
        let tree = build_summary(Registry::global(), Profile::Description, &forest);
        let kinds: Vec<Kind> = tree.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Kind::MsDesc,
                Kind::MsIdentifier,
                Kind::Head,
                Kind::MsItem,
                Kind::MsItem,
                Kind::MsItem,
                Kind::History
            ]
        );
    }

    #[test]
    fn test_entries_serialize_for_the_sidebar() {
        let forest = sample();
        let tree = build_summary(Registry::global(), Profile::Description, &forest);
        let json = serde_json::to_value(&tree.roots[0].children[2]).unwrap();

        assert_eq!(json["kind"], "msItem");
        assert_eq!(json["xmlpath"], "msDesc[0]/msContents[2]/msItem[1]");
        assert_eq!(json["parentId"], serde_json::json!(tree.roots[0].id));
        assert!(json["wrapperId"].is_string());
    }
}
