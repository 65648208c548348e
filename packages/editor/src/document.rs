//! # Document Handle
//!
//! The live tree of one manuscript description and its editing state.
//!
//! A document owns its forest and the identity generator that hands out
//! identities for everything created after load. Only [`Mutation`]s change
//! the forest; everything else reads it through the addressing queries.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Transform → Edit → Invert → Save
//!   ↓        ↓         ↓       ↓       ↓
//! Forest  Editing  Mutations Canonical Host
//! ```

use crate::mutations::{Mutation, MutationError, MutationResult};
use msdesc_schema::{Profile, Registry};
use msdesc_tree::{find, parent_of, path_of, resolve, IdGenerator, Node, NodeId, Path};
use tracing::debug;

/// Editable manuscript description
#[derive(Debug, Clone)]
pub struct Document {
    /// Name the identity seed is derived from
    pub name: String,

    pub profile: Profile,

    /// Current version number (increments on each mutation)
    pub version: u64,

    nodes: Vec<Node>,
    ids: IdGenerator,
}

impl Document {
    /// Empty document
    pub fn new(name: impl Into<String>, profile: Profile) -> Self {
        let name = name.into();
        let ids = IdGenerator::new(&name);
        Self {
            name,
            profile,
            version: 0,
            nodes: Vec::new(),
            ids,
        }
    }

    /// Document over `nodes`, every node getting a fresh identity
    pub fn from_nodes(name: impl Into<String>, profile: Profile, mut nodes: Vec<Node>) -> Self {
        let mut doc = Self::new(name, profile);
        for node in &mut nodes {
            doc.ids.assign_fresh_ids(node);
        }
        doc.nodes = nodes;
        doc
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Replace the whole forest without touching identities or version
    pub(crate) fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
    }

    /// Forest and identity generator, borrowed together
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Node>, &mut IdGenerator) {
        (&mut self.nodes, &mut self.ids)
    }

    /// Read access to the forest alongside the identity generator
    pub(crate) fn split_ids(&mut self) -> (&[Node], &mut IdGenerator) {
        (&self.nodes, &mut self.ids)
    }

    pub fn resolve(&self, path: &Path) -> Option<&Node> {
        resolve(&self.nodes, path)
    }

    pub fn path_of(&self, id: &NodeId) -> Option<Path> {
        path_of(&self.nodes, id)
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        find(&self.nodes, id)
    }

    pub fn parent_of(&self, id: &NodeId) -> Option<&Node> {
        parent_of(&self.nodes, id)
    }

    /// Apply a mutation.
    ///
    /// The version only moves when the mutation committed.
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        registry: &Registry,
    ) -> Result<MutationResult, MutationError> {
        let events = mutation.apply(self, registry)?;
        self.version += 1;
        debug!(version = self.version, events = events.len(), "applied mutation");

        Ok(MutationResult {
            mutation: mutation.clone(),
            version: self.version,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdesc_tree::Kind;

    fn sample() -> Document {
        Document::from_nodes(
            "sample",
            Profile::Description,
            vec![Node::element(
                Kind::MsDesc,
                vec![Node::element(Kind::Head, vec![Node::text("Psalter")])],
            )],
        )
    }

    #[test]
    fn test_from_nodes_assigns_identities() {
        let doc = sample();
        assert_eq!(doc.version, 0);
        assert_eq!(doc.ids().issued(), 3);

        let head = &doc.nodes()[0].children()[0];
        assert!(!head.id().is_unassigned());
        let path = doc.path_of(head.id()).unwrap();
        assert_eq!(doc.resolve(&path), Some(head));
        assert!(doc.parent_of(head.id()).unwrap().is_kind(Kind::MsDesc));
    }

    #[test]
    fn test_document_version_increments_only_on_commit() {
        let registry = Registry::builtin();
        let mut doc = sample();
        let text_path = doc
            .path_of(doc.nodes()[0].children()[0].children()[0].id())
            .unwrap();

        let result = doc
            .apply(&Mutation::set_text(text_path, "Hymnal"), &registry)
            .unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(doc.nodes()[0].text_content(), "Hymnal");

        let stale = Path::root().child(3, msdesc_tree::NodeKind::Element(Kind::MsDesc));
        assert!(doc.apply(&Mutation::delete(stale), &registry).is_err());
        assert_eq!(doc.version, 1);
    }
}
