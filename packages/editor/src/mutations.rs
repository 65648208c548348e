//! # Tree Mutations
//!
//! The only operations allowed to change the live tree.
//!
//! Every mutation addresses its target by structural path and is checked
//! in full before anything is touched: a path that no longer resolves,
//! because another edit moved things underneath the caller, fails with
//! [`MutationError::StaleAddress`] and leaves the document as it was.
//!
//! ### Insert
//! - Index is clamped to the parent's child count
//! - Nodes with unassigned identities get fresh ones; identities already
//!   present in the document are rejected
//!
//! ### SetAttributes
//! - `None` removes an attribute
//! - Names must be declared for the element's region or kind; opaque
//!   nodes accept anything
//!
//! ### SetText
//! - Replaces the value of a text leaf
//! - On a flat body, each line becomes one paragraph: existing chains are
//!   reused in order, extra lines copy the last chain under fresh identities

use crate::document::Document;
use crate::events::{ChangeEvent, ChangeMethod};
use msdesc_schema::Registry;
use msdesc_tree::visitor::{walk_flat_mut, walk_node_mut};
use msdesc_tree::{
    collect_ids, resolve, resolve_mut, FlatParagraph, FlatText, IdGenerator, Kind, Node, NodeId,
    Path, Text, VisitorMut,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert nodes as children of `parent` starting at `index`
    Insert {
        parent: Path,
        index: usize,
        nodes: Vec<Node>,
    },

    /// Remove a node and its subtree
    Delete { path: Path },

    /// Set or remove attributes of an element
    SetAttributes {
        path: Path,
        attributes: BTreeMap<String, Option<String>>,
    },

    /// Replace the text of a text leaf or flat body
    SetText { path: Path, value: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Stale address: {path} no longer resolves")]
    StaleAddress { path: Path },

    #[error("Node at {0} is not an element")]
    NotAnElement(Path),

    #[error("Node at {0} does not hold text")]
    NotText(Path),

    #[error("Insert without nodes")]
    EmptyInsert,

    #[error("Identity {0} is already used in the document")]
    DuplicateIdentity(NodeId),

    #[error("Attribute `{name}` is not declared for `{kind}`")]
    UndeclaredAttribute { kind: Kind, name: String },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl MutationError {
    fn stale(path: &Path) -> Self {
        Self::StaleAddress { path: path.clone() }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub mutation: Mutation,

    /// Document version after the mutation
    pub version: u64,

    /// Notifications to queue, in order
    pub events: Vec<ChangeEvent>,
}

impl Mutation {
    pub fn insert(parent: Path, index: usize, nodes: Vec<Node>) -> Self {
        Mutation::Insert {
            parent,
            index,
            nodes,
        }
    }

    pub fn delete(path: Path) -> Self {
        Mutation::Delete { path }
    }

    pub fn set_text(path: Path, value: impl Into<String>) -> Self {
        Mutation::SetText {
            path,
            value: value.into(),
        }
    }

    /// Apply mutation to the document with validation
    pub fn apply(
        &self,
        doc: &mut Document,
        registry: &Registry,
    ) -> Result<Vec<ChangeEvent>, MutationError> {
        // Validate first
        self.validate(doc, registry)?;

        match self {
            Mutation::Insert {
                parent,
                index,
                nodes,
            } => Self::apply_insert(doc, parent, *index, nodes),

            Mutation::Delete { path } => Self::apply_delete(doc, path),

            Mutation::SetAttributes { path, attributes } => {
                Self::apply_set_attributes(doc, path, attributes)
            }

            Mutation::SetText { path, value } => Self::apply_set_text(doc, path, value),
        }
    }

    fn apply_insert(
        doc: &mut Document,
        parent: &Path,
        index: usize,
        nodes: &[Node],
    ) -> Result<Vec<ChangeEvent>, MutationError> {
        let (forest, ids) = doc.parts_mut();

        let mut nodes = nodes.to_vec();
        for node in &mut nodes {
            MissingIds { ids: &mut *ids }.visit_node_mut(node);
        }
        let events = nodes
            .iter()
            .map(|node| {
                ChangeEvent::new(node.node_kind(), ChangeMethod::Insert, node.id().clone())
            })
            .collect();

        let children = msdesc_tree::resolve_children_mut(forest, parent)
            .ok_or_else(|| MutationError::stale(parent))?;
        let at = index.min(children.len());
        children.splice(at..at, nodes);
        Ok(events)
    }

    fn apply_delete(doc: &mut Document, path: &Path) -> Result<Vec<ChangeEvent>, MutationError> {
        let (forest, _) = doc.parts_mut();
        let (parent, step) = split_last(path)?;
        let children = msdesc_tree::resolve_children_mut(forest, &parent)
            .ok_or_else(|| MutationError::stale(path))?;
        let removed = children.remove(step.index);
        Ok(vec![ChangeEvent::new(
            removed.node_kind(),
            ChangeMethod::Delete,
            removed.id().clone(),
        )])
    }

    fn apply_set_attributes(
        doc: &mut Document,
        path: &Path,
        attributes: &BTreeMap<String, Option<String>>,
    ) -> Result<Vec<ChangeEvent>, MutationError> {
        let (forest, _) = doc.parts_mut();
        let node = resolve_mut(forest, path).ok_or_else(|| MutationError::stale(path))?;
        let event = ChangeEvent::new(node.node_kind(), ChangeMethod::Edit, node.id().clone());
        let target = match node {
            Node::Element(el) => &mut el.attributes,
            Node::Opaque(opaque) => &mut opaque.attributes,
            _ => return Err(MutationError::NotAnElement(path.clone())),
        };

        for (name, value) in attributes {
            match value {
                Some(value) => {
                    target.insert(name.clone(), value.clone());
                }
                None => {
                    target.remove(name);
                }
            }
        }
        Ok(vec![event])
    }

    fn apply_set_text(
        doc: &mut Document,
        path: &Path,
        value: &str,
    ) -> Result<Vec<ChangeEvent>, MutationError> {
        let (forest, ids) = doc.parts_mut();
        let node = resolve_mut(forest, path).ok_or_else(|| MutationError::stale(path))?;
        let event = ChangeEvent::new(node.node_kind(), ChangeMethod::Edit, node.id().clone());
        match node {
            Node::Text(text) => text.value = value.to_string(),
            Node::Flat(flat) => set_flat_text(flat, value, ids)?,
            _ => return Err(MutationError::NotText(path.clone())),
        }
        Ok(vec![event])
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document, registry: &Registry) -> Result<(), MutationError> {
        let forest = doc.nodes();
        match self {
            Mutation::Insert { parent, nodes, .. } => {
                if nodes.is_empty() {
                    return Err(MutationError::EmptyInsert);
                }
                if !parent.is_empty() {
                    match resolve(forest, parent) {
                        None => return Err(MutationError::stale(parent)),
                        Some(Node::Element(_)) | Some(Node::Opaque(_)) => {}
                        Some(_) => {
                            return Err(MutationError::InvalidStructure(format!(
                                "{} cannot have children",
                                parent
                            )))
                        }
                    }
                }

                let mut seen: HashSet<NodeId> = collect_ids(forest).into_iter().collect();
                for id in collect_ids(nodes) {
                    if id.is_unassigned() {
                        continue;
                    }
                    if !seen.insert(id.clone()) {
                        return Err(MutationError::DuplicateIdentity(id));
                    }
                }
                Ok(())
            }

            Mutation::Delete { path } => {
                if path.is_empty() {
                    return Err(MutationError::InvalidStructure(
                        "The document forest cannot be deleted".to_string(),
                    ));
                }
                resolve(forest, path).ok_or_else(|| MutationError::stale(path))?;
                Ok(())
            }

            Mutation::SetAttributes { path, attributes } => {
                match resolve(forest, path).ok_or_else(|| MutationError::stale(path))? {
                    Node::Element(el) => {
                        let allowed = registry.allowed_attributes(doc.profile, el.region, el.kind);
                        let undeclared = attributes
                            .iter()
                            .find(|(name, value)| value.is_some() && !allowed.contains(*name));
                        match undeclared {
                            Some((name, _)) => Err(MutationError::UndeclaredAttribute {
                                kind: el.kind,
                                name: name.clone(),
                            }),
                            None => Ok(()),
                        }
                    }
                    Node::Opaque(_) => Ok(()),
                    _ => Err(MutationError::NotAnElement(path.clone())),
                }
            }

            Mutation::SetText { path, .. } => {
                match resolve(forest, path).ok_or_else(|| MutationError::stale(path))? {
                    Node::Text(_) => Ok(()),
                    Node::Flat(flat) if flat.paragraphs.is_empty() => {
                        Err(MutationError::InvalidStructure(format!(
                            "{} has no paragraph to edit",
                            path
                        )))
                    }
                    Node::Flat(_) => Ok(()),
                    _ => Err(MutationError::NotText(path.clone())),
                }
            }
        }
    }
}

fn split_last(path: &Path) -> Result<(Path, msdesc_tree::Step), MutationError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(step)) => Ok((parent, step.clone())),
        _ => Err(MutationError::stale(path)),
    }
}

fn set_flat_text(
    flat: &mut FlatText,
    value: &str,
    ids: &mut IdGenerator,
) -> Result<(), MutationError> {
    let template = flat
        .paragraphs
        .last()
        .map(|paragraph| paragraph.chain.clone())
        .ok_or_else(|| MutationError::InvalidStructure("flat body has no paragraph".to_string()))?;

    let lines: Vec<&str> = value.split('\n').collect();
    flat.paragraphs.truncate(lines.len());

    for (i, line) in lines.into_iter().enumerate() {
        match flat.paragraphs.get_mut(i) {
            Some(paragraph) => {
                let id = match paragraph.content.as_slice() {
                    [Node::Text(text)] => text.id.clone(),
                    _ => ids.new_id(),
                };
                paragraph.content = vec![Node::Text(Text {
                    id,
                    value: line.to_string(),
                })];
            }
            None => {
                let mut chain = template.clone();
                for link in &mut chain {
                    link.id = ids.new_id();
                }
                flat.paragraphs.push(FlatParagraph {
                    chain,
                    content: vec![Node::Text(Text {
                        id: ids.new_id(),
                        value: line.to_string(),
                    })],
                });
            }
        }
    }
    Ok(())
}

/// Assigns identities only where none is set yet
struct MissingIds<'a> {
    ids: &'a mut IdGenerator,
}

impl VisitorMut for MissingIds<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        if node.id().is_unassigned() {
            node.set_id(self.ids.new_id());
        }
        walk_node_mut(self, node);
    }

    fn visit_flat_mut(&mut self, flat: &mut FlatText) {
        for paragraph in &mut flat.paragraphs {
            for link in &mut paragraph.chain {
                if link.id.is_unassigned() {
                    link.id = self.ids.new_id();
                }
            }
        }
        walk_flat_mut(self, flat);
    }
}
