//! # Structural Paths
//!
//! A path addresses a node by the sequence of child positions leading to it
//! from the document forest. Every step also records the discriminant of the
//! node expected at that position and, for paths taken from a live tree,
//! its identity. A path taken before an unrelated edit shifted its target
//! fails to resolve instead of silently pointing at a different node, even
//! when a sibling of the same kind moved into the slot.
//!
//! The rendered form (`msDesc[0]/msIdentifier[0]/idno[2]`) is for
//! diagnostics only. Comparisons always use the value type.

use crate::node::{Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One position in a path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub kind: NodeKind,
    /// Identity expected at this position; unchecked when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
}

impl Step {
    pub fn new(index: usize, kind: NodeKind) -> Self {
        Self {
            index,
            kind,
            id: None,
        }
    }

    /// Step onto `node` at `index`, pinned to its identity when it has one
    pub fn of(index: usize, node: &Node) -> Self {
        Self {
            index,
            kind: node.node_kind(),
            id: Some(node.id().clone()).filter(|id| !id.is_unassigned()),
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        node.node_kind() == self.kind && self.id.as_ref().map_or(true, |id| id == node.id())
    }
}

/// Ordered sequence of steps from the forest to a node.
///
/// The empty path addresses the forest itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Path of the child at `index`
    pub fn child(&self, index: usize, kind: NodeKind) -> Path {
        let mut steps = self.steps.clone();
        steps.push(Step::new(index, kind));
        Path { steps }
    }

    /// Path of `node` as the child at `index`, pinned to its identity
    pub fn child_node(&self, index: usize, node: &Node) -> Path {
        let mut steps = self.steps.clone();
        steps.push(Step::of(index, node));
        Path { steps }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }

    /// Path of the parent, `None` for the forest itself
    pub fn parent(&self) -> Option<Path> {
        if self.steps.is_empty() {
            return None;
        }
        Some(Path {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.steps.starts_with(&prefix.steps)
    }

    /// Steps after `prefix`, or `None` if `prefix` is not a prefix
    pub fn strip_prefix(&self, prefix: &Path) -> Option<&[Step]> {
        if self.starts_with(prefix) {
            Some(&self.steps[prefix.steps.len()..])
        } else {
            None
        }
    }

    /// Re-root a relative path under `prefix`
    pub fn join(&self, relative: &[Step]) -> Path {
        let mut steps = self.steps.clone();
        steps.extend_from_slice(relative);
        Path { steps }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("/");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}[{}]", step.kind, step.index)?;
        }
        Ok(())
    }
}
