//! # Tree Addressing
//!
//! Read-only queries mapping between node identities and structural paths
//! in a document forest. "Not found" is an ordinary outcome here: a detached
//! node simply has no path, and nothing in this module panics on it.

use crate::kind::Kind;
use crate::node::{Node, NodeId};
use crate::path::{Path, Step};

/// Node addressed by `path`, checking the discriminant and any pinned
/// identity at every step
pub fn resolve<'a>(forest: &'a [Node], path: &Path) -> Option<&'a Node> {
    let (first, rest) = path.steps().split_first()?;
    let mut node = step_into(forest, first)?;
    for step in rest {
        node = step_into(node.children(), step)?;
    }
    Some(node)
}

pub fn resolve_mut<'a>(forest: &'a mut [Node], path: &Path) -> Option<&'a mut Node> {
    let (first, rest) = path.steps().split_first()?;
    let mut node = step_into_mut(forest, first)?;
    for step in rest {
        node = step_into_mut(node.children_mut()?, step)?;
    }
    Some(node)
}

/// Child list addressed by `parent`; the empty path yields the forest
pub fn resolve_children_mut<'a>(
    forest: &'a mut Vec<Node>,
    parent: &Path,
) -> Option<&'a mut Vec<Node>> {
    if parent.is_empty() {
        return Some(forest);
    }
    resolve_mut(forest, parent)?.children_mut()
}

fn step_into<'a>(nodes: &'a [Node], step: &Step) -> Option<&'a Node> {
    nodes.get(step.index).filter(|node| step.matches(node))
}

fn step_into_mut<'a>(nodes: &'a mut [Node], step: &Step) -> Option<&'a mut Node> {
    nodes.get_mut(step.index).filter(|node| step.matches(node))
}

/// Path of the node with identity `id`, `None` when it is not in the forest
pub fn path_of(forest: &[Node], id: &NodeId) -> Option<Path> {
    let mut path = Path::root();
    if search(forest, id, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn search(nodes: &[Node], id: &NodeId, path: &mut Path) -> bool {
    for (index, node) in nodes.iter().enumerate() {
        path.push(Step::of(index, node));
        if node.id() == id || search(node.children(), id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Node with identity `id`
pub fn find<'a>(forest: &'a [Node], id: &NodeId) -> Option<&'a Node> {
    path_of(forest, id).and_then(|path| resolve(forest, &path))
}

/// Parent of the node with identity `id`.
///
/// `None` for top-level nodes and for nodes not in the forest.
pub fn parent_of<'a>(forest: &'a [Node], id: &NodeId) -> Option<&'a Node> {
    let path = path_of(forest, id)?;
    resolve(forest, &path.parent()?)
}

/// Direct children of `node` that are elements of `kind`
pub fn children_matching(node: &Node, kind: Kind) -> Vec<&Node> {
    node.children()
        .iter()
        .filter(|child| child.is_kind(kind))
        .collect()
}

/// Descendants of `node` that are elements of `kind`.
///
/// With `outermost_only` the walk does not descend into a match, so nested
/// occurrences of the same kind are not counted twice.
pub fn descendants_matching(node: &Node, kind: Kind, outermost_only: bool) -> Vec<&Node> {
    let mut out = Vec::new();
    collect_descendants(node.children(), kind, outermost_only, &mut out);
    out
}

fn collect_descendants<'a>(
    nodes: &'a [Node],
    kind: Kind,
    outermost_only: bool,
    out: &mut Vec<&'a Node>,
) {
    for node in nodes {
        let matched = node.is_kind(kind);
        if matched {
            out.push(node);
        }
        if !(matched && outermost_only) {
            collect_descendants(node.children(), kind, outermost_only, out);
        }
    }
}
