//! Default subtrees for newly added components.

use crate::engine::Guideline;
use crate::error::{GuidelineError, GuidelineResult};
use msdesc_schema::NumberingSpec;
use msdesc_tree::{children_matching, descendants_matching, IdGenerator, Kind, Node, NodeId, Path};
use tracing::debug;

/// How a synthesized component relates to its wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapping {
    /// No wrapper applies in this container
    Direct,
    /// Goes inside the wrapper already present at `index` among the container's children
    Existing { wrapper_id: NodeId, index: usize },
    /// The returned node is a new wrapper holding exactly the component
    Created { wrapper_id: NodeId },
}

/// Output of [`Guideline::synthesize_component`]
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    /// Subtree to insert: the component, or a new wrapper around it
    pub node: Node,
    pub element_id: NodeId,
    pub wrapping: Wrapping,
    /// Ordinal written into the numbering leaf
    pub ordinal: Option<usize>,
}

impl Synthesized {
    /// Path of every node in the subtree once inserted at `index` under `parent`
    pub fn paths_at(&self, parent: &Path, index: usize) -> Vec<(NodeId, Path)> {
        let mut out = Vec::new();
        let root = parent.child_node(index, &self.node);
        collect_paths(&self.node, root, &mut out);
        out
    }
}

fn collect_paths(node: &Node, path: Path, out: &mut Vec<(NodeId, Path)>) {
    out.push((node.id().clone(), path.clone()));
    for (index, child) in node.children().iter().enumerate() {
        collect_paths(child, path.child_node(index, child), out);
    }
}

impl Guideline<'_> {
    /// Build a fresh component of `kind` for insertion into `container`.
    ///
    /// `is_child` selects how sibling numbering counts existing instances:
    /// direct children of `container` when set, every outermost instance
    /// below it otherwise. Every node of the result carries a fresh identity.
    pub fn synthesize_component(
        &self,
        container: &Node,
        kind: Kind,
        is_child: bool,
        ids: &mut IdGenerator,
    ) -> GuidelineResult<Synthesized> {
        let registry = self.registry();
        let profile = self.profile();
        let rule = self.rule(kind)?;
        let container_kind = container.kind().ok_or_else(|| {
            GuidelineError::cannot_synthesize(
                kind,
                format!(
                    "container `{}` is not a known element",
                    container.node_kind()
                ),
            )
        })?;

        let mut element = registry
            .default_element_for(profile, kind)?
            .ok_or_else(|| GuidelineError::cannot_synthesize(kind, "no default element declared"))?;
        {
            let el = element.as_element_mut().ok_or_else(|| {
                GuidelineError::cannot_synthesize(kind, "default element is not an element")
            })?;
            if el.children.is_empty() {
                el.children = registry.default_children_for(profile, kind)?;
            }
        }

        let ordinal = match &rule.numbering {
            Some(numbering) => {
                let count = if is_child {
                    children_matching(container, kind).len()
                } else {
                    descendants_matching(container, kind, true).len()
                };
                let ordinal = count + 1;
                write_ordinal(&mut element, numbering, ordinal).ok_or_else(|| {
                    GuidelineError::cannot_synthesize(
                        kind,
                        "numbering leaf missing from default children",
                    )
                })?;
                debug!(kind = %kind, ordinal, "numbered new component");
                Some(ordinal)
            }
            None => None,
        };

        let existing = registry
            .wrapper_for(profile, kind, container_kind)
            .map(|wrapper| {
                let found = container
                    .children()
                    .iter()
                    .position(|child| child.is_kind(wrapper.kind));
                (wrapper.kind, found)
            });

        let (mut node, wrapper) = match existing {
            None => (element, None),
            Some((_, Some(index))) => (element, Some(index)),
            Some((wrapper_kind, None)) => {
                let mut wrapper = registry
                    .default_element_for(profile, wrapper_kind)?
                    .unwrap_or_else(|| Node::element(wrapper_kind, Vec::new()));
                if let Some(children) = wrapper.children_mut() {
                    *children = vec![element];
                }
                debug!(kind = %kind, wrapper = %wrapper_kind, "created wrapper");
                (wrapper, None)
            }
        };

        ids.assign_fresh_ids(&mut node);

        let (element_id, wrapping) = match (existing, wrapper) {
            (None, _) => (node.id().clone(), Wrapping::Direct),
            (Some(_), Some(index)) => {
                let wrapper_id = container.children()[index].id().clone();
                (node.id().clone(), Wrapping::Existing { wrapper_id, index })
            }
            (Some(_), None) => {
                let element_id = node
                    .children()
                    .first()
                    .map(|child| child.id().clone())
                    .ok_or_else(|| {
                        GuidelineError::cannot_synthesize(kind, "wrapper lost its component")
                    })?;
                (element_id, Wrapping::Created { wrapper_id: node.id().clone() })
            }
        };

        Ok(Synthesized {
            node,
            element_id,
            wrapping,
            ordinal,
        })
    }
}

/// Replace the text of the numbering leaf; `None` when the leaf is missing
fn write_ordinal(node: &mut Node, numbering: &NumberingSpec, ordinal: usize) -> Option<()> {
    let mut current = node;
    for kind in &numbering.leaf {
        current = current
            .children_mut()?
            .iter_mut()
            .find(|child| child.is_kind(*kind))?;
    }
    *current.children_mut()? = vec![Node::text(ordinal.to_string())];
    Some(())
}
