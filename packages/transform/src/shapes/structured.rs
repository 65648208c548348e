use super::chain::{collapse_runs, expand_runs};
use super::ShapeRule;
use crate::pipeline::Walk;
use msdesc_tree::{Element, Kind, Path};

/// Component with a flattenable body next to independently shaped siblings.
///
/// Body chains collapse like [`super::FreeTextShape`]; every other child
/// goes back through the pipeline, so nested components and side lists
/// get their own shape.
pub struct StructuredShape {
    kind: Kind,
    body: Vec<Kind>,
}

impl StructuredShape {
    pub fn new(kind: Kind, body: &[Kind]) -> Self {
        Self {
            kind,
            body: body.to_vec(),
        }
    }
}

impl ShapeRule for StructuredShape {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn transform(&self, mut element: Element, walk: &mut Walk<'_>, path: &Path) -> Element {
        let children = std::mem::take(&mut element.children);
        element.children = collapse_runs(children, &self.body, |index, child| {
            let child_path = path.child(index, child.node_kind());
            walk.transform_node(child, &child_path)
        });
        element
    }

    fn invert(&self, mut element: Element, walk: &mut Walk<'_>, path: &Path) -> Element {
        let children = std::mem::take(&mut element.children);
        element.children = expand_runs(children, |index, child| {
            let child_path = path.child(index, child.node_kind());
            walk.invert_node(child, &child_path)
        });
        element
    }
}
