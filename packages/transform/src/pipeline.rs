//! Whole-forest walks between the canonical and the editing shape.
//!
//! The walk is depth-first. An element whose kind has a registered shape
//! is handed to that shape and the walk does not descend further on its
//! own; the shape decides what to recurse into. Unknown markup is carried
//! through unchanged and reported, never dropped.

use crate::diagnostic::Diagnostic;
use crate::shapes::ShapeRegistry;
use msdesc_tree::{Node, Opaque, Path};
use serde::Serialize;
use tracing::debug;

pub const UNKNOWN_COMPONENT: &str = "unknown-component";
pub const LOOSE_FLAT_BODY: &str = "loose-flat-body";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformOutput {
    pub data: Vec<Node>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct Pipeline {
    shapes: ShapeRegistry,
}

impl Pipeline {
    /// Pipeline with the built-in shapes
    pub fn new() -> Self {
        Self::with_shapes(ShapeRegistry::new())
    }

    pub fn with_shapes(shapes: ShapeRegistry) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Canonical forest to editing shape
    pub fn transform(&self, forest: &[Node]) -> TransformOutput {
        let mut walk = Walk::new(&self.shapes);
        let data = walk.transform_children(forest.to_vec(), &Path::root());
        debug!(diagnostics = walk.diagnostics.len(), "transformed forest");
        walk.finish(data)
    }

    /// Editing shape back to the canonical forest
    pub fn invert(&self, forest: &[Node]) -> TransformOutput {
        let mut walk = Walk::new(&self.shapes);
        let data = walk.invert_children(forest.to_vec(), &Path::root());
        debug!(diagnostics = walk.diagnostics.len(), "inverted forest");
        walk.finish(data)
    }
}

/// State of one walk; shapes call back into it to recurse
pub struct Walk<'a> {
    shapes: &'a ShapeRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Walk<'a> {
    fn new(shapes: &'a ShapeRegistry) -> Self {
        Self {
            shapes,
            diagnostics: Vec::new(),
        }
    }

    fn finish(self, data: Vec<Node>) -> TransformOutput {
        TransformOutput {
            data,
            diagnostics: self.diagnostics,
        }
    }

    pub fn transform_node(&mut self, node: Node, path: &Path) -> Node {
        let shapes = self.shapes;
        match node {
            Node::Element(el) => match shapes.rule_for(el.kind) {
                Some(shape) => Node::Element(shape.transform(el, self, path)),
                None => {
                    let mut el = el;
                    el.children = self.transform_children(std::mem::take(&mut el.children), path);
                    Node::Element(el)
                }
            },
            Node::Opaque(mut opaque) => {
                self.report_unknown(&opaque, path);
                let children = std::mem::take(&mut opaque.children);
                opaque.children = self.transform_children(children, path);
                Node::Opaque(opaque)
            }
            leaf => leaf,
        }
    }

    pub fn invert_node(&mut self, node: Node, path: &Path) -> Node {
        let shapes = self.shapes;
        match node {
            Node::Element(el) => match shapes.rule_for(el.kind) {
                Some(shape) => Node::Element(shape.invert(el, self, path)),
                None => {
                    let mut el = el;
                    el.children = self.invert_children(std::mem::take(&mut el.children), path);
                    Node::Element(el)
                }
            },
            Node::Opaque(mut opaque) => {
                self.report_unknown(&opaque, path);
                opaque.children = self.invert_children(std::mem::take(&mut opaque.children), path);
                Node::Opaque(opaque)
            }
            leaf => leaf,
        }
    }

    pub fn transform_children(&mut self, children: Vec<Node>, parent: &Path) -> Vec<Node> {
        children
            .into_iter()
            .enumerate()
            .map(|(index, child)| {
                let path = parent.child(index, child.node_kind());
                self.transform_node(child, &path)
            })
            .collect()
    }

    /// Invert `children`, expanding flat bodies found outside their shape
    pub fn invert_children(&mut self, children: Vec<Node>, parent: &Path) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let path = parent.child(index, child.node_kind());
            match child {
                Node::Flat(flat) => {
                    self.diagnostics.push(Diagnostic::info(
                        LOOSE_FLAT_BODY,
                        "Flat body outside a registered shape was expanded in place",
                        path.to_string(),
                        flat.id.clone(),
                    ));
                    out.extend(
                        flat.paragraphs
                            .into_iter()
                            .filter_map(crate::shapes::expand_paragraph),
                    );
                }
                other => out.push(self.invert_node(other, &path)),
            }
        }
        out
    }

    fn report_unknown(&mut self, opaque: &Opaque, path: &Path) {
        debug!(tag = %opaque.tag, path = %path, "unknown component passed through");
        self.diagnostics.push(
            Diagnostic::warning(
                UNKNOWN_COMPONENT,
                format!("Unknown component `{}` was passed through unchanged", opaque.tag),
                path.to_string(),
                opaque.id.clone(),
            )
            .with_suggestion("Check the markup against the cataloguing guidelines"),
        );
    }
}
