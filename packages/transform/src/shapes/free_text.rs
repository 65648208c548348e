use super::chain::{collapse_runs, expand_runs};
use super::ShapeRule;
use crate::pipeline::Walk;
use msdesc_tree::{Element, Kind, Path};

/// Free-text body: runs of a fixed element chain become one flat node.
///
/// Children outside the chain are kept as they are and not walked.
pub struct FreeTextShape {
    kind: Kind,
    chain: Vec<Kind>,
}

impl FreeTextShape {
    pub fn new(kind: Kind, chain: &[Kind]) -> Self {
        Self {
            kind,
            chain: chain.to_vec(),
        }
    }
}

impl ShapeRule for FreeTextShape {
    fn name(&self) -> &'static str {
        "free-text"
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn transform(&self, mut element: Element, _walk: &mut Walk<'_>, _path: &Path) -> Element {
        let children = std::mem::take(&mut element.children);
        element.children = collapse_runs(children, &self.chain, |_, child| child);
        element
    }

    fn invert(&self, mut element: Element, _walk: &mut Walk<'_>, _path: &Path) -> Element {
        let children = std::mem::take(&mut element.children);
        element.children = expand_runs(children, |_, child| child);
        element
    }
}
