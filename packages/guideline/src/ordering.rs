use crate::engine::Guideline;
use crate::summary::{SummaryEntry, SummaryTree};
use msdesc_tree::{Kind, NodeId};
use serde::Serialize;
use std::fmt;

/// Adjacent sibling pair that breaks the declared ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingViolation {
    pub first: NodeId,
    pub first_kind: Kind,
    pub second: NodeId,
    pub second_kind: Kind,
}

impl fmt::Display for OrderingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` ({}) may not be followed by `{}` ({})",
            self.first_kind, self.first, self.second_kind, self.second
        )
    }
}

impl Guideline<'_> {
    /// Every adjacent sibling pair of the summary tree that is out of order
    pub fn ordering_violations(&self, tree: &SummaryTree) -> Vec<OrderingViolation> {
        let mut out = Vec::new();
        self.check_siblings(&tree.roots, &mut out);
        for entry in tree.iter() {
            self.check_siblings(&entry.children, &mut out);
        }
        out
    }

    fn check_siblings(&self, siblings: &[SummaryEntry], out: &mut Vec<OrderingViolation>) {
        for pair in siblings.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if !self.precedes(a.kind, b.kind) {
                out.push(OrderingViolation {
                    first: a.id.clone(),
                    first_kind: a.kind,
                    second: b.id.clone(),
                    second_kind: b.kind,
                });
            }
        }
    }
}
