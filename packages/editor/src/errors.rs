//! Error types for the editor

use crate::editor::Placement;
use crate::mutations::MutationError;
use msdesc_guideline::GuidelineError;
use msdesc_schema::SchemaError;
use msdesc_tree::{Kind, NodeId};
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Guideline error: {0}")]
    Guideline(#[from] GuidelineError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Component {0} is not in the summary tree")]
    UnknownComponent(NodeId),

    #[error("`{kind}` may not be added {placement} {anchor}")]
    NotAllowed {
        kind: Kind,
        anchor: NodeId,
        placement: Placement,
    },
}
