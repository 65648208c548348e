use msdesc_schema::SchemaError;
use msdesc_tree::{Kind, NodeId};
use thiserror::Error;

pub type GuidelineResult<T> = Result<T, GuidelineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuidelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Cannot synthesize `{kind}`: {reason}")]
    CannotSynthesize { kind: Kind, reason: String },

    #[error("Component {0} is not part of the summary tree")]
    UnknownComponent(NodeId),
}

impl GuidelineError {
    pub fn cannot_synthesize(kind: Kind, reason: impl Into<String>) -> Self {
        Self::CannotSynthesize {
            kind,
            reason: reason.into(),
        }
    }
}
