use msdesc_tree::NodeId;
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// Non-fatal finding reported alongside a transformation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,

    /// Short code of the check that produced it
    pub rule: String,

    pub message: String,

    /// Rendered path of the node, in the shape the walk was reading
    pub path: String,

    pub node_id: NodeId,

    pub suggestion: Option<String>,
}

/// Diagnostic raised while normalizing a document
pub type SerializationDiagnostic = Diagnostic;

impl Diagnostic {
    pub fn warning(
        rule: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
        node_id: NodeId,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            rule: rule.into(),
            message: message.into(),
            path: path.into(),
            node_id,
            suggestion: None,
        }
    }

    pub fn info(
        rule: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
        node_id: NodeId,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            ..Self::warning(rule, message, path, node_id)
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
