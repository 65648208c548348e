//! # msdesc transform
//!
//! Normalizes between the canonical tree (nested, as serialized) and the
//! editing tree (free-text bodies collapsed into flat nodes). Each shape
//! is a transform/invert pair and `invert(transform(x)) == x` holds for
//! every canonical input.

pub mod diagnostic;
pub mod pipeline;
pub mod shapes;

pub use diagnostic::{Diagnostic, DiagnosticLevel, SerializationDiagnostic};
pub use pipeline::{Pipeline, TransformOutput, Walk, LOOSE_FLAT_BODY, UNKNOWN_COMPONENT};
pub use shapes::{FreeTextShape, ShapeRegistry, ShapeRule, StructuredShape};
