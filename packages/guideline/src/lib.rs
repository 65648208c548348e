//! # msdesc guideline
//!
//! Decides where components may go. Everything here reads the schema
//! registry and a summary tree derived from the live document; nothing
//! mutates the document.

pub mod engine;
pub mod error;
pub mod ordering;
pub mod summary;
pub mod synthesize;

pub use engine::Guideline;
pub use error::{GuidelineError, GuidelineResult};
pub use ordering::OrderingViolation;
pub use summary::{build_summary, SummaryEntry, SummaryIter, SummaryTree};
pub use synthesize::{Synthesized, Wrapping};
