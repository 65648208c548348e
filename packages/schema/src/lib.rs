//! # msdesc schema
//!
//! Per-profile structural rules: which components exist, where they may be
//! placed, how they are ordered and what a freshly synthesized one looks
//! like. The registry is immutable once built.

pub mod error;
pub mod profile;
pub mod profiles;
pub mod registry;
pub mod rule;
pub mod template;

pub use error::{SchemaError, SchemaResult};
pub use profile::Profile;
pub use registry::{ProfileSchema, Registry, ReviewFlag, SpecialRule};
pub use rule::{Cardinality, NumberingSpec, Rule, WrapperSpec};
pub use template::Template;
