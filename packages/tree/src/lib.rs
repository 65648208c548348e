//! # msdesc tree
//!
//! In-memory model of a manuscript description: node variants, kinds and
//! regions, process-assigned identities, structural paths and the read-only
//! addressing queries every other crate builds on.

pub mod addressing;
pub mod id_generator;
pub mod kind;
pub mod node;
pub mod path;
pub mod visitor;

pub use addressing::{
    children_matching, descendants_matching, find, parent_of, path_of, resolve, resolve_mut,
    resolve_children_mut,
};
pub use id_generator::{get_document_id, IdGenerator};
pub use kind::{Kind, Region, UnknownKind};
pub use node::{
    Attributes, ChainLink, Element, FlatParagraph, FlatText, Node, NodeId, NodeKind, Opaque, Text,
};
pub use path::{Path, Step};
pub use visitor::{collect_ids, Visitor, VisitorMut};
