//! # msdesc editor
//!
//! Document editing engine for manuscript descriptions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ transform: canonical forest ⇄ editing tree  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/export documents                    │
//! │  - Apply mutations with validation          │
//! │  - Post-effects (empty wrapper removal)     │
//! │  - Queue change notifications               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ guideline: summary tree, allowed components │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The live tree is the source of truth**: the summary is derived and
//!    rebuilt after every committed mutation
//! 2. **Single writer**: only mutations change the tree
//! 3. **Paths are checked, not trusted**: a drifted path fails instead of
//!    editing a different node
//! 4. **Deferred notifications**: observers hear about changes when the host
//!    drains the queue, never in the middle of an edit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use msdesc_editor::{Config, Editor, Placement};
//!
//! let config = Config::load(".")?;
//! msdesc_editor::logging::init_tracing(&config.log_filter);
//!
//! let mut editor = Editor::new(&config);
//! let diagnostics = editor.load(&canonical);
//!
//! let part = editor.add_component(&ms_desc_id, Kind::MsPart, Placement::Child)?;
//! for event in editor.drain_events() {
//!     // re-render
//! }
//!
//! let saved = editor.export();
//! ```

mod config;
mod document;
mod editor;
mod errors;
mod events;
pub mod logging;
mod mutations;
mod post_effects;

pub use config::{Config, DEFAULT_CONFIG_NAME};
pub use document::Document;
pub use editor::{Editor, Placement};
pub use errors::{EditorError, EditorResult};
pub use events::{ChangeEvent, ChangeMethod, EventQueue, SubscriptionId};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use post_effects::{PostEffect, PostEffectEngine, RemoveEmptyWrapper};
