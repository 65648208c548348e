//! # Editor Facade
//!
//! Ties the live document to the rest of the engine. Hosts load a
//! canonical forest, edit through guideline-checked operations and export
//! the canonical forest back.
//!
//! ```text
//! add_component(anchor, kind, placement)
//!   → allowed set check      (guideline)
//!   → synthesize subtree     (guideline)
//!   → normalize subtree      (transform)
//!   → pick position          (guideline)
//!   → Insert                 (mutations + post-effects)
//!   → rebuild summary, queue notifications
//! ```
//!
//! Notifications stay queued until the host calls [`Editor::drain_events`],
//! so the summary is always rebuilt before any observer hears about a change.

use crate::config::Config;
use crate::document::Document;
use crate::errors::{EditorError, EditorResult};
use crate::events::{ChangeEvent, EventQueue, SubscriptionId};
use crate::mutations::{Mutation, MutationResult};
use crate::post_effects::{PostEffect, PostEffectEngine};
use msdesc_guideline::{build_summary, Guideline, SummaryTree, Wrapping};
use msdesc_schema::{Profile, Registry};
use msdesc_transform::{Diagnostic, Pipeline, TransformOutput};
use msdesc_tree::{find, Kind, Node, NodeId, Path};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a new component goes relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Among the anchor's children
    Child,
    /// Directly after the anchor, among its siblings
    After,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Child => f.write_str("inside"),
            Placement::After => f.write_str("after"),
        }
    }
}

/// Component position among a parent's children, for ordering purposes
struct Slot {
    kind: Kind,
    id: NodeId,
    /// Index of the child holding the component, the wrapper for wrapped ones
    node_index: usize,
}

#[derive(Debug)]
pub struct Editor {
    registry: Arc<Registry>,
    pipeline: Pipeline,
    effects: PostEffectEngine,
    document: Document,
    summary: SummaryTree,
    events: EventQueue,
}

impl Editor {
    /// Editor over an empty document with the built-in rule tables
    pub fn new(config: &Config) -> Self {
        Self::with_registry(config, Arc::new(Registry::builtin()))
    }

    pub fn with_registry(config: &Config, registry: Arc<Registry>) -> Self {
        Self {
            registry,
            pipeline: Pipeline::new(),
            effects: PostEffectEngine::new(),
            document: Document::new(config.id_seed.clone(), config.profile),
            summary: SummaryTree::default(),
            events: EventQueue::new(),
        }
    }

    /// Replace the document with a canonical forest.
    ///
    /// Every node gets a fresh identity. Returns what the transformation
    /// reported; unknown markup is kept and listed there.
    pub fn load(&mut self, canonical: &[Node]) -> Vec<Diagnostic> {
        let mut document = Document::from_nodes(
            self.document.name.clone(),
            self.document.profile,
            canonical.to_vec(),
        );
        let output = self.pipeline.transform(document.nodes());
        document.set_nodes(output.data);
        self.document = document;
        self.refresh_summary();

        info!(
            profile = %self.document.profile,
            components = self.summary.len(),
            diagnostics = output.diagnostics.len(),
            "loaded document"
        );
        output.diagnostics
    }

    /// Canonical forest of the current document
    pub fn export(&self) -> TransformOutput {
        self.pipeline.invert(self.document.nodes())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn summary(&self) -> &SummaryTree {
        &self.summary
    }

    pub fn guideline(&self) -> Guideline<'_> {
        Guideline::new(&self.registry, self.document.profile)
    }

    pub fn allowed_followers(&self, anchor: &NodeId) -> EditorResult<Vec<Kind>> {
        Ok(self.guideline().allowed_follower_components(&self.summary, anchor)?)
    }

    pub fn allowed_children(&self, anchor: &NodeId) -> EditorResult<Vec<Kind>> {
        Ok(self.guideline().allowed_child_components(&self.summary, anchor)?)
    }

    /// Add a default component of `kind` next to or inside `anchor`.
    ///
    /// Returns the identity of the new component element. Nothing changes
    /// when any step fails.
    pub fn add_component(
        &mut self,
        anchor: &NodeId,
        kind: Kind,
        placement: Placement,
    ) -> EditorResult<NodeId> {
        let not_allowed = || EditorError::NotAllowed {
            kind,
            anchor: anchor.clone(),
            placement,
        };

        let allowed = match placement {
            Placement::Child => self.allowed_children(anchor)?,
            Placement::After => self.allowed_followers(anchor)?,
        };
        if !allowed.contains(&kind) {
            return Err(not_allowed());
        }

        let container_id = match placement {
            Placement::Child => anchor.clone(),
            Placement::After => self
                .summary
                .find(anchor)
                .and_then(|entry| entry.parent_id.clone())
                .ok_or_else(not_allowed)?,
        };
        let container_path = self
            .document
            .path_of(&container_id)
            .ok_or_else(|| EditorError::UnknownComponent(container_id.clone()))?;

        let profile = self.document.profile;
        let guideline = Guideline::new(&self.registry, profile);
        let (forest, ids) = self.document.split_ids();
        let container = find(forest, &container_id)
            .ok_or_else(|| EditorError::UnknownComponent(container_id.clone()))?;
        let container_kind = container.kind().ok_or_else(not_allowed)?;
        let synthesized =
            guideline.synthesize_component(container, kind, placement == Placement::Child, ids)?;

        let (parent_path, parent) = match &synthesized.wrapping {
            Wrapping::Existing { index, .. } => {
                let wrapper = container.children().get(*index).ok_or_else(not_allowed)?;
                (container_path.child_node(*index, wrapper), wrapper)
            }
            Wrapping::Direct | Wrapping::Created { .. } => (container_path, container),
        };

        let slots = component_slots(&self.registry, profile, parent);
        let anchored = match placement {
            Placement::After => slots.iter().position(|slot| &slot.id == anchor),
            Placement::Child => None,
        };
        let k = match anchored {
            Some(position) => position + 1,
            None => guideline.first_valid_index(container_kind, &kinds(&slots), kind)?,
        };
        let index = node_index(&slots, k, parent.children().len());

        let normalized = self.pipeline.transform(std::slice::from_ref(&synthesized.node));
        for diagnostic in &normalized.diagnostics {
            warn!(rule = %diagnostic.rule, path = %diagnostic.path, "{}", diagnostic.message);
        }

        debug!(kind = %kind, parent = %parent_path, index, "adding component");
        self.apply(Mutation::insert(parent_path, index, normalized.data))?;
        Ok(synthesized.element_id)
    }

    pub fn insert(
        &mut self,
        parent: Path,
        index: usize,
        nodes: Vec<Node>,
    ) -> EditorResult<Vec<MutationResult>> {
        self.apply(Mutation::insert(parent, index, nodes))
    }

    pub fn delete(&mut self, path: Path) -> EditorResult<Vec<MutationResult>> {
        self.apply(Mutation::delete(path))
    }

    pub fn set_attributes(
        &mut self,
        path: Path,
        attributes: BTreeMap<String, Option<String>>,
    ) -> EditorResult<Vec<MutationResult>> {
        self.apply(Mutation::SetAttributes { path, attributes })
    }

    pub fn set_text(
        &mut self,
        path: Path,
        value: impl Into<String>,
    ) -> EditorResult<Vec<MutationResult>> {
        self.apply(Mutation::set_text(path, value))
    }

    /// Apply a mutation and its post-effects, then rebuild the summary and
    /// queue the notifications of everything that committed.
    ///
    /// When a post-effect fails, whatever committed before it stays in the
    /// document and is still summarized and queued before the error returns.
    pub fn apply(&mut self, mutation: Mutation) -> EditorResult<Vec<MutationResult>> {
        let mut applied = Vec::new();
        let outcome = self.effects.apply_into(
            mutation,
            &mut self.document,
            &self.registry,
            &mut applied,
        );

        if !applied.is_empty() {
            self.refresh_summary();
            for result in &applied {
                self.events.push(result.events.iter().cloned());
            }
        }
        if let Err(err) = outcome {
            if !applied.is_empty() {
                warn!(committed = applied.len(), error = %err, "post-effect failed after commit");
            }
            return Err(err.into());
        }
        Ok(applied)
    }

    /// Register a follow-up effect run after every committed mutation
    pub fn add_effect(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.add_effect(effect);
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&ChangeEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Deliver queued notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> Vec<ChangeEvent> {
        self.events.pending().cloned().collect()
    }

    fn refresh_summary(&mut self) {
        self.summary = build_summary(&self.registry, self.document.profile, self.document.nodes());
    }
}

/// Components under `parent` in document order, looking through wrappers
fn component_slots(registry: &Registry, profile: Profile, parent: &Node) -> Vec<Slot> {
    let mut slots = Vec::new();
    for (node_index, child) in parent.children().iter().enumerate() {
        let Some(kind) = child.kind() else { continue };
        if registry.is_component(profile, kind) {
            slots.push(Slot {
                kind,
                id: child.id().clone(),
                node_index,
            });
        } else if registry.is_wrapper_kind(profile, kind) {
            for inner in child.children() {
                let inner_kind = inner.kind().filter(|k| registry.is_component(profile, *k));
                if let Some(inner_kind) = inner_kind {
                    slots.push(Slot {
                        kind: inner_kind,
                        id: inner.id().clone(),
                        node_index,
                    });
                }
            }
        }
    }
    slots
}

fn kinds(slots: &[Slot]) -> Vec<Kind> {
    slots.iter().map(|slot| slot.kind).collect()
}

/// Child index for the `k`-th ordering position: right after the child
/// holding the previous component, or in front of the first one.
///
/// Without components the new one goes after the parent's own body, except
/// for the reserved wrapped index.
fn node_index(slots: &[Slot], k: usize, child_count: usize) -> usize {
    match k.checked_sub(1).and_then(|previous| slots.get(previous)) {
        Some(previous) => previous.node_index + 1,
        None => match slots.first() {
            Some(first) if k == 0 => first.node_index,
            _ if k == 0 => child_count,
            _ => k.min(child_count),
        },
    }
}
