//! # Post-Effect System
//!
//! Mutations can trigger follow-up edits that keep the document consistent.
//!
//! ## Design
//!
//! After a mutation commits, every registered effect inspects it against
//! the already mutated document and returns secondary mutations. Those are
//! applied in order, each committed on its own and each with its own
//! notifications. Currently:
//! - Deleting the last component inside a wrapper → delete the wrapper

use crate::document::Document;
use crate::mutations::{Mutation, MutationError, MutationResult};
use msdesc_schema::Registry;
use msdesc_tree::Node;
use std::collections::VecDeque;
use tracing::debug;

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Analyze the committed mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, doc: &Document, registry: &Registry) -> Vec<Mutation>;
}

/// Remove a wrapper left without content by a delete
#[derive(Debug)]
pub struct RemoveEmptyWrapper;

impl PostEffect for RemoveEmptyWrapper {
    fn analyze(&self, mutation: &Mutation, doc: &Document, registry: &Registry) -> Vec<Mutation> {
        let Mutation::Delete { path } = mutation else {
            return vec![];
        };
        let Some(parent_path) = path.parent().filter(|parent| !parent.is_empty()) else {
            return vec![];
        };
        let Some(Node::Element(wrapper)) = doc.resolve(&parent_path) else {
            return vec![];
        };
        if !registry.is_wrapper_kind(doc.profile, wrapper.kind) {
            return vec![];
        }

        let empty = match wrapper.children.as_slice() {
            [] => true,
            [only] => {
                let component = only
                    .kind()
                    .is_some_and(|kind| registry.is_component(doc.profile, kind));
                !component && only.text_content().trim().is_empty()
            }
            _ => false,
        };
        if !empty {
            return vec![];
        }

        debug!(kind = %wrapper.kind, path = %parent_path, "removing empty wrapper");
        vec![Mutation::delete(parent_path)]
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(RemoveEmptyWrapper)],
        }
    }

    /// Engine without effects
    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    pub fn add_effect(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(
        &self,
        mutation: &Mutation,
        doc: &Document,
        registry: &Registry,
    ) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(mutation, doc, registry);
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// Secondary mutations are analyzed in turn, so a cascade settles
    /// before this returns. A failing primary mutation leaves the document
    /// untouched.
    pub fn apply_with_effects(
        &self,
        mutation: Mutation,
        doc: &mut Document,
        registry: &Registry,
    ) -> Result<Vec<MutationResult>, MutationError> {
        let mut applied = Vec::new();
        self.apply_into(mutation, doc, registry, &mut applied)?;
        Ok(applied)
    }

    /// Same as [`PostEffectEngine::apply_with_effects`], collecting results
    /// into `applied` as they commit.
    ///
    /// On error `applied` holds every mutation committed before the failure.
    pub fn apply_into(
        &self,
        mutation: Mutation,
        doc: &mut Document,
        registry: &Registry,
        applied: &mut Vec<MutationResult>,
    ) -> Result<(), MutationError> {
        applied.push(doc.apply(&mutation, registry)?);

        let mut queue: VecDeque<Mutation> = self.analyze(&mutation, doc, registry).into();
        while let Some(secondary) = queue.pop_front() {
            applied.push(doc.apply(&secondary, registry)?);
            queue.extend(self.analyze(&secondary, doc, registry));
        }
        Ok(())
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdesc_schema::Profile;
    use msdesc_tree::Kind;

    fn document() -> Document {
        Document::from_nodes(
            "effects",
            Profile::Description,
            vec![Node::element(
                Kind::MsDesc,
                vec![
                    Node::element(Kind::Head, vec![]),
                    Node::element(
                        Kind::MsContents,
                        vec![Node::element(Kind::MsItem, vec![])],
                    ),
                    Node::element(
                        Kind::PhysDesc,
                        vec![
                            Node::element(Kind::ObjectDesc, vec![]),
                            Node::element(Kind::HandDesc, vec![]),
                        ],
                    ),
                ],
            )],
        )
    }

    fn path_to(doc: &Document, indices: &[usize]) -> msdesc_tree::Path {
        let mut node = &doc.nodes()[indices[0]];
        for index in &indices[1..] {
            node = &node.children()[*index];
        }
        doc.path_of(node.id()).unwrap()
    }

    /// Follows every insert with a delete that never resolves
    #[derive(Debug)]
    struct DeleteMissing;

    impl PostEffect for DeleteMissing {
        fn analyze(&self, mutation: &Mutation, _: &Document, _: &Registry) -> Vec<Mutation> {
            match mutation {
                Mutation::Insert { .. } => vec![Mutation::delete(
                    msdesc_tree::Path::root()
                        .child(9, msdesc_tree::NodeKind::Element(Kind::Note)),
                )],
                _ => vec![],
            }
        }
    }

    #[test]
    fn test_failed_effect_keeps_committed_results() {
        let registry = Registry::builtin();
        let mut doc = document();
        let mut engine = PostEffectEngine::empty();
        engine.add_effect(Box::new(DeleteMissing));
        let msdesc = path_to(&doc, &[0]);
        let mut applied = Vec::new();

        let err = engine
            .apply_into(
                Mutation::insert(msdesc, 0, vec![Node::element(Kind::Note, vec![])]),
                &mut doc,
                &registry,
                &mut applied,
            )
            .unwrap_err();

        assert!(matches!(err, MutationError::StaleAddress { .. }));
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].version, 1);
        assert_eq!(doc.version, 1);
        assert!(doc.nodes()[0].children()[0].is_kind(Kind::Note));
    }

    #[test]
    fn test_post_effect_engine_creation() {
        let engine = PostEffectEngine::new();
        assert_eq!(engine.effects.len(), 1);
        assert!(PostEffectEngine::empty().effects.is_empty());
    }

    #[test]
    fn test_deleting_last_component_removes_wrapper() {
        let registry = Registry::builtin();
        let mut doc = document();
        let item = path_to(&doc, &[0, 1, 0]);

        let applied = PostEffectEngine::new()
            .apply_with_effects(Mutation::delete(item), &mut doc, &registry)
            .unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(doc.version, 2);
        let sections: Vec<_> = doc.nodes()[0]
            .children()
            .iter()
            .filter_map(Node::kind)
            .collect();
        assert_eq!(sections, vec![Kind::Head, Kind::PhysDesc]);
    }

    #[test]
    fn test_wrapper_with_remaining_component_is_kept() {
        let registry = Registry::builtin();
        let mut doc = document();
        let object = path_to(&doc, &[0, 2, 0]);

        let applied = PostEffectEngine::new()
            .apply_with_effects(Mutation::delete(object), &mut doc, &registry)
            .unwrap();

        assert_eq!(applied.len(), 1);
        assert_eq!(doc.nodes()[0].children()[2].children().len(), 1);
    }
}
