//! # Guideline Engine
//!
//! Pure queries over a profile and a summary tree: which components may be
//! added after an existing one, which may be added inside a container, and
//! where a new component lands among existing siblings.
//!
//! Two special rules are applied to every kind that triggers them and are
//! logged at debug level when they fire:
//!
//! - a self-following kind offers only its own kind after its last instance
//! - a kind that needs a wrapper in its container, inserted into an empty
//!   sibling list, lands at index 1
//!
//! `Registry::review_flags` lists the kinds that can trigger them.

use crate::error::{GuidelineError, GuidelineResult};
use crate::summary::{SummaryEntry, SummaryTree};
use msdesc_schema::{Profile, Registry, Rule};
use msdesc_tree::{Kind, NodeId};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Guideline<'a> {
    registry: &'a Registry,
    profile: Profile,
}

impl<'a> Guideline<'a> {
    pub fn new(registry: &'a Registry, profile: Profile) -> Self {
        Self { registry, profile }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub(crate) fn rule(&self, kind: Kind) -> GuidelineResult<&'a Rule> {
        Ok(self.registry.require_rule(self.profile, kind)?)
    }

    /// Kinds that may be inserted directly after `target`
    pub fn allowed_follower_components(
        &self,
        tree: &SummaryTree,
        target: &NodeId,
    ) -> GuidelineResult<Vec<Kind>> {
        let entry = tree
            .find(target)
            .ok_or_else(|| GuidelineError::UnknownComponent(target.clone()))?;
        let siblings = tree.siblings_of(target).unwrap_or_default();
        let position = siblings
            .iter()
            .position(|sibling| &sibling.id == target)
            .unwrap_or(0);
        let next = siblings.get(position + 1);

        let container = match tree.parent_of(target) {
            Some(parent) => parent.kind,
            None => self.registry.type_root(self.profile)?,
        };
        let target_rule = self.rule(entry.kind)?;
        let present: Vec<Kind> = siblings.iter().map(|s| s.kind).collect();

        let mut candidates = Vec::new();
        for rule in self.candidates(container, &present)? {
            if !(target_rule.allows_follower(rule.kind) && rule.allows_predecessor(entry.kind)) {
                continue;
            }
            if let Some(next) = next {
                let next_rule = self.rule(next.kind)?;
                if !(rule.allows_follower(next.kind) && next_rule.allows_predecessor(rule.kind)) {
                    continue;
                }
            }
            candidates.push(rule.kind);
        }

        let last_of_kind = !siblings
            .get(position + 1..)
            .unwrap_or_default()
            .iter()
            .any(|sibling| sibling.kind == entry.kind);
        if last_of_kind && target_rule.is_self_similar() {
            debug!(kind = %entry.kind, id = %target, "self-similar follower restriction");
            candidates.retain(|kind| *kind == entry.kind);
        }

        Ok(self.sorted(candidates))
    }

    /// Kinds that may be inserted as children of `target`
    pub fn allowed_child_components(
        &self,
        tree: &SummaryTree,
        target: &NodeId,
    ) -> GuidelineResult<Vec<Kind>> {
        let entry = tree
            .find(target)
            .ok_or_else(|| GuidelineError::UnknownComponent(target.clone()))?;
        let present = entry.child_kinds();
        let kinds = self
            .candidates(entry.kind, &present)?
            .into_iter()
            .map(|rule| rule.kind)
            .collect();
        Ok(self.sorted(kinds))
    }

    /// First index among the components of `container` at which `kind`
    /// keeps the ordering valid
    pub fn first_valid_position(
        &self,
        container: Kind,
        siblings: &[SummaryEntry],
        kind: Kind,
    ) -> GuidelineResult<usize> {
        let kinds: Vec<Kind> = siblings.iter().map(|sibling| sibling.kind).collect();
        self.first_valid_index(container, &kinds, kind)
    }

    /// Same as [`Guideline::first_valid_position`] over bare kinds.
    ///
    /// Falls back to appending when no index satisfies both neighbours.
    /// A kind that needs a wrapper inside `container` returns 1 for an
    /// empty list.
    pub fn first_valid_index(
        &self,
        container: Kind,
        siblings: &[Kind],
        kind: Kind,
    ) -> GuidelineResult<usize> {
        self.rule(kind)?;

        if siblings.is_empty() {
            if self.registry.wrapper_for(self.profile, kind, container).is_some() {
                debug!(kind = %kind, container = %container, "reserved wrapped index");
                return Ok(1);
            }
            return Ok(0);
        }

        for index in 0..=siblings.len() {
            let before = match index.checked_sub(1).map(|i| siblings[i]) {
                Some(prev) => self.precedes(prev, kind),
                None => true,
            };
            let after = match siblings.get(index) {
                Some(next) => self.precedes(kind, *next),
                None => true,
            };
            if before && after {
                return Ok(index);
            }
        }

        Ok(siblings.len())
    }

    /// Whether `second` may directly follow `first` under both declared relations
    pub fn precedes(&self, first: Kind, second: Kind) -> bool {
        let rules = (
            self.registry.rule_for(self.profile, first),
            self.registry.rule_for(self.profile, second),
        );
        match rules {
            (Some(a), Some(b)) => a.allows_follower(second) && b.allows_predecessor(first),
            _ => false,
        }
    }

    fn candidates(&self, container: Kind, present: &[Kind]) -> GuidelineResult<Vec<&'a Rule>> {
        let container_rule = self.rule(container)?;
        let mut out = Vec::new();
        for kind in &container_rule.allowed_components {
            let rule = self.rule(*kind)?;
            if !rule.is_many() && present.contains(kind) {
                continue;
            }
            if !rule.allowed_containers.contains(&container) {
                continue;
            }
            out.push(rule);
        }
        Ok(out)
    }

    fn sorted(&self, mut kinds: Vec<Kind>) -> Vec<Kind> {
        kinds.sort_by_key(|kind| self.registry.insert_rank(self.profile, *kind));
        kinds.dedup();
        kinds
    }
}
