//! The ordered list of active effects.
//!
//! Mutation is two-step. `plan_add` / `plan_remove` look at the list and
//! produce an [`EffectEdit`] describing exactly one slot change; the edit
//! and its inverse are then pushed on the transaction stack, so undo puts
//! back precisely what was there, even when an entry was annihilated.

use im::Vector;
use log::trace;
use serde::{Deserialize, Serialize};

use super::effect::{Combination, Direction, Effect, EffectKind, ManaTokens};
use crate::core::{Error, Result};
use crate::map::{CostChange, Terrain};

/// Active effects of the current player, in canonical order.
///
/// At most one entry exists per points kind (and element/range), because
/// compatible effects merge in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectList {
    entries: Vector<Effect>,
}

/// A single-slot change to an [`EffectList`].
///
/// - `before: None, after: Some` inserts at `index`
/// - `before: Some, after: Some` replaces the entry at `index`
/// - `before: Some, after: None` removes the entry at `index`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEdit {
    pub index: usize,
    pub before: Option<Effect>,
    pub after: Option<Effect>,
}

impl EffectEdit {
    /// The edit that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            index: self.index,
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}

impl EffectList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Effect> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn contains(&self, effect: &Effect) -> bool {
        self.entries.iter().any(|e| e == effect)
    }

    /// First effect of `kind`, or the last one with `reverse`.
    #[must_use]
    pub fn find(&self, kind: EffectKind, reverse: bool) -> Option<&Effect> {
        if reverse {
            self.entries.iter().rev().find(|e| e.kind() == kind)
        } else {
            self.entries.iter().find(|e| e.kind() == kind)
        }
    }

    /// All effects of `kind`, in list order.
    pub fn find_all(&self, kind: EffectKind) -> impl Iterator<Item = &Effect> {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }

    fn sum_points(&self, kind: EffectKind) -> i32 {
        self.find_all(kind).filter_map(Effect::points).sum()
    }

    #[must_use]
    pub fn move_points(&self) -> i32 {
        self.sum_points(EffectKind::Move)
    }

    #[must_use]
    pub fn influence_points(&self) -> i32 {
        self.sum_points(EffectKind::Influence)
    }

    #[must_use]
    pub fn heal_points(&self) -> i32 {
        self.sum_points(EffectKind::Heal)
    }

    #[must_use]
    pub fn armor_reduction(&self) -> i32 {
        self.sum_points(EffectKind::ArmorReduction)
    }

    /// Banked mana tokens (empty if there are none).
    #[must_use]
    pub fn mana_tokens(&self) -> ManaTokens {
        match self.find(EffectKind::ManaTokens, false) {
            Some(Effect::ManaTokens(tokens)) => *tokens,
            _ => ManaTokens::new(),
        }
    }

    /// Bonus of the most recently added concentration modifier.
    #[must_use]
    pub fn concentration_bonus(&self) -> Option<i32> {
        match self.find(EffectKind::Concentration, true) {
            Some(Effect::Concentration(extra)) => Some(*extra),
            _ => None,
        }
    }

    #[must_use]
    pub fn has(&self, kind: EffectKind) -> bool {
        self.find(kind, false).is_some()
    }

    /// Most recently added cost change for `terrain`.
    #[must_use]
    pub fn terrain_cost_change(&self, terrain: Terrain) -> Option<CostChange> {
        self.entries.iter().rev().find_map(|e| match e {
            Effect::TerrainCost { terrain: t, change } if *t == terrain => Some(*change),
            _ => None,
        })
    }

    /// Plan adding `effect`.
    ///
    /// An active concentration modifier is added to amplifiable points
    /// first; the resulting magnitude is fixed from then on. The effect then
    /// merges into the first compatible entry or is inserted after the last
    /// entry whose kind does not sort after it, so entries of one kind stay
    /// in the order they were added.
    #[must_use]
    pub fn plan_add(&self, effect: &Effect) -> EffectEdit {
        debug_assert!(effect.is_well_formed(), "malformed effect {effect:?}");
        let effect = match (self.concentration_bonus(), effect.points()) {
            (Some(extra), Some(points)) if effect.is_amplifiable() => {
                trace!("concentration +{extra} on {effect}");
                effect.with_points(points + extra)
            }
            _ => effect.clone(),
        };

        for (index, entry) in self.entries.iter().enumerate() {
            match entry.combine(&effect, Direction::Add) {
                Combination::Unrelated | Combination::Insufficient => continue,
                Combination::Merged(merged) => {
                    trace!("merge {effect} into {entry} -> {merged}");
                    return EffectEdit {
                        index,
                        before: Some(entry.clone()),
                        after: Some(merged),
                    };
                }
                Combination::Annihilated => {
                    trace!("{effect} cancels {entry}");
                    return EffectEdit {
                        index,
                        before: Some(entry.clone()),
                        after: None,
                    };
                }
            }
        }

        let kind = effect.kind();
        let index = self
            .entries
            .iter()
            .position(|e| e.kind() > kind)
            .unwrap_or(self.entries.len());
        EffectEdit {
            index,
            before: None,
            after: Some(effect),
        }
    }

    /// Plan removing (paying) `effect`.
    ///
    /// Fails with [`Error::Insufficient`] if no entry matches or the
    /// matching entry does not hold enough.
    pub fn plan_remove(&self, effect: &Effect) -> Result<EffectEdit> {
        for (index, entry) in self.entries.iter().enumerate() {
            match entry.combine(effect, Direction::Remove) {
                Combination::Unrelated => continue,
                Combination::Merged(rest) => {
                    return Ok(EffectEdit {
                        index,
                        before: Some(entry.clone()),
                        after: Some(rest),
                    })
                }
                Combination::Annihilated => {
                    return Ok(EffectEdit {
                        index,
                        before: Some(entry.clone()),
                        after: None,
                    })
                }
                Combination::Insufficient => break,
            }
        }
        Err(Error::Insufficient {
            wanted: effect.to_string(),
        })
    }

    /// Apply a planned edit. Fails without changes if the list no longer
    /// matches what the edit was planned against.
    pub fn apply(&mut self, edit: &EffectEdit) -> Result<()> {
        match (&edit.before, &edit.after) {
            (None, Some(after)) => {
                if edit.index > self.entries.len() {
                    return Err(out_of_sync(edit));
                }
                self.entries.insert(edit.index, after.clone());
            }
            (Some(before), after) => {
                if self.entries.get(edit.index) != Some(before) {
                    return Err(out_of_sync(edit));
                }
                match after {
                    Some(after) => {
                        self.entries.set(edit.index, after.clone());
                    }
                    None => {
                        self.entries.remove(edit.index);
                    }
                }
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Add without history. Convenience for tests and previews.
    pub fn add(&mut self, effect: &Effect) {
        let edit = self.plan_add(effect);
        // planned against self, cannot be out of sync
        let _ = self.apply(&edit);
    }

    /// Remove without history. Convenience for tests and previews.
    pub fn remove(&mut self, effect: &Effect) -> Result<()> {
        let edit = self.plan_remove(effect)?;
        self.apply(&edit)
    }

    /// Drop everything (end of turn).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn out_of_sync(edit: &EffectEdit) -> Error {
    Error::invalid(format!(
        "effect list does not match edit at index {}",
        edit.index
    ))
}

impl FromIterator<Effect> for EffectList {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        let mut list = EffectList::new();
        for effect in iter {
            list.add(&effect);
        }
        list
    }
}
