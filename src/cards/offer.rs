//! The offers: units, advanced actions and spells on display, and the
//! face-down piles they are refilled from.
//!
//! Piles are shuffled once when the offers are created and drawn from the
//! front. Refilling reveals new cards, so it is never undoable; taking an
//! item from an offer is.

use im::Vector;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Error, GameRng, Result};

use super::definition::{CardId, CardKind};
use super::registry::{CardRegistry, UnitRegistry};
use super::units::UnitId;

/// Which offer an edit refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferKind {
    Units,
    AdvancedActions,
    Spells,
}

/// Something that can be on offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferItem {
    Card(CardId),
    Unit(UnitId),
}

/// An undoable change to an offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferEdit {
    Take { offer: OfferKind, index: usize, item: OfferItem },
    Return { offer: OfferKind, index: usize, item: OfferItem },
    /// Replace the artifact pile, used to put unchosen artifacts back.
    ArtifactPile { before: Vector<CardId>, after: Vector<CardId> },
}

impl OfferEdit {
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            &OfferEdit::Take { offer, index, item } => OfferEdit::Return { offer, index, item },
            &OfferEdit::Return { offer, index, item } => OfferEdit::Take { offer, index, item },
            OfferEdit::ArtifactPile { before, after } => OfferEdit::ArtifactPile {
                before: after.clone(),
                after: before.clone(),
            },
        }
    }
}

/// Every offer of a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offers {
    units: Vector<UnitId>,
    unit_pile: Vector<UnitId>,
    advanced_actions: Vector<CardId>,
    advanced_action_pile: Vector<CardId>,
    spells: Vector<CardId>,
    spell_pile: Vector<CardId>,
    artifact_pile: Vector<CardId>,
}

fn shuffled<T: Clone>(mut items: Vec<T>, rng: &mut GameRng) -> Vector<T> {
    rng.shuffle(&mut items);
    items.into_iter().collect()
}

impl Offers {
    /// Shuffle every pile. Offers start empty; see [`Offers::refill`].
    #[must_use]
    pub fn new(cards: &CardRegistry, units: &UnitRegistry, rng: &mut GameRng) -> Self {
        Self {
            units: Vector::new(),
            unit_pile: shuffled(units.deck(), rng),
            advanced_actions: Vector::new(),
            advanced_action_pile: shuffled(cards.ids_of_kind(CardKind::AdvancedAction), rng),
            spells: Vector::new(),
            spell_pile: shuffled(cards.ids_of_kind(CardKind::Spell), rng),
            artifact_pile: shuffled(cards.ids_of_kind(CardKind::Artifact), rng),
        }
    }

    pub fn units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().copied()
    }

    pub fn advanced_actions(&self) -> impl Iterator<Item = CardId> + '_ {
        self.advanced_actions.iter().copied()
    }

    pub fn spells(&self) -> impl Iterator<Item = CardId> + '_ {
        self.spells.iter().copied()
    }

    /// Items currently on display in `offer`.
    #[must_use]
    pub fn items(&self, offer: OfferKind) -> Vec<OfferItem> {
        match offer {
            OfferKind::Units => self.units.iter().map(|&u| OfferItem::Unit(u)).collect(),
            OfferKind::AdvancedActions => self
                .advanced_actions
                .iter()
                .map(|&c| OfferItem::Card(c))
                .collect(),
            OfferKind::Spells => self.spells.iter().map(|&c| OfferItem::Card(c)).collect(),
        }
    }

    #[must_use]
    pub fn artifacts_left(&self) -> usize {
        self.artifact_pile.len()
    }

    /// Top up each offer to the given size.
    pub fn refill(&mut self, units: usize, advanced_actions: usize, spells: usize) {
        while self.units.len() < units {
            match self.unit_pile.pop_front() {
                Some(unit) => self.units.push_back(unit),
                None => break,
            }
        }
        for (offer, pile, size) in [
            (&mut self.advanced_actions, &mut self.advanced_action_pile, advanced_actions),
            (&mut self.spells, &mut self.spell_pile, spells),
        ] {
            while offer.len() < size {
                match pile.pop_front() {
                    Some(card) => offer.push_back(card),
                    None => break,
                }
            }
        }
        debug!(
            "offers refilled: {} units, {} advanced actions, {} spells",
            self.units.len(),
            self.advanced_actions.len(),
            self.spells.len()
        );
    }

    /// Replace the whole unit offer; the old units go under the pile.
    pub fn refresh_units(&mut self, size: usize) {
        let old = std::mem::take(&mut self.units);
        self.unit_pile.append(old);
        self.refill(size, 0, 0);
    }

    /// Take up to `count` artifacts off the pile.
    pub fn draw_artifacts(&mut self, count: usize) -> Vec<CardId> {
        let count = count.min(self.artifact_pile.len());
        let rest = self.artifact_pile.split_off(count);
        let drawn = std::mem::replace(&mut self.artifact_pile, rest);
        drawn.into_iter().collect()
    }

    /// Put artifacts that were not chosen under the pile.
    pub fn return_artifacts(&mut self, artifacts: impl IntoIterator<Item = CardId>) {
        self.artifact_pile.extend(artifacts);
    }

    /// Plan putting `artifacts` under the artifact pile.
    #[must_use]
    pub fn plan_return_artifacts(&self, artifacts: &[CardId]) -> OfferEdit {
        let mut after = self.artifact_pile.clone();
        after.extend(artifacts.iter().copied());
        OfferEdit::ArtifactPile {
            before: self.artifact_pile.clone(),
            after,
        }
    }

    /// Plan taking the item at `index` of `offer`.
    pub fn plan_take(&self, offer: OfferKind, index: usize) -> Result<OfferEdit> {
        let item = self
            .items(offer)
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid("There is no such item on offer."))?;
        Ok(OfferEdit::Take { offer, index, item })
    }

    /// Apply an edit. Fails without changes if the offer does not match.
    pub fn apply(&mut self, edit: &OfferEdit) -> Result<()> {
        let mismatch = || Error::invalid("offer does not match edit");
        match *edit {
            OfferEdit::ArtifactPile {
                ref before,
                ref after,
            } => {
                if self.artifact_pile != *before {
                    return Err(mismatch());
                }
                self.artifact_pile = after.clone();
            }
            OfferEdit::Take { offer, index, item } => {
                if self.items(offer).get(index) != Some(&item) {
                    return Err(mismatch());
                }
                match offer {
                    OfferKind::Units => {
                        self.units.remove(index);
                    }
                    OfferKind::AdvancedActions => {
                        self.advanced_actions.remove(index);
                    }
                    OfferKind::Spells => {
                        self.spells.remove(index);
                    }
                }
            }
            OfferEdit::Return { offer, index, item } => match (offer, item) {
                (OfferKind::Units, OfferItem::Unit(unit)) if index <= self.units.len() => {
                    self.units.insert(index, unit);
                }
                (OfferKind::AdvancedActions, OfferItem::Card(card))
                    if index <= self.advanced_actions.len() =>
                {
                    self.advanced_actions.insert(index, card);
                }
                (OfferKind::Spells, OfferItem::Card(card)) if index <= self.spells.len() => {
                    self.spells.insert(index, card);
                }
                _ => return Err(mismatch()),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offers() -> Offers {
        let mut rng = GameRng::new(21);
        let mut offers = Offers::new(&CardRegistry::standard(), &UnitRegistry::standard(), &mut rng);
        offers.refill(3, 3, 3);
        offers
    }

    #[test]
    fn test_refill_fills_to_size() {
        let offers = offers();
        assert_eq!(offers.units().count(), 3);
        assert_eq!(offers.advanced_actions().count(), 3);
        assert_eq!(offers.spells().count(), 3);
        assert_eq!(offers.artifacts_left(), 4);
    }

    #[test]
    fn test_take_and_return() {
        let mut offers = offers();
        let before = offers.clone();
        let edit = offers.plan_take(OfferKind::Spells, 1).unwrap();
        offers.apply(&edit).unwrap();
        assert_eq!(offers.spells().count(), 2);
        assert!(offers.apply(&edit).is_err());

        let mut offers = before.clone();
        offers.apply(&edit).unwrap();
        offers.apply(&edit.inverse()).unwrap();
        assert_eq!(offers, before);
        assert!(offers.plan_take(OfferKind::Units, 7).is_err());
    }

    #[test]
    fn test_artifacts_cycle() {
        let mut offers = offers();
        let drawn = offers.draw_artifacts(2);
        assert_eq!(drawn.len(), 2);
        assert_eq!(offers.artifacts_left(), 2);
        offers.return_artifacts(drawn);
        assert_eq!(offers.artifacts_left(), 4);

        let drawn = offers.draw_artifacts(1);
        let edit = offers.plan_return_artifacts(&drawn);
        offers.apply(&edit).unwrap();
        assert_eq!(offers.artifacts_left(), 4);
        offers.apply(&edit.inverse()).unwrap();
        assert_eq!(offers.artifacts_left(), 3);
        assert_eq!(offers.draw_artifacts(9).len(), 3);
    }

    #[test]
    fn test_refresh_units_replaces_offer() {
        let mut offers = offers();
        let edit = offers.plan_take(OfferKind::Units, 0).unwrap();
        offers.apply(&edit).unwrap();
        assert_eq!(offers.units().count(), 2);

        offers.refresh_units(4);
        assert_eq!(offers.units().count(), 4);
    }
}
