//! Face-down enemy piles.

use im::Vector;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Error, GameRng, Result};

use super::definition::{EnemyCategory, EnemyId};
use super::registry::EnemyRegistry;

/// An undoable change to the discard piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEdit {
    Discard { category: EnemyCategory, enemy: EnemyId },
    /// Take the most recent discard of `category` back.
    Undiscard { category: EnemyCategory, enemy: EnemyId },
}

impl PoolEdit {
    #[must_use]
    pub fn inverse(&self) -> Self {
        match *self {
            PoolEdit::Discard { category, enemy } => PoolEdit::Undiscard { category, enemy },
            PoolEdit::Undiscard { category, enemy } => PoolEdit::Discard { category, enemy },
        }
    }
}

/// One draw pile and one discard pile per enemy category.
///
/// Drawing is random and therefore reveals information; callers clear the
/// undo history before applying a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPool {
    piles: [Vector<EnemyId>; 6],
    discards: [Vector<EnemyId>; 6],
}

impl EnemyPool {
    /// Piles holding `count` copies of every registered enemy.
    #[must_use]
    pub fn new(registry: &EnemyRegistry) -> Self {
        let mut pool = Self::default();
        for category in EnemyCategory::ALL {
            for enemy in registry.by_category(category) {
                for _ in 0..enemy.count {
                    pool.piles[category.index()].push_back(enemy.id);
                }
            }
        }
        pool
    }

    /// Tokens left face down in `category`.
    #[must_use]
    pub fn remaining(&self, category: EnemyCategory) -> usize {
        self.piles[category.index()].len()
    }

    #[must_use]
    pub fn discarded(&self, category: EnemyCategory) -> usize {
        self.discards[category.index()].len()
    }

    /// Draw a random token. An exhausted pile is refilled from its discards.
    pub fn draw(&mut self, category: EnemyCategory, rng: &mut GameRng) -> Option<EnemyId> {
        let i = category.index();
        if self.piles[i].is_empty() {
            debug!("{category} pile exhausted, reshuffling {} discards", self.discards[i].len());
            self.piles[i] = std::mem::take(&mut self.discards[i]);
        }
        let index = rng.pick_index(self.piles[i].len())?;
        Some(self.piles[i].remove(index))
    }

    /// Put a defeated or unused token on the discard pile.
    pub fn discard(&mut self, category: EnemyCategory, enemy: EnemyId) {
        self.discards[category.index()].push_back(enemy);
    }

    /// Apply an edit. Undiscarding fails unless `enemy` is the top discard.
    pub fn apply(&mut self, edit: &PoolEdit) -> Result<()> {
        match *edit {
            PoolEdit::Discard { category, enemy } => self.discard(category, enemy),
            PoolEdit::Undiscard { category, enemy } => {
                let discards = &mut self.discards[category.index()];
                if discards.last() != Some(&enemy) {
                    return Err(Error::invalid("enemy discards do not match edit"));
                }
                discards.pop_back();
            }
        }
        Ok(())
    }
}
