//! Mana dice shared by all players.

use im::Vector;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Error, GameRng, ManaColor, Result};

/// The mana source: a bag of coloured dice with a per-turn take limit.
///
/// `count` is the number of dice the source holds when complete; fewer are
/// present while taken dice wait to be re-rolled at the end of the turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaSource {
    dice: Vector<ManaColor>,
    count: usize,
    limit: u32,
    used: u32,
}

/// An undoable change to the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceEdit {
    /// Take the die at `index` as this turn's die (counts against the limit).
    Take { index: usize, color: ManaColor },
    /// Inverse of `Take`.
    Untake { index: usize, color: ManaColor },
    /// Remove a die without using up the limit.
    Remove { index: usize, color: ManaColor },
    /// Inverse of `Remove`.
    Restore { index: usize, color: ManaColor },
    /// Change how many dice may be taken this turn.
    Limit(i32),
}

impl SourceEdit {
    #[must_use]
    pub fn inverse(&self) -> Self {
        match *self {
            SourceEdit::Take { index, color } => SourceEdit::Untake { index, color },
            SourceEdit::Untake { index, color } => SourceEdit::Take { index, color },
            SourceEdit::Remove { index, color } => SourceEdit::Restore { index, color },
            SourceEdit::Restore { index, color } => SourceEdit::Remove { index, color },
            SourceEdit::Limit(delta) => SourceEdit::Limit(-delta),
        }
    }
}

impl ManaSource {
    /// A freshly shuffled source of `count` dice.
    pub fn new(count: usize, rng: &mut GameRng) -> Self {
        assert!(count > 0, "source needs at least one die");
        let mut source = Self {
            dice: Vector::new(),
            count,
            limit: 1,
            used: 0,
        };
        source.shuffle(rng);
        source
    }

    /// Re-roll every die until at least half of them show a basic colour.
    ///
    /// Restores the full die count and resets the take limit.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let dice: Vector<ManaColor> = (0..self.count).map(|_| rng.roll_mana_die()).collect();
            let basic = dice.iter().filter(|c| c.is_basic()).count();
            if basic * 2 >= self.count {
                self.dice = dice;
                break;
            }
        }
        self.limit = 1;
        self.used = 0;
        debug!("source shuffled after {attempts} roll(s): {self}");
    }

    /// Re-roll the dice that left the source this turn and put them back.
    pub fn return_dice(&mut self, rng: &mut GameRng) {
        while self.dice.len() < self.count {
            self.dice.push_back(rng.roll_mana_die());
        }
        self.limit = 1;
        self.used = 0;
    }

    pub fn dice(&self) -> impl Iterator<Item = ManaColor> + '_ {
        self.dice.iter().copied()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<ManaColor> {
        self.dice.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Dice in a complete source.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Dice taken against the limit this turn.
    #[must_use]
    pub fn used(&self) -> u32 {
        self.used
    }

    #[must_use]
    pub fn contains(&self, color: ManaColor) -> bool {
        self.dice.iter().any(|&c| c == color)
    }

    #[must_use]
    pub fn index_of(&self, color: ManaColor) -> Option<usize> {
        self.dice.iter().position(|&c| c == color)
    }

    /// Check that the die at `index` may be taken now.
    pub fn plan_take(&self, index: usize, night_rules: bool) -> Result<SourceEdit> {
        if self.used >= self.limit {
            return Err(Error::invalid("You cannot take more dice from the source."));
        }
        let color = self
            .get(index)
            .ok_or_else(|| Error::invalid("There is no such die in the source."))?;
        if color == ManaColor::Black && !night_rules {
            return Err(Error::invalid("You must not use black mana during day."));
        }
        if color == ManaColor::Gold && night_rules {
            return Err(Error::invalid("You must not use gold mana during night."));
        }
        Ok(SourceEdit::Take { index, color })
    }

    /// Like [`plan_take`](Self::plan_take), but looks the die up by colour.
    pub fn plan_take_color(&self, color: ManaColor, night_rules: bool) -> Result<SourceEdit> {
        let index = self
            .index_of(color)
            .ok_or_else(|| Error::invalid(format!("There is no {color} die in the source.")))?;
        self.plan_take(index, night_rules)
    }

    /// Remove a die of `color` without counting against the limit.
    pub fn plan_remove(&self, color: ManaColor) -> Result<SourceEdit> {
        let index = self
            .index_of(color)
            .ok_or_else(|| Error::invalid(format!("There is no {color} die in the source.")))?;
        Ok(SourceEdit::Remove { index, color })
    }

    /// Apply an edit. Fails without changes if the source does not match.
    pub fn apply(&mut self, edit: &SourceEdit) -> Result<()> {
        match *edit {
            SourceEdit::Take { index, color } | SourceEdit::Remove { index, color } => {
                if self.get(index) != Some(color) {
                    return Err(Error::invalid("source does not match edit"));
                }
                self.dice.remove(index);
                if matches!(edit, SourceEdit::Take { .. }) {
                    self.used += 1;
                }
            }
            SourceEdit::Untake { index, color } | SourceEdit::Restore { index, color } => {
                if index > self.dice.len() || self.dice.len() >= self.count {
                    return Err(Error::invalid("source does not match edit"));
                }
                if matches!(edit, SourceEdit::Untake { .. }) {
                    if self.used == 0 {
                        return Err(Error::invalid("source does not match edit"));
                    }
                    self.used -= 1;
                }
                self.dice.insert(index, color);
            }
            SourceEdit::Limit(delta) => {
                let limit = i64::from(self.limit) + i64::from(delta);
                self.limit = u32::try_from(limit)
                    .map_err(|_| Error::invalid("source limit cannot be negative"))?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ManaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, color) in self.dice.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{color}")?;
        }
        f.write_str("]")
    }
}
