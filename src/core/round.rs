//! Rounds alternate between day and night.

use serde::{Deserialize, Serialize};

use super::mana::ManaColor;

/// Each round is either a day or a night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// The other half of the cycle.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            TimeOfDay::Day => TimeOfDay::Night,
            TimeOfDay::Night => TimeOfDay::Day,
        }
    }

    /// Whether dice and tokens of `color` may be used at this time.
    ///
    /// Black mana is forbidden by day, gold mana by night.
    #[must_use]
    pub const fn allows(self, color: ManaColor) -> bool {
        !matches!(
            (self, color),
            (TimeOfDay::Day, ManaColor::Black) | (TimeOfDay::Night, ManaColor::Gold)
        )
    }
}

/// A numbered round of the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Round {
    /// Round number, starting at 1.
    pub number: u32,
    /// Day or night.
    pub time: TimeOfDay,
}

impl Round {
    /// The first round of a match.
    #[must_use]
    pub const fn first(time: TimeOfDay) -> Self {
        Self { number: 1, time }
    }

    /// The round after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            number: self.number + 1,
            time: self.time.flipped(),
        }
    }

    /// True during night rounds.
    #[must_use]
    pub const fn is_night(self) -> bool {
        matches!(self.time, TimeOfDay::Night)
    }
}
