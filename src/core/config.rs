//! Match configuration.
//!
//! A match is configured once at startup. Every field has a rules-default,
//! so a partial JSON/RON document (or `MatchConfig::default()`) is enough:
//!
//! ```
//! use mage_knight::core::MatchConfig;
//!
//! let config = MatchConfig::solo(42);
//! assert_eq!(config.player_count(), 1);
//! assert_eq!(config.source_dice(), 3);
//! ```

use serde::{Deserialize, Serialize};

use super::round::TimeOfDay;

/// One of the playable heroes. Each starts with a slightly different deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hero {
    Norowas,
    Tovak,
    Arythea,
    Goldyx,
}

/// A seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,
    /// Hero played in this seat.
    pub hero: Hero,
}

impl PlayerConfig {
    /// Create a seat.
    pub fn new(name: impl Into<String>, hero: Hero) -> Self {
        Self {
            name: name.into(),
            hero,
        }
    }
}

/// Static configuration of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for every random event of the match.
    pub seed: u64,

    /// Seats, in turn order.
    pub players: Vec<PlayerConfig>,

    /// Dice in the mana source. `None` means players + 2.
    pub source_dice: Option<usize>,

    /// Cards drawn up to at end of turn.
    pub hand_limit: usize,

    /// Hero armor when assigning combat damage.
    pub hero_armor: u32,

    /// Starting position on the reputation track (-7..=7).
    pub starting_reputation: i8,

    /// Units on offer. `None` means players + 2.
    pub unit_offer_size: Option<usize>,

    /// Spells on offer.
    pub spell_offer_size: usize,

    /// Advanced actions on offer.
    pub advanced_action_offer_size: usize,

    /// Day or night in round 1.
    pub first_round: TimeOfDay,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            players: vec![PlayerConfig::new("Player 1", Hero::Tovak)],
            source_dice: None,
            hand_limit: 5,
            hero_armor: 2,
            starting_reputation: 0,
            unit_offer_size: None,
            spell_offer_size: 3,
            advanced_action_offer_size: 3,
            first_round: TimeOfDay::Day,
        }
    }
}

impl MatchConfig {
    /// Single player match with default settings.
    #[must_use]
    pub fn solo(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Hotseat match with the given seats.
    #[must_use]
    pub fn hotseat(seed: u64, players: Vec<PlayerConfig>) -> Self {
        Self {
            seed,
            players,
            ..Self::default()
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Effective number of source dice.
    #[must_use]
    pub fn source_dice(&self) -> usize {
        self.source_dice.unwrap_or(self.player_count() + 2)
    }

    /// Effective unit offer size.
    #[must_use]
    pub fn unit_offer_size(&self) -> usize {
        self.unit_offer_size.unwrap_or(self.player_count() + 2)
    }
}
