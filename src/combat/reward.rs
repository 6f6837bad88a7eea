//! Rewards earned by winning a combat.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, UnitId};
use crate::core::ManaColor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    /// Roll a mana die per crystal.
    Crystal,
    Artifact,
    Spell,
    AdvancedAction,
    Unit,
}

impl std::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RewardKind::Crystal => "Crystal",
            RewardKind::Artifact => "Artifact",
            RewardKind::Spell => "Spell",
            RewardKind::AdvancedAction => "Advanced Action",
            RewardKind::Unit => "Unit",
        };
        f.write_str(name)
    }
}

/// Something revealed for a reward: a card or unit to pick, or a rolled die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardItem {
    Card(CardId),
    Unit(UnitId),
    Die(ManaColor),
}

/// A reward still to be claimed.
///
/// `items` stays empty until the player picks this reward; then it holds the
/// revealed options (or the rolled dice of a crystal reward).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReward {
    pub kind: RewardKind,
    pub count: u32,
    pub items: Vector<RewardItem>,
}

impl CombatReward {
    #[must_use]
    pub fn new(kind: RewardKind, count: u32) -> Self {
        Self {
            kind,
            count,
            items: Vector::new(),
        }
    }

    /// Whether the options of this reward were revealed already.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        !self.items.is_empty()
    }
}

impl std::fmt::Display for CombatReward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x {}", self.count, self.kind)
    }
}
