//! Turn phases.

use serde::{Deserialize, Serialize};

/// What the current player is doing.
///
/// The combat phases run in declaration order, from `InitCombat` to
/// `CombatEnd`; a combat that produced rewards goes through
/// `CombatRewards` to `EndOfTurn` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Movement,
    Interaction,
    /// The player picked explore and is choosing where to put the tile.
    Explore,
    InitCombat,
    ProvokeMarauders,
    RangeAttack,
    Block,
    AssignDamage,
    Attack,
    CombatEnd,
    CombatRewards,
    EndOfTurn,
}

impl Phase {
    /// Phases during which a combat is being fought.
    #[must_use]
    pub const fn is_combat(self) -> bool {
        matches!(
            self,
            Phase::InitCombat
                | Phase::ProvokeMarauders
                | Phase::RangeAttack
                | Phase::Block
                | Phase::AssignDamage
                | Phase::Attack
        )
    }

    /// Phases in which cards may be played and units activated.
    #[must_use]
    pub const fn allows_cards(self) -> bool {
        matches!(
            self,
            Phase::Movement | Phase::Interaction | Phase::RangeAttack | Phase::Block | Phase::Attack
        )
    }

    /// Phases from which the turn may be ended.
    #[must_use]
    pub const fn allows_end_of_turn(self) -> bool {
        matches!(
            self,
            Phase::Movement | Phase::Interaction | Phase::CombatEnd | Phase::EndOfTurn
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Movement => "Movement",
            Phase::Interaction => "Interaction",
            Phase::Explore => "Explore",
            Phase::InitCombat => "Combat",
            Phase::ProvokeMarauders => "Provoke Marauders",
            Phase::RangeAttack => "Ranged Attack",
            Phase::Block => "Block",
            Phase::AssignDamage => "Assign Damage",
            Phase::Attack => "Attack",
            Phase::CombatEnd => "Combat End",
            Phase::CombatRewards => "Combat Rewards",
            Phase::EndOfTurn => "End of Turn",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combat_phases_are_contiguous() {
        let combat: Vec<Phase> = [
            Phase::Movement,
            Phase::InitCombat,
            Phase::ProvokeMarauders,
            Phase::RangeAttack,
            Phase::Block,
            Phase::AssignDamage,
            Phase::Attack,
            Phase::CombatEnd,
        ]
        .into_iter()
        .filter(|p| p.is_combat())
        .collect();
        assert_eq!(combat.len(), 6);
        assert!(combat.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_card_phases() {
        assert!(Phase::Block.allows_cards());
        assert!(!Phase::AssignDamage.allows_cards());
        assert!(!Phase::CombatRewards.allows_cards());
        assert!(Phase::CombatEnd.allows_end_of_turn());
        assert!(!Phase::Attack.allows_end_of_turn());
    }
}
