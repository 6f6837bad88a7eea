//! Enemies taking part in a combat.

use serde::{Deserialize, Serialize};

use crate::core::Element;
use crate::enemies::{EnemyAttack, EnemyDefinition};
use crate::map::HexCoord;

/// Identifier of an enemy within one combat. Stable while the combat lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatEnemyId(pub u32);

impl std::fmt::Display for CombatEnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An enemy token in combat, with its combat-scoped state.
///
/// Dead enemies stay in the combat (with `is_alive == false`) until the
/// combat ends; they are never active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyInCombat {
    pub id: CombatEnemyId,
    pub enemy: EnemyDefinition,
    /// Site the enemy defends, if any.
    pub site: Option<HexCoord>,
    pub is_alive: bool,
    pub is_selected: bool,
    pub is_blocked: bool,
    /// Marauders next to the player that may be left out of the combat.
    pub is_provokable: bool,
    /// Damage still to be assigned.
    pub damage: u32,
    /// Enemy called by a summoner for this combat.
    pub summoned: Option<EnemyDefinition>,
}

impl EnemyInCombat {
    #[must_use]
    pub fn new(id: CombatEnemyId, enemy: EnemyDefinition, site: Option<HexCoord>, provokable: bool) -> Self {
        let damage = enemy.damage();
        Self {
            id,
            enemy,
            site,
            is_alive: true,
            is_selected: false,
            is_blocked: false,
            is_provokable: provokable,
            damage,
            summoned: None,
        }
    }

    /// The token whose attack is used: the summoned enemy if there is one.
    #[must_use]
    pub fn attacker(&self) -> &EnemyDefinition {
        self.summoned.as_ref().unwrap_or(&self.enemy)
    }

    #[must_use]
    pub fn attack_value(&self) -> u32 {
        self.attacker().attack.value()
    }

    #[must_use]
    pub fn attack_element(&self) -> Element {
        self.attacker().attack.element()
    }

    /// Whether the enemy is a summoner still waiting for its summon.
    #[must_use]
    pub fn needs_summon(&self) -> bool {
        self.is_alive && self.summoned.is_none() && matches!(self.enemy.attack, EnemyAttack::Summon(_))
    }

    /// Alive, unblocked and with an attack of its own or summoned.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.is_alive && !self.is_blocked && !matches!(self.attacker().attack, EnemyAttack::Summon(_))
    }
}

impl std::fmt::Display for EnemyInCombat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.enemy.name)
    }
}
