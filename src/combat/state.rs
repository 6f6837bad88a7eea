//! State of the combat in progress.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::game::Phase;
use crate::map::HexCoord;

use super::enemy::{CombatEnemyId, EnemyInCombat};
use super::reward::CombatReward;

/// Everything a combat tracks besides the match phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    /// Enemies in the order they joined. Dead enemies stay until the end.
    pub enemies: Vector<EnemyInCombat>,
    /// Sites whose enemies took part, each once, in order.
    pub sites: Vector<HexCoord>,
    pub rewards: Vector<CombatReward>,
    /// Index into `rewards` of the reward being claimed.
    pub current_reward: Option<usize>,
    /// Set once attack or block points were played in the current phase.
    pub effects_played: bool,
    pub units_allowed: bool,
    pub night_rules: bool,
    /// Wounds the hero took during this combat.
    pub hero_wounds: u32,
    /// Where the player is pushed back to if an assault fails.
    pub retreat_to: Option<HexCoord>,
}

/// An undoable change to the combat. Every variant stores the value before
/// and after, so the inverse is a swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEdit {
    Enemy {
        index: usize,
        before: EnemyInCombat,
        after: EnemyInCombat,
    },
    Enemies {
        before: Vector<EnemyInCombat>,
        after: Vector<EnemyInCombat>,
    },
    Sites {
        before: Vector<HexCoord>,
        after: Vector<HexCoord>,
    },
    Rewards {
        before: Vector<CombatReward>,
        after: Vector<CombatReward>,
    },
    CurrentReward {
        before: Option<usize>,
        after: Option<usize>,
    },
    EffectsPlayed {
        before: bool,
        after: bool,
    },
    HeroWounds {
        before: u32,
        after: u32,
    },
}

impl CombatEdit {
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            CombatEdit::Enemy {
                index,
                before,
                after,
            } => CombatEdit::Enemy {
                index: *index,
                before: after.clone(),
                after: before.clone(),
            },
            CombatEdit::Enemies { before, after } => CombatEdit::Enemies {
                before: after.clone(),
                after: before.clone(),
            },
            CombatEdit::Sites { before, after } => CombatEdit::Sites {
                before: after.clone(),
                after: before.clone(),
            },
            CombatEdit::Rewards { before, after } => CombatEdit::Rewards {
                before: after.clone(),
                after: before.clone(),
            },
            CombatEdit::CurrentReward { before, after } => CombatEdit::CurrentReward {
                before: *after,
                after: *before,
            },
            CombatEdit::EffectsPlayed { before, after } => CombatEdit::EffectsPlayed {
                before: *after,
                after: *before,
            },
            CombatEdit::HeroWounds { before, after } => CombatEdit::HeroWounds {
                before: *after,
                after: *before,
            },
        }
    }
}

fn swap<T: PartialEq + Clone>(slot: &mut T, before: &T, after: &T) -> Result<()> {
    if slot != before {
        return Err(Error::invalid("combat does not match edit"));
    }
    *slot = after.clone();
    Ok(())
}

impl Combat {
    #[must_use]
    pub fn new(units_allowed: bool, night_rules: bool, retreat_to: Option<HexCoord>) -> Self {
        Self {
            enemies: Vector::new(),
            sites: Vector::new(),
            rewards: Vector::new(),
            current_reward: None,
            effects_played: false,
            units_allowed,
            night_rules,
            hero_wounds: 0,
            retreat_to,
        }
    }

    /// Position and state of an enemy.
    #[must_use]
    pub fn enemy(&self, id: CombatEnemyId) -> Option<(usize, &EnemyInCombat)> {
        self.enemies.iter().enumerate().find(|(_, e)| e.id == id)
    }

    /// An id not used by any enemy of this combat.
    #[must_use]
    pub fn next_enemy_id(&self) -> CombatEnemyId {
        CombatEnemyId(self.enemies.iter().map(|e| e.id.0 + 1).max().unwrap_or(0))
    }

    pub fn selected(&self) -> impl Iterator<Item = &EnemyInCombat> {
        self.enemies.iter().filter(|e| e.is_selected)
    }

    #[must_use]
    pub fn any_alive(&self) -> bool {
        self.enemies.iter().any(|e| e.is_alive)
    }

    #[must_use]
    pub fn any_attacking(&self) -> bool {
        self.enemies.iter().any(EnemyInCombat::is_attacking)
    }

    /// Whether an enemy may be targeted in `phase`.
    #[must_use]
    pub fn is_active(enemy: &EnemyInCombat, phase: Phase) -> bool {
        match phase {
            Phase::Block => enemy.is_attacking(),
            Phase::AssignDamage => enemy.is_attacking() && enemy.damage > 0,
            _ => enemy.is_alive,
        }
    }

    /// Enemies that may be targeted in `phase`.
    #[must_use]
    pub fn active(&self, phase: Phase) -> Vec<CombatEnemyId> {
        self.enemies
            .iter()
            .filter(|e| Self::is_active(e, phase))
            .map(|e| e.id)
            .collect()
    }

    /// Plan changing one enemy. `None` if there is no such enemy or `change`
    /// leaves it as it was.
    pub fn plan_enemy(
        &self,
        id: CombatEnemyId,
        change: impl FnOnce(&mut EnemyInCombat),
    ) -> Option<CombatEdit> {
        let (index, before) = self.enemy(id)?;
        let mut after = before.clone();
        change(&mut after);
        if after == *before {
            return None;
        }
        Some(CombatEdit::Enemy {
            index,
            before: before.clone(),
            after,
        })
    }

    /// Apply an edit. Fails without changes if the combat does not match.
    pub fn apply(&mut self, edit: &CombatEdit) -> Result<()> {
        match edit {
            CombatEdit::Enemy {
                index,
                before,
                after,
            } => {
                if self.enemies.get(*index) != Some(before) {
                    return Err(Error::invalid("combat does not match edit"));
                }
                self.enemies.set(*index, after.clone());
                Ok(())
            }
            CombatEdit::Enemies { before, after } => swap(&mut self.enemies, before, after),
            CombatEdit::Sites { before, after } => swap(&mut self.sites, before, after),
            CombatEdit::Rewards { before, after } => swap(&mut self.rewards, before, after),
            CombatEdit::CurrentReward { before, after } => {
                swap(&mut self.current_reward, before, after)
            }
            CombatEdit::EffectsPlayed { before, after } => {
                swap(&mut self.effects_played, before, after)
            }
            CombatEdit::HeroWounds { before, after } => swap(&mut self.hero_wounds, before, after),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyRegistry;

    fn combat_with(names: &[&str]) -> Combat {
        let registry = EnemyRegistry::standard();
        let mut combat = Combat::new(true, false, None);
        for name in names {
            let id = combat.next_enemy_id();
            let enemy = registry.by_name(name).unwrap().clone();
            combat.enemies.push_back(EnemyInCombat::new(id, enemy, None, false));
        }
        combat
    }

    #[test]
    fn test_enemy_ids_are_unique() {
        let combat = combat_with(&["Prowlers", "Prowlers", "Diggers"]);
        let ids: Vec<u32> = combat.enemies.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(combat.next_enemy_id(), CombatEnemyId(3));
    }

    #[test]
    fn test_active_per_phase() {
        let mut combat = combat_with(&["Prowlers", "Wolf Riders", "Orc Summoners"]);
        assert_eq!(combat.active(Phase::RangeAttack).len(), 3);
        // the summoner has not summoned yet
        assert_eq!(combat.active(Phase::Block).len(), 2);

        let edit = combat.plan_enemy(CombatEnemyId(0), |e| e.is_blocked = true).unwrap();
        combat.apply(&edit).unwrap();
        assert_eq!(combat.active(Phase::Block), vec![CombatEnemyId(1)]);
        assert_eq!(combat.active(Phase::AssignDamage), vec![CombatEnemyId(1)]);

        let edit = combat.plan_enemy(CombatEnemyId(1), |e| e.is_alive = false).unwrap();
        combat.apply(&edit).unwrap();
        assert!(combat.active(Phase::AssignDamage).is_empty());
        assert!(combat.any_alive());
        assert!(!combat.any_attacking());
    }

    #[test]
    fn test_edits_invert_exactly() {
        let mut combat = combat_with(&["Prowlers"]);
        let before = combat.clone();
        let edits = [
            combat.plan_enemy(CombatEnemyId(0), |e| e.is_selected = true).unwrap(),
            CombatEdit::EffectsPlayed {
                before: false,
                after: true,
            },
            CombatEdit::HeroWounds { before: 0, after: 2 },
        ];
        for edit in &edits {
            combat.apply(edit).unwrap();
        }
        assert_eq!(combat.selected().count(), 1);
        assert!(combat.apply(&edits[1]).is_err());
        for edit in edits.iter().rev() {
            combat.apply(&edit.inverse()).unwrap();
        }
        assert_eq!(combat, before);
    }

    #[test]
    fn test_unchanged_enemy_plans_nothing() {
        let combat = combat_with(&["Prowlers"]);
        assert!(combat.plan_enemy(CombatEnemyId(0), |e| e.is_alive = true).is_none());
        assert!(combat.plan_enemy(CombatEnemyId(9), |e| e.is_alive = false).is_none());
    }
}
