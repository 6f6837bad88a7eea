//! Combat.
//!
//! - [`Combat`]: enemies, sites, rewards and per-combat counters of the
//!   combat in progress, changed only through [`CombatEdit`]s
//! - [`EnemyInCombat`]: an enemy token with its combat-scoped flags
//! - [`resolve_attack`] / [`resolve_block`]: the pure arithmetic of
//!   resistances, fortification and swiftness
//! - [`CombatActions`]: the player's combat actions on a running match
//!
//! The phases themselves are [`Phase`](crate::game::Phase) values of the
//! match; the state machine driving them lives in `machine`.

mod actions;
mod enemy;
mod machine;
mod resolve;
mod reward;
mod state;

pub use actions::CombatActions;
pub use enemy::{CombatEnemyId, EnemyInCombat};
pub use resolve::{cold_toughness_bonus, resolve_attack, resolve_block, AttackReport, BlockReport};
pub use reward::{CombatReward, RewardItem, RewardKind};
pub use state::{Combat, CombatEdit};
