//! Enemy tokens.
//!
//! - [`EnemyDefinition`]: armor, attack, fame, abilities and resistances
//! - [`EnemyRegistry`]: lookup by id or name, with a built-in catalogue
//! - [`EnemyPool`]: the face-down piles enemies are drawn from

mod catalog;
mod definition;
mod pool;
mod registry;

pub use definition::{Abilities, EnemyAttack, EnemyCategory, EnemyDefinition, EnemyId};
pub use pool::{EnemyPool, PoolEdit};
pub use registry::EnemyRegistry;
