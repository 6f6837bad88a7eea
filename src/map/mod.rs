//! The hex map.
//!
//! - [`HexCoord`]: axial coordinates and tile geometry
//! - [`Terrain`] and [`CostChange`]: movement costs
//! - [`Tile`] / [`TilePile`]: map tiles, placed as they are explored
//! - [`Site`]: villages, keeps, marauders and adventure sites with their
//!   state (owner, enemies)
//! - [`GameMap`]: everything placed so far

mod board;
mod hex;
mod site;
mod terrain;
mod tile;

pub use board::{GameMap, SiteEdit};
pub use hex::HexCoord;
pub use site::{Site, SiteEnemy, SiteKind};
pub use terrain::{CostChange, Terrain};
pub use tile::{PileStage, Tile, TilePile};
