//! Match orchestration.
//!
//! ## Key Types
//!
//! - [`Match`]: the running match. Owns the state, the undo history, the
//!   RNG and the [`ChoiceProvider`]; every player action is a method on it
//! - [`MatchState`]: everything that describes a match at one point in time
//! - [`Change`]: one recorded, invertible edit of the state
//! - [`Phase`]: where in the turn the current player is
//! - [`Player`]: piles, units, crystals, fame and reputation of one seat
//!
//! ## Actions
//!
//! Each public action runs as one macro on the history. It either completes
//! or leaves the match untouched and returns the error. Actions that reveal
//! hidden information (drawing cards, rolling dice, turning enemies face up)
//! clear the history at that point.
//!
//! ```
//! use mage_knight::core::MatchConfig;
//! use mage_knight::game::{Match, PlayMode, SidewaysEffect};
//!
//! let mut game = Match::new(MatchConfig::solo(1));
//! game.play_card(0, PlayMode::Sideways(SidewaysEffect::Move)).unwrap();
//! assert_eq!(game.effects().move_points(), 1);
//!
//! game.undo().unwrap();
//! assert_eq!(game.effects().move_points(), 0);
//! assert_eq!(game.current_player().hand.len(), 5);
//! ```

mod catalog;
mod choice;
mod engine;
mod hero;
mod interaction;
mod mana;
mod movement;
mod phase;
mod play;
mod player;
mod sites;
mod state;
mod turn;

pub use catalog::Catalog;
pub use choice::{Answer, ChoiceProvider, ScriptedChoices};
pub use engine::Match;
pub use interaction::{MONASTERY_HEALING_COST, VILLAGE_HEALING_COST};
pub use movement::EXPLORE_COST;
pub use phase::Phase;
pub use play::{PlayMode, SidewaysEffect};
pub use player::{Pile, Player, PlayerEdit, UnitInstance, MAX_CRYSTALS};
pub use state::{Change, MatchState, Table, Topic};
