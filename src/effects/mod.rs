//! Effect algebra.
//!
//! - [`Effect`]: points, mana tokens and modifiers a player has banked
//! - [`Effect::combine`]: the per-kind rule for merging two effects
//! - [`EffectList`]: the ordered, merged list of active effects
//!
//! Paying for something is removing an effect: the list decides whether
//! enough is banked.
//!
//! ```
//! use mage_knight::effects::{Effect, EffectList};
//!
//! let mut list = EffectList::new();
//! list.add(&Effect::movement(2));
//! list.add(&Effect::movement(3));
//! assert_eq!(list.len(), 1);
//!
//! list.remove(&Effect::movement(4)).unwrap();
//! assert_eq!(list.move_points(), 1);
//! assert!(list.remove(&Effect::movement(2)).is_err());
//! ```

mod effect;
mod list;

pub use effect::{Combination, Direction, Effect, EffectKind, ManaTokens};
pub use list::{EffectEdit, EffectList};
