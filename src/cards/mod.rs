//! Deed cards, units and the offers.
//!
//! ## Key Types
//!
//! - `CardId` / `CardDefinition`: a deed card and its basic and strong
//!   [`CardEffect`] tree
//! - `UnitId` / `UnitDefinition`: a unit with its abilities
//! - `CardRegistry` / `UnitRegistry`: definition lookup, with built-in
//!   catalogues (`standard()`)
//! - `Offers`: units, advanced actions and spells on display
//!
//! Definitions are static configuration. Which copies a player holds is
//! match state and lives in [`crate::game`].

mod catalog;
mod definition;
mod offer;
mod registry;
mod units;

pub use definition::{CardDefinition, CardEffect, CardId, CardKind, Colors, EffectCategory};
pub use offer::{OfferEdit, OfferItem, OfferKind, Offers};
pub use registry::{CardRegistry, UnitRegistry};
pub use units::{UnitAbility, UnitDefinition, UnitId};
