//! Villages and monasteries: influence, healing and recruiting.

use log::info;

use crate::cards::OfferKind;
use crate::core::{Error, Result};
use crate::effects::Effect;
use crate::map::SiteKind;

use super::engine::Match;
use super::phase::Phase;
use super::player::{Pile, PlayerEdit, UnitInstance};
use super::state::Change;

/// Influence a point of healing costs at a village.
pub const VILLAGE_HEALING_COST: i32 = 3;
/// Influence a point of healing costs at a monastery.
pub const MONASTERY_HEALING_COST: i32 = 2;

impl Match {
    fn interaction_site(&self) -> Result<SiteKind> {
        let position = self.current_player().position;
        match self.state().map.site_at(position).map(|site| site.kind) {
            Some(kind @ (SiteKind::Village | SiteKind::Monastery)) => Ok(kind),
            _ => Err(Error::invalid("There is nobody to talk to here.")),
        }
    }

    /// Start interacting with the village or monastery the hero stands on.
    /// The reputation modifier is added as influence.
    pub fn interact(&mut self) -> Result<()> {
        self.action("interact", |m| {
            if m.phase() != Phase::Movement {
                return Err(Error::invalid("You cannot start an interaction now."));
            }
            let site = m.interaction_site()?;
            let modifier = m
                .current_player()
                .reputation_modifier()
                .ok_or_else(|| Error::invalid("Nobody will talk to you with your reputation."))?;
            m.set_phase(Phase::Interaction)?;
            if modifier != 0 {
                m.add_effect(&Effect::Influence(modifier))?;
            }
            info!("interacting with the {site} (reputation {modifier:+})");
            Ok(())
        })
    }

    fn require_interaction(&self) -> Result<SiteKind> {
        if self.phase() != Phase::Interaction {
            return Err(Error::invalid("You are not interacting with anyone."));
        }
        self.interaction_site()
    }

    /// Buy one point of healing with influence.
    pub fn buy_healing(&mut self) -> Result<()> {
        self.action("buy healing", |m| {
            let cost = match m.require_interaction()? {
                SiteKind::Monastery => MONASTERY_HEALING_COST,
                _ => VILLAGE_HEALING_COST,
            };
            m.pay_effect(&Effect::influence(cost))?;
            m.add_effect(&Effect::heal(1))
        })
    }

    /// Recruit the unit at `offer_index` of the unit offer.
    pub fn recruit_unit(&mut self, offer_index: usize) -> Result<()> {
        self.action("recruit unit", |m| {
            let site = m.require_interaction()?;
            let edit = m
                .state()
                .offers
                .plan_take(OfferKind::Units, offer_index)?;
            let unit = m
                .state()
                .offers
                .units()
                .nth(offer_index)
                .ok_or_else(|| Error::invalid("There is no such unit in the offer."))?;
            let catalog = m.catalog_handle();
            let definition = catalog.unit(unit)?;
            if !definition.can_recruit_at(site) {
                return Err(Error::invalid(format!(
                    "{} cannot be recruited at a {site}.",
                    definition.title
                )));
            }
            m.pay_effect(&Effect::influence(definition.cost as i32))?;
            m.record(Change::Offer(edit))?;
            m.add_unit(UnitInstance::new(unit))?;
            info!("recruited {}", definition.title);
            Ok(())
        })
    }

    /// Spend one heal point to throw away a wound from the hand.
    pub fn heal_wound(&mut self) -> Result<()> {
        self.action("heal wound", |m| {
            if m.combat_state().is_some() {
                return Err(Error::invalid("You cannot heal during combat."));
            }
            let wound = m.catalog().wound();
            let index = m
                .current_player()
                .hand
                .index_of(&wound)
                .ok_or_else(|| Error::invalid("You have no wound in your hand."))?;
            m.pay_effect(&Effect::heal(1))?;
            m.edit_player(PlayerEdit::Remove {
                pile: Pile::Hand,
                index,
                card: wound,
            })
        })
    }

    /// Spend heal points equal to the unit's level to heal all its wounds.
    pub fn heal_unit(&mut self, unit: usize) -> Result<()> {
        self.action("heal unit", |m| {
            if m.combat_state().is_some() {
                return Err(Error::invalid("You cannot heal during combat."));
            }
            let instance = m
                .current_player()
                .units
                .get(unit)
                .copied()
                .ok_or_else(|| Error::invalid("There is no such unit."))?;
            if !instance.is_wounded() {
                return Err(Error::invalid("This unit is not wounded."));
            }
            let level = m.catalog().unit(instance.unit)?.level;
            m.pay_effect(&Effect::heal(i32::from(level)))?;
            m.update_unit(unit, |u| u.wounds = 0)
        })
    }
}
