//! Unit definitions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ManaColor, Resistances};
use crate::map::SiteKind;

use super::definition::{CardEffect, EffectCategory};

/// Unique identifier for a unit definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// One ability printed on a unit card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAbility {
    /// Mana that must be paid to activate.
    pub cost: Option<ManaColor>,
    pub category: EffectCategory,
    pub effect: CardEffect,
}

impl UnitAbility {
    pub fn new(category: EffectCategory, effect: CardEffect) -> Self {
        Self {
            cost: None,
            category,
            effect,
        }
    }

    #[must_use]
    pub fn powered_by(mut self, color: ManaColor) -> Self {
        self.cost = Some(color);
        self
    }
}

impl std::fmt::Display for UnitAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(color) = self.cost {
            write!(f, "({color}) ")?;
        }
        write!(f, "{}", self.effect)
    }
}

/// Static definition of a regular unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: UnitId,
    pub name: String,
    pub title: String,
    pub level: u8,
    pub armor: u32,
    /// Influence needed to recruit.
    pub cost: u32,
    pub resistances: Resistances,
    /// Copies in the unit deck.
    pub count: u32,
    pub recruit_sites: SmallVec<[SiteKind; 2]>,
    pub abilities: SmallVec<[UnitAbility; 3]>,
}

impl UnitDefinition {
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        title: impl Into<String>,
        level: u8,
        armor: u32,
        cost: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            title: title.into(),
            level,
            armor,
            cost,
            resistances: Resistances::none(),
            count: 1,
            recruit_sites: SmallVec::new(),
            abilities: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    #[must_use]
    pub fn recruited_at(mut self, sites: &[SiteKind]) -> Self {
        self.recruit_sites = SmallVec::from_slice(sites);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: UnitAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn can_recruit_at(&self, site: SiteKind) -> bool {
        self.recruit_sites.contains(&site)
    }
}

impl std::fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
