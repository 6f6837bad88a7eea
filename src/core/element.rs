//! Attack/block elements, attack ranges and resistance sets.

use serde::{Deserialize, Serialize};

/// Element of an attack or block.
///
/// `Summoner` only appears on enemy attacks: the enemy calls another enemy
/// whose attack is used instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Physical,
    Fire,
    Ice,
    ColdFire,
    Summoner,
}

impl Element {
    /// Block elements that count at full value against an attack of this
    /// element. Everything else blocks at half value.
    #[must_use]
    pub fn efficient_blocks(self) -> &'static [Element] {
        match self {
            Element::Physical | Element::Summoner => &[
                Element::Physical,
                Element::Fire,
                Element::Ice,
                Element::ColdFire,
            ],
            Element::Fire => &[Element::Ice, Element::ColdFire],
            Element::Ice => &[Element::Fire, Element::ColdFire],
            Element::ColdFire => &[Element::ColdFire],
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Element::Physical => "Physical",
            Element::Fire => "Fire",
            Element::Ice => "Ice",
            Element::ColdFire => "Cold Fire",
            Element::Summoner => "Summoner",
        };
        f.write_str(name)
    }
}

/// Range of a player attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackRange {
    Normal,
    Ranged,
    Siege,
}

impl std::fmt::Display for AttackRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttackRange::Normal => "Normal",
            AttackRange::Ranged => "Ranged",
            AttackRange::Siege => "Siege",
        };
        f.write_str(name)
    }
}

/// A set of resisted elements.
///
/// Cold fire is resisted only when both fire and ice are, and only by the
/// same enemy or unit. `union` therefore keeps cold fire out unless one of
/// the operands already resists it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resistances(u8);

impl Resistances {
    const PHYSICAL: u8 = 1;
    const FIRE: u8 = 1 << 1;
    const ICE: u8 = 1 << 2;
    const COLD_FIRE: u8 = 1 << 3;

    /// No resistances.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Build from individual flags. Fire plus ice implies cold fire.
    #[must_use]
    pub const fn new(physical: bool, fire: bool, ice: bool) -> Self {
        let mut bits = 0;
        if physical {
            bits |= Self::PHYSICAL;
        }
        if fire {
            bits |= Self::FIRE;
        }
        if ice {
            bits |= Self::ICE;
        }
        if fire && ice {
            bits |= Self::COLD_FIRE;
        }
        Self(bits)
    }

    /// Whether attacks or blocks of `element` are halved.
    #[must_use]
    pub const fn resists(self, element: Element) -> bool {
        let bit = match element {
            Element::Physical => Self::PHYSICAL,
            Element::Fire => Self::FIRE,
            Element::Ice => Self::ICE,
            Element::ColdFire => Self::COLD_FIRE,
            Element::Summoner => 0,
        };
        self.0 & bit != 0
    }

    /// Resistances shared by a group of targets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True if nothing is resisted.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
