//! Static enemy data.

use serde::{Deserialize, Serialize};

use crate::core::{Element, Resistances};

/// Identifier of an enemy definition (one token design).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl EnemyId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Enemy({})", self.0)
    }
}

/// Token colour. Enemies are drawn from the pile of their category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyCategory {
    MaraudingOrcs,
    Keep,
    Dungeon,
    MageTower,
    Draconum,
    City,
}

impl EnemyCategory {
    pub const ALL: [EnemyCategory; 6] = [
        EnemyCategory::MaraudingOrcs,
        EnemyCategory::Keep,
        EnemyCategory::Dungeon,
        EnemyCategory::MageTower,
        EnemyCategory::Draconum,
        EnemyCategory::City,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for EnemyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EnemyCategory::MaraudingOrcs => "marauding orcs",
            EnemyCategory::Keep => "keep",
            EnemyCategory::Dungeon => "dungeon",
            EnemyCategory::MageTower => "mage tower",
            EnemyCategory::Draconum => "draconum",
            EnemyCategory::City => "city",
        };
        f.write_str(name)
    }
}

/// What an enemy does in the block phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyAttack {
    Strike { value: u32, element: Element },
    /// Draws an enemy of this category and attacks with it instead.
    Summon(EnemyCategory),
}

impl EnemyAttack {
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            EnemyAttack::Strike { value, .. } => value,
            EnemyAttack::Summon(_) => 0,
        }
    }

    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            EnemyAttack::Strike { element, .. } => element,
            EnemyAttack::Summon(_) => Element::Summoner,
        }
    }
}

/// Special abilities printed on a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Abilities {
    pub fortified: bool,
    pub swift: bool,
    pub brutal: bool,
    pub poison: bool,
    pub paralyze: bool,
}

impl Abilities {
    /// Number of abilities present.
    #[must_use]
    pub fn count(self) -> u32 {
        [
            self.fortified,
            self.swift,
            self.brutal,
            self.poison,
            self.paralyze,
        ]
        .iter()
        .filter(|&&a| a)
        .count() as u32
    }
}

/// Static definition of an enemy token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: EnemyId,
    pub name: String,
    pub category: EnemyCategory,
    /// Copies of the token in the pile.
    pub count: u32,
    pub armor: u32,
    pub attack: EnemyAttack,
    pub fame: u32,
    pub abilities: Abilities,
    pub resistances: Resistances,
}

impl EnemyDefinition {
    /// Create an enemy with a physical attack and no abilities.
    pub fn new(
        id: EnemyId,
        name: impl Into<String>,
        category: EnemyCategory,
        armor: u32,
        attack: u32,
        fame: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            count: 1,
            armor,
            attack: EnemyAttack::Strike {
                value: attack,
                element: Element::Physical,
            },
            fame,
            abilities: Abilities::default(),
            resistances: Resistances::none(),
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        if let EnemyAttack::Strike { value, .. } = self.attack {
            self.attack = EnemyAttack::Strike { value, element };
        }
        self
    }

    #[must_use]
    pub fn summoning(mut self, category: EnemyCategory) -> Self {
        self.attack = EnemyAttack::Summon(category);
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: Abilities) -> Self {
        self.abilities = abilities;
        self
    }

    #[must_use]
    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    /// Damage this enemy deals when unblocked. Brutal doubles it.
    #[must_use]
    pub fn damage(&self) -> u32 {
        let value = self.attack.value();
        if self.abilities.brutal {
            value * 2
        } else {
            value
        }
    }
}

impl std::fmt::Display for EnemyDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (armor {}, ", self.name, self.armor)?;
        match self.attack {
            EnemyAttack::Strike { value, element } if element == Element::Physical => {
                write!(f, "attack {value}")?;
            }
            EnemyAttack::Strike { value, element } => write!(f, "{element} attack {value}")?,
            EnemyAttack::Summon(category) => write!(f, "summons {category}")?,
        }
        write!(f, ", fame {})", self.fame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brutal_doubles_damage() {
        let enemy = EnemyDefinition::new(EnemyId::new(1), "Ironclads", EnemyCategory::MaraudingOrcs, 3, 4, 4)
            .with_abilities(Abilities {
                brutal: true,
                ..Abilities::default()
            });
        assert_eq!(enemy.damage(), 8);
        assert_eq!(enemy.abilities.count(), 1);
    }

    #[test]
    fn test_summoner_has_no_damage() {
        let enemy = EnemyDefinition::new(EnemyId::new(2), "Orc Summoners", EnemyCategory::MaraudingOrcs, 4, 0, 4)
            .summoning(EnemyCategory::Dungeon);
        assert_eq!(enemy.damage(), 0);
        assert_eq!(enemy.attack.element(), Element::Summoner);
        assert_eq!(enemy.to_string(), "Orc Summoners (armor 4, summons dungeon, fame 4)");
    }

    #[test]
    fn test_display_element() {
        let enemy = EnemyDefinition::new(EnemyId::new(3), "Ice Mages", EnemyCategory::MageTower, 6, 5, 5)
            .with_element(Element::Ice);
        assert_eq!(enemy.to_string(), "Ice Mages (armor 6, Ice attack 5, fame 5)");
    }
}
