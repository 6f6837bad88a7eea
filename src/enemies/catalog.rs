//! Built-in enemy tokens.

use crate::core::{Element, Resistances};

use super::definition::{Abilities, EnemyCategory, EnemyDefinition, EnemyId};
use super::registry::EnemyRegistry;

const FORTIFIED: Abilities = Abilities {
    fortified: true,
    swift: false,
    brutal: false,
    poison: false,
    paralyze: false,
};

fn abilities(fortified: bool, swift: bool, brutal: bool, poison: bool, paralyze: bool) -> Abilities {
    Abilities {
        fortified,
        swift,
        brutal,
        poison,
        paralyze,
    }
}

impl EnemyRegistry {
    /// Every enemy token of the base game except the city garrisons'
    /// specials.
    #[must_use]
    pub fn standard() -> Self {
        use EnemyCategory::*;

        let physical = Resistances::new(true, false, false);
        let fire = Resistances::new(false, true, false);
        let ice = Resistances::new(false, false, true);

        let mut next = 0;
        let mut id = || {
            next += 1;
            EnemyId::new(next)
        };

        let enemies = vec![
            // Marauding orcs
            EnemyDefinition::new(id(), "Prowlers", MaraudingOrcs, 3, 4, 2).with_count(2),
            EnemyDefinition::new(id(), "Diggers", MaraudingOrcs, 3, 3, 2)
                .with_count(2)
                .with_abilities(FORTIFIED),
            EnemyDefinition::new(id(), "Cursed Hags", MaraudingOrcs, 5, 3, 3)
                .with_count(2)
                .with_abilities(abilities(false, false, false, true, false)),
            EnemyDefinition::new(id(), "Wolf Riders", MaraudingOrcs, 4, 3, 3)
                .with_count(2)
                .with_abilities(abilities(false, true, false, false, false)),
            EnemyDefinition::new(id(), "Ironclads", MaraudingOrcs, 3, 4, 4)
                .with_count(2)
                .with_abilities(abilities(false, false, true, false, false))
                .with_resistances(physical),
            EnemyDefinition::new(id(), "Orc Summoners", MaraudingOrcs, 4, 0, 4)
                .with_count(2)
                .summoning(Dungeon),
            // Keep
            EnemyDefinition::new(id(), "Crossbowmen", Keep, 4, 4, 3)
                .with_count(3)
                .with_abilities(abilities(false, true, false, false, false)),
            EnemyDefinition::new(id(), "Guardsmen", Keep, 7, 3, 3)
                .with_count(3)
                .with_abilities(FORTIFIED),
            EnemyDefinition::new(id(), "Swordsmen", Keep, 5, 6, 4).with_count(2),
            EnemyDefinition::new(id(), "Golems", Keep, 5, 2, 4)
                .with_count(2)
                .with_resistances(physical),
            // Mage tower
            EnemyDefinition::new(id(), "Monks", MageTower, 5, 5, 4)
                .with_count(2)
                .with_abilities(abilities(false, false, false, true, false)),
            EnemyDefinition::new(id(), "Illusionists", MageTower, 3, 0, 4)
                .with_count(2)
                .summoning(Dungeon)
                .with_resistances(physical),
            EnemyDefinition::new(id(), "Ice Mages", MageTower, 6, 5, 5)
                .with_count(2)
                .with_element(Element::Ice)
                .with_resistances(ice),
            EnemyDefinition::new(id(), "Ice Golems", MageTower, 4, 2, 5)
                .with_element(Element::Ice)
                .with_abilities(abilities(false, false, false, false, true))
                .with_resistances(Resistances::new(true, false, true)),
            EnemyDefinition::new(id(), "Fire Mages", MageTower, 5, 6, 5)
                .with_count(2)
                .with_element(Element::Fire)
                .with_resistances(fire),
            EnemyDefinition::new(id(), "Fire Golems", MageTower, 4, 3, 5)
                .with_element(Element::Fire)
                .with_abilities(abilities(false, false, true, false, false))
                .with_resistances(Resistances::new(true, true, false)),
            // Dungeon
            EnemyDefinition::new(id(), "Minotaur", Dungeon, 5, 5, 4)
                .with_count(2)
                .with_abilities(abilities(false, false, true, false, false)),
            EnemyDefinition::new(id(), "Gargoyle", Dungeon, 4, 5, 4)
                .with_count(2)
                .with_resistances(physical),
            EnemyDefinition::new(id(), "Medusa", Dungeon, 4, 6, 5)
                .with_count(2)
                .with_abilities(abilities(false, false, false, false, true)),
            EnemyDefinition::new(id(), "Crypt Worm", Dungeon, 6, 6, 5)
                .with_count(2)
                .with_abilities(FORTIFIED),
            EnemyDefinition::new(id(), "Werewolf", Dungeon, 5, 7, 5)
                .with_count(2)
                .with_abilities(abilities(false, true, false, false, false)),
            // City
            EnemyDefinition::new(id(), "Freezers", City, 7, 3, 7)
                .with_count(3)
                .with_element(Element::Ice)
                .with_abilities(abilities(false, true, false, false, true))
                .with_resistances(fire),
            EnemyDefinition::new(id(), "Gunners", City, 6, 6, 7)
                .with_count(3)
                .with_element(Element::Fire)
                .with_abilities(abilities(false, false, true, false, false))
                .with_resistances(ice),
            EnemyDefinition::new(id(), "Altem Guardsmen", City, 7, 6, 8)
                .with_count(2)
                .with_abilities(FORTIFIED)
                .with_resistances(Resistances::new(true, true, true)),
            EnemyDefinition::new(id(), "Altem Mages", City, 8, 4, 8)
                .with_count(2)
                .with_element(Element::ColdFire)
                .with_abilities(abilities(true, false, true, true, false))
                .with_resistances(physical),
            // Draconum
            EnemyDefinition::new(id(), "Swamp Dragon", Draconum, 9, 5, 7)
                .with_count(2)
                .with_abilities(abilities(false, true, false, true, false)),
            EnemyDefinition::new(id(), "Fire Dragon", Draconum, 7, 9, 8)
                .with_count(2)
                .with_element(Element::Fire)
                .with_resistances(Resistances::new(true, true, false)),
            EnemyDefinition::new(id(), "Ice Dragon", Draconum, 7, 6, 8)
                .with_count(2)
                .with_element(Element::Ice)
                .with_abilities(abilities(false, false, false, false, true))
                .with_resistances(Resistances::new(true, false, true)),
            EnemyDefinition::new(id(), "High Dragon", Draconum, 9, 6, 9)
                .with_count(2)
                .with_element(Element::ColdFire)
                .with_abilities(abilities(false, false, true, false, false))
                .with_resistances(Resistances::new(false, true, true)),
        ];

        let mut registry = EnemyRegistry::new();
        for enemy in enemies {
            registry.register(enemy);
        }
        registry
    }
}
