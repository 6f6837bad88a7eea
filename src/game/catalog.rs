//! Static content of a match.

use crate::cards::{CardDefinition, CardId, CardRegistry, UnitDefinition, UnitId, UnitRegistry};
use crate::core::{Error, Result};
use crate::enemies::{EnemyDefinition, EnemyId, EnemyRegistry};

/// Card, unit and enemy definitions. Shared by every clone of a match and
/// never changed once play starts.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub cards: CardRegistry,
    pub units: UnitRegistry,
    pub enemies: EnemyRegistry,
    wound: CardId,
}

impl Catalog {
    /// Panics if `cards` has no wound card.
    #[must_use]
    pub fn new(cards: CardRegistry, units: UnitRegistry, enemies: EnemyRegistry) -> Self {
        let wound = match cards.wound() {
            Some(wound) => wound,
            None => panic!("card registry has no wound card"),
        };
        Self {
            cards,
            units,
            enemies,
            wound,
        }
    }

    /// The built-in cards, units and enemies.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            CardRegistry::standard(),
            UnitRegistry::standard(),
            EnemyRegistry::standard(),
        )
    }

    #[must_use]
    pub fn wound(&self) -> CardId {
        self.wound
    }

    pub fn card(&self, id: CardId) -> Result<&CardDefinition> {
        self.cards
            .get(id)
            .ok_or_else(|| Error::invalid(format!("unknown card {id}")))
    }

    pub fn unit(&self, id: UnitId) -> Result<&UnitDefinition> {
        self.units
            .get(id)
            .ok_or_else(|| Error::invalid(format!("unknown unit {id}")))
    }

    pub fn enemy(&self, id: EnemyId) -> Result<&EnemyDefinition> {
        self.enemies
            .get(id)
            .ok_or_else(|| Error::invalid(format!("unknown enemy {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    #[test]
    fn test_standard_catalog() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.card(catalog.wound()).unwrap().kind, CardKind::Wound);
        assert!(catalog.card(CardId::new(9999)).is_err());
        assert!(catalog.enemy(EnemyId::new(1)).is_ok());
    }

    #[test]
    #[should_panic(expected = "no wound card")]
    fn test_wound_card_required() {
        let _ = Catalog::new(CardRegistry::new(), UnitRegistry::new(), EnemyRegistry::new());
    }
}
