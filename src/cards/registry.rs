//! Registries for card and unit definition lookup.
//!
//! Both registries store definitions by id and by their stable `name`, so
//! decks and tests can refer to `"march"` instead of a numeric id.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardKind};
use super::units::{UnitDefinition, UnitId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use mage_knight::cards::{CardDefinition, CardId, CardKind, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new(CardId::new(1), "march", "March", CardKind::BasicAction));
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().title, "March");
/// assert_eq!(registry.id_of("march"), Some(CardId::new(1)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    names: FxHashMap<String, CardId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID or name already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        if self.names.contains_key(&card.name) {
            panic!("Card named {:?} already registered", card.name);
        }
        self.names.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition by its stable name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<CardId> {
        self.names.get(name).copied()
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Ids of every card of `kind`, sorted.
    #[must_use]
    pub fn ids_of_kind(&self, kind: CardKind) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .cards
            .values()
            .filter(|c| c.kind == kind)
            .map(|c| c.id)
            .collect();
        ids.sort();
        ids
    }

    /// The wound card.
    #[must_use]
    pub fn wound(&self) -> Option<CardId> {
        self.ids_of_kind(CardKind::Wound).first().copied()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}

/// Registry of unit definitions.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    units: FxHashMap<UnitId, UnitDefinition>,
    names: FxHashMap<String, UnitId>,
}

impl UnitRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit definition.
    ///
    /// Panics if a unit with the same ID or name already exists.
    pub fn register(&mut self, unit: UnitDefinition) {
        if self.units.contains_key(&unit.id) {
            panic!("Unit with ID {:?} already registered", unit.id);
        }
        if self.names.contains_key(&unit.name) {
            panic!("Unit named {:?} already registered", unit.name);
        }
        self.names.insert(unit.name.clone(), unit.id);
        self.units.insert(unit.id, unit);
    }

    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitDefinition> {
        self.units.get(&id)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&UnitDefinition> {
        self.names.get(name).and_then(|id| self.units.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.values()
    }

    /// The unit deck: `count` copies of every unit, sorted by id.
    #[must_use]
    pub fn deck(&self) -> Vec<UnitId> {
        let mut units: Vec<&UnitDefinition> = self.units.values().collect();
        units.sort_by_key(|u| u.id);
        units
            .into_iter()
            .flat_map(|u| std::iter::repeat(u.id).take(u.count as usize))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "march", "March", CardKind::BasicAction));

        let found = registry.get(CardId::new(1));
        assert!(found.is_some());
        assert_eq!(found.unwrap().title, "March");
        assert!(registry.get(CardId::new(99)).is_none());
        assert_eq!(registry.by_name("march").unwrap().id, CardId::new(1));
        assert!(registry.by_name("rage").is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "a", "A", CardKind::BasicAction));
        registry.register(CardDefinition::new(CardId::new(1), "b", "B", CardKind::BasicAction));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_name_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "a", "A", CardKind::BasicAction));
        registry.register(CardDefinition::new(CardId::new(2), "a", "A", CardKind::Spell));
    }

    #[test]
    fn test_ids_of_kind_and_wound() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(3), "fireball", "Fireball", CardKind::Spell));
        registry.register(CardDefinition::new(CardId::new(2), "snowstorm", "Snowstorm", CardKind::Spell));
        assert!(registry.wound().is_none());
        registry.register(CardDefinition::new(CardId::new(0), "wound", "Wound", CardKind::Wound));

        assert_eq!(
            registry.ids_of_kind(CardKind::Spell),
            vec![CardId::new(2), CardId::new(3)]
        );
        assert_eq!(registry.wound(), Some(CardId::new(0)));
        assert_eq!(registry.find(|c| c.kind == CardKind::Spell).count(), 2);
    }

    #[test]
    fn test_unit_deck_repeats_copies() {
        let mut registry = UnitRegistry::new();
        registry.register(UnitDefinition::new(UnitId::new(2), "foresters", "Foresters", 1, 4, 5).with_count(2));
        registry.register(UnitDefinition::new(UnitId::new(1), "peasants", "Peasants", 1, 3, 4).with_count(3));

        assert_eq!(
            registry.deck(),
            vec![
                UnitId::new(1),
                UnitId::new(1),
                UnitId::new(1),
                UnitId::new(2),
                UnitId::new(2)
            ]
        );
        assert_eq!(registry.by_name("foresters").unwrap().armor, 4);
    }
}
