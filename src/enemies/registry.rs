//! Enemy registry for definition lookup.

use rustc_hash::FxHashMap;

use super::definition::{EnemyCategory, EnemyDefinition, EnemyId};

/// Registry of enemy definitions.
///
/// ```
/// use mage_knight::enemies::{EnemyCategory, EnemyDefinition, EnemyId, EnemyRegistry};
///
/// let mut registry = EnemyRegistry::new();
/// registry.register(EnemyDefinition::new(EnemyId::new(1), "Prowlers", EnemyCategory::MaraudingOrcs, 3, 4, 2));
///
/// assert_eq!(registry.get(EnemyId::new(1)).unwrap().armor, 3);
/// assert_eq!(registry.by_name("Prowlers").unwrap().fame, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    enemies: FxHashMap<EnemyId, EnemyDefinition>,
    names: FxHashMap<String, EnemyId>,
}

impl EnemyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enemy definition.
    ///
    /// Panics if the ID or the name is already registered.
    pub fn register(&mut self, enemy: EnemyDefinition) {
        if self.enemies.contains_key(&enemy.id) {
            panic!("Enemy with ID {:?} already registered", enemy.id);
        }
        if self.names.contains_key(&enemy.name) {
            panic!("Enemy named {:?} already registered", enemy.name);
        }
        self.names.insert(enemy.name.clone(), enemy.id);
        self.enemies.insert(enemy.id, enemy);
    }

    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemyDefinition> {
        self.enemies.get(&id)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&EnemyDefinition> {
        self.names.get(name).and_then(|id| self.enemies.get(id))
    }

    #[must_use]
    pub fn contains(&self, id: EnemyId) -> bool {
        self.enemies.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyDefinition> {
        self.enemies.values()
    }

    /// Enemies of one category, sorted by ID so piles are built
    /// deterministically.
    #[must_use]
    pub fn by_category(&self, category: EnemyCategory) -> Vec<&EnemyDefinition> {
        let mut found: Vec<_> = self
            .enemies
            .values()
            .filter(|e| e.category == category)
            .collect();
        found.sort_by_key(|e| e.id);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prowlers() -> EnemyDefinition {
        EnemyDefinition::new(EnemyId::new(1), "Prowlers", EnemyCategory::MaraudingOrcs, 3, 4, 2)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = EnemyRegistry::new();
        registry.register(prowlers());

        assert!(registry.contains(EnemyId::new(1)));
        assert_eq!(registry.get(EnemyId::new(1)).unwrap().name, "Prowlers");
        assert!(registry.get(EnemyId::new(2)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = EnemyRegistry::new();
        registry.register(prowlers());
        registry.register(EnemyDefinition::new(EnemyId::new(1), "Diggers", EnemyCategory::MaraudingOrcs, 3, 3, 2));
    }

    #[test]
    fn test_by_category_is_sorted() {
        let mut registry = EnemyRegistry::new();
        registry.register(EnemyDefinition::new(EnemyId::new(5), "Golems", EnemyCategory::Keep, 5, 2, 4));
        registry.register(prowlers());
        registry.register(EnemyDefinition::new(EnemyId::new(3), "Guardsmen", EnemyCategory::Keep, 7, 3, 3));

        let keep: Vec<_> = registry
            .by_category(EnemyCategory::Keep)
            .iter()
            .map(|e| e.id.raw())
            .collect();
        assert_eq!(keep, vec![3, 5]);
    }
}
