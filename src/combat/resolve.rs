//! Block and attack arithmetic.
//!
//! Points of an element the target handles badly count half, rounded down.
//! Everything here is pure; the combat flow decides which effects and
//! enemies take part.

use serde::{Deserialize, Serialize};

use crate::core::{Element, Resistances};
use crate::effects::Effect;
use crate::enemies::EnemyDefinition;

/// Outcome of blocking one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReport {
    pub efficient: i32,
    pub inefficient: i32,
    /// `efficient + inefficient / 2`
    pub total: i32,
    pub required: i32,
    pub blocked: bool,
}

/// Outcome of attacking the selected enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub efficient: i32,
    pub inefficient: i32,
    pub total: i32,
    pub armor: i32,
    pub killed: bool,
}

fn half(points: i32) -> i32 {
    points.div_euclid(2)
}

/// Block an attack of `element` and `value` with the block effects among
/// `blocks`. Swift attackers need twice the block.
#[must_use]
pub fn resolve_block(element: Element, value: u32, swift: bool, blocks: &[Effect]) -> BlockReport {
    let efficient_elements = element.efficient_blocks();
    let (mut efficient, mut inefficient) = (0, 0);
    for block in blocks {
        if let Effect::Block { points, element } = block {
            if efficient_elements.contains(element) {
                efficient += points;
            } else {
                inefficient += points;
            }
        }
    }
    let total = efficient + half(inefficient);
    let required = value as i32 * if swift { 2 } else { 1 };
    BlockReport {
        efficient,
        inefficient,
        total,
        required,
        blocked: total >= required,
    }
}

/// Attack every target at once with the attack effects among `attacks`.
///
/// Armor is summed over the targets and lowered by `armor_reduction`, but
/// never below 1. Resistances are the union over the targets unless
/// `loses_resistance` is set.
#[must_use]
pub fn resolve_attack<'a>(
    targets: impl IntoIterator<Item = &'a EnemyDefinition>,
    attacks: &[Effect],
    loses_resistance: bool,
    armor_reduction: i32,
) -> AttackReport {
    let mut armor = 0;
    let mut resistances = Resistances::none();
    let mut any = false;
    for target in targets {
        any = true;
        armor += target.armor as i32;
        resistances = resistances.union(target.resistances);
    }
    if loses_resistance {
        resistances = Resistances::none();
    }
    if any {
        armor = (armor - armor_reduction).max(1);
    }

    let (mut efficient, mut inefficient) = (0, 0);
    for attack in attacks {
        if let Effect::Attack { points, element, .. } = attack {
            if resistances.resists(*element) {
                inefficient += points;
            } else {
                efficient += points;
            }
        }
    }
    let total = efficient + half(inefficient);
    AttackReport {
        efficient,
        inefficient,
        total,
        armor,
        killed: any && total >= armor,
    }
}

/// Bonus of Cold Toughness against `enemy`: one per ability, one for a fire
/// or ice attack (two for cold fire) and one per resistance. A cold fire
/// resistance is not counted on top of its fire and ice parts.
#[must_use]
pub fn cold_toughness_bonus(enemy: &EnemyDefinition) -> i32 {
    let abilities = enemy.abilities.count() as i32;
    let element = match enemy.attack.element() {
        Element::Fire | Element::Ice => 1,
        Element::ColdFire => 2,
        Element::Physical | Element::Summoner => 0,
    };
    let resistances = [Element::Physical, Element::Fire, Element::Ice]
        .iter()
        .filter(|&&e| enemy.resistances.resists(e))
        .count() as i32;
    abilities + element + resistances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttackRange;
    use crate::enemies::{EnemyCategory, EnemyId, EnemyRegistry};

    fn enemy(armor: u32, resistances: Resistances) -> EnemyDefinition {
        EnemyDefinition::new(EnemyId::new(armor), format!("E{armor}"), EnemyCategory::Keep, armor, 3, 3)
            .with_resistances(resistances)
    }

    #[test]
    fn test_fire_attack_blocked_inefficiently() {
        let report = resolve_block(
            Element::Fire,
            6,
            false,
            &[Effect::block_with(3, Element::Ice), Effect::block(2)],
        );
        assert_eq!((report.efficient, report.inefficient, report.total), (3, 2, 4));
        assert!(!report.blocked);

        let report = resolve_block(Element::Fire, 6, false, &[Effect::block_with(6, Element::Ice)]);
        assert!(report.blocked);
    }

    #[test]
    fn test_swift_doubles_required_block() {
        let report = resolve_block(Element::Physical, 3, true, &[Effect::block(5)]);
        assert_eq!(report.required, 6);
        assert!(!report.blocked);
    }

    #[test]
    fn test_cold_fire_needs_cold_fire_block() {
        let report = resolve_block(
            Element::ColdFire,
            4,
            false,
            &[Effect::block_with(4, Element::Fire), Effect::block_with(4, Element::Ice)],
        );
        assert_eq!(report.total, 4);
        assert!(report.blocked);
        assert_eq!(report.efficient, 0);
    }

    #[test]
    fn test_attack_against_mixed_resistances() {
        let targets = [enemy(3, Resistances::new(false, true, false)), enemy(4, Resistances::none())];
        let attacks = [
            Effect::attack_with(5, Element::Fire, AttackRange::Normal),
            Effect::attack(3),
        ];
        let report = resolve_attack(targets.iter(), &attacks, false, 0);
        assert_eq!((report.efficient, report.inefficient), (3, 5));
        assert_eq!((report.total, report.armor), (5, 7));
        assert!(!report.killed);

        let report = resolve_attack(targets.iter(), &attacks, true, 0);
        assert_eq!(report.total, 8);
        assert!(report.killed);
    }

    #[test]
    fn test_cold_fire_resisted_only_by_single_enemy() {
        let split = [
            enemy(2, Resistances::new(false, true, false)),
            enemy(3, Resistances::new(false, false, true)),
        ];
        let attacks = [Effect::attack_with(4, Element::ColdFire, AttackRange::Normal)];
        assert_eq!(resolve_attack(split.iter(), &attacks, false, 0).efficient, 4);

        let both = [enemy(5, Resistances::new(false, true, true))];
        assert_eq!(resolve_attack(both.iter(), &attacks, false, 0).inefficient, 4);
    }

    #[test]
    fn test_armor_reduction_keeps_one() {
        let targets = [enemy(3, Resistances::none())];
        let report = resolve_attack(targets.iter(), &[Effect::attack(1)], false, 5);
        assert_eq!(report.armor, 1);
        assert!(report.killed);
        assert!(!resolve_attack(std::iter::empty(), &[Effect::attack(1)], false, 0).killed);
    }

    #[test]
    fn test_cold_toughness_bonus() {
        let registry = EnemyRegistry::standard();
        // fortified, brutal, poison + cold fire attack + physical resistance
        assert_eq!(cold_toughness_bonus(registry.by_name("Altem Mages").unwrap()), 6);
        // brutal + cold fire attack + fire and ice resistance
        assert_eq!(cold_toughness_bonus(registry.by_name("High Dragon").unwrap()), 5);
        assert_eq!(cold_toughness_bonus(registry.by_name("Prowlers").unwrap()), 0);
    }
}
