//! Built-in deed cards and units.

use crate::core::{AttackRange, Element, Hero, ManaColor, Resistances};
use crate::effects::Effect;
use crate::map::{CostChange, SiteKind, Terrain};

use super::definition::{CardDefinition, CardEffect, CardId, CardKind, Colors, EffectCategory};
use super::registry::{CardRegistry, UnitRegistry};
use super::units::{UnitAbility, UnitDefinition, UnitId};

use super::definition::CardEffect::{ChooseOne, Gain};
use super::definition::EffectCategory::{Combat, Healing, Influence, Movement, Special, Unknown};
use crate::core::ManaColor::{Blue, Green, Red, White};

fn ranged(points: i32, element: Element) -> Effect {
    Effect::attack_with(points, element, AttackRange::Ranged)
}

fn siege(points: i32, element: Element) -> Effect {
    Effect::attack_with(points, element, AttackRange::Siege)
}

fn fire_attack(points: i32) -> Effect {
    Effect::attack_with(points, Element::Fire, AttackRange::Normal)
}

fn ice_attack(points: i32) -> Effect {
    Effect::attack_with(points, Element::Ice, AttackRange::Normal)
}

fn all(parts: Vec<CardEffect>) -> CardEffect {
    CardEffect::All(parts)
}

fn cheaper(terrain: Terrain) -> CardEffect {
    Gain(Effect::TerrainCost {
        terrain,
        change: CostChange::Reduce {
            amount: 1,
            minimum: 0,
        },
    })
}

struct Cards {
    registry: CardRegistry,
    next: u32,
}

impl Cards {
    fn add(&mut self, name: &str, title: &str, kind: CardKind) -> CardDefinition {
        let id = CardId::new(self.next);
        self.next += 1;
        CardDefinition::new(id, name, title, kind)
    }

    fn action(
        &mut self,
        name: &str,
        title: &str,
        color: ManaColor,
        category: EffectCategory,
        basic: CardEffect,
        strong: CardEffect,
    ) {
        self.colored(CardKind::BasicAction, name, title, color, category, basic, strong);
    }

    fn colored(
        &mut self,
        kind: CardKind,
        name: &str,
        title: &str,
        color: ManaColor,
        category: EffectCategory,
        basic: CardEffect,
        strong: CardEffect,
    ) {
        let card = self
            .add(name, title, kind)
            .with_color(color)
            .with_category(category)
            .with_effects(basic, strong);
        self.registry.register(card);
    }

    fn ring(&mut self, name: &str, title: &str, color: ManaColor) {
        let card = self
            .add(name, title, CardKind::Artifact)
            .with_category(Special)
            .with_basic(all(vec![
                CardEffect::token(color),
                CardEffect::crystal(color),
                CardEffect::Fame(1),
            ]));
        self.registry.register(card);
    }
}

impl CardRegistry {
    /// The wound card, all basic actions, the four rings and a small set of
    /// advanced actions and spells.
    #[must_use]
    pub fn standard() -> Self {
        let mut cards = Cards {
            registry: CardRegistry::new(),
            next: 0,
        };

        let wound = cards.add("wound", "Wound", CardKind::Wound);
        cards.registry.register(wound);

        // Basic actions
        cards.action(
            "battle_versatility",
            "Battle Versatility",
            Red,
            Combat,
            CardEffect::either([
                Effect::attack(2),
                Effect::block(2),
                ranged(1, Element::Physical),
            ]),
            CardEffect::either([
                Effect::attack(4),
                Effect::block(4),
                fire_attack(3),
                Effect::block_with(3, Element::Fire),
                ranged(3, Element::Physical),
                siege(2, Element::Physical),
            ]),
        );
        cards.action(
            "cold_toughness",
            "Cold Toughness",
            Blue,
            Combat,
            CardEffect::either([ice_attack(2), Effect::block_with(3, Element::Ice)]),
            CardEffect::ColdToughness { base: 5 },
        );
        cards.action(
            "concentration",
            "Concentration",
            Green,
            Special,
            CardEffect::GainToken(Colors::from_slice(&[Blue, White, Red])),
            CardEffect::Amplify { extra: 2 },
        );
        cards.action(
            "crystallize",
            "Crystallize",
            Blue,
            Special,
            CardEffect::TokenToCrystal,
            CardEffect::GainCrystal(Colors::from_slice(&ManaColor::BASIC)),
        );
        cards.action(
            "determination",
            "Determination",
            Blue,
            Combat,
            CardEffect::either([Effect::attack(2), Effect::block(2)]),
            Gain(Effect::block(5)),
        );
        cards.action(
            "improvisation",
            "Improvisation",
            Red,
            Unknown,
            CardEffect::DiscardThen(Box::new(CardEffect::either([
                Effect::movement(3),
                Effect::influence(3),
                Effect::attack(3),
                Effect::block(3),
            ]))),
            CardEffect::DiscardThen(Box::new(CardEffect::either([
                Effect::movement(5),
                Effect::influence(5),
                Effect::attack(5),
                Effect::block(5),
            ]))),
        );
        cards.action(
            "mana_draw",
            "Mana Draw",
            White,
            Special,
            CardEffect::ExtraSourceDie,
            CardEffect::RecolorSourceDie { tokens: 2 },
        );
        cards.action(
            "march",
            "March",
            Green,
            Movement,
            Gain(Effect::movement(2)),
            Gain(Effect::movement(4)),
        );
        cards.action(
            "noble_manners",
            "Noble Manners",
            White,
            Influence,
            all(vec![
                Gain(Effect::influence(2)),
                CardEffect::InInteraction(Box::new(CardEffect::Fame(1))),
            ]),
            all(vec![
                Gain(Effect::influence(4)),
                CardEffect::InInteraction(Box::new(all(vec![
                    CardEffect::Fame(1),
                    CardEffect::Reputation(1),
                ]))),
            ]),
        );
        cards.action(
            "promise",
            "Promise",
            Green,
            Influence,
            Gain(Effect::influence(2)),
            Gain(Effect::influence(4)),
        );
        cards.action(
            "rage",
            "Rage",
            Red,
            Combat,
            CardEffect::either([Effect::attack(2), Effect::block(2)]),
            Gain(Effect::attack(4)),
        );
        cards.action(
            "stamina",
            "Stamina",
            Blue,
            Movement,
            Gain(Effect::movement(2)),
            Gain(Effect::movement(4)),
        );
        cards.action(
            "swiftness",
            "Swiftness",
            White,
            Unknown,
            Gain(Effect::movement(2)),
            Gain(ranged(3, Element::Physical)),
        );
        cards.action(
            "threaten",
            "Threaten",
            Red,
            Influence,
            Gain(Effect::influence(2)),
            all(vec![Gain(Effect::influence(5)), CardEffect::Reputation(-1)]),
        );
        cards.action(
            "tranquility",
            "Tranquility",
            Green,
            Healing,
            CardEffect::heal_or_draw(1),
            CardEffect::heal_or_draw(2),
        );
        cards.action(
            "will_focus",
            "Will Focus",
            Green,
            Special,
            ChooseOne(vec![
                CardEffect::crystal(Green),
                CardEffect::token(Red),
                CardEffect::token(Blue),
                CardEffect::token(White),
            ]),
            CardEffect::Amplify { extra: 3 },
        );

        // Advanced actions
        for (name, title, color, strong) in [
            ("fire_bolt", "Fire Bolt", Red, ranged(3, Element::Fire)),
            ("ice_bolt", "Ice Bolt", Blue, ranged(3, Element::Ice)),
            ("swift_bolt", "Swift Bolt", White, ranged(4, Element::Physical)),
            ("crushing_bolt", "Crushing Bolt", Green, siege(3, Element::Physical)),
        ] {
            cards.colored(
                CardKind::AdvancedAction,
                name,
                title,
                color,
                Unknown,
                CardEffect::crystal(color),
                Gain(strong),
            );
        }
        cards.colored(
            CardKind::AdvancedAction,
            "refreshing_walk",
            "Refreshing Walk",
            White,
            Unknown,
            all(vec![Gain(Effect::movement(2)), Gain(Effect::heal(1))]),
            all(vec![Gain(Effect::movement(4)), Gain(Effect::heal(2))]),
        );
        cards.colored(
            CardKind::AdvancedAction,
            "intimidate",
            "Intimidate",
            Red,
            Unknown,
            all(vec![
                CardEffect::either([Effect::influence(4), Effect::attack(3)]),
                CardEffect::Reputation(-1),
            ]),
            all(vec![
                CardEffect::either([Effect::influence(8), Effect::attack(7)]),
                CardEffect::Reputation(-2),
            ]),
        );

        // Spells
        cards.colored(
            CardKind::Spell,
            "fireball",
            "Fireball",
            Red,
            Combat,
            Gain(ranged(5, Element::Fire)),
            Gain(siege(8, Element::Fire)),
        );
        cards.colored(
            CardKind::Spell,
            "snowstorm",
            "Snowstorm",
            Blue,
            Combat,
            Gain(ranged(5, Element::Ice)),
            Gain(siege(8, Element::Ice)),
        );
        cards.colored(
            CardKind::Spell,
            "restoration",
            "Restoration",
            Green,
            Healing,
            Gain(Effect::heal(3)),
            Gain(Effect::heal(5)),
        );
        cards.colored(
            CardKind::Spell,
            "expose",
            "Expose",
            White,
            Combat,
            all(vec![
                Gain(Effect::LosesFortification),
                Gain(Effect::LosesResistance),
                Gain(ranged(2, Element::Physical)),
            ]),
            all(vec![
                Gain(Effect::LosesFortification),
                Gain(Effect::LosesResistance),
                Gain(ranged(3, Element::Physical)),
            ]),
        );
        cards.colored(
            CardKind::Spell,
            "tremor",
            "Tremor",
            Green,
            Combat,
            Gain(Effect::ArmorReduction(3)),
            Gain(Effect::ArmorReduction(5)),
        );

        // Artifacts
        cards.ring("ruby_ring", "Ruby Ring", Red);
        cards.ring("sapphire_ring", "Sapphire Ring", Blue);
        cards.ring("diamond_ring", "Diamond Ring", White);
        cards.ring("emerald_ring", "Emerald Ring", Green);

        cards.registry
    }

    /// The sixteen cards a hero starts with, by name.
    #[must_use]
    pub fn starting_deck_names(hero: Hero) -> Vec<&'static str> {
        let mut deck = vec![
            "concentration",
            "crystallize",
            "determination",
            "improvisation",
            "mana_draw",
            "march",
            "march",
            "promise",
            "rage",
            "rage",
            "stamina",
            "stamina",
            "swiftness",
            "swiftness",
            "threaten",
            "tranquility",
        ];
        let (from, to) = match hero {
            Hero::Norowas => ("promise", "noble_manners"),
            Hero::Tovak => ("determination", "cold_toughness"),
            Hero::Arythea => ("rage", "battle_versatility"),
            Hero::Goldyx => ("concentration", "will_focus"),
        };
        if let Some(slot) = deck.iter_mut().find(|name| **name == from) {
            *slot = to;
        }
        deck
    }

    /// The starting deck of `hero` as card ids. Unknown names are skipped.
    #[must_use]
    pub fn starting_deck(&self, hero: Hero) -> Vec<CardId> {
        Self::starting_deck_names(hero)
            .into_iter()
            .filter_map(|name| self.id_of(name))
            .collect()
    }
}

fn monks(id: UnitId, name: &str, title: &str, color: ManaColor, special: CardEffect) -> UnitDefinition {
    UnitDefinition::new(id, name, title, 2, 4, 7)
        .recruited_at(&[SiteKind::Monastery])
        .with_ability(UnitAbility::new(
            Combat,
            CardEffect::either([Effect::attack(3), Effect::block(3)]),
        ))
        .with_ability(UnitAbility::new(Combat, special).powered_by(color))
}

impl UnitRegistry {
    /// The regular (silver-backed) units.
    #[must_use]
    pub fn standard() -> Self {
        let physical = Resistances::new(true, false, false);
        let mut next = 0;
        let mut id = || {
            next += 1;
            UnitId::new(next)
        };

        let units = vec![
            UnitDefinition::new(id(), "foresters", "Foresters", 1, 4, 5)
                .with_count(2)
                .recruited_at(&[SiteKind::Village])
                .with_ability(UnitAbility::new(
                    Movement,
                    all(vec![
                        Gain(Effect::movement(2)),
                        cheaper(Terrain::Forest),
                        cheaper(Terrain::Hills),
                        cheaper(Terrain::Swamp),
                    ]),
                ))
                .with_ability(UnitAbility::new(Combat, Gain(Effect::block(3)))),
            UnitDefinition::new(id(), "guardian_golems", "Guardian Golems", 2, 3, 7)
                .with_count(2)
                .with_resistances(physical)
                .recruited_at(&[SiteKind::MageTower, SiteKind::Keep])
                .with_ability(UnitAbility::new(
                    Combat,
                    CardEffect::either([Effect::attack(2), Effect::block(2)]),
                ))
                .with_ability(
                    UnitAbility::new(Combat, Gain(Effect::block_with(4, Element::Fire)))
                        .powered_by(Red),
                )
                .with_ability(
                    UnitAbility::new(Combat, Gain(Effect::block_with(4, Element::Ice)))
                        .powered_by(Blue),
                ),
            UnitDefinition::new(id(), "herbalists", "Herbalists", 1, 2, 3)
                .with_count(2)
                .recruited_at(&[SiteKind::Monastery, SiteKind::Village])
                .with_ability(UnitAbility::new(Healing, Gain(Effect::heal(2))).powered_by(Green))
                .with_ability(UnitAbility::new(Special, CardEffect::ReadyUnit { max_level: 2 }))
                .with_ability(UnitAbility::new(Special, CardEffect::token(Green))),
            UnitDefinition::new(id(), "illusionists", "Illusionists", 2, 2, 7)
                .with_count(2)
                .with_resistances(physical)
                .recruited_at(&[SiteKind::MageTower, SiteKind::Monastery])
                .with_ability(UnitAbility::new(Influence, Gain(Effect::influence(4))))
                .with_ability(UnitAbility::new(Special, CardEffect::crystal(White))),
            monks(
                id(),
                "northern_monks",
                "Northern Monks",
                Blue,
                CardEffect::either([ice_attack(4), Effect::block_with(4, Element::Ice)]),
            ),
            UnitDefinition::new(id(), "peasants", "Peasants", 1, 3, 4)
                .with_count(3)
                .recruited_at(&[SiteKind::Village])
                .with_ability(UnitAbility::new(
                    Combat,
                    CardEffect::either([Effect::attack(2), Effect::block(2)]),
                ))
                .with_ability(UnitAbility::new(Influence, Gain(Effect::influence(2))))
                .with_ability(UnitAbility::new(Movement, Gain(Effect::movement(2)))),
            monks(
                id(),
                "red_cape_monks",
                "Red Cape Monks",
                Red,
                CardEffect::either([fire_attack(4), Effect::block_with(4, Element::Fire)]),
            ),
            monks(
                id(),
                "savage_monks",
                "Savage Monks",
                Green,
                Gain(siege(4, Element::Physical)),
            ),
            UnitDefinition::new(id(), "utem_crossbowmen", "Utem Crossbowmen", 2, 4, 6)
                .with_count(2)
                .recruited_at(&[SiteKind::Keep, SiteKind::Village])
                .with_ability(UnitAbility::new(
                    Combat,
                    CardEffect::either([Effect::attack(3), Effect::block(3)]),
                ))
                .with_ability(UnitAbility::new(Combat, Gain(ranged(2, Element::Physical)))),
            UnitDefinition::new(id(), "utem_guardsmen", "Utem Guardsmen", 2, 5, 5)
                .with_count(2)
                .recruited_at(&[SiteKind::Keep, SiteKind::Village])
                .with_ability(UnitAbility::new(Combat, Gain(Effect::attack(2))))
                .with_ability(UnitAbility::new(Combat, Gain(Effect::block(4)))),
            UnitDefinition::new(id(), "utem_swordsmen", "Utem Swordsmen", 2, 4, 6)
                .recruited_at(&[SiteKind::Keep])
                .with_ability(UnitAbility::new(
                    Combat,
                    CardEffect::either([Effect::attack(3), Effect::block(3)]),
                ))
                .with_ability(UnitAbility::new(
                    Combat,
                    all(vec![
                        CardEffect::either([Effect::attack(6), Effect::block(6)]),
                        CardEffect::WoundSelf,
                    ]),
                )),
        ];

        let mut registry = UnitRegistry::new();
        for unit in units {
            registry.register(unit);
        }
        registry
    }
}
