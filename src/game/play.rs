//! Playing cards and activating units.
//!
//! A card's [`CardEffect`] tree is walked top-down. Every leaf that banks
//! points goes through [`Match::gain_effect`], which enforces the phase
//! rules: no movement, influence or healing in combat, block only in the
//! block phase, ranged attacks checked against fortifications.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cards::{CardEffect, CardKind};
use crate::combat::{cold_toughness_bonus, CombatEdit};
use crate::core::{AttackRange, Element, Error, ManaColor, Result};
use crate::effects::{Effect, EffectKind, ManaTokens};
use crate::source::SourceEdit;

use super::engine::Match;
use super::phase::Phase;
use super::player::Pile;
use super::state::Change;

/// What a card played sideways gives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SidewaysEffect {
    Move,
    Influence,
    Attack,
    Block,
}

impl SidewaysEffect {
    #[must_use]
    pub fn effect(self) -> Effect {
        match self {
            SidewaysEffect::Move => Effect::movement(1),
            SidewaysEffect::Influence => Effect::influence(1),
            SidewaysEffect::Attack => Effect::attack(1),
            SidewaysEffect::Block => Effect::block(1),
        }
    }
}

/// How a card is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    Basic,
    /// Pays the card's colour (spells also need black mana).
    Strong,
    Sideways(SidewaysEffect),
}

impl Match {
    /// Play the card at `hand_index` of the current player's hand.
    pub fn play_card(&mut self, hand_index: usize, mode: PlayMode) -> Result<()> {
        self.action("play card", |m| m.play_card_inner(hand_index, mode))
    }

    fn play_card_inner(&mut self, hand_index: usize, mode: PlayMode) -> Result<()> {
        if !self.phase().allows_cards() {
            return Err(Error::invalid("You cannot play cards now."));
        }
        let catalog = self.catalog_handle();
        let id = self
            .current_player()
            .hand
            .get(hand_index)
            .copied()
            .ok_or_else(|| Error::invalid("There is no such card in your hand."))?;
        let card = catalog.card(id)?;
        if card.kind == CardKind::Wound {
            return Err(Error::invalid("Wounds cannot be played."));
        }
        let sideways = matches!(mode, PlayMode::Sideways(_));
        if self.combat_state().is_some() && !sideways && card.category.is_out_of_combat() {
            return Err(Error::invalid(format!("{} cannot be played in combat.", card.title)));
        }

        self.move_card(Pile::Hand, hand_index, Pile::PlayArea)?;
        debug!("playing {} ({mode:?})", card.title);
        match mode {
            PlayMode::Sideways(sideways) => self.gain_effect(&sideways.effect()),
            PlayMode::Basic => self.resolve(&card.basic, None),
            PlayMode::Strong => {
                let strong = card
                    .strong
                    .as_ref()
                    .ok_or_else(|| Error::invalid(format!("{} has no strong effect.", card.title)))?;
                if let Some(color) = card.color {
                    self.pay_mana(color)?;
                }
                if card.kind == CardKind::Spell {
                    self.pay_mana(ManaColor::Black)?;
                }
                self.resolve(strong, None)
            }
        }
    }

    /// Activate ability `ability` of the unit at `unit`.
    pub fn activate_unit(&mut self, unit: usize, ability: usize) -> Result<()> {
        self.action("activate unit", |m| {
            if !m.phase().allows_cards() {
                return Err(Error::invalid("You cannot activate units now."));
            }
            let instance = m
                .current_player()
                .units
                .get(unit)
                .copied()
                .ok_or_else(|| Error::invalid("There is no such unit."))?;
            if !instance.ready {
                return Err(Error::invalid("This unit is spent."));
            }
            if instance.is_wounded() {
                return Err(Error::invalid("Wounded units cannot be activated."));
            }
            let catalog = m.catalog_handle();
            let definition = catalog.unit(instance.unit)?;
            let ability = definition
                .abilities
                .get(ability)
                .ok_or_else(|| Error::invalid("This unit has no such ability."))?;
            if let Some(combat) = m.combat_state() {
                if !combat.units_allowed {
                    return Err(Error::invalid("Units cannot be used in this combat."));
                }
                if ability.category.is_out_of_combat() {
                    return Err(Error::invalid("This ability cannot be used in combat."));
                }
            }
            if let Some(color) = ability.cost {
                m.pay_mana(color)?;
            }
            m.update_unit(unit, |u| u.ready = false)?;
            debug!("activating {definition}: {ability}");
            m.resolve(&ability.effect, Some(unit))
        })
    }

    /// Bank `effect` if the current phase allows it.
    pub(crate) fn gain_effect(&mut self, effect: &Effect) -> Result<()> {
        let phase = self.phase();
        let kind = effect.kind();
        let targets_enemies = matches!(
            kind,
            EffectKind::Attack
                | EffectKind::Block
                | EffectKind::ArmorReduction
                | EffectKind::LosesFortification
                | EffectKind::LosesResistance
        );
        match self.combat_state() {
            Some(combat) => {
                if !matches!(phase, Phase::RangeAttack | Phase::Block | Phase::Attack) {
                    return Err(Error::invalid("Cannot play any effects now."));
                }
                match kind {
                    EffectKind::Move | EffectKind::Influence | EffectKind::Heal | EffectKind::TerrainCost => {
                        return Err(Error::invalid(
                            "Cannot play healing, movement or influence during combat.",
                        ));
                    }
                    EffectKind::Block if phase != Phase::Block => {
                        return Err(Error::invalid("Cannot play block points now."));
                    }
                    EffectKind::Attack if phase == Phase::Block => {
                        return Err(Error::invalid("Cannot play attack points now."));
                    }
                    _ => {}
                }
                if targets_enemies {
                    if combat.selected().next().is_none() {
                        return Err(Error::invalid("Must select enemies first."));
                    }
                    if let Effect::Attack { range, .. } = effect {
                        if phase == Phase::RangeAttack {
                            self.check_ranged_attack(*range)?;
                        }
                    }
                    if !combat.effects_played {
                        self.edit_combat(CombatEdit::EffectsPlayed {
                            before: false,
                            after: true,
                        })?;
                    }
                }
            }
            None if targets_enemies => {
                return Err(Error::invalid("This effect can only be played in combat."));
            }
            None => {}
        }
        self.add_effect(effect)
    }

    /// How many fortifications protect the selected enemies: one for a
    /// fortified enemy, one for standing in a defended fortified site.
    pub(crate) fn fortification_level(&self) -> u32 {
        let Some(combat) = self.combat_state() else {
            return 0;
        };
        if self.effects().has(EffectKind::LosesFortification) {
            return 0;
        }
        let map = &self.state().map;
        let enemy = combat.selected().any(|e| e.enemy.abilities.fortified);
        let site = combat.selected().any(|e| {
            e.site
                .and_then(|coords| map.site_at(coords))
                .map_or(false, |site| site.is_defended())
        });
        u32::from(enemy) + u32::from(site)
    }

    fn check_ranged_attack(&self, range: AttackRange) -> Result<()> {
        if range == AttackRange::Normal {
            return Err(Error::invalid("Can only play ranged or siege attacks now."));
        }
        match self.fortification_level() {
            0 => Ok(()),
            1 if range == AttackRange::Siege => Ok(()),
            1 => Err(Error::invalid("Enemies are fortified. Must play siege attack.")),
            _ => Err(Error::invalid("Enemies are twice fortified.")),
        }
    }

    /// Resolve a card effect tree. `unit` is the activated unit, if any.
    fn resolve(&mut self, effect: &CardEffect, unit: Option<usize>) -> Result<()> {
        match effect {
            CardEffect::Gain(effect) => self.gain_effect(effect),
            CardEffect::All(parts) => parts.iter().try_for_each(|part| self.resolve(part, unit)),
            CardEffect::ChooseOne(options) => {
                let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
                let index = self.choose_one("Choose an effect", &labels)?;
                self.resolve(&options[index], unit)
            }
            CardEffect::GainCrystal(colors) => {
                let color = self.choose_mana_color(colors)?;
                self.add_crystal(color)
            }
            CardEffect::GainToken(colors) => {
                let color = self.choose_mana_color(colors)?;
                self.add_effect(&Effect::token(color))
            }
            CardEffect::TokenToCrystal => {
                let tokens = self.effects().mana_tokens();
                let options: Vec<ManaColor> = ManaColor::BASIC
                    .into_iter()
                    .filter(|&c| tokens.contains(c))
                    .collect();
                if options.is_empty() {
                    return Err(Error::invalid("You have no basic mana token to crystallize."));
                }
                let color = self.choose_mana_color(&options)?;
                self.pay_effect(&Effect::token(color))?;
                self.add_crystal(color)
            }
            CardEffect::Amplify { extra } => self.amplify(*extra, unit),
            CardEffect::DiscardThen(then) => {
                let wound = self.catalog().wound();
                let candidates: Vec<usize> = self
                    .current_player()
                    .hand
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c != wound)
                    .map(|(i, _)| i)
                    .collect();
                let index = self.choose_hand_card("Choose a card to discard", &candidates)?;
                self.move_card(Pile::Hand, index, Pile::Discard)?;
                self.resolve(then, unit)
            }
            CardEffect::DrawCards(count) => {
                self.draw_cards(*count);
                Ok(())
            }
            CardEffect::Reputation(delta) => self.add_reputation(*delta),
            CardEffect::Fame(fame) => self.add_fame(*fame),
            CardEffect::ExtraSourceDie => self.record(Change::Source(SourceEdit::Limit(1))),
            CardEffect::RecolorSourceDie { tokens } => self.recolor_source_die(*tokens),
            CardEffect::ColdToughness { base } => {
                let bonus = match self.combat_state() {
                    Some(combat) if self.phase() == Phase::Block => {
                        let mut selected = combat.selected();
                        match (selected.next(), selected.next()) {
                            (Some(enemy), None) => cold_toughness_bonus(&enemy.enemy),
                            _ => 0,
                        }
                    }
                    _ => 0,
                };
                self.gain_effect(&Effect::block_with(base + bonus, Element::Ice))
            }
            CardEffect::InInteraction(then) => {
                if self.phase() == Phase::Interaction {
                    self.resolve(then, unit)
                } else {
                    Ok(())
                }
            }
            CardEffect::ReadyUnit { max_level } => {
                let catalog = self.catalog_handle();
                let mut candidates = Vec::new();
                let mut labels = Vec::new();
                for (index, instance) in self.current_player().units.iter().enumerate() {
                    let definition = catalog.unit(instance.unit)?;
                    if !instance.ready && definition.level <= *max_level {
                        candidates.push(index);
                        labels.push(definition.title.clone());
                    }
                }
                if candidates.is_empty() {
                    return Err(Error::invalid("There is no spent unit to ready."));
                }
                let choice = self.choose_one("Choose a unit to ready", &labels)?;
                self.update_unit(candidates[choice], |u| u.ready = true)
            }
            CardEffect::WoundSelf => {
                let unit = unit.ok_or_else(|| Error::invalid("Only units can wound themselves."))?;
                self.wound_unit(unit, 1)
            }
        }
    }

    /// Let the player pick one of the hand cards at `candidates`.
    fn choose_hand_card(&mut self, prompt: &str, candidates: &[usize]) -> Result<usize> {
        let catalog = self.catalog_handle();
        let hand = &self.current_player().hand;
        let titles = candidates
            .iter()
            .map(|&i| {
                let id = hand
                    .get(i)
                    .copied()
                    .ok_or_else(|| Error::invalid("There is no such card."))?;
                Ok(catalog.card(id)?.title.clone())
            })
            .collect::<Result<Vec<String>>>()?;
        let choice = self.choose_card(prompt, &titles)?;
        Ok(candidates[choice])
    }

    /// Play another action card's strong effect for free, its points raised
    /// by `extra`.
    fn amplify(&mut self, extra: i32, unit: Option<usize>) -> Result<()> {
        let catalog = self.catalog_handle();
        let mut candidates = Vec::new();
        for (index, &id) in self.current_player().hand.iter().enumerate() {
            let card = catalog.card(id)?;
            if card.kind.is_action() && card.strong.is_some() {
                candidates.push(index);
            }
        }
        if candidates.is_empty() {
            return Err(Error::invalid("There is no action card to play."));
        }
        let index = self.choose_hand_card("Choose a card to play", &candidates)?;
        let id = self.move_card(Pile::Hand, index, Pile::PlayArea)?;
        let card = catalog.card(id)?;
        let strong = card
            .strong
            .as_ref()
            .ok_or_else(|| Error::invalid(format!("{} has no strong effect.", card.title)))?;
        let concentration = Effect::Concentration(extra);
        self.add_effect(&concentration)?;
        self.resolve(strong, unit)?;
        self.pay_effect(&concentration)
    }

    /// Take a die out of the source without using it, set it to a colour
    /// and gain `tokens` tokens of that colour.
    fn recolor_source_die(&mut self, tokens: u16) -> Result<()> {
        let dice: Vec<ManaColor> = self.state().source.dice().collect();
        let labels: Vec<String> = dice.iter().map(|c| format!("{c} die")).collect();
        let index = self.choose_one("Choose a die from the source", &labels)?;
        let edit = self.state().source.plan_remove(dice[index])?;
        self.record(Change::Source(edit))?;
        let time = self.state().mana_time();
        let options: Vec<ManaColor> = ManaColor::ALL
            .into_iter()
            .filter(|&c| c != ManaColor::Gold && time.allows(c))
            .collect();
        let color = self.choose_mana_color(&options)?;
        self.add_effect(&Effect::ManaTokens(ManaTokens::new().with(color, tokens)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::{MatchConfig, TimeOfDay};
    use crate::game::{Answer, ScriptedChoices};
    use crate::game::player::{PlayerEdit, UnitInstance};

    fn game() -> Match {
        Match::new(MatchConfig::solo(4))
    }

    /// Replace the hand with the named cards.
    fn give_hand(game: &mut Match, names: &[&str]) {
        let ids: Vec<CardId> = names
            .iter()
            .map(|n| game.catalog().cards.id_of(n).unwrap())
            .collect();
        game.action("hand", |m| {
            while let Some(&card) = m.current_player().hand.head() {
                m.edit_player(PlayerEdit::Remove {
                    pile: Pile::Hand,
                    index: 0,
                    card,
                })?;
            }
            for (index, card) in ids.into_iter().enumerate() {
                m.edit_player(PlayerEdit::Insert {
                    pile: Pile::Hand,
                    index,
                    card,
                })?;
            }
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_activate_unit() {
        let mut game = game();
        let peasants = game.catalog().units.by_name("peasants").unwrap().id;
        game.action("recruit", |m| m.add_unit(UnitInstance::new(peasants)))
            .unwrap();
        assert!(game.activate_unit(0, 7).is_err());
        // attack points are useless outside combat
        game.set_choices(ScriptedChoices::new([Answer::Index(0)]));
        assert!(game.activate_unit(0, 0).is_err());
        assert!(game.current_player().units[0].ready);

        game.activate_unit(0, 1).unwrap();
        assert_eq!(game.effects().influence_points(), 2);
        assert!(!game.current_player().units[0].ready);
        assert!(game.activate_unit(0, 2).is_err());

        game.undo().unwrap();
        assert!(game.current_player().units[0].ready);
        game.action("wound", |m| m.wound_unit(0, 1)).unwrap();
        assert!(game.activate_unit(0, 2).is_err());
    }

    #[test]
    fn test_basic_and_sideways() {
        let mut game = game();
        give_hand(&mut game, &["march", "rage"]);
        game.play_card(0, PlayMode::Basic).unwrap();
        assert_eq!(game.effects().move_points(), 2);
        game.play_card(0, PlayMode::Sideways(SidewaysEffect::Move))
            .unwrap();
        assert_eq!(game.effects().move_points(), 3);
        assert!(game.current_player().hand.is_empty());
        assert_eq!(game.current_player().play_area.len(), 2);
    }

    #[test]
    fn test_strong_needs_mana() {
        let mut game = game();
        give_hand(&mut game, &["march"]);
        let err = game.play_card(0, PlayMode::Strong).unwrap_err();
        assert!(matches!(err, Error::Insufficient { .. }));
        assert_eq!(game.current_player().hand.len(), 1);

        game.action("token", |m| m.add_effect(&Effect::token(ManaColor::Green)))
            .unwrap();
        game.play_card(0, PlayMode::Strong).unwrap();
        assert_eq!(game.effects().move_points(), 4);
        assert!(game.effects().mana_tokens().is_empty());
    }

    #[test]
    fn test_wounds_cannot_be_played() {
        let mut game = game();
        give_hand(&mut game, &["wound"]);
        assert!(game.play_card(0, PlayMode::Basic).is_err());
    }

    #[test]
    fn test_attack_needs_combat() {
        let mut game = game();
        give_hand(&mut game, &["rage"]);
        game.set_choices(ScriptedChoices::new([Answer::Index(0)]));
        let err = game.play_card(0, PlayMode::Basic).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid action: This effect can only be played in combat."
        );
    }

    #[test]
    fn test_cancelled_choice_rolls_back() {
        let mut game = game();
        give_hand(&mut game, &["tranquility"]);
        let before = game.state().clone();
        let err = game.play_card(0, PlayMode::Basic).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_concentration_amplifies_strong_effect() {
        let mut game = game();
        give_hand(&mut game, &["concentration", "march"]);
        game.action("token", |m| m.add_effect(&Effect::token(ManaColor::Green)))
            .unwrap();
        game.set_choices(ScriptedChoices::new([Answer::Index(0)]));
        game.play_card(0, PlayMode::Strong).unwrap();
        assert_eq!(game.effects().move_points(), 6);
        assert_eq!(game.effects().concentration_bonus(), None);
        assert_eq!(game.current_player().play_area.len(), 2);
    }

    #[test]
    fn test_improvisation_discards_then_gains() {
        let mut game = game();
        give_hand(&mut game, &["improvisation", "march", "stamina"]);
        game.set_choices(ScriptedChoices::new([Answer::Index(1), Answer::Index(0)]));
        game.play_card(0, PlayMode::Basic).unwrap();
        let player = game.current_player();
        assert_eq!(player.discard.len(), 1);
        assert_eq!(player.hand.len(), 1);
        assert_eq!(game.effects().move_points(), 3);
    }

    #[test]
    fn test_crystallize() {
        let mut game = game();
        give_hand(&mut game, &["crystallize"]);
        game.action("token", |m| m.add_effect(&Effect::token(ManaColor::Red)))
            .unwrap();
        game.play_card(0, PlayMode::Basic).unwrap();
        assert_eq!(game.current_player().crystal(ManaColor::Red), 1);
        assert!(game.effects().mana_tokens().is_empty());
    }

    #[test]
    fn test_mana_draw_strong() {
        let mut game = game();
        give_hand(&mut game, &["mana_draw"]);
        game.action("token", |m| m.add_effect(&Effect::token(ManaColor::White)))
            .unwrap();
        game.set_choices(ScriptedChoices::new([
            Answer::Index(0),
            Answer::Color(ManaColor::Red),
        ]));
        game.play_card(0, PlayMode::Strong).unwrap();
        assert_eq!(game.effects().mana_tokens().get(ManaColor::Red), 2);
        assert_eq!(game.state().source.len(), 2);
        assert_eq!(game.state().source.used(), 0);
    }

    #[test]
    fn test_spells_need_black_mana() {
        let mut game = Match::new(MatchConfig {
            first_round: TimeOfDay::Night,
            ..MatchConfig::solo(4)
        });
        give_hand(&mut game, &["restoration"]);
        game.action("tokens", |m| {
            m.add_effect(&Effect::token(ManaColor::Green))?;
            m.add_effect(&Effect::token(ManaColor::Black))
        })
        .unwrap();
        game.play_card(0, PlayMode::Strong).unwrap();
        assert_eq!(game.effects().heal_points(), 5);
    }
}
