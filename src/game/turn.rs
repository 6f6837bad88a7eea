//! Ending turns and rounds.
//!
//! Both draw cards or roll dice, so neither can be undone.

use log::info;

use crate::core::{Error, PlayerId, Result};
use crate::effects::EffectList;

use super::engine::Match;
use super::phase::Phase;
use super::state::Topic;

impl Match {
    /// End the current player's turn.
    ///
    /// The hero must stand on a safe space. Site effects apply first; then
    /// the effect list is cleared, played cards are discarded, the hand is
    /// refilled and the taken source dice are rolled back in.
    pub fn end_turn(&mut self) -> Result<()> {
        self.action("end turn", |m| {
            if !m.phase().allows_end_of_turn() {
                return Err(Error::invalid(format!("You cannot end your turn during {}.", m.phase())));
            }
            let current = m.current();
            let position = m.current_player().position;
            let shared = m
                .state()
                .players
                .iter()
                .any(|(id, player)| id != current && player.position == position);
            if !m.state().map.is_safe_space(position, current, shared) {
                return Err(Error::invalid("You must end your turn on a safe space."));
            }
            m.site_end_of_turn()?;

            let count = m.config().player_count();
            let next = m.reveal(Topic::Player(current), |state, rng| {
                let player = &mut state.players[current];
                let played = std::mem::take(&mut player.play_area);
                player.discard.append(played);
                let missing = player.hand_limit.saturating_sub(player.hand.len());
                player.draw(missing);

                state.effects = EffectList::new();
                state.source.return_dice(rng);
                state.combat = None;
                state.current = current.next(count);
                state.phase = Phase::Movement;
                state.current
            });
            for topic in [Topic::Effects, Topic::Source, Topic::Combat, Topic::Phase] {
                m.notify(topic);
            }
            info!("turn passes to {}", m.state().players[next].name);
            Ok(())
        })
    }

    /// End the round: flip day and night, re-roll the source, ready every
    /// unit, reshuffle every deck and deal new hands.
    pub fn end_round(&mut self) -> Result<()> {
        self.action("end round", |m| {
            if !m.phase().allows_end_of_turn() {
                return Err(Error::invalid(format!("You cannot end the round during {}.", m.phase())));
            }
            let units = m.config().unit_offer_size();
            let advanced_actions = m.config().advanced_action_offer_size;
            let spells = m.config().spell_offer_size;
            let round = m.reveal(Topic::Round, |state, rng| {
                state.round = state.round.next();
                state.source.shuffle(rng);

                let ids: Vec<PlayerId> = state.players.player_ids().collect();
                for id in ids {
                    let player = &mut state.players[id];
                    for unit in player.units.iter_mut() {
                        unit.ready = true;
                        unit.protected = false;
                    }
                    let mut cards: Vec<_> = player
                        .deck
                        .iter()
                        .chain(player.hand.iter())
                        .chain(player.play_area.iter())
                        .chain(player.discard.iter())
                        .copied()
                        .collect();
                    rng.shuffle(&mut cards);
                    player.deck = cards.into_iter().collect();
                    player.hand.clear();
                    player.play_area.clear();
                    player.discard.clear();
                    let limit = player.hand_limit;
                    player.draw(limit);
                }

                state.offers.refresh_units(units);
                state.offers.refill(units, advanced_actions, spells);
                state.effects = EffectList::new();
                state.combat = None;
                state.current = PlayerId::new(0);
                state.phase = Phase::Movement;
                state.round
            });
            for id in m.state().players.player_ids().collect::<Vec<_>>() {
                m.notify(Topic::Player(id));
            }
            for topic in [Topic::Source, Topic::Offers, Topic::Effects, Topic::Combat, Topic::Phase] {
                m.notify(topic);
            }
            info!("round {} begins ({:?})", round.number, round.time);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Hero, MatchConfig, PlayerConfig, TimeOfDay};
    use crate::effects::Effect;
    use crate::game::player::Pile;
    use crate::game::{PlayMode, SidewaysEffect};
    use crate::map::{CostChange, HexCoord, Terrain};

    #[test]
    fn test_end_turn_refills_hand() {
        let mut game = Match::new(MatchConfig::solo(13));
        game.play_card(0, PlayMode::Sideways(SidewaysEffect::Move))
            .unwrap();
        game.play_card(0, PlayMode::Sideways(SidewaysEffect::Influence))
            .unwrap();
        assert_eq!(game.current_player().hand.len(), 3);

        game.end_turn().unwrap();
        let player = game.current_player();
        assert_eq!(player.hand.len(), 5);
        assert!(player.play_area.is_empty());
        assert_eq!(player.discard.len(), 2);
        assert!(game.effects().is_empty());
        assert_eq!(game.phase(), Phase::Movement);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_end_turn_returns_source_dice() {
        let mut game = Match::new(MatchConfig::solo(13));
        let index = game
            .state()
            .source
            .dice()
            .position(|c| game.state().mana_time().allows(c))
            .unwrap();
        game.take_source_die(index).unwrap();
        assert_eq!(game.state().source.len(), 2);
        game.end_turn().unwrap();
        assert_eq!(game.state().source.len(), 3);
        assert_eq!(game.state().source.used(), 0);
    }

    #[test]
    fn test_hotseat_passes_turn() {
        let mut game = Match::new(MatchConfig::hotseat(
            13,
            vec![
                PlayerConfig::new("Ann", Hero::Goldyx),
                PlayerConfig::new("Bo", Hero::Norowas),
            ],
        ));
        assert_eq!(game.current(), PlayerId::new(0));
        // both heroes start on the portal, which may be shared
        game.end_turn().unwrap();
        assert_eq!(game.current(), PlayerId::new(1));
        game.end_turn().unwrap();
        assert_eq!(game.current(), PlayerId::new(0));
    }

    #[test]
    fn test_cannot_end_turn_on_unsafe_space() {
        let mut game = Match::new(MatchConfig::solo(13));
        game.action("setup", |m| {
            m.add_effect(&Effect::movement(5))?;
            m.add_effect(&Effect::TerrainCost {
                terrain: Terrain::Lake,
                change: CostChange::Set(1),
            })
        })
        .unwrap();
        game.move_to(HexCoord::new(-1, 0)).unwrap();
        assert!(game.end_turn().is_err());
        assert_eq!(game.current_player().position, HexCoord::new(-1, 0));
    }

    #[test]
    fn test_end_round() {
        let mut game = Match::new(MatchConfig::solo(13));
        game.play_card(0, PlayMode::Sideways(SidewaysEffect::Move))
            .unwrap();
        game.action("wound", |m| m.add_wounds(1, Pile::Discard)).unwrap();
        game.end_round().unwrap();

        assert_eq!(game.round().number, 2);
        assert_eq!(game.round().time, TimeOfDay::Night);
        let player = game.current_player();
        assert_eq!(player.hand.len(), 5);
        assert_eq!(player.deck.len(), 12);
        assert!(player.discard.is_empty() && player.play_area.is_empty());
        assert_eq!(game.state().source.used(), 0);
    }
}
