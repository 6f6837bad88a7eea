//! The match: state, history, randomness and choices behind one handle.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::cards::Offers;
use crate::combat::{Combat, CombatActions, CombatEdit, CombatEnemyId, EnemyInCombat};
use crate::core::{Error, GameRng, ManaColor, MatchConfig, PlayerId, PlayerMap, Result, Round};
use crate::effects::{Effect, EffectList};
use crate::enemies::EnemyPool;
use crate::map::{GameMap, HexCoord, Site, SiteEdit, Tile, TilePile};
use crate::source::ManaSource;
use crate::stack::TransactionStack;

use super::catalog::Catalog;
use super::choice::{ChoiceProvider, ScriptedChoices};
use super::phase::Phase;
use super::player::{Player, PlayerEdit};
use super::state::{Change, MatchState, Table, Topic};

/// Countryside and core tiles shuffled into the tile pile.
const COUNTRYSIDE_TILES: usize = 7;
const CORE_TILES: usize = 2;

/// Tiles placed at setup next to the start tile.
const OPENING_TILES: [HexCoord; 2] = [HexCoord::new(1, 3), HexCoord::new(3, 2)];

/// A running match.
///
/// Player actions are methods on `Match` (and on the [`CombatActions`]
/// handle). Each one runs as a single macro on the undo history: it either
/// succeeds completely or leaves the state as it was and returns the error.
///
/// ```
/// use mage_knight::core::MatchConfig;
/// use mage_knight::game::{Match, Phase};
///
/// let game = Match::new(MatchConfig::solo(7));
/// assert_eq!(game.phase(), Phase::Movement);
/// assert_eq!(game.current_player().hand.len(), 5);
/// assert!(!game.can_undo());
/// ```
pub struct Match {
    config: MatchConfig,
    catalog: Arc<Catalog>,
    table: Table,
    history: TransactionStack<Change>,
    rng: GameRng,
    choices: Box<dyn ChoiceProvider>,
}

impl Match {
    /// Set up a match with the built-in cards, units and enemies.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self::with_catalog(config, Catalog::standard())
    }

    /// Set up a match: shuffle and deal the decks, roll the source, fill the
    /// offers and lay out the start tile with the two opening tiles.
    #[must_use]
    pub fn with_catalog(config: MatchConfig, catalog: Catalog) -> Self {
        let mut rng = GameRng::new(config.seed);

        let seats: Vec<Player> = config
            .players
            .iter()
            .map(|seat| {
                let mut deck = catalog.cards.starting_deck(seat.hero);
                rng.shuffle(&mut deck);
                let mut player = Player::new(seat.name.clone(), seat.hero, deck);
                player.reputation = player.reputation_after(i32::from(config.starting_reputation));
                player.armor = config.hero_armor;
                player.hand_limit = config.hand_limit;
                player.draw(config.hand_limit);
                player
            })
            .collect();
        let players = PlayerMap::new(seats.len(), |id| seats[id.index()].clone());

        let source = ManaSource::new(config.source_dice(), &mut rng);
        let mut offers = Offers::new(&catalog.cards, &catalog.units, &mut rng);
        offers.refill(
            config.unit_offer_size(),
            config.advanced_action_offer_size,
            config.spell_offer_size,
        );
        let pile = TilePile::standard(COUNTRYSIDE_TILES, CORE_TILES, &mut rng);

        let mut state = MatchState {
            round: Round::first(config.first_round),
            phase: Phase::Movement,
            current: PlayerId::new(0),
            players,
            effects: EffectList::new(),
            source,
            map: GameMap::new(pile),
            offers,
            enemies: EnemyPool::new(&catalog.enemies),
            combat: None,
        };

        if let Some(start) = Tile::get("A") {
            place_tile(&mut state, &mut rng, HexCoord::ORIGIN, &start);
        }
        for center in OPENING_TILES {
            if let Some(tile) = state.map.pop_tile() {
                place_tile(&mut state, &mut rng, center, &tile);
            }
        }
        debug!(
            "match set up: {} player(s), seed {}, source {}",
            config.player_count(),
            config.seed,
            state.source
        );

        Self {
            config,
            catalog: Arc::new(catalog),
            table: Table::new(state),
            history: TransactionStack::new(),
            rng,
            choices: Box::new(ScriptedChoices::default()),
        }
    }

    /// Set up a match that asks `choices` for every player decision.
    #[must_use]
    pub fn with_choices(config: MatchConfig, choices: impl ChoiceProvider + 'static) -> Self {
        let mut game = Self::new(config);
        game.set_choices(choices);
        game
    }

    /// Replace the source of player decisions.
    pub fn set_choices(&mut self, choices: impl ChoiceProvider + 'static) {
        self.choices = Box::new(choices);
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.table.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.table.state.phase
    }

    #[must_use]
    pub fn round(&self) -> Round {
        self.table.state.round
    }

    #[must_use]
    pub fn current(&self) -> PlayerId {
        self.table.state.current
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        self.table.state.current_player()
    }

    #[must_use]
    pub fn effects(&self) -> &EffectList {
        &self.table.state.effects
    }

    /// The combat being fought, if any.
    #[must_use]
    pub fn combat_state(&self) -> Option<&Combat> {
        self.table.state.combat.as_ref()
    }

    /// Combat actions.
    pub fn combat(&mut self) -> CombatActions<'_> {
        CombatActions::new(self)
    }

    // ------------------------------------------------------------------
    // History

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the last action. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let undone = self.history.undo(&mut self.table)?;
        self.table.notify(Topic::History);
        Ok(undone)
    }

    /// Redo the last undone action. Returns `false` if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> Result<bool> {
        let redone = self.history.redo(&mut self.table)?;
        self.table.notify(Topic::History);
        Ok(redone)
    }

    /// Drain the parts of the state that changed since the last call, each
    /// once, in the order they first changed.
    pub fn take_notifications(&mut self) -> Vec<Topic> {
        self.table.take_notices()
    }

    /// Run a player action as one macro.
    ///
    /// An error rolls back everything the action recorded. Nested actions
    /// leave the rollback to the outermost one.
    pub(crate) fn action<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let outermost = !self.history.is_composing();
        self.history.begin_macro();
        match f(self) {
            Ok(value) => {
                self.history.end_macro(true)?;
                if outermost {
                    self.table.notify(Topic::History);
                }
                Ok(value)
            }
            Err(err) => {
                if outermost {
                    self.history.abort_macro(&mut self.table)?;
                    if err.aborts_action() {
                        info!("{name}: {err}");
                    } else {
                        warn!("{name} failed: {err}");
                    }
                }
                Err(err)
            }
        }
    }

    /// Execute and record a change.
    pub(crate) fn record(&mut self, change: Change) -> Result<()> {
        let undo = change.inverse();
        self.history.push(&mut self.table, change, undo)
    }

    /// Make hidden information known: forget the undo history, then run `f`
    /// on the state with the match RNG.
    pub(crate) fn reveal<R>(
        &mut self,
        topic: Topic,
        f: impl FnOnce(&mut MatchState, &mut GameRng) -> R,
    ) -> R {
        self.history.clear();
        let out = f(&mut self.table.state, &mut self.rng);
        self.table.notify(topic);
        self.table.notify(Topic::History);
        debug!("revealed information ({topic:?}), history cleared");
        out
    }

    pub(crate) fn notify(&mut self, topic: Topic) {
        self.table.notify(topic);
    }

    pub(crate) fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub(crate) fn state_mut_unrecorded(&mut self) -> &mut MatchState {
        &mut self.table.state
    }

    // ------------------------------------------------------------------
    // Choices

    pub(crate) fn choose_one(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(Error::invalid("There is nothing to choose from."));
        }
        let index = self.choices.choose_one(prompt, options)?;
        if index >= options.len() {
            return Err(Error::invalid("Invalid choice."));
        }
        Ok(index)
    }

    pub(crate) fn choose_card(&mut self, prompt: &str, cards: &[String]) -> Result<usize> {
        if cards.is_empty() {
            return Err(Error::invalid("There is no card to choose."));
        }
        let index = self.choices.choose_card(prompt, cards)?;
        if index >= cards.len() {
            return Err(Error::invalid("Invalid choice."));
        }
        Ok(index)
    }

    /// Pick a colour; a single option is taken without asking.
    pub(crate) fn choose_mana_color(&mut self, options: &[ManaColor]) -> Result<ManaColor> {
        match options {
            [] => Err(Error::invalid("There is no colour to choose.")),
            [only] => Ok(*only),
            _ => {
                let color = self.choices.choose_mana_color(options)?;
                if !options.contains(&color) {
                    return Err(Error::invalid("Invalid choice."));
                }
                Ok(color)
            }
        }
    }

    pub(crate) fn ask(&mut self, question: &str) -> Result<bool> {
        self.choices.ask(question)
    }

    // ------------------------------------------------------------------
    // Recorded edits

    pub(crate) fn set_phase(&mut self, after: Phase) -> Result<()> {
        let before = self.phase();
        if before == after {
            return Ok(());
        }
        debug!("phase {before} -> {after}");
        self.record(Change::Phase { before, after })
    }

    pub(crate) fn edit_player(&mut self, edit: PlayerEdit) -> Result<()> {
        let player = self.current();
        self.record(Change::Player { player, edit })
    }

    /// Add an effect without any phase checks.
    pub(crate) fn add_effect(&mut self, effect: &Effect) -> Result<()> {
        let edit = self.table.state.effects.plan_add(effect);
        self.record(Change::Effects(edit))
    }

    /// Pay (remove) an effect. Fails if not enough is banked.
    pub(crate) fn pay_effect(&mut self, effect: &Effect) -> Result<()> {
        let edit = self.table.state.effects.plan_remove(effect)?;
        self.record(Change::Effects(edit))
    }

    pub(crate) fn set_site(&mut self, coords: HexCoord, after: Site) -> Result<()> {
        let before = self
            .table
            .state
            .map
            .site_at(coords)
            .cloned()
            .ok_or_else(|| Error::invalid(format!("There is no site at {coords}.")))?;
        if before == after {
            return Ok(());
        }
        self.record(Change::Site(SiteEdit {
            coords,
            before,
            after,
        }))
    }

    pub(crate) fn combat_ref(&self) -> Result<&Combat> {
        self.table
            .state
            .combat
            .as_ref()
            .ok_or_else(|| Error::invalid("There is no combat."))
    }

    pub(crate) fn edit_combat(&mut self, edit: CombatEdit) -> Result<()> {
        self.record(Change::Combat(edit))
    }

    /// Change one enemy in combat. Unchanged enemies record nothing.
    pub(crate) fn update_enemy(
        &mut self,
        id: CombatEnemyId,
        change: impl FnOnce(&mut EnemyInCombat),
    ) -> Result<()> {
        let combat = self.combat_ref()?;
        if combat.enemy(id).is_none() {
            return Err(Error::invalid(format!("There is no enemy {id}.")));
        }
        match combat.plan_enemy(id, change) {
            Some(edit) => self.edit_combat(edit),
            None => Ok(()),
        }
    }
}

/// Put a tile on the map and reveal the marauders it brings.
pub(crate) fn place_tile(state: &mut MatchState, rng: &mut GameRng, center: HexCoord, tile: &Tile) {
    for coords in state.map.place_tile(center, tile) {
        let site = match state.map.site_at(coords) {
            Some(site) if site.kind.is_marauding() => site.clone(),
            _ => continue,
        };
        let revealed = super::sites::draw_site_enemies(&mut state.enemies, rng, &site);
        state.map.set_site(coords, revealed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Answer;

    #[test]
    fn test_setup() {
        let game = Match::new(MatchConfig::solo(11));
        let state = game.state();
        assert_eq!(state.map.tiles().count(), 3);
        assert_eq!(state.source.len(), 3);
        assert_eq!(state.offers.units().count(), 3);
        assert_eq!(game.current_player().deck.len(), 11);
        assert_eq!(game.current_player().position, HexCoord::ORIGIN);
        // marauders on the opening tiles are face up
        assert!(state
            .map
            .sites()
            .filter(|(_, s)| s.kind.is_marauding())
            .all(|(_, s)| !s.has_hidden_enemies()));
    }

    #[test]
    fn test_same_seed_same_match() {
        let a = Match::new(MatchConfig::solo(5));
        let b = Match::new(MatchConfig::solo(5));
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_failed_action_rolls_back() {
        let mut game = Match::new(MatchConfig::solo(3));
        let before = game.state().to_bytes().unwrap();
        let result: Result<()> = game.action("test", |m| {
            m.add_effect(&Effect::movement(2))?;
            m.set_phase(Phase::Interaction)?;
            m.pay_effect(&Effect::movement(3))
        });
        assert!(matches!(result, Err(Error::Insufficient { .. })));
        assert_eq!(game.state().to_bytes().unwrap(), before);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_action_undo_redo() {
        let mut game = Match::new(MatchConfig::solo(3));
        game.action("test", |m| m.add_effect(&Effect::movement(2)))
            .unwrap();
        assert_eq!(game.effects().move_points(), 2);
        assert!(game.undo().unwrap());
        assert_eq!(game.effects().move_points(), 0);
        assert!(game.redo().unwrap());
        assert_eq!(game.effects().move_points(), 2);
    }

    #[test]
    fn test_empty_action_is_not_recorded() {
        let mut game = Match::new(MatchConfig::solo(3));
        game.action("nothing", |_| Ok(())).unwrap();
        assert!(!game.can_undo());
    }

    #[test]
    fn test_reveal_cannot_be_undone() {
        let mut game = Match::new(MatchConfig::solo(3));
        game.action("first", |m| m.add_effect(&Effect::movement(1)))
            .unwrap();
        let result: Result<()> = game.action("reveal then fail", |m| {
            m.add_effect(&Effect::movement(1))?;
            m.reveal(Topic::Source, |_, _| ());
            m.add_effect(&Effect::influence(2))?;
            Err(Error::Cancelled)
        });
        assert!(result.is_err());
        // the move point added before the reveal stays, the influence does not
        assert_eq!(game.effects().move_points(), 2);
        assert_eq!(game.effects().influence_points(), 0);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_notifications_are_deduplicated() {
        let mut game = Match::new(MatchConfig::solo(3));
        game.take_notifications();
        game.action("test", |m| {
            m.add_effect(&Effect::movement(1))?;
            m.set_phase(Phase::Interaction)?;
            m.add_effect(&Effect::movement(1))
        })
        .unwrap();
        assert_eq!(
            game.take_notifications(),
            vec![Topic::Effects, Topic::Phase, Topic::History]
        );
        assert!(game.take_notifications().is_empty());
    }

    #[test]
    fn test_single_colour_is_not_asked() {
        let mut game = Match::new(MatchConfig::solo(3));
        game.set_choices(ScriptedChoices::new([Answer::Color(ManaColor::Blue)]));
        assert_eq!(game.choose_mana_color(&[ManaColor::Red]).unwrap(), ManaColor::Red);
        assert_eq!(
            game.choose_mana_color(&[ManaColor::Red, ManaColor::Blue]).unwrap(),
            ManaColor::Blue
        );
        assert!(matches!(
            game.choose_mana_color(&ManaColor::BASIC),
            Err(Error::Cancelled)
        ));
    }
}
