//! Recorded operations on the current player: cards, wounds, units,
//! crystals, fame and reputation.

use log::debug;

use crate::cards::CardId;
use crate::core::{Error, ManaColor, Result};
use crate::effects::Effect;

use super::engine::Match;
use super::player::{Pile, PlayerEdit, UnitInstance, MAX_CRYSTALS};
use super::state::Topic;

impl Match {
    /// Move the card at `index` of `from` to the end of `to`.
    pub(crate) fn move_card(&mut self, from: Pile, index: usize, to: Pile) -> Result<CardId> {
        let card = self
            .current_player()
            .pile(from)
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid("There is no such card."))?;
        self.edit_player(PlayerEdit::Remove {
            pile: from,
            index,
            card,
        })?;
        let end = self.current_player().pile(to).len();
        self.edit_player(PlayerEdit::Insert {
            pile: to,
            index: end,
            card,
        })?;
        Ok(card)
    }

    /// Put `card` on top of the draw pile.
    pub(crate) fn put_on_deck(&mut self, card: CardId) -> Result<()> {
        self.edit_player(PlayerEdit::Insert {
            pile: Pile::Deck,
            index: 0,
            card,
        })
    }

    /// Add `count` wound cards to the hand or the discard pile.
    pub(crate) fn add_wounds(&mut self, count: u32, pile: Pile) -> Result<()> {
        let wound = self.catalog().wound();
        for _ in 0..count {
            let end = self.current_player().pile(pile).len();
            self.edit_player(PlayerEdit::Insert {
                pile,
                index: end,
                card: wound,
            })?;
        }
        debug!("{count} wound(s) added to {pile:?}");
        Ok(())
    }

    /// Discard every card in the hand that is not a wound.
    pub(crate) fn knock_out(&mut self) -> Result<()> {
        let wound = self.catalog().wound();
        let hand = self.current_player().hand.clone();
        for (index, card) in hand.iter().enumerate().rev() {
            if *card != wound {
                self.move_card(Pile::Hand, index, Pile::Discard)?;
            }
        }
        debug!("{} is knocked out", self.current_player().name);
        Ok(())
    }

    fn unit(&self, index: usize) -> Result<UnitInstance> {
        self.current_player()
            .units
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid("There is no such unit."))
    }

    /// Change one unit of the current player.
    pub(crate) fn update_unit(
        &mut self,
        index: usize,
        change: impl FnOnce(&mut UnitInstance),
    ) -> Result<()> {
        let before = self.unit(index)?;
        let mut after = before;
        change(&mut after);
        if after == before {
            return Ok(());
        }
        self.edit_player(PlayerEdit::Unit {
            index,
            before,
            after,
        })
    }

    pub(crate) fn wound_unit(&mut self, index: usize, wounds: u8) -> Result<()> {
        self.update_unit(index, |unit| unit.wounds = unit.wounds.saturating_add(wounds))
    }

    pub(crate) fn remove_unit(&mut self, index: usize) -> Result<()> {
        let unit = self.unit(index)?;
        self.edit_player(PlayerEdit::UnitRemove { index, unit })
    }

    /// Add a unit at the end of the unit list. Fails without a free command
    /// token.
    pub(crate) fn add_unit(&mut self, unit: UnitInstance) -> Result<()> {
        let player = self.current_player();
        if !player.has_free_command() {
            return Err(Error::invalid("You have no free command token."));
        }
        let index = player.units.len();
        self.edit_player(PlayerEdit::UnitInsert { index, unit })
    }

    /// Gain a crystal. A fourth crystal of one colour becomes a token.
    pub(crate) fn add_crystal(&mut self, color: ManaColor) -> Result<()> {
        if !color.is_basic() {
            return Err(Error::invalid(format!("There are no {color} crystals.")));
        }
        if self.current_player().crystal(color) < MAX_CRYSTALS {
            self.edit_player(PlayerEdit::Crystal { color, delta: 1 })
        } else {
            self.add_effect(&Effect::token(color))
        }
    }

    pub(crate) fn remove_crystal(&mut self, color: ManaColor) -> Result<()> {
        if self.current_player().crystal(color) == 0 {
            return Err(Error::Insufficient {
                wanted: format!("{color} crystal"),
            });
        }
        self.edit_player(PlayerEdit::Crystal { color, delta: -1 })
    }

    /// Move on the reputation track, stopping at its ends.
    pub(crate) fn add_reputation(&mut self, delta: i32) -> Result<()> {
        let player = self.current_player();
        let before = player.reputation;
        let after = player.reputation_after(delta);
        if before == after {
            return Ok(());
        }
        self.edit_player(PlayerEdit::Reputation { before, after })
    }

    pub(crate) fn add_fame(&mut self, fame: u32) -> Result<()> {
        if fame == 0 {
            return Ok(());
        }
        self.edit_player(PlayerEdit::Fame(i64::from(fame)))
    }

    /// Draw up to `count` cards. The deck order is hidden, so this forgets
    /// the undo history.
    pub(crate) fn draw_cards(&mut self, count: usize) -> usize {
        let current = self.current();
        self.reveal(Topic::Player(current), |state, _| state.players[current].draw(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchConfig;

    fn game() -> Match {
        Match::new(MatchConfig::solo(21))
    }

    #[test]
    fn test_wounds_and_knock_out() {
        let mut game = game();
        let wound = game.catalog().wound();
        game.action("wounds", |m| {
            m.add_wounds(2, Pile::Hand)?;
            m.add_wounds(1, Pile::Discard)?;
            m.knock_out()
        })
        .unwrap();
        let player = game.current_player();
        assert_eq!(player.hand.len(), 2);
        assert!(player.hand.iter().all(|&c| c == wound));
        assert_eq!(player.discard.len(), 6);

        game.undo().unwrap();
        let player = game.current_player();
        assert_eq!(player.hand.len(), 5);
        assert!(player.discard.is_empty());
    }

    #[test]
    fn test_fourth_crystal_becomes_token() {
        let mut game = game();
        game.action("crystals", |m| {
            for _ in 0..4 {
                m.add_crystal(ManaColor::Green)?;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(game.current_player().crystal(ManaColor::Green), 3);
        assert_eq!(game.effects().mana_tokens().get(ManaColor::Green), 1);
        assert!(game
            .action("gold crystal", |m| m.add_crystal(ManaColor::Gold))
            .is_err());
    }

    #[test]
    fn test_remove_missing_crystal() {
        let mut game = game();
        let err = game
            .action("crystal", |m| m.remove_crystal(ManaColor::Red))
            .unwrap_err();
        assert!(matches!(err, Error::Insufficient { .. }));
    }

    #[test]
    fn test_reputation_is_clamped() {
        let mut game = game();
        game.action("reputation", |m| m.add_reputation(-20)).unwrap();
        assert_eq!(game.current_player().reputation, -7);
        game.action("reputation", |m| m.add_reputation(-1)).unwrap();
        // nothing changed, nothing recorded
        game.undo().unwrap();
        assert_eq!(game.current_player().reputation, 0);
    }

    #[test]
    fn test_units_need_command_tokens() {
        let mut game = game();
        let unit = UnitInstance::new(crate::cards::UnitId::new(1));
        game.action("recruit", |m| m.add_unit(unit)).unwrap();
        assert!(game.action("recruit", |m| m.add_unit(unit)).is_err());
        game.action("wound", |m| m.wound_unit(0, 2)).unwrap();
        assert_eq!(game.current_player().units[0].wounds, 2);
        game.action("remove", |m| m.remove_unit(0)).unwrap();
        assert!(game.current_player().units.is_empty());
    }

    #[test]
    fn test_draw_clears_history() {
        let mut game = game();
        game.action("fame", |m| m.add_fame(3)).unwrap();
        assert!(game.can_undo());
        let drawn = game.action("draw", |m| Ok(m.draw_cards(2))).unwrap();
        assert_eq!(drawn, 2);
        assert_eq!(game.current_player().hand.len(), 7);
        assert!(!game.can_undo());
    }
}
