//! A player's hero: cards, units, crystals and standing.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, UnitId};
use crate::core::{Error, Hero, ManaColor, Result};
use crate::map::HexCoord;

/// Lowest and highest reputation.
pub const REPUTATION_RANGE: std::ops::RangeInclusive<i8> = -7..=7;

/// Interaction modifier per reputation, from -7 to 7. `None` is the X
/// space: nobody talks to you.
const REPUTATION_MODIFIERS: [Option<i32>; 15] = [
    None,
    Some(-5),
    Some(-3),
    Some(-2),
    Some(-1),
    Some(-1),
    Some(0),
    Some(0),
    Some(0),
    Some(1),
    Some(1),
    Some(2),
    Some(2),
    Some(3),
    Some(5),
];

/// Crystals of one colour a player may hold.
pub const MAX_CRYSTALS: u8 = 3;

/// A recruited unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitInstance {
    pub unit: UnitId,
    pub wounds: u8,
    /// Spent units become ready again at the start of a round.
    pub ready: bool,
    /// Already took damage in this combat.
    pub protected: bool,
}

impl UnitInstance {
    #[must_use]
    pub const fn new(unit: UnitId) -> Self {
        Self {
            unit,
            wounds: 0,
            ready: true,
            protected: false,
        }
    }

    #[must_use]
    pub const fn is_wounded(&self) -> bool {
        self.wounds > 0
    }
}

/// The card piles of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    /// Draw pile; index 0 is the top.
    Deck,
    Hand,
    PlayArea,
    Discard,
}

/// An undoable change to a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEdit {
    Insert { pile: Pile, index: usize, card: CardId },
    Remove { pile: Pile, index: usize, card: CardId },
    Crystal { color: ManaColor, delta: i8 },
    Fame(i64),
    Reputation { before: i8, after: i8 },
    Position { before: HexCoord, after: HexCoord },
    UnitInsert { index: usize, unit: UnitInstance },
    UnitRemove { index: usize, unit: UnitInstance },
    Unit {
        index: usize,
        before: UnitInstance,
        after: UnitInstance,
    },
}

impl PlayerEdit {
    #[must_use]
    pub fn inverse(&self) -> Self {
        match *self {
            PlayerEdit::Insert { pile, index, card } => PlayerEdit::Remove { pile, index, card },
            PlayerEdit::Remove { pile, index, card } => PlayerEdit::Insert { pile, index, card },
            PlayerEdit::Crystal { color, delta } => PlayerEdit::Crystal {
                color,
                delta: -delta,
            },
            PlayerEdit::Fame(delta) => PlayerEdit::Fame(-delta),
            PlayerEdit::Reputation { before, after } => PlayerEdit::Reputation {
                before: after,
                after: before,
            },
            PlayerEdit::Position { before, after } => PlayerEdit::Position {
                before: after,
                after: before,
            },
            PlayerEdit::UnitInsert { index, unit } => PlayerEdit::UnitRemove { index, unit },
            PlayerEdit::UnitRemove { index, unit } => PlayerEdit::UnitInsert { index, unit },
            PlayerEdit::Unit {
                index,
                before,
                after,
            } => PlayerEdit::Unit {
                index,
                before: after,
                after: before,
            },
        }
    }
}

/// State of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub hero: Hero,
    pub deck: Vector<CardId>,
    pub hand: Vector<CardId>,
    pub play_area: Vector<CardId>,
    pub discard: Vector<CardId>,
    pub units: Vector<UnitInstance>,
    /// Crystals per basic colour.
    pub crystals: [u8; 4],
    pub fame: u32,
    pub reputation: i8,
    pub level: u8,
    pub armor: u32,
    pub hand_limit: usize,
    pub position: HexCoord,
}

fn mismatch() -> Error {
    Error::invalid("player does not match edit")
}

impl Player {
    /// A level 1 hero at the portal with `deck` as draw pile, top first.
    pub fn new(name: impl Into<String>, hero: Hero, deck: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            name: name.into(),
            hero,
            deck: deck.into_iter().collect(),
            hand: Vector::new(),
            play_area: Vector::new(),
            discard: Vector::new(),
            units: Vector::new(),
            crystals: [0; 4],
            fame: 0,
            reputation: 0,
            level: 1,
            armor: 2,
            hand_limit: 5,
            position: HexCoord::ORIGIN,
        }
    }

    #[must_use]
    pub fn pile(&self, pile: Pile) -> &Vector<CardId> {
        match pile {
            Pile::Deck => &self.deck,
            Pile::Hand => &self.hand,
            Pile::PlayArea => &self.play_area,
            Pile::Discard => &self.discard,
        }
    }

    fn pile_mut(&mut self, pile: Pile) -> &mut Vector<CardId> {
        match pile {
            Pile::Deck => &mut self.deck,
            Pile::Hand => &mut self.hand,
            Pile::PlayArea => &mut self.play_area,
            Pile::Discard => &mut self.discard,
        }
    }

    /// Crystals of `color`; always 0 for gold and black.
    #[must_use]
    pub fn crystal(&self, color: ManaColor) -> u8 {
        color.basic_index().map_or(0, |i| self.crystals[i])
    }

    /// Influence bonus or malus at interactions, `None` on the X space.
    #[must_use]
    pub fn reputation_modifier(&self) -> Option<i32> {
        let index = (self.reputation - REPUTATION_RANGE.start()) as usize;
        REPUTATION_MODIFIERS.get(index).copied().flatten()
    }

    /// Reputation after moving `delta` spaces, kept on the track.
    #[must_use]
    pub fn reputation_after(&self, delta: i32) -> i8 {
        let min = i32::from(*REPUTATION_RANGE.start());
        let max = i32::from(*REPUTATION_RANGE.end());
        (i32::from(self.reputation) + delta).clamp(min, max) as i8
    }

    /// Units this hero may command: one per two levels, rounded up.
    #[must_use]
    pub fn command_limit(&self) -> usize {
        (usize::from(self.level) + 1) / 2
    }

    #[must_use]
    pub fn has_free_command(&self) -> bool {
        self.units.len() < self.command_limit()
    }

    /// Draw up to `count` cards from the top of the deck. Returns how many
    /// were drawn.
    pub fn draw(&mut self, count: usize) -> usize {
        let mut drawn = 0;
        while drawn < count {
            match self.deck.pop_front() {
                Some(card) => self.hand.push_back(card),
                None => break,
            }
            drawn += 1;
        }
        drawn
    }

    /// Apply an edit. Fails without changes if the player does not match.
    pub fn apply(&mut self, edit: &PlayerEdit) -> Result<()> {
        match *edit {
            PlayerEdit::Insert { pile, index, card } => {
                let cards = self.pile_mut(pile);
                if index > cards.len() {
                    return Err(mismatch());
                }
                cards.insert(index, card);
            }
            PlayerEdit::Remove { pile, index, card } => {
                let cards = self.pile_mut(pile);
                if cards.get(index) != Some(&card) {
                    return Err(mismatch());
                }
                cards.remove(index);
            }
            PlayerEdit::Crystal { color, delta } => {
                let i = color.basic_index().ok_or_else(mismatch)?;
                let count = i16::from(self.crystals[i]) + i16::from(delta);
                if !(0..=i16::from(MAX_CRYSTALS)).contains(&count) {
                    return Err(mismatch());
                }
                self.crystals[i] = count as u8;
            }
            PlayerEdit::Fame(delta) => {
                let fame = i64::from(self.fame) + delta;
                self.fame = u32::try_from(fame).map_err(|_| mismatch())?;
            }
            PlayerEdit::Reputation { before, after } => {
                if self.reputation != before || !REPUTATION_RANGE.contains(&after) {
                    return Err(mismatch());
                }
                self.reputation = after;
            }
            PlayerEdit::Position { before, after } => {
                if self.position != before {
                    return Err(mismatch());
                }
                self.position = after;
            }
            PlayerEdit::UnitInsert { index, unit } => {
                if index > self.units.len() {
                    return Err(mismatch());
                }
                self.units.insert(index, unit);
            }
            PlayerEdit::UnitRemove { index, unit } => {
                if self.units.get(index) != Some(&unit) {
                    return Err(mismatch());
                }
                self.units.remove(index);
            }
            PlayerEdit::Unit {
                index,
                before,
                after,
            } => {
                if self.units.get(index) != Some(&before) {
                    return Err(mismatch());
                }
                self.units.set(index, after);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("Tovak", Hero::Tovak, (1..=6).map(CardId::new))
    }

    #[test]
    fn test_reputation_modifiers() {
        let mut player = player();
        assert_eq!(player.reputation_modifier(), Some(0));
        player.reputation = -7;
        assert_eq!(player.reputation_modifier(), None);
        player.reputation = -6;
        assert_eq!(player.reputation_modifier(), Some(-5));
        player.reputation = 7;
        assert_eq!(player.reputation_modifier(), Some(5));
        assert_eq!(player.reputation_after(3), 7);
        player.reputation = -6;
        assert_eq!(player.reputation_after(-4), -7);
    }

    #[test]
    fn test_command_limit() {
        let mut player = player();
        assert_eq!(player.command_limit(), 1);
        assert!(player.has_free_command());
        player.units.push_back(UnitInstance::new(UnitId::new(1)));
        assert!(!player.has_free_command());
        player.level = 3;
        assert_eq!(player.command_limit(), 2);
    }

    #[test]
    fn test_draw_stops_at_empty_deck() {
        let mut player = player();
        assert_eq!(player.draw(4), 4);
        assert_eq!(player.hand.head(), Some(&CardId::new(1)));
        assert_eq!(player.draw(4), 2);
        assert!(player.deck.is_empty());
        assert_eq!(player.hand.len(), 6);
    }

    #[test]
    fn test_crystals_are_capped() {
        let mut player = player();
        let add = PlayerEdit::Crystal {
            color: ManaColor::Red,
            delta: 1,
        };
        for _ in 0..MAX_CRYSTALS {
            player.apply(&add).unwrap();
        }
        assert!(player.apply(&add).is_err());
        assert_eq!(player.crystal(ManaColor::Red), 3);
        assert!(player
            .apply(&PlayerEdit::Crystal {
                color: ManaColor::Gold,
                delta: 1
            })
            .is_err());
        player.apply(&add.inverse()).unwrap();
        assert_eq!(player.crystal(ManaColor::Red), 2);
    }

    #[test]
    fn test_card_moves_invert() {
        let mut player = player();
        player.draw(2);
        let before = player.clone();
        let edits = [
            PlayerEdit::Remove {
                pile: Pile::Hand,
                index: 1,
                card: CardId::new(2),
            },
            PlayerEdit::Insert {
                pile: Pile::PlayArea,
                index: 0,
                card: CardId::new(2),
            },
        ];
        for edit in &edits {
            player.apply(edit).unwrap();
        }
        assert_eq!(player.play_area.len(), 1);
        assert!(player.apply(&edits[0]).is_err());
        for edit in edits.iter().rev() {
            player.apply(&edit.inverse()).unwrap();
        }
        assert_eq!(player, before);
    }

    #[test]
    fn test_units() {
        let mut player = player();
        let unit = UnitInstance::new(UnitId::new(3));
        player
            .apply(&PlayerEdit::UnitInsert { index: 0, unit })
            .unwrap();
        let wounded = UnitInstance { wounds: 1, ..unit };
        let edit = PlayerEdit::Unit {
            index: 0,
            before: unit,
            after: wounded,
        };
        player.apply(&edit).unwrap();
        assert!(player.units[0].is_wounded());
        assert!(player.apply(&edit).is_err());
        player.apply(&edit.inverse()).unwrap();
        assert!(!player.units[0].is_wounded());
    }
}
