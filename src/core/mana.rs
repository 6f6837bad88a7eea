//! Mana colours.
//!
//! A colour may stand for a die in the source, a token in play, or a
//! crystal in a player's inventory depending on context.

use serde::{Deserialize, Serialize};

/// A mana colour. Red, blue, green and white are the basic colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManaColor {
    Red,
    Blue,
    Green,
    White,
    Gold,
    Black,
}

impl ManaColor {
    /// All six die faces, in die order.
    pub const ALL: [ManaColor; 6] = [
        ManaColor::Red,
        ManaColor::Blue,
        ManaColor::Green,
        ManaColor::White,
        ManaColor::Gold,
        ManaColor::Black,
    ];

    /// The four colours a crystal can have.
    pub const BASIC: [ManaColor; 4] = [
        ManaColor::Red,
        ManaColor::Blue,
        ManaColor::Green,
        ManaColor::White,
    ];

    /// Neither gold nor black.
    #[must_use]
    pub const fn is_basic(self) -> bool {
        !matches!(self, ManaColor::Gold | ManaColor::Black)
    }

    /// Position in [`ManaColor::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position among the basic colours, `None` for gold and black.
    #[must_use]
    pub const fn basic_index(self) -> Option<usize> {
        if self.is_basic() {
            Some(self as usize)
        } else {
            None
        }
    }

    /// The die face with the given index (0..6).
    #[must_use]
    pub fn from_die_face(face: usize) -> Self {
        Self::ALL[face % Self::ALL.len()]
    }
}

impl std::fmt::Display for ManaColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ManaColor::Red => "red",
            ManaColor::Blue => "blue",
            ManaColor::Green => "green",
            ManaColor::White => "white",
            ManaColor::Gold => "gold",
            ManaColor::Black => "black",
        };
        f.write_str(name)
    }
}
