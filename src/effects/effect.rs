//! Effect definitions and their combination rules.
//!
//! Effects are what a player has banked during a turn: points waiting to be
//! spent, mana tokens, and modifiers that change how later effects behave.
//! Two effects of the same kind combine into one entry; see
//! [`Effect::combine`].

use serde::{Deserialize, Serialize};

use crate::core::{AttackRange, Element, ManaColor};
use crate::map::{CostChange, Terrain};

/// An active effect.
///
/// ## Points
///
/// `Move`, `Influence`, `Attack`, `Block`, `Heal` and `ArmorReduction`
/// carry a magnitude that is never zero. Move and heal points are never
/// negative. Influence may be negative (bad reputation), as may attack and
/// block after halving against resistances.
///
/// ## Modifiers
///
/// - `Concentration`: the next points gained are increased by `extra`.
/// - `LosesResistance` / `LosesFortification`: unique flags for this combat.
/// - `TerrainCost`: overrides the movement cost of one terrain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Enemy armor is lowered by this much for the rest of the combat.
    ArmorReduction(i32),

    Attack {
        points: i32,
        element: Element,
        range: AttackRange,
    },

    Block {
        points: i32,
        element: Element,
    },

    Concentration(i32),

    Heal(i32),

    Influence(i32),

    LosesFortification,

    LosesResistance,

    ManaTokens(ManaTokens),

    Move(i32),

    TerrainCost {
        terrain: Terrain,
        change: CostChange,
    },
}

/// The kind of an effect, ignoring all data.
///
/// Declared alphabetically; the derived order decides where a new entry is
/// inserted in an [`EffectList`](super::EffectList).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    ArmorReduction,
    Attack,
    Block,
    Concentration,
    Heal,
    Influence,
    LosesFortification,
    LosesResistance,
    ManaTokens,
    Move,
    TerrainCost,
}

/// Whether an effect is being added to or removed from the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Add,
    Remove,
}

/// Outcome of combining an existing entry with an incoming effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Combination {
    /// The two effects do not interact.
    Unrelated,
    /// The entry is replaced by this effect.
    Merged(Effect),
    /// The entry cancels out and is removed.
    Annihilated,
    /// The entry matches but does not hold enough to pay for a removal.
    Insufficient,
}

impl Effect {
    /// Move points. Panics unless `points > 0`.
    #[must_use]
    pub fn movement(points: i32) -> Self {
        assert!(points > 0, "move points must be positive, got {points}");
        Effect::Move(points)
    }

    /// Influence points. Panics on zero.
    #[must_use]
    pub fn influence(points: i32) -> Self {
        assert!(points != 0, "influence points must not be zero");
        Effect::Influence(points)
    }

    /// Physical melee attack.
    #[must_use]
    pub fn attack(points: i32) -> Self {
        Self::attack_with(points, Element::Physical, AttackRange::Normal)
    }

    /// Attack with element and range. Panics on zero.
    #[must_use]
    pub fn attack_with(points: i32, element: Element, range: AttackRange) -> Self {
        assert!(points != 0, "attack points must not be zero");
        Effect::Attack {
            points,
            element,
            range,
        }
    }

    /// Physical block.
    #[must_use]
    pub fn block(points: i32) -> Self {
        Self::block_with(points, Element::Physical)
    }

    /// Block with element. Panics on zero.
    #[must_use]
    pub fn block_with(points: i32, element: Element) -> Self {
        assert!(points != 0, "block points must not be zero");
        Effect::Block { points, element }
    }

    /// Heal points. Panics unless `points > 0`.
    #[must_use]
    pub fn heal(points: i32) -> Self {
        assert!(points > 0, "heal points must be positive, got {points}");
        Effect::Heal(points)
    }

    /// One mana token.
    #[must_use]
    pub fn token(color: ManaColor) -> Self {
        Effect::ManaTokens(ManaTokens::single(color))
    }

    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        match self {
            Effect::ArmorReduction(_) => EffectKind::ArmorReduction,
            Effect::Attack { .. } => EffectKind::Attack,
            Effect::Block { .. } => EffectKind::Block,
            Effect::Concentration(_) => EffectKind::Concentration,
            Effect::Heal(_) => EffectKind::Heal,
            Effect::Influence(_) => EffectKind::Influence,
            Effect::LosesFortification => EffectKind::LosesFortification,
            Effect::LosesResistance => EffectKind::LosesResistance,
            Effect::ManaTokens(_) => EffectKind::ManaTokens,
            Effect::Move(_) => EffectKind::Move,
            Effect::TerrainCost { .. } => EffectKind::TerrainCost,
        }
    }

    /// Magnitude of a points effect.
    #[must_use]
    pub const fn points(&self) -> Option<i32> {
        match self {
            Effect::ArmorReduction(p)
            | Effect::Attack { points: p, .. }
            | Effect::Block { points: p, .. }
            | Effect::Heal(p)
            | Effect::Influence(p)
            | Effect::Move(p) => Some(*p),
            _ => None,
        }
    }

    /// Same effect with a different magnitude. Modifiers are returned as is.
    #[must_use]
    pub fn with_points(&self, points: i32) -> Self {
        match *self {
            Effect::ArmorReduction(_) => Effect::ArmorReduction(points),
            Effect::Attack { element, range, .. } => Effect::Attack {
                points,
                element,
                range,
            },
            Effect::Block { element, .. } => Effect::Block { points, element },
            Effect::Heal(_) => Effect::Heal(points),
            Effect::Influence(_) => Effect::Influence(points),
            Effect::Move(_) => Effect::Move(points),
            _ => self.clone(),
        }
    }

    /// Whether an active concentration modifier increases this effect.
    #[must_use]
    pub fn is_amplifiable(&self) -> bool {
        matches!(
            self,
            Effect::Attack { .. } | Effect::Block { .. } | Effect::Influence(_) | Effect::Move(_)
        ) && self.points().is_some_and(|p| p > 0)
    }

    /// Check construction invariants: non-zero points, no negative move or
    /// heal points, no empty token set.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self {
            Effect::Move(p) | Effect::Heal(p) => *p > 0,
            Effect::ManaTokens(tokens) => !tokens.is_empty(),
            _ => self.points().map_or(true, |p| p != 0),
        }
    }

    /// Same points kind and discriminating fields.
    fn same_points_kind(&self, other: &Effect) -> bool {
        match (self, other) {
            (
                Effect::Attack {
                    element: e1,
                    range: r1,
                    ..
                },
                Effect::Attack {
                    element: e2,
                    range: r2,
                    ..
                },
            ) => e1 == e2 && r1 == r2,
            (Effect::Block { element: e1, .. }, Effect::Block { element: e2, .. }) => e1 == e2,
            (Effect::ArmorReduction(_), Effect::ArmorReduction(_))
            | (Effect::Heal(_), Effect::Heal(_))
            | (Effect::Influence(_), Effect::Influence(_))
            | (Effect::Move(_), Effect::Move(_)) => true,
            _ => false,
        }
    }

    /// Combine this entry with an incoming effect.
    ///
    /// Points of the same kind add up, and a sum of zero annihilates the
    /// entry. A removal may drive the value negative only if the result is
    /// not below `min(0, current)`; otherwise it is `Insufficient`.
    #[must_use]
    pub fn combine(&self, other: &Effect, direction: Direction) -> Combination {
        if let (Some(current), Some(delta)) = (self.points(), other.points()) {
            if !self.same_points_kind(other) {
                return Combination::Unrelated;
            }
            let new = match direction {
                Direction::Add => current + delta,
                Direction::Remove => current - delta,
            };
            return if new == 0 {
                Combination::Annihilated
            } else if direction == Direction::Remove && new < current.min(0) {
                Combination::Insufficient
            } else {
                Combination::Merged(self.with_points(new))
            };
        }

        match (self, other) {
            (Effect::ManaTokens(mine), Effect::ManaTokens(theirs)) => {
                let changed = match direction {
                    Direction::Add => mine.checked_add(theirs),
                    Direction::Remove => mine.checked_sub(theirs),
                };
                match changed {
                    None => Combination::Insufficient,
                    Some(tokens) if tokens.is_empty() => Combination::Annihilated,
                    Some(tokens) => Combination::Merged(Effect::ManaTokens(tokens)),
                }
            }
            (Effect::LosesFortification, Effect::LosesFortification)
            | (Effect::LosesResistance, Effect::LosesResistance) => match direction {
                Direction::Add => Combination::Merged(self.clone()),
                Direction::Remove => Combination::Annihilated,
            },
            // concentration and terrain costs stack as separate entries
            (Effect::Concentration(_), Effect::Concentration(_))
            | (Effect::TerrainCost { .. }, Effect::TerrainCost { .. }) => match direction {
                Direction::Remove if self == other => Combination::Annihilated,
                _ => Combination::Unrelated,
            },
            _ => Combination::Unrelated,
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::ArmorReduction(p) => write!(f, "Armor -{p}"),
            Effect::Attack {
                points,
                element,
                range,
            } => {
                if *range != AttackRange::Normal {
                    write!(f, "{range} ")?;
                }
                if *element != Element::Physical {
                    write!(f, "{element} ")?;
                }
                write!(f, "Attack {points}")
            }
            Effect::Block { points, element } => {
                if *element != Element::Physical {
                    write!(f, "{element} ")?;
                }
                write!(f, "Block {points}")
            }
            Effect::Concentration(extra) => write!(f, "Concentration +{extra}"),
            Effect::Heal(p) => write!(f, "Heal {p}"),
            Effect::Influence(p) => write!(f, "Influence {p}"),
            Effect::LosesFortification => f.write_str("Enemies lose fortification"),
            Effect::LosesResistance => f.write_str("Enemies lose resistances"),
            Effect::ManaTokens(tokens) => write!(f, "Mana: {tokens}"),
            Effect::Move(p) => write!(f, "Move {p}"),
            Effect::TerrainCost { terrain, change } => match change {
                CostChange::Reduce { amount, minimum } => {
                    write!(f, "{terrain} cost -{amount} (min {minimum})")
                }
                CostChange::Set(cost) => write!(f, "{terrain} costs {cost}"),
            },
        }
    }
}

/// Mana tokens per colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaTokens([u16; 6]);

impl ManaTokens {
    #[must_use]
    pub const fn new() -> Self {
        Self([0; 6])
    }

    /// One token of `color`.
    #[must_use]
    pub fn single(color: ManaColor) -> Self {
        let mut tokens = Self::new();
        tokens.0[color.index()] = 1;
        tokens
    }

    /// Builder: add `count` tokens of `color`.
    #[must_use]
    pub fn with(mut self, color: ManaColor, count: u16) -> Self {
        self.0[color.index()] += count;
        self
    }

    #[must_use]
    pub fn get(&self, color: ManaColor) -> u16 {
        self.0[color.index()]
    }

    #[must_use]
    pub fn contains(&self, color: ManaColor) -> bool {
        self.get(color) > 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }

    fn checked_add(&self, other: &Self) -> Option<Self> {
        let mut out = *self;
        for (mine, theirs) in out.0.iter_mut().zip(other.0) {
            *mine = mine.checked_add(theirs)?;
        }
        Some(out)
    }

    fn checked_sub(&self, other: &Self) -> Option<Self> {
        let mut out = *self;
        for (mine, theirs) in out.0.iter_mut().zip(other.0) {
            *mine = mine.checked_sub(theirs)?;
        }
        Some(out)
    }
}

impl std::fmt::Display for ManaTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for color in ManaColor::ALL {
            let count = self.get(color);
            if count > 0 {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{count}x {color}")?;
                first = false;
            }
        }
        Ok(())
    }
}
