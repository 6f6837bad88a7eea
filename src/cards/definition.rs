//! Card definitions - static card data.
//!
//! A `CardDefinition` names a deed card and describes its basic and strong
//! effect as a [`CardEffect`] tree. The tree is data: the match walks it
//! when the card is played, asking the player whenever the tree offers a
//! choice.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ManaColor;
use crate::effects::Effect;

/// Unique identifier for a card definition.
///
/// Identifies the design ("March"), not one copy; a deck may hold the same
/// id several times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Deed card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    BasicAction,
    AdvancedAction,
    Spell,
    Artifact,
    Wound,
}

impl CardKind {
    /// Basic and advanced actions. Only these can be amplified.
    #[must_use]
    pub const fn is_action(self) -> bool {
        matches!(self, CardKind::BasicAction | CardKind::AdvancedAction)
    }
}

/// When a card or unit ability may be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    /// Mixed or decided by the chosen option.
    Unknown,
    Movement,
    Influence,
    Combat,
    Healing,
    Special,
}

impl EffectCategory {
    /// Categories that can never be used during combat.
    #[must_use]
    pub const fn is_out_of_combat(self) -> bool {
        matches!(
            self,
            EffectCategory::Movement | EffectCategory::Influence | EffectCategory::Healing
        )
    }
}

/// Colour choices of a card effect.
pub type Colors = SmallVec<[ManaColor; 4]>;

/// What playing a card (or activating a unit) does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Bank an effect.
    Gain(Effect),
    /// Every part, in order.
    All(Vec<CardEffect>),
    /// The player picks one option.
    ChooseOne(Vec<CardEffect>),
    /// A crystal of one of these colours (asks if there are several).
    GainCrystal(Colors),
    /// A mana token of one of these colours (asks if there are several).
    GainToken(Colors),
    /// Pay one mana of a chosen basic colour and gain a crystal of it.
    TokenToCrystal,
    /// Play the strong effect of another action card from the hand for
    /// free, with its points increased by `extra`.
    Amplify { extra: i32 },
    /// Discard a non-wound card from the hand, then resolve the effect.
    DiscardThen(Box<CardEffect>),
    DrawCards(usize),
    Reputation(i32),
    Fame(u32),
    /// One more die may be taken from the source this turn.
    ExtraSourceDie,
    /// Take a die from the source without using it, set it to a colour of
    /// choice and gain that many tokens of the colour.
    RecolorSourceDie { tokens: u16 },
    /// Ice block of `base` plus one per ability, attack element and
    /// resistance of the blocked enemy.
    ColdToughness { base: i32 },
    /// Only has an effect while interacting.
    InInteraction(Box<CardEffect>),
    /// Ready a spent unit of at most this level.
    ReadyUnit { max_level: u8 },
    /// The activated unit takes a wound.
    WoundSelf,
}

impl CardEffect {
    /// Shorthand for a choice between two or more effects.
    pub fn either(options: impl IntoIterator<Item = Effect>) -> Self {
        CardEffect::ChooseOne(options.into_iter().map(CardEffect::Gain).collect())
    }

    /// Heal `points` or draw that many cards.
    #[must_use]
    pub fn heal_or_draw(points: i32) -> Self {
        CardEffect::ChooseOne(vec![
            CardEffect::Gain(Effect::heal(points)),
            CardEffect::DrawCards(points as usize),
        ])
    }

    #[must_use]
    pub fn crystal(color: ManaColor) -> Self {
        CardEffect::GainCrystal(Colors::from_slice(&[color]))
    }

    #[must_use]
    pub fn token(color: ManaColor) -> Self {
        CardEffect::GainToken(Colors::from_slice(&[color]))
    }
}

fn join(f: &mut std::fmt::Formatter<'_>, parts: &[CardEffect], sep: &str) -> std::fmt::Result {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{part}")?;
    }
    Ok(())
}

impl std::fmt::Display for CardEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardEffect::Gain(effect) => write!(f, "{effect}"),
            CardEffect::All(parts) => join(f, parts, ", "),
            CardEffect::ChooseOne(options) => join(f, options, " or "),
            CardEffect::GainCrystal(colors) if colors.len() == 1 => {
                write!(f, "{} crystal", colors[0])
            }
            CardEffect::GainCrystal(_) => f.write_str("Crystal of your choice"),
            CardEffect::GainToken(colors) if colors.len() == 1 => {
                write!(f, "{} mana token", colors[0])
            }
            CardEffect::GainToken(_) => f.write_str("Mana token of your choice"),
            CardEffect::TokenToCrystal => f.write_str("Turn one mana into a crystal"),
            CardEffect::Amplify { extra } => {
                write!(f, "Play the strong effect of an action card, +{extra}")
            }
            CardEffect::DiscardThen(effect) => write!(f, "Discard a card: {effect}"),
            CardEffect::DrawCards(1) => f.write_str("Draw a card"),
            CardEffect::DrawCards(n) => write!(f, "Draw {n} cards"),
            CardEffect::Reputation(delta) => write!(f, "Reputation {delta:+}"),
            CardEffect::Fame(fame) => write!(f, "Fame +{fame}"),
            CardEffect::ExtraSourceDie => f.write_str("Use an additional mana die"),
            CardEffect::RecolorSourceDie { tokens } => {
                write!(f, "Set a source die to any colour and gain {tokens} tokens of it")
            }
            CardEffect::ColdToughness { base } => {
                write!(f, "Ice Block {base}, +1 per enemy ability and resistance")
            }
            CardEffect::InInteraction(effect) => write!(f, "{effect} when interacting"),
            CardEffect::ReadyUnit { max_level } => {
                write!(f, "Ready a unit of level {max_level} or lower")
            }
            CardEffect::WoundSelf => f.write_str("This unit is wounded"),
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use mage_knight::cards::{CardDefinition, CardEffect, CardId, CardKind, EffectCategory};
/// use mage_knight::core::ManaColor;
/// use mage_knight::effects::Effect;
///
/// let march = CardDefinition::new(CardId::new(1), "march", "March", CardKind::BasicAction)
///     .with_color(ManaColor::Green)
///     .with_category(EffectCategory::Movement)
///     .with_effects(
///         CardEffect::Gain(Effect::movement(2)),
///         CardEffect::Gain(Effect::movement(4)),
///     );
///
/// assert_eq!(march.basic.to_string(), "Move 2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    /// Stable lookup key, e.g. `"cold_toughness"`.
    pub name: String,
    /// Display name.
    pub title: String,
    pub kind: CardKind,
    /// Mana colour needed to power the strong effect.
    pub color: Option<ManaColor>,
    pub category: EffectCategory,
    pub basic: CardEffect,
    /// `None` for cards without a strong effect (wounds, rings).
    pub strong: Option<CardEffect>,
}

impl CardDefinition {
    /// Create a card without effects.
    pub fn new(id: CardId, name: impl Into<String>, title: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            title: title.into(),
            kind,
            color: None,
            category: EffectCategory::Unknown,
            basic: CardEffect::All(Vec::new()),
            strong: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: ManaColor) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: EffectCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_effects(mut self, basic: CardEffect, strong: CardEffect) -> Self {
        self.basic = basic;
        self.strong = Some(strong);
        self
    }

    #[must_use]
    pub fn with_basic(mut self, basic: CardEffect) -> Self {
        self.basic = basic;
        self
    }

    #[must_use]
    pub fn is_wound(&self) -> bool {
        self.kind == CardKind::Wound
    }
}

impl std::fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
