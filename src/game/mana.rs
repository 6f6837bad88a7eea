//! Paying and gaining mana.
//!
//! Mana is paid from, in order: a token of the exact colour, a gold token
//! (basic colours only, and only where gold may be used), a crystal of the
//! colour.

use log::debug;

use crate::core::{Error, ManaColor, Result, TimeOfDay};
use crate::effects::Effect;
use crate::source::SourceEdit;

use super::engine::Match;
use super::state::Change;

/// Where a payment comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ManaPayment {
    Token(ManaColor),
    Crystal(ManaColor),
}

impl Match {
    fn mana_payment(&self, color: ManaColor) -> Result<ManaPayment> {
        let time = self.state().mana_time();
        if !time.allows(color) {
            let when = match time {
                TimeOfDay::Day => "day",
                TimeOfDay::Night => "night",
            };
            return Err(Error::invalid(format!("You must not use {color} mana during {when}.")));
        }
        let tokens = self.effects().mana_tokens();
        if tokens.contains(color) {
            Ok(ManaPayment::Token(color))
        } else if color.is_basic() && time.allows(ManaColor::Gold) && tokens.contains(ManaColor::Gold) {
            Ok(ManaPayment::Token(ManaColor::Gold))
        } else if self.current_player().crystal(color) > 0 {
            Ok(ManaPayment::Crystal(color))
        } else {
            Err(Error::Insufficient {
                wanted: format!("{color} mana"),
            })
        }
    }

    /// Whether one mana of `color` could be paid right now.
    #[must_use]
    pub fn has_mana(&self, color: ManaColor) -> bool {
        self.mana_payment(color).is_ok()
    }

    pub(crate) fn pay_mana(&mut self, color: ManaColor) -> Result<()> {
        let payment = self.mana_payment(color)?;
        debug!("paying {color} mana with {payment:?}");
        match payment {
            ManaPayment::Token(token) => self.pay_effect(&Effect::token(token)),
            ManaPayment::Crystal(crystal) => self.remove_crystal(crystal),
        }
    }

    /// Take the die at `index` from the source as a mana token.
    pub fn take_source_die(&mut self, index: usize) -> Result<ManaColor> {
        self.action("take source die", |m| {
            let night = m.source_night_rules()?;
            let edit = m.state().source.plan_take(index, night)?;
            m.take_die(edit)
        })
    }

    /// Take a die of `color` from the source as a mana token.
    pub fn take_source_die_color(&mut self, color: ManaColor) -> Result<ManaColor> {
        self.action("take source die", |m| {
            let night = m.source_night_rules()?;
            let edit = m.state().source.plan_take_color(color, night)?;
            m.take_die(edit)
        })
    }

    /// Whether night rules apply to the source. Fails outside of phases in
    /// which mana may be used.
    fn source_night_rules(&self) -> Result<bool> {
        if !self.phase().allows_cards() {
            return Err(Error::invalid("You cannot use mana now."));
        }
        Ok(self.state().mana_time() == TimeOfDay::Night)
    }

    fn take_die(&mut self, edit: SourceEdit) -> Result<ManaColor> {
        let color = match edit {
            SourceEdit::Take { color, .. } => color,
            _ => return Err(Error::invalid("There is no such die in the source.")),
        };
        self.record(Change::Source(edit))?;
        self.add_effect(&Effect::token(color))?;
        Ok(color)
    }
}
