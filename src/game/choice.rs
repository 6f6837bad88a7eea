//! Choices the rules ask a player to make.
//!
//! The match never talks to a user interface directly. Whenever a card or
//! site needs a decision it asks the [`ChoiceProvider`] it was created with;
//! any answer may be [`Error::Cancelled`], which rolls the whole action back.

use std::collections::VecDeque;

use log::debug;

use crate::core::{Error, ManaColor, Result};

/// Source of player decisions.
pub trait ChoiceProvider {
    /// Pick one of `options` (their index).
    fn choose_one(&mut self, prompt: &str, options: &[String]) -> Result<usize>;

    /// Pick one of the offered colours.
    fn choose_mana_color(&mut self, options: &[ManaColor]) -> Result<ManaColor>;

    /// Pick a card by index, given the card titles.
    fn choose_card(&mut self, prompt: &str, cards: &[String]) -> Result<usize>;

    /// Yes or no.
    fn ask(&mut self, question: &str) -> Result<bool>;
}

/// One prepared answer of a [`ScriptedChoices`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    /// For `choose_one` and `choose_card`.
    Index(usize),
    Color(ManaColor),
    Yes,
    No,
    Cancel,
}

/// Replays prepared answers in order and cancels once they run out.
///
/// ```
/// use mage_knight::core::ManaColor;
/// use mage_knight::game::{Answer, ChoiceProvider, ScriptedChoices};
///
/// let mut choices = ScriptedChoices::new([Answer::Index(1), Answer::Color(ManaColor::Red)]);
/// assert_eq!(choices.choose_one("?", &["a".into(), "b".into()]).unwrap(), 1);
/// assert_eq!(choices.choose_mana_color(&[ManaColor::Red]).unwrap(), ManaColor::Red);
/// assert!(choices.ask("again?").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedChoices {
    answers: VecDeque<Answer>,
}

impl ScriptedChoices {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    /// Queue another answer.
    pub fn push(&mut self, answer: Answer) {
        self.answers.push_back(answer);
    }

    /// Answers not used yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        match self.answers.pop_front() {
            Some(Answer::Cancel) | None => {
                debug!("choice cancelled: {prompt}");
                Err(Error::Cancelled)
            }
            Some(answer) => Ok(answer),
        }
    }

    fn index(&mut self, prompt: &str, len: usize) -> Result<usize> {
        match self.next(prompt)? {
            Answer::Index(i) if i < len => Ok(i),
            other => Err(Error::invalid(format!("unexpected answer {other:?} to {prompt:?}"))),
        }
    }
}

impl ChoiceProvider for ScriptedChoices {
    fn choose_one(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        self.index(prompt, options.len())
    }

    fn choose_mana_color(&mut self, options: &[ManaColor]) -> Result<ManaColor> {
        match self.next("mana colour")? {
            Answer::Color(color) if options.contains(&color) => Ok(color),
            other => Err(Error::invalid(format!("unexpected answer {other:?} to a colour choice"))),
        }
    }

    fn choose_card(&mut self, prompt: &str, cards: &[String]) -> Result<usize> {
        self.index(prompt, cards.len())
    }

    fn ask(&mut self, question: &str) -> Result<bool> {
        match self.next(question)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            other => Err(Error::invalid(format!("unexpected answer {other:?} to {question:?}"))),
        }
    }
}
