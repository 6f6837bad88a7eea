//! Match state and the changes recorded on the undo history.
//!
//! [`MatchState`] is plain data built from persistent collections, so a
//! snapshot is a cheap clone. Recorded mutations are [`Change`] values: each
//! carries enough to be inverted exactly, and executing one against the
//! [`Table`] also queues a [`Topic`] for observers.

use serde::{Deserialize, Serialize};

use crate::cards::{OfferEdit, Offers};
use crate::combat::{Combat, CombatEdit};
use crate::core::{Error, PlayerId, PlayerMap, Result, Round, TimeOfDay};
use crate::effects::{EffectEdit, EffectList};
use crate::enemies::{EnemyPool, PoolEdit};
use crate::map::{GameMap, SiteEdit};
use crate::source::{ManaSource, SourceEdit};
use crate::stack::Command;

use super::phase::Phase;
use super::player::{Player, PlayerEdit};

/// Everything that changes during a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub round: Round,
    pub phase: Phase,
    pub current: PlayerId,
    pub players: PlayerMap<Player>,
    /// Effects of the current player.
    pub effects: EffectList,
    pub source: ManaSource,
    pub map: GameMap,
    pub offers: Offers,
    pub enemies: EnemyPool,
    pub combat: Option<Combat>,
}

impl MatchState {
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Time of day that decides which mana may be used: a combat can impose
    /// night rules by day.
    #[must_use]
    pub fn mana_time(&self) -> TimeOfDay {
        match &self.combat {
            Some(combat) if combat.night_rules => TimeOfDay::Night,
            _ => self.round.time,
        }
    }

    /// Binary encoding, for checkpoints and exact state comparisons.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

/// Part of the state a change touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Round,
    Phase,
    Effects,
    Source,
    Player(PlayerId),
    Map,
    Offers,
    Enemies,
    Combat,
    History,
}

/// Target of recorded changes: the state plus the queue of pending
/// notifications.
#[derive(Clone, Debug)]
pub struct Table {
    pub state: MatchState,
    pub(crate) notices: Vec<Topic>,
}

impl Table {
    #[must_use]
    pub fn new(state: MatchState) -> Self {
        Self {
            state,
            notices: Vec::new(),
        }
    }

    pub(crate) fn notify(&mut self, topic: Topic) {
        self.notices.push(topic);
    }

    /// Pending notifications, each topic once, in order of first
    /// occurrence.
    pub(crate) fn take_notices(&mut self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = Vec::new();
        for topic in self.notices.drain(..) {
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
        topics
    }
}

/// A recorded mutation of the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    Phase { before: Phase, after: Phase },
    Effects(EffectEdit),
    Source(SourceEdit),
    Player { player: PlayerId, edit: PlayerEdit },
    Site(SiteEdit),
    Offer(OfferEdit),
    Pool(PoolEdit),
    Combat(CombatEdit),
    /// Start or finish a combat.
    Engage {
        before: Option<Box<Combat>>,
        after: Option<Box<Combat>>,
    },
}

impl Change {
    /// The change that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Change::Phase { before, after } => Change::Phase {
                before: *after,
                after: *before,
            },
            Change::Effects(edit) => Change::Effects(edit.inverse()),
            Change::Source(edit) => Change::Source(edit.inverse()),
            Change::Player { player, edit } => Change::Player {
                player: *player,
                edit: edit.inverse(),
            },
            Change::Site(edit) => Change::Site(edit.inverse()),
            Change::Offer(edit) => Change::Offer(edit.inverse()),
            Change::Pool(edit) => Change::Pool(edit.inverse()),
            Change::Combat(edit) => Change::Combat(edit.inverse()),
            Change::Engage { before, after } => Change::Engage {
                before: after.clone(),
                after: before.clone(),
            },
        }
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            Change::Phase { .. } => Topic::Phase,
            Change::Effects(_) => Topic::Effects,
            Change::Source(_) => Topic::Source,
            Change::Player { player, .. } => Topic::Player(*player),
            Change::Site(_) => Topic::Map,
            Change::Offer(_) => Topic::Offers,
            Change::Pool(_) => Topic::Enemies,
            Change::Combat(_) | Change::Engage { .. } => Topic::Combat,
        }
    }
}

fn no_combat() -> Error {
    Error::invalid("there is no combat")
}

impl Command<Table> for Change {
    fn execute(&self, table: &mut Table) -> Result<()> {
        let state = &mut table.state;
        match self {
            Change::Phase { before, after } => {
                if state.phase != *before {
                    return Err(Error::invalid(format!(
                        "phase is {}, expected {before}",
                        state.phase
                    )));
                }
                state.phase = *after;
            }
            Change::Effects(edit) => state.effects.apply(edit)?,
            Change::Source(edit) => state.source.apply(edit)?,
            Change::Player { player, edit } => state.players[*player].apply(edit)?,
            Change::Site(edit) => state.map.apply(edit)?,
            Change::Offer(edit) => state.offers.apply(edit)?,
            Change::Pool(edit) => state.enemies.apply(edit)?,
            Change::Combat(edit) => state.combat.as_mut().ok_or_else(no_combat)?.apply(edit)?,
            Change::Engage { before, after } => {
                if state.combat.as_ref() != before.as_deref() {
                    return Err(Error::invalid("combat does not match edit"));
                }
                state.combat = after.as_deref().cloned();
            }
        }
        table.notify(self.topic());
        Ok(())
    }
}
