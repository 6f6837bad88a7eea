//! The player-facing combat handle.

use crate::core::Result;
use crate::game::Match;
use crate::map::HexCoord;

use super::enemy::CombatEnemyId;
use super::state::Combat;

/// Combat actions of the current player, borrowed from a [`Match`].
///
/// Like every other action, each method runs as one macro on the undo
/// history.
///
/// ```no_run
/// # use mage_knight::core::MatchConfig;
/// # use mage_knight::game::Match;
/// # use mage_knight::map::HexCoord;
/// let mut game = Match::new(MatchConfig::solo(3));
/// let orcs = HexCoord::new(1, 0);
/// game.combat().begin(orcs, false)?;
/// game.combat().next()?;
/// # Ok::<(), mage_knight::core::Error>(())
/// ```
pub struct CombatActions<'m> {
    game: &'m mut Match,
}

impl<'m> CombatActions<'m> {
    pub(crate) fn new(game: &'m mut Match) -> Self {
        Self { game }
    }

    /// The combat in progress, if any.
    #[must_use]
    pub fn state(&self) -> Option<&Combat> {
        self.game.combat_state()
    }

    /// Start a combat against the enemies on `site`, pulling in the
    /// marauders around the hero as provokable enemies if asked to.
    pub fn begin(self, site: HexCoord, marauders_provokable: bool) -> Result<()> {
        self.game.action("begin combat", |m| {
            m.start_site_combat(site, marauders_provokable, None)
        })
    }

    /// Open a combat without enemies. Add them with
    /// [`add_enemies`](Self::add_enemies), then [`start`](Self::start).
    pub fn init(self, units_allowed: bool, night_rules: bool) -> Result<()> {
        self.game.action("init combat", |m| {
            m.combat_init(units_allowed, night_rules, None)
        })
    }

    pub fn add_enemies(self, site: HexCoord, provokable: bool) -> Result<()> {
        self.game
            .action("add enemies", |m| m.combat_add_enemies(site, provokable))
    }

    pub fn start(self) -> Result<()> {
        self.game.action("start combat", Match::combat_start)
    }

    pub fn set_enemy_selected(self, enemy: CombatEnemyId, selected: bool) -> Result<()> {
        self.game
            .action("select enemy", |m| m.select_enemy(enemy, selected))
    }

    /// Resolve the selected enemies with the banked effects.
    pub fn next(self) -> Result<()> {
        self.game.action("next", Match::combat_next)
    }

    pub fn skip(self) -> Result<()> {
        self.game.action("skip", Match::combat_skip)
    }

    /// Assign the damage of the selected enemy to unit `unit`.
    pub fn assign_damage_to_unit(self, unit: usize) -> Result<()> {
        self.game
            .action("assign damage", |m| m.assign_damage_to_unit(unit))
    }

    pub fn choose_reward_type(self, reward: usize) -> Result<()> {
        self.game
            .action("choose reward", |m| m.choose_reward_type(reward))
    }

    pub fn choose_reward_item(self, item: usize) -> Result<()> {
        self.game
            .action("choose reward item", |m| m.choose_reward_item(item))
    }
}
