//! What sites do when they are entered, fought over and conquered.

use im::Vector;
use log::{debug, info};

use crate::combat::{CombatReward, EnemyInCombat, RewardKind};
use crate::core::{Error, GameRng, ManaColor, Result};
use crate::enemies::{EnemyPool, PoolEdit};
use crate::map::{HexCoord, Site, SiteEnemy, SiteKind};

use super::engine::Match;
use super::phase::Phase;
use super::player::{Pile, PlayerEdit};
use super::state::{Change, Topic};

/// Reputation lost for assaulting a fortified site.
const ASSAULT_REPUTATION: i32 = -1;

/// Turn every face-down enemy of `site` face up. Enemies whose pile is
/// exhausted are dropped.
pub(crate) fn draw_site_enemies(pool: &mut EnemyPool, rng: &mut GameRng, site: &Site) -> Site {
    let mut revealed = site.clone();
    revealed.enemies = site
        .enemies
        .iter()
        .filter_map(|enemy| match *enemy {
            SiteEnemy::Hidden(category) => pool.draw(category, rng).map(SiteEnemy::Revealed),
            revealed @ SiteEnemy::Revealed(_) => Some(revealed),
        })
        .collect();
    revealed
}

impl Match {
    fn site(&self, coords: HexCoord) -> Result<&Site> {
        self.state()
            .map
            .site_at(coords)
            .ok_or_else(|| Error::invalid(format!("There is no site at {coords}.")))
    }

    /// The hero stepped onto `coords` from `from`.
    pub(crate) fn enter_site(&mut self, coords: HexCoord, from: HexCoord) -> Result<()> {
        let Some(site) = self.state().map.site_at(coords) else {
            return Ok(());
        };
        let kind = site.kind;
        let conquered = site.owner.is_some();
        let empty = site.enemies.is_empty();
        if kind.is_fortified() && !conquered {
            info!("assaulting the {kind} at {coords}");
            self.add_reputation(ASSAULT_REPUTATION)?;
            self.reveal_site(coords);
            return self.start_site_combat(coords, true, Some(from));
        }
        if kind.is_adventure() && !conquered {
            if empty {
                let defenders = kind.adventure_defenders();
                self.reveal(Topic::Map, |state, rng| {
                    let mut drawn = Site::new(kind);
                    drawn.enemies = defenders
                        .iter()
                        .filter_map(|&category| state.enemies.draw(category, rng))
                        .map(SiteEnemy::Revealed)
                        .collect();
                    state.map.set_site(coords, drawn);
                });
            } else {
                self.reveal_site(coords);
            }
            info!("entering the {kind} at {coords}");
            return self.start_site_combat(coords, false, Some(from));
        }
        Ok(())
    }

    /// Turn the enemies on one site face up, if any are hidden.
    pub(crate) fn reveal_site(&mut self, coords: HexCoord) {
        let hidden = self
            .state()
            .map
            .site_at(coords)
            .map_or(false, Site::has_hidden_enemies);
        if hidden {
            self.reveal(Topic::Map, |state, rng| {
                if let Some(site) = state.map.site_at(coords).cloned() {
                    let revealed = draw_site_enemies(&mut state.enemies, rng, &site);
                    state.map.set_site(coords, revealed);
                }
            });
        }
    }

    /// Start a combat against the enemies on `site`. Marauders around the
    /// hero join as provokable enemies if `marauders_provokable`.
    pub(crate) fn start_site_combat(
        &mut self,
        site: HexCoord,
        marauders_provokable: bool,
        retreat_to: Option<HexCoord>,
    ) -> Result<()> {
        let kind = self.site(site)?.kind;
        let restricted = matches!(kind, SiteKind::Dungeon | SiteKind::Tomb);
        let night = restricted || self.round().is_night();
        self.combat_init(!restricted, night, retreat_to)?;
        self.combat_add_enemies(site, false)?;
        if marauders_provokable {
            let position = self.current_player().position;
            for marauders in self.state().map.adjacent_marauders(position) {
                if marauders != site {
                    self.combat_add_enemies(marauders, true)?;
                }
            }
        }
        self.combat_start()
    }

    /// An enemy that came from a site was defeated.
    pub(crate) fn on_enemy_killed(&mut self, enemy: &EnemyInCombat) -> Result<()> {
        let Some(coords) = enemy.site else {
            return Ok(());
        };
        let site = self.site(coords)?;
        let kind = site.kind;
        let after = site.without_enemy(enemy.enemy.id);
        self.set_site(coords, after)?;
        match kind {
            SiteKind::MaraudingOrcs => self.add_reputation(1),
            SiteKind::Draconum => self.add_reputation(2),
            _ => Ok(()),
        }
    }

    /// A combat involving `coords` ended. Returns the rewards the site
    /// grants.
    pub(crate) fn on_combat_end(&mut self, coords: HexCoord) -> Result<Vec<CombatReward>> {
        let site = self.site(coords)?.clone();
        let kind = site.kind;

        if matches!(kind, SiteKind::Dungeon | SiteKind::Tomb) && !site.enemies.is_empty() {
            for enemy in site.revealed_enemies() {
                let category = self.catalog().enemy(enemy)?.category;
                self.record(Change::Pool(PoolEdit::Discard { category, enemy }))?;
            }
            let mut emptied = site.clone();
            emptied.enemies = Vector::new();
            self.set_site(coords, emptied)?;
            debug!("the {kind} at {coords} keeps its secrets");
            return Ok(Vec::new());
        }

        let conquerable = kind.is_fortified() || kind.is_adventure();
        if !conquerable || site.owner.is_some() || !site.enemies.is_empty() {
            return Ok(Vec::new());
        }
        let mut conquered = site;
        conquered.owner = Some(self.current());
        self.set_site(coords, conquered)?;
        info!("{} conquered the {kind} at {coords}", self.current_player().name);

        let rewards = match kind {
            SiteKind::MageTower => vec![CombatReward::new(RewardKind::Spell, 1)],
            SiteKind::Dungeon => {
                let die = self.reveal(Topic::Combat, |_, rng| rng.roll_mana_die());
                if matches!(die, ManaColor::Gold | ManaColor::Black) {
                    vec![CombatReward::new(RewardKind::Artifact, 1)]
                } else {
                    vec![CombatReward::new(RewardKind::Spell, 1)]
                }
            }
            SiteKind::Tomb => vec![
                CombatReward::new(RewardKind::Artifact, 1),
                CombatReward::new(RewardKind::Spell, 1),
            ],
            SiteKind::MonsterDen => vec![CombatReward::new(RewardKind::Crystal, 2)],
            SiteKind::SpawningGrounds => vec![
                CombatReward::new(RewardKind::Artifact, 1),
                CombatReward::new(RewardKind::Crystal, 3),
            ],
            _ => Vec::new(),
        };
        Ok(rewards)
    }

    /// Effects of the site the hero ends the turn on.
    pub(crate) fn site_end_of_turn(&mut self) -> Result<()> {
        let position = self.current_player().position;
        let Some(site) = self.state().map.site_at(position) else {
            return Ok(());
        };
        match site.kind {
            SiteKind::CrystalMines(color) => self.add_crystal(color),
            SiteKind::MagicalGlade => {
                let wound = self.catalog().wound();
                let Some(index) = self.current_player().hand.index_of(&wound) else {
                    return Ok(());
                };
                if self.ask("Throw away a wound from your hand?")? {
                    self.edit_player(PlayerEdit::Remove {
                        pile: Pile::Hand,
                        index,
                        card: wound,
                    })?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Whether the hero stands on a site that allows interaction.
    #[must_use]
    pub fn can_interact(&self) -> bool {
        let position = self.current_player().position;
        self.phase() == Phase::Movement
            && self
                .state()
                .map
                .site_at(position)
                .map_or(false, |site| matches!(site.kind, SiteKind::Village | SiteKind::Monastery))
    }
}
