//! Moving the hero and exploring new tiles.

use log::info;

use crate::core::{Error, Result};
use crate::effects::Effect;
use crate::map::{HexCoord, Terrain};

use super::engine::{place_tile, Match};
use super::phase::Phase;
use super::player::PlayerEdit;
use super::state::Topic;

/// Move points needed to explore a tile.
pub const EXPLORE_COST: i32 = 2;

impl Match {
    /// Move points needed to enter `terrain` now, after terrain cost
    /// effects. `None` if it cannot be entered.
    #[must_use]
    pub fn move_cost(&self, terrain: Terrain) -> Option<u32> {
        let base = terrain.base_cost(self.round().time);
        match self.effects().terrain_cost_change(terrain) {
            Some(change) => change.apply(base),
            None => base,
        }
    }

    /// Move the hero to the adjacent hex `coords`, paying its move cost.
    ///
    /// By day, moving next to a keep or mage tower turns its garrison face
    /// up. Entering a site may start a combat.
    pub fn move_to(&mut self, coords: HexCoord) -> Result<()> {
        self.action("move", |m| {
            if m.phase() != Phase::Movement {
                return Err(Error::invalid("You can only move during the movement phase."));
            }
            let from = m.current_player().position;
            if !from.is_adjacent(coords) {
                return Err(Error::invalid(format!("{coords} is not adjacent to {from}.")));
            }
            let map = &m.state().map;
            let terrain = map
                .terrain_at(coords)
                .ok_or_else(|| Error::invalid(format!("{coords} is not explored yet.")))?;
            if map.site_at(coords).map_or(false, |site| site.is_active()) {
                return Err(Error::invalid("You cannot enter a hex with marauding enemies."));
            }
            let cost = m
                .move_cost(terrain)
                .ok_or_else(|| Error::invalid(format!("{terrain} cannot be entered.")))?;
            if cost > 0 {
                m.pay_effect(&Effect::Move(cost as i32))?;
            }
            m.edit_player(PlayerEdit::Position {
                before: from,
                after: coords,
            })?;

            if !m.round().is_night() {
                m.reveal_fortified_sites(coords)?;
            }
            m.enter_site(coords, from)
        })
    }

    /// Turn face up the garrisons of fortified sites around `coords`.
    fn reveal_fortified_sites(&mut self, coords: HexCoord) -> Result<()> {
        let hidden: Vec<HexCoord> = self
            .state()
            .map
            .adjacent_sites(coords)
            .filter(|(_, site)| site.kind.is_fortified() && site.has_hidden_enemies())
            .map(|(c, _)| c)
            .collect();
        if hidden.is_empty() {
            return Ok(());
        }
        self.reveal(Topic::Map, |state, rng| {
            for site_coords in hidden {
                if let Some(site) = state.map.site_at(site_coords).cloned() {
                    let revealed = super::sites::draw_site_enemies(&mut state.enemies, rng, &site);
                    state.map.set_site(site_coords, revealed);
                }
            }
        });
        Ok(())
    }

    /// Switch from moving to exploring.
    pub fn begin_explore(&mut self) -> Result<()> {
        self.action("begin explore", |m| {
            if m.phase() != Phase::Movement {
                return Err(Error::invalid("You can only explore during the movement phase."));
            }
            m.set_phase(Phase::Explore)
        })
    }

    /// Explore the tile centred at `center` for two move points.
    pub fn explore(&mut self, center: HexCoord) -> Result<()> {
        self.action("explore", |m| {
            if !matches!(m.phase(), Phase::Movement | Phase::Explore) {
                return Err(Error::invalid("You can only explore during the movement phase."));
            }
            let position = m.current_player().position;
            if !m.state().map.explorable_tiles(position).contains(&center) {
                return Err(Error::invalid(format!("You cannot explore the tile at {center}.")));
            }
            m.pay_effect(&Effect::movement(EXPLORE_COST))?;
            m.set_phase(Phase::Movement)?;
            let tile = m.reveal(Topic::Map, |state, rng| {
                let tile = state.map.pop_tile()?;
                place_tile(state, rng, center, &tile);
                Some(tile)
            });
            match tile {
                Some(tile) => {
                    info!("explored tile {} at {center}", tile.id);
                    Ok(())
                }
                None => Err(Error::invalid("There are no tiles left.")),
            }
        })
    }

    /// Attack the marauders at `coords`, next to the hero.
    pub fn challenge(&mut self, coords: HexCoord) -> Result<()> {
        self.action("challenge", |m| {
            if m.phase() != Phase::Movement {
                return Err(Error::invalid("You can only challenge enemies during the movement phase."));
            }
            let position = m.current_player().position;
            if !m.state().map.adjacent_marauders(position).contains(&coords) {
                return Err(Error::invalid(format!("There are no marauders at {coords} to challenge.")));
            }
            m.start_site_combat(coords, true, None)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchConfig;
    use crate::effects::EffectKind;
    use crate::enemies::EnemyCategory;
    use crate::map::{CostChange, Site, SiteEnemy, SiteKind};

    fn game() -> Match {
        Match::new(MatchConfig::solo(2))
    }

    fn give_move(game: &mut Match, points: i32) {
        game.action("move points", |m| m.add_effect(&Effect::movement(points)))
            .unwrap();
    }

    /// Empty the face-down garrisons around `coords` without recording it.
    fn clear_garrisons_around(game: &mut Match, coords: HexCoord) {
        for hex in coords.neighbors() {
            let Some(site) = game.state().map.site_at(hex) else {
                continue;
            };
            if site.has_hidden_enemies() {
                let mut calm = site.clone();
                calm.enemies.clear();
                game.state_mut_unrecorded().map.set_site(hex, calm);
            }
        }
    }

    #[test]
    fn test_move_pays_terrain_cost() {
        let mut game = game();
        clear_garrisons_around(&mut game, HexCoord::new(1, 0));
        give_move(&mut game, 3);
        game.move_to(HexCoord::new(1, 0)).unwrap();
        assert_eq!(game.current_player().position, HexCoord::new(1, 0));
        assert_eq!(game.effects().move_points(), 1);

        game.undo().unwrap();
        assert_eq!(game.current_player().position, HexCoord::ORIGIN);
        assert_eq!(game.effects().move_points(), 3);
    }

    #[test]
    fn test_moving_next_to_keep_reveals_garrison() {
        let mut game = game();
        let target = HexCoord::new(1, 0);
        clear_garrisons_around(&mut game, target);
        let keep = HexCoord::new(0, 1);
        let mut site = Site::new(SiteKind::Keep);
        site.enemies = vec![SiteEnemy::Hidden(EnemyCategory::Keep)].into();
        game.state_mut_unrecorded().map.set_site(keep, site);

        give_move(&mut game, 3);
        game.move_to(target).unwrap();
        assert!(!game.state().map.site_at(keep).unwrap().has_hidden_enemies());
        assert!(!game.can_undo());
        assert!(!game.undo().unwrap());
        assert_eq!(game.current_player().position, target);
    }

    #[test]
    fn test_cannot_move_into_lake_or_far() {
        let mut game = game();
        give_move(&mut game, 10);
        assert!(game.move_to(HexCoord::new(-1, 0)).is_err());
        assert!(game.move_to(HexCoord::new(2, 0)).is_err());
        assert_eq!(game.effects().move_points(), 10);
    }

    #[test]
    fn test_not_enough_move_points() {
        let mut game = game();
        give_move(&mut game, 2);
        let err = game.move_to(HexCoord::new(1, 1)).unwrap_err();
        assert!(matches!(err, Error::Insufficient { .. }));
        assert_eq!(game.current_player().position, HexCoord::ORIGIN);
    }

    #[test]
    fn test_terrain_cost_effect() {
        let mut game = game();
        game.action("setup", |m| {
            m.add_effect(&Effect::movement(1))?;
            m.add_effect(&Effect::TerrainCost {
                terrain: Terrain::Lake,
                change: CostChange::Set(1),
            })
        })
        .unwrap();
        assert_eq!(game.move_cost(Terrain::Lake), Some(1));
        game.move_to(HexCoord::new(-1, 0)).unwrap();
        assert!(!game.effects().has(EffectKind::Move));
    }

    #[test]
    fn test_explore_phase() {
        let mut game = game();
        game.begin_explore().unwrap();
        assert_eq!(game.phase(), Phase::Explore);
        assert!(game.begin_explore().is_err());
        // the start tile has no unexplored neighbour reachable from the portal
        assert!(game.explore(HexCoord::new(-1, -3)).is_err());
    }
}
