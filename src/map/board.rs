//! The explored map: placed tiles, terrain, sites and the tile pile.

use im::OrdMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Error, PlayerId, Result};

use super::hex::HexCoord;
use super::site::{Site, SiteKind};
use super::terrain::Terrain;
use super::tile::{PileStage, Tile, TilePile};

/// An undoable change to a site: the whole site before and after.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEdit {
    pub coords: HexCoord,
    pub before: Site,
    pub after: Site,
}

impl SiteEdit {
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            coords: self.coords,
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}

/// The map of a match in the wedge shape: the start tile at the origin and
/// every further tile between the two coasts through `(1,3)` and `(3,2)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    tiles: OrdMap<HexCoord, String>,
    terrains: OrdMap<HexCoord, Terrain>,
    sites: OrdMap<HexCoord, Site>,
    pile: TilePile,
}

impl GameMap {
    #[must_use]
    pub fn new(pile: TilePile) -> Self {
        Self {
            pile,
            ..Self::default()
        }
    }

    /// Put `tile` with its centre at `center`. Returns the coordinates of
    /// the sites it brought, centre first.
    pub fn place_tile(&mut self, center: HexCoord, tile: &Tile) -> Vec<HexCoord> {
        debug_assert!(center.is_tile_center(), "{center} is not a tile centre");
        let hexes = std::iter::once(center).chain(center.neighbors());
        let mut placed = Vec::new();
        for ((coords, terrain), site) in hexes.zip(tile.terrains).zip(tile.sites) {
            self.terrains.insert(coords, terrain);
            if let Some(kind) = site {
                self.sites.insert(coords, Site::new(kind));
                placed.push(coords);
            }
        }
        self.tiles.insert(center, tile.id.clone());
        debug!("placed tile {} at {center}", tile.id);
        placed
    }

    /// Draw the next tile from the pile.
    pub fn pop_tile(&mut self) -> Option<Tile> {
        self.pile.pop()
    }

    #[must_use]
    pub fn pile(&self) -> &TilePile {
        &self.pile
    }

    pub fn tiles(&self) -> impl Iterator<Item = (HexCoord, &str)> {
        self.tiles.iter().map(|(c, id)| (*c, id.as_str()))
    }

    #[must_use]
    pub fn terrain_at(&self, coords: HexCoord) -> Option<Terrain> {
        self.terrains.get(&coords).copied()
    }

    #[must_use]
    pub fn site_at(&self, coords: HexCoord) -> Option<&Site> {
        self.sites.get(&coords)
    }

    pub fn sites(&self) -> impl Iterator<Item = (HexCoord, &Site)> {
        self.sites.iter().map(|(c, s)| (*c, s))
    }

    /// Sites on the six hexes around `coords`, clockwise from top right.
    pub fn adjacent_sites(&self, coords: HexCoord) -> impl Iterator<Item = (HexCoord, &Site)> {
        coords
            .neighbors()
            .filter_map(move |n| self.sites.get(&n).map(|s| (n, s)))
    }

    /// Active marauders around `coords`.
    #[must_use]
    pub fn adjacent_marauders(&self, coords: HexCoord) -> Vec<HexCoord> {
        self.adjacent_sites(coords)
            .filter(|(_, site)| site.is_active())
            .map(|(c, _)| c)
            .collect()
    }

    /// Apply a site edit. Fails without changes if the site does not match.
    pub fn apply(&mut self, edit: &SiteEdit) -> Result<()> {
        match self.sites.get(&edit.coords) {
            Some(site) if *site == edit.before => {
                self.sites.insert(edit.coords, edit.after.clone());
                Ok(())
            }
            _ => Err(Error::invalid(format!("site at {} does not match edit", edit.coords))),
        }
    }

    /// Overwrite a site without recording it. Used for revealed information.
    pub fn set_site(&mut self, coords: HexCoord, site: Site) {
        self.sites.insert(coords, site);
    }

    /// Whether the tile centre lies in the wedge between the two coasts.
    #[must_use]
    pub fn is_in_wedge(center: HexCoord) -> bool {
        let m = (3 * center.y - 2 * center.x).div_euclid(7);
        let n = (center.x - m).div_euclid(3);
        m >= 0 && n >= 0
    }

    fn placed_tile_neighbors(&self, center: HexCoord) -> Vec<HexCoord> {
        center
            .tile_neighbors()
            .filter(|n| self.tiles.contains_key(n))
            .collect()
    }

    /// Tile centres a player standing on `from` may explore.
    #[must_use]
    pub fn explorable_tiles(&self, from: HexCoord) -> Vec<HexCoord> {
        let stage = self.pile.stage();
        if stage == PileStage::Empty {
            return Vec::new();
        }
        let mut centers: Vec<HexCoord> = Vec::new();
        for n in from.neighbors() {
            if self.terrains.contains_key(&n) {
                continue;
            }
            let center = n.tile_center();
            if !centers.contains(&center) && Self::is_in_wedge(center) {
                centers.push(center);
            }
        }
        centers.retain(|&center| {
            let neighbors = self.placed_tile_neighbors(center);
            match stage {
                PileStage::Countryside => {
                    neighbors.len() >= 2
                        || neighbors
                            .first()
                            .map_or(false, |&n| self.placed_tile_neighbors(n).len() >= 2)
                }
                PileStage::Core => neighbors.len() >= 2,
                PileStage::Rest => neighbors.len() >= 3,
                PileStage::Empty => false,
            }
        });
        centers
    }

    /// Players must end their turn on a safe space.
    #[must_use]
    pub fn is_safe_space(&self, coords: HexCoord, player: PlayerId, shared: bool) -> bool {
        match self.terrain_at(coords) {
            Some(terrain) if terrain.is_safe() => {}
            _ => return false,
        }
        let site = self.site_at(coords);
        if let Some(site) = site {
            if site.kind.is_fortified() && site.owner != Some(player) {
                return false;
            }
            if site.is_active() {
                return false;
            }
        }
        !shared || matches!(site, Some(s) if s.kind == SiteKind::Portal)
    }
}
