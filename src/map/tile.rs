//! Map tiles and the face-down tile pile.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, ManaColor};

use super::site::SiteKind;
use super::terrain::Terrain;

/// Terrains of every tile: centre first, then the ring starting top right,
/// clockwise.
const TERRAINS: [(&str, &str); 17] = [
    ("A", "pfplllp"),
    ("B", "pfppllp"),
    ("1", "flpppff"),
    ("2", "hfpphph"),
    ("3", "fhhhppp"),
    ("4", "ddmpphd"),
    ("5", "lpphfff"),
    ("6", "hfpfhhm"),
    ("7", "sffpppl"),
    ("8", "sfpssff"),
    ("9", "mmwpwpw"),
    ("10", "mfphhhh"),
    ("11", "pllhlph"),
    ("c1", "ddddhhm"),
    ("c2", "lshssfl"),
    ("c3", "wwhwhwm"),
    ("c4", "mhwwwwh"),
];

const COUNTRYSIDE: [&str; 11] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"];
const CORE: [&str; 4] = ["c1", "c2", "c3", "c4"];

fn sites(id: &str) -> [Option<SiteKind>; 7] {
    use SiteKind::*;
    match id {
        "A" | "B" => [Some(Portal), None, None, None, None, None, None],
        "1" => [Some(MagicalGlade), None, Some(Village), None, None, None, Some(MaraudingOrcs)],
        "2" => [
            None,
            Some(MagicalGlade),
            Some(Village),
            None,
            Some(CrystalMines(ManaColor::Green)),
            None,
            Some(MaraudingOrcs),
        ],
        "3" => [None, Some(Keep), None, Some(CrystalMines(ManaColor::White)), Some(Village), None, None],
        "4" => [Some(MageTower), None, None, Some(Village), None, Some(MaraudingOrcs), None],
        "5" => [
            None,
            Some(Monastery),
            Some(MaraudingOrcs),
            Some(CrystalMines(ManaColor::Blue)),
            None,
            Some(MagicalGlade),
            None,
        ],
        "6" => [Some(CrystalMines(ManaColor::Red)), None, None, Some(MaraudingOrcs), None, Some(MonsterDen), None],
        "7" => [None, Some(MaraudingOrcs), Some(MagicalGlade), Some(Dungeon), None, Some(Monastery), None],
        "8" => [Some(MaraudingOrcs), Some(AncientRuins), None, Some(Village), None, None, Some(MagicalGlade)],
        "9" => [None, None, Some(Keep), None, Some(MageTower), None, Some(Dungeon)],
        "10" => [None, None, None, Some(AncientRuins), Some(Keep), None, Some(MonsterDen)],
        "11" => [Some(MageTower), None, None, Some(MaraudingOrcs), None, Some(AncientRuins), None],
        "c1" => [Some(Monastery), Some(Tomb), None, None, None, Some(SpawningGrounds), None],
        "c2" => [
            None,
            Some(AncientRuins),
            Some(CrystalMines(ManaColor::Green)),
            Some(Draconum),
            Some(MageTower),
            None,
            None,
        ],
        "c3" => [
            None,
            Some(AncientRuins),
            Some(MageTower),
            None,
            Some(CrystalMines(ManaColor::Red)),
            Some(Tomb),
            None,
        ],
        "c4" => [
            Some(Draconum),
            None,
            Some(Keep),
            None,
            Some(AncientRuins),
            None,
            Some(CrystalMines(ManaColor::Blue)),
        ],
        _ => [None; 7],
    }
}

/// A map tile: a centre hex and its six neighbours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub terrains: [Terrain; 7],
    pub sites: [Option<SiteKind>; 7],
}

impl Tile {
    /// Look up a built-in tile: `A`/`B` (start), `1`..`11` (countryside),
    /// `c1`..`c4` (core).
    #[must_use]
    pub fn get(id: &str) -> Option<Tile> {
        let (_, layout) = TERRAINS.iter().find(|(key, _)| *key == id)?;
        let mut terrains = [Terrain::Plains; 7];
        for (slot, c) in terrains.iter_mut().zip(layout.chars()) {
            *slot = Terrain::from_char(c)?;
        }
        Some(Tile {
            id: id.to_string(),
            terrains,
            sites: sites(id),
        })
    }

    pub fn countryside_ids() -> impl Iterator<Item = &'static str> {
        COUNTRYSIDE.iter().copied()
    }

    pub fn core_ids() -> impl Iterator<Item = &'static str> {
        CORE.iter().copied()
    }
}

/// Which placement rule applies to the next tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PileStage {
    /// Adjacent to two tiles, or to a tile that is adjacent to two.
    Countryside,
    /// Adjacent to two tiles.
    Core,
    /// Adjacent to three tiles.
    Rest,
    Empty,
}

/// Face-down tiles waiting to be explored, drawn from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePile {
    tiles: Vector<String>,
    core: usize,
    rest: usize,
}

impl TilePile {
    /// A pile in the given order where every tile counts as countryside.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            tiles: ids.into_iter().collect(),
            core: 0,
            rest: 0,
        }
    }

    /// The standard wedge pile: `countryside` random countryside tiles, then
    /// `core` random core tiles, then everything left in random order.
    #[must_use]
    pub fn standard(countryside: usize, core: usize, rng: &mut GameRng) -> Self {
        let mut country: Vec<String> = Tile::countryside_ids().map(String::from).collect();
        let mut cores: Vec<String> = Tile::core_ids().map(String::from).collect();
        rng.shuffle(&mut country);
        rng.shuffle(&mut cores);

        let countryside = countryside.min(country.len());
        let core = core.min(cores.len());
        let mut rest: Vec<String> = country.split_off(countryside);
        rest.extend(cores.split_off(core));
        rng.shuffle(&mut rest);

        let mut tiles: Vector<String> = country.into_iter().collect();
        tiles.extend(cores);
        let rest_len = rest.len();
        tiles.extend(rest);
        Self {
            tiles,
            core,
            rest: rest_len,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn stage(&self) -> PileStage {
        let left = self.tiles.len();
        if left == 0 {
            PileStage::Empty
        } else if left <= self.rest {
            PileStage::Rest
        } else if left <= self.rest + self.core {
            PileStage::Core
        } else {
            PileStage::Countryside
        }
    }

    /// Take the next tile.
    pub fn pop(&mut self) -> Option<Tile> {
        let id = self.tiles.pop_front()?;
        Tile::get(&id)
    }
}
