//! Sites printed on map hexes and their state during a match.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{ManaColor, PlayerId};
use crate::enemies::{EnemyCategory, EnemyId};

/// Kind of a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteKind {
    Portal,
    CrystalMines(ManaColor),
    MagicalGlade,
    MaraudingOrcs,
    Draconum,
    Village,
    Monastery,
    MageTower,
    Keep,
    MonsterDen,
    SpawningGrounds,
    Dungeon,
    Tomb,
    AncientRuins,
}

impl SiteKind {
    /// Keeps and mage towers: assaulting them costs reputation and their
    /// defenders are fortified.
    #[must_use]
    pub const fn is_fortified(self) -> bool {
        matches!(self, SiteKind::Keep | SiteKind::MageTower)
    }

    /// Rampaging enemies that block their hex until defeated.
    #[must_use]
    pub const fn is_marauding(self) -> bool {
        matches!(self, SiteKind::MaraudingOrcs | SiteKind::Draconum)
    }

    /// Sites fought on entering whose enemies are drawn only then.
    #[must_use]
    pub const fn is_adventure(self) -> bool {
        matches!(
            self,
            SiteKind::Dungeon | SiteKind::Tomb | SiteKind::MonsterDen | SiteKind::SpawningGrounds
        )
    }

    /// Enemies placed on the site when its tile is revealed.
    #[must_use]
    pub fn garrison(self) -> Vector<SiteEnemy> {
        let category = match self {
            SiteKind::MaraudingOrcs => EnemyCategory::MaraudingOrcs,
            SiteKind::Draconum => EnemyCategory::Draconum,
            SiteKind::Keep => EnemyCategory::Keep,
            SiteKind::MageTower => EnemyCategory::MageTower,
            _ => return Vector::new(),
        };
        Vector::unit(SiteEnemy::Hidden(category))
    }

    /// Enemies an adventure site draws when a player enters it.
    #[must_use]
    pub fn adventure_defenders(self) -> &'static [EnemyCategory] {
        match self {
            SiteKind::Dungeon | SiteKind::MonsterDen => &[EnemyCategory::Dungeon],
            SiteKind::Tomb => &[EnemyCategory::Draconum],
            SiteKind::SpawningGrounds => &[EnemyCategory::Dungeon, EnemyCategory::Dungeon],
            _ => &[],
        }
    }
}

impl std::fmt::Display for SiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteKind::Portal => f.write_str("Portal"),
            SiteKind::CrystalMines(color) => write!(f, "Crystal Mines ({color})"),
            SiteKind::MagicalGlade => f.write_str("Magical Glade"),
            SiteKind::MaraudingOrcs => f.write_str("Marauding Orcs"),
            SiteKind::Draconum => f.write_str("Draconum"),
            SiteKind::Village => f.write_str("Village"),
            SiteKind::Monastery => f.write_str("Monastery"),
            SiteKind::MageTower => f.write_str("Mage Tower"),
            SiteKind::Keep => f.write_str("Keep"),
            SiteKind::MonsterDen => f.write_str("Monster Den"),
            SiteKind::SpawningGrounds => f.write_str("Spawning Grounds"),
            SiteKind::Dungeon => f.write_str("Dungeon"),
            SiteKind::Tomb => f.write_str("Tomb"),
            SiteKind::AncientRuins => f.write_str("Ancient Ruins"),
        }
    }
}

/// An enemy token lying on a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteEnemy {
    /// Face down: only the category is known.
    Hidden(EnemyCategory),
    Revealed(EnemyId),
}

impl SiteEnemy {
    #[must_use]
    pub const fn revealed(self) -> Option<EnemyId> {
        match self {
            SiteEnemy::Revealed(id) => Some(id),
            SiteEnemy::Hidden(_) => None,
        }
    }
}

/// State of a site on the map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub kind: SiteKind,
    /// Shield token: who conquered the site.
    pub owner: Option<PlayerId>,
    pub enemies: Vector<SiteEnemy>,
}

impl Site {
    #[must_use]
    pub fn new(kind: SiteKind) -> Self {
        Self {
            kind,
            owner: None,
            enemies: kind.garrison(),
        }
    }

    /// Marauders stay active until every enemy on them is defeated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.kind.is_marauding() && !self.enemies.is_empty()
    }

    #[must_use]
    pub fn has_hidden_enemies(&self) -> bool {
        self.enemies.iter().any(|e| matches!(e, SiteEnemy::Hidden(_)))
    }

    /// Enemies already face up, in order.
    pub fn revealed_enemies(&self) -> impl Iterator<Item = EnemyId> + '_ {
        self.enemies.iter().filter_map(|e| e.revealed())
    }

    /// Whether the site is defended for the purpose of fortification: a
    /// fortified site nobody has conquered yet.
    #[must_use]
    pub fn is_defended(&self) -> bool {
        self.kind.is_fortified() && self.owner.is_none()
    }

    /// The same site without `enemy`.
    #[must_use]
    pub fn without_enemy(&self, enemy: EnemyId) -> Site {
        let mut site = self.clone();
        if let Some(index) = site.enemies.iter().position(|e| e.revealed() == Some(enemy)) {
            site.enemies.remove(index);
        }
        site
    }
}
