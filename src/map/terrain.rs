//! Terrain types and movement costs.

use serde::{Deserialize, Serialize};

use crate::core::TimeOfDay;

/// Terrain of one hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Hills,
    Forest,
    Wasteland,
    Desert,
    Swamp,
    /// Also used for the sea on the start tile.
    Lake,
    Mountain,
    City,
}

impl Terrain {
    /// Every terrain, in table order.
    pub const ALL: [Terrain; 9] = [
        Terrain::Plains,
        Terrain::Hills,
        Terrain::Forest,
        Terrain::Wasteland,
        Terrain::Desert,
        Terrain::Swamp,
        Terrain::Lake,
        Terrain::Mountain,
        Terrain::City,
    ];

    /// Parse the one-letter code used in tile layouts (`phfwdslmc`).
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let terrain = match c {
            'p' => Terrain::Plains,
            'h' => Terrain::Hills,
            'f' => Terrain::Forest,
            'w' => Terrain::Wasteland,
            'd' => Terrain::Desert,
            's' => Terrain::Swamp,
            'l' => Terrain::Lake,
            'm' => Terrain::Mountain,
            'c' => Terrain::City,
            _ => return None,
        };
        Some(terrain)
    }

    /// Move points needed to enter, before modifiers. `None` if impassable.
    #[must_use]
    pub const fn base_cost(self, time: TimeOfDay) -> Option<u32> {
        let night = matches!(time, TimeOfDay::Night);
        match self {
            Terrain::Plains | Terrain::City => Some(2),
            Terrain::Hills => Some(3),
            Terrain::Forest => Some(if night { 5 } else { 3 }),
            Terrain::Wasteland => Some(4),
            Terrain::Desert => Some(if night { 3 } else { 5 }),
            Terrain::Swamp => Some(5),
            Terrain::Lake | Terrain::Mountain => None,
        }
    }

    /// Whether a turn may end on this terrain at all.
    #[must_use]
    pub const fn is_safe(self) -> bool {
        !matches!(self, Terrain::Lake | Terrain::Mountain)
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Terrain::Plains => "Plains",
            Terrain::Hills => "Hills",
            Terrain::Forest => "Forest",
            Terrain::Wasteland => "Wasteland",
            Terrain::Desert => "Desert",
            Terrain::Swamp => "Swamp",
            Terrain::Lake => "Lake",
            Terrain::Mountain => "Mountain",
            Terrain::City => "City",
        };
        f.write_str(name)
    }
}

/// A change to the cost of one terrain, carried by an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostChange {
    /// Lower the cost by `amount`, but not below `minimum`.
    Reduce { amount: u32, minimum: u32 },
    /// Replace the base cost. Makes impassable terrain passable.
    Set(u32),
}

impl CostChange {
    /// Apply to a base cost.
    #[must_use]
    pub fn apply(self, base: Option<u32>) -> Option<u32> {
        match self {
            CostChange::Reduce { amount, minimum } => {
                base.map(|cost| cost.saturating_sub(amount).max(minimum.min(cost)))
            }
            CostChange::Set(cost) => Some(cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_night_costs() {
        assert_eq!(Terrain::Forest.base_cost(TimeOfDay::Day), Some(3));
        assert_eq!(Terrain::Forest.base_cost(TimeOfDay::Night), Some(5));
        assert_eq!(Terrain::Desert.base_cost(TimeOfDay::Day), Some(5));
        assert_eq!(Terrain::Desert.base_cost(TimeOfDay::Night), Some(3));
        assert_eq!(Terrain::Plains.base_cost(TimeOfDay::Night), Some(2));
        assert_eq!(Terrain::Lake.base_cost(TimeOfDay::Day), None);
        assert_eq!(Terrain::Mountain.base_cost(TimeOfDay::Night), None);
    }

    #[test]
    fn test_from_char() {
        let parsed: Vec<_> = "phfwdslmc".chars().filter_map(Terrain::from_char).collect();
        assert_eq!(parsed, Terrain::ALL.to_vec());
        assert_eq!(Terrain::from_char('x'), None);
    }

    #[test]
    fn test_cost_changes() {
        let reduce = CostChange::Reduce {
            amount: 1,
            minimum: 2,
        };
        assert_eq!(reduce.apply(Some(5)), Some(4));
        assert_eq!(reduce.apply(Some(2)), Some(2));
        assert_eq!(reduce.apply(None), None);

        let free = CostChange::Reduce {
            amount: 1,
            minimum: 0,
        };
        assert_eq!(free.apply(Some(1)), Some(0));
        assert_eq!(CostChange::Set(1).apply(None), Some(1));
    }
}
