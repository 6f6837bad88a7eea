//! Axial hex coordinates.
//!
//! The x axis points right and the y axis points to the upper left. Map
//! tiles are 7-hex flowers whose centres form a sublattice of the grid.

use serde::{Deserialize, Serialize};

/// Integer coordinate of a hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub x: i32,
    pub y: i32,
}

/// Offsets of the six neighbours, starting top right, clockwise.
const NEIGHBORS: [(i32, i32); 6] = [(1, 1), (1, 0), (0, -1), (-1, -1), (-1, 0), (0, 1)];

/// Offsets from a tile centre to the centres of the six adjacent tiles.
const TILE_NEIGHBORS: [(i32, i32); 6] = [(3, 2), (2, -1), (-1, -3), (-3, -2), (-2, 1), (1, 3)];

impl HexCoord {
    /// The origin, centre of the start tile.
    pub const ORIGIN: HexCoord = HexCoord { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbour `index` (0..6), starting top right, clockwise.
    #[must_use]
    pub fn neighbor(self, index: usize) -> Self {
        let (dx, dy) = NEIGHBORS[index % 6];
        Self::new(self.x + dx, self.y + dy)
    }

    /// All six neighbours in clockwise order.
    pub fn neighbors(self) -> impl Iterator<Item = HexCoord> {
        (0..6).map(move |i| self.neighbor(i))
    }

    /// Grid distance.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        ((dx.abs() + dy.abs() + (dx - dy).abs()) / 2) as u32
    }

    #[must_use]
    pub fn is_adjacent(self, other: HexCoord) -> bool {
        self.distance(other) == 1
    }

    /// Whether this hex is the centre of a tile.
    #[must_use]
    pub fn is_tile_center(self) -> bool {
        (3 * self.x - self.y).rem_euclid(7) == 0 && (self.x + 2 * self.y).rem_euclid(7) == 0
    }

    /// Centre of the tile containing this hex.
    #[must_use]
    pub fn tile_center(self) -> HexCoord {
        if self.is_tile_center() {
            return self;
        }
        // every hex is a centre or adjacent to exactly one centre
        self.neighbors()
            .find(|n| n.is_tile_center())
            .unwrap_or(self)
    }

    /// Position within the tile: 0 for the centre, 1..=6 for the ring.
    #[must_use]
    pub fn index_in_tile(self) -> usize {
        let center = self.tile_center();
        let offset = self - center;
        HexCoord::ORIGIN
            .neighbors()
            .position(|n| n == offset)
            .map_or(0, |i| i + 1)
    }

    /// Centres of the six tiles around the tile centred here.
    pub fn tile_neighbors(self) -> impl Iterator<Item = HexCoord> {
        TILE_NEIGHBORS
            .iter()
            .map(move |&(dx, dy)| HexCoord::new(self.x + dx, self.y + dy))
    }
}

impl std::ops::Add for HexCoord {
    type Output = HexCoord;

    fn add(self, other: HexCoord) -> HexCoord {
        HexCoord::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for HexCoord {
    type Output = HexCoord;

    fn sub(self, other: HexCoord) -> HexCoord {
        HexCoord::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_are_adjacent() {
        let hex = HexCoord::new(2, -3);
        for n in hex.neighbors() {
            assert_eq!(hex.distance(n), 1);
            assert!(n.is_adjacent(hex));
        }
        assert_eq!(hex.neighbors().count(), 6);
    }

    #[test]
    fn test_distance() {
        assert_eq!(HexCoord::ORIGIN.distance(HexCoord::new(3, 3)), 3);
        assert_eq!(HexCoord::ORIGIN.distance(HexCoord::new(2, -1)), 3);
        assert_eq!(HexCoord::new(1, 3).distance(HexCoord::new(1, 3)), 0);
    }

    #[test]
    fn test_tile_centers() {
        assert!(HexCoord::ORIGIN.is_tile_center());
        assert!(HexCoord::new(1, 3).is_tile_center());
        assert!(HexCoord::new(3, 2).is_tile_center());
        assert!(!HexCoord::new(1, 1).is_tile_center());

        for center in HexCoord::ORIGIN.tile_neighbors() {
            assert!(center.is_tile_center());
        }
    }

    #[test]
    fn test_tile_center_of_ring() {
        let center = HexCoord::new(3, 2);
        for (i, hex) in center.neighbors().enumerate() {
            assert_eq!(hex.tile_center(), center);
            assert_eq!(hex.index_in_tile(), i + 1);
        }
        assert_eq!(center.index_in_tile(), 0);
    }
}
