use crate::island::{Island, IslandId, SizeClass};
use serde::{Deserialize, Serialize};
use shared::Coord;

/// Square sea chart. Each cell is either open water or part of one island.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    pub size: usize,
    grid: Vec<Vec<Option<IslandId>>>,
}

impl Map {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            grid: vec![vec![None; size]; size],
        }
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        let size = self.size as i32;
        (0..size).contains(&coord.x) && (0..size).contains(&coord.y)
    }

    /// Island occupying a cell (None for water or outside the map)
    pub fn island_at(&self, coord: Coord) -> Option<IslandId> {
        if !self.in_bounds(coord) {
            return None;
        }
        self.grid[coord.x as usize][coord.y as usize]
    }

    /// In bounds and not covered by any island
    pub fn is_water(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && self.island_at(coord).is_none()
    }

    /// Whether an island of this size fits at `anchor` with its water margin clear
    pub fn can_place(&self, size: SizeClass, anchor: Coord) -> bool {
        let fits = size
            .footprint()
            .into_iter()
            .all(|(dx, dy)| self.in_bounds(anchor.offset(dx, dy)));
        if !fits {
            return false;
        }

        // Buffer cells past the map edge count as clear
        size.buffer()
            .into_iter()
            .map(|(dx, dy)| anchor.offset(dx, dy))
            .all(|cell| self.island_at(cell).is_none())
    }

    /// Claim the footprint for `island` and record its anchor.
    /// Returns false, leaving everything untouched, if the spot is taken or
    /// the island already sits somewhere.
    pub fn place(&mut self, id: IslandId, island: &mut Island, anchor: Coord) -> bool {
        if island.coordinates.is_some() || !self.can_place(island.size, anchor) {
            return false;
        }

        for (dx, dy) in island.size.footprint() {
            let cell = anchor.offset(dx, dy);
            self.grid[cell.x as usize][cell.y as usize] = Some(id);
        }
        island.coordinates = Some(anchor);
        true
    }

    /// Every cell covered by the given island
    pub fn cells_of(&self, id: IslandId) -> Vec<Coord> {
        self.cells().filter(|c| self.island_at(*c) == Some(id)).collect()
    }

    pub fn water_cells(&self) -> Vec<Coord> {
        self.cells().filter(|c| self.is_water(*c)).collect()
    }

    /// All coordinates in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let size = self.size as i32;
        (0..size).flat_map(move |x| (0..size).map(move |y| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn island(size: SizeClass) -> Island {
        let mut rng = StdRng::seed_from_u64(3);
        let mut island = Island::generate("Test Isle".to_string(), &mut rng);
        island.size = size;
        island
    }

    #[test]
    fn test_place_claims_footprint() {
        let mut map = Map::new(10);
        let mut large = island(SizeClass::Large);

        assert!(map.place(IslandId(0), &mut large, Coord::new(2, 3)));
        assert_eq!(large.coordinates, Some(Coord::new(2, 3)));
        assert_eq!(map.cells_of(IslandId(0)).len(), 9);
        assert_eq!(map.island_at(Coord::new(4, 5)), Some(IslandId(0)));
        assert!(map.is_water(Coord::new(5, 5)));
    }

    #[test]
    fn test_place_rejects_footprint_over_edge() {
        let mut map = Map::new(10);
        let mut medium = island(SizeClass::Medium);

        assert!(!map.place(IslandId(0), &mut medium, Coord::new(9, 0)));
        assert!(medium.coordinates.is_none());
        assert!(map.water_cells().len() == 100);
    }

    #[test]
    fn test_buffer_may_hang_over_edge() {
        let mut map = Map::new(10);
        let mut small = island(SizeClass::Small);
        assert!(map.place(IslandId(0), &mut small, Coord::new(0, 0)));
    }

    #[test]
    fn test_place_keeps_two_cells_of_water() {
        let mut map = Map::new(12);
        let mut first = island(SizeClass::Small);
        assert!(map.place(IslandId(0), &mut first, Coord::new(5, 5)));

        // Two cells away on either side is still too close
        for anchor in [Coord::new(7, 5), Coord::new(3, 5), Coord::new(5, 7), Coord::new(3, 3)] {
            let mut other = island(SizeClass::Small);
            assert!(!map.place(IslandId(1), &mut other, anchor), "{}", anchor);
        }

        let mut far = island(SizeClass::Small);
        assert!(map.place(IslandId(1), &mut far, Coord::new(8, 5)));
    }

    #[test]
    fn test_island_is_placed_once() {
        let mut map = Map::new(12);
        let mut small = island(SizeClass::Small);
        assert!(map.place(IslandId(0), &mut small, Coord::new(1, 1)));
        assert!(!map.place(IslandId(0), &mut small, Coord::new(8, 8)));
        assert_eq!(small.coordinates, Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_lookups_outside_map() {
        let map = Map::new(5);
        assert_eq!(map.island_at(Coord::new(-1, 0)), None);
        assert!(!map.is_water(Coord::new(5, 0)));
        assert!(!map.in_bounds(Coord::new(0, 5)));
    }
}
