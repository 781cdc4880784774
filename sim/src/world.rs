use crate::island::{Island, IslandId, SizeClass};
use crate::map::Map;
use crate::port::Port;
use crate::trade_ship::TradeShip;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{catalog, Coord};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Edge length of the square map
    pub map_size: usize,
    pub island_count: usize,
    /// Random anchors tried per island before it is dropped
    pub placement_attempts: u32,
    pub min_inhabited: usize,
    /// Trade ship cap contributed by every inhabited island
    pub ships_per_inhabited_island: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            map_size: 20,
            island_count: 5,
            placement_attempts: 100,
            min_inhabited: 2,
            ships_per_inhabited_island: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("map size {0} is too small for two separated islands")]
    MapTooSmall(usize),
    #[error("no room left on the map for another inhabited island")]
    Crowded,
    #[error("no inhabited island to start on")]
    NoSettlement,
    #[error("the map has no open water")]
    NoOpenWater,
}

/// The archipelago: the map, every placed island, and the harbours that own
/// the trade fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub config: WorldConfig,
    pub map: Map,
    /// Placed islands only, indexed by `IslandId`
    pub islands: Vec<Island>,
    pub ports: Vec<Port>,
}

impl World {
    /// Generate and place islands, then make sure enough of them are settled.
    /// Islands that find no room are left out.
    pub fn generate<R: Rng + ?Sized>(
        config: WorldConfig,
        fare: u32,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        // Two small islands need at least three rows between their anchors
        if config.map_size < 4 {
            return Err(WorldError::MapTooSmall(config.map_size));
        }

        let mut world = Self {
            map: Map::new(config.map_size),
            islands: Vec::new(),
            ports: Vec::new(),
            config,
        };
        let mut names = HashSet::new();

        for _ in 0..world.config.island_count {
            let name = unique_island_name(&mut names, rng);
            let mut island = Island::generate(name, rng);
            if world.place_randomly(&mut island, rng) {
                world.islands.push(island);
            } else {
                warn!(
                    island = %island.name,
                    attempts = world.config.placement_attempts,
                    "no room for island, leaving it out"
                );
            }
        }

        world.ensure_min_inhabited(&mut names, rng)?;

        for (i, island) in world.islands.iter().enumerate() {
            for town in 0..island.towns.len() {
                world.ports.push(Port::new(IslandId(i), town, fare));
            }
        }

        debug!(
            islands = world.islands.len(),
            inhabited = world.inhabited_count(),
            ports = world.ports.len(),
            "world generated"
        );
        Ok(world)
    }

    fn place_randomly<R: Rng + ?Sized>(&mut self, island: &mut Island, rng: &mut R) -> bool {
        let id = IslandId(self.islands.len());
        let limit = self.config.map_size as i32 - island.size.side() + 1;
        if limit <= 0 {
            return false;
        }

        for _ in 0..self.config.placement_attempts {
            let anchor = Coord::new(rng.gen_range(0..limit), rng.gen_range(0..limit));
            if self.map.place(id, island, anchor) {
                return true;
            }
        }
        false
    }

    /// Scan the map in row order for the first spot that fits
    fn place_first_fit(&mut self, island: &mut Island) -> bool {
        let id = IslandId(self.islands.len());
        let cells: Vec<Coord> = self.map.cells().collect();
        cells.into_iter().any(|anchor| self.map.place(id, island, anchor))
    }

    fn ensure_min_inhabited<R: Rng + ?Sized>(
        &mut self,
        names: &mut HashSet<String>,
        rng: &mut R,
    ) -> Result<(), WorldError> {
        while self.inhabited_count() < self.config.min_inhabited {
            if let Some(island) = self.islands.iter_mut().find(|i| !i.inhabited) {
                debug!(island = %island.name, "settling island to meet the minimum");
                island.settle(rng);
                continue;
            }

            let name = unique_island_name(names, rng);
            let mut island = Island::generate(name, rng);
            island.size = SizeClass::Small;
            island.settle(rng);

            if self.place_randomly(&mut island, rng) || self.place_first_fit(&mut island) {
                debug!(island = %island.name, "added inhabited island to meet the minimum");
                self.islands.push(island);
            } else {
                return Err(WorldError::Crowded);
            }
        }
        Ok(())
    }

    pub fn island(&self, id: IslandId) -> Option<&Island> {
        self.islands.get(id.0)
    }

    pub fn island_mut(&mut self, id: IslandId) -> Option<&mut Island> {
        self.islands.get_mut(id.0)
    }

    pub fn inhabited_count(&self) -> usize {
        self.islands.iter().filter(|i| i.inhabited).count()
    }

    pub fn inhabited(&self) -> impl Iterator<Item = (IslandId, &Island)> {
        self.islands
            .iter()
            .enumerate()
            .filter(|(_, island)| island.inhabited)
            .map(|(i, island)| (IslandId(i), island))
    }

    /// World-wide trade ship limit
    pub fn max_trade_ships(&self) -> usize {
        self.inhabited_count() * self.config.ships_per_inhabited_island
    }

    pub fn active_trade_ships(&self) -> usize {
        self.ports.iter().map(|p| p.ships.len()).sum()
    }

    pub fn trade_ships(&self) -> impl Iterator<Item = &TradeShip> {
        self.ports.iter().flat_map(|p| p.ships.iter())
    }

    pub fn trade_ship(&self, id: Uuid) -> Option<&TradeShip> {
        self.trade_ships().find(|s| s.id == id)
    }

    /// Trade ships moored at the island's anchor
    pub fn docked_at(&self, id: IslandId) -> Vec<&TradeShip> {
        let Some(island) = self.island(id) else {
            return Vec::new();
        };
        self.trade_ships().filter(|s| s.is_docked_at(island)).collect()
    }

    pub fn port(&self, island: IslandId, town: usize) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| p.island == island && p.town == town)
    }

    /// Closest inhabited island to a point, ignoring `except`
    pub fn nearest_inhabited(&self, from: Coord, except: Option<IslandId>) -> Option<IslandId> {
        self.inhabited()
            .filter(|(id, _)| Some(*id) != except)
            .filter_map(|(id, island)| Some((id, island.coordinates?.distance(from))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

/// Prefix/suffix name not yet used in this world. Falls back to a numbered
/// name once the pool runs dry.
fn unique_island_name<R: Rng + ?Sized>(taken: &mut HashSet<String>, rng: &mut R) -> String {
    let pool = catalog::ISLAND_PREFIXES.len() * catalog::ISLAND_SUFFIXES.len();
    for _ in 0..pool * 2 {
        let name = format!(
            "{} {}",
            catalog::pick(catalog::ISLAND_PREFIXES, rng),
            catalog::pick(catalog::ISLAND_SUFFIXES, rng)
        );
        if taken.insert(name.clone()) {
            return name;
        }
    }

    let mut n = taken.len() + 1;
    loop {
        let name = format!("Island {}", n);
        if taken.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chebyshev(a: Coord, b: Coord) -> i32 {
        (a.x - b.x).abs().max((a.y - b.y).abs())
    }

    #[test]
    fn test_default_world() {
        let mut rng = StdRng::seed_from_u64(42);
        let world = World::generate(WorldConfig::default(), 200, &mut rng).unwrap();

        assert!(!world.islands.is_empty());
        assert!(world.islands.len() <= 5);
        assert!(world.inhabited_count() >= 2);
        assert_eq!(world.max_trade_ships(), world.inhabited_count() * 2);
        assert_eq!(world.active_trade_ships(), 0);

        let towns: usize = world.islands.iter().map(|i| i.towns.len()).sum();
        assert_eq!(world.ports.len(), towns);
    }

    #[test]
    fn test_single_island_request_still_gets_two_settlements() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = WorldConfig {
            island_count: 1,
            ..WorldConfig::default()
        };
        let world = World::generate(config, 200, &mut rng).unwrap();
        assert_eq!(world.inhabited_count(), 2);
    }

    #[test]
    fn test_crowded_map_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = WorldConfig {
            map_size: 4,
            island_count: 0,
            min_inhabited: 5,
            ..WorldConfig::default()
        };
        assert_eq!(
            World::generate(config, 200, &mut rng).unwrap_err(),
            WorldError::Crowded
        );
    }

    #[test]
    fn test_tiny_map_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = WorldConfig {
            map_size: 3,
            ..WorldConfig::default()
        };
        assert_eq!(
            World::generate(config, 200, &mut rng).unwrap_err(),
            WorldError::MapTooSmall(3)
        );
    }

    #[test]
    fn test_unique_names_fall_back_to_numbers() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut taken = HashSet::new();
        let pool = catalog::ISLAND_PREFIXES.len() * catalog::ISLAND_SUFFIXES.len();
        for _ in 0..pool + 10 {
            unique_island_name(&mut taken, &mut rng);
        }
        assert_eq!(taken.len(), pool + 10);
    }

    #[test]
    fn test_nearest_inhabited() {
        let mut rng = StdRng::seed_from_u64(42);
        let world = World::generate(WorldConfig::default(), 200, &mut rng).unwrap();
        let (home, island) = world.inhabited().next().unwrap();
        let at = island.coordinates.unwrap();

        assert_eq!(world.nearest_inhabited(at, None), Some(home));
        let other = world.nearest_inhabited(at, Some(home)).unwrap();
        assert_ne!(other, home);
        assert!(world.island(other).unwrap().inhabited);
    }

    proptest! {
        #[test]
        fn prop_islands_never_touch(seed in any::<u64>(), count in 1usize..12) {
            let mut rng = StdRng::seed_from_u64(seed);
            let config = WorldConfig { island_count: count, ..WorldConfig::default() };
            let world = World::generate(config, 200, &mut rng).unwrap();

            prop_assert!(world.inhabited_count() >= 2);

            let footprints: Vec<Vec<Coord>> = (0..world.islands.len())
                .map(|i| world.map.cells_of(IslandId(i)))
                .collect();
            for (i, island) in world.islands.iter().enumerate() {
                let anchor = island.coordinates.unwrap();
                prop_assert_eq!(footprints[i].len(), island.size.footprint().len());
                prop_assert!(footprints[i].contains(&anchor));
            }
            for i in 0..footprints.len() {
                for j in (i + 1)..footprints.len() {
                    for a in &footprints[i] {
                        for b in &footprints[j] {
                            prop_assert!(chebyshev(*a, *b) > 2);
                        }
                    }
                }
            }
        }
    }
}
