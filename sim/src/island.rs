use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{catalog, Coord};
use std::fmt;

/// Index of an island in its world's island list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IslandId(pub usize);

impl fmt::Display for IslandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Water that must separate any two islands, in cells
pub const SEPARATION: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    /// Edge length of the square footprint
    pub fn side(self) -> i32 {
        match self {
            SizeClass::Small => 1,
            SizeClass::Medium => 2,
            SizeClass::Large => 3,
        }
    }

    /// Cells covered, relative to the top-left anchor
    pub fn footprint(self) -> Vec<(i32, i32)> {
        let side = self.side();
        (0..side)
            .flat_map(|dx| (0..side).map(move |dy| (dx, dy)))
            .collect()
    }

    /// Footprint grown by the separation margin on every side
    pub fn buffer(self) -> Vec<(i32, i32)> {
        let side = self.side();
        (-SEPARATION..side + SEPARATION)
            .flat_map(|dx| (-SEPARATION..side + SEPARATION).map(move |dy| (dx, dy)))
            .collect()
    }

    pub fn town_count(self) -> usize {
        match self {
            SizeClass::Small => 1,
            SizeClass::Medium => 2,
            SizeClass::Large => 3,
        }
    }

    fn biotope_count<R: Rng + ?Sized>(self, rng: &mut R) -> usize {
        match self {
            SizeClass::Small => rng.gen_range(2..=3),
            SizeClass::Medium => rng.gen_range(3..=5),
            SizeClass::Large => rng.gen_range(5..=7),
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeClass::Small => "Small",
            SizeClass::Medium => "Medium",
            SizeClass::Large => "Large",
        })
    }
}

/// Places a visitor can go inside a town
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Shipyard,
    Pub,
    Smithy,
    Market,
    Port,
    /// Only in the player's home town
    Home,
}

impl Location {
    pub fn name(self) -> &'static str {
        match self {
            Location::Shipyard => "shipyard",
            Location::Pub => "pub",
            Location::Smithy => "smithy",
            Location::Market => "market",
            Location::Port => "port",
            Location::Home => "home",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Town {
    pub name: String,
    pub population: u32,
    pub locations: Vec<Location>,
}

impl Town {
    pub fn new<R: Rng + ?Sized>(name: String, rng: &mut R) -> Self {
        Self {
            name,
            population: rng.gen_range(100..=1000),
            locations: vec![
                Location::Shipyard,
                Location::Pub,
                Location::Smithy,
                Location::Market,
                Location::Port,
            ],
        }
    }

    pub fn has(&self, location: Location) -> bool {
        self.locations.contains(&location)
    }

    /// One-time upgrade for the player's home town
    pub fn make_home(&mut self) {
        if !self.has(Location::Home) {
            self.locations.push(Location::Home);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruins {
    pub kind: String,
    pub explored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    pub name: String,
    pub size: SizeClass,
    pub climate: String,
    pub biotopes: Vec<String>,
    pub inhabited: bool,
    /// Top-left anchor of the footprint, set once when placed on the map
    pub coordinates: Option<Coord>,
    pub ruins: Option<Ruins>,
    pub towns: Vec<Town>,
}

impl Island {
    /// Roll a fresh island. It has no coordinates until the map places it.
    pub fn generate<R: Rng + ?Sized>(name: String, rng: &mut R) -> Self {
        let size = SizeClass::ALL[rng.gen_range(0..SizeClass::ALL.len())];
        let climate = catalog::pick(catalog::CLIMATES, rng).to_string();
        let biotope_count = size.biotope_count(rng);
        let biotopes = catalog::BIOTOPES
            .choose_multiple(rng, biotope_count)
            .map(|b| b.to_string())
            .collect();

        let mut island = Self {
            name,
            size,
            climate,
            biotopes,
            inhabited: false,
            coordinates: None,
            ruins: None,
            towns: Vec::new(),
        };

        if rng.gen_bool(0.7) {
            island.settle(rng);
        } else if rng.gen_bool(0.4) {
            island.ruins = Some(Ruins {
                kind: catalog::pick(catalog::RUIN_KINDS, rng).to_string(),
                explored: false,
            });
        }

        island
    }

    /// Found towns on this island. Settled islands keep no ruins.
    pub fn settle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.inhabited = true;
        self.ruins = None;
        self.towns.clear();

        while self.towns.len() < self.size.town_count() {
            let mut name = format!(
                "{} {}",
                catalog::pick(catalog::TOWN_PREFIXES, rng),
                catalog::pick(catalog::TOWN_SUFFIXES, rng)
            );
            if self.towns.iter().any(|t| t.name == name) {
                name = format!("{} {}", name, self.towns.len() + 1);
            }
            self.towns.push(Town::new(name, rng));
        }
    }

    pub fn population(&self) -> u32 {
        self.towns.iter().map(|t| t.population).sum()
    }

    pub fn has_unexplored_ruins(&self) -> bool {
        self.ruins.as_ref().map_or(false, |r| !r.explored)
    }

    /// Compass-style label for the coordinates, relative to the map centre
    pub fn bearing_label(&self, map_size: usize) -> Option<String> {
        let coord = self.coordinates?;
        let centre = (map_size / 2) as i32;
        let lat = if coord.x < centre { 'N' } else { 'S' };
        let long = if coord.y < centre { 'W' } else { 'E' };
        Some(format!(
            "{} {:.1}°, {} {:.1}°",
            lat,
            (coord.x - centre).abs() as f64,
            long,
            (coord.y - centre).abs() as f64
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_footprint_sizes() {
        assert_eq!(SizeClass::Small.footprint().len(), 1);
        assert_eq!(SizeClass::Medium.footprint().len(), 4);
        assert_eq!(SizeClass::Large.footprint().len(), 9);
    }

    #[test]
    fn test_buffer_surrounds_footprint_evenly() {
        // 1 + 2*2 = 5 cells per edge for a small island
        assert_eq!(SizeClass::Small.buffer().len(), 25);
        assert_eq!(SizeClass::Large.buffer().len(), 49);

        let buffer = SizeClass::Medium.buffer();
        for cell in SizeClass::Medium.footprint() {
            assert!(buffer.contains(&cell));
        }
        assert!(buffer.contains(&(-2, -2)));
        assert!(buffer.contains(&(3, 3)));
        assert!(!buffer.contains(&(4, 0)));
    }

    #[test]
    fn test_generated_islands_are_consistent() {
        let mut rng = StdRng::seed_from_u64(11);
        for i in 0..200 {
            let island = Island::generate(format!("Test {}", i), &mut rng);

            assert!(island.coordinates.is_none());
            if island.inhabited {
                assert_eq!(island.towns.len(), island.size.town_count());
                assert!(island.ruins.is_none());
                assert!(island.population() >= 100 * island.towns.len() as u32);
            } else {
                assert!(island.towns.is_empty());
            }

            let (lo, hi) = match island.size {
                SizeClass::Small => (2, 3),
                SizeClass::Medium => (3, 5),
                SizeClass::Large => (5, 7),
            };
            assert!(island.biotopes.len() >= lo && island.biotopes.len() <= hi);

            let mut distinct = island.biotopes.clone();
            distinct.sort();
            distinct.dedup();
            assert_eq!(distinct.len(), island.biotopes.len());
        }
    }

    #[test]
    fn test_settle_gives_unique_town_names() {
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..100 {
            let mut island = Island::generate(format!("Test {}", i), &mut rng);
            island.size = SizeClass::Large;
            island.settle(&mut rng);

            let mut names: Vec<_> = island.towns.iter().map(|t| t.name.clone()).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), 3);
        }
    }

    #[test]
    fn test_make_home_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut town = Town::new("Port Haven".to_string(), &mut rng);
        town.make_home();
        town.make_home();
        assert_eq!(
            town.locations.iter().filter(|l| **l == Location::Home).count(),
            1
        );
    }
}
