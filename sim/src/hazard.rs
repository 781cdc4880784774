use crate::map::Map;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::Coord;

/// Tries before the monster gives up and stays put for the day
const WANDER_ATTEMPTS: usize = 4;

/// Stay put or move to any of the eight neighbours
const WANDER_STEPS: [(i32, i32); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The sea monster. Drifts randomly through open water and sinks whatever
/// shares its cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeaMonster {
    pub position: Coord,
    pub speed: i32,
}

impl SeaMonster {
    pub const GLYPH: char = '∞';

    /// Drop the monster on a random water cell. None if the map has no water.
    pub fn spawn<R: Rng + ?Sized>(map: &Map, rng: &mut R) -> Option<Self> {
        let position = *map.water_cells().choose(rng)?;
        Some(Self { position, speed: 1 })
    }

    /// Only seen every third day
    pub fn is_visible(day: u32) -> bool {
        day % 3 == 0
    }

    /// One day of drifting. Land and the map edge are never entered.
    pub fn wander<R: Rng + ?Sized>(&mut self, map: &Map, rng: &mut R) {
        for _ in 0..WANDER_ATTEMPTS {
            let (dx, dy) = WANDER_STEPS[rng.gen_range(0..WANDER_STEPS.len())];
            let next = self.position.offset(dx * self.speed, dy * self.speed);
            if map.is_water(next) {
                self.position = next;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::{Island, IslandId, SizeClass};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn map_with_islands(rng: &mut StdRng) -> Map {
        let mut map = Map::new(8);
        for (i, anchor) in [Coord::new(0, 0), Coord::new(5, 5)].into_iter().enumerate() {
            let mut island = Island::generate(format!("Isle {}", i), rng);
            island.size = SizeClass::Large;
            map.place(IslandId(i), &mut island, anchor);
        }
        map
    }

    #[test]
    fn test_visibility_cadence() {
        let seen: Vec<u32> = (1..=9).filter(|d| SeaMonster::is_visible(*d)).collect();
        assert_eq!(seen, vec![3, 6, 9]);
    }

    #[test]
    fn test_spawns_in_water() {
        let mut rng = StdRng::seed_from_u64(42);
        let map = map_with_islands(&mut rng);
        for _ in 0..50 {
            let monster = SeaMonster::spawn(&map, &mut rng).unwrap();
            assert!(map.is_water(monster.position));
        }
    }

    #[test]
    fn test_no_water_no_monster() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut map = Map::new(1);
        let mut island = Island::generate("Rock".to_string(), &mut rng);
        island.size = SizeClass::Small;
        map.place(IslandId(0), &mut island, Coord::new(0, 0));

        assert!(SeaMonster::spawn(&map, &mut rng).is_none());
    }

    #[test]
    fn test_boxed_in_monster_stays_put() {
        let mut rng = StdRng::seed_from_u64(42);
        let map = Map::new(1);
        let mut monster = SeaMonster {
            position: Coord::new(0, 0),
            speed: 1,
        };
        for _ in 0..20 {
            monster.wander(&map, &mut rng);
            assert_eq!(monster.position, Coord::new(0, 0));
        }
    }

    proptest! {
        #[test]
        fn prop_wander_stays_in_water(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = map_with_islands(&mut rng);
            let mut monster = SeaMonster::spawn(&map, &mut rng).unwrap();

            for _ in 0..200 {
                let before = monster.position;
                monster.wander(&map, &mut rng);
                prop_assert!(map.is_water(monster.position));
                prop_assert!((monster.position.x - before.x).abs() <= 1);
                prop_assert!((monster.position.y - before.y).abs() <= 1);
            }
        }
    }
}
