use crate::island::{Island, IslandId};
use crate::trade_ship::TradeShip;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

/// A town's harbour. Owns the trade ships registered there and decides when
/// a new one is commissioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub island: IslandId,
    /// Index into the island's town list
    pub town: usize,
    /// Price of a passage booked here
    pub fare: u32,
    /// Day the last ship was commissioned here
    pub last_spawn: u32,
    pub ships: Vec<TradeShip>,
}

impl Port {
    pub fn new(island: IslandId, town: usize, fare: u32) -> Self {
        Self {
            island,
            town,
            fare,
            last_spawn: 0,
            ships: Vec::new(),
        }
    }

    /// Whether enough days have passed since the last commission
    pub fn spawn_due(&self, day: u32, cooldown: u32) -> bool {
        day.saturating_sub(self.last_spawn) >= cooldown
    }

    /// Daily spawn check. `active` is the world-wide number of trade ships;
    /// nothing is rolled once it reaches `cap`.
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        day: u32,
        active: usize,
        cap: usize,
        cooldown: RangeInclusive<u32>,
        islands: &[Island],
        rng: &mut R,
    ) -> Option<&TradeShip> {
        if active >= cap {
            return None;
        }
        let threshold = rng.gen_range(cooldown);
        self.spawn_with_cooldown(day, threshold, islands, rng)
    }

    /// Spawn check against a fixed cooldown. Ships that find no destination
    /// are scrapped on the spot and do not reset the cooldown.
    pub fn spawn_with_cooldown<R: Rng + ?Sized>(
        &mut self,
        day: u32,
        cooldown: u32,
        islands: &[Island],
        rng: &mut R,
    ) -> Option<&TradeShip> {
        debug!(island = %self.island, town = self.town, day, cooldown, "spawn check");
        if !self.spawn_due(day, cooldown) {
            return None;
        }

        let ship = TradeShip::new(self.island, islands, rng)?;
        if ship.destination.is_none() {
            debug!(island = %self.island, "no destination for new ship, scrapped");
            return None;
        }

        debug!(id = %ship.id, class = %ship.class, island = %self.island, "trade ship commissioned");
        self.last_spawn = day;
        self.ships.push(ship);
        self.ships.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::SizeClass;
    use crate::map::Map;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::Coord;

    fn two_islands(rng: &mut StdRng) -> Vec<Island> {
        let mut map = Map::new(12);
        [Coord::new(1, 1), Coord::new(8, 8)]
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let mut island = Island::generate(format!("Isle {}", i), rng);
                island.size = SizeClass::Small;
                island.settle(rng);
                map.place(IslandId(i), &mut island, *anchor);
                island
            })
            .collect()
    }

    #[test]
    fn test_cooldown_gates_spawning() {
        let mut rng = StdRng::seed_from_u64(42);
        let islands = two_islands(&mut rng);
        let mut port = Port::new(IslandId(0), 0, 200);

        // Last spawn on day 0 with a five day cooldown
        assert!(port.spawn_with_cooldown(3, 5, &islands, &mut rng).is_none());
        assert!(port.ships.is_empty());

        let ship = port.spawn_with_cooldown(5, 5, &islands, &mut rng).unwrap();
        assert_eq!(ship.home, IslandId(0));
        assert_eq!(ship.destination, Some(IslandId(1)));
        assert_eq!(port.last_spawn, 5);
        assert_eq!(port.ships.len(), 1);

        assert!(!port.spawn_due(9, 5));
        assert!(port.spawn_due(10, 5));
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let mut rng = StdRng::seed_from_u64(42);
        let islands = two_islands(&mut rng);
        let mut port = Port::new(IslandId(0), 0, 200);

        assert!(port.try_spawn(50, 4, 4, 3..=7, &islands, &mut rng).is_none());
        assert!(port.try_spawn(50, 3, 4, 3..=7, &islands, &mut rng).is_some());
    }

    #[test]
    fn test_no_destination_keeps_cooldown() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut islands = two_islands(&mut rng);
        islands[1].inhabited = false;
        let mut port = Port::new(IslandId(0), 0, 200);

        assert!(port.spawn_with_cooldown(10, 3, &islands, &mut rng).is_none());
        assert!(port.ships.is_empty());
        assert_eq!(port.last_spawn, 0);
    }
}
