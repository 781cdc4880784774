use crate::island::{Island, IslandId};
use crate::movement::step_toward;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{Coord, ShipClass, TradeGood};
use uuid::Uuid;

/// Where a trade ship is in its round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voyage {
    /// No destination yet
    Seeking,
    /// Sailing away from home
    Outbound(IslandId),
    /// Moored at its destination, waiting out the idle days
    Idle(IslandId),
    /// On the way back to its home island
    Returning,
}

/// What happened to a ship during one day of sailing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipEvent {
    /// Underway, idling, or turned around at home without arriving anywhere
    Quiet,
    /// Reached this island's anchor from somewhere else
    Arrived(IslandId),
    /// No other inhabited island to sail to; the ship should be retired
    Stranded,
}

/// A merchant ship shuttling goods between its home island and others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeShip {
    pub id: Uuid,
    pub class: ShipClass,
    pub crew: u32,
    pub speed: u32,
    pub cargo_capacity: u32,
    pub home: IslandId,
    pub position: Coord,
    pub last_position: Coord,
    pub destination: Option<IslandId>,
    pub returning_home: bool,
    pub days_at_destination: u32,
    /// Good the captain sells to visitors
    pub selling: TradeGood,
    /// Good the captain buys from visitors
    pub buying: TradeGood,
    pub sell_price: u32,
    pub buy_price: u32,
}

impl TradeShip {
    /// Build a ship docked at `home` with a random class and market.
    /// Returns None if the home island was never placed on the map.
    pub fn new<R: Rng + ?Sized>(home: IslandId, islands: &[Island], rng: &mut R) -> Option<Self> {
        let position = islands.get(home.0)?.coordinates?;
        let class = ShipClass::random(rng);
        let stats = class.stats();
        let selling = TradeGood::random(rng);
        let buying = TradeGood::random_except(selling, rng);

        let mut ship = Self {
            id: uuid::Builder::from_random_bytes(rng.gen()).into_uuid(),
            class,
            crew: rng.gen_range(5..=stats.crew_max.max(5)),
            speed: stats.speed,
            cargo_capacity: stats.cargo,
            home,
            position,
            last_position: position,
            destination: None,
            returning_home: false,
            days_at_destination: 0,
            selling,
            buying,
            sell_price: rng.gen_range(50..=200),
            buy_price: rng.gen_range(50..=200),
        };
        ship.choose_destination(islands, rng);
        Some(ship)
    }

    pub fn voyage(&self) -> Voyage {
        match (self.destination, self.returning_home) {
            (_, true) => Voyage::Returning,
            (None, false) => Voyage::Seeking,
            (Some(dest), false) if self.days_at_destination > 0 => Voyage::Idle(dest),
            (Some(dest), false) => Voyage::Outbound(dest),
        }
    }

    /// Pick a new inhabited, placed destination other than home and start
    /// outbound. Clears the destination when there is nowhere to go.
    pub fn choose_destination<R: Rng + ?Sized>(&mut self, islands: &[Island], rng: &mut R) {
        let candidates: Vec<IslandId> = islands
            .iter()
            .enumerate()
            .filter(|(i, island)| {
                *i != self.home.0 && island.inhabited && island.coordinates.is_some()
            })
            .map(|(i, _)| IslandId(i))
            .collect();

        self.destination = candidates.choose(rng).copied();
        self.returning_home = false;
        self.days_at_destination = 0;
    }

    /// Island the ship is currently steering for
    pub fn target(&self) -> Option<IslandId> {
        if self.returning_home {
            Some(self.home)
        } else {
            self.destination
        }
    }

    /// Where a passenger boarding at `here` would be put ashore. A ship
    /// idling at its destination takes passengers back to its home.
    pub fn bound_for(&self, here: IslandId) -> Option<IslandId> {
        match self.target() {
            Some(target) if target == here => (self.home != here).then_some(self.home),
            other => other,
        }
    }

    /// Whether the ship is moored at the given island's anchor
    pub fn is_docked_at(&self, island: &Island) -> bool {
        island.coordinates == Some(self.position)
    }

    /// Sail one day.
    ///
    /// Arrival is reported only on the day the ship moves onto the anchor, so
    /// idling in port never repeats the notification.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        islands: &[Island],
        idle_days: u32,
        rng: &mut R,
    ) -> ShipEvent {
        if self.target().is_none() {
            self.choose_destination(islands, rng);
            if self.destination.is_none() {
                return ShipEvent::Stranded;
            }
        }

        let Some(target) = self.target() else {
            return ShipEvent::Stranded;
        };
        let Some(target_coord) = islands.get(target.0).and_then(|i| i.coordinates) else {
            return ShipEvent::Stranded;
        };

        self.last_position = self.position;
        self.position = step_toward(self.position, target_coord, self.speed);
        if self.position != target_coord {
            return ShipEvent::Quiet;
        }

        let moved_in = self.last_position != self.position;
        if self.returning_home {
            self.choose_destination(islands, rng);
        } else {
            self.days_at_destination += 1;
            if self.days_at_destination >= idle_days {
                self.returning_home = true;
            }
        }

        if moved_in {
            ShipEvent::Arrived(target)
        } else {
            ShipEvent::Quiet
        }
    }

    /// One-line description used in port listings
    pub fn describe(&self, islands: &[Island]) -> String {
        let name_of = |id: IslandId| {
            islands
                .get(id.0)
                .map_or("unknown waters", |island| island.name.as_str())
        };
        let heading = match self.voyage() {
            Voyage::Seeking => "awaiting orders".to_string(),
            Voyage::Outbound(dest) => format!("bound for {}", name_of(dest)),
            Voyage::Idle(dest) => format!(
                "moored at {}, then home to {}",
                name_of(dest),
                name_of(self.home)
            ),
            Voyage::Returning => format!("returning home to {}", name_of(self.home)),
        };
        format!("{} ({} crew), {}", self.class, self.crew, heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Three small inhabited islands in a row plus one uninhabited one
    fn archipelago(rng: &mut StdRng) -> Vec<Island> {
        let mut map = Map::new(20);
        let anchors = [
            Coord::new(2, 2),
            Coord::new(2, 12),
            Coord::new(12, 2),
            Coord::new(12, 12),
        ];
        anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let mut island = Island::generate(format!("Isle {}", i), rng);
                island.size = crate::island::SizeClass::Small;
                if i < 3 {
                    island.settle(rng);
                } else {
                    island.inhabited = false;
                    island.towns.clear();
                }
                assert!(map.place(IslandId(i), &mut island, *anchor));
                island
            })
            .collect()
    }

    #[test]
    fn test_new_ship_is_docked_at_home() {
        let mut rng = StdRng::seed_from_u64(42);
        let islands = archipelago(&mut rng);
        let ship = TradeShip::new(IslandId(0), &islands, &mut rng).unwrap();

        assert!(ship.is_docked_at(&islands[0]));
        assert_ne!(ship.selling, ship.buying);
        assert!((5..=ship.class.stats().crew_max).contains(&ship.crew));
        assert!((50..=200).contains(&ship.sell_price));

        let dest = ship.destination.unwrap();
        assert!(dest == IslandId(1) || dest == IslandId(2));
    }

    #[test]
    fn test_unplaced_home_builds_nothing() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut islands = archipelago(&mut rng);
        islands[0].coordinates = None;
        assert!(TradeShip::new(IslandId(0), &islands, &mut rng).is_none());
    }

    #[test]
    fn test_lone_island_ship_has_no_destination() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut islands = archipelago(&mut rng);
        islands[1].inhabited = false;
        islands[2].inhabited = false;

        let mut ship = TradeShip::new(IslandId(0), &islands, &mut rng).unwrap();
        assert_eq!(ship.destination, None);
        assert_eq!(ship.advance(&islands, 3, &mut rng), ShipEvent::Stranded);
    }

    #[test]
    fn test_arrival_reported_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let islands = archipelago(&mut rng);
        let mut ship = TradeShip::new(IslandId(0), &islands, &mut rng).unwrap();
        ship.destination = Some(IslandId(1));

        // Park it one day out from island 1
        let dest = islands[1].coordinates.unwrap();
        ship.position = dest.offset(0, -1);

        assert_eq!(ship.advance(&islands, 3, &mut rng), ShipEvent::Arrived(IslandId(1)));
        assert_eq!(ship.voyage(), Voyage::Idle(IslandId(1)));
        assert_eq!(ship.advance(&islands, 3, &mut rng), ShipEvent::Quiet);
        assert_eq!(ship.position, dest);
    }

    #[test]
    fn test_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        let islands = archipelago(&mut rng);
        let mut ship = TradeShip::new(IslandId(0), &islands, &mut rng).unwrap();
        let first_dest = ship.destination.unwrap();

        let mut events = Vec::new();
        for _ in 0..40 {
            let event = ship.advance(&islands, 3, &mut rng);
            if event != ShipEvent::Quiet {
                events.push(event);
            }
            if events.len() == 2 {
                break;
            }
        }

        assert_eq!(events, vec![ShipEvent::Arrived(first_dest), ShipEvent::Arrived(IslandId(0))]);
        // Turned straight around with a fresh trip
        assert!(ship.is_docked_at(&islands[0]));
        assert!(!ship.returning_home);
        assert!(ship.destination.is_some());
    }

    #[test]
    fn test_idles_before_heading_home() {
        let mut rng = StdRng::seed_from_u64(42);
        let islands = archipelago(&mut rng);
        let mut ship = TradeShip::new(IslandId(0), &islands, &mut rng).unwrap();
        ship.destination = Some(IslandId(1));
        ship.position = islands[1].coordinates.unwrap();
        ship.last_position = ship.position;

        assert_eq!(ship.bound_for(IslandId(1)), Some(IslandId(0)));
        assert_eq!(ship.bound_for(IslandId(0)), Some(IslandId(1)));

        ship.advance(&islands, 3, &mut rng);
        assert_eq!(ship.voyage(), Voyage::Idle(IslandId(1)));
        assert!(ship
            .describe(&islands)
            .ends_with("moored at Isle 1, then home to Isle 0"));
        ship.advance(&islands, 3, &mut rng);
        assert!(!ship.returning_home);
        ship.advance(&islands, 3, &mut rng);
        assert!(ship.returning_home);
        assert_eq!(ship.voyage(), Voyage::Returning);
    }
}
