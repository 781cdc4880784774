//! The day-stepped driver: player mode, the world clock, and the daily tick
//! that moves the monster and the trade fleet.

use crate::action::{ActionError, AshoreAction, HitchedAction, Outcome, SeaAction};
use crate::hazard::SeaMonster;
use crate::island::{IslandId, Location};
use crate::player::Player;
use crate::services;
use crate::trade_ship::{ShipEvent, TradeShip};
use crate::world::{World, WorldConfig, WorldError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{Coord, ShipClass};
use std::ops::RangeInclusive;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub starting_gold: u32,
    /// Gold per recruited crew member
    pub crew_wage: u32,
    /// Shipyard price for a full hull repair
    pub repair_cost: u32,
    /// Price of passage on a trade ship
    pub fare: u32,
    /// Items the home storage holds
    pub storage_limit: u32,
    /// Days from planting to harvest before relic bonuses
    pub growth_days: u32,
    /// Days a trade ship idles at its destination
    pub idle_days: u32,
    /// Range the per-port spawn cooldown is drawn from each day
    pub spawn_cooldown: RangeInclusive<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            starting_gold: 1000,
            crew_wage: 100,
            repair_cost: 200,
            fare: 200,
            storage_limit: 10,
            growth_days: 5,
            idle_days: 3,
            spawn_cooldown: 3..=7,
        }
    }
}

/// Where the player is and what they can do there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// On an island; `town` is None on uninhabited islands
    Ashore { island: IslandId, town: Option<usize> },
    /// Steering the player's own ship
    AtSea { position: Coord, moves_left: u32 },
    /// Riding a trade ship as a paying passenger
    Hitched { ship: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipSighting {
    pub id: Uuid,
    pub class: ShipClass,
    pub position: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedShip {
    pub id: Uuid,
    pub class: ShipClass,
    pub home: IslandId,
    pub destination: IslandId,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub day: u32,
    /// The monster reached the player; nothing else was resolved
    pub defeated: bool,
    pub hazard_visible: bool,
    pub destroyed: Vec<ShipSighting>,
    pub spawned: Vec<SpawnedShip>,
    /// Trade ships that pulled into the island the player is standing on
    pub arrivals: Vec<ShipSighting>,
    /// Island a hitched player was put ashore on
    pub landed: Option<IslandId>,
}

/// Everything a save file holds apart from the random generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub world: World,
    pub hazard: SeaMonster,
    pub player: Player,
    pub mode: Mode,
    pub day: u32,
    pub defeated: bool,
}

impl GameState {
    /// Generate a world and put a new character in a random home town
    pub fn new<R: Rng + ?Sized>(
        player_name: String,
        config: GameConfig,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let mut world = World::generate(config.world.clone(), config.fare, rng)?;

        let settlements: Vec<IslandId> = world.inhabited().map(|(id, _)| id).collect();
        let home = *settlements.choose(rng).ok_or(WorldError::NoSettlement)?;
        let island = world.island_mut(home).ok_or(WorldError::NoSettlement)?;
        let town = rng.gen_range(0..island.towns.len().max(1));
        island
            .towns
            .get_mut(town)
            .ok_or(WorldError::NoSettlement)?
            .make_home();

        let hazard = SeaMonster::spawn(&world.map, rng).ok_or(WorldError::NoOpenWater)?;
        let player = Player::new(player_name, config.starting_gold, home, town, rng);
        info!(island = %home, town, "new game");

        Ok(Self {
            config,
            world,
            hazard,
            player,
            mode: Mode::Ashore {
                island: home,
                town: Some(town),
            },
            day: 1,
            defeated: false,
        })
    }

    /// The cell the monster has to hit to end the game
    pub fn player_position(&self) -> Option<Coord> {
        match self.mode {
            Mode::Ashore { island, .. } => self.world.island(island)?.coordinates,
            Mode::AtSea { position, .. } => Some(position),
            Mode::Hitched { ship } => self.world.trade_ship(ship).map(|s| s.position),
        }
    }

    /// Run one pass of the world: the monster moves, then everything else
    /// resolves against its new position. The day counter is left alone.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        if self.defeated {
            return TickReport {
                day: self.day,
                defeated: true,
                ..Default::default()
            };
        }
        self.hazard.wander(&self.world.map, rng);
        self.resolve_tick(rng)
    }

    fn resolve_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        let mut report = TickReport {
            day: self.day,
            hazard_visible: SeaMonster::is_visible(self.day),
            ..Default::default()
        };

        if self.player_position() == Some(self.hazard.position) {
            info!(day = self.day, position = %self.hazard.position, "the sea monster found the player");
            self.defeated = true;
            report.defeated = true;
            return report;
        }

        let danger = self.hazard.position;
        for port in &mut self.world.ports {
            port.ships.retain(|ship| {
                if ship.position != danger {
                    return true;
                }
                info!(id = %ship.id, class = %ship.class, position = %danger, "trade ship destroyed by the sea monster");
                report.destroyed.push(ShipSighting {
                    id: ship.id,
                    class: ship.class,
                    position: danger,
                });
                false
            });
        }

        let cap = self.world.max_trade_ships();
        for i in 0..self.world.ports.len() {
            let active = self.world.active_trade_ships();
            let islands = &self.world.islands;
            let spawned = self.world.ports[i].try_spawn(
                self.day,
                active,
                cap,
                self.config.spawn_cooldown.clone(),
                islands,
                rng,
            );
            if let Some(ship) = spawned {
                report.spawned.push(SpawnedShip {
                    id: ship.id,
                    class: ship.class,
                    home: ship.home,
                    destination: ship.destination.unwrap_or(ship.home),
                });
            }
        }

        let mut arrivals = Vec::new();
        let mut stranded = Vec::new();
        let islands = &self.world.islands;
        for port in &mut self.world.ports {
            for ship in &mut port.ships {
                match ship.advance(islands, self.config.idle_days, rng) {
                    ShipEvent::Arrived(island) => arrivals.push((island, sighting(ship))),
                    ShipEvent::Stranded => stranded.push(ship.id),
                    ShipEvent::Quiet => {}
                }
            }
        }

        let mut came_in_on = None;
        if let Mode::Hitched { ship } = self.mode {
            let carried_to = arrivals
                .iter()
                .find(|(_, s)| s.id == ship)
                .map(|(island, _)| *island);
            let dropped_at = if stranded.contains(&ship) {
                self.player_position()
                    .and_then(|pos| self.world.map.island_at(pos))
            } else {
                None
            };
            if let Some(island) = carried_to.or(dropped_at) {
                self.go_ashore(island, rng);
                report.landed = Some(island);
                came_in_on = Some(ship);
                debug!(island = %island, ship = %ship, "passenger put ashore");
            }
        }

        if let Mode::Ashore { island, .. } = self.mode {
            report.arrivals = arrivals
                .into_iter()
                .filter(|(at, s)| *at == island && Some(s.id) != came_in_on)
                .map(|(_, s)| s)
                .collect();
        }

        if !stranded.is_empty() {
            for port in &mut self.world.ports {
                port.ships.retain(|s| !stranded.contains(&s.id));
            }
            debug!(count = stranded.len(), "stranded trade ships retired");
        }

        report
    }

    fn go_ashore<R: Rng + ?Sized>(&mut self, island: IslandId, rng: &mut R) {
        let towns = self.world.island(island).map_or(0, |i| i.towns.len());
        let town = (towns > 0).then(|| rng.gen_range(0..towns));
        self.mode = Mode::Ashore { island, town };
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.defeated {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        if outcome.day_passed {
            self.day += 1;
        }
        outcome
    }

    /// Check the current town offers a service
    fn require(&self, town: Option<(IslandId, usize)>, location: Location) -> Result<(), ActionError> {
        let offered = town
            .and_then(|(island, town)| self.world.island(island)?.towns.get(town))
            .map_or(false, |t| t.has(location));
        if offered {
            Ok(())
        } else {
            Err(ActionError::Unavailable(location.name()))
        }
    }

    /// Docked trade ship by id, or why it can't be reached
    fn docked_ship(&self, island: IslandId, id: Uuid) -> Result<&TradeShip, ActionError> {
        let docked = self.world.docked_at(island);
        if docked.is_empty() {
            return Err(ActionError::NoShipsInPort);
        }
        docked
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(ActionError::UnknownShip)
    }

    pub fn apply_ashore<R: Rng + ?Sized>(
        &mut self,
        action: AshoreAction,
        rng: &mut R,
    ) -> Result<Outcome, ActionError> {
        self.ensure_playing()?;
        let Mode::Ashore { island, town } = self.mode else {
            return Err(ActionError::WrongMode);
        };
        let here = town.map(|t| (island, t));

        let outcome = match action {
            AshoreAction::Wait => Outcome::day("You rest for a day"),
            AshoreAction::BuyGoods { good, quantity } => {
                self.require(here, Location::Market)?;
                Outcome::instant(services::buy_goods(&mut self.player, good, quantity)?)
            }
            AshoreAction::BuyWeapon { weapon } => {
                self.require(here, Location::Smithy)?;
                Outcome::instant(services::buy_weapon(&mut self.player, weapon)?)
            }
            AshoreAction::HireCrew { count } => {
                self.require(here, Location::Pub)?;
                Outcome::instant(services::hire_crew(
                    &mut self.player,
                    count,
                    self.config.crew_wage,
                )?)
            }
            AshoreAction::BuyShip { class } => {
                self.require(here, Location::Shipyard)?;
                Outcome::instant(services::buy_ship(&mut self.player, class)?)
            }
            AshoreAction::RepairShip => {
                self.require(here, Location::Shipyard)?;
                Outcome::instant(services::repair_ship(
                    &mut self.player,
                    self.config.repair_cost,
                )?)
            }
            AshoreAction::SetSail => {
                if here.is_some() {
                    self.require(here, Location::Port)?;
                }
                let ship = self.player.ship.as_ref().ok_or(ActionError::NoShip)?;
                if !ship.is_mobile() {
                    return Err(ActionError::ShipImmobile);
                }
                let moves_left = ship.speed();
                let from = self.world.island(island).ok_or(ActionError::WrongMode)?;
                let position = from.coordinates.ok_or(ActionError::WrongMode)?;
                let message = format!("You set sail from {}", from.name);
                self.mode = Mode::AtSea {
                    position,
                    moves_left,
                };
                Outcome::instant(message)
            }
            AshoreAction::BookPassage { ship } => {
                self.require(here, Location::Port)?;
                let fare = town
                    .and_then(|t| self.world.port(island, t))
                    .map_or(self.config.fare, |p| p.fare);
                let carrier = self.docked_ship(island, ship)?;
                let target = carrier.bound_for(island).ok_or(ActionError::NoDestination)?;
                let target_name = self
                    .world
                    .island(target)
                    .map_or_else(String::new, |i| i.name.clone());
                self.player.spend(fare)?;
                self.mode = Mode::Hitched { ship };
                Outcome::instant(format!(
                    "You pay {} gold and board the ship as a deckhand, bound for {}",
                    fare, target_name
                ))
            }
            AshoreAction::TradeBuy { ship, quantity } => {
                self.require(here, Location::Port)?;
                let carrier = self.docked_ship(island, ship)?.clone();
                Outcome::instant(services::trade_buy(&mut self.player, &carrier, quantity)?)
            }
            AshoreAction::TradeSell { ship, quantity } => {
                self.require(here, Location::Port)?;
                let carrier = self.docked_ship(island, ship)?.clone();
                Outcome::instant(services::trade_sell(&mut self.player, &carrier, quantity)?)
            }
            AshoreAction::Store { item, quantity } => {
                self.require(here, Location::Home)?;
                Outcome::instant(services::store(
                    &mut self.player,
                    item,
                    quantity,
                    self.config.storage_limit,
                )?)
            }
            AshoreAction::Retrieve { item, quantity } => {
                self.require(here, Location::Home)?;
                Outcome::instant(services::retrieve(&mut self.player, item, quantity)?)
            }
            AshoreAction::Plant => {
                self.require(here, Location::Home)?;
                Outcome::instant(services::plant(&mut self.player, self.day)?)
            }
            AshoreAction::Harvest => {
                self.require(here, Location::Home)?;
                Outcome::instant(services::harvest(
                    &mut self.player,
                    self.day,
                    self.config.growth_days,
                )?)
            }
            AshoreAction::ExploreRuins => {
                let ruins = self
                    .world
                    .island_mut(island)
                    .and_then(|i| i.ruins.as_mut())
                    .ok_or(ActionError::NoRuins)?;
                let lines = services::explore_ruins(&mut self.player, ruins, rng)?;
                Outcome {
                    messages: lines,
                    day_passed: true,
                }
            }
            AshoreAction::SignalForPassage => {
                if town.is_some() {
                    return Err(ActionError::Unavailable("signal fire"));
                }
                let from = self
                    .world
                    .island(island)
                    .and_then(|i| i.coordinates)
                    .ok_or(ActionError::WrongMode)?;
                let target = self
                    .world
                    .nearest_inhabited(from, Some(island))
                    .ok_or(ActionError::NoDestination)?;
                self.go_ashore(target, rng);
                let name = self
                    .world
                    .island(target)
                    .map_or_else(String::new, |i| i.name.clone());
                Outcome::day(format!(
                    "A passing ship spots your signal and carries you to {}",
                    name
                ))
            }
        };

        Ok(self.finish(outcome))
    }

    pub fn apply_at_sea<R: Rng + ?Sized>(
        &mut self,
        action: SeaAction,
        rng: &mut R,
    ) -> Result<Outcome, ActionError> {
        self.ensure_playing()?;
        let Mode::AtSea {
            position,
            moves_left,
        } = self.mode
        else {
            return Err(ActionError::WrongMode);
        };

        let outcome = match action {
            SeaAction::Sail(direction) => {
                let ship = self.player.ship.as_ref().ok_or(ActionError::NoShip)?;
                if !ship.is_mobile() {
                    return Err(ActionError::ShipImmobile);
                }
                if moves_left == 0 {
                    return Err(ActionError::NoMovesLeft);
                }
                let (dx, dy) = direction.delta();
                let next = position.offset(dx, dy);
                if !self.world.map.in_bounds(next) {
                    return Err(ActionError::OffTheMap);
                }

                self.mode = Mode::AtSea {
                    position: next,
                    moves_left: moves_left - 1,
                };
                let message = format!("You sail {}", direction.name());
                match self.world.map.island_at(next).and_then(|id| self.world.island(id)) {
                    Some(island) => Outcome::instant(message)
                        .with(format!("You've reached {}! You can disembark here.", island.name)),
                    None => Outcome::instant(message),
                }
            }
            SeaAction::Wait => {
                let speed = self.player.ship.as_ref().map_or(0, |s| s.speed());
                self.mode = Mode::AtSea {
                    position,
                    moves_left: speed,
                };
                Outcome::day("You wait for a day at sea")
            }
            SeaAction::Repair => {
                let player = &mut self.player;
                let ship = player.ship.as_mut().ok_or(ActionError::NoShip)?;
                let hull = ship.repair_at_sea(&mut player.inventory)?;
                Outcome::instant(format!(
                    "Repaired ship hull to {}/{}",
                    hull,
                    ship.hull_max()
                ))
            }
            SeaAction::Disembark => {
                let island = self
                    .world
                    .map
                    .island_at(position)
                    .ok_or(ActionError::NotAtIsland)?;
                self.go_ashore(island, rng);
                let name = self
                    .world
                    .island(island)
                    .map_or_else(String::new, |i| i.name.clone());
                Outcome::day(format!("You drop anchor and go ashore on {}", name))
            }
        };

        Ok(self.finish(outcome))
    }

    pub fn apply_hitched(&mut self, action: HitchedAction) -> Result<Outcome, ActionError> {
        self.ensure_playing()?;
        let Mode::Hitched { ship } = self.mode else {
            return Err(ActionError::WrongMode);
        };

        let outcome = match action {
            HitchedAction::Wait => {
                let heading = self
                    .world
                    .trade_ship(ship)
                    .and_then(|s| s.target())
                    .and_then(|id| self.world.island(id))
                    .map_or_else(String::new, |i| format!(" towards {}", i.name));
                Outcome::day(format!("You work the deck for a day as the ship sails on{}", heading))
            }
        };

        Ok(self.finish(outcome))
    }
}

fn sighting(ship: &TradeShip) -> ShipSighting {
    ShipSighting {
        id: ship.id,
        class: ship.class,
        position: ship.position,
    }
}
