//! Town services and ruin encounters. Each operation either succeeds and
//! returns what to tell the player, or fails before touching anything.

use crate::action::ActionError;
use crate::island::{IslandId, Ruins};
use crate::movement::travel_days;
use crate::player::{Crop, Player};
use crate::ship::Ship;
use crate::trade_ship::TradeShip;
use crate::world::World;
use rand::Rng;
use shared::{Item, ShipClass, TradeGood, Treasure, Weapon};
use tracing::debug;

/// Food gathered from one harvest
pub const HARVEST_YIELD: u32 = 3;

fn total_cost(unit: u32, quantity: u32) -> Result<u32, ActionError> {
    if quantity == 0 {
        return Err(ActionError::ZeroQuantity);
    }
    Ok(unit.saturating_mul(quantity))
}

pub fn buy_goods(player: &mut Player, good: TradeGood, quantity: u32) -> Result<String, ActionError> {
    let cost = total_cost(good.price(), quantity)?;
    player.spend(cost)?;
    player.inventory.add(good, quantity);
    Ok(format!("Bought {} {} for {} gold", quantity, good, cost))
}

/// Personal weapons go in the pack; ship weapons are mounted on the ship
pub fn buy_weapon(player: &mut Player, weapon: Weapon) -> Result<String, ActionError> {
    let price = weapon.stats().price;
    if price > player.gold {
        return Err(ActionError::InsufficientGold {
            needed: price,
            available: player.gold,
        });
    }

    if weapon.is_ship_weapon() {
        let ship = player.ship.as_mut().ok_or(ActionError::NoShip)?;
        ship.mount(weapon)?;
    } else {
        player.inventory.add(weapon, 1);
    }
    player.gold -= price;
    Ok(format!("Bought a {} for {} gold", weapon, price))
}

pub fn hire_crew(player: &mut Player, count: u32, wage: u32) -> Result<String, ActionError> {
    let cost = total_cost(wage, count)?;
    let ship = player.ship.as_ref().ok_or(ActionError::NoShip)?;
    if ship.crew.saturating_add(count) > ship.crew_capacity() {
        return Err(ActionError::CrewCapacity {
            capacity: ship.crew_capacity(),
        });
    }
    player.spend(cost)?;

    let ship = player.ship.as_mut().ok_or(ActionError::NoShip)?;
    ship.crew += count;
    Ok(format!(
        "Recruited {} crew members; {}/{} aboard",
        count,
        ship.crew,
        ship.crew_capacity()
    ))
}

/// Replaces the current ship. Crew moves across as far as the new one holds them.
pub fn buy_ship(player: &mut Player, class: ShipClass) -> Result<String, ActionError> {
    player.spend(class.stats().price)?;

    let mut ship = Ship::new(class);
    if let Some(old) = player.ship.take() {
        ship.crew = old.crew.min(ship.crew_capacity());
    }
    player.ship = Some(ship);
    Ok(format!("You are now the proud owner of a {}!", class))
}

/// Shipyard repair back to full hull
pub fn repair_ship(player: &mut Player, cost: u32) -> Result<String, ActionError> {
    let ship = player.ship.as_ref().ok_or(ActionError::NoShip)?;
    if ship.hull >= ship.hull_max() {
        return Err(ActionError::HullIntact);
    }
    player.spend(cost)?;

    let ship = player.ship.as_mut().ok_or(ActionError::NoShip)?;
    ship.hull = ship.hull_max();
    Ok(format!("Ship repaired to {}/{}", ship.hull, ship.hull_max()))
}

/// Buy from a docked trade ship's hold
pub fn trade_buy(player: &mut Player, ship: &TradeShip, quantity: u32) -> Result<String, ActionError> {
    let cost = total_cost(ship.sell_price, quantity)?;
    player.spend(cost)?;
    player.inventory.add(ship.selling, quantity);
    Ok(format!("Bought {} {} for {} gold", quantity, ship.selling, cost))
}

/// Sell to a docked trade ship
pub fn trade_sell(player: &mut Player, ship: &TradeShip, quantity: u32) -> Result<String, ActionError> {
    let earned = total_cost(ship.buy_price, quantity)?;
    player.inventory.remove(ship.buying, quantity)?;
    player.gold = player.gold.saturating_add(earned);
    Ok(format!("Sold {} {} for {} gold", quantity, ship.buying, earned))
}

pub fn store(player: &mut Player, item: Item, quantity: u32, limit: u32) -> Result<String, ActionError> {
    if quantity == 0 {
        return Err(ActionError::ZeroQuantity);
    }
    let free = limit.saturating_sub(player.home.storage.total());
    if quantity > free {
        return Err(ActionError::StorageFull {
            needed: quantity,
            free,
        });
    }
    player.inventory.remove(item, quantity)?;
    player.home.storage.add(item, quantity);
    Ok(format!("Stored {} {}", quantity, item))
}

pub fn retrieve(player: &mut Player, item: Item, quantity: u32) -> Result<String, ActionError> {
    if quantity == 0 {
        return Err(ActionError::ZeroQuantity);
    }
    player.home.storage.remove(item, quantity)?;
    player.inventory.add(item, quantity);
    Ok(format!("Retrieved {} {}", quantity, item))
}

pub fn plant(player: &mut Player, day: u32) -> Result<String, ActionError> {
    if player.home.field.is_some() {
        return Err(ActionError::FieldOccupied);
    }
    player.inventory.remove(TradeGood::Seeds, 1)?;
    player.home.field = Some(Crop { planted_on: day });
    Ok("You plant seeds in your field".to_string())
}

pub fn harvest(player: &mut Player, day: u32, growth_days: u32) -> Result<String, ActionError> {
    let crop = player.home.field.ok_or(ActionError::FieldEmpty)?;
    let needed = growth_days.saturating_sub(player.growth_bonus).max(1);
    let grown = day.saturating_sub(crop.planted_on);
    if grown < needed {
        return Err(ActionError::CropNotReady {
            remaining: needed - grown,
        });
    }

    player.home.field = None;
    player.inventory.add(TradeGood::Food, HARVEST_YIELD);
    Ok(format!("You harvest {} Food", HARVEST_YIELD))
}

/// Search ruins once: treasure most of the time, otherwise a fight with robbers
pub fn explore_ruins<R: Rng + ?Sized>(
    player: &mut Player,
    ruins: &mut Ruins,
    rng: &mut R,
) -> Result<Vec<String>, ActionError> {
    if ruins.explored {
        return Err(ActionError::RuinsExplored);
    }
    ruins.explored = true;

    let mut lines = vec![format!("You explore the {}...", ruins.kind)];
    if rng.gen_bool(0.6) {
        let treasure = Treasure::random(rng);
        lines.push(format!("You've discovered a {}!", treasure.name()));
        if treasure == Treasure::SacredArtifact {
            let relic = shared::Relic::random(rng);
            lines.push(format!("Inside lies a {}: {}", relic, relic.description()));
            lines.push(player.apply_relic(relic));
        }
        lines.push(format!("It's worth {} gold!", treasure.value()));
        player.gold = player.gold.saturating_add(treasure.value());
        return Ok(lines);
    }

    lines.push("You've encountered a group of robbers!".to_string());
    let robbers: u32 = rng.gen_range(5..=15);
    let score = player.combat_score();
    debug!(score, robbers, "robber fight");
    if score > robbers {
        let loot = rng.gen_range(100..=500);
        player.gold = player.gold.saturating_add(loot);
        lines.push(format!("You've defeated the robbers and found {} gold!", loot));
    } else {
        let loss = player.gold.min(rng.gen_range(50..=200));
        player.gold -= loss;
        lines.push(format!("The robbers overwhelmed you! You lost {} gold.", loss));
    }
    Ok(lines)
}

/// A reachable island as listed in a port
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub island: IslandId,
    pub name: String,
    pub distance: f64,
    pub days: u32,
}

/// Every other placed island, with how long the player's ship would take
pub fn destinations(world: &World, from: IslandId, speed: u32) -> Vec<Destination> {
    let Some(origin) = world.island(from).and_then(|i| i.coordinates) else {
        return Vec::new();
    };

    world
        .islands
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != from.0)
        .filter_map(|(i, island)| {
            let distance = origin.distance(island.coordinates?);
            Some(Destination {
                island: IslandId(i),
                name: island.name.clone(),
                distance,
                days: travel_days(distance, speed),
            })
        })
        .collect()
}
