//! Menu tables for each player mode and the location submenus that turn
//! console answers into tagged actions.

use crate::console::Console;
use shared::{Coord, Item, ShipClass, TradeGood, Weapon, WeaponKind};
use sim::services;
use sim::{
    ActionError, AshoreAction, Direction, GameState, HitchedAction, IslandId, Location, SeaAction,
};
use std::io::{self, BufRead, Write};
use uuid::Uuid;

/// What a top-level menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<A> {
    Act(A),
    Visit(Location),
    /// Open the compass to pick a sailing direction
    Steer,
    Meta(Meta),
}

/// Entries every mode shares. None of them takes a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meta {
    IslandInfo,
    Character,
    Save,
    Quit,
}

pub type Entries<A> = Vec<(String, Command<A>)>;

fn closing<A>(entries: &mut Entries<A>) {
    entries.push(("Character sheet".to_string(), Command::Meta(Meta::Character)));
    entries.push(("Save game".to_string(), Command::Meta(Meta::Save)));
    entries.push(("Quit".to_string(), Command::Meta(Meta::Quit)));
}

fn location_label(location: Location) -> String {
    match location {
        Location::Home => "Go home".to_string(),
        other => format!("Visit the {}", other.name()),
    }
}

pub fn ashore_menu(state: &GameState, island: IslandId, town: Option<usize>) -> Entries<AshoreAction> {
    let mut entries = Vec::new();
    let isle = state.world.island(island);

    match (isle, town) {
        (Some(isle), Some(t)) => {
            if let Some(town) = isle.towns.get(t) {
                for location in &town.locations {
                    entries.push((location_label(*location), Command::Visit(*location)));
                }
            }
        }
        (isle, _) => {
            if let Some(ruins) = isle.and_then(|i| i.ruins.as_ref()).filter(|r| !r.explored) {
                entries.push((
                    format!("Explore the ancient {}", ruins.kind),
                    Command::Act(AshoreAction::ExploreRuins),
                ));
            }
            entries.push((
                "Light a signal fire for passing ships".to_string(),
                Command::Act(AshoreAction::SignalForPassage),
            ));
            if state.player.ship.is_some() {
                entries.push(("Set sail".to_string(), Command::Act(AshoreAction::SetSail)));
            }
        }
    }

    entries.push(("Island information".to_string(), Command::Meta(Meta::IslandInfo)));
    entries.push(("Wait a day".to_string(), Command::Act(AshoreAction::Wait)));
    closing(&mut entries);
    entries
}

pub fn sea_menu(state: &GameState, position: Coord, moves_left: u32) -> Entries<SeaAction> {
    let mut entries = vec![
        (format!("Sail ({} moves left today)", moves_left), Command::Steer),
        ("Drop anchor and wait a day".to_string(), Command::Act(SeaAction::Wait)),
        ("Repair the hull with Wood".to_string(), Command::Act(SeaAction::Repair)),
    ];
    let landfall = state
        .world
        .map
        .island_at(position)
        .and_then(|id| state.world.island(id));
    if let Some(island) = landfall {
        entries.push((
            format!("Disembark on {}", island.name),
            Command::Act(SeaAction::Disembark),
        ));
    }
    closing(&mut entries);
    entries
}

pub fn hitched_menu() -> Entries<HitchedAction> {
    let mut entries = vec![("Work the deck for a day".to_string(), Command::Act(HitchedAction::Wait))];
    closing(&mut entries);
    entries
}

/// Compass submenu for sailing one cell
pub fn steer<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<Option<SeaAction>> {
    let labels: Vec<&str> = Direction::ALL.iter().map(|d| d.name()).collect();
    let pick = console.choose("Which way?", &labels)?;
    Ok(pick.map(|i| SeaAction::Sail(Direction::ALL[i])))
}

/// Run a town location's submenu. None when the player backs out.
pub fn visit<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
    island: IslandId,
    town: usize,
    location: Location,
) -> io::Result<Option<AshoreAction>> {
    match location {
        Location::Market => market(console),
        Location::Smithy => smithy(console),
        Location::Pub => tavern(console, state),
        Location::Shipyard => shipyard(console, state),
        Location::Port => port(console, state, island, town),
        Location::Home => home(console, state),
    }
}

fn market<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<Option<AshoreAction>> {
    let labels: Vec<String> = TradeGood::ALL
        .iter()
        .map(|g| format!("{} ({} gold)", g, g.price()))
        .collect();
    let Some(i) = console.choose("Market", &labels)? else {
        return Ok(None);
    };
    let good = TradeGood::ALL[i];
    let quantity = console.ask_number(&format!("How many {} would you like to buy? ", good))?;
    Ok(quantity.map(|quantity| AshoreAction::BuyGoods { good, quantity }))
}

fn smithy<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<Option<AshoreAction>> {
    let labels: Vec<String> = Weapon::ALL
        .iter()
        .map(|w| {
            let stats = w.stats();
            match stats.kind {
                WeaponKind::Ship => format!(
                    "{} ({} gold, damage {}, ship weapon, {} cargo)",
                    w, stats.price, stats.damage, stats.cargo_space
                ),
                kind => format!("{} ({} gold, damage {}, {})", w, stats.price, stats.damage, kind),
            }
        })
        .collect();
    let pick = console.choose("Smithy", &labels)?;
    Ok(pick.map(|i| AshoreAction::BuyWeapon {
        weapon: Weapon::ALL[i],
    }))
}

fn tavern<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
) -> io::Result<Option<AshoreAction>> {
    console.blank()?;
    console.say("=== Pub ===")?;
    match &state.player.ship {
        Some(ship) => console.say(format!(
            "Your {} has {}/{} crew aboard",
            ship.class,
            ship.crew,
            ship.crew_capacity()
        ))?,
        None => console.say("Sailors drink here, but you have no ship for them to crew")?,
    }
    let count = console.ask_number(&format!(
        "How many crew members would you like to hire ({} gold each)? ",
        state.config.crew_wage
    ))?;
    Ok(count.map(|count| AshoreAction::HireCrew { count }))
}

fn shipyard<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
) -> io::Result<Option<AshoreAction>> {
    if let Some(ship) = &state.player.ship {
        console.say(format!("Your {}: hull {}/{}", ship.class, ship.hull, ship.hull_max()))?;
    }
    let options = [
        "Buy a ship".to_string(),
        format!("Repair your ship ({} gold)", state.config.repair_cost),
    ];
    match console.choose("Shipyard", &options)? {
        Some(0) => {
            let labels: Vec<String> = ShipClass::ALL
                .iter()
                .map(|c| {
                    let s = c.stats();
                    format!(
                        "{} ({} gold): crew {}, speed {}, cargo {}, hull {}",
                        c, s.price, s.crew_max, s.speed, s.cargo, s.hull_max
                    )
                })
                .collect();
            let pick = console.choose("Ships for sale", &labels)?;
            Ok(pick.map(|i| AshoreAction::BuyShip {
                class: ShipClass::ALL[i],
            }))
        }
        Some(_) => Ok(Some(AshoreAction::RepairShip)),
        None => Ok(None),
    }
}

fn port<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
    island: IslandId,
    town: usize,
) -> io::Result<Option<AshoreAction>> {
    let fare = state
        .world
        .port(island, town)
        .map_or(state.config.fare, |p| p.fare);
    let options = [
        "View destinations".to_string(),
        "Set sail".to_string(),
        format!("Book passage on a trade ship ({} gold)", fare),
        "Trade with a docked ship".to_string(),
    ];

    loop {
        match console.choose("Port", &options)? {
            Some(0) => show_destinations(console, state, island)?,
            Some(1) => return Ok(Some(AshoreAction::SetSail)),
            Some(2) => {
                if let Some(ship) = pick_docked(console, state, island)? {
                    return Ok(Some(AshoreAction::BookPassage { ship }));
                }
            }
            Some(_) => {
                if let Some(action) = trade(console, state, island)? {
                    return Ok(Some(action));
                }
            }
            None => return Ok(None),
        }
    }
}

fn show_destinations<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
    island: IslandId,
) -> io::Result<()> {
    let speed = state.player.ship.as_ref().map(|s| s.speed());
    console.blank()?;
    console.say("=== Destinations ===")?;
    for dest in services::destinations(&state.world, island, speed.unwrap_or(1)) {
        match speed {
            Some(_) => console.say(format!(
                "{}: {:.1} leagues, {} day(s) in your ship",
                dest.name, dest.distance, dest.days
            ))?,
            None => console.say(format!("{}: {:.1} leagues", dest.name, dest.distance))?,
        }
    }
    Ok(())
}

fn pick_docked<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
    island: IslandId,
) -> io::Result<Option<Uuid>> {
    let docked = state.world.docked_at(island);
    if docked.is_empty() {
        console.say(ActionError::NoShipsInPort)?;
        return Ok(None);
    }
    let labels: Vec<String> = docked
        .iter()
        .map(|s| s.describe(&state.world.islands))
        .collect();
    let pick = console.choose("Ships in port", &labels)?;
    Ok(pick.map(|i| docked[i].id))
}

fn trade<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
    island: IslandId,
) -> io::Result<Option<AshoreAction>> {
    let Some(id) = pick_docked(console, state, island)? else {
        return Ok(None);
    };
    let Some(ship) = state.world.trade_ship(id) else {
        return Ok(None);
    };

    let options = [
        format!("Buy {} at {} gold each", ship.selling, ship.sell_price),
        format!("Sell {} at {} gold each", ship.buying, ship.buy_price),
    ];
    let Some(side) = console.choose("Trade", &options)? else {
        return Ok(None);
    };
    let Some(quantity) = console.ask_number("How many? ")? else {
        return Ok(None);
    };
    Ok(Some(if side == 0 {
        AshoreAction::TradeBuy { ship: id, quantity }
    } else {
        AshoreAction::TradeSell { ship: id, quantity }
    }))
}

fn home<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    state: &GameState,
) -> io::Result<Option<AshoreAction>> {
    let home = &state.player.home;
    console.blank()?;
    console.say(format!(
        "Storage: {}/{} items",
        home.storage.total(),
        state.config.storage_limit
    ))?;
    match home.field {
        Some(crop) => console.say(format!("Crops planted on day {}", crop.planted_on))?,
        None => console.say("Your field lies fallow")?,
    }

    let options = ["Store an item", "Retrieve an item", "Plant seeds", "Harvest crops"];
    match console.choose("Home", &options)? {
        Some(0) => {
            let held: Vec<(Item, u32)> = state.player.inventory.iter().collect();
            pick_item(console, "You have nothing to store", &held)
                .map(|pick| pick.map(|(item, quantity)| AshoreAction::Store { item, quantity }))
        }
        Some(1) => {
            let stored: Vec<(Item, u32)> = home.storage.iter().collect();
            pick_item(console, "Your storage is empty", &stored)
                .map(|pick| pick.map(|(item, quantity)| AshoreAction::Retrieve { item, quantity }))
        }
        Some(2) => Ok(Some(AshoreAction::Plant)),
        Some(_) => Ok(Some(AshoreAction::Harvest)),
        None => Ok(None),
    }
}

fn pick_item<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    empty: &str,
    items: &[(Item, u32)],
) -> io::Result<Option<(Item, u32)>> {
    if items.is_empty() {
        console.say(empty)?;
        return Ok(None);
    }
    let labels: Vec<String> = items.iter().map(|(item, n)| format!("{} x{}", item, n)).collect();
    let Some(i) = console.choose("Items", &labels)? else {
        return Ok(None);
    };
    let item = items[i].0;
    let quantity = console.ask_number(&format!("How many {}? ", item))?;
    Ok(quantity.map(|q| (item, q)))
}

pub fn island_info(state: &GameState, id: IslandId) -> Vec<String> {
    let Some(island) = state.world.island(id) else {
        return Vec::new();
    };

    let mut lines = vec![
        format!("=== {} ===", island.name),
        format!("Size: {}", island.size),
        format!("Climate: {}", island.climate),
    ];
    if let Some(coord) = island.coordinates {
        let bearing = island.bearing_label(state.world.map.size).unwrap_or_default();
        lines.push(format!("Position: {} {}", coord, bearing));
    }
    lines.push(format!("Biotopes: {}", island.biotopes.join(", ")));

    if island.inhabited {
        lines.push(format!("Population: {}", island.population()));
        lines.push("Towns:".to_string());
        for town in &island.towns {
            let places: Vec<&str> = town.locations.iter().map(|l| l.name()).collect();
            lines.push(format!(
                "  {} (population {}): {}",
                town.name,
                town.population,
                places.join(", ")
            ));
        }
    } else {
        lines.push("This island is uninhabited".to_string());
    }

    if let Some(ruins) = &island.ruins {
        let status = if ruins.explored { "explored" } else { "unexplored" };
        lines.push(format!("Ruins: ancient {} ({})", ruins.kind, status));
    }
    lines
}

pub fn character_sheet(state: &GameState) -> Vec<String> {
    let player = &state.player;
    let mut lines = vec![
        format!("=== {} the {} ===", player.name, player.species),
        player.stats.to_string(),
        format!("Gold: {}", player.gold),
        format!("Combat strength: {}", player.combat_score()),
    ];

    if player.inventory.is_empty() {
        lines.push("Inventory: empty".to_string());
    } else {
        lines.push("Inventory:".to_string());
        for (item, count) in player.inventory.iter() {
            lines.push(format!("  {} x{}", item, count));
        }
    }

    match &player.ship {
        Some(ship) => {
            lines.push(format!(
                "Ship: {} with {}/{} crew, hull {}/{}, cargo {}/{}",
                ship.class,
                ship.crew,
                ship.crew_capacity(),
                ship.hull,
                ship.hull_max(),
                ship.cargo_used(),
                ship.cargo_capacity()
            ));
            for (weapon, count) in ship.weapons.iter() {
                lines.push(format!("  {} x{}", weapon, count));
            }
        }
        None => lines.push("Ship: none".to_string()),
    }

    if let Some(island) = state.world.island(player.home.island) {
        let town = island
            .towns
            .get(player.home.town)
            .map_or("", |t| t.name.as_str());
        lines.push(format!("Home: {} on {}", town, island.name));
    }
    lines.push(format!(
        "Starting relic: {} ({})",
        player.starting_relic,
        player.starting_relic.description()
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sim::island::Ruins;
    use sim::{GameConfig, Mode, Ship, TradeShip};
    use std::io::Cursor;

    type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: TestConsole) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn game() -> (GameState, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let state = GameState::new("Menu".to_string(), GameConfig::default(), &mut rng).unwrap();
        (state, rng)
    }

    fn home_town(state: &GameState) -> (IslandId, usize) {
        (state.player.home.island, state.player.home.town)
    }

    fn labels<A>(entries: &Entries<A>) -> Vec<&str> {
        entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    #[test]
    fn test_home_town_menu() {
        let (state, _) = game();
        let (island, town) = home_town(&state);
        let entries = ashore_menu(&state, island, Some(town));

        assert_eq!(
            labels(&entries),
            vec![
                "Visit the shipyard",
                "Visit the pub",
                "Visit the smithy",
                "Visit the market",
                "Visit the port",
                "Go home",
                "Island information",
                "Wait a day",
                "Character sheet",
                "Save game",
                "Quit",
            ]
        );
        assert_eq!(entries[5].1, Command::Visit(Location::Home));
    }

    #[test]
    fn test_wild_island_menu() {
        let (mut state, _) = game();
        let (island, _) = home_town(&state);
        state.world.islands[island.0].ruins = Some(Ruins {
            kind: "Temple".to_string(),
            explored: false,
        });

        let entries = ashore_menu(&state, island, None);
        assert_eq!(entries[0].1, Command::Act(AshoreAction::ExploreRuins));
        assert_eq!(entries[1].1, Command::Act(AshoreAction::SignalForPassage));
        assert!(!labels(&entries).contains(&"Set sail"));

        state.player.ship = Some(Ship::new(ShipClass::Sloop));
        state.world.islands[island.0].ruins.as_mut().unwrap().explored = true;
        let entries = ashore_menu(&state, island, None);
        assert_eq!(entries[0].1, Command::Act(AshoreAction::SignalForPassage));
        assert!(labels(&entries).contains(&"Set sail"));
    }

    #[test]
    fn test_disembark_offered_only_over_land() {
        let (state, _) = game();
        let dock = state.world.islands[state.player.home.island.0]
            .coordinates
            .unwrap();
        let water = state.world.map.water_cells()[0];

        let over_land = sea_menu(&state, dock, 3);
        assert!(over_land
            .iter()
            .any(|(_, c)| *c == Command::Act(SeaAction::Disembark)));
        assert!(over_land[0].0.contains("3 moves left"));

        let over_water = sea_menu(&state, water, 0);
        assert!(!over_water
            .iter()
            .any(|(_, c)| *c == Command::Act(SeaAction::Disembark)));
    }

    #[test]
    fn test_steer_picks_direction() {
        let mut c = console("2\n");
        assert_eq!(
            steer(&mut c).unwrap(),
            Some(SeaAction::Sail(Direction::North))
        );
    }

    #[test]
    fn test_market_purchase() {
        let (state, _) = game();
        let (island, town) = home_town(&state);
        let mut c = console("2\n4\n");

        let action = visit(&mut c, &state, island, town, Location::Market).unwrap();
        assert_eq!(
            action,
            Some(AshoreAction::BuyGoods {
                good: TradeGood::Seeds,
                quantity: 4
            })
        );
        assert!(output(c).contains("Spices (100 gold)"));
    }

    #[test]
    fn test_backing_out_builds_nothing() {
        let (state, _) = game();
        let (island, town) = home_town(&state);
        for location in [Location::Market, Location::Smithy, Location::Shipyard, Location::Port] {
            let mut c = console("0\n");
            assert_eq!(visit(&mut c, &state, island, town, location).unwrap(), None);
        }
    }

    #[test]
    fn test_smithy_lists_ship_weapons() {
        let (state, _) = game();
        let (island, town) = home_town(&state);
        let mut c = console("5\n");

        let action = visit(&mut c, &state, island, town, Location::Smithy).unwrap();
        assert_eq!(action, Some(AshoreAction::BuyWeapon { weapon: Weapon::Cannon }));
        assert!(output(c).contains("Cannon (500 gold, damage 8, ship weapon, 2 cargo)"));
    }

    #[test]
    fn test_shipyard_buy_and_repair() {
        let (state, _) = game();
        let (island, town) = home_town(&state);

        let mut c = console("1\n3\n");
        assert_eq!(
            visit(&mut c, &state, island, town, Location::Shipyard).unwrap(),
            Some(AshoreAction::BuyShip {
                class: ShipClass::Galleon
            })
        );

        let mut c = console("2\n");
        assert_eq!(
            visit(&mut c, &state, island, town, Location::Shipyard).unwrap(),
            Some(AshoreAction::RepairShip)
        );
    }

    #[test]
    fn test_port_destinations_then_set_sail() {
        let (mut state, _) = game();
        let (island, town) = home_town(&state);
        state.player.ship = Some(Ship::new(ShipClass::Sloop));
        let mut c = console("1\n2\n");

        let action = visit(&mut c, &state, island, town, Location::Port).unwrap();
        assert_eq!(action, Some(AshoreAction::SetSail));

        let text = output(c);
        assert!(text.contains("=== Destinations ==="));
        let other = state
            .world
            .islands
            .iter()
            .enumerate()
            .find(|(i, isle)| *i != island.0 && isle.coordinates.is_some())
            .map(|(_, isle)| isle.name.clone())
            .unwrap();
        assert!(text.contains(&other));
        assert!(text.contains("day(s) in your ship"));
    }

    #[test]
    fn test_empty_port_reports_and_stays() {
        let (state, _) = game();
        let (island, town) = home_town(&state);
        let mut c = console("3\n4\n0\n");

        let action = visit(&mut c, &state, island, town, Location::Port).unwrap();
        assert_eq!(action, None);
        assert_eq!(output(c).matches("No trade ships in port").count(), 2);
    }

    #[test]
    fn test_book_and_trade_with_docked_ship() {
        let (mut state, mut rng) = game();
        let (island, town) = home_town(&state);
        let ship = TradeShip::new(island, &state.world.islands, &mut rng).unwrap();
        let id = ship.id;
        state.world.ports[0].ships.push(ship);

        let mut c = console("3\n1\n");
        assert_eq!(
            visit(&mut c, &state, island, town, Location::Port).unwrap(),
            Some(AshoreAction::BookPassage { ship: id })
        );

        let mut c = console("4\n1\n2\n5\n");
        assert_eq!(
            visit(&mut c, &state, island, town, Location::Port).unwrap(),
            Some(AshoreAction::TradeSell { ship: id, quantity: 5 })
        );
    }

    #[test]
    fn test_home_store_and_plant() {
        let (mut state, _) = game();
        let (island, town) = home_town(&state);
        state.player.inventory = shared::Inventory::new();
        state.player.inventory.add(TradeGood::Rum, 3);

        let mut c = console("1\n1\n2\n");
        assert_eq!(
            visit(&mut c, &state, island, town, Location::Home).unwrap(),
            Some(AshoreAction::Store {
                item: Item::Good(TradeGood::Rum),
                quantity: 2
            })
        );
        assert!(output(c).contains("Your field lies fallow"));

        let mut c = console("2\n");
        assert_eq!(visit(&mut c, &state, island, town, Location::Home).unwrap(), None);
        assert!(output(c).contains("Your storage is empty"));

        let mut c = console("3\n");
        assert_eq!(
            visit(&mut c, &state, island, town, Location::Home).unwrap(),
            Some(AshoreAction::Plant)
        );
    }

    #[test]
    fn test_info_and_character_views() {
        let (mut state, _) = game();
        let (island, _) = home_town(&state);

        let info = island_info(&state, island);
        assert_eq!(info[0], format!("=== {} ===", state.world.islands[island.0].name));
        assert!(info.iter().any(|l| l.starts_with("Population: ")));
        assert!(info.iter().any(|l| l.contains("home")));

        state.mode = Mode::AtSea {
            position: Coord::new(0, 0),
            moves_left: 0,
        };
        let sheet = character_sheet(&state);
        assert!(sheet.contains(&"Gold: 1000".to_string()));
        assert!(sheet.contains(&"Ship: none".to_string()));
        assert!(sheet.iter().any(|l| l.starts_with("Starting relic: ")));
    }
}
