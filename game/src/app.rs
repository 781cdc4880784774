//! The interactive session: title screen and the menu loop. The world ticks
//! after every top-level choice, while the day only advances when an action
//! uses one up.

use crate::console::Console;
use crate::menus::{self, Command, Entries, Meta};
use crate::render::{render_map, Palette};
use crate::saves::{SaveData, SaveStore};
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim::{ActionError, GameConfig, GameState, MapView, Mode, Outcome, TickReport};
use std::io::{BufRead, Write};

const TITLE: &str = r"
   ___                _        _    ___                 _
  / __|_ _ _  _ _____| |_ __ _| |  / _ \ _  _ ___ _____| |_
 | (__| '_| || (_-<  _/ _` | | | | (_) | || / -_|_-<  _|
  \___|_|  \_, /__/\__\__,_|_|  \__\_\\_,_\___/__/\__|
           |__/
";

enum Flow {
    Continue,
    Quit,
}

pub struct App<R, W> {
    console: Console<R, W>,
    palette: Palette,
    store: SaveStore,
    config: GameConfig,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(console: Console<R, W>, palette: Palette, store: SaveStore) -> Self {
        Self {
            console,
            palette,
            store,
            config: GameConfig::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.console.say(TITLE)?;
        let Some((mut state, mut rng)) = self.start()? else {
            return Ok(());
        };

        self.play(&mut state, &mut rng)
    }

    fn play(&mut self, state: &mut GameState, rng: &mut ChaCha8Rng) -> Result<()> {
        loop {
            self.show_map(state)?;
            if let Flow::Quit = self.take_step(state, rng)? {
                self.console.say("\nFair winds, captain!")?;
                return Ok(());
            }

            let report = state.tick(rng);
            self.show_report(state, &report)?;
            if report.defeated {
                self.console.say("\nThe sea monster has found you! Your adventure ends here.")?;
                self.console
                    .say(format!("You survived {} days.", report.day))?;
                return Ok(());
            }
        }
    }

    /// Title menu. A failed load falls back to a new game.
    fn start(&mut self) -> Result<Option<(GameState, ChaCha8Rng)>> {
        let options = ["Start a new game", "Load a saved game"];
        match self.console.choose("Crystal Quest", &options)? {
            Some(1) => {
                if let Some(loaded) = self.load()? {
                    return Ok(Some(loaded));
                }
            }
            Some(_) => {}
            None => return Ok(None),
        }
        self.new_game()
    }

    fn load(&mut self) -> Result<Option<(GameState, ChaCha8Rng)>> {
        let entries = match self.store.list() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "could not list saves");
                self.console.say(format!("\nCould not read saved games: {}", e))?;
                return Ok(None);
            }
        };
        if entries.is_empty() {
            self.console.say("\nNo saved games found! Starting a new game.")?;
            return Ok(None);
        }

        let labels: Vec<String> = entries.iter().map(|e| e.label()).collect();
        let Some(index) = self.console.choose("Saved games", &labels)? else {
            return Ok(None);
        };
        match self.store.load(index) {
            Ok(data) => {
                self.console
                    .say(format!("\nGame loaded. It is day {}.", data.state.day))?;
                Ok(Some((data.state, data.rng)))
            }
            Err(e) => {
                tracing::error!(error = %e, "load failed");
                self.console
                    .say(format!("\nCould not load the save: {}. Starting a new game.", e))?;
                Ok(None)
            }
        }
    }

    fn new_game(&mut self) -> Result<Option<(GameState, ChaCha8Rng)>> {
        let Some(name) = self.console.prompt("\nWhat is your name, sailor? ")? else {
            return Ok(None);
        };
        let name = if name.is_empty() {
            "Nameless".to_string()
        } else {
            name
        };

        let mut rng = ChaCha8Rng::from_entropy();
        let state = GameState::new(name, self.config.clone(), &mut rng)
            .context("could not generate a world")?;

        let player = &state.player;
        let home = state.world.island(player.home.island);
        let town = home
            .and_then(|i| i.towns.get(player.home.town))
            .map_or("", |t| t.name.as_str());
        self.console
            .say(format!("\nWelcome, {} the {}!", player.name, player.species))?;
        self.console.say(format!(
            "You live in {} on {}.",
            town,
            home.map_or("", |i| i.name.as_str())
        ))?;
        self.console.say(format!(
            "You carry the {}: {}.",
            player.starting_relic,
            player.starting_relic.description()
        ))?;
        Ok(Some((state, rng)))
    }

    fn show_map(&mut self, state: &GameState) -> Result<()> {
        let view = MapView::capture(state);
        self.console.say(render_map(&view, &self.palette))?;
        Ok(())
    }

    /// One top-level menu choice, followed through any submenu it opens
    fn take_step(&mut self, state: &mut GameState, rng: &mut ChaCha8Rng) -> Result<Flow> {
        if self.console.is_closed() {
            return Ok(Flow::Quit);
        }

        let title = self.title(state);
        let result = match state.mode {
            Mode::Ashore { island, town } => {
                let Some(command) = self.pick(&title, menus::ashore_menu(state, island, town))?
                else {
                    return Ok(Flow::Continue);
                };
                match command {
                    Command::Act(action) => state.apply_ashore(action, rng),
                    Command::Visit(location) => {
                        let Some(town) = town else {
                            return Ok(Flow::Continue);
                        };
                        match menus::visit(&mut self.console, state, island, town, location)? {
                            Some(action) => state.apply_ashore(action, rng),
                            None => return Ok(Flow::Continue),
                        }
                    }
                    Command::Steer => return Ok(Flow::Continue),
                    Command::Meta(meta) => return self.meta(state, rng, meta),
                }
            }
            Mode::AtSea {
                position,
                moves_left,
            } => {
                let Some(command) = self.pick(&title, menus::sea_menu(state, position, moves_left))?
                else {
                    return Ok(Flow::Continue);
                };
                match command {
                    Command::Act(action) => state.apply_at_sea(action, rng),
                    Command::Steer => match menus::steer(&mut self.console)? {
                        Some(action) => state.apply_at_sea(action, rng),
                        None => return Ok(Flow::Continue),
                    },
                    Command::Visit(_) => return Ok(Flow::Continue),
                    Command::Meta(meta) => return self.meta(state, rng, meta),
                }
            }
            Mode::Hitched { .. } => {
                let Some(command) = self.pick(&title, menus::hitched_menu())? else {
                    return Ok(Flow::Continue);
                };
                match command {
                    Command::Act(action) => state.apply_hitched(action),
                    Command::Steer | Command::Visit(_) => return Ok(Flow::Continue),
                    Command::Meta(meta) => return self.meta(state, rng, meta),
                }
            }
        };

        self.report_action(result)?;
        Ok(Flow::Continue)
    }

    fn report_action(&mut self, result: Result<Outcome, ActionError>) -> Result<()> {
        match result {
            Ok(outcome) => {
                for message in &outcome.messages {
                    self.console.say(message)?;
                }
            }
            Err(e) => self.console.say(e)?,
        }
        Ok(())
    }

    fn pick<A>(&mut self, title: &str, entries: Entries<A>) -> Result<Option<Command<A>>> {
        let labels: Vec<&str> = entries.iter().map(|(label, _)| label.as_str()).collect();
        let pick = self.console.choose(title, &labels)?;
        Ok(pick.and_then(|i| entries.into_iter().nth(i)).map(|(_, command)| command))
    }

    fn meta(&mut self, state: &GameState, rng: &ChaCha8Rng, meta: Meta) -> Result<Flow> {
        match meta {
            Meta::IslandInfo => {
                if let Mode::Ashore { island, .. } = state.mode {
                    self.console.blank()?;
                    for line in menus::island_info(state, island) {
                        self.console.say(line)?;
                    }
                }
            }
            Meta::Character => {
                self.console.blank()?;
                for line in menus::character_sheet(state) {
                    self.console.say(line)?;
                }
            }
            Meta::Save => {
                let data = SaveData::new(state.clone(), rng.clone());
                match self.store.save(&data) {
                    Ok(path) => self
                        .console
                        .say(format!("\nGame saved as {}", path.display()))?,
                    Err(e) => {
                        tracing::error!(error = %e, "save failed");
                        self.console.say(format!("\nCould not save the game: {}", e))?;
                    }
                }
            }
            Meta::Quit => {
                if self.console.confirm("Are you sure you want to quit?")? {
                    return Ok(Flow::Quit);
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn title(&self, state: &GameState) -> String {
        let place = match state.mode {
            Mode::Ashore { island, town } => {
                let isle = state.world.island(island);
                let name = isle.map_or("", |i| i.name.as_str());
                match town.and_then(|t| isle?.towns.get(t)) {
                    Some(t) => format!("{} on {}", t.name, name),
                    None => format!("{} (uninhabited)", name),
                }
            }
            Mode::AtSea { position, .. } => format!("At sea {}", position),
            Mode::Hitched { .. } => "Aboard a trade ship".to_string(),
        };
        format!("Day {} | {} gold | {}", state.day, state.player.gold, place)
    }

    fn show_report(&mut self, state: &GameState, report: &TickReport) -> Result<()> {
        let name_of = |id| state.world.island(id).map_or("", |i| i.name.as_str());

        if report.hazard_visible {
            for ship in &report.destroyed {
                self.console.say(format!(
                    "\nA {} was dragged under by the sea monster at {}!",
                    ship.class, ship.position
                ))?;
            }
        }
        for ship in &report.spawned {
            self.console.say(format!(
                "A {} sets out from {} bound for {}",
                ship.class,
                name_of(ship.home),
                name_of(ship.destination)
            ))?;
        }
        for ship in &report.arrivals {
            self.console
                .say(format!("A {} trade ship has arrived in port!", ship.class))?;
        }
        if let Some(island) = report.landed {
            self.console.say(format!(
                "The ship reaches {} and you go ashore.",
                name_of(island)
            ))?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.console.into_output()
    }
}
