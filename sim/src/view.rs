use crate::hazard::SeaMonster;
use crate::state::{GameState, Mode};
use shared::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Water,
    Inhabited,
    Uninhabited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipMarker {
    pub position: Coord,
    pub glyph: char,
    /// The ship the player is aboard
    pub is_viewer: bool,
}

/// Read-only snapshot of everything the map renderer draws
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapView {
    pub size: usize,
    pub day: u32,
    /// Row-major, `cells[x][y]`
    pub cells: Vec<Vec<Cell>>,
    pub ships: Vec<ShipMarker>,
    /// Set while the player stands on an island
    pub player: Option<Coord>,
    /// Only on days the monster shows itself
    pub hazard: Option<Coord>,
}

impl MapView {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.world;
        let size = world.map.size;

        let mut cells = vec![vec![Cell::Water; size]; size];
        for coord in world.map.cells() {
            if let Some(island) = world.map.island_at(coord).and_then(|id| world.island(id)) {
                cells[coord.x as usize][coord.y as usize] = if island.inhabited {
                    Cell::Inhabited
                } else {
                    Cell::Uninhabited
                };
            }
        }

        let riding = match state.mode {
            Mode::Hitched { ship } => Some(ship),
            _ => None,
        };
        let mut ships: Vec<ShipMarker> = world
            .trade_ships()
            .map(|ship| ShipMarker {
                position: ship.position,
                glyph: ship.class.glyph(),
                is_viewer: riding == Some(ship.id),
            })
            .collect();

        let mut player = None;
        match state.mode {
            Mode::Ashore { .. } => player = state.player_position(),
            Mode::AtSea { position, .. } => {
                if let Some(own) = &state.player.ship {
                    ships.push(ShipMarker {
                        position,
                        glyph: own.class.glyph(),
                        is_viewer: true,
                    });
                }
            }
            Mode::Hitched { .. } => {}
        }

        Self {
            size,
            day: state.day,
            cells,
            ships,
            player,
            hazard: SeaMonster::is_visible(state.day).then_some(state.hazard.position),
        }
    }

    /// Where the '@' goes
    pub fn viewer(&self) -> Option<Coord> {
        self.player.or_else(|| {
            self.ships
                .iter()
                .find(|s| s.is_viewer)
                .map(|s| s.position)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameConfig;
    use crate::trade_ship::TradeShip;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::ShipClass;

    fn state() -> (GameState, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let state = GameState::new("Viewer".to_string(), GameConfig::default(), &mut rng).unwrap();
        (state, rng)
    }

    #[test]
    fn test_cells_match_islands() {
        let (state, _) = state();
        let view = MapView::capture(&state);

        for coord in state.world.map.cells() {
            let cell = view.cells[coord.x as usize][coord.y as usize];
            match state.world.map.island_at(coord) {
                None => assert_eq!(cell, Cell::Water),
                Some(id) if state.world.islands[id.0].inhabited => {
                    assert_eq!(cell, Cell::Inhabited)
                }
                Some(_) => assert_eq!(cell, Cell::Uninhabited),
            }
        }
    }

    #[test]
    fn test_hazard_only_every_third_day() {
        let (mut state, _) = state();
        state.day = 4;
        assert_eq!(MapView::capture(&state).hazard, None);
        state.day = 6;
        assert_eq!(MapView::capture(&state).hazard, Some(state.hazard.position));
    }

    #[test]
    fn test_viewer_follows_mode() {
        let (mut state, mut rng) = state();
        let home = state.player.home.island;
        let dock = state.world.islands[home.0].coordinates.unwrap();
        assert_eq!(MapView::capture(&state).viewer(), Some(dock));

        state.player.ship = Some(crate::ship::Ship::new(ShipClass::Galleon));
        state.mode = Mode::AtSea {
            position: Coord::new(4, 4),
            moves_left: 1,
        };
        let view = MapView::capture(&state);
        assert_eq!(view.player, None);
        assert_eq!(view.viewer(), Some(Coord::new(4, 4)));
        assert!(view.ships.iter().any(|s| s.is_viewer && s.glyph == 'G'));

        let ship = TradeShip::new(home, &state.world.islands, &mut rng).unwrap();
        let id = ship.id;
        state.world.ports[0].ships.push(ship);
        state.mode = Mode::Hitched { ship: id };
        let view = MapView::capture(&state);
        assert_eq!(view.viewer(), Some(dock));
        assert_eq!(view.ships.iter().filter(|s| s.is_viewer).count(), 1);
    }
}
