pub mod action;
pub mod hazard;
pub mod island;
pub mod map;
pub mod movement;
pub mod player;
pub mod port;
pub mod services;
pub mod ship;
pub mod state;
pub mod trade_ship;
pub mod view;
pub mod world;

pub use action::{ActionError, AshoreAction, HitchedAction, Outcome, SeaAction};
pub use hazard::SeaMonster;
pub use island::{Island, IslandId, Location, SizeClass, Town};
pub use map::Map;
pub use movement::Direction;
pub use player::Player;
pub use port::Port;
pub use ship::Ship;
pub use state::{GameConfig, GameState, Mode, TickReport};
pub use trade_ship::TradeShip;
pub use view::{Cell, MapView, ShipMarker};
pub use world::{World, WorldConfig, WorldError};
