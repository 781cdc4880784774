pub mod catalog;
pub mod coord;
pub mod inventory;

pub use catalog::*;
pub use coord::Coord;
pub use inventory::{Inventory, InventoryError};

/// The save format version - save files must match this exactly
/// Version 1: JSON snapshot of the whole game state plus the RNG stream
pub const SAVE_FORMAT_VERSION: u32 = 1;
