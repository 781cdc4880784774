//! Tagged player actions, one enum per mode, and the errors they can raise.

use crate::movement::Direction;
use serde::{Deserialize, Serialize};
use shared::{InventoryError, Item, ShipClass, TradeGood, Weapon};
use thiserror::Error;
use uuid::Uuid;

/// Why an action was refused. State is untouched and no day passes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("You need {needed} gold but only have {available}")]
    InsufficientGold { needed: u32, available: u32 },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("Not enough cargo space: {needed} needed, {free} free")]
    InsufficientCargo { needed: u32, free: u32 },
    #[error("Not enough storage space: {needed} needed, {free} free")]
    StorageFull { needed: u32, free: u32 },
    #[error("Your ship can only hold {capacity} crew members")]
    CrewCapacity { capacity: u32 },
    #[error("You need a ship first")]
    NoShip,
    #[error("No trade ships in port")]
    NoShipsInPort,
    #[error("That ship is not in port")]
    UnknownShip,
    #[error("No valid destination")]
    NoDestination,
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
    #[error("There is no {0} here")]
    Unavailable(&'static str),
    #[error("There are no ruins on this island")]
    NoRuins,
    #[error("You've already explored these ruins")]
    RuinsExplored,
    #[error("Your ship is too damaged to sail; repair it first")]
    ShipImmobile,
    #[error("Your ship's hull is already at full strength")]
    HullIntact,
    #[error("You can't sail off the map")]
    OffTheMap,
    #[error("No moves left today; wait for the next day")]
    NoMovesLeft,
    #[error("There's no island here to land on")]
    NotAtIsland,
    #[error("Something is already growing in your field")]
    FieldOccupied,
    #[error("Nothing is planted in your field")]
    FieldEmpty,
    #[error("The crops need {remaining} more day(s) to grow")]
    CropNotReady { remaining: u32 },
    #[error("You can't do that right now")]
    WrongMode,
    #[error("The game is over")]
    GameOver,
}

/// Choices available while standing on an island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AshoreAction {
    Wait,
    BuyGoods { good: TradeGood, quantity: u32 },
    BuyWeapon { weapon: Weapon },
    HireCrew { count: u32 },
    BuyShip { class: ShipClass },
    RepairShip,
    SetSail,
    BookPassage { ship: Uuid },
    /// Buy the ship's selling good
    TradeBuy { ship: Uuid, quantity: u32 },
    /// Sell the ship's buying good
    TradeSell { ship: Uuid, quantity: u32 },
    Store { item: Item, quantity: u32 },
    Retrieve { item: Item, quantity: u32 },
    Plant,
    Harvest,
    ExploreRuins,
    SignalForPassage,
}

/// Choices while steering the player's own ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeaAction {
    Sail(Direction),
    Wait,
    Repair,
    Disembark,
}

/// Choices while riding a trade ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitchedAction {
    Wait,
}

/// Result of a successful action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub messages: Vec<String>,
    /// True when the action used up the day; the world ticks before the next choice
    pub day_passed: bool,
}

impl Outcome {
    pub fn instant(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            day_passed: false,
        }
    }

    pub fn day(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            day_passed: true,
        }
    }

    pub fn with(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}
