use crate::action::ActionError;
use serde::{Deserialize, Serialize};
use shared::{Inventory, ShipClass, TradeGood, Weapon};

/// Below this hull strength the ship can't leave port or move
pub const MIN_SAILING_HULL: u32 = 10;
/// Hull restored by burning one Wood at sea
pub const WOOD_REPAIR: u32 = 15;

/// The player's own vessel. Class figures come from the catalog; only crew,
/// hull and mounted guns change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub class: ShipClass,
    pub crew: u32,
    pub hull: u32,
    /// Mounted ship weapons
    pub weapons: Inventory,
}

impl Ship {
    pub fn new(class: ShipClass) -> Self {
        Self {
            class,
            crew: 0,
            hull: class.stats().hull_max,
            weapons: Inventory::new(),
        }
    }

    pub fn crew_capacity(&self) -> u32 {
        self.class.stats().crew_max
    }

    pub fn speed(&self) -> u32 {
        self.class.stats().speed
    }

    pub fn hull_max(&self) -> u32 {
        self.class.stats().hull_max
    }

    pub fn cargo_capacity(&self) -> u32 {
        self.class.stats().cargo
    }

    /// Cargo taken up by mounted guns
    pub fn cargo_used(&self) -> u32 {
        self.weapons
            .iter()
            .filter_map(|(item, count)| match item {
                shared::Item::Weapon(w) => Some(w.stats().cargo_space * count),
                _ => None,
            })
            .sum()
    }

    pub fn cargo_free(&self) -> u32 {
        self.cargo_capacity().saturating_sub(self.cargo_used())
    }

    pub fn is_mobile(&self) -> bool {
        self.hull >= MIN_SAILING_HULL
    }

    /// Mount a ship weapon if there is cargo room for it
    pub fn mount(&mut self, weapon: Weapon) -> Result<(), ActionError> {
        let needed = weapon.stats().cargo_space;
        let free = self.cargo_free();
        if needed > free {
            return Err(ActionError::InsufficientCargo { needed, free });
        }
        self.weapons.add(weapon, 1);
        Ok(())
    }

    /// Burn one Wood from `stores` to patch the hull. Returns the new hull value.
    pub fn repair_at_sea(&mut self, stores: &mut Inventory) -> Result<u32, ActionError> {
        if self.hull >= self.hull_max() {
            return Err(ActionError::HullIntact);
        }
        stores.remove(TradeGood::Wood, 1)?;
        self.hull = (self.hull + WOOD_REPAIR).min(self.hull_max());
        Ok(self.hull)
    }
}
