use crate::catalog::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("you only have {held} {item}, not {wanted}")]
    Insufficient { item: Item, held: u32, wanted: u32 },
}

/// Counted items.
///
/// Counts are never zero: an entry disappears as soon as its last unit is
/// removed, and zero-count pairs are dropped when loading a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(Item, u32)>", into = "Vec<(Item, u32)>")]
pub struct Inventory {
    items: BTreeMap<Item, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl Into<Item>, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.items.entry(item.into()).or_insert(0) += amount;
    }

    pub fn remove(&mut self, item: impl Into<Item>, amount: u32) -> Result<(), InventoryError> {
        let item = item.into();
        let held = self.count(item);
        if amount > held {
            return Err(InventoryError::Insufficient {
                item,
                held,
                wanted: amount,
            });
        }

        if amount == held {
            self.items.remove(&item);
        } else if let Some(count) = self.items.get_mut(&item) {
            *count -= amount;
        }
        Ok(())
    }

    pub fn count(&self, item: impl Into<Item>) -> u32 {
        self.items.get(&item.into()).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: impl Into<Item>) -> bool {
        self.count(item) > 0
    }

    /// Number of units across all entries
    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Item, u32)> + '_ {
        self.items.iter().map(|(item, count)| (*item, *count))
    }
}

impl From<Vec<(Item, u32)>> for Inventory {
    fn from(entries: Vec<(Item, u32)>) -> Self {
        let mut inventory = Inventory::new();
        for (item, count) in entries {
            inventory.add(item, count);
        }
        inventory
    }
}

impl From<Inventory> for Vec<(Item, u32)> {
    fn from(inventory: Inventory) -> Self {
        inventory.items.into_iter().collect()
    }
}
