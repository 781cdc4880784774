use crate::action::ActionError;
use crate::island::IslandId;
use crate::ship::Ship;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::catalog::{self, CHARM_GROWTH_REDUCTION, MEDALLION_STRENGTH_BOOST};
use shared::{Inventory, Relic};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub health: u32,
    pub intelligence: u32,
    pub charisma: u32,
    pub strength: u32,
    pub dexterity: u32,
    pub psyche: u32,
}

impl Stats {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            health: rng.gen_range(5..=10),
            intelligence: rng.gen_range(1..=10),
            charisma: rng.gen_range(1..=10),
            strength: rng.gen_range(1..=10),
            dexterity: rng.gen_range(1..=10),
            psyche: rng.gen_range(1..=10),
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Health {}, Intelligence {}, Charisma {}, Strength {}, Dexterity {}, Psyche {}",
            self.health, self.intelligence, self.charisma, self.strength, self.dexterity, self.psyche
        )
    }
}

/// Crop planted on the home field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub planted_on: u32,
}

/// The player's house: private storage and a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub island: IslandId,
    pub town: usize,
    pub storage: Inventory,
    pub field: Option<Crop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub species: String,
    pub stats: Stats,
    pub gold: u32,
    pub inventory: Inventory,
    pub ship: Option<Ship>,
    pub home: Home,
    pub starting_relic: Relic,
    /// Days shaved off every crop
    pub growth_bonus: u32,
}

impl Player {
    /// Roll a new character living in the given town. The starting relic is
    /// already applied.
    pub fn new<R: Rng + ?Sized>(
        name: String,
        gold: u32,
        home_island: IslandId,
        home_town: usize,
        rng: &mut R,
    ) -> Self {
        let starting_relic = Relic::random(rng);
        let mut player = Self {
            name,
            species: catalog::pick(catalog::ANIMAL_SPECIES, rng).to_string(),
            stats: Stats::roll(rng),
            gold,
            inventory: Inventory::new(),
            ship: None,
            home: Home {
                island: home_island,
                town: home_town,
                storage: Inventory::new(),
                field: None,
            },
            starting_relic,
            growth_bonus: 0,
        };
        player.apply_relic(starting_relic);
        player
    }

    /// Grant a relic's power and describe what changed
    pub fn apply_relic(&mut self, relic: Relic) -> String {
        match relic {
            Relic::WarriorsMedallion => {
                self.stats.strength += MEDALLION_STRENGTH_BOOST;
                format!(
                    "The {} increases your Strength by {}!",
                    relic, MEDALLION_STRENGTH_BOOST
                )
            }
            Relic::FertileEarthCharm => {
                self.growth_bonus = CHARM_GROWTH_REDUCTION;
                format!(
                    "The {} will make your crops grow {} days faster!",
                    relic, CHARM_GROWTH_REDUCTION
                )
            }
            Relic::AncientWarriorsWeapon { damage, kind } => {
                self.inventory.add(relic, 1);
                format!("The {} has {} damage as a {} weapon!", relic, damage, kind)
            }
        }
    }

    /// Strength and Dexterity plus every carried personal weapon's bonus
    pub fn combat_score(&self) -> u32 {
        let weapons: u32 = self
            .inventory
            .iter()
            .filter_map(|(item, count)| Some(count * item.personal_damage()?.saturating_sub(1)))
            .sum();
        self.stats.strength + self.stats.dexterity + weapons
    }

    pub fn spend(&mut self, amount: u32) -> Result<(), ActionError> {
        if amount > self.gold {
            return Err(ActionError::InsufficientGold {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }
}
