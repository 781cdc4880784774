//! Static tables for everything that can be bought, sold, found or named.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLIMATES: &[&str] = &["Tropical", "Temperate", "Mediterranean", "Arctic", "Subtropical"];

pub const BIOTOPES: &[&str] = &[
    "Forest",
    "Mountains",
    "Rivers",
    "Lakes",
    "Grasslands",
    "Jungle",
    "Beaches",
    "Cliffs",
    "Caves",
    "Wetlands",
];

pub const ISLAND_PREFIXES: &[&str] = &["Shadow", "Mystic", "Thunder", "Crystal", "Emerald", "Golden", "Silver"];
pub const ISLAND_SUFFIXES: &[&str] = &["Isle", "Island", "Haven", "Bay", "Cove", "Shores", "Point"];

pub const TOWN_PREFIXES: &[&str] = &["Port", "New", "Old", "East", "West", "North", "South", "Fort", "Bay"];
pub const TOWN_SUFFIXES: &[&str] = &["Harbor", "Town", "Village", "Port", "Settlement", "Market", "Haven", "Landing"];

pub const RUIN_KINDS: &[&str] = &[
    "Temple",
    "Fortress",
    "Palace",
    "Pyramid",
    "Monastery",
    "Amphitheater",
    "Catacombs",
    "Lighthouse",
    "Observatory",
];

pub const ANIMAL_SPECIES: &[&str] = &[
    "Fox", "Wolf", "Bear", "Raccoon", "Rabbit", "Deer", "Otter", "Badger", "Squirrel", "Owl", "Cat", "Dog",
];

/// Pick one entry from a name pool
pub fn pick<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or("Nameless")
}

/// Bulk goods traded at markets and aboard trade ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeGood {
    Food,
    Seeds,
    Spices,
    Cloth,
    Rum,
    Wood,
    Iron,
    Gold,
}

impl TradeGood {
    pub const ALL: [TradeGood; 8] = [
        TradeGood::Food,
        TradeGood::Seeds,
        TradeGood::Spices,
        TradeGood::Cloth,
        TradeGood::Rum,
        TradeGood::Wood,
        TradeGood::Iron,
        TradeGood::Gold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TradeGood::Food => "Food",
            TradeGood::Seeds => "Seeds",
            TradeGood::Spices => "Spices",
            TradeGood::Cloth => "Cloth",
            TradeGood::Rum => "Rum",
            TradeGood::Wood => "Wood",
            TradeGood::Iron => "Iron",
            TradeGood::Gold => "Gold",
        }
    }

    /// Market price in gold
    pub fn price(self) -> u32 {
        match self {
            TradeGood::Food => 50,
            TradeGood::Seeds => 30,
            TradeGood::Spices => 100,
            TradeGood::Cloth => 80,
            TradeGood::Rum => 120,
            TradeGood::Wood => 60,
            TradeGood::Iron => 90,
            TradeGood::Gold => 150,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// A random good other than `excluded`
    pub fn random_except<R: Rng + ?Sized>(excluded: TradeGood, rng: &mut R) -> Self {
        let others: Vec<TradeGood> = Self::ALL.iter().copied().filter(|g| *g != excluded).collect();
        others[rng.gen_range(0..others.len())]
    }
}

impl fmt::Display for TradeGood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a weapon is wielded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Melee,
    Ranged,
    /// Mounted on the player's ship, takes cargo space
    Ship,
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeaponKind::Melee => "melee",
            WeaponKind::Ranged => "ranged",
            WeaponKind::Ship => "ship",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponStats {
    pub price: u32,
    pub damage: u32,
    pub kind: WeaponKind,
    pub cargo_space: u32,
}

/// Weapons sold at the smithy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weapon {
    Cutlass,
    Pistol,
    Musket,
    BoardingAxe,
    Cannon,
    SwivelGun,
}

impl Weapon {
    pub const ALL: [Weapon; 6] = [
        Weapon::Cutlass,
        Weapon::Pistol,
        Weapon::Musket,
        Weapon::BoardingAxe,
        Weapon::Cannon,
        Weapon::SwivelGun,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weapon::Cutlass => "Cutlass",
            Weapon::Pistol => "Pistol",
            Weapon::Musket => "Musket",
            Weapon::BoardingAxe => "Boarding Axe",
            Weapon::Cannon => "Cannon",
            Weapon::SwivelGun => "Swivel Gun",
        }
    }

    pub fn stats(self) -> WeaponStats {
        let (price, damage, kind, cargo_space) = match self {
            Weapon::Cutlass => (200, 3, WeaponKind::Melee, 0),
            Weapon::Pistol => (300, 4, WeaponKind::Ranged, 0),
            Weapon::Musket => (400, 5, WeaponKind::Ranged, 0),
            Weapon::BoardingAxe => (150, 2, WeaponKind::Melee, 0),
            Weapon::Cannon => (500, 8, WeaponKind::Ship, 2),
            Weapon::SwivelGun => (250, 4, WeaponKind::Ship, 1),
        };
        WeaponStats {
            price,
            damage,
            kind,
            cargo_space,
        }
    }

    pub fn is_ship_weapon(self) -> bool {
        self.stats().kind == WeaponKind::Ship
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stats shared by player-owned ships and trade ships of the same class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipStats {
    pub price: u32,
    pub crew_max: u32,
    /// Grid cells per day
    pub speed: u32,
    /// Barrels of cargo
    pub cargo: u32,
    pub hull_max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    Sloop,
    Brigantine,
    Galleon,
}

impl ShipClass {
    pub const ALL: [ShipClass; 3] = [ShipClass::Sloop, ShipClass::Brigantine, ShipClass::Galleon];

    pub fn name(self) -> &'static str {
        match self {
            ShipClass::Sloop => "Sloop",
            ShipClass::Brigantine => "Brigantine",
            ShipClass::Galleon => "Galleon",
        }
    }

    /// Single-letter map glyph
    pub fn glyph(self) -> char {
        match self {
            ShipClass::Sloop => 'S',
            ShipClass::Brigantine => 'B',
            ShipClass::Galleon => 'G',
        }
    }

    pub fn stats(self) -> ShipStats {
        match self {
            // Fast but small
            ShipClass::Sloop => ShipStats {
                price: 1000,
                crew_max: 10,
                speed: 3,
                cargo: 5,
                hull_max: 60,
            },
            ShipClass::Brigantine => ShipStats {
                price: 2000,
                crew_max: 15,
                speed: 2,
                cargo: 8,
                hull_max: 100,
            },
            // Slow but large
            ShipClass::Galleon => ShipStats {
                price: 3000,
                crew_max: 25,
                speed: 1,
                cargo: 12,
                hull_max: 150,
            },
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ancient objects with lasting effects on their owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relic {
    /// Raises Strength by 2
    WarriorsMedallion,
    /// Crops ripen 2 days sooner
    FertileEarthCharm,
    /// A personal weapon of rolled strength
    AncientWarriorsWeapon { damage: u32, kind: RelicWeaponKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelicWeaponKind {
    Melee,
    Ranged,
}

impl fmt::Display for RelicWeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelicWeaponKind::Melee => "melee",
            RelicWeaponKind::Ranged => "ranged",
        })
    }
}

pub const MEDALLION_STRENGTH_BOOST: u32 = 2;
pub const CHARM_GROWTH_REDUCTION: u32 = 2;

impl Relic {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Relic::WarriorsMedallion,
            1 => Relic::FertileEarthCharm,
            _ => Relic::AncientWarriorsWeapon {
                damage: rng.gen_range(3..=7),
                kind: if rng.gen() {
                    RelicWeaponKind::Melee
                } else {
                    RelicWeaponKind::Ranged
                },
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Relic::WarriorsMedallion => "Warrior's Medallion",
            Relic::FertileEarthCharm => "Fertile Earth Charm",
            Relic::AncientWarriorsWeapon { .. } => "Ancient Warrior's Weapon",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Relic::WarriorsMedallion => "An ancient medallion pulsing with martial energy",
            Relic::FertileEarthCharm => "A mystical charm that resonates with natural energy",
            Relic::AncientWarriorsWeapon { .. } => "A perfectly preserved weapon of mysterious origin",
        }
    }
}

impl fmt::Display for Relic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Valuables waiting in unexplored ruins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Treasure {
    GoldenIdol,
    AncientCoins,
    JeweledCrown,
    SacredArtifact,
    RoyalScepter,
}

impl Treasure {
    pub const ALL: [Treasure; 5] = [
        Treasure::GoldenIdol,
        Treasure::AncientCoins,
        Treasure::JeweledCrown,
        Treasure::SacredArtifact,
        Treasure::RoyalScepter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Treasure::GoldenIdol => "Golden Idol",
            Treasure::AncientCoins => "Ancient Coins",
            Treasure::JeweledCrown => "Jeweled Crown",
            Treasure::SacredArtifact => "Sacred Artifact",
            Treasure::RoyalScepter => "Royal Scepter",
        }
    }

    /// Worth in gold, paid out when found
    pub fn value(self) -> u32 {
        match self {
            Treasure::GoldenIdol => 2000,
            Treasure::AncientCoins => 1500,
            Treasure::JeweledCrown => 3000,
            Treasure::SacredArtifact => 2500,
            Treasure::RoyalScepter => 1800,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Anything that can sit in an inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    Good(TradeGood),
    Weapon(Weapon),
    Relic(Relic),
}

impl Item {
    /// Damage for anything a person can fight with
    pub fn personal_damage(&self) -> Option<u32> {
        match self {
            Item::Weapon(w) if !w.is_ship_weapon() => Some(w.stats().damage),
            Item::Relic(Relic::AncientWarriorsWeapon { damage, .. }) => Some(*damage),
            _ => None,
        }
    }
}

impl From<TradeGood> for Item {
    fn from(good: TradeGood) -> Self {
        Item::Good(good)
    }
}

impl From<Weapon> for Item {
    fn from(weapon: Weapon) -> Self {
        Item::Weapon(weapon)
    }
}

impl From<Relic> for Item {
    fn from(relic: Relic) -> Self {
        Item::Relic(relic)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Good(g) => g.fmt(f),
            Item::Weapon(w) => w.fmt(f),
            Item::Relic(r) => r.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_except_never_returns_excluded() {
        let mut rng = StdRng::seed_from_u64(7);
        for good in TradeGood::ALL {
            for _ in 0..50 {
                assert_ne!(TradeGood::random_except(good, &mut rng), good);
            }
        }
    }

    #[test]
    fn test_ship_classes_trade_speed_for_size() {
        let sloop = ShipClass::Sloop.stats();
        let galleon = ShipClass::Galleon.stats();
        assert!(sloop.speed > galleon.speed);
        assert!(sloop.cargo < galleon.cargo);
        assert!(sloop.crew_max < galleon.crew_max);
    }

    #[test]
    fn test_only_cannons_and_swivels_take_cargo() {
        for weapon in Weapon::ALL {
            let stats = weapon.stats();
            assert_eq!(weapon.is_ship_weapon(), stats.cargo_space > 0);
        }
    }

    #[test]
    fn test_relic_weapon_damage_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            if let Relic::AncientWarriorsWeapon { damage, .. } = Relic::random(&mut rng) {
                assert!((3..=7).contains(&damage));
            }
        }
    }

    #[test]
    fn test_personal_damage_excludes_ship_weapons() {
        assert_eq!(Item::Weapon(Weapon::Pistol).personal_damage(), Some(4));
        assert_eq!(Item::Weapon(Weapon::Cannon).personal_damage(), None);
        assert_eq!(Item::Good(TradeGood::Rum).personal_damage(), None);
    }
}
