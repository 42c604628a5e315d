//! Save / restore - versioned snapshots of every persisted field
//!
//! Only inputs are saved. Resolved stats, combat, status effects, cooldowns
//! and loot lying on the road are transient and rebuilt or dropped on load.

mod repository;

pub use repository::{FileSaveRepository, InMemorySaveRepository, SaveRepository};

use crate::achievements::Statistics;
use crate::economy::Economy;
use crate::hero::{GemStash, Hero};
use crate::loot::{Inventory, LootSettings};
use crate::prestige::PrestigeState;
use crate::types::HeroId;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Version written by this build
pub const CURRENT_SAVE_VERSION: u32 = 2;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Slot {slot} is out of range 1..={max}")]
    InvalidSlot { slot: u32, max: u32 },
    #[error("Slot {0} is empty")]
    EmptySlot(u32),
    #[error("Save repository lock was poisoned")]
    LockPoisoned,
    #[error("Save data rejected: {0}")]
    Invalid(String),
}

/// Everything that survives a save/load cycle
///
/// Each section defaults when missing, and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Saves written before versioning are treated as version 1
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub party: Vec<Hero>,
    #[serde(default = "first_hero_id")]
    pub next_hero_id: u32,
    #[serde(default)]
    pub world: WorldState,
    #[serde(default)]
    pub economy: Economy,
    #[serde(default)]
    pub inventory: Inventory,
    /// Loose gems and the next gem instance id
    #[serde(default)]
    pub gems: GemStash,
    #[serde(default)]
    pub prestige: PrestigeState,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub loot_settings: LootSettings,
    /// Current resource per hero
    #[serde(default)]
    pub resources: BTreeMap<HeroId, f64>,
}

fn legacy_version() -> u32 {
    1
}

fn first_hero_id() -> u32 {
    1
}

impl Default for SaveData {
    fn default() -> Self {
        SaveData {
            version: CURRENT_SAVE_VERSION,
            party: Vec::new(),
            next_hero_id: first_hero_id(),
            world: WorldState::default(),
            economy: Economy::default(),
            inventory: Inventory::default(),
            gems: GemStash::new(),
            prestige: PrestigeState::default(),
            statistics: Statistics::default(),
            loot_settings: LootSettings::default(),
            resources: BTreeMap::new(),
        }
    }
}

impl SaveData {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Bring an older save up to the current version
///
/// Newer versions are loaded as-is with a warning.
pub fn migrate(mut data: SaveData) -> SaveData {
    if data.version > CURRENT_SAVE_VERSION {
        warn!(
            version = data.version,
            current = CURRENT_SAVE_VERSION,
            "save is from a newer version; unknown fields ignored"
        );
        return data;
    }
    if data.version < 2 {
        // v1 had no lifetime statistics for distance
        data.statistics.record_mile(data.world.max_mile);
        data.version = 2;
    }
    data
}

/// Slot-numbered access to a repository
pub struct SaveManager {
    repository: Box<dyn SaveRepository>,
    max_slots: u32,
}

impl SaveManager {
    pub fn new(repository: Box<dyn SaveRepository>, max_slots: u32) -> Self {
        SaveManager {
            repository,
            max_slots,
        }
    }

    pub fn max_slots(&self) -> u32 {
        self.max_slots
    }

    fn check_slot(&self, slot: u32) -> Result<(), SaveError> {
        if slot == 0 || slot > self.max_slots {
            return Err(SaveError::InvalidSlot {
                slot,
                max: self.max_slots,
            });
        }
        Ok(())
    }

    pub fn save(&self, slot: u32, data: &SaveData) -> Result<(), SaveError> {
        self.check_slot(slot)?;
        self.repository.write(slot, data)?;
        info!(slot, heroes = data.party.len(), "game saved");
        Ok(())
    }

    pub fn load(&self, slot: u32) -> Result<SaveData, SaveError> {
        self.check_slot(slot)?;
        let data = self
            .repository
            .read(slot)?
            .ok_or(SaveError::EmptySlot(slot))?;
        info!(slot, version = data.version, "game loaded");
        Ok(migrate(data))
    }

    pub fn delete(&self, slot: u32) -> Result<(), SaveError> {
        self.check_slot(slot)?;
        self.repository.delete(slot)
    }

    /// Occupied slots within range
    pub fn slots(&self) -> Result<Vec<u32>, SaveError> {
        Ok(self
            .repository
            .slots()?
            .into_iter()
            .filter(|slot| (1..=self.max_slots).contains(slot))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_bounds() {
        let manager = SaveManager::new(Box::new(InMemorySaveRepository::new()), 3);
        let data = SaveData::default();
        assert!(matches!(
            manager.save(0, &data),
            Err(SaveError::InvalidSlot { slot: 0, max: 3 })
        ));
        assert!(matches!(
            manager.save(4, &data),
            Err(SaveError::InvalidSlot { slot: 4, max: 3 })
        ));
        manager.save(3, &data).unwrap();
        assert_eq!(manager.slots().unwrap(), vec![3]);
        assert!(matches!(manager.load(1), Err(SaveError::EmptySlot(1))));
    }

    #[test]
    fn test_unknown_fields_and_missing_sections() {
        let json = r#"{
            "version": 2,
            "economy": { "gold": 42, "gems_of_the_future": 7 },
            "weather": "rain"
        }"#;
        let data = SaveData::from_json(json).unwrap();
        assert_eq!(data.economy.gold, 42);
        assert!(data.party.is_empty());
        assert_eq!(data.next_hero_id, 1);
        assert_eq!(data.inventory.capacity(), 20);
        assert!(data.loot_settings.auto_pickup);
    }

    #[test]
    fn test_migrate_v1() {
        let json = r#"{ "version": 1, "world": { "current_mile": 4, "max_mile": 17 } }"#;
        let data = migrate(SaveData::from_json(json).unwrap());
        assert_eq!(data.version, 2);
        assert_eq!(data.statistics.highest_mile, 17);

        // No version field at all is the oldest format
        let data = migrate(SaveData::from_json("{}").unwrap());
        assert_eq!(data.version, 2);
    }

    #[test]
    fn test_newer_version_loads_unchanged() {
        let data = SaveData {
            version: 99,
            ..Default::default()
        };
        assert_eq!(migrate(data.clone()), data);
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let mut data = SaveData::default();
        data.world.distance_traveled = 0.1 + 0.2;
        data.resources.insert(HeroId(3), 1.0 / 3.0);
        let back = SaveData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(back, data);
    }
}
