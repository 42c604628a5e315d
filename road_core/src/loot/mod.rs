//! Loot - drop rolls, items lying on the road, and pickup

mod inventory;

pub use inventory::{Inventory, InventoryItem};

use crate::config::LootConstants;
use crate::data::{DataTables, DropTable};
use crate::types::{ItemId, LootInstanceId, Rarity};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LootError {
    #[error("Inventory is full ({0} slots)")]
    InventoryFull(usize),
    #[error("No inventory item at index {0}")]
    InvalidIndex(usize),
    #[error("No loot with id {0:?} on the road")]
    UnknownInstance(LootInstanceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootState {
    Spawned,
    /// Terminal
    PickedUp,
    /// Terminal
    Expired,
}

impl LootState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LootState::Spawned)
    }
}

/// An item dropped on the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootInstance {
    pub instance_id: LootInstanceId,
    pub item_id: ItemId,
    pub quality: Rarity,
    /// Mile the drop happened at
    pub position: f64,
    /// Simulation time of the drop, in seconds
    pub spawned_at: f64,
    pub state: LootState,
}

/// Where and when a drop happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootSource {
    pub position: f64,
    pub now: f64,
}

/// Player-facing loot preferences; persisted with the save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootSettings {
    #[serde(default)]
    pub rarity_filter: Rarity,
    #[serde(default = "default_auto_pickup")]
    pub auto_pickup: bool,
}

fn default_auto_pickup() -> bool {
    true
}

impl Default for LootSettings {
    fn default() -> Self {
        LootSettings {
            rarity_filter: Rarity::Common,
            auto_pickup: true,
        }
    }
}

impl From<&LootConstants> for LootSettings {
    fn from(constants: &LootConstants) -> Self {
        LootSettings {
            rarity_filter: constants.rarity_filter,
            auto_pickup: constants.auto_pickup,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LootEngine {
    tables: Arc<DataTables>,
    spawned: BTreeMap<LootInstanceId, LootInstance>,
    next_id: u64,
    settings: LootSettings,
    lifetime: f64,
}

impl LootEngine {
    pub fn new(tables: Arc<DataTables>) -> Self {
        let settings = LootSettings::from(&tables.constants.loot);
        let lifetime = tables.constants.loot.lifetime_seconds;
        LootEngine {
            tables,
            spawned: BTreeMap::new(),
            next_id: 1,
            settings,
            lifetime,
        }
    }

    /// Roll every entry of a drop table independently
    ///
    /// Entries with an invalid chance or an unknown item are skipped.
    pub fn spawn_loot(
        &mut self,
        source: &LootSource,
        table: &DropTable,
        rng: &mut impl Rng,
    ) -> Vec<LootInstance> {
        let mut dropped = Vec::new();
        for entry in &table.entries {
            if !(0.0..=1.0).contains(&entry.chance) {
                warn!(table = %table.id, item = %entry.item, chance = entry.chance, "drop chance outside [0, 1]; entry skipped");
                continue;
            }
            let Some(item) = self.tables.item(&entry.item) else {
                warn!(table = %table.id, item = %entry.item, "drop entry names unknown item; entry skipped");
                continue;
            };
            if rng.gen::<f64>() >= entry.chance {
                continue;
            }

            let instance = LootInstance {
                instance_id: LootInstanceId(self.next_id),
                item_id: item.id.clone(),
                quality: entry.quality.unwrap_or(item.rarity),
                position: source.position,
                spawned_at: source.now,
                state: LootState::Spawned,
            };
            self.next_id += 1;
            debug!(table = %table.id, item = %instance.item_id, quality = %instance.quality, "loot dropped");
            self.spawned.insert(instance.instance_id, instance.clone());
            dropped.push(instance);
        }
        dropped
    }

    /// Gold from a drop table's range
    pub fn roll_gold(&self, table: &DropTable, rng: &mut impl Rng) -> u64 {
        let (low, high) = if table.gold_min <= table.gold_max {
            (table.gold_min, table.gold_max)
        } else {
            (table.gold_max, table.gold_min)
        };
        rng.gen_range(low..=high)
    }

    /// Try to move a drop into the inventory
    ///
    /// A drop below the rarity filter is discarded and counts as handled.
    /// Returns false when the inventory is full or the drop is gone.
    pub fn pickup_loot(&mut self, instance_id: LootInstanceId, inventory: &mut Inventory) -> bool {
        let filter = self.settings.rarity_filter;
        let Some(instance) = self.spawned.get_mut(&instance_id) else {
            return false;
        };
        if instance.state.is_terminal() {
            return false;
        }
        if instance.quality < filter {
            instance.state = LootState::Expired;
            debug!(item = %instance.item_id, quality = %instance.quality, "loot below filter discarded");
            return true;
        }
        let item = InventoryItem {
            item_id: instance.item_id.clone(),
            quality: instance.quality,
        };
        if inventory.add(item).is_err() {
            return false;
        }
        instance.state = LootState::PickedUp;
        true
    }

    /// Try every drop still on the road; returns the ones handled
    pub fn pickup_all(&mut self, inventory: &mut Inventory) -> Vec<LootInstanceId> {
        let ids: Vec<LootInstanceId> = self
            .spawned
            .values()
            .filter(|l| l.state == LootState::Spawned)
            .map(|l| l.instance_id)
            .collect();
        ids.into_iter()
            .filter(|id| self.pickup_loot(*id, inventory))
            .collect()
    }

    /// Expire drops older than the lifetime and forget everything terminal
    pub fn expire_loot(&mut self, now: f64) -> Vec<LootInstanceId> {
        let mut expired = Vec::new();
        for instance in self.spawned.values_mut() {
            if instance.state == LootState::Spawned && now - instance.spawned_at >= self.lifetime {
                instance.state = LootState::Expired;
                expired.push(instance.instance_id);
            }
        }
        self.spawned.retain(|_, l| !l.state.is_terminal());
        expired
    }

    pub fn spawned(&self) -> impl Iterator<Item = &LootInstance> {
        self.spawned.values().filter(|l| l.state == LootState::Spawned)
    }

    pub fn get(&self, instance_id: LootInstanceId) -> Option<&LootInstance> {
        self.spawned.get(&instance_id)
    }

    pub fn set_filter(&mut self, rarity: Rarity) {
        self.settings.rarity_filter = rarity;
    }

    pub fn set_auto_pickup(&mut self, enabled: bool) {
        self.settings.auto_pickup = enabled;
    }

    pub fn settings(&self) -> &LootSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: LootSettings) {
        self.settings = settings;
    }

    /// Remove every drop from the road
    pub fn clear(&mut self) {
        self.spawned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DropEntry;
    use crate::types::DropTableId;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> LootEngine {
        LootEngine::new(Arc::new(DataTables::builtin().unwrap()))
    }

    fn table(entries: Vec<DropEntry>) -> DropTable {
        DropTable {
            id: DropTableId::from("test"),
            gold_min: 3,
            gold_max: 7,
            entries,
        }
    }

    fn entry(item: &str, chance: f64, quality: Option<Rarity>) -> DropEntry {
        DropEntry {
            item: item.into(),
            chance,
            quality,
        }
    }

    const HERE: LootSource = LootSource {
        position: 4.0,
        now: 10.0,
    };

    #[test]
    fn test_entries_roll_independently() {
        let mut engine = engine();
        let table = table(vec![
            entry("rusty_sword", 1.0, None),
            entry("leather_cap", 1.0, None),
            entry("cloth_robe", 0.0, None),
        ]);
        let drops = engine.spawn_loot(&HERE, &table, &mut StepRng::new(0, 0));
        assert_eq!(drops.len(), 2);
        assert!(drops.iter().all(|d| d.state == LootState::Spawned));
        assert!((drops[0].position - 4.0).abs() < f64::EPSILON);
        assert_ne!(drops[0].instance_id, drops[1].instance_id);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let mut engine = engine();
        let table = table(vec![
            entry("rusty_sword", 1.5, None),
            entry("rusty_sword", f64::NAN, None),
            entry("no_such_item", 1.0, None),
            entry("leather_cap", 1.0, None),
        ]);
        let drops = engine.spawn_loot(&HERE, &table, &mut StepRng::new(0, 0));
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].item_id, ItemId::from("leather_cap"));
    }

    #[test]
    fn test_quality_override() {
        let mut engine = engine();
        let table = table(vec![entry("band_of_vigor", 1.0, Some(Rarity::Legendary))]);
        let drops = engine.spawn_loot(&HERE, &table, &mut StepRng::new(0, 0));
        assert_eq!(drops[0].quality, Rarity::Legendary);
    }

    #[test]
    fn test_pickup_respects_filter_and_capacity() {
        let mut engine = engine();
        engine.set_filter(Rarity::Uncommon);
        let table = table(vec![
            entry("rusty_sword", 1.0, None),
            entry("iron_sword", 1.0, None),
            entry("band_of_vigor", 1.0, None),
        ]);
        let drops = engine.spawn_loot(&HERE, &table, &mut StepRng::new(0, 0));
        let mut inventory = Inventory::new(1);

        // Common sword is filtered: discarded, but handled
        assert!(engine.pickup_loot(drops[0].instance_id, &mut inventory));
        assert_eq!(engine.get(drops[0].instance_id).unwrap().state, LootState::Expired);
        assert!(inventory.is_empty());

        assert!(engine.pickup_loot(drops[1].instance_id, &mut inventory));
        assert_eq!(inventory.len(), 1);

        // Full: nothing changes
        assert!(!engine.pickup_loot(drops[2].instance_id, &mut inventory));
        assert_eq!(engine.get(drops[2].instance_id).unwrap().state, LootState::Spawned);

        // Terminal states never go back
        assert!(!engine.pickup_loot(drops[1].instance_id, &mut inventory));
    }

    #[test]
    fn test_rare_filter_drops_common_pickup() {
        let mut engine = engine();
        engine.set_filter(Rarity::Rare);
        let table = table(vec![
            entry("rusty_sword", 1.0, Some(Rarity::Common)),
            entry("rusty_sword", 1.0, Some(Rarity::Rare)),
        ]);
        let drops = engine.spawn_loot(&HERE, &table, &mut StepRng::new(0, 0));
        let mut inventory = Inventory::new(10);

        assert!(engine.pickup_loot(drops[0].instance_id, &mut inventory));
        assert!(inventory.is_empty());

        assert!(engine.pickup_loot(drops[1].instance_id, &mut inventory));
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get(0).map(|item| item.quality), Some(Rarity::Rare));
    }

    #[test]
    fn test_expiry() {
        let mut engine = engine();
        let table = table(vec![entry("rusty_sword", 1.0, None), entry("leather_cap", 1.0, None)]);
        let drops = engine.spawn_loot(&HERE, &table, &mut StepRng::new(0, 0));
        let mut inventory = Inventory::new(5);
        engine.pickup_loot(drops[0].instance_id, &mut inventory);

        assert!(engine.expire_loot(HERE.now + 1.0).is_empty());
        // Picked-up instance is forgotten, the other is still there
        assert!(engine.get(drops[0].instance_id).is_none());
        assert_eq!(engine.spawned().count(), 1);

        let expired = engine.expire_loot(HERE.now + 30.0);
        assert_eq!(expired, vec![drops[1].instance_id]);
        assert_eq!(engine.spawned().count(), 0);
        assert!(!engine.pickup_loot(drops[1].instance_id, &mut inventory));
    }

    #[test]
    fn test_roll_gold_in_range() {
        let engine = engine();
        let table = table(Vec::new());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let gold = engine.roll_gold(&table, &mut rng);
            assert!((3..=7).contains(&gold));
        }
    }
}
