//! Equipment and skill gems
//!
//! Gems are unique instances. A loose gem lives in the [`GemStash`]; socketing
//! moves it out of the stash and unsocketing moves it back, so one instance
//! can never occupy two sockets.

use super::{EquippedItem, Hero, HeroError, SocketedGem};
use crate::data::DataTables;
use crate::types::{EquipmentSlot, GemId, GemInstanceId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Party-wide store of gems that are not in a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemStash {
    #[serde(default)]
    gems: BTreeMap<GemInstanceId, GemId>,
    #[serde(default = "first_instance_id")]
    next_instance_id: u64,
}

fn first_instance_id() -> u64 {
    1
}

impl Default for GemStash {
    fn default() -> Self {
        Self::new()
    }
}

impl GemStash {
    pub fn new() -> Self {
        GemStash {
            gems: BTreeMap::new(),
            next_instance_id: first_instance_id(),
        }
    }

    /// Mint a new gem instance into the stash
    pub fn add(&mut self, gem_id: GemId) -> GemInstanceId {
        let instance = GemInstanceId(self.next_instance_id.max(1));
        self.next_instance_id = instance.0 + 1;
        self.gems.insert(instance, gem_id);
        instance
    }

    pub fn get(&self, instance: GemInstanceId) -> Option<&GemId> {
        self.gems.get(&instance)
    }

    pub fn contains(&self, instance: GemInstanceId) -> bool {
        self.gems.contains_key(&instance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GemInstanceId, &GemId)> {
        self.gems.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }

    pub fn next_instance_id(&self) -> u64 {
        self.next_instance_id
    }

    /// Make sure minted ids start past `highest`
    pub fn reserve_past(&mut self, highest: GemInstanceId) {
        self.next_instance_id = self.next_instance_id.max(highest.0 + 1);
    }

    fn take(&mut self, instance: GemInstanceId) -> Option<GemId> {
        self.gems.remove(&instance)
    }

    fn put_back(&mut self, gem: SocketedGem) {
        self.gems.insert(gem.instance, gem.gem_id);
    }
}

/// Equip an item, returning whatever was in the slot before
///
/// Gems socketed in the replaced item go back to the stash.
pub fn equip(
    hero: &mut Hero,
    slot: EquipmentSlot,
    item_id: &ItemId,
    tables: &DataTables,
    stash: &mut GemStash,
) -> Result<Option<ItemId>, HeroError> {
    let item = tables
        .item(item_id)
        .ok_or_else(|| HeroError::UnknownItem(item_id.clone()))?;
    if item.is_consumable() {
        return Err(HeroError::NotEquipment(item_id.clone()));
    }
    if !item.slot.equipment_slots().contains(&slot) {
        return Err(HeroError::WrongSlot {
            item: item_id.clone(),
            slot,
        });
    }
    if !item.usable_by(&hero.class_id) {
        return Err(HeroError::ClassRestricted {
            item: item_id.clone(),
            class: hero.class_id.clone(),
        });
    }
    if hero.level < item.level {
        return Err(HeroError::LevelTooLow {
            required: item.level,
            level: hero.level,
        });
    }

    let previous = hero
        .equipment
        .insert(slot, EquippedItem::new(item_id.clone(), item.sockets))
        .map(|old| release(old, stash));
    debug!(hero = %hero.id, ?slot, item = %item_id, "equipped");
    Ok(previous)
}

pub fn unequip(
    hero: &mut Hero,
    slot: EquipmentSlot,
    stash: &mut GemStash,
) -> Result<ItemId, HeroError> {
    let old = hero
        .equipment
        .remove(&slot)
        .ok_or(HeroError::EmptySlot(slot))?;
    debug!(hero = %hero.id, ?slot, item = %old.item_id, "unequipped");
    Ok(release(old, stash))
}

/// Move a gem from the stash into an empty socket
pub fn socket_gem(
    hero: &mut Hero,
    slot: EquipmentSlot,
    socket_index: usize,
    instance: GemInstanceId,
    stash: &mut GemStash,
) -> Result<(), HeroError> {
    let equipped = hero
        .equipment
        .get_mut(&slot)
        .ok_or(HeroError::EmptySlot(slot))?;
    let sockets = equipped.sockets.len();
    let socket = equipped
        .sockets
        .get_mut(socket_index)
        .ok_or(HeroError::InvalidSocket {
            index: socket_index,
            sockets,
        })?;
    if socket.is_some() {
        return Err(HeroError::SocketOccupied(socket_index));
    }
    let gem_id = stash
        .take(instance)
        .ok_or(HeroError::GemNotAvailable(instance))?;
    *socket = Some(SocketedGem { instance, gem_id });
    Ok(())
}

/// Move a socketed gem back into the stash
pub fn unsocket_gem(
    hero: &mut Hero,
    slot: EquipmentSlot,
    socket_index: usize,
    stash: &mut GemStash,
) -> Result<GemInstanceId, HeroError> {
    let equipped = hero
        .equipment
        .get_mut(&slot)
        .ok_or(HeroError::EmptySlot(slot))?;
    let sockets = equipped.sockets.len();
    let socket = equipped
        .sockets
        .get_mut(socket_index)
        .ok_or(HeroError::InvalidSocket {
            index: socket_index,
            sockets,
        })?;
    let gem = socket.take().ok_or(HeroError::SocketEmpty(socket_index))?;
    let instance = gem.instance;
    stash.put_back(gem);
    Ok(instance)
}

fn release(item: EquippedItem, stash: &mut GemStash) -> ItemId {
    for gem in item.sockets.into_iter().flatten() {
        stash.put_back(gem);
    }
    item.item_id
}
