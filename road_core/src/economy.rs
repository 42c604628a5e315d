//! Economy - gold, the shop and consumables

use crate::data::{DataTables, UseEffect};
use crate::loot::{Inventory, InventoryItem, LootError};
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    #[error("Not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u64, available: u64 },
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),
    #[error("Item {0} is not sold")]
    NotForSale(ItemId),
    #[error("Item {0} is not a consumable")]
    NotConsumable(ItemId),
    #[error(transparent)]
    Inventory(#[from] LootError),
}

/// The party's purse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    #[serde(default)]
    pub gold: u64,
}

impl Economy {
    pub fn new(gold: u64) -> Self {
        Economy { gold }
    }

    pub fn earn(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn spend(&mut self, amount: u64) -> Result<(), EconomyError> {
        if amount > self.gold {
            return Err(EconomyError::InsufficientGold {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    /// Pay an item's value and put it in the inventory
    pub fn buy_item(
        &mut self,
        item_id: &ItemId,
        inventory: &mut Inventory,
        tables: &DataTables,
    ) -> Result<(), EconomyError> {
        let item = tables
            .item(item_id)
            .ok_or_else(|| EconomyError::UnknownItem(item_id.clone()))?;
        if item.value == 0 {
            return Err(EconomyError::NotForSale(item_id.clone()));
        }
        if inventory.is_full() {
            return Err(LootError::InventoryFull(inventory.capacity()).into());
        }
        self.spend(item.value)?;
        inventory.add(InventoryItem {
            item_id: item.id.clone(),
            quality: item.rarity,
        })?;
        debug!(item = %item_id, price = item.value, gold = self.gold, "item bought");
        Ok(())
    }

    /// Sell the inventory item at `index` for `value * sell_ratio`, rounded down
    pub fn sell_item(
        &mut self,
        index: usize,
        inventory: &mut Inventory,
        tables: &DataTables,
    ) -> Result<u64, EconomyError> {
        let sold = inventory.remove(index)?;
        let price = match tables.item(&sold.item_id) {
            Some(item) => {
                let ratio = tables.constants.economy.sell_ratio.clamp(0.0, 1.0);
                (item.value as f64 * ratio).floor() as u64
            }
            None => {
                warn!(item = %sold.item_id, "sold item missing from tables; no gold paid");
                0
            }
        };
        self.earn(price);
        debug!(item = %sold.item_id, price, gold = self.gold, "item sold");
        Ok(price)
    }
}

/// Remove a consumable from the inventory and return what it does
///
/// The inventory is untouched unless the item really is a consumable.
pub fn take_consumable(
    index: usize,
    inventory: &mut Inventory,
    tables: &DataTables,
) -> Result<(ItemId, UseEffect), EconomyError> {
    let entry = inventory.get(index).ok_or(LootError::InvalidIndex(index))?;
    let item = tables
        .item(&entry.item_id)
        .ok_or_else(|| EconomyError::UnknownItem(entry.item_id.clone()))?;
    let effect = match (&item.use_effect, item.is_consumable()) {
        (Some(effect), true) => effect.clone(),
        _ => return Err(EconomyError::NotConsumable(item.id.clone())),
    };
    let item_id = item.id.clone();
    inventory.remove(index)?;
    Ok((item_id, effect))
}
