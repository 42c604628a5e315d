//! Inventory - bounded list of carried items

use super::LootError;
use crate::types::{ItemId, Rarity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: ItemId,
    #[serde(default)]
    pub quality: Rarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    items: Vec<InventoryItem>,
    #[serde(default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    20
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::new(default_capacity())
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Inventory {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn add(&mut self, item: InventoryItem) -> Result<(), LootError> {
        if self.is_full() {
            return Err(LootError::InventoryFull(self.capacity));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<InventoryItem, LootError> {
        if index >= self.items.len() {
            return Err(LootError::InvalidIndex(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&InventoryItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking below the current count keeps every item but blocks new ones
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> InventoryItem {
        InventoryItem {
            item_id: "rusty_sword".into(),
            quality: Rarity::Common,
        }
    }

    #[test]
    fn test_add_until_full() {
        let mut inventory = Inventory::new(2);
        inventory.add(sword()).unwrap();
        inventory.add(sword()).unwrap();
        assert_eq!(inventory.add(sword()), Err(LootError::InventoryFull(2)));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_shrink_keeps_items() {
        let mut inventory = Inventory::new(3);
        for _ in 0..3 {
            inventory.add(sword()).unwrap();
        }
        inventory.set_capacity(1);
        assert_eq!(inventory.len(), 3);
        assert!(inventory.add(sword()).is_err());

        inventory.remove(0).unwrap();
        inventory.remove(0).unwrap();
        assert!(inventory.add(sword()).is_err());
        inventory.remove(0).unwrap();
        assert!(inventory.add(sword()).is_ok());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut inventory = Inventory::new(3);
        assert_eq!(inventory.remove(0), Err(LootError::InvalidIndex(0)));
    }
}
