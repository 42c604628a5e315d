//! Item, equipment set and skill gem definitions

use super::StatMap;
use crate::types::{ClassId, GemId, ItemId, ItemSlot, Rarity, SetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ItemsFile {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub sets: Vec<EquipmentSetDef>,
    #[serde(default)]
    pub gems: Vec<GemDef>,
}

/// Immutable item definition, referenced by id everywhere else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub slot: ItemSlot,
    #[serde(default)]
    pub rarity: Rarity,
    /// Minimum hero level to equip
    #[serde(default = "default_item_level")]
    pub level: u32,
    #[serde(default)]
    pub stats: StatMap,
    /// Classes allowed to equip; `None` means everyone
    #[serde(default)]
    pub class_restriction: Option<Vec<ClassId>>,
    #[serde(default)]
    pub set: Option<SetId>,
    #[serde(default)]
    pub sockets: u32,
    /// Shop price in gold
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub use_effect: Option<UseEffect>,
}

impl ItemDef {
    pub fn usable_by(&self, class_id: &ClassId) -> bool {
        match &self.class_restriction {
            Some(classes) => classes.contains(class_id),
            None => true,
        }
    }

    pub fn is_consumable(&self) -> bool {
        self.slot == ItemSlot::Consumable
    }
}

fn default_item_level() -> u32 {
    1
}

/// What a consumable does when used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UseEffect {
    #[serde(default)]
    pub heal: f64,
    #[serde(default)]
    pub restore_resource: f64,
}

/// Named set of items with bonuses keyed by piece count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentSetDef {
    pub id: SetId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ItemId>,
    /// Piece-count threshold (written as a string key, e.g. "2") to bonus stats
    #[serde(default)]
    pub bonuses: BTreeMap<String, StatMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemDef {
    pub id: GemId,
    pub name: String,
    #[serde(default)]
    pub stats: StatMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_sets_and_gems() {
        let toml = r#"
[[items]]
id = "warlord_helm"
name = "Warlord's Helm"
slot = "head"
rarity = "rare"
level = 5
set = "warlord"
sockets = 1
class_restriction = ["warrior"]

[items.stats]
stamina = 6

[[items]]
id = "minor_potion"
name = "Minor Potion"
slot = "consumable"
value = 10
use_effect = { heal = 40 }

[[sets]]
id = "warlord"
name = "Warlord's Battlegear"
items = ["warlord_helm", "warlord_chest"]

[sets.bonuses."2"]
attack = 10

[[gems]]
id = "ruby"
name = "Ruby"
stats = { strength = 4 }
"#;
        let file: ItemsFile = toml::from_str(toml).unwrap();
        let helm = &file.items[0];
        assert_eq!(helm.rarity, Rarity::Rare);
        assert!(helm.usable_by(&"warrior".into()));
        assert!(!helm.usable_by(&"mage".into()));
        assert_eq!(helm.set, Some(SetId::from("warlord")));

        let potion = &file.items[1];
        assert!(potion.is_consumable());
        assert_eq!(potion.level, 1);
        assert!((potion.use_effect.as_ref().unwrap().heal - 40.0).abs() < f64::EPSILON);

        let set = &file.sets[0];
        assert!((set.bonuses["2"]["attack"] - 10.0).abs() < f64::EPSILON);
        assert!((file.gems[0].stats["strength"] - 4.0).abs() < f64::EPSILON);
    }
}
