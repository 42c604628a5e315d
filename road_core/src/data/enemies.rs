//! Enemy and drop table definitions

use super::StatMap;
use crate::types::{AbilityId, DropTableId, EnemyId, ItemId, Rarity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct EnemiesFile {
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub drop_tables: Vec<DropTable>,
}

/// Enemy template; stats are final values at mile 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: EnemyId,
    pub name: String,
    #[serde(default)]
    pub stats: StatMap,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    #[serde(default)]
    pub drop_table: Option<DropTableId>,
    #[serde(default)]
    pub experience: u64,
}

/// Independent drop rolls plus a gold range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropTable {
    pub id: DropTableId,
    #[serde(default)]
    pub gold_min: u64,
    #[serde(default)]
    pub gold_max: u64,
    #[serde(default)]
    pub entries: Vec<DropEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropEntry {
    pub item: ItemId,
    /// Probability in [0, 1]
    pub chance: f64,
    /// Overrides the item's own rarity for this drop
    #[serde(default)]
    pub quality: Option<Rarity>,
}
