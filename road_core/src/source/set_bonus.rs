//! SetBonusSource - Bonuses for wearing several pieces of one set

use crate::data::DataTables;
use crate::hero::EquippedItem;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{EquipmentSlot, SetId};
use std::collections::BTreeMap;
use tracing::warn;

/// Every threshold tier reached adds its bonus exactly once
pub struct SetBonusSource<'a> {
    equipment: &'a BTreeMap<EquipmentSlot, EquippedItem>,
    tables: &'a DataTables,
}

impl<'a> SetBonusSource<'a> {
    pub fn new(equipment: &'a BTreeMap<EquipmentSlot, EquippedItem>, tables: &'a DataTables) -> Self {
        SetBonusSource { equipment, tables }
    }

    /// Equipped piece count per set
    pub fn piece_counts(&self) -> BTreeMap<SetId, u32> {
        let mut counts = BTreeMap::new();
        for equipped in self.equipment.values() {
            let set = self
                .tables
                .item(&equipped.item_id)
                .and_then(|item| item.set.clone());
            if let Some(set) = set {
                *counts.entry(set).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl StatSource for SetBonusSource<'_> {
    fn id(&self) -> &str {
        "set_bonus"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for (set_id, count) in self.piece_counts() {
            let Some(set) = self.tables.set(&set_id) else {
                continue;
            };
            for (key, bonus) in &set.bonuses {
                let Ok(threshold) = key.trim().parse::<u32>() else {
                    warn!(set = %set.id, key = %key, "set bonus key is not a piece count; skipped");
                    continue;
                };
                if count >= threshold {
                    stats.apply_stat_map(bonus, set.id.as_str());
                }
            }
        }
    }
}
