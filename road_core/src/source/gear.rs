//! GearSource - Stats from equipped items and their socketed gems

use crate::data::DataTables;
use crate::hero::EquippedItem;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::EquipmentSlot;
use std::collections::BTreeMap;
use tracing::warn;

pub struct GearSource<'a> {
    equipment: &'a BTreeMap<EquipmentSlot, EquippedItem>,
    tables: &'a DataTables,
}

impl<'a> GearSource<'a> {
    pub fn new(equipment: &'a BTreeMap<EquipmentSlot, EquippedItem>, tables: &'a DataTables) -> Self {
        GearSource { equipment, tables }
    }
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        "gear"
    }

    fn priority(&self) -> i32 {
        0 // Gear applies at default priority
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for (slot, equipped) in self.equipment {
            match self.tables.item(&equipped.item_id) {
                Some(item) => stats.apply_stat_map(&item.stats, item.id.as_str()),
                None => {
                    warn!(?slot, item = %equipped.item_id, "equipped item missing from tables; skipped");
                    continue;
                }
            }

            for gem in equipped.socketed_gems() {
                match self.tables.gem(&gem.gem_id) {
                    Some(def) => stats.apply_stat_map(&def.stats, def.id.as_str()),
                    None => warn!(gem = %gem.gem_id, "socketed gem missing from tables; skipped"),
                }
            }
        }
    }
}
