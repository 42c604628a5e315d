//! TalentSource - Stats from allocated talent ranks

use crate::data::DataTables;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{TalentId, TreeId};
use std::collections::BTreeMap;
use tracing::warn;

/// Applies `rank × per-rank effect` for every allocated talent
pub struct TalentSource<'a> {
    talents: &'a BTreeMap<TreeId, BTreeMap<TalentId, u32>>,
    tables: &'a DataTables,
}

impl<'a> TalentSource<'a> {
    pub fn new(talents: &'a BTreeMap<TreeId, BTreeMap<TalentId, u32>>, tables: &'a DataTables) -> Self {
        TalentSource { talents, tables }
    }
}

impl StatSource for TalentSource<'_> {
    fn id(&self) -> &str {
        "talents"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for (tree, ranks) in self.talents {
            for (talent_id, rank) in ranks {
                let Some(talent) = self.tables.talent(tree, talent_id) else {
                    warn!(%tree, talent = %talent_id, "allocated talent missing from tables; skipped");
                    continue;
                };
                for effect in &talent.effects {
                    stats.apply_modifier_def(effect, *rank as f64, talent.id.as_str());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatKind;

    #[test]
    fn test_rank_multiplies_effect() {
        let tables = DataTables::builtin().unwrap();
        let mut talents: BTreeMap<TreeId, BTreeMap<TalentId, u32>> = BTreeMap::new();
        talents
            .entry("protection".into())
            .or_default()
            .insert("toughness".into(), 3);
        talents
            .entry("arms".into())
            .or_default()
            .insert("weapon_mastery".into(), 2);

        let mut acc = StatAccumulator::new();
        TalentSource::new(&talents, &tables).apply(&mut acc);
        // 3 ranks of +2 stamina
        assert!((acc.compute(StatKind::Stamina) - 6.0).abs() < f64::EPSILON);
        // 2 ranks of 2% increased attack
        let attack = acc.stat(StatKind::Attack).unwrap();
        assert!((attack.increased - 0.04).abs() < 1e-9);
    }
}
