//! PrestigeSource - Permanent bonuses bought with prestige points

use crate::data::DataTables;
use crate::prestige::PrestigeState;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use tracing::warn;

pub struct PrestigeSource<'a> {
    state: &'a PrestigeState,
    tables: &'a DataTables,
}

impl<'a> PrestigeSource<'a> {
    pub fn new(state: &'a PrestigeState, tables: &'a DataTables) -> Self {
        PrestigeSource { state, tables }
    }
}

impl StatSource for PrestigeSource<'_> {
    fn id(&self) -> &str {
        "prestige"
    }

    fn priority(&self) -> i32 {
        150
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for (bonus_id, rank) in &self.state.bonuses {
            match self.tables.prestige_bonus(bonus_id) {
                Some(bonus) => stats.apply_modifier_def(&bonus.effect, *rank as f64, &bonus.id),
                None => warn!(bonus = %bonus_id, "purchased prestige bonus missing from tables; skipped"),
            }
        }
    }
}
