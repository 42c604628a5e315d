//! StatSource - Trait and implementations for stat providers

mod base_stats;
mod gear;
mod prestige;
mod set_bonus;
mod talents;

pub use base_stats::BaseStatsSource;
pub use gear::GearSource;
pub use prestige::PrestigeSource;
pub use set_bonus::SetBonusSource;
pub use talents::TalentSource;

use crate::stat_block::StatAccumulator;

/// Anything that contributes stats to a hero
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Suggested priorities:
    /// - Base stats: -100
    /// - Gear: 0
    /// - Set bonuses: 50
    /// - Talents: 100
    /// - Prestige: 150
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
