//! BaseStatsSource - Class attributes and per-level growth

use crate::data::{stat_kind_or_warn, ClassDef};
use crate::hero::Hero;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;

/// Level-1 attributes plus `growth × (level - 1)`
///
/// The only place where level affects stats.
pub struct BaseStatsSource<'a> {
    hero: &'a Hero,
    class: Option<&'a ClassDef>,
}

impl<'a> BaseStatsSource<'a> {
    pub fn new(hero: &'a Hero, class: Option<&'a ClassDef>) -> Self {
        BaseStatsSource { hero, class }
    }
}

impl StatSource for BaseStatsSource<'_> {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for (kind, value) in &self.hero.base_stats {
            stats.add_base(*kind, *value);
        }

        let Some(class) = self.class else {
            return;
        };
        let levels = self.hero.level.saturating_sub(1) as f64;
        for (key, per_level) in &class.growth {
            if let Some(kind) = stat_kind_or_warn(key, class.id.as_str()) {
                stats.add_base(kind, per_level.max(0.0) * levels);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataTables;
    use crate::hero::HeroFactory;
    use crate::types::StatKind;
    use std::sync::Arc;

    #[test]
    fn test_base_stats_level_scaling() {
        let tables = Arc::new(DataTables::builtin().unwrap());
        let hero = HeroFactory::new(tables.clone())
            .create(&"warrior".into(), &"arms".into(), 10, "W")
            .unwrap();
        let source = BaseStatsSource::new(&hero, tables.class(&hero.class_id));
        let mut acc = StatAccumulator::new();
        source.apply(&mut acc);

        // 12 + 2 * 9
        assert!((acc.compute(StatKind::Stamina) - 30.0).abs() < 0.01);
        // 6 + 1 * 9
        assert!((acc.compute(StatKind::Agility) - 15.0).abs() < 0.01);
        // No growth entry for spirit
        assert!((acc.compute(StatKind::Spirit) - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_base_stats_priority() {
        let tables = DataTables::builtin().unwrap();
        let hero = HeroFactory::new(Arc::new(tables.clone()))
            .create(&"mage".into(), &"fire".into(), 1, "M")
            .unwrap();
        let source = BaseStatsSource::new(&hero, None);
        assert_eq!(source.priority(), -100);
    }
}
