//! StatAccumulator and StatAggregator - Turning a hero's inputs into a StatBlock

use super::{StatBlock, StatValue};
use crate::config::DerivedStatConstants;
use crate::data::{stat_kind_or_warn, ClassDef, DataTables, StatMap, StatModifierDef};
use crate::hero::Hero;
use crate::prestige::PrestigeState;
use crate::source::{
    BaseStatsSource, GearSource, PrestigeSource, SetBonusSource, StatSource, TalentSource,
};
use crate::types::{ModifierKind, StatKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Accumulates stat modifications from every source before derivation
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    values: BTreeMap<StatKind, StatValue>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stat(&self, kind: StatKind) -> Option<&StatValue> {
        self.values.get(&kind)
    }

    pub fn stat_mut(&mut self, kind: StatKind) -> &mut StatValue {
        self.values.entry(kind).or_default()
    }

    pub fn add_base(&mut self, kind: StatKind, value: f64) {
        self.stat_mut(kind).base += value;
    }

    pub fn add_flat(&mut self, kind: StatKind, value: f64) {
        self.stat_mut(kind).add_flat(value);
    }

    /// Add a modifier; increased and more values are given in percent
    pub fn add_modifier(&mut self, kind: StatKind, modifier: ModifierKind, value: f64) {
        if !value.is_finite() {
            return;
        }
        let stat = self.stat_mut(kind);
        match modifier {
            ModifierKind::Flat => stat.add_flat(value),
            ModifierKind::Increased => stat.add_increased(value / 100.0),
            ModifierKind::More => stat.add_more(value / 100.0),
        }
    }

    /// Add every entry of a data-file stat map as flat, skipping unknown names
    pub fn apply_stat_map(&mut self, stats: &StatMap, context: &str) {
        for (key, value) in stats {
            if let Some(kind) = stat_kind_or_warn(key, context) {
                if value.is_finite() {
                    self.add_flat(kind, *value);
                }
            }
        }
    }

    /// Apply a data-file modifier `times` times
    pub fn apply_modifier_def(&mut self, modifier: &StatModifierDef, times: f64, context: &str) {
        if let Some(kind) = stat_kind_or_warn(&modifier.stat, context) {
            self.add_modifier(kind, modifier.kind, modifier.value * times);
        }
    }

    /// Final value of a stat with nothing derived underneath it
    pub fn compute(&self, kind: StatKind) -> f64 {
        self.values.get(&kind).map(StatValue::compute).unwrap_or(0.0)
    }

    /// Final value of a stat on top of a derived base
    fn compute_with_base(&self, kind: StatKind, derived: f64) -> f64 {
        let mut value = self.values.get(&kind).cloned().unwrap_or_default();
        value.base += derived;
        value.compute()
    }
}

/// Resolves a hero's effective stats from class, gear, sets, talents and prestige
///
/// Pure and deterministic: the same hero and prestige state always yield the
/// same block, and nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct StatAggregator {
    tables: Arc<DataTables>,
}

impl StatAggregator {
    pub fn new(tables: Arc<DataTables>) -> Self {
        StatAggregator { tables }
    }

    pub fn resolve(&self, hero: &Hero, prestige: &PrestigeState) -> StatBlock {
        let class = self.tables.class(&hero.class_id);
        if class.is_none() {
            warn!(hero = %hero.id, class = %hero.class_id, "hero has unknown class; using bare stats");
        }
        let acc = self.accumulate(hero, prestige);
        derive(&acc, class, &self.tables.constants.derived)
    }

    /// Run every source in priority order
    pub fn accumulate(&self, hero: &Hero, prestige: &PrestigeState) -> StatAccumulator {
        let tables = self.tables.as_ref();
        let mut sources: Vec<Box<dyn StatSource + '_>> = vec![
            Box::new(BaseStatsSource::new(hero, tables.class(&hero.class_id))),
            Box::new(GearSource::new(&hero.equipment, tables)),
            Box::new(SetBonusSource::new(&hero.equipment, tables)),
            Box::new(TalentSource::new(&hero.talents, tables)),
            Box::new(PrestigeSource::new(prestige, tables)),
        ];
        sources.sort_by_key(|source| source.priority());

        let mut acc = StatAccumulator::new();
        for source in &sources {
            source.apply(&mut acc);
        }
        acc
    }
}

/// Primaries first, then everything derived from them
fn derive(acc: &StatAccumulator, class: Option<&ClassDef>, k: &DerivedStatConstants) -> StatBlock {
    let mut block = StatBlock::default();
    for kind in StatKind::primaries() {
        block.set(*kind, acc.compute(*kind));
    }

    let primary = class
        .map(|c| block.get(c.primary_stat))
        .unwrap_or(block.strength);

    block.max_health = acc.compute_with_base(
        StatKind::MaxHealth,
        k.base_health + block.stamina * k.health_per_stamina,
    );
    block.attack = acc.compute_with_base(StatKind::Attack, primary * k.attack_per_primary);
    block.defense = acc.compute_with_base(StatKind::Defense, block.stamina * k.defense_per_stamina);
    block.crit_chance = acc.compute_with_base(
        StatKind::CritChance,
        k.base_crit_chance + block.agility * k.crit_per_agility,
    );
    block.hit_chance = acc.compute_with_base(StatKind::HitChance, k.base_hit_chance);
    block.evasion = acc.compute_with_base(StatKind::Evasion, block.agility * k.evasion_per_agility);
    block.attack_speed = acc.compute_with_base(StatKind::AttackSpeed, k.base_attack_speed);
    block.health_regen = acc.compute_with_base(
        StatKind::HealthRegen,
        block.spirit * k.health_regen_per_spirit,
    );

    let (resource_max, resource_regen) = match class {
        Some(c) => {
            let r = &c.resource;
            let regen = if r.passive_regen {
                r.regen_per_second + block.spirit * r.regen_per_spirit
            } else {
                0.0
            };
            (r.base_max + block.intellect * r.max_per_intellect, regen)
        }
        None => (0.0, 0.0),
    };
    block.max_resource = acc.compute_with_base(StatKind::MaxResource, resource_max);
    block.resource_regen = acc.compute_with_base(StatKind::ResourceRegen, resource_regen);

    block
}
