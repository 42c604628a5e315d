//! StatBlock - Resolved combat stats and the modifiers layered on top of them

mod aggregator;
mod stat_value;

pub use aggregator::{StatAccumulator, StatAggregator};
pub use stat_value::StatValue;

use crate::data::{stat_kind_or_warn, StatMap};
use crate::types::{ModifierKind, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Final stat values for one combatant
///
/// Heroes get theirs from [`StatAggregator::resolve`]; enemies are built
/// straight from their definition. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    // === Primary ===
    pub stamina: f64,
    pub strength: f64,
    pub agility: f64,
    pub intellect: f64,
    pub spirit: f64,

    // === Pools ===
    pub max_health: f64,
    pub max_resource: f64,

    // === Combat ===
    pub attack: f64,
    pub defense: f64,
    /// Percent, 0-100
    pub crit_chance: f64,
    /// Percent, 0-100
    pub hit_chance: f64,
    /// Percent subtracted from the attacker's hit chance
    pub evasion: f64,
    /// Swings per base attack interval
    pub attack_speed: f64,

    // === Recovery (per second) ===
    pub health_regen: f64,
    pub resource_regen: f64,
}

impl StatBlock {
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Stamina => self.stamina,
            StatKind::Strength => self.strength,
            StatKind::Agility => self.agility,
            StatKind::Intellect => self.intellect,
            StatKind::Spirit => self.spirit,
            StatKind::MaxHealth => self.max_health,
            StatKind::MaxResource => self.max_resource,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::CritChance => self.crit_chance,
            StatKind::HitChance => self.hit_chance,
            StatKind::Evasion => self.evasion,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::HealthRegen => self.health_regen,
            StatKind::ResourceRegen => self.resource_regen,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: f64) {
        let slot = match kind {
            StatKind::Stamina => &mut self.stamina,
            StatKind::Strength => &mut self.strength,
            StatKind::Agility => &mut self.agility,
            StatKind::Intellect => &mut self.intellect,
            StatKind::Spirit => &mut self.spirit,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::MaxResource => &mut self.max_resource,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::CritChance => &mut self.crit_chance,
            StatKind::HitChance => &mut self.hit_chance,
            StatKind::Evasion => &mut self.evasion,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::HealthRegen => &mut self.health_regen,
            StatKind::ResourceRegen => &mut self.resource_regen,
        };
        *slot = value;
    }

    /// Field-wise addition
    pub fn merge(&mut self, other: &StatBlock) {
        for kind in StatKind::iter() {
            self.set(kind, self.get(kind) + other.get(kind));
        }
    }

    /// Copy of this block with modifiers layered on every stat
    pub fn apply_modifiers(&self, mods: &StatModifiers) -> StatBlock {
        let mut out = *self;
        for kind in StatKind::iter() {
            let mut value = StatValue::with_base(self.get(kind));
            value.add_flat(mods.flat(kind));
            value.add_increased(mods.increased(kind));
            for more in mods.more(kind) {
                value.add_more(*more);
            }
            out.set(kind, value.compute());
        }
        out
    }

    /// Every field is a finite number
    pub fn is_valid(&self) -> bool {
        StatKind::iter().all(|kind| self.get(kind).is_finite())
    }

    /// Build a block from a data-file stat map; unknown keys are warned and skipped
    pub fn from_stat_map(stats: &StatMap, context: &str) -> StatBlock {
        let mut block = StatBlock::default();
        for (key, value) in stats {
            if let Some(kind) = stat_kind_or_warn(key, context) {
                block.set(kind, block.get(kind) + value);
            }
        }
        block
    }
}

/// Modifiers from timed effects, talents or bonuses, keyed by stat
///
/// Increased and more values are stored as decimals (0.10 = 10%).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatModifiers {
    flat: BTreeMap<StatKind, f64>,
    increased: BTreeMap<StatKind, f64>,
    more: BTreeMap<StatKind, Vec<f64>>,
}

impl StatModifiers {
    /// Add a modifier as written in data: flat values as-is, percentages as percent
    pub fn add(&mut self, kind: StatKind, modifier: ModifierKind, value: f64) {
        if !value.is_finite() {
            return;
        }
        match modifier {
            ModifierKind::Flat => *self.flat.entry(kind).or_default() += value,
            ModifierKind::Increased => *self.increased.entry(kind).or_default() += value / 100.0,
            ModifierKind::More => self.more.entry(kind).or_default().push(value / 100.0),
        }
    }

    pub fn flat(&self, kind: StatKind) -> f64 {
        self.flat.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn increased(&self, kind: StatKind) -> f64 {
        self.increased.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn more(&self, kind: StatKind) -> &[f64] {
        self.more.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn merge(&mut self, other: &StatModifiers) {
        for (kind, value) in &other.flat {
            *self.flat.entry(*kind).or_default() += value;
        }
        for (kind, value) in &other.increased {
            *self.increased.entry(*kind).or_default() += value;
        }
        for (kind, values) in &other.more {
            self.more.entry(*kind).or_default().extend(values.iter().copied());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.increased.is_empty() && self.more.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip_every_kind() {
        let mut block = StatBlock::default();
        for (i, kind) in StatKind::iter().enumerate() {
            block.set(kind, i as f64 + 1.0);
        }
        for (i, kind) in StatKind::iter().enumerate() {
            assert!((block.get(kind) - (i as f64 + 1.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_merge_adds_fieldwise() {
        let mut a = StatBlock {
            attack: 10.0,
            stamina: 5.0,
            ..Default::default()
        };
        let b = StatBlock {
            attack: 2.5,
            defense: 3.0,
            ..Default::default()
        };
        a.merge(&b);
        assert!((a.attack - 12.5).abs() < f64::EPSILON);
        assert!((a.stamina - 5.0).abs() < f64::EPSILON);
        assert!((a.defense - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_modifiers_follows_flat_increased_more() {
        let block = StatBlock {
            attack: 100.0,
            defense: 20.0,
            ..Default::default()
        };
        let mut mods = StatModifiers::default();
        mods.add(StatKind::Attack, ModifierKind::Flat, 50.0);
        mods.add(StatKind::Attack, ModifierKind::Increased, 40.0);
        mods.add(StatKind::Attack, ModifierKind::Increased, 30.0);
        mods.add(StatKind::Attack, ModifierKind::More, 20.0);

        let out = block.apply_modifiers(&mods);
        // (100 + 50) * 1.7 * 1.2
        assert!((out.attack - 306.0).abs() < 1e-9);
        // Untouched stats pass through
        assert!((out.defense - 20.0).abs() < f64::EPSILON);
        // Source block is not mutated
        assert!((block.attack - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_modifiers_are_identity() {
        let block = StatBlock {
            attack: 17.0,
            crit_chance: 5.0,
            ..Default::default()
        };
        assert_eq!(block.apply_modifiers(&StatModifiers::default()), block);
    }

    #[test]
    fn test_non_finite_modifier_ignored() {
        let mut mods = StatModifiers::default();
        mods.add(StatKind::Attack, ModifierKind::Flat, f64::NAN);
        assert!(mods.is_empty());
    }

    #[test]
    fn test_is_valid() {
        let mut block = StatBlock::default();
        assert!(block.is_valid());
        block.attack = f64::NAN;
        assert!(!block.is_valid());
        block.attack = 1.0;
        block.max_health = f64::INFINITY;
        assert!(!block.is_valid());
    }

    #[test]
    fn test_from_stat_map_skips_unknown_keys() {
        let mut stats = StatMap::new();
        stats.insert("max_health".to_string(), 60.0);
        stats.insert("attack".to_string(), 8.0);
        stats.insert("luck".to_string(), 99.0);
        let block = StatBlock::from_stat_map(&stats, "goblin");
        assert!((block.max_health - 60.0).abs() < f64::EPSILON);
        assert!((block.attack - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modifier_merge() {
        let mut a = StatModifiers::default();
        a.add(StatKind::Defense, ModifierKind::Flat, 3.0);
        let mut b = StatModifiers::default();
        b.add(StatKind::Defense, ModifierKind::Flat, 2.0);
        b.add(StatKind::Defense, ModifierKind::More, 10.0);
        a.merge(&b);
        assert!((a.flat(StatKind::Defense) - 5.0).abs() < f64::EPSILON);
        assert_eq!(a.more(StatKind::Defense).len(), 1);
    }
}
