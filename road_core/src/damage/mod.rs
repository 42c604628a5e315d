//! Damage resolution - Single hit and heal outcomes between two stat blocks

use crate::config::CombatConstants;
use crate::stat_block::StatBlock;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of one resolved attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub damage: f64,
    pub miss: bool,
    pub crit: bool,
}

impl HitOutcome {
    pub fn miss() -> Self {
        HitOutcome {
            damage: 0.0,
            miss: true,
            crit: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealOutcome {
    pub amount: f64,
    pub crit: bool,
}

/// Resolve a basic attack
///
/// 1. Hit roll: `clamp(hit_chance - evasion, min, max)` percent
/// 2. Crit roll against the attacker's crit chance
/// 3. Damage from attack vs defense, floored at `min_damage`
pub fn resolve_hit(
    attacker: &StatBlock,
    defender: &StatBlock,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> HitOutcome {
    resolve_ability_hit(attacker, defender, 1.0, constants, rng)
}

/// Resolve an attack whose attack value is scaled by `multiplier`
pub fn resolve_ability_hit(
    attacker: &StatBlock,
    defender: &StatBlock,
    multiplier: f64,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> HitOutcome {
    let hit_chance = hit_chance(attacker, defender, constants);
    if rng.gen::<f64>() * 100.0 >= hit_chance {
        return HitOutcome::miss();
    }

    let crit = rng.gen::<f64>() * 100.0 < or_zero(attacker.crit_chance);
    let attack = or_zero(attacker.attack) * or_zero(multiplier).max(0.0);
    let mut damage = mitigated_damage(attack, defender.defense, constants);
    if crit {
        damage *= constants.crit_multiplier;
    }

    HitOutcome {
        damage,
        miss: false,
        crit,
    }
}

/// Healing from a heal ability: caster attack scaled by `multiplier`
///
/// Heals never miss but can crit.
pub fn resolve_heal(
    caster: &StatBlock,
    multiplier: f64,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> HealOutcome {
    let crit = rng.gen::<f64>() * 100.0 < or_zero(caster.crit_chance);
    let mut amount = (or_zero(caster.attack) * or_zero(multiplier)).max(0.0);
    if crit {
        amount *= constants.crit_multiplier;
    }
    HealOutcome { amount, crit }
}

/// Effective hit chance in percent after evasion
pub fn hit_chance(attacker: &StatBlock, defender: &StatBlock, constants: &CombatConstants) -> f64 {
    (or_zero(attacker.hit_chance) - or_zero(defender.evasion))
        .clamp(constants.min_hit_chance, constants.max_hit_chance)
}

/// Damage after defense: `attack × K·attack / (defense + K·attack)`, floored
///
/// Strictly decreasing in defense, never below `min_damage`.
pub fn mitigated_damage(attack: f64, defense: f64, constants: &CombatConstants) -> f64 {
    let attack = or_zero(attack).max(0.0);
    let defense = or_zero(defense).max(0.0);
    let scaled = constants.defense_constant * attack;
    let raw = if scaled + defense > 0.0 {
        attack * scaled / (defense + scaled)
    } else {
        0.0
    };
    raw.max(constants.min_damage)
}

/// Seconds between swings; attack speed is clamped before dividing
pub fn attack_interval(stats: &StatBlock, constants: &CombatConstants) -> f64 {
    let speed = or_zero(stats.attack_speed).max(constants.min_attack_speed);
    constants.base_attack_interval / speed
}

fn or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zero_rolls() -> StepRng {
        StepRng::new(0, 0)
    }

    fn attacker(attack: f64, crit_chance: f64) -> StatBlock {
        StatBlock {
            attack,
            crit_chance,
            hit_chance: 95.0,
            attack_speed: 1.0,
            ..Default::default()
        }
    }

    fn defender(defense: f64) -> StatBlock {
        StatBlock {
            defense,
            max_health: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_hit() {
        let constants = CombatConstants::default();
        let outcome = resolve_hit(&attacker(20.0, 0.0), &defender(5.0), &constants, &mut zero_rolls());
        assert!(!outcome.miss);
        assert!(!outcome.crit);
        // 20 * 100 / (5 + 100)
        let expected = 20.0 * 100.0 / 105.0;
        assert!((outcome.damage - expected).abs() < 1e-9);

        let again = resolve_hit(&attacker(20.0, 0.0), &defender(5.0), &constants, &mut zero_rolls());
        assert_eq!(outcome, again);
    }

    #[test]
    fn test_crit_multiplies() {
        let constants = CombatConstants::default();
        let normal = resolve_hit(&attacker(20.0, 0.0), &defender(5.0), &constants, &mut zero_rolls());
        let crit = resolve_hit(&attacker(20.0, 50.0), &defender(5.0), &constants, &mut zero_rolls());
        assert!(crit.crit);
        assert!((crit.damage - normal.damage * constants.crit_multiplier).abs() < 1e-9);
    }

    #[test]
    fn test_miss_short_circuits() {
        let constants = CombatConstants::default();
        let mut blind = attacker(20.0, 100.0);
        blind.hit_chance = 0.0;
        let mut slippery = defender(0.0);
        slippery.evasion = 100.0;
        // Roll just below 1.0 is past the 5% floor
        let mut rng = StepRng::new(u64::MAX, 0);
        let outcome = resolve_hit(&blind, &slippery, &constants, &mut rng);
        assert_eq!(outcome, HitOutcome::miss());
    }

    #[test]
    fn test_hit_chance_is_clamped() {
        let constants = CombatConstants::default();
        let mut slippery = defender(0.0);
        slippery.evasion = 500.0;
        assert!((hit_chance(&attacker(1.0, 0.0), &slippery, &constants) - 5.0).abs() < f64::EPSILON);
        let mut sure = attacker(1.0, 0.0);
        sure.hit_chance = 400.0;
        assert!((hit_chance(&sure, &defender(0.0), &constants) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floor_at_extreme_defense() {
        let constants = CombatConstants::default();
        let outcome = resolve_hit(&attacker(1.0, 0.0), &defender(1e12), &constants, &mut zero_rolls());
        assert!((outcome.damage - constants.min_damage).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_stats_count_as_zero() {
        let constants = CombatConstants::default();
        let mut broken = attacker(f64::NAN, f64::NAN);
        broken.hit_chance = 95.0;
        let outcome = resolve_hit(&broken, &defender(f64::NAN), &constants, &mut zero_rolls());
        assert!(!outcome.crit);
        assert!((outcome.damage - constants.min_damage).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defense_monotonic() {
        let constants = CombatConstants::default();
        let mut last = f64::INFINITY;
        for defense in [0.0, 1.0, 5.0, 20.0, 100.0, 1000.0] {
            let damage = mitigated_damage(30.0, defense, &constants);
            assert!(damage <= last);
            last = damage;
        }
    }

    #[test]
    fn test_attack_interval_clamps_speed() {
        let constants = CombatConstants::default();
        let mut stats = attacker(1.0, 0.0);
        assert!((attack_interval(&stats, &constants) - 2.0).abs() < f64::EPSILON);
        stats.attack_speed = 0.0;
        assert!((attack_interval(&stats, &constants) - 20.0).abs() < 1e-9);
        stats.attack_speed = -3.0;
        assert!(attack_interval(&stats, &constants).is_finite());
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let constants = CombatConstants::default();
        let a = attacker(25.0, 30.0);
        let d = defender(8.0);
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                resolve_hit(&a, &d, &constants, &mut rng1),
                resolve_hit(&a, &d, &constants, &mut rng2)
            );
        }
    }

    #[test]
    fn test_heal_scales_with_multiplier() {
        let constants = CombatConstants::default();
        let healer = attacker(30.0, 0.0);
        let heal = resolve_heal(&healer, 2.0, &constants, &mut zero_rolls());
        assert!((heal.amount - 60.0).abs() < f64::EPSILON);
        assert!(!heal.crit);
    }
}
