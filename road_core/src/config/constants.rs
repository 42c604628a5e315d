//! Game constants configuration

use crate::types::Rarity;
use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub derived: DerivedStatConstants,
    #[serde(default)]
    pub party: PartyConstants,
    #[serde(default)]
    pub loot: LootConstants,
    #[serde(default)]
    pub economy: EconomyConstants,
    #[serde(default)]
    pub save: SaveConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Critical strike damage multiplier (1.5 = 150%)
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Smallest damage a landed hit can deal
    #[serde(default = "default_min_damage")]
    pub min_damage: f64,
    /// Formula constant: mitigation = defense / (defense + constant * attack)
    #[serde(default = "default_defense_constant")]
    pub defense_constant: f64,
    /// Hit chance bounds in percent, applied after evasion
    #[serde(default = "default_min_hit_chance")]
    pub min_hit_chance: f64,
    #[serde(default = "default_max_hit_chance")]
    pub max_hit_chance: f64,
    /// Seconds between swings at 1.0 attack speed
    #[serde(default = "default_base_attack_interval")]
    pub base_attack_interval: f64,
    /// Attack speed is clamped to this before being used as a divisor
    #[serde(default = "default_min_attack_speed")]
    pub min_attack_speed: f64,
    /// Length of one status-effect turn in seconds
    #[serde(default = "default_status_turn_seconds")]
    pub status_turn_seconds: f64,
    /// Healers act when an ally drops below this fraction of max health
    #[serde(default = "default_heal_threshold")]
    pub heal_threshold: f64,
    /// Fraction of max health heroes keep after a party wipe
    #[serde(default = "default_defeat_health_fraction")]
    pub defeat_health_fraction: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            crit_multiplier: default_crit_multiplier(),
            min_damage: default_min_damage(),
            defense_constant: default_defense_constant(),
            min_hit_chance: default_min_hit_chance(),
            max_hit_chance: default_max_hit_chance(),
            base_attack_interval: default_base_attack_interval(),
            min_attack_speed: default_min_attack_speed(),
            status_turn_seconds: default_status_turn_seconds(),
            heal_threshold: default_heal_threshold(),
            defeat_health_fraction: default_defeat_health_fraction(),
        }
    }
}

fn default_crit_multiplier() -> f64 {
    1.5
}
fn default_min_damage() -> f64 {
    1.0
}
fn default_defense_constant() -> f64 {
    5.0
}
fn default_min_hit_chance() -> f64 {
    5.0
}
fn default_max_hit_chance() -> f64 {
    100.0
}
fn default_base_attack_interval() -> f64 {
    2.0
}
fn default_min_attack_speed() -> f64 {
    0.1
}
fn default_status_turn_seconds() -> f64 {
    1.0
}
fn default_heal_threshold() -> f64 {
    0.7
}
fn default_defeat_health_fraction() -> f64 {
    0.5
}

/// Coefficients for stats derived from primary attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedStatConstants {
    /// maxHealth = base_health + stamina * health_per_stamina
    #[serde(default = "default_base_health")]
    pub base_health: f64,
    #[serde(default = "default_health_per_stamina")]
    pub health_per_stamina: f64,
    /// Attack gained per point of the class primary stat
    #[serde(default = "default_attack_per_primary")]
    pub attack_per_primary: f64,
    #[serde(default = "default_defense_per_stamina")]
    pub defense_per_stamina: f64,
    /// Percent crit chance before agility
    #[serde(default = "default_base_crit_chance")]
    pub base_crit_chance: f64,
    #[serde(default = "default_crit_per_agility")]
    pub crit_per_agility: f64,
    #[serde(default = "default_evasion_per_agility")]
    pub evasion_per_agility: f64,
    /// Percent hit chance before evasion
    #[serde(default = "default_base_hit_chance")]
    pub base_hit_chance: f64,
    #[serde(default = "default_base_attack_speed")]
    pub base_attack_speed: f64,
    #[serde(default = "default_health_regen_per_spirit")]
    pub health_regen_per_spirit: f64,
}

impl Default for DerivedStatConstants {
    fn default() -> Self {
        DerivedStatConstants {
            base_health: default_base_health(),
            health_per_stamina: default_health_per_stamina(),
            attack_per_primary: default_attack_per_primary(),
            defense_per_stamina: default_defense_per_stamina(),
            base_crit_chance: default_base_crit_chance(),
            crit_per_agility: default_crit_per_agility(),
            evasion_per_agility: default_evasion_per_agility(),
            base_hit_chance: default_base_hit_chance(),
            base_attack_speed: default_base_attack_speed(),
            health_regen_per_spirit: default_health_regen_per_spirit(),
        }
    }
}

fn default_base_health() -> f64 {
    50.0
}
fn default_health_per_stamina() -> f64 {
    10.0
}
fn default_attack_per_primary() -> f64 {
    2.0
}
fn default_defense_per_stamina() -> f64 {
    0.5
}
fn default_base_crit_chance() -> f64 {
    5.0
}
fn default_crit_per_agility() -> f64 {
    0.05
}
fn default_evasion_per_agility() -> f64 {
    0.05
}
fn default_base_hit_chance() -> f64 {
    95.0
}
fn default_base_attack_speed() -> f64 {
    1.0
}
fn default_health_regen_per_spirit() -> f64 {
    0.2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyConstants {
    #[serde(default = "default_max_party_size")]
    pub max_party_size: usize,
}

impl Default for PartyConstants {
    fn default() -> Self {
        PartyConstants {
            max_party_size: default_max_party_size(),
        }
    }
}

fn default_max_party_size() -> usize {
    5
}

/// Starting values for the runtime loot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootConstants {
    #[serde(default = "default_inventory_capacity")]
    pub inventory_capacity: usize,
    #[serde(default)]
    pub rarity_filter: Rarity,
    /// Seconds a spawned drop stays on the road
    #[serde(default = "default_loot_lifetime")]
    pub lifetime_seconds: f64,
    #[serde(default = "default_auto_pickup")]
    pub auto_pickup: bool,
}

impl Default for LootConstants {
    fn default() -> Self {
        LootConstants {
            inventory_capacity: default_inventory_capacity(),
            rarity_filter: Rarity::Common,
            lifetime_seconds: default_loot_lifetime(),
            auto_pickup: default_auto_pickup(),
        }
    }
}

fn default_inventory_capacity() -> usize {
    20
}
fn default_loot_lifetime() -> f64 {
    30.0
}
fn default_auto_pickup() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConstants {
    /// Fraction of an item's value paid when selling it
    #[serde(default = "default_sell_ratio")]
    pub sell_ratio: f64,
}

impl Default for EconomyConstants {
    fn default() -> Self {
        EconomyConstants {
            sell_ratio: default_sell_ratio(),
        }
    }
}

fn default_sell_ratio() -> f64 {
    0.25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConstants {
    /// Slots are numbered 1..=max_slots
    #[serde(default = "default_max_slots")]
    pub max_slots: u32,
}

impl Default for SaveConstants {
    fn default() -> Self {
        SaveConstants {
            max_slots: default_max_slots(),
        }
    }
}

fn default_max_slots() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.combat.crit_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((constants.combat.min_damage - 1.0).abs() < f64::EPSILON);
        assert!((constants.derived.health_per_stamina - 10.0).abs() < f64::EPSILON);
        assert_eq!(constants.party.max_party_size, 5);
        assert_eq!(constants.save.max_slots, 3);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[combat]
crit_multiplier = 2
min_damage = 3

[loot]
rarity_filter = "rare"
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.combat.crit_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((constants.combat.min_damage - 3.0).abs() < f64::EPSILON);
        // Unspecified fields fall back to defaults
        assert!((constants.combat.defense_constant - 5.0).abs() < f64::EPSILON);
        assert_eq!(constants.loot.rarity_filter, Rarity::Rare);
        assert_eq!(constants.loot.inventory_capacity, 20);
    }
}
