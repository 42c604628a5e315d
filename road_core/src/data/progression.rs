//! Experience curve, prestige and achievement definitions

use super::StatModifierDef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default)]
    pub experience: ExperienceCurve,
    #[serde(default)]
    pub prestige: PrestigeConfig,
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

/// `needed(level) = round(base * level ^ exponent)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceCurve {
    #[serde(default = "default_xp_base")]
    pub base: f64,
    #[serde(default = "default_xp_exponent")]
    pub exponent: f64,
    #[serde(default = "default_talent_points_per_level")]
    pub talent_points_per_level: u32,
    #[serde(default = "default_level_cap")]
    pub level_cap: u32,
}

impl Default for ExperienceCurve {
    fn default() -> Self {
        ExperienceCurve {
            base: default_xp_base(),
            exponent: default_xp_exponent(),
            talent_points_per_level: default_talent_points_per_level(),
            level_cap: default_level_cap(),
        }
    }
}

impl ExperienceCurve {
    /// Experience required to advance from `level` to `level + 1`
    pub fn needed(&self, level: u32) -> u64 {
        let raw = self.base * (level.max(1) as f64).powf(self.exponent);
        if raw.is_finite() && raw >= 1.0 {
            raw.round() as u64
        } else {
            1
        }
    }
}

fn default_xp_base() -> f64 {
    100.0
}
fn default_xp_exponent() -> f64 {
    1.5
}
fn default_talent_points_per_level() -> u32 {
    1
}
fn default_level_cap() -> u32 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestigeConfig {
    /// Highest mile reached before a prestige is allowed
    #[serde(default = "default_prestige_min_mile")]
    pub min_mile: u32,
    #[serde(default = "default_miles_per_point")]
    pub miles_per_point: u32,
    #[serde(default)]
    pub bonuses: Vec<PrestigeBonusDef>,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        PrestigeConfig {
            min_mile: default_prestige_min_mile(),
            miles_per_point: default_miles_per_point(),
            bonuses: Vec::new(),
        }
    }
}

fn default_prestige_min_mile() -> u32 {
    20
}
fn default_miles_per_point() -> u32 {
    10
}

/// A permanent bonus bought with prestige points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestigeBonusDef {
    pub id: String,
    pub name: String,
    /// Effect of a single rank
    pub effect: StatModifierDef,
    #[serde(default = "default_bonus_cost")]
    pub cost: u32,
    #[serde(default = "default_bonus_max_rank")]
    pub max_rank: u32,
}

fn default_bonus_cost() -> u32 {
    1
}
fn default_bonus_max_rank() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    pub condition: AchievementCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementCondition {
    ReachMile { mile: u32 },
    EnemiesDefeated { count: u64 },
    HeroLevel { level: u32 },
    GoldEarned { amount: u64 },
    PrestigeLevel { level: u32 },
}
