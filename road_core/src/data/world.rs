//! Road and encounter configuration

use crate::types::EnemyId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Distance units per mile
    #[serde(default = "default_distance_per_mile")]
    pub distance_per_mile: f64,
    /// Distance units the party covers per second
    #[serde(default = "default_travel_speed")]
    pub travel_speed: f64,
    /// Distance between encounters
    #[serde(default = "default_encounter_distance")]
    pub encounter_distance: f64,
    #[serde(default = "default_min_group_size")]
    pub min_group_size: u32,
    #[serde(default = "default_max_group_size")]
    pub max_group_size: u32,
    /// Enemy stat multiplier grows by this much per mile
    #[serde(default = "default_scaling_per_mile")]
    pub scaling_per_mile: f64,
    /// Enemy pools, each active from its starting mile onwards
    #[serde(default)]
    pub brackets: Vec<MileBracket>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            distance_per_mile: default_distance_per_mile(),
            travel_speed: default_travel_speed(),
            encounter_distance: default_encounter_distance(),
            min_group_size: default_min_group_size(),
            max_group_size: default_max_group_size(),
            scaling_per_mile: default_scaling_per_mile(),
            brackets: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Enemy pool for a mile: the bracket with the highest start not past it
    pub fn pool_for_mile(&self, mile: u32) -> Option<&[EnemyId]> {
        self.brackets
            .iter()
            .filter(|b| b.from_mile <= mile)
            .max_by_key(|b| b.from_mile)
            .map(|b| b.enemies.as_slice())
    }

    /// Multiplier applied to enemy health, attack and defense
    pub fn scaling_for_mile(&self, mile: u32) -> f64 {
        1.0 + self.scaling_per_mile.max(0.0) * mile as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileBracket {
    pub from_mile: u32,
    pub enemies: Vec<EnemyId>,
}

fn default_distance_per_mile() -> f64 {
    100.0
}
fn default_travel_speed() -> f64 {
    10.0
}
fn default_encounter_distance() -> f64 {
    150.0
}
fn default_min_group_size() -> u32 {
    1
}
fn default_max_group_size() -> u32 {
    3
}
fn default_scaling_per_mile() -> f64 {
    0.08
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_for_mile_picks_latest_bracket() {
        let config = WorldConfig {
            brackets: vec![
                MileBracket {
                    from_mile: 0,
                    enemies: vec!["goblin".into()],
                },
                MileBracket {
                    from_mile: 10,
                    enemies: vec!["orc".into()],
                },
            ],
            ..Default::default()
        };
        assert_eq!(config.pool_for_mile(3).unwrap()[0], EnemyId::from("goblin"));
        assert_eq!(config.pool_for_mile(10).unwrap()[0], EnemyId::from("orc"));
        assert_eq!(config.pool_for_mile(99).unwrap()[0], EnemyId::from("orc"));
    }

    #[test]
    fn test_scaling_for_mile() {
        let config = WorldConfig::default();
        assert!((config.scaling_for_mile(0) - 1.0).abs() < f64::EPSILON);
        assert!((config.scaling_for_mile(10) - 1.8).abs() < 1e-9);
    }
}
