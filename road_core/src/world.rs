//! World travel - distance on the road, miles and encounters

use crate::combat::EnemySpawn;
use crate::data::{DataTables, WorldConfig};
use crate::types::{EnemyId, EnemyInstanceId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where the party is on the road
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default)]
    pub current_mile: u32,
    /// Furthest mile reached since the last prestige
    #[serde(default)]
    pub max_mile: u32,
    #[serde(default)]
    pub distance_traveled: f64,
    #[serde(default)]
    pub distance_to_next_encounter: f64,
    /// Number of times movement has run
    #[serde(default)]
    pub movement_ticks: u64,
}

/// An enemy group met on the road
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub mile: u32,
    pub enemies: Vec<EnemyId>,
    /// Multiplier for enemy health, attack, defense and experience
    pub scaling: f64,
}

impl Encounter {
    /// Scaled spawns, numbered from 1; unknown enemy ids are skipped
    pub fn spawns(&self, tables: &DataTables) -> Vec<EnemySpawn> {
        let mut spawns = Vec::with_capacity(self.enemies.len());
        for enemy_id in &self.enemies {
            match tables.enemy(enemy_id) {
                Some(def) => {
                    let instance = EnemyInstanceId(spawns.len() as u32 + 1);
                    spawns.push(EnemySpawn::from_def(instance, def, self.scaling));
                }
                None => warn!(enemy = %enemy_id, "encounter names unknown enemy; skipped"),
            }
        }
        spawns
    }
}

/// Result of one movement tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Travel {
    /// Set when this tick crossed into a new mile
    pub new_mile: Option<u32>,
    pub encounter: Option<Encounter>,
}

impl WorldState {
    pub fn new(config: &WorldConfig) -> Self {
        WorldState {
            distance_to_next_encounter: config.encounter_distance.max(0.0),
            ..Default::default()
        }
    }

    /// Move the party `speed * dt` distance units along the road
    ///
    /// Runs once per out-of-combat tick; `movement_ticks` counts the calls.
    pub fn advance(
        &mut self,
        dt: f64,
        speed: f64,
        config: &WorldConfig,
        rng: &mut impl Rng,
    ) -> Travel {
        self.movement_ticks += 1;
        let mut travel = Travel::default();

        let step = if dt.is_finite() && speed.is_finite() {
            (dt * speed).max(0.0)
        } else {
            0.0
        };
        self.distance_traveled += step;
        self.distance_to_next_encounter -= step;

        if config.distance_per_mile > 0.0 {
            let mile = (self.distance_traveled / config.distance_per_mile).floor() as u32;
            if mile > self.current_mile {
                self.current_mile = mile;
                travel.new_mile = Some(mile);
            }
            self.max_mile = self.max_mile.max(self.current_mile);
        }

        if self.distance_to_next_encounter <= 0.0 {
            self.distance_to_next_encounter = config.encounter_distance.max(0.0);
            travel.encounter = self.roll_encounter(config, rng);
        }
        travel
    }

    fn roll_encounter(&self, config: &WorldConfig, rng: &mut impl Rng) -> Option<Encounter> {
        let pool = match config.pool_for_mile(self.current_mile) {
            Some(pool) if !pool.is_empty() => pool,
            _ => {
                warn!(mile = self.current_mile, "no enemy pool for mile; encounter skipped");
                return None;
            }
        };
        let low = config.min_group_size.max(1);
        let high = config.max_group_size.max(low);
        let count = rng.gen_range(low..=high);
        let enemies: Vec<EnemyId> = (0..count)
            .filter_map(|_| pool.choose(rng).cloned())
            .collect();

        debug!(mile = self.current_mile, enemies = enemies.len(), "encounter");
        Some(Encounter {
            mile: self.current_mile,
            enemies,
            scaling: config.scaling_for_mile(self.current_mile),
        })
    }

    /// Back to the start of the road
    pub fn reset(&mut self, config: &WorldConfig) {
        *self = WorldState {
            movement_ticks: self.movement_ticks,
            ..WorldState::new(config)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> WorldConfig {
        DataTables::builtin().unwrap().world.clone()
    }

    #[test]
    fn test_movement_counts_every_call() {
        let config = config();
        let mut world = WorldState::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..7 {
            world.advance(0.1, config.travel_speed, &config, &mut rng);
        }
        assert_eq!(world.movement_ticks, 7);
        assert!((world.distance_traveled - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_miles_are_reached() {
        let config = config();
        let mut world = WorldState::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        let travel = world.advance(10.0, config.travel_speed, &config, &mut rng);
        assert_eq!(travel.new_mile, Some(1));
        assert_eq!(world.current_mile, 1);
        assert_eq!(world.max_mile, 1);

        let travel = world.advance(1.0, config.travel_speed, &config, &mut rng);
        assert_eq!(travel.new_mile, None);
    }

    #[test]
    fn test_encounter_at_distance() {
        let config = config();
        let mut world = WorldState::new(&config);
        let mut rng = StdRng::seed_from_u64(9);
        // 140 of 150 units: nothing yet
        let travel = world.advance(14.0, config.travel_speed, &config, &mut rng);
        assert!(travel.encounter.is_none());

        let travel = world.advance(1.0, config.travel_speed, &config, &mut rng);
        let encounter = travel.encounter.unwrap();
        let size = encounter.enemies.len() as u32;
        assert!(size >= config.min_group_size && size <= config.max_group_size);
        assert!((world.distance_to_next_encounter - config.encounter_distance).abs() < 1e-9);

        let pool = config.pool_for_mile(encounter.mile).unwrap();
        assert!(encounter.enemies.iter().all(|e| pool.contains(e)));
    }

    #[test]
    fn test_spawns_are_scaled_and_numbered() {
        let tables = DataTables::builtin().unwrap();
        let encounter = Encounter {
            mile: 10,
            enemies: vec!["goblin".into(), "no_such_enemy".into(), "goblin".into()],
            scaling: tables.world.scaling_for_mile(10),
        };
        let spawns = encounter.spawns(&tables);
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].instance, EnemyInstanceId(1));
        assert_eq!(spawns[1].instance, EnemyInstanceId(2));
        // 60 * (1 + 0.08 * 10)
        assert!((spawns[0].stats.max_health - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_keeps_movement_count() {
        let config = config();
        let mut world = WorldState::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        world.advance(30.0, config.travel_speed, &config, &mut rng);
        world.reset(&config);
        assert_eq!(world.current_mile, 0);
        assert_eq!(world.max_mile, 0);
        assert_eq!(world.movement_ticks, 1);
    }

    #[test]
    fn test_bad_dt_does_not_move() {
        let config = config();
        let mut world = WorldState::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        world.advance(f64::NAN, config.travel_speed, &config, &mut rng);
        world.advance(-5.0, config.travel_speed, &config, &mut rng);
        assert!(world.distance_traveled.abs() < f64::EPSILON);
        assert_eq!(world.movement_ticks, 2);
    }
}
