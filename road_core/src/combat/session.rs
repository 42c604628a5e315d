//! Combat session - live snapshots of everyone in the current fight

use crate::data::EnemyDef;
use crate::stat_block::StatBlock;
use crate::types::{AbilityId, DropTableId, EnemyId, EnemyInstanceId, HeroId, Role, StatKind, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Heroes,
    Enemies,
}

/// A hero as handed to the combat manager
#[derive(Debug, Clone)]
pub struct CombatHero {
    pub id: HeroId,
    pub name: String,
    pub role: Role,
    pub stats: StatBlock,
    pub current_health: f64,
    /// Class rotation; `auto_attack` is always available on top
    pub abilities: Vec<AbilityId>,
}

/// An enemy about to join a fight, already scaled for the mile
#[derive(Debug, Clone)]
pub struct EnemySpawn {
    pub instance: EnemyInstanceId,
    pub enemy_id: EnemyId,
    pub name: String,
    pub stats: StatBlock,
    pub abilities: Vec<AbilityId>,
    pub drop_table: Option<DropTableId>,
    pub experience: u64,
}

impl EnemySpawn {
    /// Health, attack and defense scale by `scaling`; experience too
    pub fn from_def(instance: EnemyInstanceId, def: &EnemyDef, scaling: f64) -> Self {
        let mut stats = StatBlock::from_stat_map(&def.stats, def.id.as_str());
        let scaling = if scaling.is_finite() && scaling > 0.0 {
            scaling
        } else {
            1.0
        };
        for kind in [StatKind::MaxHealth, StatKind::Attack, StatKind::Defense] {
            stats.set(kind, stats.get(kind) * scaling);
        }
        EnemySpawn {
            instance,
            enemy_id: def.id.clone(),
            name: def.name.clone(),
            stats,
            abilities: def.abilities.clone(),
            drop_table: def.drop_table.clone(),
            experience: (def.experience as f64 * scaling).round() as u64,
        }
    }
}

/// One participant's live combat state
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: TargetId,
    pub name: String,
    pub side: Side,
    pub role: Option<Role>,
    /// Snapshot taken at start or on resync; status modifiers go on top
    pub base_stats: StatBlock,
    /// Snapshot with this tick's status modifiers applied
    pub effective: StatBlock,
    pub health: f64,
    /// Seconds until the next action
    pub attack_timer: f64,
    pub abilities: Vec<AbilityId>,
    pub drop_table: Option<DropTableId>,
    pub experience: u64,
}

impl Combatant {
    pub fn hero(hero: &CombatHero, first_swing: f64) -> Self {
        Combatant {
            id: TargetId::Hero(hero.id),
            name: hero.name.clone(),
            side: Side::Heroes,
            role: Some(hero.role),
            base_stats: hero.stats,
            effective: hero.stats,
            health: hero.current_health.clamp(0.0, hero.stats.max_health.max(0.0)),
            attack_timer: first_swing,
            abilities: hero.abilities.clone(),
            drop_table: None,
            experience: 0,
        }
    }

    pub fn enemy(spawn: &EnemySpawn, first_swing: f64) -> Self {
        Combatant {
            id: TargetId::Enemy(spawn.instance),
            name: spawn.name.clone(),
            side: Side::Enemies,
            role: None,
            base_stats: spawn.stats,
            effective: spawn.stats,
            health: spawn.stats.max_health.max(0.0),
            attack_timer: first_swing,
            abilities: spawn.abilities.clone(),
            drop_table: spawn.drop_table.clone(),
            experience: spawn.experience,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn max_health(&self) -> f64 {
        self.effective.max_health.max(0.0)
    }

    /// Current health as a fraction of max, 0 when max is 0
    pub fn health_fraction(&self) -> f64 {
        let max = self.max_health();
        if max > 0.0 {
            self.health / max
        } else {
            0.0
        }
    }

    pub fn take_damage(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.health = (self.health - amount).max(0.0);
        }
    }

    pub fn heal(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 && self.is_alive() {
            self.health = (self.health + amount).min(self.max_health());
        }
    }
}

/// State of the fight in progress
#[derive(Debug, Clone)]
pub struct CombatSession {
    pub combatants: Vec<Combatant>,
    pub elapsed: f64,
    /// Time banked towards the next status turn
    pub status_accumulator: f64,
}

impl CombatSession {
    pub fn new(combatants: Vec<Combatant>) -> Self {
        CombatSession {
            combatants,
            elapsed: 0.0,
            status_accumulator: 0.0,
        }
    }

    pub fn get(&self, id: TargetId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn index_of(&self, id: TargetId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.is_alive())
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    /// Target for an attack: enemies go for tanks first, heroes focus the first enemy
    pub fn pick_opponent(&self, attacker_side: Side) -> Option<TargetId> {
        match attacker_side {
            Side::Heroes => self.living(Side::Enemies).next().map(|c| c.id),
            Side::Enemies => self
                .living(Side::Heroes)
                .find(|c| c.role == Some(Role::Tank))
                .or_else(|| self.living(Side::Heroes).next())
                .map(|c| c.id),
        }
    }

    /// Most injured living ally below `threshold` of max health
    pub fn pick_heal_target(&self, side: Side, threshold: f64) -> Option<TargetId> {
        self.living(side)
            .filter(|c| c.health_fraction() < threshold)
            .min_by(|a, b| a.health_fraction().total_cmp(&b.health_fraction()))
            .map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero(id: u32, role: Role, health: f64) -> Combatant {
        Combatant::hero(
            &CombatHero {
                id: HeroId(id),
                name: format!("H{id}"),
                role,
                stats: StatBlock {
                    max_health: 100.0,
                    ..Default::default()
                },
                current_health: health,
                abilities: Vec::new(),
            },
            2.0,
        )
    }

    #[test]
    fn test_enemy_scaling() {
        let def = EnemyDef {
            id: "goblin".into(),
            name: "Goblin".into(),
            stats: [("max_health".to_string(), 60.0), ("attack".to_string(), 8.0), ("hit_chance".to_string(), 90.0)]
                .into_iter()
                .collect(),
            abilities: Vec::new(),
            drop_table: None,
            experience: 20,
        };
        let spawn = EnemySpawn::from_def(EnemyInstanceId(1), &def, 1.5);
        assert!((spawn.stats.max_health - 90.0).abs() < 1e-9);
        assert!((spawn.stats.attack - 12.0).abs() < 1e-9);
        // Hit chance is not scaled
        assert!((spawn.stats.hit_chance - 90.0).abs() < 1e-9);
        assert_eq!(spawn.experience, 30);
    }

    #[test]
    fn test_enemies_target_tank_first() {
        let session = CombatSession::new(vec![
            hero(1, Role::Dps, 100.0),
            hero(2, Role::Tank, 100.0),
        ]);
        assert_eq!(session.pick_opponent(Side::Enemies), Some(TargetId::Hero(HeroId(2))));
    }

    #[test]
    fn test_heal_target_is_most_injured_below_threshold() {
        let session = CombatSession::new(vec![
            hero(1, Role::Dps, 65.0),
            hero(2, Role::Tank, 40.0),
            hero(3, Role::Healer, 90.0),
        ]);
        assert_eq!(
            session.pick_heal_target(Side::Heroes, 0.7),
            Some(TargetId::Hero(HeroId(2)))
        );
        assert_eq!(session.pick_heal_target(Side::Heroes, 0.3), None);
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut c = hero(1, Role::Dps, 50.0);
        c.heal(500.0);
        assert!((c.health - 100.0).abs() < f64::EPSILON);
        c.take_damage(1000.0);
        assert!(c.health.abs() < f64::EPSILON);
        assert!(!c.is_alive());
        // The dead are not healed
        c.heal(10.0);
        assert!(c.health.abs() < f64::EPSILON);
    }
}
