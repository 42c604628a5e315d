//! Combat orchestration - the encounter state machine
//!
//! `Idle → InCombat → {Victory, Defeat, Retreat} → Idle`. The manager owns
//! only the session snapshot; resources, status effects, cooldowns and loot
//! are borrowed per call through [`CombatServices`].

mod result;
mod session;

pub use result::{CombatEvent, CombatOutcome, CombatState, StepReport};
pub use session::{CombatHero, CombatSession, Combatant, EnemySpawn, Side};

use crate::ability::{AbilityError, AbilityTracker};
use crate::config::CombatConstants;
use crate::damage::{attack_interval, resolve_ability_hit, resolve_heal};
use crate::data::{AbilityDef, AbilityKind, DataTables, EffectTarget, AUTO_ATTACK};
use crate::loot::{LootEngine, LootSource};
use crate::resource::ResourceManager;
use crate::stat_block::StatBlock;
use crate::status::StatusEffectsEngine;
use crate::types::{AbilityId, HeroId, TargetId};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("Already in combat")]
    AlreadyInCombat,
    #[error("Not in combat")]
    NotInCombat,
    #[error("Cannot start combat without heroes")]
    NoHeroes,
    #[error("Cannot start combat without enemies")]
    NoEnemies,
    #[error("{0} is not in this fight")]
    UnknownCombatant(TargetId),
    #[error("{0} has an invalid stat block")]
    InvalidStats(TargetId),
    #[error("{0} has nothing to target")]
    NoTarget(TargetId),
    #[error("{0} cannot pay for its ability")]
    InsufficientResource(TargetId),
    #[error(transparent)]
    Ability(#[from] AbilityError),
}

/// Managers a fight reads and writes, borrowed for one call
pub struct CombatServices<'a, R: Rng> {
    pub resources: &'a mut ResourceManager,
    pub status: &'a mut StatusEffectsEngine,
    pub abilities: &'a mut AbilityTracker,
    pub loot: &'a mut LootEngine,
    pub rng: &'a mut R,
    /// Where and when victory loot lands
    pub loot_source: LootSource,
}

#[derive(Debug, Clone)]
pub struct CombatManager {
    tables: Arc<DataTables>,
    state: CombatState,
    session: Option<CombatSession>,
}

impl CombatManager {
    pub fn new(tables: Arc<DataTables>) -> Self {
        CombatManager {
            tables,
            state: CombatState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_in_combat(&self) -> bool {
        self.state == CombatState::InCombat
    }

    pub fn combatants(&self) -> &[Combatant] {
        self.session
            .as_ref()
            .map(|s| s.combatants.as_slice())
            .unwrap_or(&[])
    }

    pub fn health_of(&self, target: TargetId) -> Option<f64> {
        self.session.as_ref()?.get(target).map(|c| c.health)
    }

    pub fn elapsed(&self) -> f64 {
        self.session.as_ref().map(|s| s.elapsed).unwrap_or(0.0)
    }

    /// Snapshot both sides and enter combat
    pub fn start_combat<R: Rng>(
        &mut self,
        heroes: &[CombatHero],
        enemies: Vec<EnemySpawn>,
        services: &mut CombatServices<'_, R>,
    ) -> Result<(), CombatError> {
        if self.is_in_combat() {
            return Err(CombatError::AlreadyInCombat);
        }
        if heroes.is_empty() {
            return Err(CombatError::NoHeroes);
        }
        if enemies.is_empty() {
            return Err(CombatError::NoEnemies);
        }

        let constants = &self.tables.constants.combat;
        let mut combatants = Vec::with_capacity(heroes.len() + enemies.len());
        for hero in heroes {
            let target = TargetId::Hero(hero.id);
            if !services.abilities.is_registered(target) {
                services.abilities.register(target, None);
            }
            services.resources.reset_for_combat(hero.id);
            combatants.push(Combatant::hero(hero, attack_interval(&hero.stats, constants)));
        }
        for spawn in &enemies {
            let target = TargetId::Enemy(spawn.instance);
            services.abilities.register(target, None);
            services.status.clear(target);
            combatants.push(Combatant::enemy(spawn, attack_interval(&spawn.stats, constants)));
        }

        info!(heroes = heroes.len(), enemies = enemies.len(), "combat started");
        self.session = Some(CombatSession::new(combatants));
        self.state = CombatState::InCombat;
        Ok(())
    }

    /// Advance the fight by `dt` seconds
    pub fn step<R: Rng>(&mut self, dt: f64, services: &mut CombatServices<'_, R>) -> StepReport {
        let mut report = StepReport::default();
        if !self.is_in_combat() {
            return report;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let constants = &self.tables.constants.combat;
        let Some(session) = self.session.as_mut() else {
            return report;
        };
        session.elapsed += dt;

        // 1. cooldowns, 2. resources
        services.abilities.update_cooldowns(dt);
        for combatant in session.combatants.iter().filter(|c| c.is_alive()) {
            if let Some(hero) = combatant.id.hero() {
                services.resources.regenerate(hero, dt);
            }
        }

        // 3. status turns; expiry happens before anyone acts
        let turn = constants.status_turn_seconds.max(0.01);
        session.status_accumulator += dt;
        while session.status_accumulator >= turn {
            session.status_accumulator -= turn;
            run_status_turn(session, services, &mut report.events);
        }

        // 4. effective stats for this tick
        for combatant in &mut session.combatants {
            let mods = services.status.modifiers_for(combatant.id);
            combatant.effective = combatant.base_stats.apply_modifiers(&mods);
        }

        // 5 + 6. actions, applied immediately
        for index in 0..session.combatants.len() {
            if session.side_defeated(Side::Heroes) || session.side_defeated(Side::Enemies) {
                break;
            }
            let actor = &mut session.combatants[index];
            if !actor.is_alive() {
                continue;
            }
            actor.attack_timer -= dt;
            if actor.attack_timer > 0.0 {
                continue;
            }
            let actor_id = actor.id;
            if services.status.is_incapacitated(actor_id) {
                actor.attack_timer = 0.0;
                continue;
            }

            match take_action(constants, session, index, services) {
                Ok(events) => report.events.extend(events),
                Err(err) => warn!(actor = %actor_id, error = %err, "action failed; skipped"),
            }
            let actor = &mut session.combatants[index];
            actor.attack_timer = attack_interval(&actor.effective, constants);
        }

        // 7. end conditions
        let result = if session.side_defeated(Side::Enemies) {
            Some(CombatState::Victory)
        } else if session
            .living(Side::Heroes)
            .all(|c| services.status.is_incapacitated(c.id))
        {
            Some(CombatState::Defeat)
        } else {
            None
        };

        if let Some(result) = result {
            report.outcome = Some(self.finish(result, services));
        }
        report
    }

    /// Leave the fight now; no rewards, no loot
    pub fn retreat<R: Rng>(
        &mut self,
        services: &mut CombatServices<'_, R>,
    ) -> Result<CombatOutcome, CombatError> {
        if !self.is_in_combat() {
            return Err(CombatError::NotInCombat);
        }
        Ok(self.finish(CombatState::Retreat, services))
    }

    /// Replace a hero's snapshot after its stats changed mid-fight
    pub fn resync_hero(&mut self, hero_id: HeroId, stats: StatBlock) -> Result<(), CombatError> {
        let session = self.session.as_mut().ok_or(CombatError::NotInCombat)?;
        let target = TargetId::Hero(hero_id);
        let combatant = session
            .get_mut(target)
            .ok_or(CombatError::UnknownCombatant(target))?;
        combatant.base_stats = stats;
        combatant.effective = stats;
        combatant.health = combatant.health.min(stats.max_health.max(0.0));
        debug!(hero = %hero_id, "combat snapshot resynced");
        Ok(())
    }

    /// Heal a living combatant, returning its new health
    pub fn heal(&mut self, target: TargetId, amount: f64) -> Result<f64, CombatError> {
        let session = self.session.as_mut().ok_or(CombatError::NotInCombat)?;
        let combatant = session
            .get_mut(target)
            .ok_or(CombatError::UnknownCombatant(target))?;
        combatant.heal(amount);
        Ok(combatant.health)
    }

    fn finish<R: Rng>(
        &mut self,
        result: CombatState,
        services: &mut CombatServices<'_, R>,
    ) -> CombatOutcome {
        let session = self.session.take();
        self.state = CombatState::Idle;
        let mut outcome = CombatOutcome {
            result,
            duration: 0.0,
            enemies_defeated: 0,
            experience: 0,
            gold: 0,
            loot: Vec::new(),
            hero_health: Vec::new(),
        };
        let Some(session) = session else {
            return outcome;
        };
        outcome.duration = session.elapsed;

        for combatant in &session.combatants {
            match combatant.id {
                TargetId::Hero(hero) => outcome.hero_health.push((hero, combatant.health)),
                TargetId::Enemy(_) if !combatant.is_alive() => outcome.enemies_defeated += 1,
                TargetId::Enemy(_) => {}
            }
            services.status.clear(combatant.id);
        }
        services.abilities.clear_enemies();

        if result == CombatState::Victory {
            for enemy in session
                .combatants
                .iter()
                .filter(|c| c.side == Side::Enemies && !c.is_alive())
            {
                outcome.experience += enemy.experience;
                let Some(table_id) = &enemy.drop_table else {
                    continue;
                };
                match self.tables.drop_table(table_id) {
                    Some(table) => {
                        outcome.gold += services.loot.roll_gold(table, &mut *services.rng);
                        let drops =
                            services
                                .loot
                                .spawn_loot(&services.loot_source, table, &mut *services.rng);
                        outcome.loot.extend(drops);
                    }
                    None => warn!(table = %table_id, "drop table missing; no loot"),
                }
            }
        }

        info!(
            result = ?outcome.result,
            duration = outcome.duration,
            enemies_defeated = outcome.enemies_defeated,
            experience = outcome.experience,
            gold = outcome.gold,
            loot = outcome.loot.len(),
            "combat ended"
        );
        outcome
    }
}

/// One status turn for every living combatant
fn run_status_turn<R: Rng>(
    session: &mut CombatSession,
    services: &mut CombatServices<'_, R>,
    events: &mut Vec<CombatEvent>,
) {
    for combatant in session.combatants.iter_mut().filter(|c| c.is_alive()) {
        let turn = services.status.process_turn(combatant.id);
        if turn.damage <= 0.0 && turn.healing <= 0.0 {
            continue;
        }
        combatant.take_damage(turn.damage);
        combatant.heal(turn.healing);
        events.push(CombatEvent::StatusTick {
            target: combatant.id,
            damage: turn.damage,
            healing: turn.healing,
        });
        if turn.damage > 0.0 {
            if let Some(hero) = combatant.id.hero() {
                services.resources.on_damage_taken(hero);
            }
        }
        if !combatant.is_alive() {
            events.push(CombatEvent::Died {
                target: combatant.id,
            });
        }
    }
}

/// Choose and resolve one action for the combatant at `index`
fn take_action<R: Rng>(
    constants: &CombatConstants,
    session: &mut CombatSession,
    index: usize,
    services: &mut CombatServices<'_, R>,
) -> Result<Vec<CombatEvent>, CombatError> {
    let actor = &session.combatants[index];
    let actor_id = actor.id;
    let side = actor.side;
    let stats = actor.effective;
    if !stats.is_valid() {
        return Err(CombatError::InvalidStats(actor_id));
    }

    let ability = choose_ability(session, index, constants, services)?;
    let cost = ability.resource_cost.max(0.0);
    if let Some(hero) = actor_id.hero() {
        if cost > 0.0 && !services.resources.consume(hero, cost) {
            return Err(CombatError::InsufficientResource(actor_id));
        }
    }
    services.abilities.set_cooldown(actor_id, &ability.id)?;

    let mut events = Vec::new();
    match ability.kind {
        AbilityKind::Damage => {
            let target_id = session
                .pick_opponent(side)
                .ok_or(CombatError::NoTarget(actor_id))?;
            let target_index = session
                .index_of(target_id)
                .ok_or(CombatError::UnknownCombatant(target_id))?;
            let outcome = resolve_ability_hit(
                &stats,
                &session.combatants[target_index].effective,
                ability.multiplier,
                constants,
                &mut *services.rng,
            );
            if outcome.miss {
                events.push(CombatEvent::Missed {
                    actor: actor_id,
                    target: target_id,
                    ability: ability.id.clone(),
                });
            } else {
                let target = &mut session.combatants[target_index];
                target.take_damage(outcome.damage);
                let died = !target.is_alive();
                events.push(CombatEvent::Hit {
                    actor: actor_id,
                    target: target_id,
                    ability: ability.id.clone(),
                    damage: outcome.damage,
                    crit: outcome.crit,
                });
                if let Some(hero) = target_id.hero() {
                    services.resources.on_damage_taken(hero);
                }
                if died {
                    events.push(CombatEvent::Died { target: target_id });
                } else {
                    apply_ability_effect(&ability, actor_id, target_id, services, &mut events);
                }
            }
        }
        AbilityKind::Heal => {
            let target_id = session
                .pick_heal_target(side, constants.heal_threshold)
                .ok_or(CombatError::NoTarget(actor_id))?;
            let heal = resolve_heal(&stats, ability.multiplier, constants, &mut *services.rng);
            if let Some(target) = session.get_mut(target_id) {
                target.heal(heal.amount);
            }
            events.push(CombatEvent::Healed {
                actor: actor_id,
                target: target_id,
                ability: ability.id.clone(),
                amount: heal.amount,
                crit: heal.crit,
            });
            apply_ability_effect(&ability, actor_id, target_id, services, &mut events);
        }
        AbilityKind::Buff => {
            apply_ability_effect(&ability, actor_id, actor_id, services, &mut events);
        }
    }

    if let Some(hero) = actor_id.hero() {
        services.resources.on_action(hero);
    }
    Ok(events)
}

/// Highest priority usable ability, falling back to the shared auto attack
fn choose_ability<R: Rng>(
    session: &CombatSession,
    index: usize,
    constants: &CombatConstants,
    services: &CombatServices<'_, R>,
) -> Result<AbilityDef, CombatError> {
    let actor = &session.combatants[index];
    let mut candidates: Vec<&AbilityDef> = Vec::new();
    for ability_id in &actor.abilities {
        match services.abilities.get_definition(actor.id, ability_id) {
            Ok(def) => candidates.push(def),
            Err(err) => warn!(actor = %actor.id, error = %err, "rotation ability skipped"),
        }
    }
    // Stable: equal priorities keep rotation order
    candidates.sort_by_key(|def| std::cmp::Reverse(def.priority));

    let usable = candidates.into_iter().find(|def| {
        if services.abilities.is_on_cooldown(actor.id, &def.id) {
            return false;
        }
        if let Some(hero) = actor.id.hero() {
            let cost = def.resource_cost.max(0.0);
            if cost > 0.0 && services.resources.current(hero).unwrap_or(0.0) < cost {
                return false;
            }
        }
        match def.kind {
            AbilityKind::Damage => session.pick_opponent(actor.side).is_some(),
            AbilityKind::Heal => session
                .pick_heal_target(actor.side, constants.heal_threshold)
                .is_some(),
            AbilityKind::Buff => true,
        }
    });

    match usable {
        Some(def) => Ok(def.clone()),
        None => Ok(services
            .abilities
            .get_definition(actor.id, &AbilityId::from(AUTO_ATTACK))?
            .clone()),
    }
}

fn apply_ability_effect<R: Rng>(
    ability: &AbilityDef,
    actor: TargetId,
    target: TargetId,
    services: &mut CombatServices<'_, R>,
    events: &mut Vec<CombatEvent>,
) {
    let Some(application) = &ability.applies_effect else {
        return;
    };
    let recipient = match application.target {
        EffectTarget::Target => target,
        EffectTarget::Caster => actor,
    };
    match services
        .status
        .apply(recipient, &application.effect, application.duration_turns)
    {
        Ok(()) => events.push(CombatEvent::EffectApplied {
            target: recipient,
            effect: application.effect.clone(),
            duration_turns: application.duration_turns,
        }),
        Err(err) => warn!(ability = %ability.id, error = %err, "effect not applied"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnemyInstanceId, Role};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        tables: Arc<DataTables>,
        resources: ResourceManager,
        status: StatusEffectsEngine,
        abilities: AbilityTracker,
        loot: LootEngine,
        rng: StdRng,
    }

    impl Fixture {
        fn new() -> Self {
            let tables = Arc::new(DataTables::builtin().unwrap());
            Fixture {
                resources: ResourceManager::new(),
                status: StatusEffectsEngine::new(tables.clone()),
                abilities: AbilityTracker::new(tables.clone()),
                loot: LootEngine::new(tables.clone()),
                rng: StdRng::seed_from_u64(42),
                tables,
            }
        }

        fn services(&mut self) -> CombatServices<'_, StdRng> {
            CombatServices {
                resources: &mut self.resources,
                status: &mut self.status,
                abilities: &mut self.abilities,
                loot: &mut self.loot,
                rng: &mut self.rng,
                loot_source: LootSource {
                    position: 0.0,
                    now: 0.0,
                },
            }
        }
    }

    fn hero(id: u32, attack: f64, max_health: f64) -> CombatHero {
        CombatHero {
            id: HeroId(id),
            name: format!("Hero {id}"),
            role: Role::Dps,
            stats: StatBlock {
                attack,
                max_health,
                hit_chance: 100.0,
                attack_speed: 1.0,
                ..Default::default()
            },
            current_health: max_health,
            abilities: Vec::new(),
        }
    }

    fn enemy(tables: &DataTables, instance: u32, attack: f64, max_health: f64) -> EnemySpawn {
        let def = tables.enemy(&"goblin".into()).unwrap();
        let mut spawn = EnemySpawn::from_def(EnemyInstanceId(instance), def, 1.0);
        spawn.stats = StatBlock {
            attack,
            max_health,
            hit_chance: 100.0,
            attack_speed: 1.0,
            ..Default::default()
        };
        spawn.abilities.clear();
        spawn
    }

    fn run_to_end(
        combat: &mut CombatManager,
        fixture: &mut Fixture,
        dt: f64,
        max_steps: usize,
    ) -> Option<CombatOutcome> {
        for _ in 0..max_steps {
            let report = combat.step(dt, &mut fixture.services());
            if report.outcome.is_some() {
                return report.outcome;
            }
        }
        None
    }

    #[test]
    fn test_no_nested_combat() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let goblin = enemy(&fixture.tables, 1, 1.0, 50.0);
        combat
            .start_combat(&[hero(1, 10.0, 100.0)], vec![goblin.clone()], &mut fixture.services())
            .unwrap();
        assert_eq!(
            combat.start_combat(&[hero(1, 10.0, 100.0)], vec![goblin], &mut fixture.services()),
            Err(CombatError::AlreadyInCombat)
        );
        assert_eq!(combat.state(), CombatState::InCombat);
    }

    #[test]
    fn test_empty_sides_rejected() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let goblin = enemy(&fixture.tables, 1, 1.0, 50.0);
        assert_eq!(
            combat.start_combat(&[], vec![goblin], &mut fixture.services()),
            Err(CombatError::NoHeroes)
        );
        assert_eq!(
            combat.start_combat(&[hero(1, 1.0, 1.0)], Vec::new(), &mut fixture.services()),
            Err(CombatError::NoEnemies)
        );
        assert_eq!(combat.state(), CombatState::Idle);
    }

    #[test]
    fn test_victory_grants_rewards_and_returns_to_idle() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let goblin = enemy(&fixture.tables, 1, 1.0, 50.0);
        combat
            .start_combat(&[hero(1, 100.0, 100.0)], vec![goblin], &mut fixture.services())
            .unwrap();

        let outcome = run_to_end(&mut combat, &mut fixture, 0.5, 20).unwrap();
        assert_eq!(outcome.result, CombatState::Victory);
        assert_eq!(outcome.enemies_defeated, 1);
        assert_eq!(outcome.experience, 20);
        assert!((1..=5).contains(&outcome.gold));
        assert_eq!(outcome.hero_health.len(), 1);
        assert_eq!(combat.state(), CombatState::Idle);
        assert!(combat.combatants().is_empty());
        // Dropped loot is on the road
        assert_eq!(fixture.loot.spawned().count(), outcome.loot.len());
    }

    #[test]
    fn test_defeat_has_no_rewards() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let troll = enemy(&fixture.tables, 1, 1000.0, 1e6);
        combat
            .start_combat(&[hero(1, 1.0, 10.0)], vec![troll], &mut fixture.services())
            .unwrap();

        let outcome = run_to_end(&mut combat, &mut fixture, 0.5, 20).unwrap();
        assert_eq!(outcome.result, CombatState::Defeat);
        assert_eq!(outcome.experience, 0);
        assert_eq!(outcome.gold, 0);
        assert!(outcome.loot.is_empty());
        assert!(outcome.hero_health[0].1.abs() < f64::EPSILON);
    }

    #[test]
    fn test_retreat() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        assert_eq!(
            combat.retreat(&mut fixture.services()).unwrap_err(),
            CombatError::NotInCombat
        );

        let goblin = enemy(&fixture.tables, 1, 1.0, 1e6);
        combat
            .start_combat(&[hero(1, 1.0, 100.0)], vec![goblin], &mut fixture.services())
            .unwrap();
        fixture
            .status
            .apply(TargetId::Hero(HeroId(1)), &"bleed".into(), 5)
            .unwrap();

        let outcome = combat.retreat(&mut fixture.services()).unwrap();
        assert_eq!(outcome.result, CombatState::Retreat);
        assert!(outcome.loot.is_empty());
        assert_eq!(combat.state(), CombatState::Idle);
        assert!(fixture.status.active_effects(TargetId::Hero(HeroId(1))).is_empty());
    }

    #[test]
    fn test_resync_updates_snapshot_and_clamps_health() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let goblin = enemy(&fixture.tables, 1, 1.0, 1e6);
        combat
            .start_combat(&[hero(1, 10.0, 100.0)], vec![goblin], &mut fixture.services())
            .unwrap();

        let mut stronger = hero(1, 25.0, 80.0).stats;
        stronger.defense = 3.0;
        combat.resync_hero(HeroId(1), stronger).unwrap();

        let snapshot = &combat.combatants()[0];
        assert!((snapshot.base_stats.attack - 25.0).abs() < f64::EPSILON);
        assert!((snapshot.health - 80.0).abs() < f64::EPSILON);
        assert_eq!(
            combat.resync_hero(HeroId(7), stronger),
            Err(CombatError::UnknownCombatant(TargetId::Hero(HeroId(7))))
        );
    }

    #[test]
    fn test_failing_actor_does_not_abort_tick() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let mut broken = hero(1, 10.0, 100.0);
        broken.stats.attack = f64::NAN;
        let healthy = hero(2, 10.0, 100.0);
        let goblin = enemy(&fixture.tables, 1, 1.0, 1e6);
        combat
            .start_combat(&[broken, healthy], vec![goblin], &mut fixture.services())
            .unwrap();

        let report = combat.step(2.0, &mut fixture.services());
        assert!(report.damage_dealt_by(TargetId::Hero(HeroId(2))) > 0.0);
        assert!(report.damage_dealt_by(TargetId::Hero(HeroId(1))).abs() < f64::EPSILON);
        assert!(combat.is_in_combat());
    }

    #[test]
    fn test_stunned_actor_waits() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let goblin = enemy(&fixture.tables, 1, 1.0, 1e6);
        combat
            .start_combat(&[hero(1, 10.0, 100.0), hero(2, 10.0, 100.0)], vec![goblin], &mut fixture.services())
            .unwrap();
        fixture
            .status
            .apply(TargetId::Hero(HeroId(1)), &"stun".into(), 3)
            .unwrap();

        let report = combat.step(2.0, &mut fixture.services());
        assert!(report.damage_dealt_by(TargetId::Hero(HeroId(1))).abs() < f64::EPSILON);
        assert!(report.damage_dealt_by(TargetId::Hero(HeroId(2))) > 0.0);
    }

    #[test]
    fn test_class_ability_preferred_when_affordable() {
        let mut fixture = Fixture::new();
        let mut combat = CombatManager::new(fixture.tables.clone());
        let mut mage = hero(1, 20.0, 100.0);
        mage.abilities = vec!["fireball".into()];
        fixture.abilities.register_hero(HeroId(1), &"mage".into());
        let def = fixture.tables.class(&"mage".into()).unwrap().resource.clone();
        let pool = StatBlock {
            max_resource: 100.0,
            ..Default::default()
        };
        fixture.resources.register(HeroId(1), &def, &pool);

        let goblin = enemy(&fixture.tables, 1, 1.0, 1e6);
        combat
            .start_combat(&[mage], vec![goblin], &mut fixture.services())
            .unwrap();
        let report = combat.step(2.0, &mut fixture.services());

        let used_fireball = report.events.iter().any(|e| {
            matches!(e, CombatEvent::Hit { ability, .. } | CombatEvent::Missed { ability, .. }
                if ability.as_str() == "fireball")
        });
        assert!(used_fireball);
        assert!((fixture.resources.current(HeroId(1)).unwrap() - 80.0).abs() < 1e-9);
        assert!(fixture
            .abilities
            .is_on_cooldown(TargetId::Hero(HeroId(1)), &"fireball".into()));
    }
}
