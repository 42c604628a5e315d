//! Simulation - the service container a renderer drives
//!
//! One `Simulation` owns every manager and all persistent state. Hosts call
//! [`Simulation::update`] once per tick, send intents through its methods and
//! drain [`CoreEvent`]s afterwards. Nothing here renders or blocks.

use crate::ability::AbilityTracker;
use crate::achievements::{check_achievements, Statistics};
use crate::combat::{
    CombatError, CombatHero, CombatManager, CombatOutcome, CombatServices, CombatState, Combatant,
};
use crate::data::DataTables;
use crate::economy::{take_consumable, Economy, EconomyError};
use crate::error::CoreError;
use crate::events::CoreEvent;
use crate::hero::{
    equip, socket_gem, unequip, unsocket_gem, GemStash, Hero, HeroError, HeroFactory, Party,
};
use crate::loot::{Inventory, InventoryItem, LootEngine, LootError, LootInstance, LootSettings, LootSource};
use crate::prestige::{
    can_prestige, perform_prestige, purchase_bonus, PrestigeError, PrestigeReset, PrestigeState,
};
use crate::progression::{allocate_talent, grant_experience, reset_talents};
use crate::resource::{ResourceManager, ResourcePool};
use crate::save::{
    migrate, InMemorySaveRepository, SaveData, SaveError, SaveManager, SaveRepository,
    CURRENT_SAVE_VERSION,
};
use crate::stat_block::{StatAggregator, StatBlock};
use crate::status::StatusEffectsEngine;
use crate::types::{
    AbilityId, ClassId, EquipmentSlot, GemId, GemInstanceId, HeroId, ItemId, LootInstanceId,
    Rarity, SpecId, TalentId, TargetId, TreeId,
};
use crate::world::{Encounter, WorldState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Borrow the combat-facing managers out of a simulation
macro_rules! combat_services {
    ($sim:expr) => {
        CombatServices {
            resources: &mut $sim.resources,
            status: &mut $sim.status,
            abilities: &mut $sim.abilities,
            loot: &mut $sim.loot,
            rng: &mut $sim.rng,
            loot_source: LootSource {
                position: $sim.world.current_mile as f64,
                now: $sim.clock,
            },
        }
    };
}

pub struct Simulation {
    tables: Arc<DataTables>,
    aggregator: StatAggregator,
    factory: HeroFactory,
    party: Party,
    world: WorldState,
    economy: Economy,
    inventory: Inventory,
    gems: GemStash,
    prestige: PrestigeState,
    statistics: Statistics,
    resources: ResourceManager,
    status: StatusEffectsEngine,
    abilities: AbilityTracker,
    loot: LootEngine,
    combat: CombatManager,
    saves: SaveManager,
    events: Vec<CoreEvent>,
    rng: ChaCha8Rng,
    /// Simulated seconds since start
    clock: f64,
}

impl Simulation {
    /// Fresh game; the seed fixes every roll
    pub fn new(tables: Arc<DataTables>, seed: u64) -> Self {
        let max_party_size = tables.constants.party.max_party_size;
        let inventory_capacity = tables.constants.loot.inventory_capacity;
        let max_slots = tables.constants.save.max_slots;
        let world = WorldState::new(&tables.world);

        Simulation {
            aggregator: StatAggregator::new(tables.clone()),
            factory: HeroFactory::new(tables.clone()),
            party: Party::new(max_party_size),
            world,
            economy: Economy::default(),
            inventory: Inventory::new(inventory_capacity),
            gems: GemStash::new(),
            prestige: PrestigeState::default(),
            statistics: Statistics::default(),
            resources: ResourceManager::new(),
            status: StatusEffectsEngine::new(tables.clone()),
            abilities: AbilityTracker::new(tables.clone()),
            loot: LootEngine::new(tables.clone()),
            combat: CombatManager::new(tables.clone()),
            saves: SaveManager::new(Box::new(InMemorySaveRepository::new()), max_slots),
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            tables,
        }
    }

    /// Store save slots somewhere other than memory
    pub fn with_save_repository(mut self, repository: Box<dyn SaveRepository>) -> Self {
        let max_slots = self.tables.constants.save.max_slots;
        self.saves = SaveManager::new(repository, max_slots);
        self
    }

    // ---- tick ----

    /// Advance the whole simulation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.clock += dt;

        if self.combat.is_in_combat() {
            let report = self.combat.step(dt, &mut combat_services!(self));
            self.events
                .extend(report.events.into_iter().map(|event| CoreEvent::Combat { event }));
            if let Some(outcome) = report.outcome {
                self.settle(&outcome);
            }
        } else {
            self.travel(dt);
        }

        for id in check_achievements(&mut self.statistics, &self.party, &self.prestige, &self.tables) {
            self.events.push(CoreEvent::AchievementUnlocked { id });
        }
    }

    fn travel(&mut self, dt: f64) {
        let config = &self.tables.world;
        let travel = self
            .world
            .advance(dt, config.travel_speed, config, &mut self.rng);
        if let Some(mile) = travel.new_mile {
            self.statistics.record_mile(mile);
            self.events.push(CoreEvent::MileReached { mile });
        }

        self.resources.regenerate_all(dt);
        self.abilities.update_cooldowns(dt);
        for hero in self.party.iter_mut().filter(|h| h.is_alive()) {
            let stats = self.aggregator.resolve(hero, &self.prestige);
            let regen = stats.health_regen.max(0.0) * dt;
            hero.current_health = (hero.current_health + regen).min(stats.max_health.max(0.0));
        }

        if self.loot.settings().auto_pickup {
            for instance in self.loot.pickup_all(&mut self.inventory) {
                self.events.push(CoreEvent::LootPickedUp { instance });
            }
        }
        for instance in self.loot.expire_loot(self.clock) {
            self.events.push(CoreEvent::LootExpired { instance });
        }

        if let Some(encounter) = travel.encounter {
            if self.party.is_empty() {
                debug!(mile = encounter.mile, "no party; encounter skipped");
            } else if let Err(err) = self.start_encounter(&encounter) {
                warn!(mile = encounter.mile, error = %err, "encounter not started");
            }
        }
    }

    /// Apply a finished fight to the persistent state
    fn settle(&mut self, outcome: &CombatOutcome) {
        let revive = self
            .tables
            .constants
            .combat
            .defeat_health_fraction
            .clamp(0.0, 1.0);
        for (hero_id, health) in &outcome.hero_health {
            if let Some(hero) = self.party.get_mut(*hero_id) {
                hero.current_health = *health;
                if !hero.is_alive() {
                    let max_health = self.aggregator.resolve(hero, &self.prestige).max_health;
                    hero.current_health = max_health.max(0.0) * revive;
                }
            }
        }
        self.statistics.enemies_defeated += u64::from(outcome.enemies_defeated);

        match outcome.result {
            CombatState::Victory => {
                self.statistics.combats_won += 1;
                self.economy.earn(outcome.gold);
                self.statistics.total_gold_earned += outcome.gold;
                self.statistics.total_experience_earned += outcome.experience;
                for hero_id in self.party.ids() {
                    let Some(hero) = self.party.get_mut(hero_id) else {
                        continue;
                    };
                    let report = grant_experience(hero, outcome.experience, &self.tables);
                    if report.leveled_up() {
                        self.events.push(CoreEvent::HeroLeveledUp {
                            hero: hero_id,
                            level: report.new_level,
                        });
                        self.refresh_hero(hero_id);
                    }
                }
                for instance in &outcome.loot {
                    self.events.push(CoreEvent::LootSpawned {
                        instance: instance.instance_id,
                        item: instance.item_id.clone(),
                    });
                }
            }
            CombatState::Defeat => self.statistics.combats_lost += 1,
            CombatState::Retreat => self.statistics.combats_retreated += 1,
            CombatState::Idle | CombatState::InCombat => {}
        }

        self.events.push(CoreEvent::CombatEnded {
            result: outcome.result,
            experience: outcome.experience,
            gold: outcome.gold,
        });
    }

    /// Recompute a hero's stats and push them to every consumer
    fn refresh_hero(&mut self, hero_id: HeroId) {
        let Some(hero) = self.party.get_mut(hero_id) else {
            return;
        };
        let stats = self.aggregator.resolve(hero, &self.prestige);
        hero.current_health = hero.current_health.min(stats.max_health.max(0.0));
        self.resources.resync_max(hero_id, &stats);
        if self.combat.health_of(TargetId::Hero(hero_id)).is_some() {
            if let Err(err) = self.combat.resync_hero(hero_id, stats) {
                warn!(hero = %hero_id, error = %err, "combat resync failed");
            }
        }
    }

    /// Resource pool and ability registration for a party member
    fn register_hero_state(&mut self, hero_id: HeroId) {
        let Some(hero) = self.party.get(hero_id) else {
            return;
        };
        let stats = self.aggregator.resolve(hero, &self.prestige);
        match self.tables.class(&hero.class_id) {
            Some(class) => {
                self.resources.register(hero_id, &class.resource, &stats);
                self.abilities.register_hero(hero_id, &hero.class_id);
            }
            None => warn!(hero = %hero_id, class = %hero.class_id, "hero class missing from tables"),
        }
    }

    fn combat_hero(&self, hero: &Hero) -> CombatHero {
        CombatHero {
            id: hero.id,
            name: hero.name.clone(),
            role: hero.role,
            stats: self.aggregator.resolve(hero, &self.prestige),
            current_health: hero.current_health,
            abilities: self
                .tables
                .class(&hero.class_id)
                .map(|class| class.abilities.clone())
                .unwrap_or_default(),
        }
    }

    // ---- party intents ----

    pub fn add_hero(
        &mut self,
        class_id: &ClassId,
        spec_id: &SpecId,
        level: u32,
        name: impl Into<String>,
    ) -> Result<HeroId, HeroError> {
        if self.party.len() >= self.party.max_size() {
            return Err(HeroError::PartyFull(self.party.max_size()));
        }
        let mut hero = self.factory.create(class_id, spec_id, level, name)?;
        hero.current_health = self.aggregator.resolve(&hero, &self.prestige).max_health;
        let hero_id = hero.id;
        self.party.add_hero(hero)?;
        self.register_hero_state(hero_id);
        self.events.push(CoreEvent::HeroAdded { hero: hero_id });
        Ok(hero_id)
    }

    /// Equip an item by id; returns the item it replaced
    pub fn equip(
        &mut self,
        hero_id: HeroId,
        slot: EquipmentSlot,
        item_id: &ItemId,
    ) -> Result<Option<ItemId>, HeroError> {
        let hero = self
            .party
            .get_mut(hero_id)
            .ok_or(HeroError::UnknownHero(hero_id))?;
        let previous = equip(hero, slot, item_id, &self.tables, &mut self.gems)?;
        self.refresh_hero(hero_id);
        self.events.push(CoreEvent::EquipmentChanged {
            hero: hero_id,
            slot,
            item: Some(item_id.clone()),
        });
        Ok(previous)
    }

    /// Equip from the inventory; the replaced item takes its place there
    pub fn equip_from_inventory(
        &mut self,
        hero_id: HeroId,
        slot: EquipmentSlot,
        index: usize,
    ) -> Result<Option<ItemId>, CoreError> {
        let item_id = self
            .inventory
            .get(index)
            .ok_or(LootError::InvalidIndex(index))?
            .item_id
            .clone();
        let previous = self.equip(hero_id, slot, &item_id)?;
        self.inventory.remove(index)?;
        if let Some(previous_id) = &previous {
            let quality = self
                .tables
                .item(previous_id)
                .map(|item| item.rarity)
                .unwrap_or(Rarity::Common);
            let returned = InventoryItem {
                item_id: previous_id.clone(),
                quality,
            };
            if let Err(err) = self.inventory.add(returned) {
                warn!(item = %previous_id, error = %err, "replaced item lost");
            }
        }
        Ok(previous)
    }

    pub fn unequip(&mut self, hero_id: HeroId, slot: EquipmentSlot) -> Result<ItemId, HeroError> {
        let hero = self
            .party
            .get_mut(hero_id)
            .ok_or(HeroError::UnknownHero(hero_id))?;
        let removed = unequip(hero, slot, &mut self.gems)?;
        self.refresh_hero(hero_id);
        self.events.push(CoreEvent::EquipmentChanged {
            hero: hero_id,
            slot,
            item: None,
        });
        Ok(removed)
    }

    /// Mint a gem into the stash
    pub fn add_gem(&mut self, gem_id: &GemId) -> Result<GemInstanceId, HeroError> {
        if self.tables.gem(gem_id).is_none() {
            return Err(HeroError::UnknownGem(gem_id.clone()));
        }
        Ok(self.gems.add(gem_id.clone()))
    }

    pub fn socket_gem(
        &mut self,
        hero_id: HeroId,
        slot: EquipmentSlot,
        socket_index: usize,
        instance: GemInstanceId,
    ) -> Result<(), HeroError> {
        let hero = self
            .party
            .get_mut(hero_id)
            .ok_or(HeroError::UnknownHero(hero_id))?;
        socket_gem(hero, slot, socket_index, instance, &mut self.gems)?;
        self.refresh_hero(hero_id);
        Ok(())
    }

    pub fn unsocket_gem(
        &mut self,
        hero_id: HeroId,
        slot: EquipmentSlot,
        socket_index: usize,
    ) -> Result<GemInstanceId, HeroError> {
        let hero = self
            .party
            .get_mut(hero_id)
            .ok_or(HeroError::UnknownHero(hero_id))?;
        let instance = unsocket_gem(hero, slot, socket_index, &mut self.gems)?;
        self.refresh_hero(hero_id);
        Ok(instance)
    }

    pub fn allocate_talent(
        &mut self,
        hero_id: HeroId,
        tree_id: &TreeId,
        talent_id: &TalentId,
    ) -> Result<u32, HeroError> {
        let hero = self
            .party
            .get_mut(hero_id)
            .ok_or(HeroError::UnknownHero(hero_id))?;
        let rank = allocate_talent(hero, tree_id, talent_id, &self.tables)?;
        self.refresh_hero(hero_id);
        Ok(rank)
    }

    pub fn reset_talents(&mut self, hero_id: HeroId) -> Result<u32, HeroError> {
        let hero = self
            .party
            .get_mut(hero_id)
            .ok_or(HeroError::UnknownHero(hero_id))?;
        let refunded = reset_talents(hero);
        self.refresh_hero(hero_id);
        Ok(refunded)
    }

    // ---- combat intents ----

    /// Fight an encounter with every living hero
    pub fn start_encounter(&mut self, encounter: &Encounter) -> Result<(), CombatError> {
        if self.combat.is_in_combat() {
            return Err(CombatError::AlreadyInCombat);
        }
        let heroes: Vec<CombatHero> = self
            .party
            .iter()
            .filter(|hero| hero.is_alive())
            .map(|hero| self.combat_hero(hero))
            .collect();
        let spawns = encounter.spawns(&self.tables);
        let enemies = spawns.len();
        self.combat
            .start_combat(&heroes, spawns, &mut combat_services!(self))?;
        self.events.push(CoreEvent::CombatStarted {
            mile: encounter.mile,
            enemies,
        });
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<CombatOutcome, CombatError> {
        let outcome = self.combat.retreat(&mut combat_services!(self))?;
        self.settle(&outcome);
        Ok(outcome)
    }

    // ---- loot & economy intents ----

    pub fn pickup(&mut self, instance: LootInstanceId) -> bool {
        let picked = self.loot.pickup_loot(instance, &mut self.inventory);
        if picked {
            self.events.push(CoreEvent::LootPickedUp { instance });
        }
        picked
    }

    pub fn set_loot_filter(&mut self, rarity: Rarity) {
        self.loot.set_filter(rarity);
    }

    pub fn set_auto_pickup(&mut self, enabled: bool) {
        self.loot.set_auto_pickup(enabled);
    }

    pub fn set_inventory_capacity(&mut self, capacity: usize) {
        self.inventory.set_capacity(capacity);
    }

    pub fn buy_item(&mut self, item_id: &ItemId) -> Result<(), EconomyError> {
        self.economy
            .buy_item(item_id, &mut self.inventory, &self.tables)
    }

    pub fn sell_item(&mut self, index: usize) -> Result<u64, EconomyError> {
        self.economy
            .sell_item(index, &mut self.inventory, &self.tables)
    }

    /// Drink or apply a consumable from the inventory on a hero
    pub fn use_consumable(&mut self, hero_id: HeroId, index: usize) -> Result<ItemId, CoreError> {
        if !self.party.contains(hero_id) {
            return Err(HeroError::UnknownHero(hero_id).into());
        }
        let (item_id, effect) = take_consumable(index, &mut self.inventory, &self.tables)?;

        if effect.heal > 0.0 {
            let target = TargetId::Hero(hero_id);
            if self.combat.health_of(target).is_some() {
                self.combat.heal(target, effect.heal)?;
            } else if let Some(hero) = self.party.get_mut(hero_id) {
                if hero.is_alive() {
                    let max_health = self.aggregator.resolve(hero, &self.prestige).max_health;
                    hero.current_health = (hero.current_health + effect.heal).min(max_health);
                }
            }
        }
        if effect.restore_resource > 0.0 {
            self.resources.restore(hero_id, effect.restore_resource);
        }
        debug!(hero = %hero_id, item = %item_id, "consumable used");
        Ok(item_id)
    }

    // ---- prestige intents ----

    /// Reset the run for prestige points; returns the points granted
    pub fn prestige(&mut self) -> Result<u32, PrestigeError> {
        if !can_prestige(&self.world, &self.tables) {
            return Err(PrestigeError::NotEligible {
                max_mile: self.world.max_mile,
                required: self.tables.progression.prestige.min_mile,
            });
        }
        if self.combat.is_in_combat() {
            if let Err(err) = self.retreat() {
                warn!(error = %err, "retreat before prestige failed");
            }
        }

        let granted = perform_prestige(
            &mut self.prestige,
            PrestigeReset {
                party: &mut self.party,
                world: &mut self.world,
                economy: &mut self.economy,
                inventory: &mut self.inventory,
                gems: &mut self.gems,
            },
            &self.tables,
        )?;

        self.loot.clear();
        self.status.clear_all();
        self.abilities.clear_all_cooldowns();
        for hero_id in self.party.ids() {
            self.register_hero_state(hero_id);
        }
        self.events.push(CoreEvent::PrestigePerformed {
            level: self.prestige.level,
            points_granted: granted,
        });
        Ok(granted)
    }

    pub fn purchase_prestige_bonus(&mut self, bonus_id: &str) -> Result<u32, PrestigeError> {
        let rank = purchase_bonus(&mut self.prestige, bonus_id, &self.tables)?;
        for hero_id in self.party.ids() {
            self.refresh_hero(hero_id);
        }
        Ok(rank)
    }

    // ---- save / restore ----

    /// Every persisted field as it stands now
    pub fn snapshot(&self) -> SaveData {
        let mut party: Vec<Hero> = self.party.heroes().to_vec();
        for hero in &mut party {
            if let Some(health) = self.combat.health_of(TargetId::Hero(hero.id)) {
                hero.current_health = health;
            }
        }
        let resources = self
            .party
            .iter()
            .filter_map(|hero| self.resources.current(hero.id).map(|current| (hero.id, current)))
            .collect();

        SaveData {
            version: CURRENT_SAVE_VERSION,
            party,
            next_hero_id: self.factory.next_id(),
            world: self.world.clone(),
            economy: self.economy.clone(),
            inventory: self.inventory.clone(),
            gems: self.gems.clone(),
            prestige: self.prestige.clone(),
            statistics: self.statistics.clone(),
            loot_settings: self.loot.settings().clone(),
            resources,
        }
    }

    pub fn save_game(&mut self, slot: u32) -> Result<(), SaveError> {
        let data = self.snapshot();
        self.saves.save(slot, &data)?;
        self.events.push(CoreEvent::GameSaved { slot });
        Ok(())
    }

    pub fn load_game(&mut self, slot: u32) -> Result<SaveData, SaveError> {
        let data = self.saves.load(slot)?;
        self.apply_save_data(data.clone())?;
        self.events.push(CoreEvent::GameLoaded { slot });
        Ok(data)
    }

    pub fn save_slots(&self) -> Result<Vec<u32>, SaveError> {
        self.saves.slots()
    }

    /// Replace all persistent state; transient state is dropped
    ///
    /// The save is checked before anything changes.
    pub fn apply_save_data(&mut self, data: SaveData) -> Result<(), SaveError> {
        let data = migrate(data);
        let max_party_size = self.party.max_size();
        if data.party.len() > max_party_size {
            return Err(SaveError::Invalid(format!(
                "{} heroes in a party of at most {}",
                data.party.len(),
                max_party_size
            )));
        }
        let mut seen = BTreeSet::new();
        for hero in &data.party {
            if !seen.insert(hero.id) {
                return Err(SaveError::Invalid(format!("duplicate hero {}", hero.id)));
            }
            if self.tables.class(&hero.class_id).is_none() {
                return Err(SaveError::Invalid(format!(
                    "hero {} has unknown class {}",
                    hero.id, hero.class_id
                )));
            }
        }

        let mut gem_instances = BTreeSet::new();
        let socketed = data
            .party
            .iter()
            .flat_map(|hero| hero.equipment.values())
            .flat_map(|item| item.socketed_gems())
            .map(|gem| gem.instance);
        for instance in data.gems.iter().map(|(instance, _)| instance).chain(socketed) {
            if !gem_instances.insert(instance) {
                return Err(SaveError::Invalid(format!(
                    "gem instance {} is in more than one place",
                    instance.0
                )));
            }
        }

        if self.combat.is_in_combat() {
            if let Err(err) = self.combat.retreat(&mut combat_services!(self)) {
                warn!(error = %err, "dropping combat for load failed");
            }
        }
        self.status.clear_all();
        self.loot.clear();
        for hero_id in self.party.ids() {
            self.abilities.clear_hero(TargetId::Hero(hero_id));
        }
        self.abilities.clear_all_cooldowns();
        self.resources.clear();

        let next_free = data.party.iter().map(|h| h.id.0 + 1).max().unwrap_or(1);
        if data.next_hero_id < next_free {
            warn!(saved = data.next_hero_id, next_free, "hero id counter behind party; advanced");
        }
        self.factory = HeroFactory::with_next_id(self.tables.clone(), data.next_hero_id.max(next_free));
        self.party.replace(data.party);
        self.world = data.world;
        self.economy = data.economy;
        self.inventory = data.inventory;
        self.gems = data.gems;
        if let Some(highest) = gem_instances.last() {
            if self.gems.next_instance_id() <= highest.0 {
                warn!(
                    saved = self.gems.next_instance_id(),
                    highest = highest.0,
                    "gem id counter behind saved gems; advanced"
                );
            }
            self.gems.reserve_past(*highest);
        }
        self.prestige = data.prestige;
        self.statistics = data.statistics;
        self.loot.apply_settings(data.loot_settings);

        for hero_id in self.party.ids() {
            self.register_hero_state(hero_id);
            if let Some(current) = data.resources.get(&hero_id) {
                self.resources.set_current(hero_id, *current);
            }
        }
        info!(heroes = self.party.len(), mile = self.world.current_mile, "save applied");
        Ok(())
    }

    // ---- queries ----

    pub fn tables(&self) -> &Arc<DataTables> {
        &self.tables
    }

    pub fn hero(&self, hero_id: HeroId) -> Option<&Hero> {
        self.party.get(hero_id)
    }

    /// Resolved stats; never cached
    pub fn hero_stats(&self, hero_id: HeroId) -> Option<StatBlock> {
        self.party
            .get(hero_id)
            .map(|hero| self.aggregator.resolve(hero, &self.prestige))
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn gold(&self) -> u64 {
        self.economy.gold
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn gems(&self) -> &GemStash {
        &self.gems
    }

    pub fn prestige_state(&self) -> &PrestigeState {
        &self.prestige
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn combat_state(&self) -> CombatState {
        self.combat.state()
    }

    pub fn combatants(&self) -> &[Combatant] {
        self.combat.combatants()
    }

    pub fn cooldown_remaining(&self, hero_id: HeroId, ability: &AbilityId) -> f64 {
        self.abilities.remaining(TargetId::Hero(hero_id), ability)
    }

    pub fn resource(&self, hero_id: HeroId) -> Option<&ResourcePool> {
        self.resources.pool(hero_id)
    }

    pub fn loot_on_road(&self) -> impl Iterator<Item = &LootInstance> {
        self.loot.spawned()
    }

    pub fn loot_settings(&self) -> &LootSettings {
        self.loot.settings()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }
}
