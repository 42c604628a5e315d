//! Resource pools - mana, energy, rage and friends, one per hero
//!
//! Behavior comes entirely from the class [`ResourceDef`]: passive pools
//! refill over time, builder pools only grow through actions and damage.

use crate::data::ResourceDef;
use crate::stat_block::StatBlock;
use crate::types::HeroId;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePool {
    pub kind: String,
    pub current: f64,
    pub max: f64,
    /// Per second, already includes spirit scaling
    pub regen: f64,
    pub passive_regen: bool,
    pub gain_per_action: f64,
    pub gain_per_damage_taken: f64,
    pub starts_full: bool,
}

impl ResourcePool {
    fn from_def(def: &ResourceDef, stats: &StatBlock) -> Self {
        let max = stats.max_resource.max(0.0);
        ResourcePool {
            kind: def.kind.clone(),
            current: if def.starts_full { max } else { 0.0 },
            max,
            regen: stats.resource_regen.max(0.0),
            passive_regen: def.passive_regen,
            gain_per_action: def.gain_per_action,
            gain_per_damage_taken: def.gain_per_damage_taken,
            starts_full: def.starts_full,
        }
    }

    fn gain(&mut self, amount: f64) {
        if amount.is_finite() {
            self.current = (self.current + amount).clamp(0.0, self.max);
        }
    }
}

/// Owns every hero's resource pool, keyed by hero id
#[derive(Debug, Clone, Default)]
pub struct ResourceManager {
    pools: HashMap<HeroId, ResourcePool>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a hero's pool from class data and resolved stats
    pub fn register(&mut self, hero_id: HeroId, def: &ResourceDef, stats: &StatBlock) {
        self.pools.insert(hero_id, ResourcePool::from_def(def, stats));
    }

    /// Spend `amount` if the pool holds enough; otherwise nothing changes
    pub fn consume(&mut self, hero_id: HeroId, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            return false;
        }
        match self.pools.get_mut(&hero_id) {
            Some(pool) if pool.current >= amount => {
                pool.current -= amount;
                true
            }
            Some(_) => false,
            None => {
                warn!(hero = %hero_id, "consume on unregistered resource pool");
                false
            }
        }
    }

    /// Passive refill; builder pools are untouched
    pub fn regenerate(&mut self, hero_id: HeroId, dt: f64) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            if pool.passive_regen && dt > 0.0 {
                pool.gain(pool.regen * dt);
            }
        }
    }

    pub fn regenerate_all(&mut self, dt: f64) {
        let ids: Vec<HeroId> = self.pools.keys().copied().collect();
        for id in ids {
            self.regenerate(id, dt);
        }
    }

    /// Called after the hero acts
    pub fn on_action(&mut self, hero_id: HeroId) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            let gain = pool.gain_per_action;
            pool.gain(gain);
        }
    }

    /// Called when the hero takes damage
    pub fn on_damage_taken(&mut self, hero_id: HeroId) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            let gain = pool.gain_per_damage_taken;
            pool.gain(gain);
        }
    }

    /// Pick up new max and regen after stats change; current is clamped
    pub fn resync_max(&mut self, hero_id: HeroId, stats: &StatBlock) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            pool.max = stats.max_resource.max(0.0);
            pool.regen = stats.resource_regen.max(0.0);
            pool.current = pool.current.min(pool.max);
        }
    }

    /// Restore a saved amount, clamped to the pool
    pub fn set_current(&mut self, hero_id: HeroId, amount: f64) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            pool.current = if amount.is_finite() {
                amount.clamp(0.0, pool.max)
            } else {
                0.0
            };
        }
    }

    /// Add resource directly, e.g. from a potion
    pub fn restore(&mut self, hero_id: HeroId, amount: f64) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            pool.gain(amount.max(0.0));
        }
    }

    /// Builder pools start each fight empty, others are left as they are
    pub fn reset_for_combat(&mut self, hero_id: HeroId) {
        if let Some(pool) = self.pools.get_mut(&hero_id) {
            if !pool.starts_full {
                pool.current = 0.0;
            }
        }
    }

    pub fn current(&self, hero_id: HeroId) -> Option<f64> {
        self.pools.get(&hero_id).map(|p| p.current)
    }

    pub fn max(&self, hero_id: HeroId) -> Option<f64> {
        self.pools.get(&hero_id).map(|p| p.max)
    }

    pub fn pool(&self, hero_id: HeroId) -> Option<&ResourcePool> {
        self.pools.get(&hero_id)
    }

    pub fn remove(&mut self, hero_id: HeroId) {
        self.pools.remove(&hero_id);
    }

    pub fn clear(&mut self) {
        self.pools.clear();
    }
}
