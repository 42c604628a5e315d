//! Abilities and cooldowns
//!
//! Each combatant is registered with its class (enemies have none). Lookups
//! check the class table first and fall back to the shared table.

use crate::data::{AbilityDef, DataTables};
use crate::types::{AbilityId, ClassId, TargetId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbilityError {
    #[error("{0} is not registered")]
    UnknownActor(TargetId),
    #[error("Ability {ability} not available to {actor}")]
    NotFound { actor: TargetId, ability: AbilityId },
}

#[derive(Debug, Clone)]
pub struct AbilityTracker {
    tables: Arc<DataTables>,
    classes: HashMap<TargetId, Option<ClassId>>,
    /// Remaining seconds; entries are removed when they reach zero
    cooldowns: HashMap<TargetId, HashMap<AbilityId, f64>>,
}

impl AbilityTracker {
    pub fn new(tables: Arc<DataTables>) -> Self {
        AbilityTracker {
            tables,
            classes: HashMap::new(),
            cooldowns: HashMap::new(),
        }
    }

    pub fn register(&mut self, actor: impl Into<TargetId>, class: Option<ClassId>) {
        self.classes.insert(actor.into(), class);
    }

    pub fn register_hero(&mut self, actor: impl Into<TargetId>, class: &ClassId) {
        self.register(actor, Some(class.clone()));
    }

    pub fn is_registered(&self, actor: TargetId) -> bool {
        self.classes.contains_key(&actor)
    }

    /// Class table first, then the shared table
    pub fn get_definition(
        &self,
        actor: TargetId,
        ability: &AbilityId,
    ) -> Result<&AbilityDef, AbilityError> {
        let class = self
            .classes
            .get(&actor)
            .ok_or(AbilityError::UnknownActor(actor))?;
        class
            .as_ref()
            .and_then(|c| self.tables.class_ability(c, ability))
            .or_else(|| self.tables.ability(ability))
            .ok_or_else(|| AbilityError::NotFound {
                actor,
                ability: ability.clone(),
            })
    }

    /// Class rotation for a registered hero
    pub fn abilities_for(&self, actor: TargetId) -> Vec<AbilityId> {
        self.classes
            .get(&actor)
            .and_then(|c| c.as_ref())
            .and_then(|c| self.tables.class(c))
            .map(|c| c.abilities.clone())
            .unwrap_or_default()
    }

    /// Start the ability's cooldown from its defined duration
    pub fn set_cooldown(
        &mut self,
        actor: TargetId,
        ability: &AbilityId,
    ) -> Result<(), AbilityError> {
        let seconds = self.get_definition(actor, ability)?.cooldown;
        if seconds.is_finite() && seconds > 0.0 {
            self.cooldowns
                .entry(actor)
                .or_default()
                .insert(ability.clone(), seconds);
        }
        Ok(())
    }

    pub fn is_on_cooldown(&self, actor: TargetId, ability: &AbilityId) -> bool {
        self.remaining(actor, ability) > 0.0
    }

    pub fn remaining(&self, actor: TargetId, ability: &AbilityId) -> f64 {
        self.cooldowns
            .get(&actor)
            .and_then(|c| c.get(ability))
            .copied()
            .unwrap_or(0.0)
    }

    /// Tick every cooldown down; finished ones are removed
    pub fn update_cooldowns(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        for timers in self.cooldowns.values_mut() {
            timers.retain(|_, remaining| {
                *remaining -= dt;
                *remaining > 0.0
            });
        }
        self.cooldowns.retain(|_, timers| !timers.is_empty());
    }

    pub fn clear_cooldowns(&mut self, actor: TargetId) {
        self.cooldowns.remove(&actor);
    }

    /// Forget an actor entirely
    pub fn clear_hero(&mut self, actor: TargetId) {
        self.classes.remove(&actor);
        self.cooldowns.remove(&actor);
    }

    /// Forget every enemy and its cooldowns
    pub(crate) fn clear_enemies(&mut self) {
        self.classes.retain(|id, _| id.hero().is_some());
        self.cooldowns.retain(|id, _| id.hero().is_some());
    }

    pub fn clear_all_cooldowns(&mut self) {
        self.cooldowns.clear();
    }
}
