//! Status effects - timed buffs and debuffs on any combatant
//!
//! Expiry is lazy: an effect that reaches zero turns stays attached until the
//! target's next [`StatusEffectsEngine::process_turn`], which removes it before
//! anything else happens that turn.

use crate::data::DataTables;
use crate::stat_block::StatModifiers;
use crate::types::{EffectId, TargetId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatusError {
    #[error("Unknown status effect {0}")]
    UnknownEffect(EffectId),
}

/// What one status turn did to a target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnEffects {
    /// Modifiers of the effects that were active this turn
    pub stat_mods: StatModifiers,
    pub damage: f64,
    pub healing: f64,
    pub incapacitated: bool,
    /// Effects removed at the start of this turn
    pub expired: Vec<EffectId>,
}

#[derive(Debug, Clone)]
pub struct StatusEffectsEngine {
    tables: Arc<DataTables>,
    /// Target -> effect -> remaining turns
    active: HashMap<TargetId, BTreeMap<EffectId, u32>>,
}

impl StatusEffectsEngine {
    pub fn new(tables: Arc<DataTables>) -> Self {
        StatusEffectsEngine {
            tables,
            active: HashMap::new(),
        }
    }

    /// Attach an effect; reapplying the same effect refreshes its duration
    pub fn apply(
        &mut self,
        target: TargetId,
        effect_id: &EffectId,
        duration_turns: u32,
    ) -> Result<(), StatusError> {
        if self.tables.effect(effect_id).is_none() {
            return Err(StatusError::UnknownEffect(effect_id.clone()));
        }
        self.active
            .entry(target)
            .or_default()
            .insert(effect_id.clone(), duration_turns);
        debug!(%target, effect = %effect_id, duration_turns, "status applied");
        Ok(())
    }

    pub fn has_effect(&self, target: TargetId, effect_id: &EffectId) -> bool {
        self.active
            .get(&target)
            .is_some_and(|effects| effects.contains_key(effect_id))
    }

    pub fn remaining(&self, target: TargetId, effect_id: &EffectId) -> Option<u32> {
        self.active.get(&target)?.get(effect_id).copied()
    }

    /// Run one status turn for a target
    ///
    /// Effects already at zero are dropped first; the rest contribute their
    /// per-turn damage, healing and modifiers and count down by one.
    pub fn process_turn(&mut self, target: TargetId) -> TurnEffects {
        let mut result = TurnEffects::default();
        let Some(effects) = self.active.get_mut(&target) else {
            return result;
        };

        effects.retain(|id, remaining| {
            if *remaining == 0 {
                result.expired.push(id.clone());
                false
            } else {
                true
            }
        });

        for (id, remaining) in effects.iter_mut() {
            if let Some(def) = self.tables.effect(id) {
                result.damage += def.damage_per_turn.max(0.0);
                result.healing += def.heal_per_turn.max(0.0);
                result.incapacitated |= def.incapacitates;
                result.stat_mods.merge(def.stat_modifiers());
            }
            *remaining -= 1;
        }

        if effects.is_empty() {
            self.active.remove(&target);
        }
        result
    }

    /// Combined modifiers of everything attached to the target
    pub fn modifiers_for(&self, target: TargetId) -> StatModifiers {
        let mut mods = StatModifiers::default();
        if let Some(effects) = self.active.get(&target) {
            for id in effects.keys() {
                if let Some(def) = self.tables.effect(id) {
                    mods.merge(def.stat_modifiers());
                }
            }
        }
        mods
    }

    pub fn is_incapacitated(&self, target: TargetId) -> bool {
        self.active.get(&target).is_some_and(|effects| {
            effects
                .keys()
                .any(|id| self.tables.effect(id).is_some_and(|def| def.incapacitates))
        })
    }

    pub fn active_effects(&self, target: TargetId) -> Vec<(EffectId, u32)> {
        self.active
            .get(&target)
            .map(|effects| effects.iter().map(|(id, n)| (id.clone(), *n)).collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self, target: TargetId) {
        self.active.remove(&target);
    }

    pub fn clear_all(&mut self) {
        self.active.clear();
    }
}
