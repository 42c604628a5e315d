//! Combat results - per-step events and the final outcome of an encounter

use crate::loot::LootInstance;
use crate::types::{AbilityId, EffectId, HeroId, TargetId};
use serde::{Deserialize, Serialize};

/// Combat state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    Idle,
    InCombat,
    Victory,
    Defeat,
    Retreat,
}

impl CombatState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CombatState::Victory | CombatState::Defeat | CombatState::Retreat
        )
    }
}

/// Something that happened during a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    Hit {
        actor: TargetId,
        target: TargetId,
        ability: AbilityId,
        damage: f64,
        crit: bool,
    },
    Missed {
        actor: TargetId,
        target: TargetId,
        ability: AbilityId,
    },
    Healed {
        actor: TargetId,
        target: TargetId,
        ability: AbilityId,
        amount: f64,
        crit: bool,
    },
    EffectApplied {
        target: TargetId,
        effect: EffectId,
        duration_turns: u32,
    },
    StatusTick {
        target: TargetId,
        damage: f64,
        healing: f64,
    },
    Died {
        target: TargetId,
    },
}

/// Final result of an encounter, produced once when it ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Victory, Defeat or Retreat
    pub result: CombatState,
    /// Seconds the fight lasted
    pub duration: f64,
    pub enemies_defeated: u32,
    /// Zero unless the party won
    pub experience: u64,
    /// Zero unless the party won
    pub gold: u64,
    pub loot: Vec<LootInstance>,
    /// Health every hero ended the fight with
    pub hero_health: Vec<(HeroId, f64)>,
}

/// Everything one call to `step` produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub events: Vec<CombatEvent>,
    pub outcome: Option<CombatOutcome>,
}

impl StepReport {
    pub fn damage_dealt_by(&self, actor: TargetId) -> f64 {
        self.events
            .iter()
            .map(|event| match event {
                CombatEvent::Hit {
                    actor: a, damage, ..
                } if *a == actor => *damage,
                _ => 0.0,
            })
            .sum()
    }
}
