//! Ability definitions

use crate::types::{AbilityId, ClassId, EffectId};
use serde::{Deserialize, Serialize};

/// Id of the shared fallback every combatant can use
pub const AUTO_ATTACK: &str = "auto_attack";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AbilitiesFile {
    #[serde(default)]
    pub abilities: Vec<AbilityDef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Hits an opponent through the damage resolver
    #[default]
    Damage,
    /// Restores health to the most injured ally
    Heal,
    /// Only applies its effect
    Buff,
}

/// Who receives an ability's status effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    /// Whoever the ability was aimed at
    #[default]
    Target,
    Caster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectApplication {
    pub effect: EffectId,
    pub duration_turns: u32,
    #[serde(default)]
    pub target: EffectTarget,
}

/// An ability definition
///
/// Abilities without a `class` are shared and act as the fallback table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub class: Option<ClassId>,
    #[serde(default)]
    pub kind: AbilityKind,
    /// Cooldown in seconds
    #[serde(default)]
    pub cooldown: f64,
    #[serde(default)]
    pub resource_cost: f64,
    /// Scales attack for damage abilities and intellect for heals
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Higher priority abilities are tried first
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub applies_effect: Option<EffectApplication>,
}

fn default_multiplier() -> f64 {
    1.0
}
