//! Status effect definitions

use super::StatModifierDef;
use crate::stat_block::StatModifiers;
use crate::types::EffectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct EffectsFile {
    #[serde(default)]
    pub effects: Vec<StatusEffectDef>,
}

/// A timed buff or debuff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffectDef {
    pub id: EffectId,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<StatModifierDef>,
    /// Target cannot act while this is active (stun, sleep)
    #[serde(default)]
    pub incapacitates: bool,
    #[serde(default)]
    pub damage_per_turn: f64,
    #[serde(default)]
    pub heal_per_turn: f64,
    /// Typed modifiers, resolved once when the tables load
    #[serde(skip)]
    pub(crate) resolved: StatModifiers,
}

impl StatusEffectDef {
    /// Typed stat modifiers of this effect
    pub fn stat_modifiers(&self) -> &StatModifiers {
        &self.resolved
    }

    pub(crate) fn resolve_modifiers(&mut self) {
        let mut mods = StatModifiers::default();
        for modifier in &self.modifiers {
            if let Some(kind) = super::stat_kind_or_warn(&modifier.stat, self.id.as_str()) {
                mods.add(kind, modifier.kind, modifier.value);
            }
        }
        self.resolved = mods;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatKind;

    #[test]
    fn test_parse_and_resolve_effect() {
        let toml = r#"
[[effects]]
id = "battle_shout"
name = "Battle Shout"

[[effects.modifiers]]
stat = "attack"
value = 10
kind = "increased"

[[effects.modifiers]]
stat = "bravery"
value = 5

[[effects]]
id = "stun"
name = "Stunned"
incapacitates = true
"#;
        let mut file: EffectsFile = toml::from_str(toml).unwrap();
        for effect in &mut file.effects {
            effect.resolve_modifiers();
        }

        let shout = &file.effects[0];
        // Unknown "bravery" is dropped, attack survives
        assert!((shout.stat_modifiers().increased(StatKind::Attack) - 0.10).abs() < 1e-9);
        assert!(shout.stat_modifiers().flat(StatKind::Attack).abs() < f64::EPSILON);
        assert!(file.effects[1].incapacitates);
    }
}
