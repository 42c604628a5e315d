//! Class and specialization definitions

use super::StatMap;
use crate::types::{AbilityId, ClassId, Role, SpecId, StatKind, TreeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ClassesFile {
    pub classes: Vec<ClassDef>,
}

/// A playable class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: String,
    /// Stat that feeds attack
    pub primary_stat: StatKind,
    /// Level-1 attribute values
    #[serde(default)]
    pub base_stats: StatMap,
    /// Per-level attribute gain; the only place level scaling is defined
    #[serde(default)]
    pub growth: StatMap,
    pub resource: ResourceDef,
    /// Class ability rotation, in addition to the shared abilities
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    #[serde(default)]
    pub talent_trees: Vec<TreeId>,
    pub specs: Vec<SpecDef>,
}

impl ClassDef {
    pub fn spec(&self, spec_id: &SpecId) -> Option<&SpecDef> {
        self.specs.iter().find(|s| &s.id == spec_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDef {
    pub id: SpecId,
    pub name: String,
    pub role: Role,
}

/// Declares how a class's single resource behaves
///
/// Passive resources refill over time; builder resources (`passive_regen =
/// false`) only grow through actions and incoming damage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Display name of the resource ("mana", "energy", "rage")
    pub kind: String,
    #[serde(default = "default_base_max")]
    pub base_max: f64,
    #[serde(default)]
    pub max_per_intellect: f64,
    #[serde(default)]
    pub regen_per_second: f64,
    #[serde(default)]
    pub regen_per_spirit: f64,
    #[serde(default = "default_passive_regen")]
    pub passive_regen: bool,
    #[serde(default)]
    pub gain_per_action: f64,
    #[serde(default)]
    pub gain_per_damage_taken: f64,
    #[serde(default = "default_starts_full")]
    pub starts_full: bool,
}

fn default_base_max() -> f64 {
    100.0
}
fn default_passive_regen() -> bool {
    true
}
fn default_starts_full() -> bool {
    true
}
