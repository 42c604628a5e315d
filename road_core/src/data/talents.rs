//! Talent tree definitions

use super::StatModifierDef;
use crate::types::{ClassId, TalentId, TreeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TalentsFile {
    #[serde(default)]
    pub trees: Vec<TalentTreeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentTreeDef {
    pub id: TreeId,
    pub name: String,
    pub class: ClassId,
    #[serde(default)]
    pub talents: Vec<TalentDef>,
}

impl TalentTreeDef {
    pub fn talent(&self, talent_id: &TalentId) -> Option<&TalentDef> {
        self.talents.iter().find(|t| &t.id == talent_id)
    }
}

/// A talent; each rank grants its effects once more
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentDef {
    pub id: TalentId,
    pub name: String,
    #[serde(default = "default_max_rank")]
    pub max_rank: u32,
    /// Points that must already be spent in the same tree
    #[serde(default)]
    pub required_tree_points: u32,
    /// Effects per rank
    #[serde(default)]
    pub effects: Vec<StatModifierDef>,
}

fn default_max_rank() -> u32 {
    1
}
