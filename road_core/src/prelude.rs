//! Prelude module for convenient imports
//!
//! ```rust
//! use road_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::{StatAggregator, StatBlock, StatValue};
pub use crate::types::{
    AbilityId, ClassId, EquipmentSlot, GemId, GemInstanceId, HeroId, ItemId, LootInstanceId,
    Rarity, Role, SpecId, StatKind, TalentId, TargetId, TreeId,
};

// Heroes
pub use crate::hero::{GemStash, Hero, HeroError, HeroFactory, Party};

// Combat
pub use crate::combat::{CombatError, CombatEvent, CombatOutcome, CombatState, Combatant};

// World & progression
pub use crate::achievements::Statistics;
pub use crate::prestige::PrestigeState;
pub use crate::world::{Encounter, WorldState};

// Loot & economy
pub use crate::loot::{Inventory, InventoryItem, LootSettings};

// Simulation
pub use crate::data::DataTables;
pub use crate::error::CoreError;
pub use crate::events::CoreEvent;
pub use crate::save::{FileSaveRepository, InMemorySaveRepository, SaveData, SaveError};
pub use crate::simulation::Simulation;
