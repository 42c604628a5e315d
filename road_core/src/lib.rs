//! road_core - Simulation core for the Road of War idle auto-battler
//!
//! This library provides:
//! - Simulation: one tick-driven container owning every manager
//! - StatAggregator: resolved hero stats from ordered stat sources
//! - CombatManager: real-time party vs. enemy fights
//! - Loot, economy, progression, prestige and achievements
//! - SaveManager: versioned JSON save slots
//!
//! Rendering, input and audio live in whatever host drives [`Simulation`].

pub mod ability;
pub mod achievements;
pub mod combat;
pub mod config;
pub mod damage;
pub mod data;
pub mod economy;
pub mod error;
pub mod events;
pub mod hero;
pub mod loot;
pub mod prelude;
pub mod prestige;
pub mod progression;
pub mod resource;
pub mod save;
pub mod simulation;
pub mod source;
pub mod stat_block;
pub mod status;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use combat::{CombatEvent, CombatManager, CombatOutcome, CombatState};
pub use data::DataTables;
pub use error::{CoreError, Result};
pub use events::CoreEvent;
pub use hero::{Hero, HeroFactory, Party};
pub use save::{FileSaveRepository, SaveData, SaveManager};
pub use simulation::Simulation;
pub use source::StatSource;
pub use stat_block::{StatAggregator, StatBlock};
pub use types::{ClassId, EquipmentSlot, HeroId, ItemId, Rarity, SpecId, StatKind, TargetId};
