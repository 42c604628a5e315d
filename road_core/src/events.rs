//! Events emitted by the simulation for whoever renders it

use crate::combat::{CombatEvent, CombatState};
use crate::types::{EquipmentSlot, HeroId, ItemId, LootInstanceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreEvent {
    HeroAdded {
        hero: HeroId,
    },
    EquipmentChanged {
        hero: HeroId,
        slot: EquipmentSlot,
        item: Option<ItemId>,
    },
    CombatStarted {
        mile: u32,
        enemies: usize,
    },
    Combat {
        event: CombatEvent,
    },
    CombatEnded {
        result: CombatState,
        experience: u64,
        gold: u64,
    },
    HeroLeveledUp {
        hero: HeroId,
        level: u32,
    },
    LootSpawned {
        instance: LootInstanceId,
        item: ItemId,
    },
    LootPickedUp {
        instance: LootInstanceId,
    },
    LootExpired {
        instance: LootInstanceId,
    },
    MileReached {
        mile: u32,
    },
    AchievementUnlocked {
        id: String,
    },
    PrestigePerformed {
        level: u32,
        points_granted: u32,
    },
    GameSaved {
        slot: u32,
    },
    GameLoaded {
        slot: u32,
    },
}
