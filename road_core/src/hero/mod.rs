//! Heroes - persistent party members and their creation

mod equipment;
mod party;

pub use equipment::{equip, socket_gem, unequip, unsocket_gem, GemStash};
pub use party::Party;

use crate::data::DataTables;
use crate::prestige::PrestigeState;
use crate::stat_block::StatAggregator;
use crate::types::{
    ClassId, EquipmentSlot, GemId, GemInstanceId, HeroId, ItemId, Role, SpecId, StatKind,
    TalentId, TreeId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Everything that can go wrong when creating or editing a hero
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeroError {
    #[error("Unknown class {0}")]
    UnknownClass(ClassId),
    #[error("Class {class} has no spec {spec}")]
    UnknownSpec { class: ClassId, spec: SpecId },
    #[error("No hero with id {0}")]
    UnknownHero(HeroId),
    #[error("Party is full ({0} heroes)")]
    PartyFull(usize),
    #[error("Hero {0} is already in the party")]
    DuplicateHero(HeroId),
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),
    #[error("Item {0} cannot be equipped")]
    NotEquipment(ItemId),
    #[error("Item {item} does not fit slot {slot:?}")]
    WrongSlot { item: ItemId, slot: EquipmentSlot },
    #[error("Class {class} cannot use item {item}")]
    ClassRestricted { item: ItemId, class: ClassId },
    #[error("Item requires level {required}, hero is level {level}")]
    LevelTooLow { required: u32, level: u32 },
    #[error("Nothing equipped in slot {0:?}")]
    EmptySlot(EquipmentSlot),
    #[error("Socket {index} out of range, item has {sockets} sockets")]
    InvalidSocket { index: usize, sockets: usize },
    #[error("Socket {0} is already filled")]
    SocketOccupied(usize),
    #[error("Socket {0} is empty")]
    SocketEmpty(usize),
    #[error("Gem {0:?} is not in the stash")]
    GemNotAvailable(GemInstanceId),
    #[error("Unknown gem {0}")]
    UnknownGem(GemId),
    #[error("Talent tree {tree} does not belong to class {class}")]
    TreeNotForClass { tree: TreeId, class: ClassId },
    #[error("Unknown talent {talent} in tree {tree}")]
    UnknownTalent { tree: TreeId, talent: TalentId },
    #[error("No talent points available")]
    NoTalentPoints,
    #[error("Talent {0} is already at max rank")]
    MaxRank(TalentId),
    #[error("Talent needs {required} points in the tree, {spent} spent")]
    TreeRequirement { required: u32, spent: u32 },
}

/// A gem sitting in an item socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketedGem {
    pub instance: GemInstanceId,
    pub gem_id: GemId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_id: ItemId,
    /// One entry per socket the item definition declares
    #[serde(default)]
    pub sockets: Vec<Option<SocketedGem>>,
}

impl EquippedItem {
    pub fn new(item_id: ItemId, sockets: u32) -> Self {
        EquippedItem {
            item_id,
            sockets: vec![None; sockets as usize],
        }
    }

    pub fn socketed_gems(&self) -> impl Iterator<Item = &SocketedGem> {
        self.sockets.iter().flatten()
    }
}

/// A party member
///
/// Only inputs are stored; resolved stats are recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub class_id: ClassId,
    pub spec_id: SpecId,
    pub role: Role,
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
    /// Level-1 attributes copied from the class
    #[serde(default)]
    pub base_stats: BTreeMap<StatKind, f64>,
    #[serde(default)]
    pub available_talent_points: u32,
    #[serde(default)]
    pub equipment: BTreeMap<EquipmentSlot, EquippedItem>,
    /// Tree -> talent -> rank
    #[serde(default)]
    pub talents: BTreeMap<TreeId, BTreeMap<TalentId, u32>>,
    #[serde(default)]
    pub current_health: f64,
}

impl Hero {
    pub fn points_in_tree(&self, tree: &TreeId) -> u32 {
        self.talents
            .get(tree)
            .map(|ranks| ranks.values().sum())
            .unwrap_or(0)
    }

    pub fn talent_rank(&self, tree: &TreeId, talent: &TalentId) -> u32 {
        self.talents
            .get(tree)
            .and_then(|ranks| ranks.get(talent))
            .copied()
            .unwrap_or(0)
    }

    pub fn spent_talent_points(&self) -> u32 {
        self.talents.values().flat_map(|ranks| ranks.values()).sum()
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        self.equipment.get(&slot)
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }
}

/// Creates heroes with unique, monotonically increasing ids
#[derive(Debug, Clone)]
pub struct HeroFactory {
    tables: Arc<DataTables>,
    next_id: u32,
}

impl HeroFactory {
    pub fn new(tables: Arc<DataTables>) -> Self {
        HeroFactory { tables, next_id: 1 }
    }

    /// Resume numbering after a load
    pub fn with_next_id(tables: Arc<DataTables>, next_id: u32) -> Self {
        HeroFactory {
            tables,
            next_id: next_id.max(1),
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Build a hero from class data; starts at full health
    ///
    /// Base stats are always the class's level-1 values. Higher levels are
    /// reflected through the class growth curve when stats are resolved.
    pub fn create(
        &mut self,
        class_id: &ClassId,
        spec_id: &SpecId,
        level: u32,
        name: impl Into<String>,
    ) -> Result<Hero, HeroError> {
        let class = self
            .tables
            .class(class_id)
            .ok_or_else(|| HeroError::UnknownClass(class_id.clone()))?;
        let spec = class.spec(spec_id).ok_or_else(|| HeroError::UnknownSpec {
            class: class_id.clone(),
            spec: spec_id.clone(),
        })?;

        let mut base_stats = BTreeMap::new();
        for (key, value) in &class.base_stats {
            if let Some(kind) = crate::data::stat_kind_or_warn(key, class.id.as_str()) {
                base_stats.insert(kind, *value);
            }
        }

        let id = HeroId(self.next_id);
        self.next_id += 1;

        let mut hero = Hero {
            id,
            name: name.into(),
            class_id: class_id.clone(),
            spec_id: spec_id.clone(),
            role: spec.role,
            level: level.max(1),
            experience: 0,
            base_stats,
            available_talent_points: 0,
            equipment: BTreeMap::new(),
            talents: BTreeMap::new(),
            current_health: 0.0,
        };
        let stats = StatAggregator::new(self.tables.clone()).resolve(&hero, &PrestigeState::default());
        hero.current_health = stats.max_health;

        info!(hero = %hero.id, class = %hero.class_id, spec = %hero.spec_id, level = hero.level, "hero created");
        Ok(hero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> HeroFactory {
        HeroFactory::new(Arc::new(DataTables::builtin().unwrap()))
    }

    #[test]
    fn test_create_assigns_role_and_base_stats() {
        let mut factory = factory();
        let hero = factory
            .create(&"warrior".into(), &"protection".into(), 1, "Brom")
            .unwrap();
        assert_eq!(hero.role, Role::Tank);
        assert!((hero.base_stats[&StatKind::Stamina] - 12.0).abs() < f64::EPSILON);
        // 50 + 12 * 10
        assert!((hero.current_health - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_ids_increase() {
        let mut factory = factory();
        let a = factory.create(&"mage".into(), &"fire".into(), 1, "A").unwrap();
        let b = factory.create(&"mage".into(), &"fire".into(), 1, "B").unwrap();
        assert!(b.id > a.id);
        assert_eq!(factory.next_id(), b.id.0 + 1);
    }

    #[test]
    fn test_higher_level_does_not_bake_growth_into_base() {
        let mut factory = factory();
        let hero = factory
            .create(&"warrior".into(), &"arms".into(), 10, "Vet")
            .unwrap();
        assert_eq!(hero.level, 10);
        assert!((hero.base_stats[&StatKind::Stamina] - 12.0).abs() < f64::EPSILON);
        // Growth shows up in health: stamina 12 + 2 * 9 = 30
        assert!((hero.current_health - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_class_and_spec() {
        let mut factory = factory();
        assert_eq!(
            factory.create(&"bard".into(), &"lute".into(), 1, "X"),
            Err(HeroError::UnknownClass("bard".into()))
        );
        assert!(matches!(
            factory.create(&"mage".into(), &"frost".into(), 1, "X"),
            Err(HeroError::UnknownSpec { .. })
        ));
        // Failed creations do not consume ids
        assert_eq!(factory.next_id(), 1);
    }

    #[test]
    fn test_points_in_tree() {
        let mut factory = factory();
        let mut hero = factory.create(&"warrior".into(), &"arms".into(), 1, "T").unwrap();
        hero.talents
            .entry("arms".into())
            .or_default()
            .insert("weapon_mastery".into(), 3);
        assert_eq!(hero.points_in_tree(&"arms".into()), 3);
        assert_eq!(hero.talent_rank(&"arms".into(), &"weapon_mastery".into()), 3);
        assert_eq!(hero.spent_talent_points(), 3);
        assert_eq!(hero.points_in_tree(&"protection".into()), 0);
    }
}
