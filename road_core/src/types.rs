//! Core identifiers and enums shared across the simulation

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Hero class identifier (e.g. "warrior")
    ClassId
);
string_id!(
    /// Specialization identifier within a class
    SpecId
);
string_id!(
    /// Item definition identifier
    ItemId
);
string_id!(
    /// Equipment set identifier
    SetId
);
string_id!(
    /// Skill gem definition identifier
    GemId
);
string_id!(AbilityId);
string_id!(EffectId);
string_id!(EnemyId);
string_id!(DropTableId);
string_id!(TalentId);
string_id!(
    /// Talent tree identifier
    TreeId
);

/// Stable hero identifier, survives save/load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(pub u32);

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hero#{}", self.0)
    }
}

/// Enemy identifier within a single combat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyInstanceId(pub u32);

/// A physical gem; one instance occupies at most one socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GemInstanceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootInstanceId(pub u64);

/// Key for all per-target state (status effects, cooldowns, health pools)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    Hero(HeroId),
    Enemy(EnemyInstanceId),
}

impl TargetId {
    pub fn hero(&self) -> Option<HeroId> {
        match self {
            TargetId::Hero(id) => Some(*id),
            TargetId::Enemy(_) => None,
        }
    }
}

impl From<HeroId> for TargetId {
    fn from(id: HeroId) -> Self {
        TargetId::Hero(id)
    }
}

impl From<EnemyInstanceId> for TargetId {
    fn from(id: EnemyInstanceId) -> Self {
        TargetId::Enemy(id)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Hero(id) => write!(f, "{}", id),
            TargetId::Enemy(id) => write!(f, "enemy#{}", id.0),
        }
    }
}

/// Party role of a specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    Dps,
}

/// Slot an item definition fits into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSlot {
    Weapon,
    Offhand,
    Head,
    Shoulders,
    Chest,
    Hands,
    Legs,
    Feet,
    Neck,
    Ring,
    Trinket,
    Consumable,
}

impl ItemSlot {
    /// Hero equipment slots this item may occupy
    pub fn equipment_slots(&self) -> &'static [EquipmentSlot] {
        match self {
            ItemSlot::Weapon => &[EquipmentSlot::Weapon],
            ItemSlot::Offhand => &[EquipmentSlot::Offhand],
            ItemSlot::Head => &[EquipmentSlot::Head],
            ItemSlot::Shoulders => &[EquipmentSlot::Shoulders],
            ItemSlot::Chest => &[EquipmentSlot::Chest],
            ItemSlot::Hands => &[EquipmentSlot::Hands],
            ItemSlot::Legs => &[EquipmentSlot::Legs],
            ItemSlot::Feet => &[EquipmentSlot::Feet],
            ItemSlot::Neck => &[EquipmentSlot::Neck],
            ItemSlot::Ring => &[EquipmentSlot::Ring1, EquipmentSlot::Ring2],
            ItemSlot::Trinket => &[EquipmentSlot::Trinket],
            ItemSlot::Consumable => &[],
        }
    }
}

/// Equipment slot on a hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Offhand,
    Head,
    Shoulders,
    Chest,
    Hands,
    Legs,
    Feet,
    Neck,
    Ring1,
    Ring2,
    Trinket,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Weapon,
            EquipmentSlot::Offhand,
            EquipmentSlot::Head,
            EquipmentSlot::Shoulders,
            EquipmentSlot::Chest,
            EquipmentSlot::Hands,
            EquipmentSlot::Legs,
            EquipmentSlot::Feet,
            EquipmentSlot::Neck,
            EquipmentSlot::Ring1,
            EquipmentSlot::Ring2,
            EquipmentSlot::Trinket,
        ]
    }
}

/// Item quality tier, ordered from worst to best
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Named combat-relevant stat
///
/// Data tables refer to stats by their snake_case name; strings that do not
/// parse into a `StatKind` are reported and skipped by whoever reads them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Stamina,
    Strength,
    Agility,
    Intellect,
    Spirit,
    MaxHealth,
    MaxResource,
    Attack,
    Defense,
    CritChance,
    HitChance,
    Evasion,
    AttackSpeed,
    HealthRegen,
    ResourceRegen,
}

impl StatKind {
    /// The five primary attributes; everything else is derived or flat
    pub fn primaries() -> &'static [StatKind] {
        &[
            StatKind::Stamina,
            StatKind::Strength,
            StatKind::Agility,
            StatKind::Intellect,
            StatKind::Spirit,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How a modifier combines with a stat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// Added to the stat before multipliers
    #[default]
    Flat,
    /// Percentage; all increased modifiers on a stat are summed
    Increased,
    /// Percentage; each more modifier multiplies separately
    More,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_stat_kind_parses_snake_case() {
        assert_eq!("max_health".parse::<StatKind>().unwrap(), StatKind::MaxHealth);
        assert_eq!("crit_chance".parse::<StatKind>().unwrap(), StatKind::CritChance);
        assert!("maxHealth".parse::<StatKind>().is_err());
        assert!("luck".parse::<StatKind>().is_err());
    }

    #[test]
    fn test_stat_kind_indices_are_dense() {
        for (i, kind) in StatKind::iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(StatKind::iter().count(), StatKind::COUNT);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Legendary > Rarity::Epic);
        assert_eq!("RARE".parse::<Rarity>().unwrap(), Rarity::Rare);
    }

    #[test]
    fn test_ring_fits_both_ring_slots() {
        let slots = ItemSlot::Ring.equipment_slots();
        assert!(slots.contains(&EquipmentSlot::Ring1));
        assert!(slots.contains(&EquipmentSlot::Ring2));
        assert!(ItemSlot::Consumable.equipment_slots().is_empty());
    }

    #[test]
    fn test_target_id_display() {
        assert_eq!(TargetId::from(HeroId(3)).to_string(), "hero#3");
        assert_eq!(TargetId::from(EnemyInstanceId(1)).to_string(), "enemy#1");
    }
}
