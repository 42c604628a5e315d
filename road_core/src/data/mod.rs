//! Data tables - static content loaded once at startup
//!
//! Every definition the simulation uses (classes, talents, items, abilities,
//! status effects, enemies, world and progression config) lives here. The
//! tables are read-only after loading and are shared behind an `Arc`.

mod abilities;
mod classes;
mod effects;
mod enemies;
mod items;
mod progression;
mod talents;
mod world;

pub use abilities::{AbilityDef, AbilityKind, EffectApplication, EffectTarget, AUTO_ATTACK};
pub use classes::{ClassDef, ResourceDef, SpecDef};
pub use effects::StatusEffectDef;
pub use enemies::{DropEntry, DropTable, EnemyDef};
pub use items::{EquipmentSetDef, GemDef, ItemDef, UseEffect};
pub use progression::{
    AchievementCondition, AchievementDef, ExperienceCurve, PrestigeBonusDef, PrestigeConfig,
    ProgressionConfig,
};
pub use talents::{TalentDef, TalentTreeDef};
pub use world::{MileBracket, WorldConfig};

use crate::config::{load_toml, parse_toml, ConfigError, GameConstants};
use crate::types::{
    AbilityId, ClassId, DropTableId, EffectId, EnemyId, GemId, ItemId, ModifierKind, SetId,
    SpecId, StatKind, TalentId, TreeId,
};
use abilities::AbilitiesFile;
use classes::ClassesFile;
use effects::EffectsFile;
use enemies::EnemiesFile;
use items::ItemsFile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Stat name to value, as written in the data files
pub type StatMap = BTreeMap<String, f64>;

/// A single stat modifier as written in the data files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatModifierDef {
    pub stat: String,
    pub value: f64,
    #[serde(default)]
    pub kind: ModifierKind,
}

/// Structural problems that make the tables unusable
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No classes defined")]
    NoClasses,
    #[error("Class {0} has no specializations")]
    ClassWithoutSpecs(ClassId),
    #[error("Class {class} growth for {stat} is negative")]
    NegativeGrowth { class: ClassId, stat: String },
    #[error("Class {class} references unknown ability {ability}")]
    UnknownClassAbility { class: ClassId, ability: AbilityId },
    #[error("Class {class} references unknown talent tree {tree}")]
    UnknownTree { class: ClassId, tree: TreeId },
    #[error("Talent tree {tree} belongs to unknown class {class}")]
    TreeForUnknownClass { tree: TreeId, class: ClassId },
    #[error("Ability {ability} applies unknown effect {effect}")]
    UnknownEffect { ability: AbilityId, effect: EffectId },
    #[error("Enemy {enemy} references unknown drop table {table}")]
    UnknownDropTable { enemy: EnemyId, table: DropTableId },
    #[error("World bracket references unknown enemy {0}")]
    UnknownBracketEnemy(EnemyId),
    #[error("The shared auto_attack ability is missing")]
    MissingAutoAttack,
}

/// Raw TOML text of every data file
#[derive(Debug, Clone, Copy)]
pub struct DataSources<'a> {
    pub constants: &'a str,
    pub classes: &'a str,
    pub talents: &'a str,
    pub items: &'a str,
    pub abilities: &'a str,
    pub effects: &'a str,
    pub enemies: &'a str,
    pub world: &'a str,
    pub progression: &'a str,
}

impl DataSources<'static> {
    /// The tables shipped with the crate
    pub fn builtin() -> Self {
        DataSources {
            constants: include_str!("../../data/constants.toml"),
            classes: include_str!("../../data/classes.toml"),
            talents: include_str!("../../data/talents.toml"),
            items: include_str!("../../data/items.toml"),
            abilities: include_str!("../../data/abilities.toml"),
            effects: include_str!("../../data/effects.toml"),
            enemies: include_str!("../../data/enemies.toml"),
            world: include_str!("../../data/world.toml"),
            progression: include_str!("../../data/progression.toml"),
        }
    }
}

/// Registry of all static definitions
#[derive(Debug, Clone)]
pub struct DataTables {
    pub constants: GameConstants,
    pub world: WorldConfig,
    pub progression: ProgressionConfig,
    classes: BTreeMap<ClassId, ClassDef>,
    items: HashMap<ItemId, ItemDef>,
    sets: HashMap<SetId, EquipmentSetDef>,
    gems: HashMap<GemId, GemDef>,
    general_abilities: HashMap<AbilityId, AbilityDef>,
    class_abilities: HashMap<ClassId, HashMap<AbilityId, AbilityDef>>,
    effects: HashMap<EffectId, StatusEffectDef>,
    enemies: HashMap<EnemyId, EnemyDef>,
    drop_tables: HashMap<DropTableId, DropTable>,
    trees: HashMap<TreeId, TalentTreeDef>,
}

impl DataTables {
    /// Parse the tables embedded in the crate
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_sources(DataSources::builtin())
    }

    /// Read every data file from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, DataError> {
        info!(dir = %dir.display(), "loading data tables");
        let tables = DataTables::from_parts(
            load_toml(&dir.join("constants.toml"))?,
            load_toml(&dir.join("classes.toml"))?,
            load_toml(&dir.join("talents.toml"))?,
            load_toml(&dir.join("items.toml"))?,
            load_toml(&dir.join("abilities.toml"))?,
            load_toml(&dir.join("effects.toml"))?,
            load_toml(&dir.join("enemies.toml"))?,
            load_toml(&dir.join("world.toml"))?,
            load_toml(&dir.join("progression.toml"))?,
        );
        tables.validate()?;
        Ok(tables)
    }

    /// Parse tables from in-memory TOML text
    pub fn from_sources(sources: DataSources<'_>) -> Result<Self, DataError> {
        let tables = DataTables::from_parts(
            parse_toml(sources.constants)?,
            parse_toml(sources.classes)?,
            parse_toml(sources.talents)?,
            parse_toml(sources.items)?,
            parse_toml(sources.abilities)?,
            parse_toml(sources.effects)?,
            parse_toml(sources.enemies)?,
            parse_toml(sources.world)?,
            parse_toml(sources.progression)?,
        );
        tables.validate()?;
        Ok(tables)
    }

    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        constants: GameConstants,
        classes: ClassesFile,
        talents: talents::TalentsFile,
        items: ItemsFile,
        abilities: AbilitiesFile,
        effects: EffectsFile,
        enemies: EnemiesFile,
        world: WorldConfig,
        progression: ProgressionConfig,
    ) -> Self {
        let mut general_abilities = HashMap::new();
        let mut class_abilities: HashMap<ClassId, HashMap<AbilityId, AbilityDef>> = HashMap::new();
        for ability in abilities.abilities {
            match ability.class.clone() {
                Some(class) => {
                    class_abilities
                        .entry(class)
                        .or_default()
                        .insert(ability.id.clone(), ability);
                }
                None => {
                    general_abilities.insert(ability.id.clone(), ability);
                }
            }
        }

        let effects = effects
            .effects
            .into_iter()
            .map(|mut effect| {
                effect.resolve_modifiers();
                (effect.id.clone(), effect)
            })
            .collect();

        DataTables {
            constants,
            world,
            progression,
            classes: index_by(classes.classes, |c| c.id.clone()),
            items: index_by(items.items, |i| i.id.clone()),
            sets: index_by(items.sets, |s| s.id.clone()),
            gems: index_by(items.gems, |g| g.id.clone()),
            general_abilities,
            class_abilities,
            effects,
            enemies: index_by(enemies.enemies, |e| e.id.clone()),
            drop_tables: index_by(enemies.drop_tables, |t| t.id.clone()),
            trees: index_by(talents.trees, |t| t.id.clone()),
        }
    }

    /// Reject inconsistencies the simulation cannot run with; warn about the rest
    pub fn validate(&self) -> Result<(), DataError> {
        if self.classes.is_empty() {
            return Err(DataError::NoClasses);
        }
        if !self.general_abilities.contains_key(&AbilityId::from(AUTO_ATTACK)) {
            return Err(DataError::MissingAutoAttack);
        }

        for class in self.classes.values() {
            if class.specs.is_empty() {
                return Err(DataError::ClassWithoutSpecs(class.id.clone()));
            }
            for (stat, value) in &class.growth {
                if *value < 0.0 {
                    return Err(DataError::NegativeGrowth {
                        class: class.id.clone(),
                        stat: stat.clone(),
                    });
                }
            }
            for ability in &class.abilities {
                if self.class_ability(&class.id, ability).is_none() {
                    return Err(DataError::UnknownClassAbility {
                        class: class.id.clone(),
                        ability: ability.clone(),
                    });
                }
            }
            for tree in &class.talent_trees {
                if !self.trees.contains_key(tree) {
                    return Err(DataError::UnknownTree {
                        class: class.id.clone(),
                        tree: tree.clone(),
                    });
                }
            }
            for key in class.base_stats.keys().chain(class.growth.keys()) {
                stat_kind_or_warn(key, class.id.as_str());
            }
        }

        for tree in self.trees.values() {
            if !self.classes.contains_key(&tree.class) {
                return Err(DataError::TreeForUnknownClass {
                    tree: tree.id.clone(),
                    class: tree.class.clone(),
                });
            }
        }

        let all_abilities = self
            .general_abilities
            .values()
            .chain(self.class_abilities.values().flat_map(|m| m.values()));
        for ability in all_abilities {
            if let Some(application) = &ability.applies_effect {
                if !self.effects.contains_key(&application.effect) {
                    return Err(DataError::UnknownEffect {
                        ability: ability.id.clone(),
                        effect: application.effect.clone(),
                    });
                }
            }
        }

        for enemy in self.enemies.values() {
            if let Some(table) = &enemy.drop_table {
                if !self.drop_tables.contains_key(table) {
                    return Err(DataError::UnknownDropTable {
                        enemy: enemy.id.clone(),
                        table: table.clone(),
                    });
                }
            }
            for ability in &enemy.abilities {
                if !self.general_abilities.contains_key(ability) {
                    warn!(enemy = %enemy.id, %ability, "enemy ability is not a shared ability; it will be skipped");
                }
            }
        }

        for bracket in &self.world.brackets {
            for enemy in &bracket.enemies {
                if !self.enemies.contains_key(enemy) {
                    return Err(DataError::UnknownBracketEnemy(enemy.clone()));
                }
            }
        }

        for item in self.items.values() {
            if let Some(set) = &item.set {
                if !self.sets.contains_key(set) {
                    warn!(item = %item.id, %set, "item belongs to an unknown set");
                }
            }
        }
        for set in self.sets.values() {
            for member in &set.items {
                if !self.items.contains_key(member) {
                    warn!(set = %set.id, item = %member, "set lists an unknown item");
                }
            }
        }

        Ok(())
    }

    // === Lookups ===

    pub fn class(&self, id: &ClassId) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    pub fn spec(&self, class: &ClassId, spec: &SpecId) -> Option<&SpecDef> {
        self.classes.get(class).and_then(|c| c.spec(spec))
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn set(&self, id: &SetId) -> Option<&EquipmentSetDef> {
        self.sets.get(id)
    }

    pub fn gem(&self, id: &GemId) -> Option<&GemDef> {
        self.gems.get(id)
    }

    /// Shared ability table
    pub fn ability(&self, id: &AbilityId) -> Option<&AbilityDef> {
        self.general_abilities.get(id)
    }

    /// Class-specific ability table only
    pub fn class_ability(&self, class: &ClassId, id: &AbilityId) -> Option<&AbilityDef> {
        self.class_abilities.get(class).and_then(|m| m.get(id))
    }

    pub fn effect(&self, id: &EffectId) -> Option<&StatusEffectDef> {
        self.effects.get(id)
    }

    pub fn enemy(&self, id: &EnemyId) -> Option<&EnemyDef> {
        self.enemies.get(id)
    }

    pub fn drop_table(&self, id: &DropTableId) -> Option<&DropTable> {
        self.drop_tables.get(id)
    }

    pub fn tree(&self, id: &TreeId) -> Option<&TalentTreeDef> {
        self.trees.get(id)
    }

    pub fn talent(&self, tree: &TreeId, talent: &TalentId) -> Option<&TalentDef> {
        self.trees.get(tree).and_then(|t| t.talent(talent))
    }

    pub fn prestige_bonus(&self, id: &str) -> Option<&PrestigeBonusDef> {
        self.progression.prestige.bonuses.iter().find(|b| b.id == id)
    }

    pub fn achievements(&self) -> &[AchievementDef] {
        &self.progression.achievements
    }
}

fn index_by<K, V, M>(values: Vec<V>, key: impl Fn(&V) -> K) -> M
where
    K: std::hash::Hash + Eq + std::fmt::Display,
    M: FromIterator<(K, V)>,
{
    let mut map = HashMap::with_capacity(values.len());
    for value in values {
        let k = key(&value);
        if map.contains_key(&k) {
            warn!(id = %k, "duplicate definition; the later one wins");
        }
        map.insert(k, value);
    }
    map.into_iter().collect()
}

/// Parse a stat name from the data files, logging and skipping unknown names
pub(crate) fn stat_kind_or_warn(key: &str, context: &str) -> Option<StatKind> {
    match key.parse::<StatKind>() {
        Ok(kind) => Some(kind),
        Err(_) => {
            warn!(stat = key, source = context, "unknown stat key ignored");
            None
        }
    }
}
