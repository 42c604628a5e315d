//! Progression - experience, level-ups and talent points

use crate::data::DataTables;
use crate::hero::{Hero, HeroError};
use crate::types::{HeroId, TalentId, TreeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a single experience grant did to a hero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub hero_id: HeroId,
    pub old_level: u32,
    pub new_level: u32,
    pub talent_points_gained: u32,
}

impl LevelUpReport {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// Experience required to go from `level` to `level + 1`
pub fn experience_needed(level: u32, tables: &DataTables) -> u64 {
    tables.progression.experience.needed(level)
}

/// Add experience and take every level-up it pays for
///
/// Leftover experience carries over. At the level cap experience still
/// accumulates but no further levels are granted.
pub fn grant_experience(hero: &mut Hero, amount: u64, tables: &DataTables) -> LevelUpReport {
    let curve = &tables.progression.experience;
    let old_level = hero.level;
    hero.experience = hero.experience.saturating_add(amount);

    let mut talent_points_gained = 0;
    while hero.level < curve.level_cap {
        let needed = curve.needed(hero.level);
        if hero.experience < needed {
            break;
        }
        hero.experience -= needed;
        hero.level += 1;
        talent_points_gained += curve.talent_points_per_level;
    }
    hero.available_talent_points += talent_points_gained;

    if hero.level > old_level {
        info!(
            hero = %hero.id,
            from = old_level,
            to = hero.level,
            talent_points = hero.available_talent_points,
            "level up"
        );
    }
    LevelUpReport {
        hero_id: hero.id,
        old_level,
        new_level: hero.level,
        talent_points_gained,
    }
}

/// Spend one talent point, returning the talent's new rank
pub fn allocate_talent(
    hero: &mut Hero,
    tree_id: &TreeId,
    talent_id: &TalentId,
    tables: &DataTables,
) -> Result<u32, HeroError> {
    let belongs = tables
        .class(&hero.class_id)
        .is_some_and(|class| class.talent_trees.contains(tree_id));
    let tree = tables
        .tree(tree_id)
        .filter(|tree| belongs && tree.class == hero.class_id)
        .ok_or_else(|| HeroError::TreeNotForClass {
            tree: tree_id.clone(),
            class: hero.class_id.clone(),
        })?;
    let talent = tree
        .talent(talent_id)
        .ok_or_else(|| HeroError::UnknownTalent {
            tree: tree_id.clone(),
            talent: talent_id.clone(),
        })?;

    if hero.available_talent_points == 0 {
        return Err(HeroError::NoTalentPoints);
    }
    let rank = hero.talent_rank(tree_id, talent_id);
    if rank >= talent.max_rank {
        return Err(HeroError::MaxRank(talent_id.clone()));
    }
    let spent = hero.points_in_tree(tree_id);
    if spent < talent.required_tree_points {
        return Err(HeroError::TreeRequirement {
            required: talent.required_tree_points,
            spent,
        });
    }

    hero.talents
        .entry(tree_id.clone())
        .or_default()
        .insert(talent_id.clone(), rank + 1);
    hero.available_talent_points -= 1;
    debug!(hero = %hero.id, tree = %tree_id, talent = %talent_id, rank = rank + 1, "talent allocated");
    Ok(rank + 1)
}

/// Refund every spent point; returns how many came back
pub fn reset_talents(hero: &mut Hero) -> u32 {
    let refunded = hero.spent_talent_points();
    hero.talents.clear();
    hero.available_talent_points += refunded;
    debug!(hero = %hero.id, refunded, "talents reset");
    refunded
}
