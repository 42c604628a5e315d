//! Lifetime statistics and the achievements unlocked from them

use crate::data::{AchievementCondition, DataTables};
use crate::hero::Party;
use crate::prestige::PrestigeState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Counters kept across prestiges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub enemies_defeated: u64,
    #[serde(default)]
    pub combats_won: u64,
    #[serde(default)]
    pub combats_lost: u64,
    #[serde(default)]
    pub combats_retreated: u64,
    #[serde(default)]
    pub total_gold_earned: u64,
    #[serde(default)]
    pub total_experience_earned: u64,
    #[serde(default)]
    pub highest_mile: u32,
    /// Ids of unlocked achievements
    #[serde(default)]
    pub achievements: BTreeSet<String>,
}

impl Statistics {
    pub fn record_mile(&mut self, mile: u32) {
        self.highest_mile = self.highest_mile.max(mile);
    }

    pub fn is_unlocked(&self, achievement_id: &str) -> bool {
        self.achievements.contains(achievement_id)
    }
}

fn condition_met(
    condition: &AchievementCondition,
    stats: &Statistics,
    party: &Party,
    prestige: &PrestigeState,
) -> bool {
    match condition {
        AchievementCondition::ReachMile { mile } => stats.highest_mile >= *mile,
        AchievementCondition::EnemiesDefeated { count } => stats.enemies_defeated >= *count,
        AchievementCondition::HeroLevel { level } => party.iter().any(|h| h.level >= *level),
        AchievementCondition::GoldEarned { amount } => stats.total_gold_earned >= *amount,
        AchievementCondition::PrestigeLevel { level } => prestige.level >= *level,
    }
}

/// Unlock every achievement whose condition now holds; returns the new ones
pub fn check_achievements(
    stats: &mut Statistics,
    party: &Party,
    prestige: &PrestigeState,
    tables: &DataTables,
) -> Vec<String> {
    let mut unlocked = Vec::new();
    for achievement in tables.achievements() {
        if stats.is_unlocked(&achievement.id) {
            continue;
        }
        if condition_met(&achievement.condition, stats, party, prestige) {
            info!(achievement = %achievement.id, name = %achievement.name, "achievement unlocked");
            unlocked.push(achievement.id.clone());
        }
    }
    stats.achievements.extend(unlocked.iter().cloned());
    unlocked
}
