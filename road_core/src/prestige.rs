//! Prestige - trade the run's progress for permanent bonuses

use crate::data::DataTables;
use crate::economy::Economy;
use crate::hero::{unequip, GemStash, Party};
use crate::loot::Inventory;
use crate::stat_block::StatAggregator;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrestigeError {
    #[error("Prestige needs mile {required}, furthest reached is {max_mile}")]
    NotEligible { max_mile: u32, required: u32 },
    #[error("Unknown prestige bonus {0}")]
    UnknownBonus(String),
    #[error("Bonus costs {cost} points, {available} available")]
    NotEnoughPoints { cost: u32, available: u32 },
    #[error("Bonus {0} is already at max rank")]
    MaxRank(String),
}

/// Progress that survives a prestige
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrestigeState {
    #[serde(default)]
    pub level: u32,
    /// Unspent points
    #[serde(default)]
    pub points: u32,
    /// Bonus id -> purchased rank
    #[serde(default)]
    pub bonuses: BTreeMap<String, u32>,
}

impl PrestigeState {
    pub fn bonus_rank(&self, bonus_id: &str) -> u32 {
        self.bonuses.get(bonus_id).copied().unwrap_or(0)
    }
}

/// Everything a prestige wipes
pub struct PrestigeReset<'a> {
    pub party: &'a mut Party,
    pub world: &'a mut WorldState,
    pub economy: &'a mut Economy,
    pub inventory: &'a mut Inventory,
    /// Gems socketed in wiped equipment land here
    pub gems: &'a mut GemStash,
}

pub fn can_prestige(world: &WorldState, tables: &DataTables) -> bool {
    world.max_mile >= tables.progression.prestige.min_mile
}

/// `floor(max_mile / miles_per_point)`
pub fn prestige_points_for(world: &WorldState, tables: &DataTables) -> u32 {
    match tables.progression.prestige.miles_per_point {
        0 => 0,
        per_point => world.max_mile / per_point,
    }
}

/// Grant points and reset the run; returns the points granted
///
/// Heroes go back to level 1 with no experience, talents or equipment and
/// full health under the new bonuses. Prestige state and statistics stay.
pub fn perform_prestige(
    state: &mut PrestigeState,
    reset: PrestigeReset<'_>,
    tables: &Arc<DataTables>,
) -> Result<u32, PrestigeError> {
    if !can_prestige(reset.world, tables) {
        return Err(PrestigeError::NotEligible {
            max_mile: reset.world.max_mile,
            required: tables.progression.prestige.min_mile,
        });
    }

    let granted = prestige_points_for(reset.world, tables);
    state.points += granted;
    state.level += 1;

    let aggregator = StatAggregator::new(tables.clone());
    for hero in reset.party.iter_mut() {
        let slots: Vec<_> = hero.equipment.keys().copied().collect();
        for slot in slots {
            if let Err(err) = unequip(hero, slot, reset.gems) {
                warn!(hero = %hero.id, error = %err, "unequip during prestige failed");
            }
        }
        hero.level = 1;
        hero.experience = 0;
        hero.talents.clear();
        hero.available_talent_points = 0;
        hero.current_health = aggregator.resolve(hero, state).max_health;
    }
    reset.world.reset(&tables.world);
    reset.economy.gold = 0;
    reset.inventory.clear();

    info!(level = state.level, granted, points = state.points, "prestige performed");
    Ok(granted)
}

/// Buy one rank of a bonus; returns the new rank
pub fn purchase_bonus(
    state: &mut PrestigeState,
    bonus_id: &str,
    tables: &DataTables,
) -> Result<u32, PrestigeError> {
    let bonus = tables
        .prestige_bonus(bonus_id)
        .ok_or_else(|| PrestigeError::UnknownBonus(bonus_id.to_string()))?;
    let rank = state.bonus_rank(bonus_id);
    if rank >= bonus.max_rank {
        return Err(PrestigeError::MaxRank(bonus_id.to_string()));
    }
    if state.points < bonus.cost {
        return Err(PrestigeError::NotEnoughPoints {
            cost: bonus.cost,
            available: state.points,
        });
    }
    state.points -= bonus.cost;
    state.bonuses.insert(bonus_id.to_string(), rank + 1);
    info!(bonus = bonus_id, rank = rank + 1, points = state.points, "prestige bonus purchased");
    Ok(rank + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::{equip, HeroFactory};
    use crate::loot::InventoryItem;
    use crate::types::{EquipmentSlot, Rarity};

    fn world_at(mile: u32) -> WorldState {
        WorldState {
            current_mile: mile,
            max_mile: mile,
            ..Default::default()
        }
    }

    #[test]
    fn test_eligibility_and_points() {
        let tables = DataTables::builtin().unwrap();
        assert!(!can_prestige(&world_at(19), &tables));
        assert!(can_prestige(&world_at(20), &tables));
        assert_eq!(prestige_points_for(&world_at(20), &tables), 2);
        assert_eq!(prestige_points_for(&world_at(39), &tables), 3);
    }

    #[test]
    fn test_perform_prestige_resets_run() {
        let tables = Arc::new(DataTables::builtin().unwrap());
        let mut party = Party::new(5);
        let mut hero = HeroFactory::new(tables.clone())
            .create(&"warrior".into(), &"arms".into(), 5, "Brom")
            .unwrap();
        let mut gems = GemStash::new();
        let ruby = gems.add("ruby".into());
        equip(&mut hero, EquipmentSlot::Weapon, &"iron_sword".into(), &tables, &mut gems).unwrap();
        crate::hero::socket_gem(&mut hero, EquipmentSlot::Weapon, 0, ruby, &mut gems).unwrap();
        hero.experience = 50;
        hero.available_talent_points = 4;
        party.add_hero(hero).unwrap();

        let mut world = world_at(25);
        let mut economy = Economy::new(500);
        let mut inventory = Inventory::new(5);
        inventory
            .add(InventoryItem {
                item_id: "rusty_sword".into(),
                quality: Rarity::Common,
            })
            .unwrap();
        let mut state = PrestigeState::default();

        let granted = perform_prestige(
            &mut state,
            PrestigeReset {
                party: &mut party,
                world: &mut world,
                economy: &mut economy,
                inventory: &mut inventory,
                gems: &mut gems,
            },
            &tables,
        )
        .unwrap();

        assert_eq!(granted, 2);
        assert_eq!(state.points, 2);
        assert_eq!(state.level, 1);
        assert_eq!(world.max_mile, 0);
        assert_eq!(economy.gold, 0);
        assert!(inventory.is_empty());
        // Socketed gem survived in the stash
        assert!(gems.contains(ruby));

        let hero = &party.heroes()[0];
        assert_eq!(hero.level, 1);
        assert_eq!(hero.experience, 0);
        assert_eq!(hero.available_talent_points, 0);
        assert!(hero.equipment.is_empty());
        assert!(hero.current_health > 0.0);
    }

    #[test]
    fn test_prestige_requires_distance() {
        let tables = Arc::new(DataTables::builtin().unwrap());
        let mut state = PrestigeState::default();
        let mut world = world_at(3);
        let result = perform_prestige(
            &mut state,
            PrestigeReset {
                party: &mut Party::new(5),
                world: &mut world,
                economy: &mut Economy::new(10),
                inventory: &mut Inventory::new(5),
                gems: &mut GemStash::new(),
            },
            &tables,
        );
        assert_eq!(
            result,
            Err(PrestigeError::NotEligible {
                max_mile: 3,
                required: 20
            })
        );
        assert_eq!(state, PrestigeState::default());
        assert_eq!(world.max_mile, 3);
    }

    #[test]
    fn test_purchase_bonus() {
        let tables = DataTables::builtin().unwrap();
        let mut state = PrestigeState {
            points: 3,
            ..Default::default()
        };

        assert_eq!(purchase_bonus(&mut state, "precision", &tables), Ok(1));
        assert_eq!(state.points, 1);
        assert_eq!(
            purchase_bonus(&mut state, "precision", &tables),
            Err(PrestigeError::NotEnoughPoints {
                cost: 2,
                available: 1
            })
        );
        assert_eq!(
            purchase_bonus(&mut state, "luck", &tables),
            Err(PrestigeError::UnknownBonus("luck".to_string()))
        );
        assert_eq!(purchase_bonus(&mut state, "might", &tables), Ok(1));
        assert_eq!(state.points, 0);
    }

    #[test]
    fn test_purchase_stops_at_max_rank() {
        let tables = DataTables::builtin().unwrap();
        let mut state = PrestigeState {
            points: 100,
            ..Default::default()
        };
        for _ in 0..5 {
            purchase_bonus(&mut state, "precision", &tables).unwrap();
        }
        assert_eq!(
            purchase_bonus(&mut state, "precision", &tables),
            Err(PrestigeError::MaxRank("precision".to_string()))
        );
        assert_eq!(state.points, 90);
    }
}
