//! Crate-wide error for callers that want a single type

use crate::ability::AbilityError;
use crate::combat::CombatError;
use crate::config::ConfigError;
use crate::data::DataError;
use crate::economy::EconomyError;
use crate::hero::HeroError;
use crate::loot::LootError;
use crate::prestige::PrestigeError;
use crate::save::SaveError;
use crate::status::StatusError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Hero(#[from] HeroError),
    #[error(transparent)]
    Ability(#[from] AbilityError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Combat(#[from] CombatError),
    #[error(transparent)]
    Loot(#[from] LootError),
    #[error(transparent)]
    Economy(#[from] EconomyError),
    #[error(transparent)]
    Prestige(#[from] PrestigeError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
