//! Party - ordered, bounded list of heroes

use super::{Hero, HeroError};
use crate::types::HeroId;

#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    heroes: Vec<Hero>,
    max_size: usize,
}

impl Party {
    pub fn new(max_size: usize) -> Self {
        Party {
            heroes: Vec::new(),
            max_size,
        }
    }

    pub fn add_hero(&mut self, hero: Hero) -> Result<(), HeroError> {
        if self.heroes.len() >= self.max_size {
            return Err(HeroError::PartyFull(self.max_size));
        }
        if self.contains(hero.id) {
            return Err(HeroError::DuplicateHero(hero.id));
        }
        self.heroes.push(hero);
        Ok(())
    }

    pub fn remove_hero(&mut self, id: HeroId) -> Result<Hero, HeroError> {
        let index = self
            .heroes
            .iter()
            .position(|h| h.id == id)
            .ok_or(HeroError::UnknownHero(id))?;
        Ok(self.heroes.remove(index))
    }

    pub fn get(&self, id: HeroId) -> Option<&Hero> {
        self.heroes.iter().find(|h| h.id == id)
    }

    pub fn get_mut(&mut self, id: HeroId) -> Option<&mut Hero> {
        self.heroes.iter_mut().find(|h| h.id == id)
    }

    pub fn contains(&self, id: HeroId) -> bool {
        self.heroes.iter().any(|h| h.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hero> {
        self.heroes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Hero> {
        self.heroes.iter_mut()
    }

    pub fn ids(&self) -> Vec<HeroId> {
        self.heroes.iter().map(|h| h.id).collect()
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    /// Replace all heroes, keeping at most `max_size` of them
    pub(crate) fn replace(&mut self, mut heroes: Vec<Hero>) {
        heroes.truncate(self.max_size);
        self.heroes = heroes;
    }
}
