//! Save slot storage backends

use super::{SaveData, SaveError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Where save slots live
pub trait SaveRepository: Send + Sync {
    fn write(&self, slot: u32, data: &SaveData) -> Result<(), SaveError>;

    /// `None` for an empty slot
    fn read(&self, slot: u32) -> Result<Option<SaveData>, SaveError>;

    /// Deleting an empty slot is not an error
    fn delete(&self, slot: u32) -> Result<(), SaveError>;

    /// Occupied slots, ascending
    fn slots(&self) -> Result<Vec<u32>, SaveError>;
}

/// One pretty-printed JSON file per slot: `slot_{n}.json`
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, SaveError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(FileSaveRepository { base_dir })
    }

    fn slot_path(&self, slot: u32) -> PathBuf {
        self.base_dir.join(format!("slot_{}.json", slot))
    }
}

impl SaveRepository for FileSaveRepository {
    fn write(&self, slot: u32, data: &SaveData) -> Result<(), SaveError> {
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, data.to_json()?)?;
        // Atomic rename
        fs::rename(&temp_path, &path)?;
        debug!(slot, path = %path.display(), "slot written");
        Ok(())
    }

    fn read(&self, slot: u32) -> Result<Option<SaveData>, SaveError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let data = SaveData::from_json(&content)?;
        debug!(slot, path = %path.display(), "slot read");
        Ok(Some(data))
    }

    fn delete(&self, slot: u32) -> Result<(), SaveError> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(slot, "slot deleted");
        }
        Ok(())
    }

    fn slots(&self) -> Result<Vec<u32>, SaveError> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let slot = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix("slot_"))
                .and_then(|name| name.strip_suffix(".json"))
                .and_then(|n| n.parse::<u32>().ok());
            if let Some(slot) = slot {
                slots.push(slot);
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }
}

/// Slots kept in memory; for tests and throwaway runs
#[derive(Default)]
pub struct InMemorySaveRepository {
    slots: RwLock<BTreeMap<u32, SaveData>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn write(&self, slot: u32, data: &SaveData) -> Result<(), SaveError> {
        let mut slots = self.slots.write().map_err(|_| SaveError::LockPoisoned)?;
        slots.insert(slot, data.clone());
        Ok(())
    }

    fn read(&self, slot: u32) -> Result<Option<SaveData>, SaveError> {
        let slots = self.slots.read().map_err(|_| SaveError::LockPoisoned)?;
        Ok(slots.get(&slot).cloned())
    }

    fn delete(&self, slot: u32) -> Result<(), SaveError> {
        let mut slots = self.slots.write().map_err(|_| SaveError::LockPoisoned)?;
        slots.remove(&slot);
        Ok(())
    }

    fn slots(&self) -> Result<Vec<u32>, SaveError> {
        let slots = self.slots.read().map_err(|_| SaveError::LockPoisoned)?;
        Ok(slots.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(gold: u64) -> SaveData {
        let mut data = SaveData::default();
        data.economy.gold = gold;
        data
    }

    #[test]
    fn test_file_repository_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();

        assert!(repo.read(1).unwrap().is_none());
        repo.write(2, &data(10)).unwrap();
        repo.write(1, &data(20)).unwrap();

        assert_eq!(repo.read(2).unwrap().unwrap().economy.gold, 10);
        assert_eq!(repo.slots().unwrap(), vec![1, 2]);
        // No temp files left behind
        assert!(!dir.path().join("slot_1.json.tmp").exists());

        repo.delete(2).unwrap();
        repo.delete(2).unwrap();
        assert_eq!(repo.slots().unwrap(), vec![1]);
    }

    #[test]
    fn test_file_repository_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("slot_3.json"), "not json").unwrap();
        assert!(matches!(repo.read(3), Err(SaveError::Json(_))));
    }

    #[test]
    fn test_memory_repository() {
        let repo = InMemorySaveRepository::new();
        repo.write(3, &data(5)).unwrap();
        assert_eq!(repo.read(3).unwrap().unwrap().economy.gold, 5);
        assert_eq!(repo.slots().unwrap(), vec![3]);
        repo.delete(3).unwrap();
        assert!(repo.read(3).unwrap().is_none());
    }
}
