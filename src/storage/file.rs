//! File-backed draft storage.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ApplicantId, DraftStore};
use crate::error::Result;

/// Draft storage rooted in the Fiberline data directory.
///
/// Each applicant gets a directory under `<data-root>/drafts/<hash>/`; each
/// slot is one YAML file inside it.
#[derive(Debug)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    /// Resolve the Fiberline data root.
    ///
    /// `FIBERLINE_HOME` overrides the default of `~/.fiberline`.
    pub fn data_root() -> PathBuf {
        if let Some(home) = std::env::var_os("FIBERLINE_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(".fiberline")
    }

    /// Open the store for an applicant under the default data root.
    pub fn for_applicant(id: &ApplicantId) -> Self {
        Self {
            dir: Self::data_root().join("drafts").join(id.hash()),
        }
    }

    /// Open the store at an explicit directory (for testing).
    pub fn at_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding this applicant's slots.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove the whole applicant directory, discarding every slot.
    pub fn clear_all(&mut self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.yml", slot))
    }
}

impl DraftStore for FileDraftStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Atomic write: write to a temp file, then rename. Prevents a corrupt
    /// slot if the process dies mid-write.
    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> FileDraftStore {
        FileDraftStore::at_dir(temp.path().join("drafts").join("abc"))
    }

    #[test]
    fn get_missing_slot_returns_none() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.get("draft").unwrap().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set("draft", "version: 1").unwrap();
        assert_eq!(store.get("draft").unwrap().as_deref(), Some("version: 1"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set("step", "3").unwrap();
        store.set("step", "4").unwrap();
        assert_eq!(store.get("step").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn set_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set("draft", "data").unwrap();
        let temp_path = store.slot_path("draft").with_extension("yml.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn remove_deletes_slot() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set("draft", "data").unwrap();
        store.remove("draft").unwrap();
        assert!(store.get("draft").unwrap().is_none());
    }

    #[test]
    fn remove_missing_slot_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        store.remove("never-written").unwrap();
    }

    #[test]
    fn clear_all_removes_directory() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set("draft", "data").unwrap();
        store.set("step", "2").unwrap();
        store.clear_all().unwrap();

        assert!(!store.dir().exists());
        assert!(store.get("draft").unwrap().is_none());
    }

    #[test]
    fn slots_are_independent() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        store.set("draft", "a").unwrap();
        store.set("step", "b").unwrap();
        store.remove("draft").unwrap();

        assert!(store.get("draft").unwrap().is_none());
        assert_eq!(store.get("step").unwrap().as_deref(), Some("b"));
    }
}
