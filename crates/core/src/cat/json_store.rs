//! File-backed cat store.
//!
//! The whole collection lives in memory behind one mutex and is rewritten to
//! a single JSON document after every mutation.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::seed::parse_seed_entries;
use super::{Cat, CatError, CatStore, SeedError, Vote};

/// JSON-file-backed cat store.
pub struct JsonCatStore {
    path: PathBuf,
    cats: Mutex<Vec<Cat>>,
}

impl JsonCatStore {
    /// Open the store at `path`. A missing or blank file is an empty store;
    /// anything else must be a valid cat array.
    ///
    /// Entries stored without an id are assigned one and written back before
    /// this returns, so the ids stay the same across restarts.
    pub fn open(path: &Path) -> Result<Self, CatError> {
        let (cats, generated) = match fs::read_to_string(path) {
            Ok(contents) => parse_seed_entries(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Vec::new(), 0),
            Err(e) => return Err(SeedError::Io(format!("{}: {}", path.display(), e)).into()),
        };

        debug!(path = %path.display(), count = cats.len(), "Opened JSON cat store");

        let store = Self {
            path: path.to_path_buf(),
            cats: Mutex::new(cats),
        };
        if generated > 0 {
            info!(path = %path.display(), generated, "Assigned ids to stored cats");
            store.save()?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Cat>>, CatError> {
        self.cats
            .lock()
            .map_err(|_| CatError::Storage("cat store lock poisoned".to_string()))
    }

    /// Write the collection to a sibling temp file and rename it over the
    /// target. Called with the lock held.
    fn flush(&self, cats: &[Cat]) -> Result<(), CatError> {
        let json = serde_json::to_vec_pretty(cats).map_err(|e| CatError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp_path).map_err(|e| self.storage_error(e))?;
        file.write_all(&json).map_err(|e| self.storage_error(e))?;
        file.sync_all().map_err(|e| self.storage_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.storage_error(e))?;

        Ok(())
    }

    fn storage_error(&self, e: std::io::Error) -> CatError {
        CatError::Storage(format!("{}: {}", self.path.display(), e))
    }
}

impl CatStore for JsonCatStore {
    fn get(&self, id: &str) -> Result<Option<Cat>, CatError> {
        let cats = self.lock()?;
        Ok(cats.iter().find(|c| c.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Cat>, CatError> {
        Ok(self.lock()?.clone())
    }

    fn insert(&self, cat: &Cat) -> Result<(), CatError> {
        let mut cats = self.lock()?;
        if cats.iter().any(|c| c.id == cat.id) {
            return Err(CatError::DuplicateKey(cat.id.clone()));
        }

        cats.push(cat.clone());
        if let Err(e) = self.flush(&cats) {
            cats.pop();
            return Err(e);
        }
        Ok(())
    }

    fn insert_many(&self, batch: &[Cat]) -> Result<usize, CatError> {
        let mut cats = self.lock()?;

        let mut seen: HashSet<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        for cat in batch {
            if !seen.insert(cat.id.as_str()) {
                return Err(CatError::DuplicateKey(cat.id.clone()));
            }
        }

        let previous_len = cats.len();
        cats.extend_from_slice(batch);
        if let Err(e) = self.flush(&cats) {
            cats.truncate(previous_len);
            return Err(e);
        }
        Ok(batch.len())
    }

    fn count(&self) -> Result<usize, CatError> {
        Ok(self.lock()?.len())
    }

    fn increment(&self, id: &str, vote: Vote) -> Result<Option<Cat>, CatError> {
        let mut cats = self.lock()?;
        let Some(index) = cats.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        let before = cats[index].clone();
        cats[index].record(vote);
        if let Err(e) = self.flush(&cats) {
            cats[index] = before;
            return Err(e);
        }
        Ok(Some(cats[index].clone()))
    }

    fn save(&self) -> Result<(), CatError> {
        let cats = self.lock()?;
        self.flush(&cats)
    }
}
