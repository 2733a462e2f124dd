//! One-time seeding of an empty store from a JSON document.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::{Cat, CatError, CatStore, SeedError, SeedOutcome};
use crate::metrics::CATS_SEEDED_TOTAL;

/// Shape of one seed entry. Everything but `url` and `name` may be omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedRecord {
    #[serde(default)]
    id: Option<String>,
    url: String,
    #[serde(default)]
    source_url: Option<String>,
    name: String,
    #[serde(default)]
    loves: u32,
    #[serde(default)]
    hates: u32,
}

impl From<SeedRecord> for Cat {
    fn from(record: SeedRecord) -> Self {
        Self {
            id: record
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            url: record.url,
            source_url: record.source_url,
            name: record.name,
            loves: record.loves,
            hates: record.hates,
        }
    }
}

/// Parse a seed document: a JSON array of cat objects. Blank input is an
/// empty array. Entries without an id get a fresh one.
pub fn parse_seed_str(contents: &str) -> Result<Vec<Cat>, SeedError> {
    parse_seed_entries(contents).map(|(cats, _)| cats)
}

/// Like [`parse_seed_str`], also counting the entries that were given a
/// generated id.
pub(crate) fn parse_seed_entries(contents: &str) -> Result<(Vec<Cat>, usize), SeedError> {
    if contents.trim().is_empty() {
        return Ok((Vec::new(), 0));
    }

    let records: Vec<SeedRecord> =
        serde_json::from_str(contents).map_err(|e| SeedError::Parse(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut cats = Vec::with_capacity(records.len());
    let mut generated = 0;
    for record in records {
        if record.id.as_deref().map_or(true, str::is_empty) {
            generated += 1;
        }
        let cat = Cat::from(record);
        if !seen.insert(cat.id.clone()) {
            return Err(SeedError::DuplicateId(cat.id));
        }
        cats.push(cat);
    }
    Ok((cats, generated))
}

/// Read and parse a seed document from any byte stream.
pub fn parse_seed<R: Read>(mut reader: R) -> Result<Vec<Cat>, SeedError> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|e| SeedError::Io(e.to_string()))?;
    parse_seed_str(&contents)
}

/// Seed `store` from `source` if the store is empty.
///
/// A populated store is left alone without reading the source. Malformed
/// input fails before anything is inserted, and the insert itself is atomic,
/// so the store is never left partially seeded.
pub fn seed_store<R: Read>(store: &dyn CatStore, source: R) -> Result<SeedOutcome, SeedError> {
    if !store.is_empty().map_err(storage_error)? {
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let cats = parse_seed(source)?;
    if cats.is_empty() {
        return Ok(SeedOutcome::EmptySource);
    }

    let inserted = store.insert_many(&cats).map_err(storage_error)?;
    CATS_SEEDED_TOTAL.inc_by(inserted as u64);
    Ok(SeedOutcome::Seeded(inserted))
}

fn storage_error(e: CatError) -> SeedError {
    SeedError::Storage(e.to_string())
}

/// Run-once gate around [`seed_store`] for a seed file.
///
/// The first caller performs the seed while concurrent callers wait on it;
/// later calls return the recorded outcome. A failed attempt is not recorded,
/// so the next caller tries again.
pub struct SeedLoader {
    source: Option<PathBuf>,
    outcome: OnceCell<SeedOutcome>,
}

impl SeedLoader {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            outcome: OnceCell::new(),
        }
    }

    /// A loader with no seed source: the store starts with whatever it holds.
    pub fn disabled() -> Self {
        Self {
            source: None,
            outcome: OnceCell::new(),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Outcome of the completed seed run, if any.
    pub fn outcome(&self) -> Option<SeedOutcome> {
        self.outcome.get().copied()
    }

    /// Seed `store` unless that already happened.
    pub async fn ensure_seeded(&self, store: &dyn CatStore) -> Result<SeedOutcome, SeedError> {
        self.outcome
            .get_or_try_init(|| async { self.run(store) })
            .await
            .copied()
    }

    fn run(&self, store: &dyn CatStore) -> Result<SeedOutcome, SeedError> {
        let Some(path) = self.source.as_deref() else {
            return Ok(SeedOutcome::EmptySource);
        };

        if !store.is_empty().map_err(storage_error)? {
            info!("Cat store already populated, skipping seed");
            return Ok(SeedOutcome::AlreadyPopulated);
        }

        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Seed file not found, starting with an empty store");
                return Ok(SeedOutcome::EmptySource);
            }
            Err(e) => return Err(SeedError::Io(format!("{}: {}", path.display(), e))),
        };

        let outcome = seed_store(store, std::io::BufReader::new(file))?;
        info!(path = %path.display(), ?outcome, "Seed finished");
        Ok(outcome)
    }
}
