//! Types for the cat catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A cat record with its vote counters.
///
/// Serialized with camelCase field names, which is also the layout of the
/// JSON store and the seed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    /// Opaque identifier (UUID v4 for cats created here).
    pub id: String,
    /// Location of the cat's image.
    pub url: String,
    /// Where the image came from (descriptive only).
    #[serde(default)]
    pub source_url: Option<String>,
    /// Display name, also used as the downloaded image's file stem.
    pub name: String,
    #[serde(default)]
    pub loves: u32,
    #[serde(default)]
    pub hates: u32,
}

impl Cat {
    /// Create a cat with a freshly generated id and zeroed counters.
    pub fn create(new_cat: NewCat) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: new_cat.url,
            source_url: new_cat.source_url,
            name: new_cat.name,
            loves: 0,
            hates: 0,
        }
    }

    /// Counter value for the given vote.
    pub fn votes(&self, vote: Vote) -> u32 {
        match vote {
            Vote::Love => self.loves,
            Vote::Hate => self.hates,
        }
    }

    /// Bump the counter for the given vote by one.
    pub fn record(&mut self, vote: Vote) {
        match vote {
            Vote::Love => self.loves = self.loves.saturating_add(1),
            Vote::Hate => self.hates = self.hates.saturating_add(1),
        }
    }
}

/// Request body for adding a cat.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCat {
    pub url: String,
    #[serde(default)]
    pub source_url: Option<String>,
    pub name: String,
}

impl NewCat {
    pub fn new(url: impl Into<String>, source_url: Option<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_url,
            name: name.into(),
        }
    }

    /// Reject blank urls and names.
    pub fn validate(&self) -> Result<(), CatError> {
        if self.url.trim().is_empty() {
            return Err(CatError::Invalid("url must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CatError::Invalid("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Which counter a vote increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Love,
    Hate,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Love => "love",
            Vote::Hate => "hate",
        }
    }
}

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had records; nothing was read.
    AlreadyPopulated,
    /// The seed source held no records (or did not exist).
    EmptySource,
    /// This many records were inserted.
    Seeded(usize),
}

/// Errors for the seed loader. All of these abort startup.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed source: {0}")]
    Io(String),

    #[error("Malformed seed document: {0}")]
    Parse(String),

    #[error("Duplicate cat id in seed document: {0}")]
    DuplicateId(String),

    #[error("Failed to store seed records: {0}")]
    Storage(String),
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatError {
    #[error("Cat id already exists: {0}")]
    DuplicateKey(String),

    #[error("Invalid cat: {0}")]
    Invalid(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Seed(#[from] SeedError),
}
