//! Record store trait.

use super::{Cat, CatError, Vote};

/// Durable mapping from cat id to record.
///
/// Implementations must serialize their writes: two concurrent `increment`
/// calls on the same id both land, and readers never see a half-applied
/// mutation. Mutating calls persist before returning, so a successful return
/// means the change survives a restart.
pub trait CatStore: Send + Sync {
    /// Get a cat by id.
    fn get(&self, id: &str) -> Result<Option<Cat>, CatError>;

    /// All cats in insertion order.
    fn list(&self) -> Result<Vec<Cat>, CatError>;

    /// Insert a new cat. Fails with `DuplicateKey` if the id is taken.
    fn insert(&self, cat: &Cat) -> Result<(), CatError>;

    /// Insert a batch of cats atomically: either all land or none do.
    fn insert_many(&self, cats: &[Cat]) -> Result<usize, CatError>;

    /// Number of stored cats.
    fn count(&self) -> Result<usize, CatError>;

    fn is_empty(&self) -> Result<bool, CatError> {
        Ok(self.count()? == 0)
    }

    /// Increment one counter of a cat and return the updated record,
    /// or `None` if the id is unknown.
    fn increment(&self, id: &str, vote: Vote) -> Result<Option<Cat>, CatError>;

    /// Flush in-memory state to durable storage.
    fn save(&self) -> Result<(), CatError>;
}
