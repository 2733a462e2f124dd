//! Catalog service: the operations behind the HTTP API.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use super::{Cat, CatError, CatStore, NewCat, SeedLoader, SeedOutcome, Vote};
use crate::image::ImageFetcher;
use crate::metrics::{CATS_ADDED_TOTAL, CAT_VOTES_TOTAL, IMAGE_DOWNLOADS_TOTAL};

/// Attempts at generating an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 3;

/// Catalog operations exposed to the boundary layer.
///
/// Lookups by an unknown id are not errors: they come back as `None` or
/// `false` and the caller decides how to report them.
#[async_trait]
pub trait CatService: Send + Sync {
    /// Run the one-time seed. Calling this again returns the first outcome.
    async fn initialize(&self) -> Result<SeedOutcome, CatError>;

    async fn get_cat(&self, id: &str) -> Result<Option<Cat>, CatError>;

    /// All cats, either by (loves desc, hates desc) or shuffled.
    async fn list_cats(&self, randomize: bool) -> Result<Vec<Cat>, CatError>;

    /// Store a new cat with a fresh id and zero counters.
    async fn add_cat(&self, new_cat: NewCat) -> Result<Cat, CatError>;

    /// Increment `loves`. Returns the updated cat, or `None` if unknown.
    async fn add_love(&self, id: &str) -> Result<Option<Cat>, CatError>;

    /// Increment `hates`. Returns the updated cat, or `None` if unknown.
    async fn add_hate(&self, id: &str) -> Result<Option<Cat>, CatError>;

    /// Download the cat's image to local disk.
    ///
    /// Returns `false` for an unknown id or a failed download.
    async fn download_image(&self, id: &str) -> Result<bool, CatError>;
}

/// [`CatService`] over a record store, a seed loader and an image fetcher.
pub struct CatalogService {
    store: Arc<dyn CatStore>,
    seeder: SeedLoader,
    images: Arc<dyn ImageFetcher>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatStore>, seeder: SeedLoader, images: Arc<dyn ImageFetcher>) -> Self {
        Self {
            store,
            seeder,
            images,
        }
    }

    async fn ensure_seeded(&self) -> Result<SeedOutcome, CatError> {
        Ok(self.seeder.ensure_seeded(self.store.as_ref()).await?)
    }

    async fn vote(&self, id: &str, vote: Vote) -> Result<Option<Cat>, CatError> {
        self.ensure_seeded().await?;

        let updated = self.store.increment(id, vote)?;
        match &updated {
            Some(cat) => {
                CAT_VOTES_TOTAL.with_label_values(&[vote.as_str()]).inc();
                debug!(
                    cat_id = %id,
                    vote = vote.as_str(),
                    total = cat.votes(vote),
                    "Vote recorded"
                );
            }
            None => debug!(cat_id = %id, vote = vote.as_str(), "Vote for unknown cat"),
        }
        Ok(updated)
    }
}

/// Order by loves descending, then hates descending. The sort is stable, so
/// equal pairs keep insertion order.
fn rank(cats: &mut [Cat]) {
    cats.sort_by(|a, b| b.loves.cmp(&a.loves).then_with(|| b.hates.cmp(&a.hates)));
}

#[async_trait]
impl CatService for CatalogService {
    async fn initialize(&self) -> Result<SeedOutcome, CatError> {
        let outcome = self.ensure_seeded().await?;
        info!(?outcome, cats = self.store.count()?, "Catalog ready");
        Ok(outcome)
    }

    async fn get_cat(&self, id: &str) -> Result<Option<Cat>, CatError> {
        self.ensure_seeded().await?;
        self.store.get(id)
    }

    async fn list_cats(&self, randomize: bool) -> Result<Vec<Cat>, CatError> {
        self.ensure_seeded().await?;

        let mut cats = self.store.list()?;
        if randomize {
            cats.shuffle(&mut rand::rng());
        } else {
            rank(&mut cats);
        }
        Ok(cats)
    }

    async fn add_cat(&self, new_cat: NewCat) -> Result<Cat, CatError> {
        new_cat.validate()?;
        self.ensure_seeded().await?;

        let mut last_err = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            let cat = Cat::create(new_cat.clone());
            match self.store.insert(&cat) {
                Ok(()) => {
                    CATS_ADDED_TOTAL.inc();
                    info!(cat_id = %cat.id, name = %cat.name, "Cat added");
                    return Ok(cat);
                }
                Err(CatError::DuplicateKey(id)) => {
                    warn!(cat_id = %id, "Generated id already taken, retrying");
                    last_err = Some(CatError::DuplicateKey(id));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| CatError::Storage("Could not allocate an id".to_string())))
    }

    async fn add_love(&self, id: &str) -> Result<Option<Cat>, CatError> {
        self.vote(id, Vote::Love).await
    }

    async fn add_hate(&self, id: &str) -> Result<Option<Cat>, CatError> {
        self.vote(id, Vote::Hate).await
    }

    async fn download_image(&self, id: &str) -> Result<bool, CatError> {
        self.ensure_seeded().await?;

        let Some(cat) = self.store.get(id)? else {
            IMAGE_DOWNLOADS_TOTAL.with_label_values(&["not_found"]).inc();
            debug!(cat_id = %id, "Image requested for unknown cat");
            return Ok(false);
        };

        let start = Instant::now();
        match self.images.fetch(&cat).await {
            Ok(path) => {
                IMAGE_DOWNLOADS_TOTAL.with_label_values(&["success"]).inc();
                info!(
                    cat_id = %id,
                    path = %path.display(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Image downloaded"
                );
                Ok(true)
            }
            Err(e) => {
                IMAGE_DOWNLOADS_TOTAL.with_label_values(&["failed"]).inc();
                warn!(cat_id = %id, url = %cat.url, error = %e, "Image download failed");
                Ok(false)
            }
        }
    }
}
