//! Mock image fetcher for testing.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::cat::Cat;
use crate::image::{image_file_name, ImageError, ImageFetcher};

/// Image fetcher that records requests instead of downloading.
///
/// Succeeds by default with `<download_dir>/<file name>`, without writing
/// anything. Call [`MockImageFetcher::fail_with`] to make every fetch fail.
pub struct MockImageFetcher {
    download_dir: PathBuf,
    failure: Mutex<Option<String>>,
    fetched: Mutex<Vec<String>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self {
            download_dir: PathBuf::from("Downloads"),
            failure: Mutex::new(None),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent fetches fail with a request error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Make subsequent fetches succeed again.
    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Ids of cats passed to `fetch`, in call order.
    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Default for MockImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch(&self, cat: &Cat) -> Result<PathBuf, ImageError> {
        self.fetched.lock().unwrap().push(cat.id.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ImageError::Request(message));
        }

        Ok(self.download_dir.join(image_file_name(cat)?))
    }
}
