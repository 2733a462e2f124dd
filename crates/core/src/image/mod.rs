//! Downloading a cat's image to local disk.
//!
//! The fetcher never touches the cat store; it only reads the record it is
//! handed and writes one file under the download directory.

mod http;

pub use http::HttpImageFetcher;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::cat::Cat;

/// Errors for image downloads. None of these are fatal to the service.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Remote returned HTTP {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Cannot derive a file name from url: {0}")]
    InvalidUrl(String),
}

/// Trait for image download backends.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the cat's image and return the path it was written to.
    async fn fetch(&self, cat: &Cat) -> Result<PathBuf, ImageError>;
}

/// File name for a cat's downloaded image: `<name>.<extension>`.
pub fn image_file_name(cat: &Cat) -> Result<String, ImageError> {
    let extension = url_extension(&cat.url)
        .or_else(|| trailing_suffix(&cat.url))
        .ok_or_else(|| ImageError::InvalidUrl(cat.url.clone()))?;

    let stem = sanitize(&cat.name);
    let stem = if stem.trim_matches('.').is_empty() {
        sanitize(&cat.id)
    } else {
        stem
    };

    Ok(format!("{}.{}", stem, extension))
}

/// Extension of the last path segment, ignoring query and fragment.
fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    let (_, extension) = segment.rsplit_once('.')?;

    let valid = !extension.is_empty()
        && extension.len() <= 8
        && extension.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| extension.to_ascii_lowercase())
}

/// Last three characters of the url, for urls without a usable extension.
fn trailing_suffix(url: &str) -> Option<String> {
    let chars: Vec<char> = url.chars().collect();
    if chars.len() < 3 {
        return None;
    }
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    Some(sanitize(&suffix))
}

fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}
