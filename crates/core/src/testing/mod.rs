//! Testing utilities: a controllable image fetcher and cat fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use catapi_core::testing::{fixtures, MockImageFetcher};
//!
//! let images = MockImageFetcher::new();
//! images.fail_with("remote unreachable");
//! ```

mod mock_image_fetcher;

pub use mock_image_fetcher::MockImageFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::cat::Cat;

    /// A cat with the given name and counters and a deterministic id.
    pub fn cat(name: &str, loves: u32, hates: u32) -> Cat {
        Cat {
            id: format!("cat-{}", name.to_lowercase().replace(' ', "-")),
            url: format!("https://cdn.example.com/cats/{}.jpg", name.to_lowercase()),
            source_url: Some("https://example.com/cats".to_string()),
            name: name.to_string(),
            loves,
            hates,
        }
    }

    /// A seed document (camelCase JSON array) for the given cats.
    pub fn seed_json(cats: &[Cat]) -> String {
        serde_json::to_string_pretty(cats).unwrap_or_else(|_| "[]".to_string())
    }

    /// A small seed document with distinct vote counts.
    pub fn default_seed() -> Vec<Cat> {
        vec![
            cat("Garfield", 3, 1),
            cat("Felix", 10, 0),
            cat("Tom", 3, 5),
            cat("Salem", 0, 0),
        ]
    }
}
