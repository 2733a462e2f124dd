//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Votes and additions (catalog service)
//! - Seeding
//! - Image downloads

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog
// =============================================================================

/// Votes recorded, by kind.
pub static CAT_VOTES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("catapi_votes_total", "Total votes recorded"),
        &["vote"], // "love", "hate"
    )
    .unwrap()
});

/// Cats added through the API.
pub static CATS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("catapi_cats_added_total", "Total cats added via the API").unwrap()
});

/// Cats inserted by the seed loader.
pub static CATS_SEEDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "catapi_cats_seeded_total",
        "Total cats inserted from the seed document",
    )
    .unwrap()
});

// =============================================================================
// Image downloads
// =============================================================================

/// Image download attempts by result.
pub static IMAGE_DOWNLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("catapi_image_downloads_total", "Total image download attempts"),
        &["result"], // "success", "failed", "not_found"
    )
    .unwrap()
});

/// Duration of successful image downloads.
pub static IMAGE_DOWNLOAD_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "catapi_image_download_duration_seconds",
            "Duration of successful image downloads",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CAT_VOTES_TOTAL.clone()),
        Box::new(CATS_ADDED_TOTAL.clone()),
        Box::new(CATS_SEEDED_TOTAL.clone()),
        Box::new(IMAGE_DOWNLOADS_TOTAL.clone()),
        Box::new(IMAGE_DOWNLOAD_DURATION.clone()),
    ]
}
