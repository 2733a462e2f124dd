//! HTTP boundary for the cat catalog: router, auth middleware, handlers and
//! Prometheus metrics.

pub mod api;
pub mod metrics;
pub mod state;

pub use api::create_router;
pub use state::AppState;
