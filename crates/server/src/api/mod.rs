pub mod cats;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use routes::create_router;
