pub mod auth;
pub mod cat;
pub mod config;
pub mod image;
pub mod metrics;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, BasicAuthenticator, Identity,
    NoneAuthenticator,
};
pub use cat::{
    open_store, Cat, CatError, CatService, CatStore, CatalogService, JsonCatStore, NewCat,
    SeedError, SeedLoader, SeedOutcome, SqliteCatStore, Vote,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use image::{HttpImageFetcher, ImageError, ImageFetcher};
