use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub images: ImageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prefix every route is mounted under (e.g. "/cats-demo").
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Directory served as static files, with index.html as default document.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_base_path() -> String {
    "/".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    #[serde(default)]
    pub basic: BasicAuthConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    Basic,
}

/// Placeholder credential rule for HTTP Basic auth: the username must start
/// with `username_prefix` and the password must end with `password_suffix`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicAuthConfig {
    #[serde(default = "default_username_prefix")]
    pub username_prefix: String,
    #[serde(default = "default_password_suffix")]
    pub password_suffix: String,
}

impl Default for BasicAuthConfig {
    fn default() -> Self {
        Self {
            username_prefix: default_username_prefix(),
            password_suffix: default_password_suffix(),
        }
    }
}

fn default_username_prefix() -> String {
    "user".to_string()
}

fn default_password_suffix() -> String {
    "word".to_string()
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Backing file of the JSON store.
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
    /// SQLite database file of the relational store.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// JSON document used to seed an empty store.
    #[serde(default = "default_seed_path")]
    pub seed_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            json_path: default_json_path(),
            database_path: default_database_path(),
            seed_path: default_seed_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

fn default_json_path() -> PathBuf {
    PathBuf::from("cats.json")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("catapi.db")
}

fn default_seed_path() -> PathBuf {
    PathBuf::from("cats.json")
}

/// Image download configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("Downloads")
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Sanitized config for API responses (auth rule redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub rule_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::Basic => "basic".to_string(),
                },
                rule_configured: config.auth.method == AuthMethod::Basic,
            },
            server: config.server.clone(),
            storage: config.storage.clone(),
            images: config.images.clone(),
        }
    }
}
