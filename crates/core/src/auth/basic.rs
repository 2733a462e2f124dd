//! HTTP Basic authentication with a static placeholder rule.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use super::{AuthError, AuthRequest, Authenticator, Identity};
use crate::config::BasicAuthConfig;

/// Authenticator that accepts `Authorization: Basic <base64(user:pass)>`.
///
/// Credentials are not looked up anywhere: a request passes when the username
/// starts with the configured prefix and the password ends with the configured
/// suffix.
pub struct BasicAuthenticator {
    username_prefix: String,
    password_suffix: String,
}

impl BasicAuthenticator {
    pub fn new(config: &BasicAuthConfig) -> Self {
        Self {
            username_prefix: config.username_prefix.clone(),
            password_suffix: config.password_suffix.clone(),
        }
    }

    /// Decode the username/password pair from the Authorization header.
    fn extract_credentials(request: &AuthRequest) -> Result<(String, String), AuthError> {
        let header = request
            .headers
            .get("authorization")
            .ok_or(AuthError::NotAuthenticated)?;

        let encoded = match header.trim_start().split_once(' ') {
            Some((scheme, encoded)) if scheme.eq_ignore_ascii_case("basic") => encoded,
            _ => return Err(AuthError::NotAuthenticated),
        };

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::InvalidCredentials("Malformed Basic credentials".to_string()))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| AuthError::InvalidCredentials("Credentials are not UTF-8".to_string()))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AuthError::InvalidCredentials("Missing ':' separator".to_string()))?;

        Ok((username.to_string(), password.to_string()))
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let (username, password) = Self::extract_credentials(request)?;

        if username.starts_with(&self.username_prefix) && password.ends_with(&self.password_suffix)
        {
            Ok(Identity {
                user_id: username,
                method: "basic".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials(
                "Username or password rejected".to_string(),
            ))
        }
    }

    fn method_name(&self) -> &'static str {
        "basic"
    }

    fn challenge(&self) -> Option<&'static str> {
        Some("Basic realm=\"catapi\"")
    }
}
