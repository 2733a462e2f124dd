mod basic;
mod none;
mod traits;
mod types;

pub use basic::*;
pub use none::*;
pub use traits::*;
pub use types::*;

use crate::config::AuthConfig;

/// Factory function to create authenticator from config
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    use crate::config::AuthMethod;

    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::Basic => {
            if config.basic.username_prefix.is_empty() && config.basic.password_suffix.is_empty()
            {
                return Err(AuthError::ConfigurationError(
                    "basic auth requires a username prefix or password suffix".to_string(),
                ));
            }
            Ok(Box::new(BasicAuthenticator::new(&config.basic)))
        }
    }
}
