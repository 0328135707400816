//! Crate-level error type.
//!
//! Each module owns the error enum for its concern; this umbrella lets
//! callers that mix them (the binary, service glue) use a single `?`.

use crate::claims::ClaimsError;
use crate::config::ConfigError;
use crate::settings::SettingsError;
use thiserror::Error;

/// Errors surfaced by the authenticator crate.
#[derive(Error, Debug)]
pub enum AuthenticatorError {
    /// Claims could not be decoded or a required claim was unusable
    #[error("Claims error: {0}")]
    Claims(#[from] ClaimsError),

    /// Server settings could not be resolved
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Invalid process configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Result type alias using `AuthenticatorError`
pub type Result<T> = std::result::Result<T, AuthenticatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_error_converts() {
        let err: AuthenticatorError = ClaimsError::MissingClaim("iat".to_string()).into();
        assert!(matches!(err, AuthenticatorError::Claims(_)));
        assert_eq!(err.to_string(), "Claims error: token does not have iat claim");
    }

    #[test]
    fn test_settings_error_converts() {
        let err: AuthenticatorError = SettingsError::ProviderUnavailable("timeout".to_string()).into();
        assert!(matches!(err, AuthenticatorError::Settings(_)));
        assert!(err.to_string().contains("timeout"));
    }
}
