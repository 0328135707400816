//! Server settings resolution.
//!
//! Pulls the trust material that token verification depends on out of the
//! configuration store: the signing secret from the `argocd-secret` secret
//! and the external base URL from the `argocd-cm` config map.
//!
//! # Usage
//!
//! ```rust,ignore
//! use authenticator::settings::{ClusterConfigSource, KubeSettingsProvider, SettingsResolver};
//!
//! let provider = KubeSettingsProvider::connect(&ClusterConfigSource::InCluster).await?;
//! let resolver = SettingsResolver::new(provider);
//! let settings = resolver.resolve_settings().await?;
//! ```
//!
//! # Security
//!
//! The signing secret is held as a `SecretString`: `Debug` output and
//! tracing fields never contain its value.

pub mod cluster;
pub mod provider;

pub use cluster::{ClusterConfigSource, KubeSettingsProvider};
pub use provider::{ObjectKind, ProviderError, SettingsProvider};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

// =============================================================================
// Constants
// =============================================================================

/// Namespace holding the settings objects.
pub const ARGOCD_NAMESPACE: &str = "devtroncd";

/// Secret holding the server signing key.
pub const ARGOCD_SECRET_NAME: &str = "argocd-secret";

/// Config map holding the external URL.
pub const ARGOCD_CONFIG_MAP_NAME: &str = "argocd-cm";

/// Secret key of the server signing secret.
pub const SETTING_SERVER_SIGNATURE_KEY: &str = "server.secretkey";

/// Config map key of the external base URL.
pub const SETTING_URL_KEY: &str = "url";

/// Secret key of the admin password hash. Not read by this crate.
pub const SETTING_ADMIN_PASSWORD_HASH_KEY: &str = "admin.password";

/// Secret key of the admin password modification time. Not read by this crate.
pub const SETTING_ADMIN_PASSWORD_MTIME_KEY: &str = "admin.passwordMtime";

/// Config map key toggling the admin user. Not read by this crate.
pub const SETTING_ADMIN_ENABLED_KEY: &str = "admin.enabled";

/// Secret key of the admin API tokens. Not read by this crate.
pub const SETTING_ADMIN_TOKENS_KEY: &str = "admin.tokens";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while resolving settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The configuration store could not be reached.
    #[error("Settings provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The secret or config map does not exist.
    #[error("Configuration object not found: {kind} {namespace}/{name}")]
    ConfigObjectNotFound {
        kind: ObjectKind,
        namespace: String,
        name: String,
    },
}

impl From<ProviderError> for SettingsError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound {
                kind,
                namespace,
                name,
            } => Self::ConfigObjectNotFound {
                kind,
                namespace,
                name,
            },
            ProviderError::Unavailable(reason) => Self::ProviderUnavailable(reason),
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Resolved server settings.
///
/// Fields missing from otherwise-present objects are left empty.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Signing secret used to validate and issue tokens.
    pub server_secret: SecretString,

    /// External base URL of the server.
    pub base_url: String,
}

impl Settings {
    #[must_use]
    pub fn new(server_secret: SecretString, base_url: String) -> Self {
        Self {
            server_secret,
            base_url,
        }
    }

    /// Whether a non-empty signing secret was found.
    #[must_use]
    pub fn has_server_secret(&self) -> bool {
        !self.server_secret.expose_secret().is_empty()
    }
}

impl PartialEq for Settings {
    fn eq(&self, other: &Self) -> bool {
        self.server_secret.expose_secret() == other.server_secret.expose_secret()
            && self.base_url == other.base_url
    }
}

impl Eq for Settings {}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves [`Settings`] from a [`SettingsProvider`] on demand.
///
/// Every call reads the store afresh: secret first, then config map, with no
/// retry and no caching. Callers own freshness and retry policy.
#[derive(Debug, Clone)]
pub struct SettingsResolver<P> {
    provider: P,
    namespace: String,
}

impl<P: SettingsProvider> SettingsResolver<P> {
    /// Resolver reading from the well-known namespace.
    pub fn new(provider: P) -> Self {
        Self::with_namespace(provider, ARGOCD_NAMESPACE)
    }

    /// Resolver reading from a specific namespace.
    pub fn with_namespace(provider: P, namespace: impl Into<String>) -> Self {
        Self {
            provider,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch the signing secret and base URL.
    ///
    /// # Errors
    ///
    /// - `ConfigObjectNotFound` if the secret or config map does not exist
    /// - `ProviderUnavailable` if the store cannot be reached
    ///
    /// No partial `Settings` is returned on failure.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub async fn resolve_settings(&self) -> Result<Settings, SettingsError> {
        let secret = self
            .provider
            .get_secret(&self.namespace, ARGOCD_SECRET_NAME)
            .await
            .map_err(|e| {
                tracing::warn!(
                    target: "authenticator.settings",
                    name = ARGOCD_SECRET_NAME,
                    error = %e,
                    "Failed to fetch settings secret"
                );
                SettingsError::from(e)
            })?;

        let config = self
            .provider
            .get_config_map(&self.namespace, ARGOCD_CONFIG_MAP_NAME)
            .await
            .map_err(|e| {
                tracing::warn!(
                    target: "authenticator.settings",
                    name = ARGOCD_CONFIG_MAP_NAME,
                    error = %e,
                    "Failed to fetch settings config map"
                );
                SettingsError::from(e)
            })?;

        let server_secret = secret
            .get(SETTING_SERVER_SIGNATURE_KEY)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        let base_url = config.get(SETTING_URL_KEY).cloned().unwrap_or_default();

        let settings = Settings::new(SecretString::from(server_secret), base_url);

        tracing::debug!(
            target: "authenticator.settings",
            base_url = %settings.base_url,
            has_server_secret = settings.has_server_secret(),
            "Resolved server settings"
        );

        Ok(settings)
    }
}
