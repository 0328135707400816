//! Settings provider boundary.
//!
//! The resolver only needs two reads from the configuration store: a
//! secret-like object and a config-like object, both addressed by namespace
//! and name. Anything that can answer those (the Kubernetes API, a mock) is a
//! [`SettingsProvider`].

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Kind of configuration object requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Secret,
    ConfigMap,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret => write!(f, "secret"),
            Self::ConfigMap => write!(f, "config map"),
        }
    }
}

/// Errors returned by a settings provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The requested object does not exist.
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: ObjectKind,
        namespace: String,
        name: String,
    },

    /// The store could not be reached or answered with an unexpected error.
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub fn not_found(kind: ObjectKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Read access to the configuration store holding server settings.
#[async_trait::async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Fetch the data of a secret object.
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError>;

    /// Fetch the data of a config object.
    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError>;
}

#[async_trait::async_trait]
impl<P: SettingsProvider + ?Sized> SettingsProvider for std::sync::Arc<P> {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError> {
        (**self).get_secret(namespace, name).await
    }

    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        (**self).get_config_map(namespace, name).await
    }
}
