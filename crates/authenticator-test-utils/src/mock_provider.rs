//! In-memory settings provider for resolver tests.
//!
//! Holds secrets and config maps keyed by `(namespace, name)` and records
//! every read, so tests can assert on call order and count.
//!
//! # Example
//!
//! ```rust,ignore
//! use authenticator_test_utils::MockSettingsProvider;
//!
//! let provider = MockSettingsProvider::new()
//!     .with_server_secret("s3cr3t")
//!     .with_url("https://argo.example.com");
//!
//! // Simulate the store going away
//! provider.set_unavailable(true);
//! ```

use async_trait::async_trait;
use authenticator::settings::{
    ObjectKind, ProviderError, SettingsProvider, ARGOCD_CONFIG_MAP_NAME, ARGOCD_NAMESPACE,
    ARGOCD_SECRET_NAME, SETTING_SERVER_SIGNATURE_KEY, SETTING_URL_KEY,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// A read recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
}

/// Mock settings provider for testing.
#[derive(Debug, Clone, Default)]
pub struct MockSettingsProvider {
    inner: Arc<Mutex<MockProviderInner>>,
}

#[derive(Debug, Default)]
struct MockProviderInner {
    secrets: HashMap<(String, String), BTreeMap<String, Vec<u8>>>,
    config_maps: HashMap<(String, String), BTreeMap<String, String>>,
    unavailable: bool,
    calls: Vec<ProviderCall>,
}

impl MockSettingsProvider {
    /// Create an empty provider (every object is missing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret object with the given data.
    pub fn with_secret(self, namespace: &str, name: &str, data: &[(&str, &[u8])]) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let entry = inner
                .secrets
                .entry((namespace.to_string(), name.to_string()))
                .or_default();
            for (key, value) in data {
                entry.insert((*key).to_string(), value.to_vec());
            }
        }
        self
    }

    /// Add a config map object with the given data.
    pub fn with_config_map(self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let entry = inner
                .config_maps
                .entry((namespace.to_string(), name.to_string()))
                .or_default();
            for (key, value) in data {
                entry.insert((*key).to_string(), (*value).to_string());
            }
        }
        self
    }

    /// Put `server.secretkey` into the well-known secret.
    pub fn with_server_secret(self, secret: &str) -> Self {
        self.with_secret(
            ARGOCD_NAMESPACE,
            ARGOCD_SECRET_NAME,
            &[(SETTING_SERVER_SIGNATURE_KEY, secret.as_bytes())],
        )
    }

    /// Put `url` into the well-known config map.
    pub fn with_url(self, url: &str) -> Self {
        self.with_config_map(ARGOCD_NAMESPACE, ARGOCD_CONFIG_MAP_NAME, &[(SETTING_URL_KEY, url)])
    }

    /// Make every read fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }

    /// Delete a secret object.
    pub fn remove_secret(&self, namespace: &str, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .secrets
            .remove(&(namespace.to_string(), name.to_string()));
    }

    /// Reads made so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of reads made so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl SettingsProvider for MockSettingsProvider {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ProviderCall {
            kind: ObjectKind::Secret,
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        if inner.unavailable {
            return Err(ProviderError::Unavailable("mock store unavailable".to_string()));
        }
        inner
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::not_found(ObjectKind::Secret, namespace, name))
    }

    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ProviderCall {
            kind: ObjectKind::ConfigMap,
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        if inner.unavailable {
            return Err(ProviderError::Unavailable("mock store unavailable".to_string()));
        }
        inner
            .config_maps
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::not_found(ObjectKind::ConfigMap, namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_objects() {
        let provider = MockSettingsProvider::new()
            .with_server_secret("s3cr3t")
            .with_url("https://argo.example.com");

        let secret = provider
            .get_secret(ARGOCD_NAMESPACE, ARGOCD_SECRET_NAME)
            .await
            .unwrap();
        assert_eq!(secret.get(SETTING_SERVER_SIGNATURE_KEY).unwrap(), b"s3cr3t");

        let cm = provider
            .get_config_map(ARGOCD_NAMESPACE, ARGOCD_CONFIG_MAP_NAME)
            .await
            .unwrap();
        assert_eq!(cm.get(SETTING_URL_KEY).unwrap(), "https://argo.example.com");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_missing_object() {
        let provider = MockSettingsProvider::new();
        let err = provider.get_secret("ns", "missing").await.unwrap_err();
        assert_eq!(err, ProviderError::not_found(ObjectKind::Secret, "ns", "missing"));
    }

    #[tokio::test]
    async fn test_mock_unavailable() {
        let provider = MockSettingsProvider::new().with_server_secret("x");
        provider.set_unavailable(true);
        assert!(matches!(
            provider.get_secret(ARGOCD_NAMESPACE, ARGOCD_SECRET_NAME).await,
            Err(ProviderError::Unavailable(_))
        ));
    }
}
