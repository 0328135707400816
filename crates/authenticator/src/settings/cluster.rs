//! Kubernetes-backed settings provider.
//!
//! Reads the settings secret and config map through the Kubernetes API. How
//! the client finds its cluster is decided once at startup through
//! [`ClusterConfigSource`] and never re-examined per call.

use super::provider::{ObjectKind, ProviderError, SettingsProvider};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::Api;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where the Kubernetes client configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterConfigSource {
    /// Service account credentials mounted into the pod.
    InCluster,

    /// A kubeconfig file, for running outside the cluster.
    LocalFile(PathBuf),
}

/// [`SettingsProvider`] reading from the Kubernetes API.
#[derive(Clone)]
pub struct KubeSettingsProvider {
    client: Client,
}

impl KubeSettingsProvider {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the given configuration source.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the configuration cannot be
    /// loaded or the client cannot be constructed.
    pub async fn connect(source: &ClusterConfigSource) -> Result<Self, ProviderError> {
        let config = match source {
            ClusterConfigSource::InCluster => Config::incluster().map_err(|e| {
                ProviderError::Unavailable(format!("failed to load in-cluster config: {e}"))
            })?,
            ClusterConfigSource::LocalFile(path) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    ProviderError::Unavailable(format!(
                        "failed to read kubeconfig '{}': {e}",
                        path.display()
                    ))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|e| {
                        ProviderError::Unavailable(format!(
                            "failed to load kubeconfig '{}': {e}",
                            path.display()
                        ))
                    })?
            }
        };

        let client = Client::try_from(config).map_err(|e| {
            ProviderError::Unavailable(format!("failed to create k8s client: {e}"))
        })?;

        tracing::info!(
            target: "authenticator.settings",
            source = ?source,
            "Kubernetes client created"
        );

        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl SettingsProvider for KubeSettingsProvider {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, ProviderError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, ObjectKind::Secret, namespace, name))?;
        Ok(secret_data(secret))
    }

    async fn get_config_map(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>, ProviderError> {
        let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let config_map = config_maps
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, ObjectKind::ConfigMap, namespace, name))?;
        Ok(config_map.data.unwrap_or_default())
    }
}

fn secret_data(secret: Secret) -> BTreeMap<String, Vec<u8>> {
    secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.0))
        .collect()
}

fn map_kube_error(err: kube::Error, kind: ObjectKind, namespace: &str, name: &str) -> ProviderError {
    match err {
        kube::Error::Api(e) if e.code == 404 => ProviderError::not_found(kind, namespace, name),
        other => ProviderError::Unavailable(format!(
            "failed to get {kind} {namespace}/{name}: {other}"
        )),
    }
}
