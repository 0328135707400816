//! Authenticator configuration.
//!
//! Configuration is loaded from environment variables once at startup and
//! passed to constructors explicitly; nothing in the crate reads the
//! environment on its own.

use crate::settings::{ClusterConfigSource, ARGOCD_NAMESPACE};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Selects the local kubeconfig instead of in-cluster credentials.
pub const ENV_LOCAL_DEV_MODE: &str = "AUTHENTICATOR_LOCAL_DEV_MODE";

/// Overrides the kubeconfig path used in local dev mode.
pub const ENV_KUBECONFIG: &str = "AUTHENTICATOR_KUBECONFIG";

/// Overrides the namespace the settings objects are read from.
pub const ENV_NAMESPACE: &str = "AUTHENTICATOR_NAMESPACE";

/// Enables JSON-formatted logs.
pub const ENV_LOG_JSON: &str = "AUTHENTICATOR_LOG_JSON";

/// Authenticator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the Kubernetes client configuration comes from.
    pub cluster_source: ClusterConfigSource,

    /// Namespace holding the settings secret and config map.
    pub namespace: String,

    /// Emit logs as JSON instead of human-readable text.
    pub json_logs: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid boolean for {name}: '{value}'")]
    InvalidBool { name: String, value: String },

    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// See [`Config::from_vars`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// - `InvalidBool` if a boolean variable is not `true`/`false`/`1`/`0`
    /// - `MissingEnvVar` if dev mode needs `HOME` to locate the kubeconfig
    /// - `InvalidNamespace` if the namespace override is blank
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let local_dev_mode = parse_bool(vars, ENV_LOCAL_DEV_MODE)?;

        let cluster_source = if local_dev_mode {
            let path = match vars.get(ENV_KUBECONFIG) {
                Some(path) => PathBuf::from(path),
                None => {
                    let home = vars
                        .get("HOME")
                        .ok_or_else(|| ConfigError::MissingEnvVar("HOME".to_string()))?;
                    PathBuf::from(home).join(".kube").join("config")
                }
            };
            ClusterConfigSource::LocalFile(path)
        } else {
            ClusterConfigSource::InCluster
        };

        let namespace = match vars.get(ENV_NAMESPACE) {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidNamespace(format!(
                    "{ENV_NAMESPACE} must not be empty"
                )));
            }
            Some(value) => value.trim().to_string(),
            None => ARGOCD_NAMESPACE.to_string(),
        };

        let json_logs = parse_bool(vars, ENV_LOG_JSON)?;

        Ok(Self {
            cluster_source,
            namespace,
            json_logs,
        })
    }
}

fn parse_bool(vars: &HashMap<String, String>, name: &str) -> Result<bool, ConfigError> {
    match vars.get(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" || v.is_empty() => Ok(false),
        Some(v) => Err(ConfigError::InvalidBool {
            name: name.to_string(),
            value: v,
        }),
    }
}
