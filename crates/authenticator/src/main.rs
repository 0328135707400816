//! Authenticator settings check
//!
//! Resolves the server settings once against the configured cluster and
//! reports what was found. Used by operators to confirm that the signing
//! secret and base URL are in place before rolling out token validation.

use authenticator::config::Config;
use authenticator::observability::init_tracing;
use authenticator::settings::{KubeSettingsProvider, SettingsResolver};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.json_logs)?;

    info!(
        cluster_source = ?config.cluster_source,
        namespace = %config.namespace,
        "Starting authenticator settings check"
    );

    let provider = KubeSettingsProvider::connect(&config.cluster_source)
        .await
        .map_err(|e| {
            error!("Failed to connect to cluster: {}", e);
            e
        })?;

    let resolver = SettingsResolver::with_namespace(provider, config.namespace.clone());
    let settings = resolver.resolve_settings().await.map_err(|e| {
        error!("Failed to resolve settings: {}", e);
        e
    })?;

    if !settings.has_server_secret() {
        warn!("Settings secret has no server signing key");
    }
    if settings.base_url.is_empty() {
        warn!("Settings config map has no url");
    }

    info!(
        base_url = %settings.base_url,
        has_server_secret = settings.has_server_secret(),
        "Settings resolved"
    );

    Ok(())
}
