//! Dynamic shell completion of service names.
//!
//! Runs inside the shell's completion request, so there is no parsed
//! `GlobalOpts`: the server comes from `HOTIFY_CONFIG` and the `HOTIFY_*`
//! layering alone. Any failure yields no candidates.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use clap_complete::engine::CompletionCandidate;

use hotify_core::{ClientConfig, SyncedStore};

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(2);

/// `ArgValueCompleter` for service-name arguments.
pub fn service_names(current: &OsStr) -> Vec<CompletionCandidate> {
    let Some(prefix) = current.to_str() else {
        return Vec::new();
    };
    let Some(config) = completion_config() else {
        return Vec::new();
    };
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return Vec::new();
    };

    runtime
        .block_on(matching_services(&config, prefix))
        .into_iter()
        .map(CompletionCandidate::new)
        .collect()
}

fn completion_config() -> Option<ClientConfig> {
    let path = std::env::var_os("HOTIFY_CONFIG")
        .map_or_else(hotify_config::config_path, PathBuf::from);
    let cfg = hotify_config::load_config_from(&path).ok()?;
    let mut config = hotify_config::to_client_config(&cfg).ok()?;
    config.timeout = config.timeout.min(COMPLETION_TIMEOUT);
    Some(config)
}

/// Names of the server's services starting with `prefix`, sorted.
async fn matching_services(config: &ClientConfig, prefix: &str) -> Vec<String> {
    let Ok(store) = SyncedStore::connect(config) else {
        return Vec::new();
    };
    if store.refresh().await.is_err() {
        return Vec::new();
    }

    store
        .services_snapshot()
        .iter()
        .map(|s| s.config.name.clone())
        .filter(|name| name.starts_with(prefix))
        .collect()
}
