//! `server-config` handler.

use hotify_core::{Config, SyncedStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::mask;

/// Replace every secret in the server config with a fixed mask.
fn redacted(mut config: Config) -> Config {
    config.secret = mask(&config.secret);
    for service in config.services.values_mut() {
        service.secret = mask(&service.secret);
    }
    config
}

fn detail(c: &Config) -> String {
    let mut lines = vec![
        format!("Address:       {}", c.address),
        format!("Services path: {}", c.services_path),
        format!("Loaded from:   {}", c.load_path.as_deref().unwrap_or("-")),
        format!("Secret:        {}", c.secret),
        format!("Services:      {}", c.services.len()),
    ];
    lines.extend(c.services.keys().map(|name| format!("  - {name}")));
    lines.join("\n")
}

pub async fn handle(store: &SyncedStore, global: &GlobalOpts) -> Result<(), CliError> {
    let config = redacted(store.fetch_config().await?);
    let out = output::render_single(global.output, &config, detail, |c| c.address.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
