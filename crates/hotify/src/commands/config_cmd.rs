//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use serde::Serialize;

use hotify_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{self, mask, prompt_err};

/// Config as shown by `config show`: plaintext secret masked, plus where
/// the secret would come from.
#[derive(Debug, Serialize)]
struct ShownConfig {
    path: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_env: Option<String>,
    secret_source: &'static str,
    insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca_cert: Option<String>,
    timeout: u64,
}

impl ShownConfig {
    fn new(cfg: &Config, path: String, secret_source: &'static str) -> Self {
        Self {
            path,
            address: cfg.address.clone(),
            secret: cfg.secret.as_deref().map(mask),
            secret_env: cfg.secret_env.clone(),
            secret_source,
            insecure: cfg.insecure,
            ca_cert: cfg.ca_cert.as_ref().map(|p| p.display().to_string()),
            timeout: cfg.timeout,
        }
    }
}

fn detail(c: &ShownConfig) -> String {
    [
        format!("Path:       {}", c.path),
        format!("Address:    {}", c.address),
        format!("Secret:     {}", c.secret_source),
        format!("Insecure:   {}", c.insecure),
        format!("CA cert:    {}", c.ca_cert.as_deref().unwrap_or("-")),
        format!("Timeout:    {}s", c.timeout),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = util::config_file(global);

    match args.command {
        ConfigCommand::Init => {
            eprintln!("hotify configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let existing = hotify_config::load_config_from(&path).unwrap_or_default();

            let address: String = Input::new()
                .with_prompt("Server address")
                .default(existing.address.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let secret = rpassword::prompt_password("API secret: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "secret".into(),
                    reason: "API secret cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the API secret?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let plaintext = if store_selection == 0 {
                hotify_config::store_secret(&secret)?;
                eprintln!("   ✓ API secret stored in system keyring");
                None
            } else {
                Some(secret)
            };

            let insecure = Confirm::new()
                .with_prompt("Accept self-signed TLS certificates?")
                .default(existing.insecure)
                .interact()
                .map_err(prompt_err)?;

            let cfg = Config {
                address,
                secret: plaintext,
                insecure,
                ..existing
            };
            hotify_config::save_config_to(&cfg, &path)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Test it: hotify list");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = hotify_config::load_config_from(&path)?;
            let source = hotify_config::secret_source(&cfg)
                .map_or("not configured", hotify_config::SecretSource::as_str);
            let shown = ShownConfig::new(&cfg, path.display().to_string(), source);
            let out = output::render_single(global.output, &shown, detail, |c| c.address.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetSecret => {
            let secret = rpassword::prompt_password("API secret: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "secret".into(),
                    reason: "API secret cannot be empty".into(),
                });
            }
            hotify_config::store_secret(&secret)?;
            if !global.quiet {
                eprintln!("✓ API secret stored in system keyring");
            }
            Ok(())
        }
    }
}
