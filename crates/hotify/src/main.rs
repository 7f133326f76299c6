mod cli;
mod commands;
mod complete;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use hotify_core::{ClientConfig, SyncedStore};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

fn main() {
    // Answers `COMPLETE=<shell>` requests and exits; the completer runs its
    // own runtime, so this happens before the main one starts.
    CompleteEnv::with_factory(Cli::command).complete();

    run_cli();
}

#[tokio::main]
async fn run_cli() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "hotify", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let config = build_client_config(&cli.global)?;
            let store = SyncedStore::connect(&config)?;

            tracing::debug!(command = ?cmd, address = %config.url, "dispatching command");
            commands::dispatch(cmd, &store, &cli.global).await
        }
    }
}

/// Build a `ClientConfig` from the config file with CLI flag overrides.
///
/// `--secret` short-circuits the env/keyring/plaintext chain.
fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let path = commands::util::config_file(global);
    let mut cfg = hotify_config::load_config_from(&path)?;

    if let Some(ref address) = global.address {
        cfg.address.clone_from(address);
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }

    let secret = match global.secret {
        Some(ref secret) => SecretString::from(secret.clone()),
        None => hotify_config::resolve_secret(&cfg)?,
    };

    Ok(hotify_config::client_config_with_secret(&cfg, secret)?)
}
