//! Clap derive structures for the `hotify` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. The only
//! crate-internal path is `crate::complete::service_names`, which `build.rs`
//! stubs out when it includes this file for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::engine::ArgValueCompleter;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hotify -- deploy and supervise services from git
#[derive(Debug, Parser)]
#[command(
    name = "hotify",
    version,
    about = "Manage services on a hotify server",
    long_about = "Command-line client for a hotify server.\n\n\
        Every request is signed with the shared API secret. Configure the\n\
        server address and secret once with `hotify config init`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file
    #[arg(long, env = "HOTIFY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Server address (overrides config)
    #[arg(long, short = 'a', env = "HOTIFY_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Shared API secret (overrides config and keyring)
    #[arg(long, env = "HOTIFY_SECRET", global = true, hide_env_values = true)]
    pub secret: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOTIFY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HOTIFY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "HOTIFY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all services
    #[command(alias = "ls")]
    List,

    /// Show one service
    Get(ServiceArgs),

    /// Start a service
    Start(ServiceArgs),

    /// Stop a service
    Stop(ServiceArgs),

    /// Restart a service
    Restart(ServiceArgs),

    /// Pull, rebuild and restart a service
    Update(ServiceArgs),

    /// Delete a service
    #[command(alias = "rm")]
    Delete(ServiceArgs),

    /// Create a service (interactive unless --from-file is given)
    Create(CreateArgs),

    /// Print a service's logs
    Logs(LogsArgs),

    /// Show the server's configuration
    ServerConfig,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate static shell completions
    ///
    /// For completions that include service names from the server, load
    /// `COMPLETE=<shell> hotify` into the shell instead, e.g.
    /// `source <(COMPLETE=bash hotify)`.
    Completions(CompletionsArgs),
}

// ── Service Commands ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Service name
    #[arg(add = ArgValueCompleter::new(crate::complete::service_names))]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Read the service definition from a JSON file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Service name
    #[arg(add = ArgValueCompleter::new(crate::complete::service_names))]
    pub name: String,

    /// Keep polling and print new lines as they arrive
    #[arg(long, short = 'l')]
    pub live: bool,

    /// Poll interval in seconds for --live
    #[arg(long, default_value = "1", requires = "live")]
    pub interval: u64,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the API secret in the system keyring
    SetSecret,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
