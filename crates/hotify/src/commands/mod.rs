//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod config_cmd;
pub mod logs;
pub mod server;
pub mod services;
pub mod util;

use hotify_core::SyncedStore;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

use self::services::Action;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    store: &SyncedStore,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List => services::list(store, global).await,
        Command::Get(args) => services::get(store, &args.name, global).await,
        Command::Start(args) => services::lifecycle(store, Action::Start, &args.name, global).await,
        Command::Stop(args) => services::lifecycle(store, Action::Stop, &args.name, global).await,
        Command::Restart(args) => {
            services::lifecycle(store, Action::Restart, &args.name, global).await
        }
        Command::Update(args) => {
            services::lifecycle(store, Action::Update, &args.name, global).await
        }
        Command::Delete(args) => services::delete(store, &args.name, global).await,
        Command::Create(args) => services::create(store, args, global).await,
        Command::Logs(args) => logs::handle(store, args, global).await,
        Command::ServerConfig => server::handle(store, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
