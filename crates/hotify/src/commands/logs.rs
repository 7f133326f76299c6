//! `logs` handler: one-shot dump or live tail by polling.

use std::io::Write;
use std::time::Duration;

use tracing::debug;

use hotify_core::SyncedStore;

use crate::cli::{GlobalOpts, LogsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(store: &SyncedStore, args: LogsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.live {
        return follow(store, &args.name, Duration::from_secs(args.interval.max(1))).await;
    }

    let service = store
        .fetch_service(&args.name)
        .await
        .map_err(|e| CliError::for_service(e, &args.name))?;

    match global.output {
        OutputFormat::Table | OutputFormat::Plain => write_lines(&service.logs),
        format => {
            let out = output::render_single(format, &service.logs, |l| l.concat(), |l| l.concat())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Poll the service and print only lines not yet printed, until Ctrl-C.
///
/// A shorter log than last time means the server started a fresh log, so
/// printing restarts from its first line.
async fn follow(store: &SyncedStore, name: &str, interval: Duration) -> Result<(), CliError> {
    let mut seen = 0usize;
    loop {
        let service = store
            .fetch_service(name)
            .await
            .map_err(|e| CliError::for_service(e, name))?;

        let logs = &service.logs;
        if logs.len() < seen {
            debug!(previous = seen, current = logs.len(), "log reset detected");
            seen = 0;
        }
        write_lines(logs.get(seen..).unwrap_or_default())?;
        seen = logs.len();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            () = tokio::time::sleep(interval) => {}
        }
    }
}

/// Log entries carry their own line endings; write them verbatim.
fn write_lines(lines: &[String]) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        stdout.write_all(line.as_bytes())?;
    }
    stdout.flush()?;
    Ok(())
}
