//! Service command handlers: list, get, lifecycle actions, create, delete.

use dialoguer::{Confirm, Input};
use tabled::Tabled;

use hotify_core::{Service, ServiceConfig, SyncedStore};

use crate::cli::{CreateArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Restarts")]
    restarts: u32,
}

impl ServiceRow {
    fn new(s: &Service, color: bool) -> Self {
        Self {
            name: s.config.name.clone(),
            status: output::status_label(s.status, color),
            restarts: s.restarts,
        }
    }
}

fn detail(s: &Service, color: bool) -> String {
    let c = &s.config;
    let mut lines = vec![
        format!("Name:         {}", c.name),
        format!("Status:       {}", output::status_label(s.status, color)),
        format!("Restarts:     {}", s.restarts),
        format!("Path:         {}", s.path),
        format!("Repo:         {}", c.repo),
        format!("Build:        {}", c.build),
        format!("Exec:         {}", c.exec),
        format!(
            "Restart:      {}",
            if c.restart {
                format!("yes (max {})", c.max_restarts)
            } else {
                "no".into()
            }
        ),
    ];
    if !c.proxy.match_rule.is_empty() || !c.proxy.upstream.is_empty() {
        lines.push(format!("Proxy:        {} -> {}", c.proxy.match_rule, c.proxy.upstream));
    }
    lines.push(format!("Log lines:    {}", s.logs.len()));
    lines.join("\n")
}

// ── Lifecycle actions ───────────────────────────────────────────────

/// Lifecycle action on an existing service.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Update,
}

impl Action {
    fn progress(self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Restart => "Restarting",
            Self::Update => "Updating",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
            Self::Update => "updated",
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(store: &SyncedStore, global: &GlobalOpts) -> Result<(), CliError> {
    store.refresh().await?;
    let snap = store.services_snapshot();
    let color = output::should_color(global.color);

    let out = output::render_list(
        global.output,
        &snap,
        |s| ServiceRow::new(s, color),
        |s| s.config.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn get(store: &SyncedStore, name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let service = store
        .fetch_service(name)
        .await
        .map_err(|e| CliError::for_service(e, name))?;
    let color = output::should_color(global.color);

    let out = output::render_single(
        global.output,
        &service,
        |s| detail(s, color),
        |s| s.config.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn lifecycle(
    store: &SyncedStore,
    action: Action,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let progress = util::spinner(format!("{} {name}...", action.progress()), global.quiet);
    let result = match action {
        Action::Start => store.start_service(name).await,
        Action::Stop => store.stop_service(name).await,
        Action::Restart => store.restart_service(name).await,
        Action::Update => store.update_service(name).await,
    };
    progress.finish_and_clear();
    result.map_err(|e| CliError::for_service(e, name))?;

    report(store, name, action.done(), global);
    Ok(())
}

pub async fn delete(store: &SyncedStore, name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(&format!("Delete service '{name}'?"), "delete", global.yes)? {
        if !global.quiet {
            eprintln!("Aborted");
        }
        return Ok(());
    }

    let progress = util::spinner(format!("Deleting {name}..."), global.quiet);
    let result = store.delete_service(name).await;
    progress.finish_and_clear();
    result.map_err(|e| CliError::for_service(e, name))?;

    if !global.quiet {
        eprintln!("Service '{name}' deleted");
    }
    Ok(())
}

pub async fn create(
    store: &SyncedStore,
    args: CreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let config: ServiceConfig = match args.from_file {
        Some(ref path) => util::read_json_file(path)?,
        None => prompt_service_config()?,
    };
    if config.name.trim().is_empty() {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: "service name cannot be empty".into(),
        });
    }

    let name = config.name.clone();
    let progress = util::spinner(format!("Creating {name}..."), global.quiet);
    let result = store.create_service(&config).await;
    progress.finish_and_clear();
    result.map_err(|e| CliError::for_service(e, &name))?;

    report(store, &name, "created", global);
    Ok(())
}

/// Print the outcome of a mutation using the resynchronized snapshot.
fn report(store: &SyncedStore, name: &str, verb: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    let color = output::should_color(global.color);
    match store.service_by_name(name) {
        Some(service) => eprintln!(
            "Service '{name}' {verb} ({})",
            output::status_label(service.status, color)
        ),
        None => eprintln!("Service '{name}' {verb}"),
    }
}

// ── Interactive create ──────────────────────────────────────────────

fn prompt_service_config() -> Result<ServiceConfig, CliError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::Validation {
            field: "from-file".into(),
            reason: "stdin is not a terminal; pass --from-file for non-interactive use".into(),
        });
    }

    let text = |prompt: &str| -> Result<String, CliError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(util::prompt_err)
    };
    let yes_no = |prompt: &str| -> Result<bool, CliError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(util::prompt_err)
    };

    let mut config = ServiceConfig {
        name: text("Service name")?,
        repo: text("Repository")?,
        exec: text("Exec command")?,
        build: text("Build command")?,
        secret: text("Webhook secret")?,
        restart: yes_no("Restart on failure")?,
        ..ServiceConfig::default()
    };

    if config.restart {
        config.max_restarts = Input::<u32>::new()
            .with_prompt("Max restarts")
            .default(3)
            .interact_text()
            .map_err(util::prompt_err)?;
    }

    if yes_no("Use proxy")? {
        config.proxy.match_rule = text("Match")?;
        config.proxy.upstream = text("Upstream")?;
    }

    Ok(config)
}
