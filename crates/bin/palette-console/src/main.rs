//! # palette-console: status console for a palette server
//!
//! Composition root that wires all adapters together and runs the monitor.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Construct the HTTP client, cookie jar and terminal view (adapters)
//! - Construct the status poller and the action gate, injecting adapters via port traits
//! - Read user commands from stdin and forward them to the monitor
//! - Handle graceful shutdown (`q`, end of input, Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod actions;
mod commands;
mod config;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use palette_adapter_cookie_file::FileCookieJar;
use palette_adapter_http_reqwest::ReqwestClient;
use palette_adapter_terminal::TerminalView;
use palette_app::event_bus::InProcessStateBus;
use palette_app::ports::ActionClient;
use palette_app::services::action_gate::ActionGate;
use palette_app::services::status_poller::{Monitor, MonitorHandle, StatusPoller};

use crate::actions::ActionSubmitter;
use crate::commands::{ConsoleCommand, HELP};
use crate::config::Config;

/// Capacity of the `state` broadcast channel.
const STATE_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    // Adapters
    let client = ReqwestClient::new(&config.server.url, config.request_timeout())?;
    let jar = FileCookieJar::open(&config.cookies.path)?;
    let view = TerminalView::new(std::io::stdout());

    // State channel
    let bus = Arc::new(InProcessStateBus::new(STATE_CAPACITY));
    let (gate, gate_task) = ActionGate::watch(bus.updates());

    // Monitor
    let poller = StatusPoller::new(client.clone(), jar, view, bus, config.poller());
    let mut monitor = Monitor::new(poller);
    let handle = monitor
        .start_monitor(config.monitor.include_events)
        .await;
    tracing::info!(url = %client.base_url(), "palette console started");

    let submitter = ActionSubmitter::new(client, gate);
    let result = run_console(&handle, submitter).await;

    monitor.stop().await;
    gate_task.abort();
    tracing::info!("palette console stopped");

    result?;
    Ok(())
}

/// Read commands until `q`, end of input or Ctrl-C.
async fn run_console<A: ActionClient>(
    handle: &MonitorHandle,
    mut submitter: ActionSubmitter<A>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("interrupted");
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            return Ok(());
        }
        if let Err(err) = dispatch(command, handle, &mut submitter).await {
            eprintln!("{err:#}");
        }
    }
}

async fn dispatch<A: ActionClient>(
    command: ConsoleCommand,
    handle: &MonitorHandle,
    submitter: &mut ActionSubmitter<A>,
) -> anyhow::Result<()> {
    match command {
        ConsoleCommand::NextPage => handle.next_page().await?,
        ConsoleCommand::PreviousPage => handle.previous_page().await?,
        ConsoleCommand::FirstPage => handle.first_page().await?,
        ConsoleCommand::LastPage => handle.last_page().await?,
        ConsoleCommand::GoToPage(page) => handle.go_to_page(page).await?,
        ConsoleCommand::SelectFilter { name, value } => {
            handle.select_filter(name, value).await?;
        }
        ConsoleCommand::Refresh => handle.refresh().await?,
        ConsoleCommand::Action { action, filename } => {
            let response = submitter.submit(action, filename.as_deref()).await?;
            tracing::info!(%action, %response, "action accepted");
            handle.refresh().await?;
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}
