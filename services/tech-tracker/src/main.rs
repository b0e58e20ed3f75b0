//! Tech Tracker CLI
//!
//! Command-line front end for viewing and updating technician statuses.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use tech_tracker::{
    load_config, ClientBuilder, ClientState, Config, StateEvent, TechTrackerClient,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::Level;

#[derive(Parser)]
#[command(name = "tech-tracker")]
#[command(about = "View and update technician statuses")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current status of every technician
    List,
    /// Set the status of one technician
    Update {
        /// Technician name
        name: String,
        /// New status text
        #[arg(required_unless_present = "preset", conflicts_with = "preset")]
        status: Option<String>,
        /// Use a quick status by its number (see `statuses`)
        #[arg(short, long)]
        preset: Option<usize>,
    },
    /// List the configured quick statuses
    Statuses,
    /// Show one page of the status history
    History {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Page through the status history interactively
    Browse,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, base_url={:?}, log_level={:?}",
        args.config,
        args.base_url,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }

    if let Command::Statuses = args.command {
        print_quick_statuses(&config);
        return Ok(());
    }

    config.resolve_secrets()?;
    let client = ClientBuilder::new(config.clone()).build()?;

    match args.command {
        Command::List => {
            client.fetch_technicians().await?;
            print_technicians(&client.snapshot().await);
        }
        Command::Update {
            name,
            status,
            preset,
        } => {
            let status = match status {
                Some(status) => status,
                None => quick_status(&config, preset.unwrap_or_default())?,
            };
            client.update_status(&name, &status).await?;
            print_technicians(&client.snapshot().await);
        }
        Command::History { page } => {
            client.fetch_history_page(page).await?;
            print_history(&client.snapshot().await);
        }
        Command::Browse => browse(client).await?,
        Command::Statuses => {}
    }

    Ok(())
}

fn quick_status(config: &Config, index: usize) -> Result<String, Box<dyn std::error::Error>> {
    index
        .checked_sub(1)
        .and_then(|i| config.quick_statuses.get(i))
        .cloned()
        .ok_or_else(|| {
            format!(
                "No quick status #{}; choose 1-{}",
                index,
                config.quick_statuses.len()
            )
            .into()
        })
}

/// Interactive history paging: requests are spawned and the view redraws on notifications
async fn browse(client: TechTrackerClient) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = client.subscribe();
    let renderer_client = client.clone();
    let renderer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(StateEvent::PaginationUpdated { .. }) => {
                    print_history(&renderer_client.snapshot().await);
                    println!("[n]ext  [p]revious  [r]efresh  [q]uit");
                }
                Ok(StateEvent::RequestFailed { operation, message }) => {
                    eprintln!("Could not {}: {}", operation, message);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Renderer skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    spawn_logged(client.clone(), |c| async move { c.fetch_history_page(1).await });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "n" => spawn_logged(client.clone(), |c| async move {
                c.next_page().await.map(|_| ())
            }),
            "p" => spawn_logged(client.clone(), |c| async move {
                c.previous_page().await.map(|_| ())
            }),
            "r" => spawn_logged(client.clone(), |c| async move {
                let page = c.snapshot().await.current_page;
                c.fetch_history_page(page).await
            }),
            "q" => break,
            "" => {}
            other => println!("Unknown command '{}'", other),
        }
    }

    renderer.abort();
    Ok(())
}

/// Fire-and-forget an operation; failures reach the renderer as events
fn spawn_logged<F, Fut>(client: TechTrackerClient, operation: F)
where
    F: FnOnce(TechTrackerClient) -> Fut,
    Fut: std::future::Future<Output = tech_tracker::Result<()>> + Send + 'static,
{
    let future = operation(client);
    tokio::spawn(async move {
        if let Err(e) = future.await {
            tracing::debug!("Background request finished with error: {}", e);
        }
    });
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M  %e %b").to_string()
}

fn print_technicians(state: &ClientState) {
    if state.technicians.is_empty() {
        println!("No technicians.");
        return;
    }
    let width = state
        .technicians
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(0);
    for technician in &state.technicians {
        println!(
            "{:<width$}  {:<14}  {}",
            technician.name,
            format_time(&technician.time),
            technician.status,
            width = width
        );
    }
}

fn print_history(state: &ClientState) {
    if state.history.is_empty() {
        println!("No history.");
    }
    let width = state
        .history
        .iter()
        .map(|h| h.name.len())
        .max()
        .unwrap_or(0);
    for entry in &state.history {
        println!(
            "{:<width$}  {:<14}  {}",
            entry.name,
            format_time(&entry.time),
            entry.status,
            width = width
        );
    }
    println!("Page {} of {}", state.current_page, state.total_page_count);
}

fn print_quick_statuses(config: &Config) {
    for (i, status) in config.quick_statuses.iter().enumerate() {
        println!("{:>2}. {}", i + 1, status);
    }
}
