//! CLI entry point for the library occupancy dashboard.
//!
//! Provides subcommands for submitting readings, printing the dashboard once,
//! watching it refresh, and listing recent contributors and locations.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use library_status::aggregator::recent_contributors;
use library_status::config::{Catalog, Config, poll_interval};
use library_status::dashboard::DashboardView;
use library_status::output::write_view;
use library_status::poller::Poller;
use library_status::store::open_store;
use library_status::submit::{Submission, submit};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "library_status")]
#[command(about = "Crowd-sourced library occupancy dashboard", long_about = None)]
struct Cli {
    /// Reading store: a CSV file path or an http(s) base URL
    #[arg(long, global = true, env = "LIBSTATUS_STORE")]
    store: Option<String>,

    /// Location catalog JSON file
    #[arg(long, global = true, env = "LIBSTATUS_CATALOG")]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record how busy a location is right now
    Submit {
        /// Library name, e.g. "Moffitt Library"
        #[arg(short, long)]
        library: String,

        /// Floor or zone; omit for the whole library
        #[arg(short, long)]
        floor: Option<String>,

        /// Busy level from 1 (wide open) to 5 (extremely busy)
        #[arg(short = 'b', long, allow_negative_numbers = true)]
        level: i64,

        /// Display name to credit
        #[arg(long)]
        by: Option<String>,
    },
    /// Print the dashboard once
    Status {
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Keep the dashboard refreshing until Ctrl+C
    Watch {
        /// Seconds between store fetches (5-60)
        #[arg(short, long, env = "LIBSTATUS_POLL_SECS")]
        interval: Option<u64>,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the most recent contributors
    Contributors {
        /// Maximum number of names
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,
    },
    /// List the locations shown on the dashboard
    Locations,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/library_status.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("library_status.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(store) = cli.store {
        config.store = store;
    }
    if cli.catalog.is_some() {
        config.catalog_path = cli.catalog;
    }

    let store = open_store(&config.store).with_context(|| format!("cannot open store '{}'", config.store))?;

    match cli.command {
        Commands::Submit {
            library,
            floor,
            level,
            by,
        } => {
            let submission = Submission {
                library,
                floor,
                busy_level: level,
                submitted_by: by,
            };
            let reading = submit(&*store, submission, Utc::now()).await?;
            println!(
                "Saved: {} is {} ({}%)",
                reading.location,
                reading.busy_level.label(),
                reading.busy_level.percent()
            );
        }
        Commands::Status { json } => {
            let catalog = config.catalog()?;
            let view = match store.list_all().await {
                Ok(readings) => DashboardView::build(&readings, &catalog, Utc::now()),
                Err(e) => {
                    warn!(error = %e, "Could not fetch readings");
                    DashboardView::build(&[], &catalog, Utc::now())
                        .with_notice(format!("Couldn't load occupancy: {e}"))
                }
            };
            write_view(&mut std::io::stdout().lock(), &view, json)?;
        }
        Commands::Watch { interval, json } => {
            let catalog = config.catalog()?;
            let period = interval.map(poll_interval).unwrap_or(config.poll_interval);

            let handle = Poller::new(store, catalog, period).spawn();
            let mut views = handle.views();

            info!(store = %config.store, "Watching dashboard. Press Ctrl+C to stop.");

            loop {
                tokio::select! {
                    changed = views.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let view = views.borrow_and_update().clone();
                        write_view(&mut std::io::stdout().lock(), &view, json)?;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down");
                        break;
                    }
                }
            }

            handle.shutdown().await;
        }
        Commands::Contributors { limit } => {
            let readings = store.list_all().await?;
            for name in recent_contributors(&readings, limit) {
                println!("{name}");
            }
        }
        Commands::Locations => {
            let catalog: Catalog = config.catalog()?;
            for location in &catalog.locations {
                println!("{location}");
            }
            if !catalog.fallbacks.is_empty() {
                println!("Fallbacks: {}", catalog.fallbacks.join(", "));
            }
        }
    }

    Ok(())
}
