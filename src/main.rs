use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sitewatch::data::{format_interval, parse_interval};
use sitewatch::{report, App, FileStore, HttpStore, MonitorStore, Settings};
use sitewatch_types::MonitorId;

#[derive(Parser, Debug)]
#[command(name = "sitewatch")]
#[command(about = "Track website uptime from a monitor store")]
struct Args {
    /// Path to a config file (default: sitewatch.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the monitor API
    #[arg(long, conflicts_with = "file")]
    store: Option<String>,

    /// Use a JSON file as the store instead of the monitor API
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Session token for the monitor API
    #[arg(long)]
    token: Option<String>,

    /// Number of recent checks to load per monitor
    #[arg(short, long)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List monitors
    List {
        /// Also fetch the latest check of every monitor
        #[arg(long)]
        status: bool,
    },
    /// Register a website
    Add {
        url: String,

        /// Check interval, in seconds or with a unit ("90s", "5m", "1h")
        #[arg(short, long, default_value = "5m", value_parser = interval_arg)]
        interval: u32,
    },
    /// Delete a monitor
    Remove {
        id: MonitorId,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show status, uptime and recent checks of a monitor
    Show {
        id: MonitorId,

        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Refresh interval in watch mode (default from config)
        #[arg(short, long, value_parser = interval_arg)]
        refresh: Option<u32>,
    },
    /// Export the session state to a JSON file
    Export {
        /// File to write
        #[arg(short, long)]
        output: PathBuf,

        /// Include history and uptime of this monitor
        id: Option<MonitorId>,
    },
}

fn interval_arg(s: &str) -> Result<u32, String> {
    parse_interval(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = args.store {
        settings.store.url = url;
        settings.store.file = None;
    }
    if let Some(file) = args.file {
        settings.store.file = Some(file);
    }
    if let Some(token) = args.token {
        settings.store.token = Some(token);
    }
    if let Some(limit) = args.limit {
        if limit == 0 {
            bail!("--limit must be positive");
        }
        settings.history_limit = limit;
    }

    let store = open_store(&settings)?;
    let mut app = App::new(store, settings.history_limit);
    info!("Using {}", app.source_description());

    match args.command {
        Command::List { status } => list(&mut app, status).await,
        Command::Add { url, interval } => add(&mut app, &url, interval).await,
        Command::Remove { id, yes } => remove(&mut app, &id, yes).await,
        Command::Show { id, watch, refresh } => {
            let refresh = Duration::from_secs(refresh.map_or(settings.refresh_secs, u64::from));
            show(&mut app, id, watch, refresh).await
        }
        Command::Export { output, id } => export(&mut app, &output, id).await,
    }
}

/// Log to stderr so reports on stdout stay clean. `RUST_LOG` overrides the
/// default level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_store(settings: &Settings) -> Result<Arc<dyn MonitorStore>> {
    if let Some(path) = &settings.store.file {
        return Ok(Arc::new(FileStore::new(path)));
    }

    let mut builder = HttpStore::builder()
        .endpoint(settings.store.url.as_str())
        .timeout(settings.store.timeout());
    if let Some(token) = &settings.store.token {
        builder = builder.token(token.as_str());
    }
    Ok(Arc::new(builder.build()?))
}

async fn list(app: &mut App, with_status: bool) -> Result<()> {
    app.refresh_monitors().await?;
    if with_status {
        app.refresh_latest_checks().await;
    }
    print!("{}", report::monitor_list(app.state()));
    Ok(())
}

async fn add(app: &mut App, url: &str, interval: u32) -> Result<()> {
    app.refresh_monitors().await?;
    let monitor = app.add_monitor(url, interval).await?;
    println!(
        "Added monitor {} for {} ({})",
        monitor.id,
        monitor.url,
        format_interval(monitor.interval)
    );
    Ok(())
}

async fn remove(app: &mut App, id: &MonitorId, yes: bool) -> Result<()> {
    app.refresh_monitors().await?;

    if !yes {
        let target = app
            .state()
            .registry()
            .get(id)
            .map_or_else(|| id.to_string(), |m| m.url.clone());
        if !confirm(&format!("Delete monitor {}?", target))? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    app.remove_monitor(id).await?;
    println!("Removed monitor {}", id);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn show(app: &mut App, id: MonitorId, watch: bool, refresh: Duration) -> Result<()> {
    app.refresh_monitors().await?;
    load_detail(app, &id).await?;
    print!("{}", report::monitor_detail(app.state()));

    if !watch {
        return Ok(());
    }

    let mut ticker = tokio::time::interval(refresh);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        }

        if let Err(e) = app.refresh_monitors().await {
            warn!("Keeping previous monitor list: {}", e);
        }
        if app.state().registry().get(&id).is_none() {
            println!("Monitor {} no longer exists.", id);
            return Ok(());
        }
        load_detail(app, &id).await?;
        println!("{}", "-".repeat(40));
        print!("{}", report::monitor_detail(app.state()));
    }
}

async fn load_detail(app: &mut App, id: &MonitorId) -> Result<()> {
    app.select(Some(id.clone()))
        .with_context(|| format!("Cannot show monitor {}", id))?;
    app.settle().await;
    Ok(())
}

async fn export(app: &mut App, output: &std::path::Path, id: Option<MonitorId>) -> Result<()> {
    app.refresh_monitors().await?;
    app.refresh_latest_checks().await;
    if let Some(id) = id {
        load_detail(app, &id).await?;
    }
    app.export_state(output)?;
    println!("Exported state to {}", output.display());
    Ok(())
}
