use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use mt_core::{BuildStats, Engine};
use mt_db::Database;
use tracing_subscriber::EnvFilter;

use mt_cli::commands::{badge, events, export, notify, status, summary, util, watch};
use mt_cli::{Cli, Commands, Config, JsonSnapshotSource};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

/// Opens the engine and publishes a first build from the snapshot directory.
fn open_engine(
    config_path: Option<&Path>,
) -> Result<(Engine<Database>, JsonSnapshotSource, Config, BuildStats)> {
    let (db, config) = open_database(config_path)?;
    let source = JsonSnapshotSource::new(&config.logs_dir);
    let mut engine = Engine::new(config.engine_config(), db);
    let stats = util::refresh(&mut engine, &source)?;
    tracing::info!(
        events = stats.total_events(),
        skipped = stats.skipped_rows,
        logs = %source.dir().display(),
        "loaded events"
    );
    Ok((engine, source, config, stats))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut engine, source, config, stats) = open_engine(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Status => status::run(&mut stdout, &config, &engine, &stats)?,
        Commands::Events {
            filter,
            sort,
            page,
            json,
        } => events::run(&mut stdout, &engine, filter, sort, *page, *json)?,
        Commands::Summary { filter, json } => summary::run(&mut stdout, &engine, filter, *json)?,
        Commands::Badge { json } => badge::run(&mut stdout, &engine, *json)?,
        Commands::Read { event_id } => notify::read(&mut stdout, &mut engine, event_id)?,
        Commands::Dismiss => notify::dismiss(&mut stdout, &mut engine)?,
        Commands::Reset => notify::reset(&mut stdout, &mut engine)?,
        Commands::Export {
            filter,
            sort,
            format,
        } => export::run(&mut stdout, &engine, filter, sort, *format)?,
        Commands::Watch => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to initialize tokio runtime")?;
            let result = runtime.block_on(watch::run(&mut stdout, &mut engine, &source, &config));
            // A stdin read may still be blocked after Ctrl-C; don't wait on it.
            runtime.shutdown_background();
            result?;
        }
    }

    Ok(())
}
