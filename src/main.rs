//! Joke Rotator - serve jokes from `SQLite` in a durable round-robin order.
//!
//! `GET /joke` returns the joke under a persisted cursor and advances it,
//! wrapping after the last joke. Batch commands fill, clean and export the
//! collection:
//!   joke-rotator init                              # tables, cursor, config
//!   joke-rotator import dad_jokes.csv --staging    # load raw jokes
//!   joke-rotator transfer                          # staging -> jokes
//!   joke-rotator export -o cleaned_jokes.csv       # dump jokes
//!   joke-rotator serve --port 5000                 # GET /joke

mod application;
mod cli;
mod domain;
mod infrastructure;
mod server;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    collect_stats, export_jokes, format_import_report, format_stats, format_transfer_report,
    import_file, transfer_staged, ImportOptions,
};
use cli::{column_selector, import_table, Cli, Commands};
use domain::AppConfig;
use infrastructure::{ensure_config_exists, CursorStore, JokeStore};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = cli.app_config()?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config)?;
        }
        Commands::Init => {
            cmd_init(&config, cli.config.as_path())?;
        }
        Commands::Import {
            files,
            column,
            column_index,
            staging,
        } => {
            let options = ImportOptions {
                column: column_selector(column, column_index),
                table: import_table(staging),
            };
            cmd_import(&config, &files, &options)?;
        }
        Commands::Transfer => {
            cmd_transfer(&config)?;
        }
        Commands::Export { output } => {
            cmd_export(&config, &output)?;
        }
        Commands::Stats => {
            cmd_stats(&config)?;
        }
        Commands::Cursor { set } => {
            cmd_cursor(&config, set)?;
        }
    }

    Ok(())
}

/// Run the HTTP server until shutdown.
fn cmd_serve(config: &AppConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(server::run(config))
}

/// Create schema, cursor record and default config file.
fn cmd_init(config: &AppConfig, config_path: &std::path::Path) -> domain::Result<()> {
    let store = JokeStore::open(&config.storage.database_path)?;
    let cursor = CursorStore::new(&config.storage.cursor_path);
    let next = cursor.read();

    if ensure_config_exists(config_path)? {
        println!("{} Wrote {}", "✓".green(), config_path.display());
    }

    println!(
        "{} Tables 'jokes' and 'uncleaned_jokes' ensured in {}",
        "✓".green().bold(),
        config.storage.database_path.display()
    );
    println!(
        "{} Cursor at {} (next joke id: {next})",
        "✓".green().bold(),
        cursor.path().display()
    );

    if store.count(domain::JokeTable::Jokes)? == 0 {
        println!(
            "{} No jokes yet. Add some with: joke-rotator import <file.csv>",
            "!".yellow().bold()
        );
    }

    Ok(())
}

/// Import CSV files one after another into the same table.
fn cmd_import(
    config: &AppConfig,
    files: &[std::path::PathBuf],
    options: &ImportOptions,
) -> domain::Result<()> {
    let mut store = JokeStore::open(&config.storage.database_path)?;

    for path in files {
        let report = import_file(&mut store, path, options)?;
        println!("{}", format_import_report(path, options.table, &report));
    }

    println!(
        "\n📁 Total unique jokes in {}: {}",
        options.table,
        store.count(options.table)?
    );

    Ok(())
}

/// Move staged jokes into the final table.
fn cmd_transfer(config: &AppConfig) -> domain::Result<()> {
    let mut store = JokeStore::open(&config.storage.database_path)?;
    let report = transfer_staged(&mut store)?;

    println!("{}", format_transfer_report(&report));

    Ok(())
}

/// Export all jokes to CSV.
fn cmd_export(config: &AppConfig, output: &std::path::Path) -> domain::Result<()> {
    let store = JokeStore::open(&config.storage.database_path)?;
    let written = export_jokes(&store, output)?;

    println!(
        "{} Exported {} jokes to {}",
        "✓".green().bold(),
        written,
        output.display()
    );

    Ok(())
}

/// Show statistics command.
fn cmd_stats(config: &AppConfig) -> domain::Result<()> {
    let store = JokeStore::open(&config.storage.database_path)?;
    let cursor = CursorStore::new(&config.storage.cursor_path);

    println!("{}", format_stats(&collect_stats(&store, &cursor)?));

    Ok(())
}

/// Show or set the cursor.
fn cmd_cursor(config: &AppConfig, set: Option<i64>) -> domain::Result<()> {
    let cursor = CursorStore::new(&config.storage.cursor_path);

    if let Some(value) = set {
        cursor.try_write(value)?;
        println!("{} Next joke id set to {}", "✓".green().bold(), value);
    } else {
        println!("{}", cursor.read());
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
