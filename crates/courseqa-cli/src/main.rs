// crates/courseqa-cli/src/main.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{FilterArgs, SourceArgs};

/// Terminal front end for the course QA issue pipeline.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print KPI cards and aggregate tables for the filtered issue set.
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Emit the aggregates as a JSON document instead of tables.
        #[arg(long)]
        json: bool,
    },
    /// Print the work-in-progress table (open issues, most severe first).
    Wip {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Maximum number of rows to print.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write the derived, filtered table to a parquet file.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            source,
            filter,
            json,
        } => commands::summary::run(&source, &filter, json),
        Commands::Wip {
            source,
            filter,
            limit,
        } => commands::wip::run(&source, &filter, limit),
        Commands::Export {
            source,
            filter,
            out,
        } => commands::export::run(&source, &filter, &out),
    }
}
