//! CLI entry point for the `ttrav` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tree_traversal::cli::commands;
use tree_traversal::graph::TreeShape;
use tree_traversal::TrvError;

#[derive(Parser)]
#[command(
    name = "ttrav",
    about = "Generate typed trees and count true B nodes with optional attribute caching"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a tree into a .ttree file (refused if the file already holds one)
    Populate {
        /// Path to the .ttree file
        file: PathBuf,
        /// Number of A->B->A levels (0 = default)
        #[arg(long, default_value = "5")]
        depth: u32,
        /// Children per parent (0 = default)
        #[arg(long, default_value = "4")]
        fanout: u32,
        /// Seed for the random "value" properties
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Count the B nodes whose "value" is true (-1 when there is no root)
    Traverse {
        /// Path to the .ttree file
        file: PathBuf,
        /// Depth-first instead of breadth-first
        #[arg(long)]
        depth_first: bool,
        /// What to cache: label, property, or label,property
        #[arg(long)]
        cache: Option<String>,
        /// Number of traversals to run with the same caches
        #[arg(long, default_value = "1")]
        repeat: usize,
        /// Clear the caches before every run after the first
        #[arg(long)]
        clear_between: bool,
    },
    /// Display information about a .ttree file
    Info {
        /// Path to the .ttree file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Populate {
            file,
            depth,
            fanout,
            seed,
        } => commands::cmd_populate(&file, TreeShape::new(depth, fanout), seed, json),
        Commands::Traverse {
            file,
            depth_first,
            cache,
            repeat,
            clear_between,
        } => commands::cmd_traverse(
            &file,
            depth_first,
            cache.as_deref(),
            repeat,
            clear_between,
            json,
        ),
        Commands::Info { file } => commands::cmd_info(&file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            TrvError::Io(_) => 1,
            TrvError::InvalidMagic
            | TrvError::UnsupportedVersion(_)
            | TrvError::Truncated
            | TrvError::Corrupt(_)
            | TrvError::Compression(_) => 2,
            TrvError::TreeExists { .. } | TrvError::InvalidTreeShape { .. } => 3,
            TrvError::NodeNotFound(_)
            | TrvError::InvalidEdgeTarget(_)
            | TrvError::PropertyNotFound { .. } => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
