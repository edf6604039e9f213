// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — command-line driver.
//
// Entry point. Initialises logging, parses the subcommand, and reports
// failures through the human-readable error mapping.

mod commands;

use clap::{Parser, Subcommand};
use scanwerk_core::human_errors::humanize_error;

use commands::{detect, enhance, scan};

/// Scanwerk — turn photographed pages into flat, clean document scans.
#[derive(Parser)]
#[command(name = "scanwerk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the page boundary and export the corners and preview
    Detect(detect::DetectArgs),

    /// Detect, rectify, and render a finished document scan
    Scan(scan::ScanArgs),

    /// Render the document style only, without rectification
    Enhance(enhance::EnhanceArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect(args) => detect::run(args).await,
        Commands::Scan(args) => scan::run(args).await,
        Commands::Enhance(args) => enhance::run(args).await,
    };

    if let Err(err) = result {
        let human = humanize_error(&err);
        eprintln!("error: {err}");
        eprintln!("{} {}", human.message, human.suggestion);
        std::process::exit(1);
    }
}
