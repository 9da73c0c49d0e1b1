//! Command-line link checker.
//!
//! Runs the bait detector without starting the monitor.
//!
//! # Usage
//!
//! ```bash
//! # Classify one URL
//! cargo run --bin linkcheck -- check https://youtu.be/dQw4w9WgXcQ
//!
//! # Classify every web link in the recently used bookmark file
//! cargo run --bin linkcheck -- scan
//! cargo run --bin linkcheck -- scan --file ~/.local/share/recently-used.xbel
//! ```
//!
//! The exit status is 1 when any checked link matches.

use link_firewall::config::Config;
use link_firewall::domain::{BaitDetector, ClassificationResult, Classifier};
use link_firewall::infrastructure::watcher::{DEFAULT_DEDUP_WINDOW, RecentLinkReader};
use link_firewall::utils::web_url::parse_web_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

/// Checks links against known bait patterns.
#[derive(Parser)]
#[command(name = "linkcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single URL
    Check {
        /// HTTP(S) URL to classify
        url: String,
    },

    /// Classify every web link in the bookmark file
    Scan {
        /// Bookmark file (defaults to the desktop's recently used list)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let detector = BaitDetector;

    let matched = match cli.command {
        Commands::Check { url } => check(&detector, &url)?,
        Commands::Scan { file } => scan(&detector, file).await?,
    };

    Ok(if matched {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn check(detector: &BaitDetector, input: &str) -> Result<bool> {
    let url = parse_web_url(input)?;
    let result = detector.analyze(url.as_str());
    print_verdict(url.as_str(), &result);
    Ok(result.is_match)
}

async fn scan(detector: &BaitDetector, file: Option<PathBuf>) -> Result<bool> {
    let path = match file {
        Some(path) => path,
        None => Config::load_recent_links_file()?,
    };

    println!(
        "{} {}",
        "Scanning".bright_blue().bold(),
        path.display().to_string().cyan()
    );
    println!();

    let mut reader = RecentLinkReader::new(&path, DEFAULT_DEDUP_WINDOW);
    let events = reader
        .poll()
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut matches = 0;
    for event in &events {
        let result = detector.analyze(&event.url);
        if result.is_match {
            matches += 1;
        }
        print_verdict(&event.url, &result);
    }

    println!();
    println!(
        "{} links checked, {} blocked",
        events.len().to_string().bright_white().bold(),
        if matches > 0 {
            matches.to_string().red().bold()
        } else {
            matches.to_string().green().bold()
        }
    );

    Ok(matches > 0)
}

fn print_verdict(url: &str, result: &ClassificationResult) {
    if result.is_match {
        println!("{} {}", "BLOCK".red().bold(), url.bright_white());
        println!("      {}", result.reason.yellow());
    } else {
        println!("{} {}", "ALLOW".green().bold(), url.bright_white());
    }
    println!(
        "      confidence: {}",
        format!("{:.2}", result.confidence).dimmed()
    );
}
