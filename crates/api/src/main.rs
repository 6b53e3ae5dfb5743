//! RosterSync - shift roster image to calendar
//!
//! Main entry point for the command-line application.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rostersync_api::commands::{self, PreviewResponse, StageResponse, SyncResponse};
use rostersync_api::{init_tracing, AppContext};
use rostersync_infra::config;
use serde::Serialize;
use tracing::{debug, info};

/// Read a shift roster image and sync it into Google Calendar
#[derive(Parser, Debug)]
#[command(name = "rostersync", version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a roster image and show the events it would produce
    Preview {
        /// Path to the roster image (PNG or JPEG)
        #[arg(long)]
        image: PathBuf,
    },

    /// Parse a roster image and write its events to the calendar
    Sync {
        /// Identifier used to serialize concurrent runs
        #[arg(long)]
        user: String,

        /// Path to the roster image (PNG or JPEG)
        #[arg(long)]
        image: PathBuf,

        /// Show the parsed roster and ask before writing
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env loaded"),
    }

    let ctx = AppContext::new(config).context("failed to initialise application")?;
    info!(command = ?cli.command, "rostersync starting");

    run(&ctx, cli.command, cli.json).await
}

async fn run(ctx: &AppContext, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Preview { image } => {
            let image = read_image(&image)?;
            let response = commands::preview(ctx, &image).await?;
            if json {
                return print_json(&response);
            }
            match response {
                PreviewResponse::NoText => println!("No text found in image."),
                PreviewResponse::Parsed { roster } => print!("{}", commands::render_roster(&roster)),
            }
        }
        Commands::Sync { user, image, confirm: false } => {
            let image = read_image(&image)?;
            let response = commands::sync(ctx, &user, &image).await?;
            print_sync(&response, json)?;
        }
        Commands::Sync { user, image, confirm: true } => {
            let image = read_image(&image)?;
            let roster = match commands::stage(ctx, &user, &image).await? {
                StageResponse::NoText => {
                    println!("No text found in image.");
                    return Ok(());
                }
                StageResponse::Staged { roster, .. } => roster,
            };

            print!("{}", commands::render_roster(&roster));
            if !ask("Write these events to the calendar?")? {
                commands::cancel(ctx, &user).await?;
                println!("Cancelled.");
                return Ok(());
            }

            let response = commands::confirm(ctx, &user).await?;
            print_sync(&response, json)?;
        }
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    if bytes.is_empty() {
        bail!("image {} is empty", path.display());
    }
    Ok(bytes)
}

fn print_sync(response: &SyncResponse, json: bool) -> Result<()> {
    if json {
        print_json(response)?;
    }
    match response {
        SyncResponse::NoText if !json => println!("No text found in image."),
        SyncResponse::NoText => {}
        SyncResponse::Synced { roster, report } => {
            if !json {
                print!("{}", commands::render_roster(roster));
                print!("{}", commands::render_report(report));
            }
            if !report.is_complete() {
                bail!("{} calendar writes failed", report.failures.len());
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ask(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
