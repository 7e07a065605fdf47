// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photobooth::backends::camera::Facing;
use photobooth::filters::FilterId;
use photobooth::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Festive photo booth with generated National Day backgrounds")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available filters
    Filters,

    /// List available cameras
    Cameras,

    /// Capture a square still without generating
    Capture {
        /// Camera to use: user (front) or environment (back)
        #[arg(short, long)]
        facing: Option<Facing>,

        /// Digital zoom between 1.0 and 3.0
        #[arg(short, long, default_value = "1.0")]
        zoom: f32,

        /// Turn the torch on while capturing (back camera only)
        #[arg(short, long)]
        torch: bool,

        /// Output file path (default: ~/Pictures/photobooth/national_day_TIMESTAMP.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one booth session: capture, filter, generate, then save
    Run {
        /// Use this image instead of the camera
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Camera to use when no input is given
        #[arg(long)]
        facing: Option<Facing>,

        /// Filter to bake before generation (default: sketch)
        #[arg(long)]
        filter: Option<FilterId>,

        /// Output directory for the result
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the printable page afterwards
        #[arg(short, long)]
        print: bool,

        /// Share the result (saves it with a hint where sharing is unavailable)
        #[arg(short, long)]
        share: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=photobooth=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Filters) => cli::list_filters(),
        Some(Commands::Cameras) => cli::list_cameras(),
        Some(Commands::Capture {
            facing,
            zoom,
            torch,
            output,
        }) => cli::capture_photo(facing, zoom, torch, output),
        Some(Commands::Run {
            input,
            facing,
            filter,
            output,
            print,
            share,
        }) => cli::run_booth(cli::RunOptions {
            input,
            facing,
            filter,
            output,
            print,
            share,
        }),
        None => cli::run_booth(cli::RunOptions::default()),
    }
}
