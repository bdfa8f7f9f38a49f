//! Release Cinema CLI: trailers and release animations from git history.
//!
//! Usage:
//!   release-cinema render --auto | --from <ref> --to <ref>   Render trailer.gif and trailer.mp4
//!   release-cinema analyze --auto | --from <ref> --to <ref>  Print the range summary as JSON
//!   release-cinema simulate [--out assets/cli_sim.gif]       Render the CLI release animation
//!   release-cinema gallery [--readme README.md]              Update the README gallery block
//!   release-cinema check                                     Check required tools

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use cinema_common::config::AppConfig;
use cinema_common::logging::init_logging;

mod commands;
mod options;

use options::{RangeArgs, StyleArgs};

#[derive(Parser, Debug)]
#[command(
    name = "release-cinema",
    about = "Release trailers and CLI animations from git history",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the trailer slideshow as GIF and MP4
    Render {
        #[command(flatten)]
        range: RangeArgs,

        /// Directory for frames and artifacts
        #[arg(long, default_value = "assets")]
        out_dir: std::path::PathBuf,

        /// Seconds each slide is shown (minimum 1)
        #[arg(long, default_value = "3")]
        slide_seconds: f64,

        /// Output frame rate of the MP4 (minimum 1)
        #[arg(long, default_value = "30")]
        fps: u32,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print a JSON summary of a commit range
    Analyze {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Render a typed-out release in a terminal as a GIF
    Simulate {
        /// Output GIF path
        #[arg(long, default_value = "assets/cli_sim.gif")]
        out: std::path::PathBuf,

        /// Tag shown in the typed commands
        #[arg(long, default_value = "vX.Y.Z")]
        tag: String,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Update the gallery block in the README
    Gallery {
        /// README to update
        #[arg(long, default_value = "README.md")]
        readme: std::path::PathBuf,

        /// Asset directory, relative to the README
        #[arg(long, default_value = "assets")]
        assets_dir: String,
    },

    /// Check that git, ImageMagick and ffmpeg are available
    Check,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version are successful exits; anything else is a usage error.
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            e.print().ok();
            return ExitCode::from(code);
        }
    };

    let (config, config_error) = match AppConfig::try_load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    init_logging(&logging);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Ignoring config file; using defaults");
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✖ {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Render {
            range,
            out_dir,
            slide_seconds,
            fps,
            style,
        } => commands::render::run(range, out_dir, slide_seconds, fps, style, config),
        Commands::Analyze { range } => commands::analyze::run(range, config),
        Commands::Simulate { out, tag, style } => commands::simulate::run(out, tag, style, config),
        Commands::Gallery { readme, assets_dir } => {
            commands::gallery::run(readme, assets_dir, config)
        }
        Commands::Check => commands::check::run(config),
    }
}
