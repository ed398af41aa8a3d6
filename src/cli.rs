//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dance Analysis - count poses and motion events in landmark videos
#[derive(Parser, Debug)]
#[command(name = "dance-analysis")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one or more videos and print a JSON summary per video
    Analyze {
        /// Landmark dump per video (JSON Lines)
        #[arg(required = true)]
        videos: Vec<String>,

        /// Override a threshold, e.g. `squat_knee_angle=140` or `gait.min_alt_steps=4`
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, String)>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Give up on a video after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Load and validate a config file
    Validate {
        path: PathBuf,
    },

    /// Write the default configuration
    Init {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
