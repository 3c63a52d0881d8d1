//! EdgeWeave CLI - Force-directed edge bundling from the command line.
//!
//! Bundles graphs stored as JSON and serves the chart editor API.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;

use commands::{bundle, config as config_cmd, serve};
use config::Config;

/// EdgeWeave CLI - Bundle graph edges into smooth curves.
#[derive(Parser, Debug)]
#[command(
    name = "ew",
    author,
    version,
    about = "EdgeWeave: force-directed edge bundling",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the REST + WebSocket API.
    Serve {
        /// Port to listen on (overrides EW_PORT and the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// File the editor setup is saved to.
        #[arg(long)]
        save_file: Option<PathBuf>,
    },

    /// Bundle the edges of a graph stored as JSON.
    Bundle {
        /// Input graph: `{"nodes": [...], "links": [...], "diagonal_length": ...}`.
        input: PathBuf,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json or svg.
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Canvas width; with --height, supplies a missing diagonal.
        #[arg(long, requires = "height")]
        width: Option<f64>,

        /// Canvas height.
        #[arg(long, requires = "width")]
        height: Option<f64>,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration commands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;

    match cli.command {
        Commands::Serve { port, save_file } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(save_file) = save_file {
                config.save_file = save_file;
            }
            serve::execute(&config).await?;
        }
        Commands::Bundle {
            input,
            output,
            format,
            width,
            height,
        } => {
            let canvas = width.zip(height);
            bundle::execute(&config, &input, output, format.parse()?, canvas).await?;
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => config_cmd::show(&config)?,
            ConfigCommands::Reset => config_cmd::reset()?,
            ConfigCommands::Path => config_cmd::path()?,
        },
    }

    Ok(())
}
