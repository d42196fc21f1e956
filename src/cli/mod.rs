//! Command-line interface for errflow.
//!
//! Argument parsing lives here; the subcommand bodies are in [`commands`].

pub mod commands;

use clap::{Parser, Subcommand};
use errflow_config::Config;
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// errflow - turn terminal error output into a causal flow and an explanation
#[derive(Parser)]
#[command(name = "errflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/errflow/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Never call a language model; use the built-in rules
    #[arg(long, global = true)]
    pub offline: bool,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Explain the failure in a log file (or stdin)
    Explain {
        /// Log file to read; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Print the error flow of a log file (or stdin) as a Mermaid diagram
    Flow {
        /// Log file to read; stdin when omitted
        file: Option<PathBuf>,

        /// Print the visualization payload as JSON instead
        #[arg(long)]
        json: bool,

        /// Also render the diagram to an SVG file
        #[arg(long, value_name = "PATH")]
        svg: Option<PathBuf>,
    },

    /// Run a command, capture its output and explain it if it fails
    Run {
        /// Also print the error flow diagram
        #[arg(long)]
        visualize: bool,

        /// Command and arguments to run
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
        command: Vec<String>,
    },
}

/// Load config, apply its log level and dispatch the subcommand.
///
/// Returns the process exit code.
pub fn run_cli(cli: Cli, runtime: &Runtime) -> anyhow::Result<i32> {
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    crate::debug::apply_config_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Explain { file } => commands::explain(file.as_deref(), &config, cli.offline, runtime),
        Commands::Flow { file, json, svg } => commands::flow(file.as_deref(), &config, json, svg.as_deref()),
        Commands::Run { visualize, command } => {
            commands::run(&command, visualize, &config, cli.offline, runtime)
        }
    }
}
