use anyhow::Result;
use clap::Parser;
use errflow::cli::{self, Cli};
use std::time::Duration;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to <tmp>/errflow_debug.log (mirrored to stderr when RUST_LOG is set).
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied later).
    errflow::debug::init_log_bridge(cli.log_level.map(cli::LogLevelArg::to_level_filter));

    log::info!("Starting errflow {}", errflow::VERSION);

    // Runtime for provider calls; the parser itself is synchronous.
    let runtime = Runtime::new()?;
    let result = cli::run_cli(cli, &runtime);

    // A provider call abandoned on timeout may still be running on a blocking thread.
    runtime.shutdown_timeout(Duration::from_secs(2));

    match result {
        Ok(0) => Ok(()),
        Ok(code) => {
            log::logger().flush();
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("errflow: error: {e:#}");
            log::error!("{e:#}");
            log::logger().flush();
            std::process::exit(1);
        }
    }
}
