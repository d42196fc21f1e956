//! Debug logging bridge.
//!
//! Routes every `log::` record to `<tmp>/errflow_debug.log` so stdout stays
//! reserved for diagrams, JSON and explanations. When `RUST_LOG` is set the
//! same lines are mirrored to stderr.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the config
//! file's `log_level` (applied after the config is loaded).

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

enum LogFile {
    Unopened,
    Open(File),
    Failed,
}

struct LogBridge {
    file: Mutex<LogFile>,
    mirror_stderr: bool,
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Set when the level came from the CLI or `RUST_LOG`; config cannot override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("errflow_debug.log")
}

impl LogBridge {
    fn write_line(&self, line: &str) {
        let mut file = self.file.lock();
        if matches!(*file, LogFile::Unopened) {
            *file = match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
            {
                Ok(f) => LogFile::Open(f),
                // Logging must never interfere with command output.
                Err(_) => LogFile::Failed,
            };
        }
        if let LogFile::Open(f) = &mut *file {
            let _ = f.write_all(line.as_bytes());
        }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_line(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let LogFile::Open(f) = &mut *self.file.lock() {
            let _ = f.flush();
        }
    }
}

/// Install the bridge as the global logger.
///
/// `cli_level` wins over `RUST_LOG`; with neither set logging stays off until
/// [`apply_config_level`] runs. Calling this twice is harmless.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_level = rust_log.as_deref().and_then(parse_rust_log);

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        file: Mutex::new(LogFile::Unopened),
        mirror_stderr: rust_log.is_some(),
    });
    if log::set_logger(bridge).is_err() {
        return;
    }

    match cli_level.or(env_level) {
        Some(level) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            log::set_max_level(level);
        }
        None => log::set_max_level(log::LevelFilter::Off),
    }
}

/// Apply the config file's level unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_level(level: log::LevelFilter) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level);
    }
}

/// Most verbose level named in a `RUST_LOG` value.
///
/// Accepts plain levels (`debug`) and `target=level` directives separated by
/// commas; targets are not filtered individually.
pub fn parse_rust_log(value: &str) -> Option<log::LevelFilter> {
    value
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next()?.trim();
            level.parse::<log::LevelFilter>().ok()
        })
        .max()
}
