//! Subcommand implementations.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;

use errflow_config::Config;
use errflow_parser::{ErrorFlow, parse_log};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::capture::{CaptureStore, SessionId, tail_lines};
use crate::explain::{Explainer, Explanation};
use crate::visualize::{VisualizationPayload, render_svg};

/// Printed when there is nothing to analyze. Not an error.
pub const EMPTY_INPUT_MESSAGE: &str = "errflow: no output captured, nothing to analyze";

/// Read a log file, or all of stdin when `file` is `None`. Invalid UTF-8 is replaced.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    let bytes = match file {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// The trailing `snapshot_lines` of `text`, or `None` when nothing but whitespace remains.
pub fn snapshot(text: &str, config: &Config) -> Option<String> {
    let snapshot = tail_lines(text, config.snapshot_lines);
    if snapshot.trim().is_empty() {
        None
    } else {
        Some(snapshot)
    }
}

pub fn explain(file: Option<&Path>, config: &Config, offline: bool, runtime: &Runtime) -> Result<i32> {
    let input = read_input(file)?;
    let Some(snapshot) = snapshot(&input, config) else {
        println!("{EMPTY_INPUT_MESSAGE}");
        return Ok(0);
    };

    let flow = parse_log(&snapshot);
    let explanation = explain_snapshot(&snapshot, config, offline, runtime);
    print_report(&flow, &explanation);
    Ok(0)
}

pub fn flow(file: Option<&Path>, config: &Config, json: bool, svg: Option<&Path>) -> Result<i32> {
    let input = read_input(file)?;
    let Some(snapshot) = snapshot(&input, config) else {
        println!("{EMPTY_INPUT_MESSAGE}");
        return Ok(0);
    };

    let payload = VisualizationPayload::from_flow(&parse_log(&snapshot));
    if json {
        println!("{}", payload.to_json()?);
    } else {
        print!("{}", payload.diagram);
    }

    if let Some(path) = svg {
        let document = render_svg(&payload.diagram)?;
        fs::write(path, document).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("SVG written to {}", path.display());
    }
    Ok(0)
}

/// Run a child process, mirror and capture its output, and report on failure.
///
/// Returns the child's exit code.
pub fn run(
    command: &[String],
    visualize: bool,
    config: &Config,
    offline: bool,
    runtime: &Runtime,
) -> Result<i32> {
    let (program, args) = command.split_first().context("no command given")?;

    let store = Arc::new(CaptureStore::new());
    let session = SessionId::new(format!("run-{}", std::process::id()));

    log::info!("Running {program} {args:?}");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let stderr = child.stderr.take().context("child stderr was not captured")?;
    let readers = [
        spawn_capture(stdout, io::stdout(), Arc::clone(&store), session.clone()),
        spawn_capture(stderr, io::stderr(), Arc::clone(&store), session.clone()),
    ];

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {program}"))?;
    for reader in readers {
        if reader.join().is_err() {
            log::warn!("Output capture thread panicked");
        }
    }

    let code = exit_code(status);
    log::info!("{program} exited with {status}");
    if status.success() {
        return Ok(code);
    }

    let Some(snapshot) = store
        .snapshot(&session, config.snapshot_lines)
        .filter(|text| !text.trim().is_empty())
    else {
        println!("{EMPTY_INPUT_MESSAGE}");
        return Ok(code);
    };

    println!();
    println!("errflow: {program} failed ({status})");
    let flow = parse_log(&snapshot);
    let explanation = explain_snapshot(&snapshot, config, offline, runtime);
    print_report(&flow, &explanation);
    if visualize {
        println!();
        print!("{}", VisualizationPayload::from_flow(&flow).diagram);
    }
    Ok(code)
}

/// Explain a snapshot on the runtime; Ctrl-C cancels a pending model call.
fn explain_snapshot(snapshot: &str, config: &Config, offline: bool, runtime: &Runtime) -> Explanation {
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let explainer = Explainer::from_config(config, offline, root);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted, cancelling model request");
                cancel.cancel();
            }
        })
    };

    let explanation = runtime.block_on(explainer.explain(snapshot, &cancel));
    interrupt.abort();
    explanation
}

fn print_report(flow: &ErrorFlow, explanation: &Explanation) {
    match (&flow.error_type, &flow.error_message) {
        (Some(kind), Some(message)) => println!("Error: {kind}: {message}"),
        (Some(kind), None) => println!("Error: {kind}"),
        _ => {}
    }
    if !flow.frames.is_empty() {
        let labels: Vec<&str> = flow.frames.iter().map(|f| f.label.as_str()).collect();
        println!("Flow: {}", labels.join(" -> "));
    }
    println!();
    println!("{}", explanation.text);
    println!();
    println!("(explanation from {})", explanation.source);
}

/// Copy `source` to `sink` line by line while appending it to the capture store.
///
/// A final chunk without a newline gets one in the store, so lines from the
/// other stream of the same session start on their own line.
fn spawn_capture<R, W>(
    source: R,
    mut sink: W,
    store: Arc<CaptureStore>,
    session: SessionId,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut line = Vec::new();
        let mut open_line = false;
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let _ = sink.write_all(&line);
                    let _ = sink.flush();
                    open_line = !line.ends_with(b"\n");
                    store.append(&session, &String::from_utf8_lossy(&line));
                }
                Err(e) => {
                    log::warn!("Reading child output failed: {e}");
                    break;
                }
            }
        }
        if open_line {
            store.append(&session, "\n");
        }
    })
}

/// Exit code to propagate; signals map to `128 + signal` on Unix.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_skips_blank_input() {
        let config = Config::default();
        assert!(snapshot("", &config).is_none());
        assert!(snapshot("  \n\t\n", &config).is_none());
        assert_eq!(snapshot("a\nb", &config).as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_snapshot_keeps_trailing_lines() {
        let mut config = Config::default();
        config.snapshot_lines = 2;
        assert_eq!(snapshot("1\n2\n3\n", &config).as_deref(), Some("2\n3"));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("build.log");
        fs::write(&path, b"KeyError: 'x'\n\xff").unwrap();
        let text = read_input(Some(&path)).unwrap();
        assert!(text.starts_with("KeyError: 'x'\n"));
        assert!(read_input(Some(&dir.path().join("missing.log"))).is_err());
    }

    #[test]
    fn test_capture_terminates_partial_last_line() {
        let store = Arc::new(CaptureStore::new());
        let session = SessionId::new("run");

        spawn_capture(
            io::Cursor::new(b"progress 50%".to_vec()),
            io::sink(),
            Arc::clone(&store),
            session.clone(),
        )
        .join()
        .unwrap();
        spawn_capture(
            io::Cursor::new(b"KeyError: 'x'\n".to_vec()),
            io::sink(),
            Arc::clone(&store),
            session.clone(),
        )
        .join()
        .unwrap();

        assert_eq!(
            store.snapshot(&session, 10).as_deref(),
            Some("progress 50%\nKeyError: 'x'")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_passthrough() {
        let status = Command::new("sh").args(["-c", "exit 7"]).status().unwrap();
        assert_eq!(exit_code(status), 7);
    }
}
