//! Shared integration test helpers for errflow.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Node trace used across CLI tests.
pub const NODE_TRACE: &str = "at stepThree (stepThree.js:12:5)\n\
                              at stepTwo (stepTwo.js:8:3)\n\
                              TypeError: Cannot read properties of undefined (reading 'value')\n";

/// Isolated config location for invoking the binary.
///
/// The `TempDir` is removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.yaml")
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// `errflow --config <tmp>/config.yaml --offline <args>` with `stdin` piped in.
    pub fn run(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_errflow"))
            .arg("--config")
            .arg(self.config_path())
            .arg("--offline")
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn errflow");

        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(stdin.as_bytes())
                .expect("Failed to write stdin");
        }
        child.wait_with_output().expect("Failed to wait for errflow")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
