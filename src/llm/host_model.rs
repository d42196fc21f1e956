//! Local model command: prompt on stdin, reply on stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use errflow_config::HostModelConfig;

use super::CallError;

#[derive(Debug, Clone)]
pub struct HostModel {
    command: Option<String>,
    args: Vec<String>,
}

impl HostModel {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: Some(command.into()),
            args,
        }
    }

    pub fn from_config(config: &HostModelConfig) -> Self {
        Self {
            command: config
                .command
                .clone()
                .filter(|cmd| !cmd.trim().is_empty()),
            args: config.args.clone(),
        }
    }

    pub fn complete(&self, prompt: &str) -> Result<String, CallError> {
        let command = self.command.as_deref().ok_or(CallError::NotConfigured)?;

        let mut child = Command::new(command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CallError::Command(format!("{command}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(prompt.as_bytes());
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CallError::Command(format!("command execution failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CallError::Command(format!(
                "{command} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if reply.is_empty() {
            return Err(CallError::EmptyResponse);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_is_not_configured() {
        let model = HostModel::from_config(&HostModelConfig {
            command: Some("  ".to_string()),
            args: Vec::new(),
        });
        assert!(matches!(model.complete("x"), Err(CallError::NotConfigured)));
    }

    #[test]
    fn test_unknown_binary_is_a_command_error() {
        let model = HostModel::new("errflow-no-such-model-binary", Vec::new());
        assert!(matches!(model.complete("x"), Err(CallError::Command(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_reply_is_read_from_stdout() {
        let model = HostModel::new("cat", Vec::new());
        assert_eq!(model.complete("  echo me \n").unwrap(), "echo me");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_status_reports_stderr() {
        let model = HostModel::new(
            "sh",
            vec!["-c".to_string(), "echo quota exceeded >&2; exit 2".to_string()],
        );
        let err = model.complete("x").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
