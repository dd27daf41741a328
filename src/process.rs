use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Configuration for spawning a child process.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub log_prefix: String,
}

/// Output from a completed child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout(&self) -> String {
        self.stdout_lines.join("\n")
    }
}

/// Spawn a child process and stream its output line-by-line through tracing.
///
/// On timeout the child is killed and `Error::Process` is returned; the
/// external history and diagnostics commands are the only places in the
/// pipeline that can block for unbounded time.
pub async fn spawn_and_stream(config: ProcessConfig) -> Result<ProcessOutput> {
    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args)
        .current_dir(&config.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::Process(format!("failed to spawn '{}': {e}", config.command)))?;

    let stdout = child.stdout.take().expect("stdout is piped");
    let stderr = child.stderr.take().expect("stderr is piped");

    let prefix_out = config.log_prefix.clone();
    let prefix_err = config.log_prefix;

    let stdout_task = tokio::spawn(async move {
        let mut lines = Vec::new();
        let mut reader = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            debug!("[{prefix_out}] {line}");
            lines.push(line);
        }
        lines
    });

    let stderr_task = tokio::spawn(async move {
        let mut lines = Vec::new();
        let mut reader = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            warn!("[{prefix_err}] {line}");
            lines.push(line);
        }
        lines
    });

    let status = if let Some(dur) = config.timeout {
        match tokio::time::timeout(dur, child.wait()).await {
            Ok(r) => r.map_err(|e| Error::Process(format!("wait error: {e}")))?,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(Error::Process(format!(
                    "'{}' timed out after {dur:?}",
                    config.command
                )));
            }
        }
    } else {
        child
            .wait()
            .await
            .map_err(|e| Error::Process(format!("wait error: {e}")))?
    };

    let stdout_lines = stdout_task
        .await
        .map_err(|e| Error::Process(format!("stdout reader failed: {e}")))?;
    let stderr_lines = stderr_task
        .await
        .map_err(|e| Error::Process(format!("stderr reader failed: {e}")))?;

    Ok(ProcessOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout_lines,
        stderr_lines,
    })
}
