use std::path::PathBuf;

use tracing::info;

use crate::config::{Config, android_root_or_cwd};
use crate::error::{Error, Result};
use crate::process::{ProcessConfig, spawn_and_stream};

/// Marker rendered in place of the crash trace when capture or
/// symbolication fails.
pub const UNAVAILABLE_MARKER: &str = "(diagnostics unavailable)";

const CAPTURE_ARGS: &[&str] = &["bugreport"];

/// Capture a device diagnostic dump and symbolicate it.
///
/// Both steps are external commands with a "text on success, non-zero on
/// failure" contract; either failing is `DiagnosticsUnavailable` and the
/// caller degrades to `UNAVAILABLE_MARKER` instead of aborting the run.
pub async fn collect(config: &Config) -> Result<String> {
    let raw = capture_bugreport(config).await?;
    symbolicate(config, &raw).await
}

async fn capture_bugreport(config: &Config) -> Result<String> {
    info!(command = config.capture_command, "capturing device diagnostics");
    let output = spawn_and_stream(ProcessConfig {
        command: config.capture_command.clone(),
        args: CAPTURE_ARGS.iter().map(|s| s.to_string()).collect(),
        working_dir: android_root_or_cwd(config),
        timeout: None,
        log_prefix: "diagnostics:capture".to_string(),
    })
    .await
    .map_err(|e| Error::DiagnosticsUnavailable(e.to_string()))?;

    if !output.success() {
        return Err(Error::DiagnosticsUnavailable(format!(
            "capture exited with code {}",
            output.exit_code
        )));
    }
    Ok(output.stdout())
}

async fn symbolicate(config: &Config, raw: &str) -> Result<String> {
    let dump_path = scratch_dump_path();
    std::fs::write(&dump_path, raw)
        .map_err(|e| Error::DiagnosticsUnavailable(format!("write crash dump: {e}")))?;

    info!(command = config.symbolizer_command, "symbolicating crash dump");
    let output = spawn_and_stream(ProcessConfig {
        command: config.symbolizer_command.clone(),
        args: vec![dump_path.display().to_string()],
        working_dir: android_root_or_cwd(config),
        timeout: None,
        log_prefix: "diagnostics:symbolize".to_string(),
    })
    .await
    .map_err(|e| Error::DiagnosticsUnavailable(e.to_string()))?;

    let _ = std::fs::remove_file(&dump_path);

    if !output.success() {
        return Err(Error::DiagnosticsUnavailable(format!(
            "symbolizer exited with code {}",
            output.exit_code
        )));
    }
    Ok(output.stdout())
}

fn scratch_dump_path() -> PathBuf {
    let pid = std::process::id();
    std::env::temp_dir().join(format!("wktriage-crashdump-{pid}.txt"))
}
