use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Raw config file shape. Every field is optional; defaults and CLI
/// overrides are applied in `merge`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub results_dir: Option<PathBuf>,
    pub generated_dir: Option<PathBuf>,
    pub layout_tests_dir: Option<PathBuf>,
    pub workers: Option<usize>,
    pub history_command: Option<String>,
    pub history_retries: Option<u32>,
    pub history_backoff_ms: Option<u64>,
    pub history_timeout: Option<u64>,
    pub capture_command: Option<String>,
    pub symbolizer_command: Option<String>,
    pub android_root: Option<PathBuf>,
    pub changeset_url: Option<String>,
    pub skip_diagnostics: Option<bool>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub results_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub layout_tests_dir: PathBuf,
    pub workers: usize,
    pub history_command: String,
    pub history_retries: u32,
    pub history_backoff_ms: u64,
    pub history_timeout: Option<u64>,
    pub capture_command: String,
    pub symbolizer_command: String,
    pub android_root: Option<PathBuf>,
    pub changeset_url: String,
    pub skip_diagnostics: bool,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.clone()));
                }
                let content = std::fs::read_to_string(path)?;
                parse_config(&content)?
            }
            None => ConfigFile::default(),
        };

        merge(file_config, cli)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    Ok(config)
}

fn require_dir(value: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    value.ok_or_else(|| {
        Error::ConfigValidation(format!(
            "{name} must be set via --{} or the config file",
            name.replace('_', "-")
        ))
    })
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Result<Config> {
    let config = Config {
        results_dir: require_dir(cli.results_dir.clone().or(file.results_dir), "results_dir")?,
        generated_dir: require_dir(
            cli.generated_dir.clone().or(file.generated_dir),
            "generated_dir",
        )?,
        layout_tests_dir: require_dir(
            cli.layout_tests_dir.clone().or(file.layout_tests_dir),
            "layout_tests_dir",
        )?,
        workers: cli.workers.or(file.workers).unwrap_or(12),
        history_command: cli
            .history_command
            .clone()
            .or(file.history_command)
            .unwrap_or_else(|| "svn".to_string()),
        history_retries: cli.history_retries.or(file.history_retries).unwrap_or(3),
        history_backoff_ms: file.history_backoff_ms.unwrap_or(500),
        history_timeout: cli.history_timeout.or(file.history_timeout),
        capture_command: file.capture_command.unwrap_or_else(|| "adb".to_string()),
        symbolizer_command: file
            .symbolizer_command
            .unwrap_or_else(|| "vendor/google/tools/stack".to_string()),
        android_root: file.android_root,
        changeset_url: file
            .changeset_url
            .unwrap_or_else(|| "http://trac.webkit.org/changeset/".to_string()),
        skip_diagnostics: cli.skip_diagnostics || file.skip_diagnostics.unwrap_or(false),
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.workers == 0 {
        return Err(Error::ConfigValidation("workers must be > 0".to_string()));
    }
    if config.history_retries == 0 {
        return Err(Error::ConfigValidation(
            "history_retries must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Working directory for the symbolizer: the configured Android root, or
/// the process's current directory.
pub fn android_root_or_cwd(config: &Config) -> PathBuf {
    config
        .android_root
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf()))
}
