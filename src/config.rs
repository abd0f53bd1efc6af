use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Project settings read from `appctl.toml`. Every field has a default, so a
/// missing file behaves exactly like the original Makefile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pid_file: PathBuf,
    pub log_file: PathBuf,
    pub server: ServerConfig,
    pub install: InstallConfig,
    pub test: TestConfig,
    pub compose: ComposeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub program: String,
    pub app: String,
    pub host: String,
    pub port: u16,
    pub reload_flag: String,
    pub extra_args: Vec<String>,
}

/// `[install]`: command line, program first.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfig {
    pub command: Vec<String>,
}

/// `[compose]`: the compose tool; subcommands are appended per target.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pid_file: PathBuf::from(".server.pid"),
            log_file: PathBuf::from("server.log"),
            server: ServerConfig::default(),
            install: InstallConfig::default(),
            test: TestConfig::default(),
            compose: ComposeConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            program: "uvicorn".into(),
            app: "app.main:app".into(),
            host: "0.0.0.0".into(),
            port: 8000,
            reload_flag: "--reload".into(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            command: words(&["pip", "install", "-r", "requirements.txt"]),
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            command: words(&["pytest"]),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            command: words(&["docker", "compose"]),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

impl Config {
    /// Load the config at `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
