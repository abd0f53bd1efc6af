use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::config::Config;
use crate::error::ToolError;

/// A single external tool call: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn from_command(command: &[String], what: &str) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!("no {} command configured", what);
        };
        Ok(Self::new(program.clone(), args.iter().cloned()))
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn install(config: &Config) -> Result<Self> {
        Self::from_command(&config.install.command, "install")
    }

    pub fn test(config: &Config) -> Result<Self> {
        Self::from_command(&config.test.command, "test")
    }

    /// The ASGI server command line. `reload` adds the auto-reload flag.
    pub fn server(config: &Config, reload: bool) -> Self {
        let server = &config.server;
        let mut inv = Self::new(server.program.clone(), [server.app.clone()]);
        if reload {
            inv = inv.arg(server.reload_flag.clone());
        }
        inv.arg("--host")
            .arg(server.host.clone())
            .arg("--port")
            .arg(server.port.to_string())
            .with_args(&server.extra_args)
    }

    fn with_args(mut self, extra: &[String]) -> Self {
        self.args.extend(extra.iter().cloned());
        self
    }

    fn compose(config: &Config, args: &[&str]) -> Result<Self> {
        let inv = Self::from_command(&config.compose.command, "compose")?;
        Ok(args.iter().fold(inv, |inv, a| inv.arg(*a)))
    }

    pub fn compose_up_build(config: &Config) -> Result<Self> {
        Self::compose(config, &["up", "--build", "-d"])
    }

    pub fn compose_build_no_cache(config: &Config) -> Result<Self> {
        Self::compose(config, &["build", "--no-cache"])
    }

    pub fn compose_up(config: &Config) -> Result<Self> {
        Self::compose(config, &["up", "-d"])
    }

    /// `down`, optionally removing named volumes as well.
    pub fn compose_down(config: &Config, volumes: bool) -> Result<Self> {
        if volumes {
            Self::compose(config, &["down", "-v"])
        } else {
            Self::compose(config, &["down"])
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn spawn_error(&self, err: io::Error) -> anyhow::Error {
        if err.kind() == io::ErrorKind::NotFound {
            ToolError::NotFound {
                program: self.program.clone(),
            }
            .into()
        } else {
            anyhow::Error::new(err).context(format!("failed to launch `{}`", self.program))
        }
    }

    /// Run with inherited stdio and wait for it. A non-zero exit becomes a `ToolError`.
    pub fn run_foreground(&self) -> Result<()> {
        tracing::debug!("running {}", self);
        let status = self
            .command()
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            return Ok(());
        }
        let program = self.program.clone();
        match status.code() {
            Some(code) => Err(ToolError::Failed { program, code }.into()),
            None => Err(ToolError::Terminated { program }.into()),
        }
    }

    /// Launch detached from the terminal with output appended to `log_path`.
    /// The child is not waited on.
    pub fn spawn_background(&self, log_path: &Path) -> Result<Child> {
        let log_file = open_log(log_path)?;
        let stderr = log_file
            .try_clone()
            .context("failed to clone log file handle")?;

        let mut cmd = self.command();
        cmd.stdin(Stdio::null())
            .stdout(log_file)
            .stderr(stderr);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        tracing::debug!("spawning {} (log: {})", self, log_path.display());
        cmd.spawn().map_err(|e| self.spawn_error(e))
    }
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
