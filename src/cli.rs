use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "appctl", about = "Development task runner for the app.main service")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "appctl.toml")]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install declared dependencies
    Install,

    /// Run the server in the foreground with auto-reload
    Run,

    /// Start the server in the background and record its PID
    Start,

    /// Stop the background server recorded in the PID file
    Stop(StopOpts),

    /// Print the PID of the background server
    Pid,

    /// Show recent output of the background server
    Log(LogOpts),

    /// Run the test suite
    Test,

    /// Build images and start containers
    DockerBuild,

    /// Rebuild images from scratch and start containers
    DockerRebuild,

    /// Stop and remove containers
    DockerDown,

    /// Stop containers and delete their volumes
    DatabaseReset,
}

#[derive(Parser, Clone)]
pub struct StopOpts {
    /// Wait for the process to exit after signalling it
    #[arg(long)]
    pub wait: bool,

    /// Seconds to wait before giving up (with --wait)
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Parser, Clone)]
pub struct LogOpts {
    /// Number of lines to show
    #[arg(short, default_value_t = 20)]
    pub n: usize,

    /// Follow the log (like tail -f)
    #[arg(short)]
    pub f: bool,
}
