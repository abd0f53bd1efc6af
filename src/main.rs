mod cli;
mod commands;
mod config;
mod error;
mod invocation;
mod pidfile;
mod process;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            let code = error::exit_code_for(&err).clamp(1, 255);
            ExitCode::from(code as u8)
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Install => commands::install::execute(&config),
        Command::Run => commands::run::execute(&config),
        Command::Start => commands::start::execute(&config),
        Command::Stop(opts) => commands::stop::execute(&config, &opts),
        Command::Pid => commands::pid::execute(&config),
        Command::Log(opts) => commands::log::execute(&config, &opts),
        Command::Test => commands::test::execute(&config),
        Command::DockerBuild => commands::docker::build(&config),
        Command::DockerRebuild => commands::docker::rebuild(&config),
        Command::DockerDown => commands::docker::down(&config),
        Command::DatabaseReset => commands::docker::database_reset(&config),
    }
}

/// Diagnostics go to stderr so they never mix with command output.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .init();
}
