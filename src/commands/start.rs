use std::process::Child;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::invocation::Invocation;
use crate::pidfile::PidFile;
use crate::process;

pub fn execute(config: &Config) -> Result<()> {
    let child = launch(config, &Invocation::server(config, false))?;
    println!("Server started with PID {}", child.id());
    Ok(())
}

/// Spawn `server` in the background and record its PID, overwriting any
/// previous PID file.
pub fn launch(config: &Config, server: &Invocation) -> Result<Child> {
    let pid_file = PidFile::new(&config.pid_file);
    if pid_file.exists() {
        if let Ok(old) = pid_file.read() {
            if process::is_alive(old) {
                tracing::warn!(
                    "{} still names live PID {}; overwriting",
                    pid_file.path().display(),
                    old
                );
            }
        }
    }

    let child = server
        .spawn_background(&config.log_file)
        .context("failed to start server")?;
    let child = record(&pid_file, child)?;

    tracing::info!("started `{}` as PID {}", server, child.id());
    Ok(child)
}

/// Write the child's PID. A server nobody can find again is not left
/// running: on failure the child is killed and reaped.
fn record(pid_file: &PidFile, mut child: Child) -> Result<Child> {
    if let Err(err) = pid_file.write(child.id()) {
        tracing::warn!("killing PID {}: PID file not written", child.id());
        let _ = child.kill();
        let _ = child.wait();
        return Err(err);
    }
    Ok(child)
}
