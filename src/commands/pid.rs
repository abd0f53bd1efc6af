use anyhow::{Result, bail};

use crate::config::Config;
use crate::pidfile::PidFile;
use crate::process;

pub fn execute(config: &Config) -> Result<()> {
    let pid_file = PidFile::new(&config.pid_file);
    if !pid_file.exists() {
        bail!("no PID file at {} - is the server running?", pid_file.path().display());
    }

    let pid = pid_file.read()?;
    if !process::is_alive(pid) {
        eprintln!("Stale PID file (process {} is not running).", pid);
        pid_file.remove()?;
        bail!("server is not running");
    }

    println!("{}", pid);
    Ok(())
}
