use std::time::Duration;

use anyhow::{Result, bail};

use crate::cli::StopOpts;
use crate::config::Config;
use crate::pidfile::PidFile;
use crate::process;

pub fn execute(config: &Config, opts: &StopOpts) -> Result<()> {
    let pid_file = PidFile::new(&config.pid_file);
    if !pid_file.exists() {
        println!("No PID file found. Is the server running?");
        return Ok(());
    }

    let pid = pid_file.read()?;
    let sent = process::terminate(pid);

    // The file goes either way so a dead PID does not linger.
    pid_file.remove()?;
    sent?;

    if !opts.wait {
        println!("Sent SIGTERM to server (PID {}).", pid);
        return Ok(());
    }
    if !process::wait_for_exit(pid, Duration::from_secs(opts.timeout)) {
        bail!("server (PID {}) did not stop within {} seconds", pid, opts.timeout);
    }
    println!("Stopped server (PID {}).", pid);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::os::unix::process::ExitStatusExt;
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::commands::start;
    use crate::invocation::Invocation;

    fn scratch_config(dir: &std::path::Path) -> Config {
        Config {
            pid_file: dir.join("server.pid"),
            log_file: dir.join("server.log"),
            ..Config::default()
        }
    }

    fn no_wait() -> StopOpts {
        StopOpts {
            wait: false,
            timeout: 10,
        }
    }

    #[test]
    fn missing_pid_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        execute(&scratch_config(dir.path()), &no_wait()).unwrap();
    }

    #[test]
    fn stop_signals_process_and_removes_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let mut child = start::launch(&config, &Invocation::new("sleep", ["30"])).unwrap();

        execute(&config, &no_wait()).unwrap();

        assert!(!config.pid_file.exists());
        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(nix::libc::SIGTERM));
    }

    #[test]
    fn wait_returns_once_server_exits() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let mut child = start::launch(&config, &Invocation::new("sleep", ["30"])).unwrap();
        // Reap in the background so the exited server does not linger as a zombie.
        let reaper = thread::spawn(move || child.wait());

        let opts = StopOpts {
            wait: true,
            timeout: u64::MAX,
        };
        execute(&config, &opts).unwrap();

        assert!(!config.pid_file.exists());
        let status = reaper.join().unwrap().unwrap();
        assert_eq!(status.signal(), Some(nix::libc::SIGTERM));
    }

    #[test]
    fn wait_gives_up_on_server_ignoring_sigterm() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let server = Invocation::new("sh", ["-c", "trap '' TERM; echo ready; exec sleep 30"]);
        let mut child = start::launch(&config, &server).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while fs::read_to_string(&config.log_file).unwrap_or_default().is_empty() {
            assert!(Instant::now() < deadline, "server never became ready");
            thread::sleep(Duration::from_millis(20));
        }

        let opts = StopOpts {
            wait: true,
            timeout: 1,
        };
        let err = execute(&config, &opts).unwrap_err();
        assert!(err.to_string().contains("did not stop within 1 seconds"));
        assert!(!config.pid_file.exists());

        child.kill().unwrap();
        child.wait().unwrap();
    }

    #[test]
    fn dead_pid_errors_but_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        fs::write(&config.pid_file, format!("{}\n", pid)).unwrap();

        assert!(execute(&config, &no_wait()).is_err());
        assert!(!config.pid_file.exists());
    }
}
