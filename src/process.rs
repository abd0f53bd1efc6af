use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Signal 0 probe: true if `pid` exists. A process owned by another user
/// answers EPERM and still counts as alive.
pub fn is_alive(pid: i32) -> bool {
    match signal::kill(Pid::from_raw(pid), None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

pub fn terminate(pid: i32) -> Result<()> {
    signal::kill(Pid::from_raw(pid), Signal::SIGTERM)
        .with_context(|| format!("failed to send SIGTERM to PID {}", pid))
}

/// Poll until `pid` is gone. Returns false if it outlived `timeout`.
/// A timeout too large to represent waits without a deadline.
pub fn wait_for_exit(pid: i32, timeout: Duration) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    while deadline.is_none_or(|d| Instant::now() < d) {
        if !is_alive(pid) {
            return true;
        }
        thread::sleep(POLL_INTERVAL);
    }
    !is_alive(pid)
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use super::*;

    #[test]
    fn terminate_stops_a_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id() as i32;
        assert!(is_alive(pid));

        terminate(pid).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());
        assert!(!is_alive(pid));
    }

    #[test]
    fn wait_times_out_on_live_process() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id() as i32;
        assert!(!wait_for_exit(pid, Duration::from_millis(250)));
        child.kill().unwrap();
        child.wait().unwrap();
    }

    #[test]
    fn unbounded_timeout_waits_for_exit() {
        let mut child = Command::new("sleep").arg("0.3").spawn().unwrap();
        let pid = child.id() as i32;
        let reaper = thread::spawn(move || child.wait());

        assert!(wait_for_exit(pid, Duration::MAX));
        reaper.join().unwrap().unwrap();
    }

    #[test]
    fn init_counts_as_alive() {
        // PID 1 always exists; unprivileged callers get EPERM for it.
        assert!(is_alive(1));
    }
}
