use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// The file recording the PID of the backgrounded server.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Record `pid`, replacing whatever the file held before.
    pub fn write(&self, pid: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, format!("{}\n", pid))
            .with_context(|| format!("failed to write PID file {}", self.path.display()))?;
        tracing::debug!("wrote PID {} to {}", pid, self.path.display());
        Ok(())
    }

    pub fn read(&self) -> Result<i32> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read PID file {}", self.path.display()))?;
        let pid: i32 = contents
            .trim()
            .parse()
            .with_context(|| format!("invalid PID in {}", self.path.display()))?;
        if pid <= 0 {
            bail!("invalid PID {} in {}", pid, self.path.display());
        }
        Ok(pid)
    }

    pub fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove PID file {}", self.path.display()))?;
        tracing::debug!("removed {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_overwrites_previous_pid() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = PidFile::new(dir.path().join("run").join("server.pid"));

        pid_file.write(111).unwrap();
        pid_file.write(222).unwrap();

        assert_eq!(fs::read_to_string(pid_file.path()).unwrap(), "222\n");
        assert_eq!(pid_file.read().unwrap(), 222);
    }

    #[test]
    fn garbage_contents_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = PidFile::new(dir.path().join("server.pid"));
        fs::write(pid_file.path(), "not-a-pid").unwrap();
        assert!(pid_file.read().is_err());

        fs::write(pid_file.path(), "0\n").unwrap();
        assert!(pid_file.read().is_err());
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = PidFile::new(dir.path().join("server.pid"));
        pid_file.write(42).unwrap();
        pid_file.remove().unwrap();
        assert!(!pid_file.exists());
    }
}
