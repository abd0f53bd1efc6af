use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::cli::LogOpts;
use crate::config::Config;

pub fn execute(config: &Config, opts: &LogOpts) -> Result<()> {
    let log_path = &config.log_file;
    if !log_path.exists() {
        bail!("no log file found at {}", log_path.display());
    }

    for line in tail(log_path, opts.n)? {
        println!("{}", line);
    }

    if opts.f {
        follow(log_path)?;
    }
    Ok(())
}

/// Last `n` lines of the file at `path`. Invalid UTF-8 is replaced, not fatal.
fn tail(path: &Path, n: usize) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        lines.push(String::from_utf8_lossy(line).into_owned());
    }
    let start = lines.len().saturating_sub(n);
    Ok(lines.split_off(start))
}

fn follow(path: &Path) -> Result<()> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(0))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut stdout = io::stdout();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => thread::sleep(Duration::from_millis(100)),
            Ok(_) => {
                stdout.write_all(String::from_utf8_lossy(&buf).as_bytes())?;
                stdout.flush()?;
            }
            Err(e) => bail!("error reading log: {}", e),
        }
    }
}
