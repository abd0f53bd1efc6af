use anyhow::{Context, Result};

use crate::config::Config;
use crate::invocation::Invocation;

pub fn build(config: &Config) -> Result<()> {
    Invocation::compose_up_build(config)?.run_foreground()
}

pub fn rebuild(config: &Config) -> Result<()> {
    Invocation::compose_build_no_cache(config)?
        .run_foreground()
        .context("image rebuild failed")?;
    Invocation::compose_up(config)?.run_foreground()
}

pub fn down(config: &Config) -> Result<()> {
    Invocation::compose_down(config, false)?.run_foreground()
}

/// Like `down`, but also drops the volumes holding the database.
pub fn database_reset(config: &Config) -> Result<()> {
    Invocation::compose_down(config, true)?.run_foreground()?;
    println!("Containers stopped and volumes removed.");
    Ok(())
}
