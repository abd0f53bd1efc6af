use anyhow::Result;

use crate::config::Config;
use crate::invocation::Invocation;

pub fn execute(config: &Config) -> Result<()> {
    Invocation::server(config, true).run_foreground()
}
