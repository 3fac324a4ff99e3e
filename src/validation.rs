#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use anyhow::{bail, Result as AnyResult};
use std::time::Duration;

use crate::domain::WorkloadConfig;

pub const MAX_IDLE: Duration = Duration::from_secs(10);

pub fn validate_config(cfg: &WorkloadConfig) -> AnyResult<()> {
    if cfg.leak_elements == 0 { bail!("leak_elements must be > 0"); }
    if cfg.cycles == 0 { bail!("cycles must be > 0"); }
    if cfg.hot_iterations == 0 { bail!("hot_iterations must be > 0"); }
    if cfg.idle > MAX_IDLE {
        bail!(format!("idle must be <= {}ms", MAX_IDLE.as_millis()));
    }
    Ok(())
}
