#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use hotleak::{init_tracing, Metrics, WorkloadConfig, WorkloadRunner};
use tracing::debug;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let runner = WorkloadRunner::new(WorkloadConfig::default(), Metrics::new()?)?;
    runner.run();
    let buf = runner.encode_metrics()?;
    debug!(metrics = %String::from_utf8_lossy(&buf), "final metrics");
    Ok(())
}
