#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

pub mod annotation;
pub mod domain;
pub mod lib_cpu;
pub mod lib_mem;
pub mod metrics;
pub mod profile;
pub mod service;
pub mod validation;

pub use annotation::Annotation;
pub use domain::{CycleReport, RunSummary, WorkloadConfig};
pub use metrics::Metrics;
pub use profile::{Finding, ProfilePaths, ProfileReport};
pub use service::WorkloadRunner;
pub use validation::validate_config;

/// JSON lines on stderr, filtered by `RUST_LOG`. Unset means errors only, and nothing in
/// the crate logs at that level.
pub fn init_tracing() {
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    fmt.json().init();
}
