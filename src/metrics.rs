#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result as AnyResult};
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub cycles_total: IntCounter,
    pub hot_phase_active: IntGauge,
    pub hot_iterations_total: IntCounter,
    pub leaked_bytes: IntGauge,
}

impl Metrics {
    pub fn new() -> AnyResult<Self> {
        let registry = Registry::new();
        let cycles_total =
            IntCounter::with_opts(Opts::new("hotleak_cycles_total", "completed hot/idle cycles"))
                .context("create cycles_total")?;
        let hot_phase_active =
            IntGauge::with_opts(Opts::new("hotleak_hot_phase_active", "1 while spinning"))
                .context("create hot_phase_active")?;
        let hot_iterations_total = IntCounter::with_opts(Opts::new(
            "hotleak_hot_iterations_total",
            "accumulator steps executed",
        ))
        .context("create hot_iterations_total")?;
        let leaked_bytes =
            IntGauge::with_opts(Opts::new("hotleak_leaked_bytes", "bytes abandoned on purpose"))
                .context("create leaked_bytes")?;
        registry
            .register(Box::new(cycles_total.clone()))
            .context("register cycles_total")?;
        registry
            .register(Box::new(hot_phase_active.clone()))
            .context("register hot_phase_active")?;
        registry
            .register(Box::new(hot_iterations_total.clone()))
            .context("register hot_iterations_total")?;
        registry
            .register(Box::new(leaked_bytes.clone()))
            .context("register leaked_bytes")?;
        Ok(Self {
            registry,
            cycles_total,
            hot_phase_active,
            hot_iterations_total,
            leaked_bytes,
        })
    }

    pub fn encode_text(&self) -> AnyResult<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        let mf = self.registry.gather();
        encoder.encode(&mf, &mut buf).context("encode metrics")?;
        Ok(buf)
    }
}
