#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use anyhow::Result as AnyResult;
use std::hint::black_box;
use std::os::raw::c_int;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{CycleReport, RunSummary, WorkloadConfig};
use crate::lib_cpu::{hot_loop, idle_pause};
use crate::lib_mem::leak_block;
use crate::metrics::Metrics;
use crate::validation::validate_config;

/// Drives one leak followed by `cycles` busy/idle rounds.
#[derive(Clone)]
pub struct WorkloadRunner {
    cfg: WorkloadConfig,
    metrics: Metrics,
}

impl WorkloadRunner {
    pub fn new(cfg: WorkloadConfig, metrics: Metrics) -> AnyResult<Self> {
        validate_config(&cfg)?;
        Ok(Self { cfg, metrics })
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.cfg
    }

    pub fn leak(&self) -> usize {
        let block: &[c_int] = black_box(leak_block(self.cfg.leak_elements));
        let bytes = std::mem::size_of_val(block);
        self.metrics
            .leaked_bytes
            .add(i64::try_from(bytes).unwrap_or(i64::MAX));
        debug!(bytes, "leaked block");
        bytes
    }

    pub fn cycle(&self, cycle: u32) -> CycleReport {
        self.metrics.hot_phase_active.set(1);
        let started = Instant::now();
        let accumulator = hot_loop(self.cfg.hot_iterations);
        let hot = started.elapsed();
        self.metrics.hot_phase_active.set(0);
        self.metrics.hot_iterations_total.inc_by(self.cfg.hot_iterations);

        let started = Instant::now();
        idle_pause(self.cfg.idle);
        let idle = started.elapsed();
        self.metrics.cycles_total.inc();
        debug!(cycle, ?hot, ?idle, "cycle done");
        CycleReport { cycle, accumulator, hot, idle }
    }

    pub fn run(&self) -> RunSummary {
        info!(
            cycles = self.cfg.cycles,
            hot_iterations = self.cfg.hot_iterations,
            idle = ?self.cfg.idle,
            "starting workload"
        );
        let leaked_bytes = self.leak();
        let cycles = (0..self.cfg.cycles).map(|c| self.cycle(c)).collect();
        let summary = RunSummary { leaked_bytes, cycles };
        info!(
            cycles = summary.cycles_completed(),
            hot = ?summary.total_hot(),
            idle = ?summary.total_idle(),
            "workload finished"
        );
        summary
    }

    pub fn encode_metrics(&self) -> AnyResult<Vec<u8>> {
        self.metrics.encode_text()
    }
}
