#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LEAK_ELEMENTS: usize = 1000;
pub const CYCLES: u32 = 5;
// ~1.5s on a current desktop core
pub const HOT_ITERATIONS: u64 = 500_000_000;
pub const IDLE: Duration = Duration::from_millis(100);

/// Shape of the workload. The binary always runs [`WorkloadConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub leak_elements: usize,
    pub cycles: u32,
    pub hot_iterations: u64,
    #[serde(with = "millis")]
    pub idle: Duration,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            leak_elements: LEAK_ELEMENTS,
            cycles: CYCLES,
            hot_iterations: HOT_ITERATIONS,
            idle: IDLE,
        }
    }
}

impl WorkloadConfig {
    pub fn leaked_bytes(&self) -> usize {
        crate::lib_mem::leaked_bytes(self.leak_elements)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u32,
    pub accumulator: u64,
    pub hot: Duration,
    pub idle: Duration,
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub leaked_bytes: usize,
    pub cycles: Vec<CycleReport>,
}

impl RunSummary {
    pub fn cycles_completed(&self) -> usize {
        self.cycles.len()
    }

    pub fn total_hot(&self) -> Duration {
        self.cycles.iter().map(|c| c.hot).sum()
    }

    pub fn total_idle(&self) -> Duration {
        self.cycles.iter().map(|c| c.idle).sum()
    }
}
