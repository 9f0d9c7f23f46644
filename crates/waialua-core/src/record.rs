//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::collections::VecDeque;

use tracing::warn;

use crate::sample::Sample;

/// Append-only history of accepted samples plus a newest-first audit log.
///
/// Log entries are 1:1 with stored samples. `Emergency` samples are never
/// stored.
#[derive(Debug, Clone, Default)]
pub struct MissionRecord {
    samples: Vec<Sample>,
    log: VecDeque<String>,
}

impl MissionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sample` and prepend its audit line. Returns `false` and stores
    /// nothing when the sample is in `Emergency` mode.
    pub fn append(&mut self, sample: Sample) -> bool {
        if sample.mode.is_emergency() {
            warn!(tick = sample.tick, "refusing to record emergency sample");
            return false;
        }
        self.log.push_front(sample.audit_line());
        self.samples.push(sample);
        true
    }

    /// Full history in tick order.
    pub fn snapshot(&self) -> &[Sample] {
        &self.samples
    }

    /// The `n` most recent audit lines, newest first.
    pub fn recent_log(&self, n: usize) -> Vec<&str> {
        self.log.iter().take(n).map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn null_temperature_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.temperature.is_none())
            .count()
    }

    /// Percentage of stored samples carrying a temperature reading.
    ///
    /// Recomputed on every call; an empty record reports 100.
    pub fn data_availability(&self) -> f64 {
        let total = self.samples.len().max(1) as f64;
        (1.0 - self.null_temperature_count() as f64 / total) * 100.0
    }
}
