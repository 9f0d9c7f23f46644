//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the node runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::cell::Cell;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

/// Source of wall-clock timestamps for mission samples.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the host clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Deterministic clock advancing by a fixed step on every read.
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<DateTime<Local>>,
    step: chrono::Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Local>, step: Duration) -> Self {
        Self {
            next: Cell::new(start),
            step: chrono::Duration::from_std(step).unwrap_or(chrono::Duration::zero()),
        }
    }

    /// Clock starting at the given Unix second, stepping one second per read.
    pub fn from_unix(seconds: i64) -> Self {
        let start = Local
            .timestamp_opt(seconds, 0)
            .single()
            .unwrap_or_else(Local::now);
        Self::new(start, Duration::from_secs(1))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Local> {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}

/// Convert a polling interval to its rate in hertz.
pub fn interval_to_hz(interval: Duration) -> f64 {
    let secs = interval.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    1.0 / secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_clock_advances_per_read() {
        let clock = SteppingClock::from_unix(1_700_000_000);
        let first = clock.now();
        let second = clock.now();
        assert_eq!((second - first).num_seconds(), 1);
    }

    #[test]
    fn hz_conversion() {
        assert_eq!(interval_to_hz(Duration::from_secs(1)), 1.0);
        assert!((interval_to_hz(Duration::from_secs(5)) - 0.2).abs() < 1e-12);
        assert_eq!(interval_to_hz(Duration::ZERO), 0.0);
    }
}
