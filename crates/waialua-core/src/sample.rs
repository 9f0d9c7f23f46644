//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::guardrail::GuardedReading;
use crate::mode::OperatingMode;

/// One tick's outcome.
///
/// `temperature` and `signal` are `None` exactly when `excursion` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub tick: u64,
    pub timestamp: DateTime<Local>,
    pub voltage: f64,
    pub temperature: Option<f64>,
    pub signal: Option<f64>,
    pub mode: OperatingMode,
    pub excursion: bool,
}

impl Sample {
    pub fn new(
        tick: u64,
        timestamp: DateTime<Local>,
        voltage: f64,
        mode: OperatingMode,
        reading: GuardedReading,
    ) -> Self {
        Self {
            tick,
            timestamp,
            voltage,
            temperature: reading.temperature,
            signal: reading.signal,
            mode,
            excursion: reading.excursion,
        }
    }

    /// Audit line recorded for an accepted sample, e.g.
    /// `[14:02:11] TICK_003 | REJECT | 4.176V | !!!C`.
    pub fn audit_line(&self) -> String {
        let verdict = if self.excursion { "REJECT" } else { "OK" };
        let temperature = self
            .temperature
            .map(format_reading)
            .unwrap_or_else(|| "!!!".to_owned());
        format!(
            "[{}] TICK_{:03} | {} | {}V | {}C",
            self.timestamp.format("%H:%M:%S"),
            self.tick,
            verdict,
            format_reading(self.voltage),
            temperature
        )
    }
}

/// Shortest round-trip rendering of a reading that always keeps a decimal
/// point (`4.0`, not `4`).
pub fn format_reading(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, h, m, s)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn accepted_line_shows_temperature() {
        let sample = Sample::new(
            7,
            at(9, 5, 1),
            4.116,
            OperatingMode::Nominal,
            GuardedReading {
                temperature: Some(45.12),
                signal: Some(-49.8),
                excursion: false,
            },
        );
        assert_eq!(sample.audit_line(), "[09:05:01] TICK_007 | OK | 4.116V | 45.12C");
    }

    #[test]
    fn rejected_line_masks_temperature() {
        let sample = Sample::new(
            3,
            at(23, 59, 59),
            4.164,
            OperatingMode::Nominal,
            GuardedReading {
                temperature: None,
                signal: None,
                excursion: true,
            },
        );
        assert_eq!(sample.audit_line(), "[23:59:59] TICK_003 | REJECT | 4.164V | !!!C");
    }

    #[test]
    fn whole_numbers_keep_a_decimal() {
        assert_eq!(format_reading(4.0), "4.0");
        assert_eq!(format_reading(45.0), "45.0");
        assert_eq!(format_reading(3.7), "3.7");
        assert_eq!(format_reading(-50.25), "-50.25");
    }
}
