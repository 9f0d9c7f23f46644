//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Readings after the thermal guardrail has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardedReading {
    pub temperature: Option<f64>,
    pub signal: Option<f64>,
    pub excursion: bool,
}

/// Suppress a raw observation whose temperature exceeds `ceiling`.
///
/// A thermal excursion blanks the signal reading as well, even though only the
/// temperature breached the ceiling. A reading exactly at the ceiling passes.
pub fn evaluate(raw_temperature: f64, raw_signal: f64, ceiling: f64) -> GuardedReading {
    if raw_temperature > ceiling {
        GuardedReading {
            temperature: None,
            signal: None,
            excursion: true,
        }
    } else {
        GuardedReading {
            temperature: Some(raw_temperature),
            signal: Some(raw_signal),
            excursion: false,
        }
    }
}

/// Thermal guardrail bound to a fixed ceiling.
#[derive(Debug, Clone, Copy)]
pub struct Guardrail {
    ceiling: f64,
}

impl Guardrail {
    pub fn new(ceiling: f64) -> Self {
        Self { ceiling }
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn evaluate(&self, raw_temperature: f64, raw_signal: f64) -> GuardedReading {
        evaluate(raw_temperature, raw_signal, self.ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_reading_passes_through() {
        let reading = evaluate(45.3, -48.1, 85.0);
        assert_eq!(reading.temperature, Some(45.3));
        assert_eq!(reading.signal, Some(-48.1));
        assert!(!reading.excursion);
    }

    #[test]
    fn excursion_suppresses_temperature_and_signal() {
        let reading = Guardrail::new(85.0).evaluate(98.5, -51.2);
        assert_eq!(
            reading,
            GuardedReading {
                temperature: None,
                signal: None,
                excursion: true
            }
        );
    }

    #[test]
    fn ceiling_is_inclusive() {
        let reading = evaluate(85.0, -50.0, 85.0);
        assert_eq!(reading.temperature, Some(85.0));
        assert!(!reading.excursion);
    }
}
