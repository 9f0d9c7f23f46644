//! ---
//! ems_section: "12-gui-setup-wizard"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission HUD view model and renderers."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fmt;

pub const GAUGE_MIN_VOLTAGE: f64 = 3.0;
pub const GAUGE_MAX_VOLTAGE: f64 = 4.2;
pub const GAUGE_SEGMENTS: usize = 20;

/// Linear voltage gauge over `[3.0, 4.2]` V in 20 segments, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageGauge {
    position: usize,
}

impl VoltageGauge {
    pub fn new(voltage: f64) -> Self {
        let span = GAUGE_MAX_VOLTAGE - GAUGE_MIN_VOLTAGE;
        let raw = ((voltage - GAUGE_MIN_VOLTAGE) / span) * GAUGE_SEGMENTS as f64;
        // Truncates toward zero; NaN lands on 0.
        let position = (raw as i64).clamp(0, GAUGE_SEGMENTS as i64) as usize;
        Self { position }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for VoltageGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}▶{}]",
            "=".repeat(self.position),
            ".".repeat((GAUGE_SEGMENTS - 1).saturating_sub(self.position))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_map_linearly() {
        assert_eq!(VoltageGauge::new(3.0).position(), 0);
        assert_eq!(VoltageGauge::new(3.6).position(), 10);
        assert_eq!(VoltageGauge::new(4.08).position(), 18);
    }

    #[test]
    fn positions_clamp_at_both_ends() {
        assert_eq!(VoltageGauge::new(2.9).position(), 0);
        assert_eq!(VoltageGauge::new(5.0).position(), 20);
        assert_eq!(VoltageGauge::new(f64::NAN).position(), 0);
    }

    #[test]
    fn renders_bar() {
        assert_eq!(
            VoltageGauge::new(3.6).to_string(),
            format!("[{}▶{}]", "=".repeat(10), ".".repeat(9))
        );
        assert_eq!(
            VoltageGauge::new(4.2).to_string(),
            format!("[{}▶]", "=".repeat(20))
        );
    }
}
