//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use waialua_common::config::{GovernorConfig, MissionConfig};

use crate::mode::OperatingMode;

/// Outcome of classifying one voltage reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDecision {
    pub mode: OperatingMode,
    /// Cadence to poll at next. `None` means keep the current cadence; this is
    /// what `Emergency` yields.
    pub interval: Option<Duration>,
}

/// Threshold rule mapping supply voltage to operating mode and polling cadence.
#[derive(Debug, Clone)]
pub struct ModeGovernor {
    nominal_voltage: f64,
    safe_voltage: f64,
    nominal_interval: Duration,
    degraded_interval: Duration,
}

impl ModeGovernor {
    pub fn new(mission: &MissionConfig, governor: &GovernorConfig) -> Self {
        Self {
            nominal_voltage: mission.nominal_voltage,
            safe_voltage: mission.safe_voltage,
            nominal_interval: governor.nominal_interval,
            degraded_interval: governor.degraded_interval,
        }
    }

    /// Classify `voltage`.
    ///
    /// `v > nominal` is `Nominal`, `safe < v <= nominal` is `Degraded`, anything
    /// else (including NaN) is `Emergency`.
    pub fn determine(&self, voltage: f64) -> ModeDecision {
        if voltage > self.nominal_voltage {
            ModeDecision {
                mode: OperatingMode::Nominal,
                interval: Some(self.nominal_interval),
            }
        } else if voltage > self.safe_voltage {
            ModeDecision {
                mode: OperatingMode::Degraded,
                interval: Some(self.degraded_interval),
            }
        } else {
            ModeDecision {
                mode: OperatingMode::Emergency,
                interval: None,
            }
        }
    }
}

impl Default for ModeGovernor {
    fn default() -> Self {
        Self::new(&MissionConfig::default(), &GovernorConfig::default())
    }
}
