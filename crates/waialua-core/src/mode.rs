//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

/// Power/safety classification of the node, derived from voltage alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingMode {
    /// Supply above the nominal threshold; high-resolution polling.
    Nominal,
    /// Supply between the safe and nominal thresholds; conservation polling.
    Degraded,
    /// Supply at or below the safe threshold. Terminal for the mission loop.
    Emergency,
}

impl OperatingMode {
    pub const ALL: [OperatingMode; 3] = [
        OperatingMode::Nominal,
        OperatingMode::Degraded,
        OperatingMode::Emergency,
    ];

    /// Static label used in logs and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Nominal => "NOMINAL",
            OperatingMode::Degraded => "DEGRADED",
            OperatingMode::Emergency => "EMERGENCY",
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, OperatingMode::Emergency)
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
