//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission control loop and lifecycle management."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Mission control loop for a power-constrained telemetry node.
//!
//! Each tick the [`MissionEngine`] decays the supply voltage, asks the
//! [`ModeGovernor`] for an operating mode and polling cadence, draws a raw
//! observation from the [`Sampler`], passes it through the [`Guardrail`], and
//! appends accepted samples to the [`MissionRecord`]. The engine never blocks;
//! waiting between ticks belongs to the driver ([`MissionRunner`]).

pub mod engine;
pub mod governor;
pub mod guardrail;
pub mod mode;
pub mod record;
pub mod runner;
pub mod sample;
pub mod sampler;
pub mod shared;

pub use engine::{MissionEngine, MissionEngineBuilder, TickOutcome};
pub use governor::{ModeDecision, ModeGovernor};
pub use guardrail::{evaluate, GuardedReading, Guardrail};
pub use mode::OperatingMode;
pub use record::MissionRecord;
pub use runner::{MissionRunner, RunnerState};
pub use sample::Sample;
pub use sampler::{RawObservation, Sampler};
pub use shared::SharedMissionEngine;

/// Round `value` to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}
