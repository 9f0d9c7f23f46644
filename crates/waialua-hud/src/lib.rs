//! ---
//! ems_section: "12-gui-setup-wizard"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission HUD view model and renderers."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Presentation of mission ticks. Reads a tick result, the mission record, and
//! the current cadence; never mutates mission state.

pub mod gauge;
pub mod palette;
pub mod panel;
pub mod tui;

pub use gauge::VoltageGauge;
pub use palette::{palette, ModePalette};
pub use panel::{render_text, PanelView, FAIL_DISPLAY, SIGNAL_PLACEHOLDER};
pub use tui::draw_panel;

/// Printed by the drivers once the mission reaches safe mode.
pub const TERMINATION_BANNER: &str = "SAFE MODE: MISSION TERMINATED.";
