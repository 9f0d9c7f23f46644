//! ---
//! ems_section: "03-persistence-logging"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Structured logging adapters and sinks."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Structured mission logging: every event carries the node, tick, and mode.

use tracing::Level;

pub mod macros;

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Node identifier associated with the log event.
    pub node: Option<&'a str>,
    /// Mission tick the event belongs to.
    pub tick: Option<u64>,
    /// Operating mode label (nominal, degraded, emergency).
    pub mode: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node identifier.
    pub fn with_node(mut self, node: &'a str) -> Self {
        self.node = Some(node);
        self
    }

    /// Attach a tick value.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attach an operating mode descriptor.
    pub fn with_mode(mut self, mode: &'a str) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// High-level outcome used when emitting mission lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionEventOutcome {
    /// The mission step completed as expected.
    Success,
    /// The mission reached a fault or terminal condition.
    Fault,
}

impl MissionEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            MissionEventOutcome::Success => "success",
            MissionEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized mission event with a success/fault outcome.
pub fn log_mission_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: MissionEventOutcome,
) {
    let default_ctx = LogContext::default();
    let ctx = context.unwrap_or(&default_ctx);
    match outcome {
        MissionEventOutcome::Success => tracing::event!(
            Level::INFO,
            event,
            outcome = outcome.as_str(),
            node = ctx.node.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            mode = ctx.mode.unwrap_or(""),
            message = %message
        ),
        MissionEventOutcome::Fault => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome.as_str(),
            node = ctx.node.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            mode = ctx.mode.unwrap_or(""),
            message = %message
        ),
    }
}
