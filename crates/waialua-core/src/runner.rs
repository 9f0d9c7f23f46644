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

use tracing::info;

use crate::engine::{MissionEngine, TickOutcome};

/// Where the driver stands in the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Running,
    /// An `Emergency` sample was returned; no further ticks are issued.
    Terminated,
    /// The tick budget ran out before any emergency.
    Exhausted,
}

/// Issues ticks in order, stopping at the first emergency or at `max_ticks`.
///
/// The runner never waits. Callers sleep for [`TickOutcome::interval`] between
/// calls, or hand a wait function to [`MissionRunner::run`].
#[derive(Debug)]
pub struct MissionRunner {
    engine: MissionEngine,
    max_ticks: u64,
    state: RunnerState,
}

impl MissionRunner {
    pub fn new(engine: MissionEngine, max_ticks: u64) -> Self {
        let state = if max_ticks == 0 {
            RunnerState::Exhausted
        } else {
            RunnerState::Running
        };
        Self {
            engine,
            max_ticks,
            state,
        }
    }

    /// Issue the next tick, or `None` once the mission has ended.
    pub fn next_tick(&mut self) -> Option<TickOutcome> {
        if self.state != RunnerState::Running {
            return None;
        }
        let outcome = self.engine.tick();
        if outcome.is_terminal() {
            self.state = RunnerState::Terminated;
            info!(tick = outcome.sample.tick, "SAFE MODE: MISSION TERMINATED.");
        } else if self.engine.ticks() >= self.max_ticks {
            self.state = RunnerState::Exhausted;
            info!(ticks = self.max_ticks, "tick budget exhausted");
        }
        Some(outcome)
    }

    /// Drive the mission to its end, calling `on_tick` after every tick and
    /// `wait` between ticks. No wait follows the final tick.
    pub fn run<W, F>(&mut self, mut wait: W, mut on_tick: F) -> RunnerState
    where
        W: FnMut(Duration),
        F: FnMut(&TickOutcome, &MissionEngine),
    {
        while let Some(outcome) = self.next_tick() {
            on_tick(&outcome, &self.engine);
            if self.state == RunnerState::Running {
                wait(outcome.interval);
            }
        }
        self.state
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunnerState::Running
    }

    pub fn engine(&self) -> &MissionEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waialua_common::config::AppConfig;

    fn engine(initial_voltage: f64) -> MissionEngine {
        let mut config = AppConfig::default();
        config.mission.initial_voltage = initial_voltage;
        MissionEngine::builder(&config).seed(5).build().unwrap()
    }

    #[test]
    fn stops_at_tick_budget() {
        let mut runner = MissionRunner::new(engine(4.2), 3);
        let mut waits = Vec::new();
        let state = runner.run(|interval| waits.push(interval), |_, _| {});
        assert_eq!(state, RunnerState::Exhausted);
        assert_eq!(runner.engine().ticks(), 3);
        assert_eq!(waits, vec![Duration::from_secs(1); 2]);
        assert!(runner.next_tick().is_none());
    }

    #[test]
    fn stops_immediately_after_emergency() {
        let mut runner = MissionRunner::new(engine(3.41), 100);
        let outcome = runner.next_tick().expect("first tick issued");
        assert!(outcome.is_terminal());
        assert_eq!(runner.state(), RunnerState::Terminated);
        assert!(runner.next_tick().is_none());
        assert_eq!(runner.engine().ticks(), 1);
    }

    #[test]
    fn zero_budget_issues_nothing() {
        let mut runner = MissionRunner::new(engine(4.2), 0);
        assert_eq!(runner.state(), RunnerState::Exhausted);
        assert!(runner.next_tick().is_none());
    }
}
