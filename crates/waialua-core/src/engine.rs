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

use waialua_common::config::{AppConfig, ConfigError, MissionConfig};
use waialua_common::time::{Clock, SystemClock};
use waialua_logging::{log_mission_event, node_debug, node_info, node_warn};
use waialua_logging::{LogContext, MissionEventOutcome};

use crate::governor::ModeGovernor;
use crate::guardrail::Guardrail;
use crate::mode::OperatingMode;
use crate::record::MissionRecord;
use crate::round_to;
use crate::sample::Sample;
use crate::sampler::Sampler;

/// What one tick hands back to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub sample: Sample,
    /// Cadence the driver should wait before issuing the next tick.
    pub interval: Duration,
}

impl TickOutcome {
    /// The mission loop must stop once this is true.
    pub fn is_terminal(&self) -> bool {
        self.sample.mode.is_emergency()
    }
}

/// Builder for [`MissionEngine`], used to inject the seed and clock.
pub struct MissionEngineBuilder {
    config: AppConfig,
    seed: Option<u64>,
    clock: Box<dyn Clock>,
}

impl MissionEngineBuilder {
    /// Fix the random seed, overriding `run.seed` from the configuration.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn build(self) -> Result<MissionEngine, ConfigError> {
        self.config.validate()?;
        let sampler = match self.seed {
            Some(seed) => Sampler::seeded(&self.config.sampler, seed)?,
            None => Sampler::from_entropy(&self.config.sampler)?,
        };
        Ok(MissionEngine::assemble(self.config, sampler, self.clock))
    }
}

/// Owns the node's voltage state and drives one tick at a time.
///
/// Ticks are strictly sequential: numbering starts at 1 and increases by one,
/// and reported voltage never increases. The engine keeps accepting ticks after
/// `Emergency`; stopping is the driver's job.
pub struct MissionEngine {
    node_id: String,
    mission: MissionConfig,
    governor: ModeGovernor,
    guardrail: Guardrail,
    sampler: Sampler,
    clock: Box<dyn Clock>,
    raw_voltage: f64,
    voltage: f64,
    mode: OperatingMode,
    interval: Duration,
    ticks: u64,
    record: MissionRecord,
}

impl std::fmt::Debug for MissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissionEngine")
            .field("node_id", &self.node_id)
            .field("voltage", &self.voltage)
            .field("mode", &self.mode)
            .field("interval", &self.interval)
            .field("ticks", &self.ticks)
            .field("recorded", &self.record.len())
            .finish()
    }
}

impl MissionEngine {
    pub fn builder(config: &AppConfig) -> MissionEngineBuilder {
        MissionEngineBuilder {
            config: config.clone(),
            seed: config.run.seed,
            clock: Box::new(SystemClock),
        }
    }

    /// Engine with the configured seed (or OS entropy) and the host clock.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    fn assemble(config: AppConfig, sampler: Sampler, clock: Box<dyn Clock>) -> Self {
        let mission = config.mission;
        let initial_voltage = round_to(mission.initial_voltage, mission.voltage_precision);
        let governor = ModeGovernor::new(&mission, &config.governor);
        let mode = governor.determine(initial_voltage).mode;
        Self {
            node_id: config.node.id,
            guardrail: Guardrail::new(mission.max_temperature),
            governor,
            sampler,
            clock,
            raw_voltage: mission.initial_voltage,
            voltage: initial_voltage,
            mode,
            interval: config.governor.initial_interval,
            ticks: 0,
            record: MissionRecord::new(),
            mission,
        }
    }

    /// Run one tick of the control loop.
    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let tick = self.ticks;
        let timestamp = self.clock.now();

        self.raw_voltage -= self.mission.decay_rate;
        let voltage = round_to(
            self.raw_voltage.max(self.mission.voltage_floor),
            self.mission.voltage_precision,
        );
        // Rounding must never push the reported value back up.
        self.voltage = voltage.min(self.voltage);

        let decision = self.governor.determine(self.voltage);
        let previous_mode = self.mode;
        self.mode = decision.mode;
        if let Some(interval) = decision.interval {
            self.interval = interval;
        }

        let raw = self.sampler.sample();
        let reading = self.guardrail.evaluate(raw.temperature, raw.signal);
        let sample = Sample::new(tick, timestamp, self.voltage, self.mode, reading);

        let ctx = LogContext::new()
            .with_node(&self.node_id)
            .with_tick(tick)
            .with_mode(self.mode.as_str());
        node_debug!(
            context = ctx,
            "tick voltage={} interval_s={} excursion={} injected={}",
            self.voltage,
            self.interval.as_secs_f64(),
            reading.excursion,
            raw.injected
        );
        if previous_mode != self.mode {
            node_info!(
                context = ctx,
                "operating mode {} -> {} at {}V",
                previous_mode,
                self.mode,
                self.voltage
            );
        }
        if reading.excursion {
            node_warn!(
                context = ctx,
                "thermal excursion: raw {}C exceeds ceiling {}C; readings suppressed",
                raw.temperature,
                self.guardrail.ceiling()
            );
        }

        if self.mode.is_emergency() {
            log_mission_event(
                Some(&ctx),
                "mission.safe_mode",
                "voltage at or below safe threshold; mission terminated",
                MissionEventOutcome::Fault,
            );
        } else {
            self.record.append(sample.clone());
        }

        TickOutcome {
            sample,
            interval: self.interval,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Last reported voltage.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Cadence currently in force.
    pub fn current_interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn record(&self) -> &MissionRecord {
        &self.record
    }

    /// Access to the sensor head, e.g. to force or suppress fault injection.
    pub fn sampler_mut(&mut self) -> &mut Sampler {
        &mut self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waialua_common::time::SteppingClock;

    fn engine_with(config: AppConfig) -> MissionEngine {
        MissionEngine::builder(&config)
            .seed(11)
            .clock(SteppingClock::from_unix(1_714_550_400))
            .build()
            .expect("valid config")
    }

    #[test]
    fn ticks_are_numbered_from_one() {
        let mut engine = engine_with(AppConfig::default());
        assert_eq!(engine.ticks(), 0);
        assert_eq!(engine.tick().sample.tick, 1);
        assert_eq!(engine.tick().sample.tick, 2);
        assert_eq!(engine.ticks(), 2);
    }

    #[test]
    fn voltage_decays_by_rate() {
        let mut engine = engine_with(AppConfig::default());
        let first = engine.tick();
        assert_eq!(first.sample.voltage, 4.188);
        let second = engine.tick();
        assert_eq!(second.sample.voltage, 4.176);
    }

    #[test]
    fn voltage_is_floored() {
        let mut config = AppConfig::default();
        config.mission.initial_voltage = 2.95;
        config.mission.decay_rate = 0.1;
        let mut engine = engine_with(config);
        for _ in 0..5 {
            let outcome = engine.tick();
            assert!(outcome.sample.voltage >= 2.9);
        }
        assert_eq!(engine.voltage(), 2.9);
    }

    #[test]
    fn degraded_cadence_is_five_seconds() {
        let mut config = AppConfig::default();
        config.mission.initial_voltage = 3.6;
        let mut engine = engine_with(config);
        let outcome = engine.tick();
        assert_eq!(outcome.sample.mode, OperatingMode::Degraded);
        assert_eq!(outcome.interval, Duration::from_secs(5));
    }

    #[test]
    fn emergency_retains_previous_interval() {
        // No emergency cadence is defined; the last governed cadence stays in force.
        let mut config = AppConfig::default();
        config.mission.initial_voltage = 3.42;
        config.mission.decay_rate = 0.015;
        let mut engine = engine_with(config);
        let degraded = engine.tick();
        assert_eq!(degraded.sample.mode, OperatingMode::Degraded);
        assert_eq!(degraded.interval, Duration::from_secs(5));
        let emergency = engine.tick();
        assert_eq!(emergency.sample.mode, OperatingMode::Emergency);
        assert_eq!(emergency.interval, Duration::from_secs(5));
        assert_eq!(engine.current_interval(), Duration::from_secs(5));
    }

    #[test]
    fn emergency_from_first_tick_keeps_initial_interval() {
        let mut config = AppConfig::default();
        config.mission.initial_voltage = 3.41;
        config.governor.initial_interval = Duration::from_millis(750);
        let mut engine = engine_with(config);
        let outcome = engine.tick();
        assert!(outcome.is_terminal());
        assert_eq!(outcome.interval, Duration::from_millis(750));
        assert!(engine.record().is_empty());
    }

    #[test]
    fn constant_voltage_with_zero_decay() {
        let mut config = AppConfig::default();
        config.mission.decay_rate = 0.0;
        let mut engine = engine_with(config);
        for _ in 0..10 {
            assert_eq!(engine.tick().sample.voltage, 4.2);
        }
        assert_eq!(engine.mode(), OperatingMode::Nominal);
    }

    #[test]
    fn invalid_config_fails_construction() {
        let mut config = AppConfig::default();
        config.mission.decay_rate = -0.5;
        assert_eq!(
            MissionEngine::new(&config).err(),
            Some(ConfigError::NegativeDecay(-0.5))
        );
    }

    #[test]
    fn overflowing_temperature_band_fails_construction() {
        let mut config = AppConfig::default();
        config.sampler.temperature_low = -1e308;
        config.sampler.temperature_high = 1e308;
        let result = MissionEngine::builder(&config).seed(1).build();
        assert!(matches!(
            result,
            Err(ConfigError::TemperatureSpread { .. })
        ));
    }
}
