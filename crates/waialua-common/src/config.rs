//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the node runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use thiserror::Error;
use tracing::debug;

use crate::logging::LogFormat;

/// Upper bound for decimal rounding precision; beyond this `10^p` stops being exact.
const MAX_PRECISION: u32 = 9;

fn default_node_id() -> String {
    "waialua-edge".to_owned()
}

fn default_max_temperature() -> f64 {
    85.0
}

fn default_nominal_voltage() -> f64 {
    3.7
}

fn default_safe_voltage() -> f64 {
    3.4
}

fn default_decay_rate() -> f64 {
    0.012
}

fn default_window() -> usize {
    5
}

fn default_initial_voltage() -> f64 {
    4.2
}

fn default_voltage_floor() -> f64 {
    2.9
}

fn default_voltage_precision() -> u32 {
    3
}

fn default_nominal_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_degraded_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_temperature_baseline() -> f64 {
    45.0
}

fn default_temperature_low() -> f64 {
    -2.0
}

fn default_temperature_high() -> f64 {
    3.0
}

fn default_signal_baseline() -> f64 {
    -50.0
}

fn default_signal_sigma() -> f64 {
    5.0
}

fn default_fault_probability() -> f64 {
    0.15
}

fn default_fault_temperature() -> f64 {
    98.5
}

fn default_reading_precision() -> u32 {
    2
}

fn default_max_ticks() -> u64 {
    100
}

fn default_log_lines() -> usize {
    5
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_console_output() -> bool {
    true
}

/// Rejected mission constants. Raised before the first tick runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("safe_voltage ({safe}) must be below nominal_voltage ({nominal})")]
    VoltageThresholds { safe: f64, nominal: f64 },
    #[error("decay_rate must not be negative (got {0})")]
    NegativeDecay(f64),
    #[error("voltage_floor ({floor}) must not exceed safe_voltage ({safe})")]
    FloorAboveSafe { floor: f64, safe: f64 },
    #[error("initial_voltage ({initial}) must not be below voltage_floor ({floor})")]
    InitialBelowFloor { initial: f64, floor: f64 },
    #[error("averaging window must be at least one sample")]
    EmptyWindow,
    #[error("fault_probability must lie in [0, 1] (got {0})")]
    FaultProbability(f64),
    #[error("temperature band [{low}, {high}] must be ordered and stay finite around the baseline")]
    TemperatureSpread { low: f64, high: f64 },
    #[error("signal_sigma must not be negative (got {0})")]
    SignalSigma(f64),
    #[error("{field} must be a positive duration")]
    NonPositiveInterval { field: &'static str },
    #[error("{field} precision {value} exceeds the supported maximum of 9")]
    Precision { field: &'static str, value: u32 },
    #[error("run.max_ticks must be at least one")]
    ZeroTicks,
    #[error("invalid sampler distribution: {0}")]
    Distribution(String),
}

fn ensure_finite(field: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn ensure_precision(field: &'static str, value: u32) -> std::result::Result<(), ConfigError> {
    if value > MAX_PRECISION {
        return Err(ConfigError::Precision { field, value });
    }
    Ok(())
}

/// Primary configuration object for the node runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub governor: GovernorConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and built-in mission constants apply.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "WAIALUA_CONFIG";

    /// Load configuration from disk, respecting the `WAIALUA_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the file it came from.
    ///
    /// An explicit `WAIALUA_CONFIG` path must exist. Missing candidates are
    /// skipped; if none exist the validated defaults are returned.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }
        Self::load_candidates(candidates)
    }

    /// Like [`AppConfig::load_with_source`] but ignores `WAIALUA_CONFIG`.
    pub fn load_candidates<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!("no configuration file found; using built-in mission constants");
        let config = Self::default();
        config.validate()?;
        Ok(LoadedAppConfig {
            config,
            source: None,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid mission constants in {}", path.display()))?;
        Ok(config)
    }

    /// Validate structural invariants across every section.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.mission.validate()?;
        self.governor.validate()?;
        self.sampler.validate()?;
        self.run.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    #[serde(default = "default_node_id")]
    pub id: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            id: default_node_id(),
        }
    }
}

/// Immutable mission constants shared by every component of the control loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionConfig {
    /// Guardrail ceiling in °C; hotter raw readings are suppressed.
    #[serde(default = "default_max_temperature")]
    pub max_temperature: f64,
    /// Voltages strictly above this are `Nominal`.
    #[serde(default = "default_nominal_voltage")]
    pub nominal_voltage: f64,
    /// Voltages at or below this are `Emergency`.
    #[serde(default = "default_safe_voltage")]
    pub safe_voltage: f64,
    /// Voltage lost per tick.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Reserved averaging window. Carried for operators, not read by the loop.
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_initial_voltage")]
    pub initial_voltage: f64,
    /// Lowest voltage ever reported.
    #[serde(default = "default_voltage_floor")]
    pub voltage_floor: f64,
    /// Decimal places kept on reported voltages.
    #[serde(default = "default_voltage_precision")]
    pub voltage_precision: u32,
}

impl MissionConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        ensure_finite("mission.max_temperature", self.max_temperature)?;
        ensure_finite("mission.nominal_voltage", self.nominal_voltage)?;
        ensure_finite("mission.safe_voltage", self.safe_voltage)?;
        ensure_finite("mission.decay_rate", self.decay_rate)?;
        ensure_finite("mission.initial_voltage", self.initial_voltage)?;
        ensure_finite("mission.voltage_floor", self.voltage_floor)?;
        if self.safe_voltage >= self.nominal_voltage {
            return Err(ConfigError::VoltageThresholds {
                safe: self.safe_voltage,
                nominal: self.nominal_voltage,
            });
        }
        if self.decay_rate < 0.0 {
            return Err(ConfigError::NegativeDecay(self.decay_rate));
        }
        if self.voltage_floor > self.safe_voltage {
            return Err(ConfigError::FloorAboveSafe {
                floor: self.voltage_floor,
                safe: self.safe_voltage,
            });
        }
        if self.initial_voltage < self.voltage_floor {
            return Err(ConfigError::InitialBelowFloor {
                initial: self.initial_voltage,
                floor: self.voltage_floor,
            });
        }
        if self.window == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        ensure_precision("mission.voltage_precision", self.voltage_precision)
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            max_temperature: default_max_temperature(),
            nominal_voltage: default_nominal_voltage(),
            safe_voltage: default_safe_voltage(),
            decay_rate: default_decay_rate(),
            window: default_window(),
            initial_voltage: default_initial_voltage(),
            voltage_floor: default_voltage_floor(),
            voltage_precision: default_voltage_precision(),
        }
    }
}

/// Polling cadences chosen by the mode governor.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GovernorConfig {
    #[serde(default = "default_nominal_interval")]
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub nominal_interval: Duration,
    #[serde(default = "default_degraded_interval")]
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub degraded_interval: Duration,
    /// Cadence in force before the first tick decides one.
    #[serde(default = "default_nominal_interval")]
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub initial_interval: Duration,
}

impl GovernorConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (field, interval) in [
            ("governor.nominal_interval", self.nominal_interval),
            ("governor.degraded_interval", self.degraded_interval),
            ("governor.initial_interval", self.initial_interval),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::NonPositiveInterval { field });
            }
        }
        Ok(())
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            nominal_interval: default_nominal_interval(),
            degraded_interval: default_degraded_interval(),
            initial_interval: default_nominal_interval(),
        }
    }
}

/// Distribution parameters for the simulated sensor head.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplerConfig {
    #[serde(default = "default_temperature_baseline")]
    pub temperature_baseline: f64,
    /// Lower bound of the uniform offset added to the baseline.
    #[serde(default = "default_temperature_low")]
    pub temperature_low: f64,
    /// Upper bound (inclusive) of the uniform offset added to the baseline.
    #[serde(default = "default_temperature_high")]
    pub temperature_high: f64,
    #[serde(default = "default_signal_baseline")]
    pub signal_baseline: f64,
    #[serde(default = "default_signal_sigma")]
    pub signal_sigma: f64,
    /// Chance per tick that the thermal test vector replaces the draw.
    #[serde(default = "default_fault_probability")]
    pub fault_probability: f64,
    /// Temperature reported by the injected test vector.
    #[serde(default = "default_fault_temperature")]
    pub fault_temperature: f64,
    #[serde(default = "default_reading_precision")]
    pub reading_precision: u32,
}

impl SamplerConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        ensure_finite("sampler.temperature_baseline", self.temperature_baseline)?;
        ensure_finite("sampler.temperature_low", self.temperature_low)?;
        ensure_finite("sampler.temperature_high", self.temperature_high)?;
        ensure_finite("sampler.signal_baseline", self.signal_baseline)?;
        ensure_finite("sampler.signal_sigma", self.signal_sigma)?;
        ensure_finite("sampler.fault_temperature", self.fault_temperature)?;
        if !(0.0..=1.0).contains(&self.fault_probability) {
            return Err(ConfigError::FaultProbability(self.fault_probability));
        }
        let spread = self.temperature_high - self.temperature_low;
        let extremes = [
            self.temperature_baseline + self.temperature_low,
            self.temperature_baseline + self.temperature_high,
        ];
        if self.temperature_low >= self.temperature_high
            || !spread.is_finite()
            || extremes.iter().any(|value| !value.is_finite())
        {
            return Err(ConfigError::TemperatureSpread {
                low: self.temperature_low,
                high: self.temperature_high,
            });
        }
        if self.signal_sigma < 0.0 {
            return Err(ConfigError::SignalSigma(self.signal_sigma));
        }
        ensure_precision("sampler.reading_precision", self.reading_precision)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            temperature_baseline: default_temperature_baseline(),
            temperature_low: default_temperature_low(),
            temperature_high: default_temperature_high(),
            signal_baseline: default_signal_baseline(),
            signal_sigma: default_signal_sigma(),
            fault_probability: default_fault_probability(),
            fault_temperature: default_fault_temperature(),
            reading_precision: default_reading_precision(),
        }
    }
}

/// Settings consumed by the run drivers, not by the core loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Fixed seed for reproducible missions; drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of audit lines shown by the presentation layer.
    #[serde(default = "default_log_lines")]
    pub log_lines: usize,
}

impl RunConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroTicks);
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            seed: None,
            log_lines: default_log_lines(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Mirror events into a daily rolling JSON file under `directory`.
    #[serde(default)]
    pub file_output: bool,
    /// Write events to stderr. The terminal HUD turns this off.
    #[serde(default = "default_console_output")]
    pub console_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            file_output: false,
            console_output: default_console_output(),
        }
    }
}
