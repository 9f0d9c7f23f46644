//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Simulated sensor head for the mission loop."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Simulated sensor head.
//!
//! Temperature is a uniform draw around a baseline and signal an independent
//! normal draw. With `fault_probability` the temperature draw is replaced by
//! `fault_temperature`. That replacement is a test vector for the thermal
//! guardrail, not a physical model of the sensor.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use waialua_common::config::{ConfigError, SamplerConfig};

use crate::round_to;

/// One unguarded observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub temperature: f64,
    pub signal: f64,
    /// Set when the thermal test vector replaced the temperature draw.
    pub injected: bool,
}

/// Produces raw observations from an injectable random source.
#[derive(Debug)]
pub struct Sampler<R = StdRng> {
    rng: R,
    temperature_baseline: f64,
    temperature_offset: Uniform<f64>,
    signal_baseline: f64,
    signal_noise: Normal<f64>,
    fault_probability: f64,
    fault_temperature: f64,
    precision: u32,
}

impl Sampler<StdRng> {
    /// Sampler with a reproducible random stream.
    pub fn seeded(config: &SamplerConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating system entropy.
    pub fn from_entropy(config: &SamplerConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Sampler<R> {
    pub fn with_rng(config: &SamplerConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let signal_noise = Normal::new(0.0, config.signal_sigma)
            .map_err(|err| ConfigError::Distribution(err.to_string()))?;
        Ok(Self {
            rng,
            temperature_baseline: config.temperature_baseline,
            temperature_offset: Uniform::new_inclusive(
                config.temperature_low,
                config.temperature_high,
            ),
            signal_baseline: config.signal_baseline,
            signal_noise,
            fault_probability: config.fault_probability,
            fault_temperature: config.fault_temperature,
            precision: config.reading_precision,
        })
    }

    /// Draw one observation: temperature, fault roll, then signal.
    pub fn sample(&mut self) -> RawObservation {
        let mut temperature = round_to(
            self.temperature_baseline + self.temperature_offset.sample(&mut self.rng),
            self.precision,
        );
        let injected = self.rng.gen::<f64>() < self.fault_probability;
        if injected {
            temperature = self.fault_temperature;
        }
        let signal = round_to(
            self.signal_baseline + self.signal_noise.sample(&mut self.rng),
            self.precision,
        );
        RawObservation {
            temperature,
            signal,
            injected,
        }
    }

    pub fn fault_probability(&self) -> f64 {
        self.fault_probability
    }

    /// Change the injection probability; `1.0` forces the test vector on every
    /// draw and `0.0` suppresses it.
    pub fn set_fault_probability(&mut self, probability: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::FaultProbability(probability));
        }
        self.fault_probability = probability;
        Ok(())
    }

    pub fn fault_temperature(&self) -> f64 {
        self.fault_temperature
    }

    pub fn set_fault_temperature(&mut self, temperature: f64) {
        self.fault_temperature = temperature;
    }
}
