//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Binary entrypoint for the headless mission driver."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde_json::json;
use tokio::signal;
use tracing::{info, warn};
use waialua_common::config::AppConfig;
use waialua_common::logging::{init_tracing, LogFormat};
use waialua_core::{MissionEngine, MissionRunner, RunnerState, TickOutcome};
use waialua_hud::{render_text, PanelView, TERMINATION_BANNER};

#[derive(Debug, Parser)]
#[command(author, version, about = "Waialua edge node mission driver", long_about = None)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Stop after this many ticks if no emergency occurs")]
    max_ticks: Option<u64>,

    #[arg(long, help = "Fix the random seed for a reproducible mission")]
    seed: Option<u64>,

    #[arg(long, help = "Override the thermal fault injection probability")]
    fault_probability: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Per-tick output on stdout")]
    output: OutputFormat,

    #[arg(long, value_enum, help = "Override the configured log format")]
    log_format: Option<CliLogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::StructuredJson,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/waialua.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(max_ticks) = cli.max_ticks {
        config.run.max_ticks = max_ticks;
    }
    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }
    if let Some(probability) = cli.fault_probability {
        config.sampler.fault_probability = probability;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    config.validate()?;

    init_tracing("waialuad", &config.logging)?;
    match &loaded.source {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => info!("no configuration file found; using built-in mission constants"),
    }

    let engine = MissionEngine::new(&config)?;
    info!(
        node = %engine.node_id(),
        voltage = engine.voltage(),
        mode = %engine.mode(),
        max_ticks = config.run.max_ticks,
        seed = ?config.run.seed,
        "mission starting"
    );
    let mut runner = MissionRunner::new(engine, config.run.max_ticks);
    let log_lines = config.run.log_lines;

    while let Some(outcome) = runner.next_tick() {
        emit(cli.output, &outcome, runner.engine(), log_lines)?;
        if !runner.is_running() {
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(outcome.interval) => {}
            result = signal::ctrl_c() => {
                result?;
                warn!(tick = outcome.sample.tick, "ctrl-c received; stopping mission");
                break;
            }
        }
    }

    finish(cli.output, runner.state(), runner.engine());
    Ok(())
}

fn emit(
    output: OutputFormat,
    outcome: &TickOutcome,
    engine: &MissionEngine,
    log_lines: usize,
) -> Result<()> {
    match output {
        OutputFormat::Text => {
            let view = PanelView::build(&outcome.sample, engine.record(), outcome.interval);
            let log = engine.record().recent_log(log_lines);
            println!("{}", render_text(engine.node_id(), &view, &log));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&outcome.sample)?);
        }
    }
    Ok(())
}

fn finish(output: OutputFormat, state: RunnerState, engine: &MissionEngine) {
    let record = engine.record();
    let state_label = match state {
        RunnerState::Terminated => "terminated",
        RunnerState::Exhausted => "exhausted",
        RunnerState::Running => "interrupted",
    };
    info!(
        state = state_label,
        ticks = engine.ticks(),
        recorded = record.len(),
        availability = record.data_availability(),
        "mission ended"
    );
    match output {
        OutputFormat::Text => {
            if state == RunnerState::Terminated {
                println!("{TERMINATION_BANNER}");
            }
            println!(
                "ticks={} recorded={} data_avail={:.1}%",
                engine.ticks(),
                record.len(),
                record.data_availability()
            );
        }
        OutputFormat::Json => {
            let summary = json!({
                "state": state_label,
                "ticks": engine.ticks(),
                "recorded": record.len(),
                "data_availability": record.data_availability(),
                "final_voltage": engine.voltage(),
                "final_mode": engine.mode(),
            });
            println!("{summary}");
        }
    }
}
