//! ---
//! ems_section: "12-gui-setup-wizard"
//! ems_subsection: "binary"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Terminal HUD launcher for the mission loop."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use waialua_common::config::AppConfig;
use waialua_common::logging::init_tracing;
use waialua_core::{MissionEngine, MissionRunner, RunnerState, TickOutcome};
use waialua_hud::{draw_panel, PanelView, TERMINATION_BANNER};

const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(author, version, about = "Mission HUD for the Waialua edge node")]
struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Stop after this many ticks if no emergency occurs
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Fix the random seed for a reproducible mission
    #[arg(long)]
    seed: Option<u64>,
    /// Override the thermal fault injection probability
    #[arg(long)]
    fault_probability: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing("waialua-ui", &config.logging)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let result = run_app(&mut terminal, &config);
    cleanup_terminal(&mut terminal)?;
    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/waialua.toml"));
    let mut config = AppConfig::load(&candidates)?;
    if let Some(max_ticks) = cli.max_ticks {
        config.run.max_ticks = max_ticks;
    }
    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }
    if let Some(probability) = cli.fault_probability {
        config.sampler.fault_probability = probability;
    }
    // The alternate screen owns the terminal; events go to the log file only.
    config.logging.console_output = false;
    config.validate()?;
    Ok(config)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: &AppConfig) -> Result<()> {
    let engine = MissionEngine::new(config)?;
    let mut runner = MissionRunner::new(engine, config.run.max_ticks);
    let mut last: Option<TickOutcome> = None;

    loop {
        if let Some(outcome) = runner.next_tick() {
            last = Some(outcome);
        }
        let Some(outcome) = &last else {
            break;
        };

        let engine = runner.engine();
        let view = PanelView::build(&outcome.sample, engine.record(), outcome.interval);
        let log = engine.record().recent_log(config.run.log_lines);
        let footer = match runner.state() {
            RunnerState::Running => None,
            RunnerState::Terminated => Some(format!("{TERMINATION_BANNER}  (q to exit)")),
            RunnerState::Exhausted => Some("tick budget exhausted  (q to exit)".to_owned()),
        };
        terminal.draw(|frame| {
            draw_panel(frame, engine.node_id(), &view, &log, footer.as_deref())
        })?;

        let wait = if runner.is_running() {
            outcome.interval
        } else {
            IDLE_POLL
        };
        if wait_for_quit(wait)? {
            info!(tick = outcome.sample.tick, state = ?runner.state(), "hud closed by operator");
            break;
        }
    }
    Ok(())
}

/// Block for up to `timeout`, returning early only when a quit key arrives.
fn wait_for_quit(timeout: Duration) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || !event::poll(remaining)? {
            return Ok(false);
        }
        if let Event::Key(key) = event::read()? {
            if is_quit(key) {
                return Ok(true);
            }
        }
    }
}

fn is_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()?;
    Ok(())
}
