//! ---
//! ems_section: "12-gui-setup-wizard"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission HUD view model and renderers."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use waialua_common::time::interval_to_hz;
use waialua_core::sample::format_reading;
use waialua_core::{MissionRecord, OperatingMode, Sample};

use crate::gauge::VoltageGauge;
use crate::palette::{palette, ModePalette};

/// Shown in place of a suppressed temperature.
pub const FAIL_DISPLAY: &str = "FAIL";
/// Shown in place of a suppressed signal.
pub const SIGNAL_PLACEHOLDER: &str = "---";

/// Display-ready strings for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub clock: String,
    pub mode: OperatingMode,
    pub palette: ModePalette,
    pub gauge: VoltageGauge,
    pub voltage: String,
    pub polling_rate: String,
    pub temperature: String,
    pub signal: String,
    pub tick: String,
    pub availability: String,
    pub excursion: bool,
}

impl PanelView {
    pub fn build(sample: &Sample, record: &MissionRecord, interval: Duration) -> Self {
        Self {
            clock: sample.timestamp.format("%H:%M:%S").to_string(),
            mode: sample.mode,
            palette: *palette(sample.mode),
            gauge: VoltageGauge::new(sample.voltage),
            voltage: format!("{}V", format_reading(sample.voltage)),
            polling_rate: format!("{:.1}Hz", interval_to_hz(interval)),
            temperature: sample
                .temperature
                .map(format_reading)
                .unwrap_or_else(|| FAIL_DISPLAY.to_owned()),
            signal: sample
                .signal
                .map(format_reading)
                .unwrap_or_else(|| SIGNAL_PLACEHOLDER.to_owned()),
            tick: format!("{:03}", sample.tick),
            availability: format!("{:.1}%", record.data_availability()),
            excursion: sample.excursion,
        }
    }
}

/// Plain-text panel followed by the newest audit lines.
pub fn render_text(node_id: &str, view: &PanelView, log: &[&str]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} | CLOCK: {} | [{}]\n",
        node_id, view.clock, view.palette.label
    ));
    out.push_str(&format!(
        "VOLTAGE_SWEEP_ANALYSIS (POLLING_RATE: {})\n",
        view.polling_rate
    ));
    out.push_str(&format!("{} {}\n", view.gauge, view.voltage));
    out.push_str(&format!(
        "THERMAL_SNS: {}°C | SIGNAL_RAW: {} | MISSION_TICK: {} | DATA_AVAIL: {}\n",
        view.temperature, view.signal, view.tick, view.availability
    ));
    out.push_str("// MISSION_EVENT_LOG\n");
    for line in log {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use waialua_core::evaluate;

    fn sample(tick: u64, voltage: f64, mode: OperatingMode, raw_temperature: f64) -> Sample {
        let timestamp = Local
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 5)
            .single()
            .expect("unambiguous local time");
        Sample::new(
            tick,
            timestamp,
            voltage,
            mode,
            evaluate(raw_temperature, -49.5, 85.0),
        )
    }

    #[test]
    fn valid_tick_shows_readings() {
        let mut record = MissionRecord::new();
        let s = sample(4, 4.152, OperatingMode::Nominal, 46.07);
        record.append(s.clone());
        let view = PanelView::build(&s, &record, Duration::from_secs(1));
        assert_eq!(view.clock, "12:30:05");
        assert_eq!(view.palette.label, "LIME");
        assert_eq!(view.voltage, "4.152V");
        assert_eq!(view.polling_rate, "1.0Hz");
        assert_eq!(view.temperature, "46.07");
        assert_eq!(view.signal, "-49.5");
        assert_eq!(view.tick, "004");
        assert_eq!(view.availability, "100.0%");
        assert!(!view.excursion);
    }

    #[test]
    fn suppressed_readings_are_never_zero() {
        let mut record = MissionRecord::new();
        record.append(sample(1, 3.6, OperatingMode::Degraded, 44.0));
        let rejected = sample(2, 3.588, OperatingMode::Degraded, 98.5);
        record.append(rejected.clone());
        let view = PanelView::build(&rejected, &record, Duration::from_secs(5));
        assert_eq!(view.temperature, FAIL_DISPLAY);
        assert_eq!(view.signal, SIGNAL_PLACEHOLDER);
        assert_eq!(view.polling_rate, "0.2Hz");
        assert_eq!(view.availability, "50.0%");
        assert_eq!(view.palette.label, "AMBER");
        assert!(view.excursion);
    }

    #[test]
    fn text_panel_lists_log_lines() {
        let mut record = MissionRecord::new();
        let s = sample(1, 4.188, OperatingMode::Nominal, 45.0);
        record.append(s.clone());
        let view = PanelView::build(&s, &record, Duration::from_secs(1));
        let text = render_text("edge-1", &view, &record.recent_log(5));
        assert!(text.starts_with("edge-1 | CLOCK: 12:30:05 | [LIME]"));
        assert!(text.contains("THERMAL_SNS: 45.0°C"));
        assert!(text.contains("TICK_001 | OK | 4.188V | 45.0C"));
    }
}
