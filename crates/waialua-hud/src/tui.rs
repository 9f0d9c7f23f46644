//! ---
//! ems_section: "12-gui-setup-wizard"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission HUD view model and renderers."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::panel::PanelView;

fn tile(frame: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        value.to_owned(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title.to_owned(), Style::default().fg(Color::DarkGray))),
    );
    frame.render_widget(paragraph, area);
}

/// Draw the HUD for one tick. `footer` replaces the key hint, e.g. with the
/// safe mode banner.
pub fn draw_panel(
    frame: &mut Frame,
    node_id: &str,
    view: &PanelView,
    log: &[&str],
    footer: Option<&str>,
) {
    let log_height = log.len().max(1) as u16 + 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(log_height),
            Constraint::Min(1),
        ])
        .split(frame.size());

    let header = Line::from(vec![
        Span::styled(
            format!("📡 {node_id}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("CLOCK: {}", view.clock),
            Style::default().fg(Color::White),
        ),
        Span::raw("   "),
        Span::styled(
            format!("[{}]", view.palette.label),
            Style::default()
                .fg(view.palette.color)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL)),
        rows[0],
    );

    let gauge = Paragraph::new(Line::from(format!("{} {}", view.gauge, view.voltage))).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            format!("VOLTAGE_SWEEP_ANALYSIS (POLLING_RATE: {})", view.polling_rate),
            Style::default().fg(Color::DarkGray),
        )),
    );
    frame.render_widget(gauge, rows[1]);

    for (row, tiles) in [(rows[2], 0), (rows[3], 1)] {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row);
        if tiles == 0 {
            let thermal_color = if view.excursion { Color::Red } else { Color::Green };
            tile(
                frame,
                cols[0],
                "THERMAL_SNS",
                &format!("{}°C", view.temperature),
                thermal_color,
            );
            tile(frame, cols[1], "SIGNAL_RAW", &view.signal, Color::Yellow);
        } else {
            tile(frame, cols[0], "MISSION_TICK", &view.tick, Color::White);
            tile(frame, cols[1], "DATA_AVAIL", &view.availability, Color::Cyan);
        }
    }

    let lines: Vec<Line> = if log.is_empty() {
        vec![Line::from("(no accepted ticks)")]
    } else {
        log.iter().map(|line| Line::from(*line)).collect()
    };
    let events = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("// MISSION_EVENT_LOG"),
        );
    frame.render_widget(events, rows[4]);

    let footer_text = footer.unwrap_or("q quit");
    let footer_style = if footer.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(Paragraph::new(footer_text).style(footer_style), rows[5]);
}
