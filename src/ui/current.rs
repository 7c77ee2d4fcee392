//! Current conditions tab
//!
//! Shows the headline temperature, a grid of details, sun and moon times,
//! and any active alerts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::colors;
use crate::data::{Alert, Severity, Snapshot, Units, WeatherSnapshot};
use crate::format::{
    format_time, icon_emoji, moon_phase_label, uv_label, wind_direction_label, UvLevel,
};

/// Renders the current conditions tab
pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, units: Units) {
    let weather = &snapshot.current;
    let alert_height = if weather.alerts.is_empty() {
        0
    } else {
        weather.alerts.len() as u16 * 2 + 2
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(alert_height)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    let summary = Paragraph::new(build_summary_lines(weather, units)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::HEADER))
            .title(" Now "),
    );
    frame.render_widget(summary, columns[0]);

    let details = Paragraph::new(build_detail_lines(weather, units)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::HEADER))
            .title(" Details "),
    );
    frame.render_widget(details, columns[1]);

    if !weather.alerts.is_empty() {
        let alerts = Paragraph::new(build_alert_lines(&weather.alerts))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors::DANGER))
                    .title(" Alerts "),
            );
        frame.render_widget(alerts, rows[1]);
    }
}

fn build_summary_lines(weather: &WeatherSnapshot, units: Units) -> Vec<Line<'static>> {
    let symbol = units.temperature_symbol();
    vec![
        Line::default(),
        Line::from(vec![
            Span::raw(format!("{}  ", icon_emoji(&weather.icon))),
            Span::styled(
                format!("{}{}", weather.temperature, symbol),
                Style::default()
                    .fg(temperature_color(weather.temperature, units))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            capitalize(&weather.description),
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(Span::styled(
            format!("Feels like {}{}", weather.feels_like, symbol),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!(
                "Lat {:.2}, Lon {:.2}",
                weather.coordinates.lat, weather.coordinates.lon
            ),
            Style::default().fg(colors::UNKNOWN),
        )),
    ]
}

fn build_detail_lines(weather: &WeatherSnapshot, units: Units) -> Vec<Line<'static>> {
    let uv = uv_label(weather.uv_index);

    vec![
        detail_line("💧 Humidity", format!("{}%", weather.humidity)),
        detail_line("🌪️ Pressure", format!("{} hPa", weather.pressure)),
        detail_line(
            "💨 Wind",
            format!(
                "{:.1} {} {}",
                weather.wind_speed,
                units.speed_unit(),
                wind_direction_label(weather.wind_direction as f64)
            ),
        ),
        detail_line("👁️ Visibility", format!("{} km", weather.visibility)),
        Line::from(vec![
            Span::styled(
                format!("{:<16}", "☀️ UV Index"),
                Style::default().fg(colors::SECONDARY),
            ),
            Span::styled(
                format!("{} ({})", weather.uv_index, uv.label()),
                Style::default().fg(uv_color(uv)),
            ),
        ]),
        detail_line(
            "🌡️ Dew Point",
            format!("{}{}", weather.dew_point, units.temperature_symbol()),
        ),
        detail_line("☁️ Cloud Cover", format!("{}%", weather.cloud_cover)),
        detail_line("🌅 Sunrise", format_time(weather.sunrise)),
        detail_line("🌇 Sunset", format_time(weather.sunset)),
        detail_line("Moon", moon_phase_label(weather.moon_phase)),
    ]
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<16}", label),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::styled(value, Style::default().fg(colors::PRIMARY)),
    ])
}

fn build_alert_lines(alerts: &[Alert]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for alert in alerts {
        lines.push(Line::from(Span::styled(
            alert.kind.clone(),
            Style::default()
                .fg(severity_color(alert.severity))
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::raw(alert.message.clone())));
    }
    lines
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => colors::SECONDARY,
        Severity::Medium => colors::WARNING,
        Severity::High => colors::DANGER,
    }
}

fn uv_color(level: UvLevel) -> Color {
    match level {
        UvLevel::Low => colors::GOOD,
        UvLevel::Moderate => colors::WARNING,
        UvLevel::High => colors::DANGER,
    }
}

/// Color for temperature (warmer = more red, cooler = more blue)
pub fn temperature_color(temperature: i32, units: Units) -> Color {
    let celsius = Units::Metric.temperature_from(temperature, units);

    if celsius >= 30 {
        Color::Red
    } else if celsius >= 25 {
        Color::LightRed
    } else if celsius >= 20 {
        Color::Yellow
    } else if celsius >= 15 {
        Color::Green
    } else if celsius >= 10 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
