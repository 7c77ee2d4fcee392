//! Air quality tab

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::colors;
use crate::data::{AirQualitySnapshot, AqiStatus, Pollen, Pollutants};

/// Top of the AQI scale produced by the sources
const AQI_SCALE_MAX: u16 = 300;

/// Renders the AQI gauge, pollutant levels and pollen forecast
pub fn render(frame: &mut Frame, area: Rect, air: &AirQualitySnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // AQI gauge
            Constraint::Min(8),    // Pollutants
            Constraint::Length(5), // Pollen
        ])
        .split(area);

    let color = status_color(air.status);
    let ratio = (air.aqi.min(AQI_SCALE_MAX) as f64 / AQI_SCALE_MAX as f64).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::HEADER))
                .title(" 🌫️ Air Quality Index "),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(Span::styled(
            format!("{} · {}", air.aqi, air.status.label()),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, chunks[0]);

    let pollutants = Paragraph::new(build_pollutant_lines(&air.pollutants)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::HEADER))
            .title(" Pollutant Levels "),
    );
    frame.render_widget(pollutants, chunks[1]);

    let pollen = Paragraph::new(build_pollen_lines(&air.pollen)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::HEADER))
            .title(" 🌸 Pollen Forecast "),
    );
    frame.render_widget(pollen, chunks[2]);
}

/// Color for an AQI bucket
pub fn status_color(status: AqiStatus) -> Color {
    match status {
        AqiStatus::Good => colors::GOOD,
        AqiStatus::Moderate => colors::WARNING,
        AqiStatus::UnhealthyForSensitive => Color::LightRed,
        AqiStatus::Unhealthy => colors::DANGER,
    }
}

fn build_pollutant_lines(pollutants: &Pollutants) -> Vec<Line<'static>> {
    [
        ("PM2.5", pollutants.pm25 as u32),
        ("PM10", pollutants.pm10 as u32),
        ("O₃", pollutants.o3 as u32),
        ("NO₂", pollutants.no2 as u32),
        ("SO₂", pollutants.so2 as u32),
        ("CO", pollutants.co),
    ]
    .into_iter()
    .map(|(name, value)| {
        Line::from(vec![
            Span::styled(
                format!("{:<8}", name),
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:>5} μg/m³", value)),
        ])
    })
    .collect()
}

fn build_pollen_lines(pollen: &Pollen) -> Vec<Line<'static>> {
    [("🌳 Tree", pollen.tree), ("🌾 Grass", pollen.grass), ("🌿 Weed", pollen.weed)]
        .into_iter()
        .map(|(name, level)| {
            Line::from(vec![
                Span::styled(format!("{:<10}", name), Style::default().fg(colors::PRIMARY)),
                Span::raw(format!("Level {}/5  ", level)),
                Span::styled(pollen_bar(level), Style::default().fg(pollen_color(level))),
            ])
        })
        .collect()
}

/// Five-cell bar with `level` cells filled
fn pollen_bar(level: u8) -> String {
    let filled = level.min(5) as usize;
    format!("{}{}", "■".repeat(filled), "□".repeat(5 - filled))
}

fn pollen_color(level: u8) -> Color {
    match level {
        0..=1 => colors::GOOD,
        2..=3 => colors::WARNING,
        _ => colors::DANGER,
    }
}
