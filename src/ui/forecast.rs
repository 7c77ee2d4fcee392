//! Forecast tab
//!
//! Renders either the daily forecast or the hourly forecast with a
//! temperature sparkline, scrolled by `App::forecast_scroll`.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::colors;
use super::current::temperature_color;
use super::widgets::TemperatureSparkline;
use crate::app::{App, ForecastView};
use crate::data::{ForecastDay, HourlyEntry, Snapshot, Units};
use crate::format::{format_time, icon_emoji};

/// Renders the forecast tab for the selected view
pub fn render<S>(frame: &mut Frame, area: Rect, app: &App<S>, snapshot: &Snapshot) {
    match app.forecast_view {
        ForecastView::Daily => render_daily(frame, area, &snapshot.forecast, app),
        ForecastView::Hourly => render_hourly(frame, area, &snapshot.hourly, app),
    }
}

fn render_daily<S>(frame: &mut Frame, area: Rect, days: &[ForecastDay], app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(format!(" 📅 {}-Day Forecast (f: hourly) ", days.len()));

    let lines: Vec<Line> = days
        .iter()
        .enumerate()
        .skip(app.forecast_scroll as usize)
        .map(|(index, day)| build_daily_line(index, day, app.units))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_hourly<S>(frame: &mut Frame, area: Rect, hours: &[HourlyEntry], app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(format!(" 🕐 {}-Hour Forecast (f: daily) ", hours.len()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Sparkline
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Rows
        ])
        .split(inner);

    let temperatures: Vec<i32> = hours.iter().map(|h| h.temperature).collect();
    let sparkline = TemperatureSparkline::new(&temperatures).marker(app.forecast_scroll as usize);
    frame.render_widget(sparkline, chunks[0]);

    let lines: Vec<Line> = hours
        .iter()
        .skip(app.forecast_scroll as usize)
        .map(|hour| build_hourly_line(hour, app.units))
        .collect();

    frame.render_widget(Paragraph::new(lines), chunks[2]);
}

/// "Today", "Tomorrow", then e.g. "Wed, Jul 17"
pub fn day_label(index: usize, date: NaiveDate) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a, %b %-d").to_string(),
    }
}

fn build_daily_line(index: usize, day: &ForecastDay, units: Units) -> Line<'static> {
    let symbol = units.temperature_symbol();
    Line::from(vec![
        Span::styled(
            format!("{:<13}", day_label(index, day.date)),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{}  ", icon_emoji(&day.icon))),
        Span::styled(
            format!("{:>4}{}", day.temp_high, symbol),
            Style::default().fg(temperature_color(day.temp_high, units)),
        ),
        Span::styled(" / ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            format!("{:>4}{}", day.temp_low, symbol),
            Style::default().fg(temperature_color(day.temp_low, units)),
        ),
        Span::styled(
            format!("  {:<20}", day.description),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::raw(format!(
            " 💧 {:>3}%  💨 {:.1} {}",
            day.precipitation,
            day.wind_speed,
            units.speed_unit()
        )),
    ])
}

fn build_hourly_line(hour: &HourlyEntry, units: Units) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<7}", format_time(hour.timestamp)),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::raw(format!("{}  ", icon_emoji(&hour.icon))),
        Span::styled(
            format!("{:>4}{}", hour.temperature, units.temperature_symbol()),
            Style::default().fg(temperature_color(hour.temperature, units)),
        ),
        Span::styled(
            format!("  {:<20}", hour.description),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::raw(format!(
            " 💧 {:>3}%  💨 {:.1} {}",
            hour.precipitation,
            hour.wind_speed,
            units.speed_unit()
        )),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{dashboard_app, render_to_string};

    #[test]
    fn test_day_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();
        assert_eq!(day_label(0, date), "Today");
        assert_eq!(day_label(1, date), "Tomorrow");
        assert_eq!(day_label(2, date), "Wed, Jul 17");
    }

    #[test]
    fn test_daily_view_lists_days() {
        let app = dashboard_app();
        let snapshot = app.snapshot.as_ref().unwrap();

        let content = render_to_string(120, 30, |frame| {
            let area = frame.area();
            render(frame, area, &app, snapshot)
        });

        assert!(content.contains("15-Day Forecast"));
        assert!(content.contains("Today"));
        assert!(content.contains("Tomorrow"));
    }

    #[test]
    fn test_scrolled_daily_view_hides_first_day() {
        let mut app = dashboard_app();
        app.forecast_scroll = 2;
        let snapshot = app.snapshot.clone().unwrap();

        let content = render_to_string(120, 30, |frame| {
            let area = frame.area();
            render(frame, area, &app, &snapshot)
        });

        assert!(!content.contains("Today"));
    }

    #[test]
    fn test_hourly_view_shows_times() {
        let mut app = dashboard_app();
        app.forecast_view = ForecastView::Hourly;
        let snapshot = app.snapshot.clone().unwrap();
        let first_time = format_time(snapshot.hourly[0].timestamp);

        let content = render_to_string(120, 30, |frame| {
            let area = frame.area();
            render(frame, area, &app, &snapshot)
        });

        assert!(content.contains("72-Hour Forecast"));
        assert!(content.contains(&first_time));
    }
}
