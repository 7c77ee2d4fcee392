//! UI rendering module for WeatherLens
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. [`render`] draws whichever view
//! the application state calls for; each dashboard tab lives in its own module.

pub mod air_quality;
pub mod assistant;
pub mod current;
pub mod forecast;
pub mod help_overlay;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, AppState, InputMode, Tab};

pub use help_overlay::render as render_help_overlay;

/// Shared color scheme
pub mod colors {
    use ratatui::style::Color;

    /// Section headers and borders
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Unavailable data
    pub const UNKNOWN: Color = Color::DarkGray;
    /// Key hints and highlights
    pub const KEY: Color = Color::Yellow;
    pub const GOOD: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const DANGER: Color = Color::Red;
}

/// Renders the UI based on the current application state
pub fn render<S>(frame: &mut Frame, app: &App<S>) {
    match &app.state {
        AppState::Loading => render_loading(frame, app),
        AppState::Error(message) => render_error(frame, app, message),
        AppState::Dashboard => render_dashboard(frame, app),
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders a loading message while the snapshot is being fetched
fn render_loading<S>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(format!("Loading weather for {}...", app.city))
        .style(Style::default().fg(colors::HEADER))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Renders the fetch error with its message and the retry prompt
fn render_error<S>(frame: &mut Frame, app: &App<S>, message: &str) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::DANGER))
        .title(Span::styled(
            format!(" {} ", app.city),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "⚠️ Error loading weather data",
            Style::default()
                .fg(colors::DANGER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(colors::PRIMARY),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("r", Style::default().fg(colors::KEY)),
            Span::styled(" Retry", Style::default().fg(colors::SECONDARY)),
            Span::raw("  "),
            Span::styled("/", Style::default().fg(colors::KEY)),
            Span::styled(" Change city", Style::default().fg(colors::SECONDARY)),
            Span::raw("  "),
            Span::styled("q", Style::default().fg(colors::KEY)),
            Span::styled(" Quit", Style::default().fg(colors::SECONDARY)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[0]);

    render_input_line(frame, chunks[1], app);
}

/// Renders the header, tab bar, selected tab and status line
fn render_dashboard<S>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Tab content
            Constraint::Length(3), // Input or status
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app.tab);

    if let Some(snapshot) = &app.snapshot {
        match app.tab {
            Tab::Current => current::render(frame, chunks[2], snapshot, app.units),
            Tab::Forecast => forecast::render(frame, chunks[2], app, snapshot),
            Tab::AirQuality => air_quality::render(frame, chunks[2], &snapshot.air_quality),
            Tab::Assistant => assistant::render(frame, chunks[2], app),
        }
    }

    render_input_line(frame, chunks[3], app);
}

fn render_header<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let mut spans = vec![Span::styled(
        " 🌤️ WeatherLens ",
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(snapshot) = &app.snapshot {
        spans.push(Span::styled(
            format!(" 📍 {}, {}", snapshot.current.city, snapshot.current.country),
            Style::default().fg(colors::PRIMARY),
        ));
    }

    if let Some(refreshed) = app.last_refresh {
        spans.push(Span::styled(
            format!("  Updated {}", refreshed.format("%H:%M")),
            Style::default().fg(colors::SECONDARY),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, selected: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(selected.index())
        .style(Style::default().fg(colors::SECONDARY))
        .highlight_style(
            Style::default()
                .fg(colors::KEY)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Renders the text being typed, or the status message and key hints
fn render_input_line<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let (title, content) = match app.input_mode {
        InputMode::City => (
            " City (Enter search, ↑/↓ history, Esc cancel) ",
            Line::from(format!("{}█", app.input)),
        ),
        InputMode::Question => (
            " Ask WeatherLens AI (Enter send, ↑/↓ suggestions, Esc cancel) ",
            Line::from(format!("{}█", app.input)),
        ),
        InputMode::Normal => (" ", status_line(app)),
    };

    let border = if app.input_mode == InputMode::Normal {
        colors::UNKNOWN
    } else {
        colors::KEY
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    frame.render_widget(paragraph, area);
}

fn status_line<S>(app: &App<S>) -> Line<'static> {
    if let Some(status) = &app.status {
        return Line::from(Span::styled(
            status.clone(),
            Style::default().fg(colors::PRIMARY),
        ));
    }

    let mut spans = Vec::new();
    for (key, label) in [
        ("Tab", "Switch"),
        ("/", "City"),
        ("a", "Ask"),
        ("f", "Daily/Hourly"),
        ("r", "Refresh"),
        ("e", "Export"),
        ("?", "Help"),
        ("q", "Quit"),
    ] {
        spans.push(Span::styled(key, Style::default().fg(colors::KEY)));
        spans.push(Span::styled(
            format!(" {}  ", label),
            Style::default().fg(colors::SECONDARY),
        ));
    }
    Line::from(spans)
}


#[cfg(test)]
mod tests {
    use super::test_support::{dashboard_app, render_to_string};
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_loading_view_names_city() {
        let mut app = dashboard_app();
        app.state = AppState::Loading;

        let content = render_to_string(80, 24, |frame| render(frame, &app));

        assert!(content.contains("Loading weather for Paris..."));
    }

    #[test]
    fn test_error_view_shows_message_and_retry() {
        let mut app = dashboard_app();
        app.state = AppState::Error("network unreachable".to_string());

        let content = render_to_string(80, 24, |frame| render(frame, &app));

        assert!(content.contains("network unreachable"));
        assert!(content.contains("Retry"));
    }

    #[test]
    fn test_dashboard_shows_tabs_and_header() {
        let app = dashboard_app();

        let content = render_to_string(120, 40, |frame| render(frame, &app));

        assert!(content.contains("WeatherLens"));
        assert!(content.contains("Paris"));
        assert!(content.contains("Forecast"));
        assert!(content.contains("Quit"));
    }

    #[test]
    fn test_city_input_is_shown() {
        let mut app = dashboard_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::NONE));

        let content = render_to_string(120, 40, |frame| render(frame, &app));

        assert!(content.contains("City (Enter search"));
        assert!(content.contains("R█"));
    }

    #[test]
    fn test_status_message_replaces_hints() {
        let mut app = dashboard_app();
        app.status = Some("Exported to ./weather-Paris.json".to_string());

        let content = render_to_string(120, 40, |frame| render(frame, &app));

        assert!(content.contains("Exported to"));
        assert!(!content.contains("Daily/Hourly"));
    }

    #[test]
    fn test_help_overlay_drawn_over_dashboard() {
        let mut app = dashboard_app();
        app.show_help = true;

        let content = render_to_string(120, 40, |frame| render(frame, &app));

        assert!(content.contains("Keyboard Shortcuts"));
    }
}
