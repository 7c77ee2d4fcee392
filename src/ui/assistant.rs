//! Assistant tab
//!
//! Shows the last question and its reply (or the thinking indicator), and the
//! suggested questions that ↑/↓ cycle through while typing.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::colors;
use crate::app::{App, AssistantState};
use crate::assistant::SUGGESTIONS;

pub fn render<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(SUGGESTIONS.len() as u16 + 2),
        ])
        .split(area);

    let conversation = Paragraph::new(build_conversation_lines(app))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::HEADER))
                .title(" 🧠 WeatherLens AI "),
        );
    frame.render_widget(conversation, chunks[0]);

    let suggestions: Vec<Line> = SUGGESTIONS
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled("  • ", Style::default().fg(colors::KEY)),
                Span::styled(*s, Style::default().fg(colors::SECONDARY)),
            ])
        })
        .collect();
    let suggestions = Paragraph::new(suggestions).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::UNKNOWN))
            .title(" Try asking (a, then ↑/↓) "),
    );
    frame.render_widget(suggestions, chunks[1]);
}

fn build_conversation_lines<S>(app: &App<S>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(question) = &app.last_question {
        lines.push(Line::from(vec![
            Span::styled(
                "You: ",
                Style::default()
                    .fg(colors::KEY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(question.clone()),
        ]));
        lines.push(Line::default());
    }

    match &app.assistant {
        AssistantState::Idle => lines.push(Line::from(Span::styled(
            "Ask about clothing, rain, travel, exercise, gardening or events. Press a to start.",
            Style::default().fg(colors::SECONDARY),
        ))),
        AssistantState::Thinking => lines.push(Line::from(Span::styled(
            "🤔 Thinking...",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::ITALIC),
        ))),
        AssistantState::Answered(reply) => lines.push(Line::from(vec![
            Span::styled("🤖 ", Style::default().fg(colors::HEADER)),
            Span::styled(reply.clone(), Style::default().fg(colors::PRIMARY)),
        ])),
        AssistantState::Failed(apology) => lines.push(Line::from(Span::styled(
            apology.clone(),
            Style::default().fg(colors::DANGER),
        ))),
    }

    lines
}
