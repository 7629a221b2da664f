//! Stat card rendering functions

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::models::{total_reps, HistoryRecord};
use crate::theme::{
    AMBER_WARNING, BG_SECONDARY, BORDER_SUBTLE, FUCHSIA, INDIGO, ROUNDED_BORDERS, TEXT_MUTED,
};

fn stat_card<'a>(value: String, label: &'a str, color: Color) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ROUNDED_BORDERS)
        .border_style(Style::default().fg(BORDER_SUBTLE))
        .style(Style::default().bg(BG_SECONDARY));

    let content = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(TEXT_MUTED))),
    ];

    Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center)
}

/// Render streak, workout count and lifetime reps side by side
pub fn render_stat_cards(area: Rect, streak: u32, history: &[HistoryRecord], frame: &mut Frame) {
    let card_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    frame.render_widget(
        stat_card(format!("🔥 {}", streak), "STREAK", AMBER_WARNING),
        card_layout[0],
    );
    frame.render_widget(
        stat_card(history.len().to_string(), "WORKOUTS", INDIGO),
        card_layout[1],
    );
    frame.render_widget(
        stat_card(total_reps(history).to_string(), "TOTAL REPS", FUCHSIA),
        card_layout[2],
    );
}
