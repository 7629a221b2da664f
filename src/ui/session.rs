//! Goal, workout and success views

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::apps::selection_summary;
use super::stats::render_stat_cards;
use crate::app::App;
use crate::flow::Goal;
use crate::models::{PermissionStatus, SelectionKind};
use crate::store::KeyValueStore;
use crate::theme::{
    get_pulse_color, AMBER_WARNING, BG_PRIMARY, BG_SECONDARY, BORDER_SUBTLE, FUCHSIA,
    GREEN_SUCCESS, INDIGO, RED_LOCK, ROUNDED_BORDERS, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY,
    VIOLET,
};
use crate::utils::{format_duration, plural};

/// Number of past workouts listed on the success screen
const RECENT_WORKOUTS: usize = 5;

fn card(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(ROUNDED_BORDERS)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(BG_SECONDARY))
}

pub fn render_goal<S: KeyValueStore>(area: Rect, app: &App<S>, frame: &mut Frame) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Goal picker
            Constraint::Length(3), // Range bar
            Constraint::Length(4), // Summary
            Constraint::Length(4), // Stats
            Constraint::Min(0),    // Camera notice
        ])
        .split(area);

    let goal = app.flow.goal().value();
    let arrow = |enabled: bool| {
        if enabled {
            Style::default().fg(FUCHSIA).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MUTED)
        }
    };
    let picker = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("◀ −   ", arrow(goal > Goal::MIN)),
            Span::styled(
                goal.to_string(),
                Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   + ▶", arrow(goal < Goal::MAX)),
        ]),
        Line::from(Span::styled("pushups", Style::default().fg(TEXT_SECONDARY))),
        Line::from(Span::styled(
            format!("{}-{} in steps of {}", Goal::MIN, Goal::MAX, Goal::STEP),
            Style::default().fg(TEXT_MUTED),
        )),
    ])
    .block(card("Goal", VIOLET))
    .alignment(Alignment::Center);
    frame.render_widget(picker, layout[0]);

    let range = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(ROUNDED_BORDERS)
                .border_style(Style::default().fg(BORDER_SUBTLE)),
        )
        .gauge_style(Style::default().fg(VIOLET).bg(BG_PRIMARY))
        .ratio(app.flow.goal().ratio())
        .label(format!("{} / {}", goal, Goal::MAX));
    frame.render_widget(range, layout[1]);

    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("🔒 {}: ", SelectionKind::ToLock.label()),
                Style::default().fg(RED_LOCK),
            ),
            Span::styled(
                selection_summary(&app.catalog, app.flow.selection(SelectionKind::ToLock)),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("🔓 {}: ", SelectionKind::ToUnlock.label()),
                Style::default().fg(GREEN_SUCCESS),
            ),
            Span::styled(
                selection_summary(&app.catalog, app.flow.selection(SelectionKind::ToUnlock)),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
    ])
    .block(card("Summary", BORDER_SUBTLE));
    frame.render_widget(summary, layout[2]);

    render_stat_cards(layout[3], app.streak, &app.history, frame);

    if app.permission == PermissionStatus::Denied {
        render_camera_blocked(layout[4], frame);
    }
}

/// Shown under the goal picker while the camera is unavailable
fn render_camera_blocked(area: Rect, frame: &mut Frame) {
    let notice = Paragraph::new(vec![
        Line::from(Span::styled(
            "📷 No access to camera",
            Style::default().fg(RED_LOCK).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Grant camera access and restart to begin the workout",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ])
    .block(card("Camera", RED_LOCK))
    .alignment(Alignment::Center);
    frame.render_widget(notice, area.intersection(Rect { height: 4, ..area }));
}

pub fn render_workout<S: KeyValueStore>(
    area: Rect,
    app: &App<S>,
    now: Instant,
    frame: &mut Frame,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(7),    // Camera panel
            Constraint::Length(3), // Progress bar
            Constraint::Length(3), // Feedback
        ])
        .split(area);

    // Camera panel with a pulsing live indicator
    let live_color = get_pulse_color(app.animation_tick, RED_LOCK, BG_SECONDARY);
    let source = match app.capture.detector_name() {
        Some(name) => format!("detector: {}", name),
        None => "manual counting".to_string(),
    };
    let progress = app.flow.progress();
    let goal = app.flow.goal().value();
    let camera = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(live_color)),
            Span::styled("LIVE", Style::default().fg(RED_LOCK).add_modifier(Modifier::BOLD)),
            Span::styled(format!("   {}", source), Style::default().fg(TEXT_MUTED)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}", progress, goal),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("pushups", Style::default().fg(TEXT_SECONDARY))),
        Line::from(Span::styled(
            format!("⏱ {}", format_duration(app.elapsed(now))),
            Style::default().fg(TEXT_MUTED),
        )),
    ])
    .block(card("Camera", INDIGO))
    .alignment(Alignment::Center);
    frame.render_widget(camera, layout[0]);

    let bar = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(ROUNDED_BORDERS)
                .border_style(Style::default().fg(BORDER_SUBTLE)),
        )
        .gauge_style(Style::default().fg(FUCHSIA).bg(BG_PRIMARY))
        .ratio(app.flow.progress_ratio())
        .label(format!("{}%", (app.flow.progress_ratio() * 100.0).round() as u32));
    frame.render_widget(bar, layout[1]);

    let feedback = match app.flow.feedback() {
        Some(message) => Span::styled(
            message.to_string(),
            Style::default().fg(GREEN_SUCCESS).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            format!("{} to go", plural(u64::from(goal.saturating_sub(progress)), "rep")),
            Style::default().fg(TEXT_MUTED),
        ),
    };
    frame.render_widget(
        Paragraph::new(Line::from(feedback))
            .block(card("Feedback", BORDER_SUBTLE))
            .alignment(Alignment::Center),
        layout[2],
    );
}

pub fn render_success<S: KeyValueStore>(
    area: Rect,
    app: &App<S>,
    now: Instant,
    frame: &mut Frame,
) {
    let recent = app.history.len().min(RECENT_WORKOUTS) as u16;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),          // Celebration
            Constraint::Length(4),          // Stats
            Constraint::Length(recent + 2), // Recent workouts
            Constraint::Min(0),
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            "🎉 Great job!",
            Style::default().fg(GREEN_SUCCESS).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} in {}",
                plural(u64::from(app.flow.progress()), "pushup"),
                format_duration(app.elapsed(now))
            ),
            Style::default().fg(TEXT_PRIMARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("🔓 Unlocked: ", Style::default().fg(GREEN_SUCCESS)),
            Span::styled(
                selection_summary(&app.catalog, app.flow.selection(SelectionKind::ToUnlock)),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
    ];
    if app.unsaved.is_some() {
        lines.push(Line::from(Span::styled(
            "⚠ Not saved. Press s to retry.",
            Style::default().fg(AMBER_WARNING),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .block(card("Workout Complete", GREEN_SUCCESS))
            .alignment(Alignment::Center),
        layout[0],
    );

    render_stat_cards(layout[1], app.streak, &app.history, frame);

    let rows: Vec<Line> = app
        .history
        .iter()
        .rev()
        .take(RECENT_WORKOUTS)
        .map(|record| {
            Line::from(vec![
                Span::styled(format!("{}  ", record.date), Style::default().fg(TEXT_MUTED)),
                Span::styled(
                    format!("{:>3} reps  ", record.reps),
                    Style::default().fg(TEXT_PRIMARY),
                ),
                Span::styled(
                    plural(record.apps_unlocked.len() as u64, "app"),
                    Style::default().fg(TEXT_SECONDARY),
                ),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(rows).block(card("Recent", BORDER_SUBTLE)),
        layout[2],
    );
}
