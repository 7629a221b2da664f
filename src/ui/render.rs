//! Top-level screen layout: header, active view, footer and alert overlay

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::apps::render_app_grid;
use super::helpers::{centered_rect, wrap_text};
use super::session::{render_goal, render_success, render_workout};
use crate::app::{Alert, App};
use crate::models::{FlowState, PermissionStatus};
use crate::store::KeyValueStore;
use crate::theme::{
    get_pulse_color, AMBER_WARNING, BG_PRIMARY, BG_SECONDARY, BORDER_SUBTLE, FUCHSIA, INDIGO,
    RED_LOCK, ROUNDED_BORDERS, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY, VIOLET,
};

/// Draw the whole screen
pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, now: Instant) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BG_PRIMARY)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Step title
            Constraint::Min(8),    // Active view
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_header(layout[0], app, frame);

    if app.permission == PermissionStatus::Pending {
        render_waiting(layout[2], app.animation_tick, frame);
    } else {
        render_step_title(layout[1], app, frame);
        match app.flow.state() {
            FlowState::Lock | FlowState::Unlock => {
                if let Some(kind) = app.flow.active_selection() {
                    render_app_grid(
                        layout[2],
                        &app.catalog,
                        app.flow.selection(kind),
                        kind,
                        app.cursor,
                        frame,
                    );
                }
            }
            FlowState::Goal => render_goal(layout[2], app, frame),
            FlowState::Workout => render_workout(layout[2], app, now, frame),
            FlowState::Success => render_success(layout[2], app, now, frame),
        }
    }

    render_footer(layout[3], app, frame);

    if let Some(alert) = &app.alert {
        render_alert(area, alert, frame);
    }
}

fn render_header<S: KeyValueStore>(area: Rect, app: &App<S>, frame: &mut Frame) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(ROUNDED_BORDERS)
        .border_style(Style::default().fg(BORDER_SUBTLE))
        .style(Style::default().bg(BG_SECONDARY));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(36)])
        .split(inner);

    let mut title = vec![
        Span::styled("💪 ", Style::default().fg(FUCHSIA)),
        Span::styled(
            "FitLock",
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(step) = app.flow.state().step_number() {
        title.push(Span::styled(
            format!("  step {} of 3", step),
            Style::default().fg(TEXT_MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), columns[0]);

    let mut badges = Vec::new();
    if app.permission == PermissionStatus::Denied {
        badges.push(Span::styled(
            "📷 camera blocked  ",
            Style::default().fg(RED_LOCK).add_modifier(Modifier::BOLD),
        ));
    }
    badges.push(Span::styled(
        format!("🔥 {} day streak", app.streak),
        Style::default().fg(AMBER_WARNING).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(badges)).alignment(Alignment::Right),
        columns[1],
    );
}

fn render_step_title<S: KeyValueStore>(area: Rect, app: &App<S>, frame: &mut Frame) {
    let state = app.flow.state();
    let mut subtitle = vec![Span::styled(
        state.subtitle(),
        Style::default().fg(TEXT_SECONDARY),
    )];
    if let Some(kind) = app.flow.active_selection() {
        subtitle.push(Span::styled(
            format!("  ({} selected)", app.flow.selection(kind).len()),
            Style::default().fg(TEXT_MUTED),
        ));
    }
    let lines = vec![
        Line::from(Span::styled(
            state.title(),
            Style::default().fg(VIOLET).add_modifier(Modifier::BOLD),
        )),
        Line::from(subtitle),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_waiting(area: Rect, tick: u64, frame: &mut Frame) {
    let dot = get_pulse_color(tick, INDIGO, BG_PRIMARY);
    let lines = vec![
        Line::from(Span::styled("●", Style::default().fg(dot))),
        Line::from(Span::styled(
            "Requesting camera permission...",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];
    let target = centered_rect(area.width, 2, area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

/// Key hints for the current state
pub fn footer_hints<S: KeyValueStore>(app: &App<S>) -> &'static str {
    if app.alert.is_some() {
        return " Enter: Dismiss | q: Quit ";
    }
    if app.permission == PermissionStatus::Pending {
        return " q: Quit ";
    }
    match app.flow.state() {
        FlowState::Lock => " ←↑↓→: Move | Space: Toggle | n: Next | q: Quit ",
        FlowState::Unlock => " ←↑↓→: Move | Space: Toggle | n: Next | b: Back | q: Quit ",
        FlowState::Goal => " +/-: Goal | Enter: Start Workout | b: Back | q: Quit ",
        FlowState::Workout => " Space: Count Rep | r: Reset | q: Quit ",
        FlowState::Success if app.unsaved.is_some() => {
            " s: Retry Save | Enter: New Session | q: Quit "
        }
        FlowState::Success => " Enter: New Session | q: Quit ",
    }
}

fn render_footer<S: KeyValueStore>(area: Rect, app: &App<S>, frame: &mut Frame) {
    let mut hints = footer_hints(app).to_string();
    if matches!(app.flow.state(), FlowState::Lock | FlowState::Unlock) && !app.flow.can_advance() {
        hints.push_str("(pick at least one app) ");
    }
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(BG_PRIMARY).bg(INDIGO)),
        area,
    );
}

fn render_alert(area: Rect, alert: &Alert, frame: &mut Frame) {
    let width = area.width.min(50);
    let text_width = width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = wrap_text(&alert.message, text_width)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(TEXT_PRIMARY))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to dismiss",
        Style::default().fg(TEXT_MUTED),
    )));

    let popup = centered_rect(width, lines.len() as u16 + 2, area);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", alert.title),
            Style::default().fg(RED_LOCK).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(ROUNDED_BORDERS)
        .border_style(Style::default().fg(RED_LOCK))
        .style(Style::default().bg(BG_SECONDARY));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureService;
    use crate::flow::{FlowController, SessionRecorder};
    use crate::models::Catalog;
    use crate::signals::RecordingSignals;
    use crate::store::MemoryStore;
    use ratatui::backend::TestBackend;

    fn test_app() -> App<MemoryStore> {
        App::new(
            FlowController::default(),
            Catalog::default(),
            SessionRecorder::new(MemoryStore::new()),
            CaptureService::new(None),
            Box::new(RecordingSignals::default()),
        )
    }

    fn screen_text(app: &App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let now = Instant::now();
        terminal.draw(|frame| draw(frame, app, now)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_waiting_view_while_permission_pending() {
        let app = test_app();
        let text = screen_text(&app);
        assert!(text.contains("Requesting camera permission"));
        assert!(!text.contains("Instagram"));
        assert_eq!(footer_hints(&app), " q: Quit ");
    }

    #[test]
    fn test_lock_step_shows_catalog() {
        let mut app = test_app();
        app.set_permission(PermissionStatus::Granted);
        let text = screen_text(&app);
        assert!(text.contains("Step 1: Apps to Lock"));
        assert!(text.contains("Instagram"));
        assert!(text.contains("pick at least one app"));
    }

    #[test]
    fn test_denied_banner_and_alert() {
        let mut app = test_app();
        app.set_permission(PermissionStatus::Denied);
        app.alert = Some(Alert::new("Camera Permission", "Please grant camera permission"));
        let text = screen_text(&app);
        assert!(text.contains("camera blocked"));
        assert!(text.contains("Camera Permission"));
        assert_eq!(footer_hints(&app), " Enter: Dismiss | q: Quit ");
    }

    #[test]
    fn test_step_title_counts_selection() {
        let mut app = test_app();
        app.set_permission(PermissionStatus::Granted);
        assert!(screen_text(&app).contains("(0 selected)"));
        app.flow.toggle("reddit");
        app.flow.toggle("netflix");
        assert!(screen_text(&app).contains("(2 selected)"));
    }

    #[test]
    fn test_goal_view_shows_blocked_camera() {
        let mut app = test_app();
        app.flow.toggle("instagram");
        app.flow.advance().unwrap();
        app.flow.toggle("tiktok");
        app.flow.advance().unwrap();

        app.set_permission(PermissionStatus::Granted);
        let text = screen_text(&app);
        assert!(text.contains("Locking: Instagram"));
        assert!(text.contains("Unlocking: TikTok"));
        assert!(!text.contains("No access to camera"));

        app.set_permission(PermissionStatus::Denied);
        assert!(screen_text(&app).contains("No access to camera"));
    }
}
