//! App card grid for the lock and unlock steps

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::helpers::truncate;
use crate::app::GRID_COLUMNS;
use crate::flow::SelectionSet;
use crate::models::{Catalog, CatalogItem, SelectionKind};
use crate::theme::{
    BG_SECONDARY, BG_TERTIARY, BORDER_SUBTLE, FUCHSIA, GREEN_SUCCESS, RED_LOCK, ROUNDED_BORDERS,
    TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY,
};

/// Height of one card: border + name + status + border
const CARD_HEIGHT: u16 = 4;

/// Render a single app card
pub fn render_app_card(
    area: Rect,
    item: &CatalogItem,
    kind: SelectionKind,
    selected: bool,
    focused: bool,
    frame: &mut Frame,
) {
    let accent = match kind {
        SelectionKind::ToLock => RED_LOCK,
        SelectionKind::ToUnlock => GREEN_SUCCESS,
    };
    let border_color = match (focused, selected) {
        (true, _) => FUCHSIA,
        (false, true) => accent,
        (false, false) => BORDER_SUBTLE,
    };
    let bg_color = if focused { BG_TERTIARY } else { BG_SECONDARY };

    let card_block = Block::default()
        .borders(Borders::ALL)
        .border_type(ROUNDED_BORDERS)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(bg_color));

    // Leave room for borders and the icon
    let name_width = (area.width.saturating_sub(4) as usize).saturating_sub(3);
    let name_style = if selected || focused {
        Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY)
    };

    let status = match (selected, kind) {
        (true, SelectionKind::ToLock) => Span::styled("🔒 locked", Style::default().fg(accent)),
        (true, SelectionKind::ToUnlock) => Span::styled("🔓 reward", Style::default().fg(accent)),
        (false, _) => Span::styled("○", Style::default().fg(TEXT_MUTED)),
    };

    let content = vec![
        Line::from(vec![
            Span::raw(format!("{} ", item.icon)),
            Span::styled(truncate(&item.name, name_width), name_style),
        ]),
        Line::from(status),
    ];

    let paragraph = Paragraph::new(content)
        .block(card_block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the catalog as a grid, scrolled so the cursor row is visible
pub fn render_app_grid(
    area: Rect,
    catalog: &Catalog,
    selection: &SelectionSet,
    kind: SelectionKind,
    cursor: usize,
    frame: &mut Frame,
) {
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let cursor_row = cursor / GRID_COLUMNS;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    let rows = catalog.items().chunks(GRID_COLUMNS).skip(first_row);
    for (row, (items, row_area)) in rows.zip(row_areas.iter()).enumerate() {
        let start = (first_row + row) * GRID_COLUMNS;
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);

        for (column, (item, cell)) in items.iter().zip(cells.iter()).enumerate() {
            let index = start + column;
            render_app_card(
                *cell,
                item,
                kind,
                selection.contains(&item.id),
                index == cursor,
                frame,
            );
        }
    }
}

/// One line listing the chosen apps by name
pub fn selection_summary(catalog: &Catalog, selection: &SelectionSet) -> String {
    if selection.is_empty() {
        return "none".to_string();
    }
    selection
        .iter()
        .map(|id| catalog.display_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}
