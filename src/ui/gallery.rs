use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::Theme;
use super::registration_table::badge_span;
use crate::view::{CardView, gallery_columns};

/// Card height including borders: title, category, date, badge
pub const CARD_HEIGHT: u16 = 6;

/// Height the gallery needs for `card_count` cards at `width`
pub fn gallery_height(card_count: usize, width: u16) -> u16 {
    // Outer border plus at least one line for the empty message
    if card_count == 0 {
        return 3;
    }
    let columns = gallery_columns(width.saturating_sub(2));
    let grid_rows = card_count.div_ceil(columns) as u16;
    grid_rows * CARD_HEIGHT + 2
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.card_border)
        .padding(ratatui::widgets::Padding::horizontal(1));

    let lines = vec![
        Line::from(Span::styled(card.event_name.clone(), theme.card_title)),
        Line::from(vec![
            Span::styled("Category: ", theme.card_label),
            Span::styled(card.category.clone(), theme.card_value),
        ]),
        Line::from(vec![
            Span::styled("Date: ", theme.card_label),
            Span::styled(card.date.clone(), theme.card_value),
        ]),
        Line::from(badge_span(&card.badge, theme)),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the gallery of recent registrations as a responsive card grid
pub fn render_gallery(frame: &mut Frame, area: Rect, cards: &[CardView], theme: &Theme) {
    if area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(Span::styled(" Recent Registrations ", theme.panel_title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if cards.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("Nothing to show yet", theme.item_count))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let columns = gallery_columns(inner.width);
    let grid_rows = cards.len().div_ceil(columns);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); grid_rows])
        .split(inner);

    for (row_index, row_cards) in cards.chunks(columns).enumerate() {
        let Some(row_area) = row_areas.get(row_index) else {
            break;
        };
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (card, cell) in row_cards.iter().zip(cell_areas.iter()) {
            render_card(frame, *cell, card, theme);
        }
    }
}
