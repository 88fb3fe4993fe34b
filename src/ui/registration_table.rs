use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use super::Theme;
use crate::view::{Badge, RowView};

/// Badge as a padded, coloured span
pub fn badge_span<'a>(badge: &Badge, theme: &Theme) -> Span<'a> {
    Span::styled(format!(" {} ", badge.label), theme.badge_style(badge.tone))
}

/// Table rows: event, category, date, status badge, actions
fn render_table_rows<'a>(rows: &[RowView], selected: usize, theme: &'a Theme) -> Vec<Row<'a>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let is_selected = i == selected;
            let text_style = if is_selected {
                theme.row_text_selected
            } else {
                theme.row_text
            };

            // Actions are only live on the selected row
            let actions_style = if is_selected {
                theme.status_key
            } else {
                theme.item_count
            };
            let actions = Line::from(vec![
                Span::styled("e", actions_style),
                Span::styled(" Edit  ", theme.status_desc),
                Span::styled("d", actions_style),
                Span::styled(" Delete", theme.status_desc),
            ]);

            let cells = vec![
                Cell::from(Span::styled(row.event_name.clone(), text_style)),
                Cell::from(Span::styled(row.category.clone(), text_style)),
                Cell::from(Span::styled(row.date.clone(), text_style)),
                Cell::from(badge_span(&row.badge, theme)),
                Cell::from(actions),
            ];

            let row = Row::new(cells);
            if is_selected {
                row.style(Style::default().bg(theme.selection_bg))
            } else {
                row
            }
        })
        .collect()
}

/// Context for rendering the registrations table
pub struct TableRenderContext<'a> {
    pub selected: usize,
    pub focused: bool,
    pub loading: bool,
    pub theme: &'a Theme,
}

/// Render the full registrations table with a title and item count
pub fn render_registration_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[RowView],
    ctx: TableRenderContext,
) {
    let border_style = if ctx.focused {
        ctx.theme.panel_border_focused
    } else {
        ctx.theme.panel_border
    };

    let count_text = if ctx.loading {
        format!("{} items · loading…", rows.len())
    } else {
        format!("{} items", rows.len())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Registrations ", ctx.theme.panel_title))
        .title_bottom(Line::from(Span::styled(count_text, ctx.theme.item_count)).right_aligned());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if rows.is_empty() {
        let msg = Paragraph::new(Span::styled("No registrations found", ctx.theme.item_count))
            .alignment(Alignment::Center);
        let middle = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(msg, middle[1]);
        return;
    }

    let header = Row::new(vec!["Event Name", "Category", "Date", "Status", "Actions"])
        .style(ctx.theme.table_header)
        .bottom_margin(1);

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(18),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(16),
    ];

    let table = Table::new(render_table_rows(rows, ctx.selected, ctx.theme), widths)
        .header(header)
        .column_spacing(2);

    let mut table_state = TableState::default();
    table_state.select(Some(ctx.selected));

    frame.render_stateful_widget(table, inner, &mut table_state);
}
