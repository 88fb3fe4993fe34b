use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::Theme;
use crate::form::{FormField, FormState};

/// Rows used per field: label, input, spacing
const ROWS_PER_FIELD: u16 = 3;

/// Render the create/update form
/// When `focused`, the cursor is placed in the focused text field.
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormState, focused: bool, theme: &Theme) {
    let border_style = if focused {
        theme.panel_border_focused
    } else {
        theme.panel_border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", form.title()), theme.panel_title))
        .padding(ratatui::widgets::Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input_width = inner.width.saturating_sub(1) as usize;
    let mut lines = Vec::new();

    for field in FormField::ALL {
        let is_focused = focused && form.focus == field;
        let label_style = if is_focused {
            theme.panel_title
        } else {
            theme.form_label
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        let value_style = if is_focused {
            theme.form_input.bg(theme.form_input_focused_bg)
        } else {
            theme.form_input
        };

        let value_line = match form.input(field) {
            Some(input) => {
                let placeholder = if field == FormField::Date && input.value().is_empty() {
                    "YYYY-MM-DD"
                } else {
                    ""
                };
                if placeholder.is_empty() {
                    let scroll = input.visual_scroll(input_width);
                    let visible: String = input.value().chars().skip(scroll).collect();
                    let padded = format!("{:<width$}", visible, width = inner.width as usize);
                    Line::from(Span::styled(padded, value_style))
                } else {
                    let padded = format!("{:<width$}", placeholder, width = inner.width as usize);
                    Line::from(Span::styled(padded, value_style.add_modifier(Modifier::DIM)))
                }
            }
            None => Line::from(vec![
                Span::styled("◀ ", theme.form_label),
                Span::styled(form.status.label().to_string(), value_style),
                Span::styled(" ▶", theme.form_label),
            ]),
        };
        lines.push(value_line);
        lines.push(Line::default());
    }

    let submit_style = if form.is_editing() {
        theme.submit_update
    } else {
        theme.submit_create
    };
    lines.push(Line::from(Span::styled(
        format!("  {}  ", form.submit_label()),
        submit_style,
    )));
    lines.push(Line::default());

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.to_string(), theme.form_error)));
    }

    if form.is_editing() {
        lines.push(Line::from(vec![
            Span::styled("Ctrl-x", theme.status_key),
            Span::styled(" cancel edit", theme.status_desc),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    if focused && let Some(input) = form.input(form.focus) {
        let index = FormField::ALL
            .iter()
            .position(|f| *f == form.focus)
            .unwrap_or(0) as u16;
        let scroll = input.visual_scroll(input_width);
        let cursor_x = inner.x + (input.visual_cursor().saturating_sub(scroll)) as u16;
        let cursor_y = inner.y + index * ROWS_PER_FIELD + 1;
        if cursor_y < inner.y + inner.height {
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }
}
