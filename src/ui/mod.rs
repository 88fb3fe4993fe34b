pub mod error_modal;
pub mod form_panel;
pub mod gallery;
pub mod help;
pub mod layout;
pub mod registration_table;
pub mod status;
pub mod theme;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

pub use error_modal::render_error_modal;
pub use form_panel::render_form;
pub use gallery::{gallery_height, render_gallery};
pub use help::render_help_overlay;
pub use layout::{MainLayout, centered_rect, create_main_layout};
pub use registration_table::{TableRenderContext, render_registration_table};
pub use status::{render_flash_line, render_keyboard_hints};
pub use theme::{BuiltInTheme, Theme, ThemeError};

/// Render the one-line header: application title and endpoint
pub fn render_header(frame: &mut Frame, area: Rect, endpoint: &str, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" Event Registrations ", theme.header_title),
        Span::styled(format!(" {}", endpoint), theme.header_endpoint),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render delete confirmation overlay for the named registration
pub fn render_confirm_overlay(frame: &mut Frame, area: Rect, event_name: &str, theme: &Theme) {
    let overlay_area = centered_rect(50, 25, area);

    frame.render_widget(Clear, overlay_area);

    let message = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to delete this registration?",
            theme.confirm_text.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(event_name.to_string(), theme.help_footer)),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme.confirm_key.add_modifier(Modifier::BOLD)),
            Span::styled(" - Yes, delete  ", theme.confirm_text),
            Span::styled("n", theme.confirm_key.add_modifier(Modifier::BOLD)),
            Span::styled(" - No, keep it", theme.confirm_text),
        ]),
    ];

    let paragraph = Paragraph::new(message)
        .block(
            Block::default()
                .style(Style::default().bg(theme.confirm_modal_bg))
                .padding(ratatui::widgets::Padding::uniform(1)),
        )
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });

    frame.render_widget(paragraph, overlay_area);
}
