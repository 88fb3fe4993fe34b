use log::Level;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;
use crate::app::AppMode;
use crate::logging::FlashMessage;

const BROWSE_HINTS: &[(&[&str], &str)] = &[
    (&["j", "k"], "move"),
    (&["e"], "edit"),
    (&["d"], "delete"),
    (&["n"], "new"),
    (&["Tab"], "form"),
    (&["r"], "refresh"),
    (&["q"], "quit"),
    (&["?"], "help"),
];

const FORM_HINTS: &[(&[&str], &str)] = &[
    (&["Tab", "S-Tab"], "field"),
    (&["←", "→"], "status"),
    (&["Enter"], "submit"),
    (&["Ctrl-x"], "cancel edit"),
    (&["Esc"], "table"),
];

const CONFIRM_HINTS: &[(&[&str], &str)] = &[(&["y"], "delete"), (&["n", "Esc"], "keep")];

const HELP_HINTS: &[(&[&str], &str)] = &[(&["Esc"], "press any key to close help")];

/// Render keyboard hints bar showing mode-specific shortcuts
pub fn render_keyboard_hints(frame: &mut Frame, area: Rect, mode: &AppMode, theme: &Theme) {
    let hint_data = match mode {
        AppMode::Browse => BROWSE_HINTS,
        AppMode::Form => FORM_HINTS,
        AppMode::ConfirmDelete(_) => CONFIRM_HINTS,
        AppMode::Help => HELP_HINTS,
    };

    let mut hints = Vec::new();

    for (keys, description) in hint_data {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                hints.push(Span::styled("/", theme.status_desc.add_modifier(Modifier::DIM)));
            }
            hints.push(Span::styled(*key, theme.status_key));
        }

        hints.push(Span::raw(" "));
        hints.push(Span::styled(*description, theme.status_desc));
        hints.push(Span::raw("  "));
    }

    let paragraph =
        Paragraph::new(Line::from(hints)).style(theme.status_desc.bg(theme.status_bar_bg));

    frame.render_widget(paragraph, area);
}

/// Render the most recent flash message (if any) on a single line
pub fn render_flash_line(frame: &mut Frame, area: Rect, messages: &[FlashMessage], theme: &Theme) {
    let Some(latest) = messages.last() else {
        return;
    };

    let style = match latest.level {
        Level::Error => theme.flash_error,
        Level::Warn => theme.flash_warn,
        _ => theme.flash_info,
    };

    let mut spans = vec![Span::styled(latest.message.clone(), style)];
    if messages.len() > 1 {
        spans.push(Span::styled(
            format!("  (+{} more, c to clear)", messages.len() - 1),
            theme.item_count,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
