use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::Theme;
use super::layout::centered_rect;

struct HelpSection {
    title: &'static str,
    items: &'static [(&'static [&'static str], &'static str)],
}

const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Registrations",
        items: &[
            (&["k", "↑", "j", "↓"], "Move up/down"),
            (&["Home", "End"], "Jump to first/last"),
            (&["e", "Enter"], "Edit selected registration"),
            (&["d"], "Delete selected (asks first)"),
            (&["r"], "Reload from server"),
        ],
    },
    HelpSection {
        title: "Form",
        items: &[
            (&["n", "a", "Tab"], "Focus the form"),
            (&["Tab", "S-Tab"], "Next/previous field"),
            (&["←", "→", "Space"], "Change status"),
            (&["Enter", "Ctrl-s"], "Add or update registration"),
            (&["Ctrl-x"], "Cancel edit, back to a new registration"),
            (&["Esc"], "Back to the table (form is kept)"),
        ],
    },
    HelpSection {
        title: "General",
        items: &[
            (&["c"], "Clear flash messages"),
            (&["?"], "Show/hide this help"),
            (&["q", "Esc"], "Quit"),
        ],
    },
];

/// Add help content with proper styling and fixed-width columns
fn add_help_content<'a>(content: &mut Vec<Line<'a>>, section: &HelpSection, theme: &Theme) {
    const KEY_COLUMN_WIDTH: usize = 20; // Fixed width for keys column

    content.push(Line::from(Span::styled(section.title, theme.help_header)));
    content.push(Line::default());

    for (keys, description) in section.items {
        let mut line_spans = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                line_spans.push(Span::styled("/", theme.help_desc.add_modifier(Modifier::DIM)));
            }
            line_spans.push(Span::styled(*key, theme.help_key));
        }

        // Pad keys to a fixed column so descriptions line up
        let keys_str = keys.join("/");
        let padding = KEY_COLUMN_WIDTH.saturating_sub(keys_str.width());

        line_spans.push(Span::raw(" ".repeat(padding)));
        line_spans.push(Span::styled(*description, theme.help_desc));

        content.push(Line::from(line_spans));
    }

    content.push(Line::default());
}

/// Render help overlay with keybindings
pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay_area = centered_rect(60, 80, area);

    // Hide underlying content
    frame.render_widget(Clear, overlay_area);

    let mut content = vec![
        Line::from(Span::styled("Help", theme.help_title)),
        Line::default(),
    ];

    for section in HELP_SECTIONS {
        add_help_content(&mut content, section, theme);
    }

    content.push(Line::from(Span::styled(
        "Press any key to close",
        theme.help_footer,
    )));

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .style(Style::default().bg(theme.help_modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);
}
