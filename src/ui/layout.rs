use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the form panel
const FORM_WIDTH: u16 = 44;

/// Screen areas of the main view
#[derive(Debug, Clone, Copy)]
pub struct MainLayout {
    pub header: Rect,
    pub form: Rect,
    pub table: Rect,
    pub gallery: Rect,
    pub flash: Rect,
    pub hints: Rect,
}

/// Create main layout: header, form (left), table over gallery (right), flash line, hints bar
/// `gallery_height` is clamped so the table always keeps some rows.
pub fn create_main_layout(area: Rect, gallery_height: u16) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(8),    // Content
            Constraint::Length(1), // Flash messages
            Constraint::Length(1), // Keyboard hints
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(FORM_WIDTH), // Form
            Constraint::Length(1),          // Gap
            Constraint::Min(20),            // Table + gallery
        ])
        .split(rows[1]);

    let right = columns[2];
    let gallery_height = gallery_height.min(right.height.saturating_sub(6));

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),                 // Table
            Constraint::Length(gallery_height), // Gallery
        ])
        .split(right);

    MainLayout {
        header: rows[0],
        form: columns[0],
        table: right_chunks[0],
        gallery: right_chunks[1],
        flash: rows[2],
        hints: rows[3],
    }
}

/// Create centered rectangle for popups/overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
