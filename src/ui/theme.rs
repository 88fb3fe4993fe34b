use ratatui::prelude::*;

use crate::view::BadgeTone;

/// Theme errors
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Unknown theme '{name}'. Available themes: {available}")]
    UnknownTheme { name: String, available: String },
}

/// Runtime theme with direct field access for all UI elements
#[derive(Debug, Clone)]
pub struct Theme {
    // === Default Colors ===
    pub default_fg: Color,
    pub default_bg: Color,

    // === Panels ===
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub panel_title: Style,
    pub header_title: Style,
    pub header_endpoint: Style,

    // === Table ===
    pub table_header: Style,
    pub row_text: Style,
    pub row_text_selected: Style,
    pub selection_bg: Color,
    pub item_count: Style,

    // === Badges ===
    pub badge_success: Style,
    pub badge_primary: Style,
    pub badge_danger: Style,
    pub badge_secondary: Style,

    // === Gallery ===
    pub card_border: Style,
    pub card_title: Style,
    pub card_label: Style,
    pub card_value: Style,

    // === Form ===
    pub form_label: Style,
    pub form_input: Style,
    pub form_input_focused_bg: Color,
    pub form_error: Style,
    pub submit_create: Style,
    pub submit_update: Style,

    // === Status Bar / Flash ===
    pub status_key: Style,
    pub status_desc: Style,
    pub status_bar_bg: Color,
    pub flash_info: Style,
    pub flash_warn: Style,
    pub flash_error: Style,

    // === Modals ===
    pub help_modal_bg: Color,
    pub help_title: Style,
    pub help_header: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub help_footer: Style,
    pub error_modal_bg: Color,
    pub error_text: Style,
    pub error_border: Style,
    pub confirm_modal_bg: Color,
    pub confirm_text: Style,
    pub confirm_key: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Palette a built-in theme is derived from
struct Palette {
    text: Color,
    subtext: Color,
    accent: Color,
    highlight: Color,
    success: Color,
    warning: Color,
    danger: Color,
    muted: Color,
    surface: Color,
    mantle: Color,
    base: Color,
    on_badge: Color,
}

impl Theme {
    /// Catppuccin Mocha theme (dark)
    pub fn catppuccin_mocha() -> Self {
        Self::from_palette(Palette {
            text: Color::Rgb(205, 214, 244),
            subtext: Color::Rgb(166, 173, 200),
            accent: Color::Rgb(137, 180, 250),
            highlight: Color::Rgb(245, 194, 231),
            success: Color::Rgb(166, 227, 161),
            warning: Color::Rgb(249, 226, 175),
            danger: Color::Rgb(243, 139, 168),
            muted: Color::Rgb(108, 112, 134),
            surface: Color::Rgb(54, 58, 79),
            mantle: Color::Rgb(24, 24, 37),
            base: Color::Rgb(30, 30, 46),
            on_badge: Color::Rgb(17, 17, 27),
        })
    }

    /// Catppuccin Latte theme (light)
    pub fn catppuccin_latte() -> Self {
        Self::from_palette(Palette {
            text: Color::Rgb(76, 79, 105),
            subtext: Color::Rgb(108, 111, 133),
            accent: Color::Rgb(30, 102, 245),
            highlight: Color::Rgb(234, 118, 203),
            success: Color::Rgb(64, 160, 43),
            warning: Color::Rgb(223, 142, 29),
            danger: Color::Rgb(210, 15, 57),
            muted: Color::Rgb(156, 160, 176),
            surface: Color::Rgb(204, 208, 218),
            mantle: Color::Rgb(230, 233, 239),
            base: Color::Rgb(239, 241, 245),
            on_badge: Color::Rgb(239, 241, 245),
        })
    }

    /// Tokyo Night (dark)
    pub fn tokyonight_night() -> Self {
        Self::from_palette(Palette {
            text: Color::Rgb(192, 202, 245),
            subtext: Color::Rgb(169, 177, 214),
            accent: Color::Rgb(122, 162, 247),
            highlight: Color::Rgb(187, 154, 247),
            success: Color::Rgb(158, 206, 106),
            warning: Color::Rgb(224, 175, 104),
            danger: Color::Rgb(247, 118, 142),
            muted: Color::Rgb(68, 75, 106),
            surface: Color::Rgb(36, 40, 59),
            mantle: Color::Rgb(22, 24, 35),
            base: Color::Rgb(26, 27, 38),
            on_badge: Color::Rgb(22, 22, 30),
        })
    }

    fn from_palette(p: Palette) -> Self {
        let badge = |bg: Color| Style::default().fg(p.on_badge).bg(bg).add_modifier(Modifier::BOLD);

        Theme {
            default_fg: p.text,
            default_bg: p.base,

            panel_border: Style::default().fg(p.muted),
            panel_border_focused: Style::default().fg(p.accent),
            panel_title: Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            header_title: Style::default().fg(p.highlight).add_modifier(Modifier::BOLD),
            header_endpoint: Style::default().fg(p.subtext),

            table_header: Style::default().fg(p.subtext).add_modifier(Modifier::BOLD),
            row_text: Style::default().fg(p.text),
            row_text_selected: Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            selection_bg: p.surface,
            item_count: Style::default().fg(p.subtext).add_modifier(Modifier::DIM),

            badge_success: badge(p.success),
            badge_primary: badge(p.accent),
            badge_danger: badge(p.danger),
            badge_secondary: badge(p.muted),

            card_border: Style::default().fg(p.surface),
            card_title: Style::default().fg(p.text).add_modifier(Modifier::BOLD),
            card_label: Style::default().fg(p.subtext).add_modifier(Modifier::BOLD),
            card_value: Style::default().fg(p.text),

            form_label: Style::default().fg(p.subtext),
            form_input: Style::default().fg(p.text),
            form_input_focused_bg: p.surface,
            form_error: Style::default().fg(p.danger),
            submit_create: Style::default().fg(p.base).bg(p.text).add_modifier(Modifier::BOLD),
            submit_update: Style::default()
                .fg(p.on_badge)
                .bg(p.warning)
                .add_modifier(Modifier::BOLD),

            status_key: Style::default().add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(p.subtext),
            status_bar_bg: p.mantle,
            flash_info: Style::default().fg(p.subtext),
            flash_warn: Style::default().fg(p.warning),
            flash_error: Style::default().fg(p.danger),

            help_modal_bg: p.mantle,
            help_title: Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            help_header: Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(p.warning).add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(p.text),
            help_footer: Style::default().fg(p.subtext),
            error_modal_bg: p.mantle,
            error_text: Style::default().fg(p.text),
            error_border: Style::default().fg(p.danger),
            confirm_modal_bg: p.mantle,
            confirm_text: Style::default().fg(p.text),
            confirm_key: Style::default().fg(p.warning),
        }
    }

    /// Load a built-in theme by name
    pub fn load(name: &str) -> Result<Self, ThemeError> {
        BuiltInTheme::from_name(name)
            .map(|t| t.to_theme())
            .ok_or_else(|| ThemeError::UnknownTheme {
                name: name.to_string(),
                available: BuiltInTheme::all()
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Style for a status badge
    pub fn badge_style(&self, tone: BadgeTone) -> Style {
        match tone {
            BadgeTone::Success => self.badge_success,
            BadgeTone::Primary => self.badge_primary,
            BadgeTone::Danger => self.badge_danger,
            BadgeTone::Secondary => self.badge_secondary,
        }
    }
}

/// Built-in theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInTheme {
    CatppuccinMocha,
    CatppuccinLatte,
    TokyonightNight,
}

impl BuiltInTheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "catppuccin-mocha" => Some(Self::CatppuccinMocha),
            "catppuccin-latte" => Some(Self::CatppuccinLatte),
            "tokyonight-night" => Some(Self::TokyonightNight),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CatppuccinMocha => "catppuccin-mocha",
            Self::CatppuccinLatte => "catppuccin-latte",
            Self::TokyonightNight => "tokyonight-night",
        }
    }

    pub fn all() -> &'static [BuiltInTheme] {
        &[
            Self::CatppuccinMocha,
            Self::CatppuccinLatte,
            Self::TokyonightNight,
        ]
    }

    pub fn to_theme(&self) -> Theme {
        match self {
            Self::CatppuccinMocha => Theme::catppuccin_mocha(),
            Self::CatppuccinLatte => Theme::catppuccin_latte(),
            Self::TokyonightNight => Theme::tokyonight_night(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_themes() {
        for builtin in BuiltInTheme::all() {
            assert!(Theme::load(builtin.name()).is_ok());
        }
        assert!(Theme::load("Catppuccin-Latte").is_ok());
    }

    #[test]
    fn test_unknown_theme_lists_available() {
        let err = Theme::load("solarized").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("solarized"));
        assert!(msg.contains("catppuccin-mocha"));
    }

    #[test]
    fn test_badge_styles_differ_by_tone() {
        let theme = Theme::default();
        assert_ne!(
            theme.badge_style(BadgeTone::Success),
            theme.badge_style(BadgeTone::Danger)
        );
        assert_eq!(theme.badge_style(BadgeTone::Secondary), theme.badge_secondary);
    }
}
