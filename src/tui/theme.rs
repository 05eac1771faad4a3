//! Color palettes for the TUI, picked from the terminal background

use ratatui::prelude::*;

use crate::scoring::{cell_indicator, Indicator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Detect the terminal background; falls back to dark when the terminal
/// does not answer the luma query.
pub fn resolve_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => Theme::Light,
        Ok(_) => Theme::Dark,
        Err(e) => {
            crate::verbose!("Could not detect terminal background ({}), using dark theme", e);
            Theme::Dark
        }
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Indicator colors
    pub excellent: Color,
    pub good: Color,
    pub warning: Color,
    pub poor: Color,

    // Table
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub column_focus: Style,
    pub row_selected: Style,

    // General
    pub muted: Color,
    pub title_color: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_key: Style,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            excellent: Color::Green,
            good: Color::Cyan,
            warning: Color::Yellow,
            poor: Color::Red,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            column_focus: Style::new().fg(Color::Cyan).bold().underlined(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_key: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            excellent: Color::Rgb(0, 128, 0),
            good: Color::Blue,
            warning: Color::Rgb(180, 110, 0),
            poor: Color::Rgb(190, 0, 0),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            column_focus: Style::new().fg(Color::Blue).bold().underlined(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(190, 0, 0),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_key: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a 0-100 score by its indicator bucket
    pub fn score_color(&self, score: f64) -> Color {
        match cell_indicator(score) {
            Indicator::Excellent => self.excellent,
            Indicator::Good => self.good,
            Indicator::Warning => self.warning,
            Indicator::Poor => self.poor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_follows_indicator() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.score_color(92.0), Color::Green);
        assert_eq!(theme.score_color(50.0), Color::Cyan);
        assert_eq!(theme.score_color(40.0), Color::Yellow);
        assert_eq!(theme.score_color(0.0), Color::Red);
    }

    #[test]
    fn test_for_theme() {
        assert_eq!(ThemeColors::for_theme(Theme::Light).title_color, Color::Blue);
        assert_eq!(ThemeColors::for_theme(Theme::Dark).title_color, Color::Cyan);
    }
}
