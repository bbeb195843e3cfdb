//! Colors for the terminal charts

use ratatui::prelude::*;

use super::ChartColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Complete color palette for the terminal charts
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Styles
    pub title_style: Style,
    pub bar_text_style: Style,
    pub label_style: Style,

    // General colors
    pub muted: Color,
    pub border: Color,
    pub map_outline: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
}

impl ThemeColors {
    /// Dark theme palette
    pub fn dark() -> Self {
        Self {
            title_style: Style::new().fg(Color::Cyan).bold(),
            bar_text_style: Style::new().fg(Color::White).bold(),
            label_style: Style::new().fg(Color::White),
            muted: Color::Gray,
            border: Color::Indexed(238),
            map_outline: Color::Indexed(240),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
        }
    }

    /// Light theme palette
    pub fn light() -> Self {
        Self {
            title_style: Style::new().fg(Color::Blue).bold(),
            bar_text_style: Style::new().fg(Color::Black).bold(),
            label_style: Style::new().fg(Color::Black),
            muted: Color::DarkGray,
            border: Color::Indexed(250),
            map_outline: Color::Indexed(248),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn chart_color(&self, color: ChartColor) -> Color {
        match color {
            ChartColor::Blue => Color::Blue,
            ChartColor::Gray => self.muted,
            ChartColor::Green => Color::Green,
            ChartColor::Orange => Color::Rgb(255, 127, 14),
            ChartColor::Red => Color::Red,
            ChartColor::Purple => Color::Magenta,
        }
    }
}

/// Pick a theme from the terminal background. Falls back to dark when the
/// terminal does not answer the query.
pub fn resolve_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => Theme::Light,
        Ok(_) => Theme::Dark,
        Err(e) => {
            tracing::debug!("could not detect terminal background: {}", e);
            Theme::Dark
        }
    }
}
