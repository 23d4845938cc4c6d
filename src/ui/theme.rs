use ratatui::style::Color;

/// Unified color theme for the application chrome
pub struct Theme;

impl Theme {
    /// Primary branding color
    pub fn primary() -> Color {
        Color::Magenta
    }

    /// Secondary/border color
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Keys and confirmations
    pub fn highlight() -> Color {
        Color::Cyan
    }

    /// Dimmed/inactive text
    pub fn dim() -> Color {
        Color::DarkGray
    }

    /// Normal text
    pub fn text() -> Color {
        Color::White
    }

    /// Titles and status messages
    pub fn accent() -> Color {
        Color::LightBlue
    }
}
