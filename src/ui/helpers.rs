use ratatui::style::{Modifier, Style};

use crate::color::Color;

pub fn to_tui_color(color: Color) -> ratatui::style::Color {
    ratatui::style::Color::Rgb(color.r, color.g, color.b)
}

/// The color as background with its readable label color on top.
pub fn swatch_style(color: Color) -> Style {
    Style::default()
        .bg(to_tui_color(color))
        .fg(to_tui_color(color.contrast_label()))
}

pub fn swatch_label_style(color: Color) -> Style {
    swatch_style(color).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_uses_contrast_label() {
        let style = swatch_style(Color::new(0xFF, 0xFF, 0xFF));
        assert_eq!(style.bg, Some(ratatui::style::Color::Rgb(255, 255, 255)));
        assert_eq!(style.fg, Some(ratatui::style::Color::Rgb(0, 0, 0)));

        let style = swatch_style(Color::new(0x10, 0x20, 0x30));
        assert_eq!(style.fg, Some(ratatui::style::Color::Rgb(255, 255, 255)));
    }
}
