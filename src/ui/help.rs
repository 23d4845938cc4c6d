use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Colors"));
    lines.extend(section_lines(&[
        "space/n: Generate a new color",
        "Up/Down (k/j): Browse history and preview",
        "Enter: Preview highlighted color",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("History"));
    lines.extend(section_lines(&[
        "d/Delete: Delete highlighted color",
        "c: Clear all colors",
        "s: Save now",
        "r: Reload from disk",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Global"));
    lines.extend(section_lines(&["?: Toggle help", "q/esc: Quit"]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
