mod help;
mod helpers;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, ConfirmPopup};
use help::build_help_text;
use helpers::{swatch_label_style, swatch_style};
use theme::Theme;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(frame.area());
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(columns[0]);

    render_header(frame, left[0]);
    render_history(frame, app, left[1]);
    render_footer(frame, app, left[2]);
    render_swatch(frame, app, columns[1]);

    if app.show_help {
        render_help_popup(frame);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
}

fn chrome_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::secondary()))
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "  Swatchr  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "random colors",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Left)
    .block(chrome_block());
    frame.render_widget(header, area);
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.store.history();
    let block = chrome_block().title(format!(" History ({}) ", history.len()));

    if history.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No colors yet. Press space to generate one.",
            Style::default().fg(Theme::dim()),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = history
        .iter()
        .map(|color| ListItem::new(Line::from(format!(" {color}"))).style(swatch_style(*color)))
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    // The list scrolls to keep the selection, and so the newest color, visible.
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let status = match &app.status {
        Some(status) => Span::styled(status.as_str(), Style::default().fg(Theme::accent())),
        None => Span::raw(""),
    };
    let lines = vec![
        Line::from(status),
        Line::from(Span::styled(
            "space: new  d: delete  c: clear  ?: help  q: quit",
            Style::default().fg(Theme::dim()),
        )),
    ];
    let footer = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(chrome_block());
    frame.render_widget(footer, area);
}

fn render_swatch(frame: &mut Frame, app: &App, area: Rect) {
    let color = app.store.current();
    let inner_height = area.height.saturating_sub(2);
    let mut lines = vec![Line::from(""); usize::from(inner_height / 2)];
    lines.push(Line::from(Span::styled(
        color.to_string(),
        swatch_label_style(color),
    )));

    let swatch = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Current ")
                .style(swatch_style(color)),
        );
    frame.render_widget(swatch, area);
}

fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(build_help_text())
        .alignment(Alignment::Left)
        .block(chrome_block().title(" Help "));
    frame.render_widget(popup, area);
}

fn render_confirm_popup(frame: &mut Frame, popup: &ConfirmPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Confirm Action",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            popup.message.as_str(),
            Style::default().fg(Theme::text()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::dim())),
            Span::styled(
                "Y",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to confirm or ", Style::default().fg(Theme::dim())),
            Span::styled(
                "N",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("/", Style::default().fg(Theme::dim())),
            Span::styled(
                "ESC",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to cancel", Style::default().fg(Theme::dim())),
        ]),
    ];

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(chrome_block().title(" Confirm "));
    frame.render_widget(popup_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
