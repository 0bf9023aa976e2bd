use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::formatting::centered_rect;
use super::theme::ThemeColors;

const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Feed",
        &[
            ("j / k / ↓ / ↑", "Next / previous post"),
            ("Home / End", "First / last post"),
            ("wheel", "Page posts"),
        ],
    ),
    (
        "Post",
        &[
            ("h / ← / →", "Previous / next panel"),
            ("drag", "Swipe between panels"),
            ("c", "Jump to comments"),
            ("[ / ]", "Previous / next photo"),
            ("1-9", "Jump to photo"),
            ("space / enter", "Like / unlike"),
        ],
    ),
    ("App", &[("?", "Toggle this help"), ("q / Esc", "Quit")]),
];

pub fn render_help_modal(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let modal_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![Line::from("")];
    for (category, items) in SHORTCUTS {
        lines.push(Line::from(Span::styled(
            *category,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in items.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<16}", key), Style::default().fg(theme.success)),
                Span::styled(*description, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
                .title(" Keyboard Shortcuts ")
                .title_alignment(Alignment::Center)
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, modal_area);
}
