pub mod theme;
mod card;
mod formatting;
mod help;

pub use self::render_main::render;

mod render_main {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::card::render_feed;
    use super::help::render_help_modal;
    use super::theme::get_theme_colors;
    use crate::app::App;

    pub fn render(app: &mut App, frame: &mut Frame) {
        let area = frame.area();
        let theme = get_theme_colors(app);

        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

        const MIN_WIDTH: u16 = 40;
        const MIN_HEIGHT: u16 = 12;

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Terminal Too Small",
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    format!("Current size: {}x{}", area.width, area.height),
                    Style::default().fg(theme.warning),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error)),
            );
            frame.render_widget(warning, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        render_feed(frame, app, chunks[0], &theme);

        let mut footer = vec![Span::styled(
            " j/k posts · h/→ panels · [ ] photos · space like · c comments · ? help · q quit",
            Style::default().fg(theme.text_dim),
        )];
        if app.pending_likes > 0 {
            footer.push(Span::styled("  syncing…", Style::default().fg(theme.warning)));
        }
        frame.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);

        if app.show_help {
            render_help_modal(frame, area, &theme);
        }
    }
}
