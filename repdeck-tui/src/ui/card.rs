use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use repdeck_types::{MediaPanel, Panel, Post};

use super::formatting::{
    dots_line, format_comment_count, format_like_label, format_macros, format_timestamp,
    format_workout, split_sliding, truncate_to_width,
};
use super::theme::ThemeColors;
use crate::app::{App, FeedLayout};
use crate::feed::CardState;
use crate::log_rendering;

/// Render the vertically paged feed into `area`.
pub fn render_feed(frame: &mut Frame, app: &mut App, area: Rect, theme: &ThemeColors) {
    app.layout = FeedLayout {
        card_width: area.width.saturating_sub(2),
        card_height: area.height,
    };

    if app.feed.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No posts yet",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Check back after your next session",
                Style::default().fg(theme.text_dim),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)));
        frame.render_widget(empty, area);
        return;
    }

    let position = app.feed.scroll_position();
    let top = position.floor().max(0.0) as usize;
    let (outgoing, incoming) = split_sliding(area, position, Direction::Vertical);
    log_rendering!(app.log_config, "feed position={:.2} top={}", position, top);

    render_card(frame, app, top, outgoing, theme);
    if let Some(incoming) = incoming {
        render_card(frame, app, top + 1, incoming, theme);
    }
}

fn render_card(frame: &mut Frame, app: &App, index: usize, area: Rect, theme: &ThemeColors) {
    let (Some(post), Some(card)) = (app.feed.post(index), app.feed.card(index)) else {
        return;
    };
    let is_current = index == app.feed.current_index();

    let age = format_timestamp(&post.created_at, post.created_at_utc(), chrono::Utc::now());
    let max_name = (area.width as usize).saturating_sub(age.len() + 16);
    let header = Line::from(vec![
        Span::styled(
            format!(" @{} ", truncate_to_width(&post.author.username, max_name)),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("· {} ", age), Style::default().fg(theme.text_dim)),
    ]);
    let position = Line::from(Span::styled(
        format!(" {}/{} ", index + 1, app.feed.len()),
        Style::default().fg(theme.text_dim),
    ))
    .alignment(Alignment::Right);

    let border = if is_current { theme.primary } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title_top(header)
        .title_top(position)
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let panel_position = card.panels.position();
    let first = panel_position.floor().max(0.0) as usize;
    let (outgoing, incoming) = split_sliding(chunks[0], panel_position, Direction::Horizontal);
    render_panel(frame, post, card, Panel::from_index(first), outgoing, theme);
    if let Some(incoming) = incoming {
        render_panel(frame, post, card, Panel::from_index(first + 1), incoming, theme);
    }

    render_panel_dots(frame, card, chunks[1], theme);
    render_controls(frame, app, index, post, chunks[2], theme);
}

fn render_panel(frame: &mut Frame, post: &Post, card: &CardState, panel: Panel, area: Rect, theme: &ThemeColors) {
    let lines = match panel {
        Panel::Media => media_lines(post, card, theme),
        Panel::Details => details_lines(post, theme),
        Panel::Comments => comment_lines(post, theme),
    };

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", panel.title()), Style::default().fg(theme.secondary)))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

fn media_lines(post: &Post, card: &CardState, theme: &ThemeColors) -> Vec<Line<'static>> {
    let text = Style::default().fg(theme.text);
    let dim = Style::default().fg(theme.text_dim);

    match post.media() {
        MediaPanel::Video { url } => {
            let status = if card.is_playing() {
                Span::styled("▶ Playing", Style::default().fg(theme.success).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("⏸ Paused", Style::default().fg(theme.warning))
            };
            let source = url.unwrap_or("(no video source)").to_string();
            vec![
                Line::from(""),
                Line::from(status),
                Line::from(Span::styled(source, dim)),
                Line::from(Span::styled(
                    format!("{} frames", card.video.frames_played()),
                    dim,
                )),
            ]
        }
        MediaPanel::Gallery(images) => {
            let gallery = card.panels.gallery();
            let shown = (gallery.position().round().max(0.0) as usize).min(images.len().saturating_sub(1));
            let mut lines = vec![Line::from("")];
            if let Some(image) = images.get(shown) {
                lines.push(Line::from(Span::styled(format!("🖼  {}", image.url), text)));
                if let Some(alt) = &image.alt {
                    lines.push(Line::from(Span::styled(alt.clone(), dim)));
                }
            }
            if gallery.is_pageable() {
                lines.push(Line::from(""));
                lines.push(dots_line(gallery.dot_count(), gallery.index(), theme).alignment(Alignment::Center));
            }
            lines
        }
        MediaPanel::LegacyImage(url) => vec![
            Line::from(""),
            Line::from(Span::styled(format!("🖼  {}", url), text)),
        ],
        MediaPanel::Text(content) => content
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), text)))
            .collect(),
    }
}

fn details_lines(post: &Post, theme: &ThemeColors) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(theme.text);
    let mut lines = Vec::new();

    if !post.content.is_empty() {
        lines.extend(post.content.lines().map(|line| Line::from(Span::styled(line.to_string(), text))));
        lines.push(Line::from(""));
    }

    // A post may carry both; neither hides the other
    if let Some(meal) = &post.meal {
        lines.push(Line::from(vec![
            Span::styled("Meal  ", label),
            Span::styled(meal.name.clone(), text),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", format_macros(meal)),
            Style::default().fg(theme.text_dim),
        )));
    }
    if let Some(workout) = &post.workout {
        lines.push(Line::from(vec![
            Span::styled("Lift  ", label),
            Span::styled(format_workout(workout), text),
        ]));
    }
    if post.favorited {
        lines.push(Line::from(Span::styled("★ Saved", Style::default().fg(theme.warning))));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No details", Style::default().fg(theme.text_dim))));
    }
    lines
}

fn comment_lines(post: &Post, theme: &ThemeColors) -> Vec<Line<'static>> {
    if post.comments.is_empty() {
        return vec![Line::from(Span::styled(
            "No comments yet",
            Style::default().fg(theme.text_dim),
        ))];
    }

    post.comments
        .iter()
        .map(|comment| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", comment.user),
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(comment.text.clone(), Style::default().fg(theme.text)),
                Span::styled(format!("  {}", comment.when), Style::default().fg(theme.text_dim)),
            ])
        })
        .collect()
}

fn render_panel_dots(frame: &mut Frame, card: &CardState, area: Rect, theme: &ThemeColors) {
    let active = card.panels.index();
    let spans: Vec<Span> = Panel::ALL
        .iter()
        .map(|panel| {
            if panel.index() == active {
                Span::styled(
                    format!("● {}  ", panel.title()),
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!("○ {}  ", panel.title()), Style::default().fg(theme.text_dim))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, app: &App, index: usize, post: &Post, area: Rect, theme: &ThemeColors) {
    let like = app.feed.like_state(index).unwrap_or_else(|| post.like_state());
    let like_style = if like.liked {
        Style::default().fg(theme.liked).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", format_like_label(like)), like_style),
        Span::styled("[space]   ", Style::default().fg(theme.text_dim)),
        Span::styled(format!("💬 {} ", format_comment_count(post.comments.len())), Style::default().fg(theme.text)),
        Span::styled("[c]", Style::default().fg(theme.text_dim)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
