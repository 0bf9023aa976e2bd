use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
};
use repdeck_types::{LikeState, MealMacros, WorkoutSummary};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::ThemeColors;

/// Relative age of a post. Timestamps the payload already formatted (e.g.
/// "2h ago") are shown as given.
pub fn format_timestamp(created_at: &str, parsed: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = parsed else {
        return created_at.to_string();
    };

    let age = now.signed_duration_since(created);
    if age.num_seconds() < 60 {
        "just now".to_string()
    } else if age.num_minutes() < 60 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_hours() < 24 {
        format!("{}h ago", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d ago", age.num_days())
    } else {
        created.format("%Y-%m-%d").to_string()
    }
}

pub fn format_like_label(state: LikeState) -> String {
    let heart = if state.liked { "♥" } else { "♡" };
    format!("{} {}", heart, state.like_count)
}

pub fn format_comment_count(count: usize) -> String {
    match count {
        1 => "1 comment".to_string(),
        n => format!("{} comments", n),
    }
}

pub fn format_macros(meal: &MealMacros) -> String {
    format!("P {}g · C {}g · F {}g", meal.protein, meal.carbs, meal.fats)
}

pub fn format_workout(workout: &WorkoutSummary) -> String {
    match (workout.sets, workout.reps.trim()) {
        (0, "") => workout.name.clone(),
        (sets, "") => format!("{} · {} sets", workout.name, sets),
        (0, reps) => format!("{} · {} reps", workout.name, reps),
        (sets, reps) => format!("{} · {} x {}", workout.name, sets, reps),
    }
}

/// Indicator dots, the active one filled.
pub fn dots_line(count: usize, active: usize, theme: &ThemeColors) -> Line<'static> {
    let spans: Vec<Span> = (0..count)
        .map(|i| {
            if i == active {
                Span::styled("● ", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("○ ", Style::default().fg(theme.text_dim))
            }
        })
        .collect();
    Line::from(spans)
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Split `area` between the page at `floor(position)` and the next one,
/// sliding by the fractional part of `position`.
pub fn split_sliding(area: Rect, position: f32, direction: Direction) -> (Rect, Option<Rect>) {
    let extent = match direction {
        Direction::Vertical => area.height,
        Direction::Horizontal => area.width,
    };
    let frac = position - position.floor();
    let incoming = (frac * extent as f32).round() as u16;
    if incoming == 0 || incoming >= extent {
        return (area, None);
    }

    let chunks = Layout::default()
        .direction(direction)
        .constraints([Constraint::Length(extent - incoming), Constraint::Length(incoming)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_timestamp() {
        let now = Utc::now();
        assert_eq!(format_timestamp("x", Some(now - Duration::seconds(5)), now), "just now");
        assert_eq!(format_timestamp("x", Some(now - Duration::minutes(5)), now), "5m ago");
        assert_eq!(format_timestamp("x", Some(now - Duration::hours(3)), now), "3h ago");
        assert_eq!(format_timestamp("x", Some(now - Duration::days(2)), now), "2d ago");
        assert_eq!(format_timestamp("2h ago", None, now), "2h ago");
    }

    #[test]
    fn test_like_label() {
        assert_eq!(format_like_label(LikeState { liked: true, like_count: 12 }), "♥ 12");
        assert_eq!(format_like_label(LikeState { liked: false, like_count: 0 }), "♡ 0");
    }

    #[test]
    fn test_workout_and_macros() {
        let workout = WorkoutSummary {
            name: "Back Squat".to_string(),
            sets: 5,
            reps: "5".to_string(),
        };
        assert_eq!(format_workout(&workout), "Back Squat · 5 x 5");
        let meal = MealMacros {
            name: "Chicken bowl".to_string(),
            protein: 45,
            carbs: 60,
            fats: 12,
        };
        assert_eq!(format_macros(&meal), "P 45g · C 60g · F 12g");
        assert_eq!(format_comment_count(1), "1 comment");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a very long username", 8), "a very …");
    }

    #[test]
    fn test_split_sliding() {
        let area = Rect::new(0, 0, 10, 20);
        assert_eq!(split_sliding(area, 2.0, Direction::Vertical), (area, None));

        let (outgoing, incoming) = split_sliding(area, 0.25, Direction::Vertical);
        assert_eq!(outgoing.height, 15);
        assert_eq!(incoming.unwrap().height, 5);
    }
}
