use crate::app::state::{App, DragState, DragTarget};
use crate::log_key_event;
use crate::logging::targets;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use repdeck_types::Panel;
use std::time::Instant;

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    log_key_event!(app.log_config, "key={:?}, card={}", key.code, app.feed.current_index());

    // Help overlay swallows everything but its own close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),

        // Cards
        KeyCode::Down | KeyCode::Char('j') | KeyCode::PageDown => {
            app.feed.step_post(1);
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => {
            app.feed.step_post(-1);
        }
        KeyCode::Home => {
            app.feed.jump_to_post(0);
        }
        KeyCode::End => {
            let last = app.feed.len().saturating_sub(1);
            app.feed.jump_to_post(last);
        }

        // Panels
        KeyCode::Right | KeyCode::Char('l') => step_panel(app, 1),
        KeyCode::Left | KeyCode::Char('h') => step_panel(app, -1),
        KeyCode::Char('c') => {
            if let Some(card) = app.feed.current_card_mut() {
                card.panels.jump_to_comments();
            }
        }

        // Gallery
        KeyCode::Char(']') => step_gallery(app, 1),
        KeyCode::Char('[') => step_gallery(app, -1),
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if let Some(card) = app.feed.current_card_mut() {
                if card.panels.active() != Panel::Media {
                    return Ok(());
                }
                let gallery = card.panels.gallery_mut();
                if gallery.is_pageable() && index < gallery.len() {
                    gallery.scroll_to_image(index);
                }
            }
        }

        KeyCode::Char(' ') | KeyCode::Enter => {
            app.like_current();
        }
        _ => {}
    }

    Ok(())
}

fn step_panel(app: &mut App, delta: i64) {
    if let Some(card) = app.feed.current_card_mut() {
        let panel = card.panels.step(delta);
        log::debug!(target: targets::NAVIGATION, "panel -> {:?}", panel);
    }
}

/// Page the gallery of the current card; only while its media panel is shown.
fn step_gallery(app: &mut App, delta: i64) {
    if let Some(card) = app.feed.current_card_mut() {
        if card.panels.active() != Panel::Media {
            return;
        }
        let gallery = card.panels.gallery_mut();
        if delta > 0 {
            gallery.next();
        } else {
            gallery.previous();
        }
    }
}

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> Result<()> {
    if app.show_help {
        return Ok(());
    }

    let (x, y) = (mouse.column as f32, mouse.row as f32);
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.feed.step_post(1);
        }
        MouseEventKind::ScrollUp => {
            app.feed.step_post(-1);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let card = app.feed.current_index();
            if let Some(state) = app.feed.card(card) {
                let gallery = state.panels.gallery();
                let (target, origin) = if state.panels.active() == Panel::Media && gallery.is_pageable() {
                    (DragTarget::Gallery, gallery.index())
                } else {
                    (DragTarget::Panels, state.panels.index())
                };
                app.gestures.pointer_down(x, y, Instant::now());
                app.drag = Some(DragState {
                    card,
                    target,
                    origin,
                    start_column: mouse.column,
                    captured: false,
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(mut drag) = app.drag else {
                return Ok(());
            };
            if app.gestures.pointer_move(x, y) {
                drag.captured = true;
            }
            if drag.captured {
                follow_drag(app, &drag, mouse.column);
            }
            app.drag = Some(drag);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(drag) = app.drag.take() else {
                return Ok(());
            };
            let swipe = app.gestures.pointer_up(x, y, Instant::now());
            let Some(card) = app.feed.card_mut(drag.card) else {
                return Ok(());
            };
            match (swipe, drag.target) {
                (Some(swipe), DragTarget::Gallery) => {
                    let target = drag.origin as i64 + swipe.direction.delta();
                    let gallery = card.panels.gallery_mut();
                    if (0..gallery.len() as i64).contains(&target) {
                        let image = gallery.scroll_to_image(target as usize);
                        log::debug!(target: targets::NAVIGATION, "swipe {:?} -> image {}", swipe.direction, image);
                    } else {
                        // Past either end of the gallery the swipe pages the card instead
                        gallery.scroll_to_image(drag.origin);
                        let panel = card.panels.step(swipe.direction.delta());
                        log::debug!(target: targets::NAVIGATION, "swipe {:?} -> {:?}", swipe.direction, panel);
                    }
                }
                (Some(swipe), DragTarget::Panels) => {
                    let target = (drag.origin as i64 + swipe.direction.delta()).max(0) as usize;
                    let panel = card.panels.jump_to(target);
                    log::debug!(target: targets::NAVIGATION, "swipe {:?} -> {:?}", swipe.direction, panel);
                }
                // Not far enough: settle back where the drag began
                (None, DragTarget::Gallery) if drag.captured => {
                    card.panels.gallery_mut().scroll_to_image(drag.origin);
                }
                (None, DragTarget::Panels) if drag.captured => {
                    card.panels.jump_to(drag.origin);
                }
                (None, _) => {}
            }
        }
        _ => {}
    }

    Ok(())
}

/// Track the pointer with the dragged strip while a horizontal drag is held,
/// reporting the dragged offset as a scroll observation.
fn follow_drag(app: &mut App, drag: &DragState, column: u16) {
    let width = app.layout.card_width.max(1) as f32;
    let Some(card) = app.feed.card_mut(drag.card) else {
        return;
    };
    let dx = column as f32 - drag.start_column as f32;
    let position = drag.origin as f32 - dx / width;
    match drag.target {
        DragTarget::Panels => {
            let last = (card.panels.dot_count() - 1) as f32;
            card.panels.on_scroll_observed(position / last);
        }
        DragTarget::Gallery => {
            let gallery = card.panels.gallery_mut();
            let last = (gallery.len() - 1) as f32;
            gallery.on_scroll_observed(position / last);
        }
    }
}
