//! Paged navigation state for the feed, a card's panels and a media gallery.
//!
//! Every pager is a [`NavigationState`]: one bounded index fed by two event
//! sources. Explicit jumps set the index right away and start a smooth scroll;
//! scroll observations recompute the index from the observed offset and always
//! win. A smooth scroll reports its final frame as an observation, so an
//! optimistic jump is reconciled as soon as the animation settles.

use repdeck_types::{Panel, Post, PostId};

/// Frames a programmatic smooth scroll takes to settle.
pub const SMOOTH_SCROLL_FRAMES: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    frame: u32,
}

impl ScrollAnimation {
    fn is_done(&self) -> bool {
        self.frame >= SMOOTH_SCROLL_FRAMES
    }

    /// Ease-out cubic between `from` and `to`.
    fn position(&self) -> f32 {
        let t = (self.frame as f32 / SMOOTH_SCROLL_FRAMES as f32).min(1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}

/// Bounded page index plus the observed scroll position backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    count: usize,
    index: usize,
    /// Scroll position in page units, `0.0..=(count - 1)`
    position: f32,
    animation: Option<ScrollAnimation>,
}

impl NavigationState {
    /// A pager over `count` pages. Callers guarantee `count >= 1`; zero is
    /// treated as a single page.
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
            index: 0,
            position: 0.0,
            animation: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn last(&self) -> usize {
        self.count - 1
    }

    /// Observed offset normalized to `0.0..=1.0`.
    pub fn offset_ratio(&self) -> f32 {
        if self.count <= 1 {
            0.0
        } else {
            self.position / self.last() as f32
        }
    }

    /// Jump to `index`, clamped into range. The index updates immediately;
    /// the scroll catches up over the next frames.
    pub fn jump_to(&mut self, index: usize) -> usize {
        let target = index.min(self.last());
        self.index = target;

        if (self.position - target as f32).abs() > f32::EPSILON {
            self.animation = Some(ScrollAnimation {
                from: self.position,
                to: target as f32,
                frame: 0,
            });
        } else {
            self.animation = None;
        }
        target
    }

    /// Jump relative to the current index, clamped at both ends.
    pub fn step(&mut self, delta: i64) -> usize {
        let target = (self.index as i64).saturating_add(delta).max(0) as usize;
        self.jump_to(target)
    }

    /// Reconcile with an observed scroll offset (`0.0` first page, `1.0` last).
    ///
    /// Cancels any smooth scroll still in flight. Non-finite offsets are
    /// ignored and return `None`.
    pub fn on_scroll_observed(&mut self, offset_ratio: f32) -> Option<usize> {
        if !offset_ratio.is_finite() {
            return None;
        }
        let ratio = offset_ratio.clamp(0.0, 1.0);
        self.animation = None;
        self.position = ratio * self.last() as f32;
        self.index = (self.position.round() as usize).min(self.last());
        Some(self.index)
    }

    /// Advance a smooth scroll by one frame. Returns true while the scroll
    /// position moved; the settling frame is delivered as a scroll observation.
    pub fn tick(&mut self) -> bool {
        let Some(mut animation) = self.animation else {
            return false;
        };

        animation.frame += 1;
        self.position = animation.position();

        if animation.is_done() {
            let settled = if self.count <= 1 {
                0.0
            } else {
                animation.to / self.last() as f32
            };
            self.on_scroll_observed(settled);
        } else {
            self.animation = Some(animation);
        }
        true
    }

    /// Back to the first page with a new page count.
    pub fn reset(&mut self, count: usize) {
        *self = Self::new(count);
    }

    /// Change the page count, keeping the index where it still fits.
    pub fn resize(&mut self, count: usize) {
        self.count = count.max(1);
        self.animation = None;
        self.index = self.index.min(self.last());
        self.position = self.index as f32;
    }
}

/// Image pager inside a card's media panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryNavigator {
    post_id: PostId,
    len: usize,
    nav: NavigationState,
}

impl GalleryNavigator {
    pub fn for_post(post: &Post) -> Self {
        let len = post.media().gallery_len();
        Self {
            post_id: post.id.clone(),
            len,
            nav: NavigationState::new(len),
        }
    }

    /// Track the post currently shown by the card. A different post resets
    /// the gallery to its first image; returns whether a reset happened.
    pub fn sync_post(&mut self, post: &Post) -> bool {
        if self.post_id == post.id {
            return false;
        }
        self.post_id = post.id.clone();
        self.len = post.media().gallery_len();
        self.nav.reset(self.len);
        true
    }

    pub fn post_id(&self) -> &PostId {
        &self.post_id
    }

    pub fn index(&self) -> usize {
        self.nav.index()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A single image (or none) has nothing to page between.
    pub fn is_pageable(&self) -> bool {
        self.len > 1
    }

    /// Indicator dots to draw: one per image, none unless pageable.
    pub fn dot_count(&self) -> usize {
        if self.is_pageable() {
            self.len
        } else {
            0
        }
    }

    pub fn offset_ratio(&self) -> f32 {
        self.nav.offset_ratio()
    }

    pub fn position(&self) -> f32 {
        self.nav.position()
    }

    pub fn scroll_to_image(&mut self, index: usize) -> usize {
        self.nav.jump_to(index)
    }

    pub fn next(&mut self) -> usize {
        self.nav.step(1)
    }

    pub fn previous(&mut self) -> usize {
        self.nav.step(-1)
    }

    /// Scroll observations are only captured when there is something to page.
    pub fn on_scroll_observed(&mut self, offset_ratio: f32) -> Option<usize> {
        if !self.is_pageable() {
            return None;
        }
        self.nav.on_scroll_observed(offset_ratio)
    }

    pub fn tick(&mut self) -> bool {
        self.nav.tick()
    }
}

/// Sub-panel pager for one post card (media, details, comments).
#[derive(Debug, Clone, PartialEq)]
pub struct PanelNavigator {
    nav: NavigationState,
    gallery: GalleryNavigator,
}

impl PanelNavigator {
    pub fn for_post(post: &Post) -> Self {
        Self {
            nav: NavigationState::new(Panel::COUNT),
            gallery: GalleryNavigator::for_post(post),
        }
    }

    /// Rebind to the post now shown by this card.
    pub fn bind(&mut self, post: &Post) -> bool {
        self.gallery.sync_post(post)
    }

    pub fn index(&self) -> usize {
        self.nav.index()
    }

    pub fn active(&self) -> Panel {
        Panel::from_index(self.nav.index())
    }

    pub fn position(&self) -> f32 {
        self.nav.position()
    }

    pub fn dot_count(&self) -> usize {
        Panel::COUNT
    }

    pub fn jump_to(&mut self, index: usize) -> Panel {
        Panel::from_index(self.nav.jump_to(index))
    }

    pub fn jump_to_panel(&mut self, panel: Panel) -> Panel {
        self.jump_to(panel.index())
    }

    pub fn jump_to_comments(&mut self) -> Panel {
        self.jump_to_panel(Panel::Comments)
    }

    pub fn step(&mut self, delta: i64) -> Panel {
        Panel::from_index(self.nav.step(delta))
    }

    pub fn on_scroll_observed(&mut self, offset_ratio: f32) -> Option<Panel> {
        self.nav.on_scroll_observed(offset_ratio).map(Panel::from_index)
    }

    pub fn gallery(&self) -> &GalleryNavigator {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut GalleryNavigator {
        &mut self.gallery
    }

    /// Advance both the panel scroll and the nested gallery scroll.
    pub fn tick(&mut self) -> bool {
        let panels = self.nav.tick();
        let gallery = self.gallery.tick();
        panels || gallery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use repdeck_types::{Author, ContentKind, GalleryImage};

    fn image_post(id: i64, images: usize) -> Post {
        Post {
            id: PostId::Numeric(id),
            author: Author {
                username: "fitpro_mike".to_string(),
                avatar_url: None,
            },
            created_at: "2h ago".to_string(),
            kind: ContentKind::Image,
            media_url: None,
            images: (0..images)
                .map(|i| GalleryImage {
                    url: format!("/img/{}.jpg", i),
                    alt: None,
                })
                .collect(),
            content: String::new(),
            meal: None,
            workout: None,
            liked: false,
            favorited: false,
            like_count: 0,
            comments: Vec::new(),
        }
    }

    fn settle(nav: &mut NavigationState) {
        while nav.tick() {}
    }

    #[test]
    fn test_jump_updates_index_before_scroll_settles() {
        let mut nav = NavigationState::new(3);
        assert_eq!(nav.jump_to(2), 2);
        assert_eq!(nav.index(), 2);
        assert!(nav.is_animating());
        assert_eq!(nav.position(), 0.0);

        settle(&mut nav);
        assert!(!nav.is_animating());
        assert_eq!(nav.index(), 2);
        assert_eq!(nav.position(), 2.0);
    }

    #[test]
    fn test_out_of_range_jump_is_clamped() {
        let mut nav = NavigationState::new(3);
        assert_eq!(nav.jump_to(10), 2);
        assert_eq!(nav.step(-5), 0);
    }

    #[test]
    fn test_scroll_observation_overrides_in_flight_jump() {
        let mut nav = NavigationState::new(3);
        nav.jump_to(2);
        nav.tick();

        // User drags back toward the first panel mid-animation
        assert_eq!(nav.on_scroll_observed(0.2), Some(0));
        assert!(!nav.is_animating());
        assert!(!nav.tick());
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_scroll_observation_rounds_to_nearest_page() {
        let mut nav = NavigationState::new(3);
        assert_eq!(nav.on_scroll_observed(0.74), Some(1));
        assert_eq!(nav.on_scroll_observed(0.76), Some(2));
        assert_eq!(nav.on_scroll_observed(1.5), Some(2));
        assert_eq!(nav.on_scroll_observed(-1.0), Some(0));
        assert_eq!(nav.on_scroll_observed(f32::NAN), None);
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_zero_count_behaves_as_single_page() {
        let mut nav = NavigationState::new(0);
        assert_eq!(nav.count(), 1);
        assert_eq!(nav.jump_to(4), 0);
        assert_eq!(nav.offset_ratio(), 0.0);
    }

    #[test]
    fn test_resize_keeps_index_when_it_fits() {
        let mut nav = NavigationState::new(5);
        nav.on_scroll_observed(0.5);
        assert_eq!(nav.index(), 2);
        nav.resize(10);
        assert_eq!(nav.index(), 2);
        nav.resize(2);
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn test_gallery_scroll_to_last_image_then_observe() {
        let post = image_post(1, 3);
        let mut gallery = GalleryNavigator::for_post(&post);
        assert_eq!(gallery.index(), 0);

        gallery.scroll_to_image(2);
        assert_eq!(gallery.on_scroll_observed(1.0), Some(2));
        assert_eq!(gallery.index(), 2);
        assert_eq!(gallery.dot_count(), 3);
    }

    #[test]
    fn test_gallery_resets_when_post_identity_changes() {
        let mut gallery = GalleryNavigator::for_post(&image_post(1, 4));
        gallery.scroll_to_image(3);
        assert_eq!(gallery.index(), 3);

        assert!(!gallery.sync_post(&image_post(1, 4)));
        assert_eq!(gallery.index(), 3);

        assert!(gallery.sync_post(&image_post(2, 2)));
        assert_eq!(gallery.index(), 0);
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.post_id(), &PostId::Numeric(2));
    }

    #[test]
    fn test_single_image_gallery_has_no_affordances() {
        let mut gallery = GalleryNavigator::for_post(&image_post(1, 1));
        assert!(!gallery.is_pageable());
        assert_eq!(gallery.dot_count(), 0);
        assert_eq!(gallery.on_scroll_observed(1.0), None);
        assert_eq!(gallery.next(), 0);
    }

    #[test]
    fn test_panel_navigator_jump_to_comments() {
        let mut panels = PanelNavigator::for_post(&image_post(1, 2));
        assert_eq!(panels.active(), Panel::Media);
        assert_eq!(panels.jump_to_comments(), Panel::Comments);
        assert_eq!(panels.index(), 2);
        assert_eq!(panels.dot_count(), 3);

        while panels.tick() {}
        assert_eq!(panels.active(), Panel::Comments);
    }

    #[test]
    fn test_panel_bind_resets_only_the_gallery() {
        let mut panels = PanelNavigator::for_post(&image_post(1, 3));
        panels.jump_to(1);
        panels.gallery_mut().scroll_to_image(2);

        assert!(panels.bind(&image_post(9, 3)));
        assert_eq!(panels.gallery().index(), 0);
        assert_eq!(panels.index(), 1);
    }

    proptest! {
        #[test]
        fn prop_jumps_stay_in_range(count in 1usize..8, jumps in proptest::collection::vec(0usize..64, 0..32)) {
            let mut nav = NavigationState::new(count);
            for jump in jumps {
                nav.jump_to(jump);
                prop_assert!(nav.index() < count);
                nav.tick();
                prop_assert!(nav.index() < count);
            }
        }

        #[test]
        fn prop_observations_stay_in_range(count in 1usize..8, ratios in proptest::collection::vec(-2.0f32..3.0, 0..32)) {
            let mut nav = NavigationState::new(count);
            for ratio in ratios {
                nav.on_scroll_observed(ratio);
                prop_assert!(nav.index() < count);
            }
        }
    }
}
