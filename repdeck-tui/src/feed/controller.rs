use repdeck_types::{LikeState, MediaPanel, Post, PostId};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc::UnboundedSender;

use super::autoplay::{PlaybackSurface, VideoSurface, VisibilityAutoplayController, AUTOPLAY_THRESHOLD};
use super::like::{LikeMutation, LikeMutationCoordinator, LikeOutcome};
use super::navigation::{NavigationState, PanelNavigator};
use crate::logging::targets;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub autoplay_threshold: f32,
    /// When false every play command is rejected, as under a strict autoplay policy
    pub autoplay_allowed: bool,
    /// Cards kept mounted on each side of the current one
    pub mount_radius: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            autoplay_threshold: AUTOPLAY_THRESHOLD,
            autoplay_allowed: true,
            mount_radius: 1,
        }
    }
}

/// Interaction state of one mounted card.
#[derive(Debug)]
pub struct CardState {
    post_id: PostId,
    pub panels: PanelNavigator,
    pub autoplay: VisibilityAutoplayController,
    pub video: VideoSurface,
    visibility: f32,
}

impl CardState {
    fn mount(post: &Post, settings: &FeedSettings) -> Self {
        let mut card = Self {
            post_id: post.id.clone(),
            panels: PanelNavigator::for_post(post),
            autoplay: VisibilityAutoplayController::new(settings.autoplay_threshold),
            video: VideoSurface::new(video_source(post), settings.autoplay_allowed),
            visibility: 0.0,
        };
        card.autoplay.observe(post.kind, &mut card.video);
        card
    }

    /// Point the card at a (possibly different) post.
    fn bind(&mut self, post: &Post, settings: &FeedSettings) {
        if self.panels.bind(post) {
            log::debug!(
                target: targets::NAVIGATION,
                "card rebound {} -> {}, gallery reset",
                self.post_id,
                post.id
            );
            self.autoplay.teardown(&mut self.video);
            self.video = VideoSurface::new(video_source(post), settings.autoplay_allowed);
        }
        self.post_id = post.id.clone();
        self.autoplay.observe(post.kind, &mut self.video);
    }

    fn unmount(mut self) {
        self.autoplay.teardown(&mut self.video);
    }

    pub fn post_id(&self) -> &PostId {
        &self.post_id
    }

    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn is_playing(&self) -> bool {
        self.video.is_playing()
    }

    fn tick(&mut self) -> bool {
        let moved = self.panels.tick();
        self.video.advance();
        moved || self.video.is_playing()
    }
}

fn video_source(post: &Post) -> Option<String> {
    match post.media() {
        MediaPanel::Video { url } => url.map(str::to_string),
        _ => None,
    }
}

/// Owns the ordered posts of a feed view and the per-card interaction state.
///
/// Posts are never mutated after load. The displayed like state is the base
/// post folded with the latest optimistic or confirmed value recorded here.
#[derive(Debug)]
pub struct FeedController {
    posts: Vec<Post>,
    likes: HashMap<PostId, LikeState>,
    feed: NavigationState,
    cards: BTreeMap<usize, CardState>,
    settings: FeedSettings,
    coordinator: LikeMutationCoordinator,
    next_like_seq: u64,
}

impl FeedController {
    pub fn new(posts: Vec<Post>, coordinator: LikeMutationCoordinator, settings: FeedSettings) -> Self {
        let mut feed = Self {
            feed: NavigationState::new(posts.len()),
            posts,
            likes: HashMap::new(),
            cards: BTreeMap::new(),
            settings,
            coordinator,
            next_like_seq: 1,
        };
        feed.refresh_cards();
        feed
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn post(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.feed.index()
    }

    pub fn current_post(&self) -> Option<&Post> {
        self.posts.get(self.feed.index())
    }

    /// Vertical scroll position in card units.
    pub fn scroll_position(&self) -> f32 {
        self.feed.position()
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn coordinator(&self) -> &LikeMutationCoordinator {
        &self.coordinator
    }

    pub fn card(&self, index: usize) -> Option<&CardState> {
        self.cards.get(&index)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut CardState> {
        self.cards.get_mut(&index)
    }

    pub fn current_card_mut(&mut self) -> Option<&mut CardState> {
        let index = self.feed.index();
        self.cards.get_mut(&index)
    }

    /// Indices of the cards currently mounted.
    pub fn mounted(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards.keys().copied()
    }

    /// Live visibility observers; bounded by the mount window.
    pub fn observer_count(&self) -> usize {
        self.cards.values().filter(|card| card.autoplay.is_observing()).count()
    }

    /// Displayed like state for the post at `index`.
    pub fn like_state(&self, index: usize) -> Option<LikeState> {
        let post = self.posts.get(index)?;
        Some(self.likes.get(&post.id).copied().unwrap_or_else(|| post.like_state()))
    }

    // Vertical paging

    pub fn jump_to_post(&mut self, index: usize) -> usize {
        let target = self.feed.jump_to(index);
        log::debug!(target: targets::NAVIGATION, "feed jump -> {}", target);
        self.refresh_cards();
        target
    }

    pub fn step_post(&mut self, delta: i64) -> usize {
        let target = self.feed.step(delta);
        self.refresh_cards();
        target
    }

    /// Reconcile with an observed vertical scroll offset (`0.0..=1.0`).
    pub fn on_feed_scrolled(&mut self, offset_ratio: f32) -> Option<usize> {
        let index = self.feed.on_scroll_observed(offset_ratio)?;
        self.refresh_cards();
        Some(index)
    }

    /// Advance every in-flight scroll and playhead by one frame. Returns true
    /// when something visible changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.feed.tick();
        for card in self.cards.values_mut() {
            changed |= card.tick();
        }
        self.refresh_cards();
        changed
    }

    /// Replace the post sequence, e.g. after a reload. Cards whose slot now
    /// holds a different post are rebound, which resets their gallery.
    pub fn replace_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.likes.clear();
        self.feed.resize(self.posts.len());
        self.refresh_cards();
    }

    /// Unmount every card, disposing its visibility observer. Used when the
    /// feed view closes.
    pub fn teardown(&mut self) {
        for (index, card) in std::mem::take(&mut self.cards) {
            log::debug!(target: targets::AUTOPLAY, "unmount card {} ({})", index, card.post_id);
            card.unmount();
        }
    }

    fn card_visibility(position: f32, index: usize) -> f32 {
        (1.0 - (position - index as f32).abs()).clamp(0.0, 1.0)
    }

    /// Mount cards in the window around the current post and any card still
    /// partly on screen, unmount the rest, then push visibility to autoplay.
    fn refresh_cards(&mut self) {
        if self.posts.is_empty() {
            for (_, card) in std::mem::take(&mut self.cards) {
                card.unmount();
            }
            return;
        }

        let position = self.feed.position();
        let current = self.feed.index();
        let last = self.posts.len() - 1;
        // The settled window around the current card, plus the one or two
        // cards under the scroll position while an animation is in flight
        let radius = self.settings.mount_radius;
        let window = current.saturating_sub(radius)..=(current + radius).min(last);
        let in_view = (position.floor().max(0.0) as usize).min(last)..=(position.ceil().max(0.0) as usize).min(last);
        let wanted = |index: usize| window.contains(&index) || in_view.contains(&index);

        let stale: Vec<usize> = self.cards.keys().copied().filter(|index| !wanted(*index)).collect();
        for index in stale {
            if let Some(card) = self.cards.remove(&index) {
                log::debug!(target: targets::AUTOPLAY, "unmount card {} ({})", index, card.post_id);
                card.unmount();
            }
        }

        for index in window.clone().chain(in_view.clone()) {
            let post = &self.posts[index];
            match self.cards.get_mut(&index) {
                Some(card) => card.bind(post, &self.settings),
                None => {
                    self.cards.insert(index, CardState::mount(post, &self.settings));
                }
            }
        }

        for (index, card) in self.cards.iter_mut() {
            card.visibility = Self::card_visibility(position, *index);
            if let Some(command) = card.autoplay.on_visibility(card.visibility, &mut card.video) {
                log::debug!(
                    target: targets::AUTOPLAY,
                    "card {} visibility {:.2} -> {:?}",
                    index,
                    card.visibility,
                    command
                );
            }
        }
    }

    // Likes

    /// Apply an optimistic toggle to the post at `index` and return the
    /// mutation to send. `None` when there is no such post.
    pub fn toggle_like(&mut self, index: usize) -> Option<LikeMutation> {
        let current = self.like_state(index)?;
        let post_id = self.posts[index].id.clone();
        let seq = self.next_like_seq;
        self.next_like_seq += 1;

        let mutation = self.coordinator.begin(seq, post_id.clone(), current, !current.liked);
        self.likes.insert(post_id, mutation.optimistic);
        Some(mutation)
    }

    /// Toggle and hand the request to the runtime; the outcome arrives on
    /// `outcomes` and must be passed back to [`FeedController::resolve_like`].
    pub fn dispatch_like(&mut self, index: usize, outcomes: UnboundedSender<LikeOutcome>) -> bool {
        match self.toggle_like(index) {
            Some(mutation) => {
                self.coordinator.dispatch(mutation, outcomes);
                true
            }
            None => false,
        }
    }

    /// Fold a settled mutation into the displayed state.
    pub fn resolve_like(&mut self, outcome: &LikeOutcome) -> LikeState {
        let settled = LikeMutationCoordinator::settle(outcome);
        let post_id = &outcome.mutation.post_id;
        if self.posts.iter().any(|post| &post.id == post_id) {
            self.likes.insert(post_id.clone(), settled);
        }
        settled
    }

    /// Toggle, wait for the backend, and fold the result in.
    pub async fn toggle_like_settled(&mut self, index: usize) -> Option<LikeState> {
        let mutation = self.toggle_like(index)?;
        let outcome = self.coordinator.execute(mutation).await;
        Some(self.resolve_like(&outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::like::testing::ScriptedBackend;
    use repdeck_types::{Author, ContentKind, GalleryImage, LikeResponse};
    use std::sync::Arc;

    fn post(id: i64, kind: ContentKind, images: usize) -> Post {
        Post {
            id: PostId::Numeric(id),
            author: Author {
                username: format!("user{}", id),
                avatar_url: None,
            },
            created_at: "1h ago".to_string(),
            kind,
            media_url: match kind {
                ContentKind::Video => Some(format!("/clip{}.mp4", id)),
                _ => None,
            },
            images: (0..images)
                .map(|i| GalleryImage {
                    url: format!("/{}/{}.jpg", id, i),
                    alt: None,
                })
                .collect(),
            content: "Every rep counts".to_string(),
            meal: None,
            workout: None,
            liked: false,
            favorited: false,
            like_count: 5,
            comments: Vec::new(),
        }
    }

    fn feed_with(posts: Vec<Post>, script: Vec<crate::api::ApiResult<LikeResponse>>) -> FeedController {
        let coordinator = LikeMutationCoordinator::new(Arc::new(ScriptedBackend::new(script)));
        FeedController::new(posts, coordinator, FeedSettings::default())
    }

    fn settle(feed: &mut FeedController) {
        for _ in 0..32 {
            feed.tick();
        }
    }

    #[test]
    fn test_empty_feed_is_inert() {
        let mut feed = feed_with(Vec::new(), Vec::new());
        assert!(feed.is_empty());
        assert_eq!(feed.mounted().count(), 0);
        assert_eq!(feed.jump_to_post(3), 0);
        assert!(feed.toggle_like(0).is_none());
        assert!(feed.current_post().is_none());
        feed.tick();
    }

    #[test]
    fn test_mount_window_follows_current_card() {
        let posts = (0..6).map(|i| post(i, ContentKind::Image, 2)).collect();
        let mut feed = feed_with(posts, Vec::new());
        assert_eq!(feed.mounted().collect::<Vec<_>>(), vec![0, 1]);

        feed.jump_to_post(4);
        settle(&mut feed);
        assert_eq!(feed.mounted().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(feed.current_index(), 4);
    }

    #[test]
    fn test_video_plays_only_while_mostly_visible() {
        let posts = vec![
            post(0, ContentKind::Text, 0),
            post(1, ContentKind::Video, 0),
            post(2, ContentKind::Image, 1),
        ];
        let mut feed = feed_with(posts, Vec::new());
        assert!(!feed.card(1).unwrap().is_playing());
        assert_eq!(feed.observer_count(), 1);

        // Scroll halfway: the video card is 50% visible
        feed.on_feed_scrolled(0.25);
        assert!(!feed.card(1).unwrap().is_playing());

        feed.on_feed_scrolled(0.35);
        assert!((feed.card(1).unwrap().visibility() - 0.7).abs() < 1e-4);
        assert!(feed.card(1).unwrap().is_playing());

        feed.jump_to_post(2);
        settle(&mut feed);
        assert!(!feed.card(1).unwrap().is_playing());
    }

    #[test]
    fn test_observers_are_disposed_with_their_cards() {
        let posts = (0..8).map(|i| post(i, ContentKind::Video, 0)).collect();
        let mut feed = feed_with(posts, Vec::new());
        feed.on_feed_scrolled(1.0);
        assert_eq!(feed.mounted().collect::<Vec<_>>(), vec![6, 7]);
        assert_eq!(feed.observer_count(), 2);
        assert!(feed.card(7).unwrap().is_playing());
        assert!(feed.card(0).is_none());
    }

    #[test]
    fn test_long_jump_mounts_only_window_and_cards_in_view() {
        let posts = (0..500).map(|i| post(i, ContentKind::Video, 0)).collect();
        let mut feed = feed_with(posts, Vec::new());
        let bound = 2 * feed.settings().mount_radius + 3;

        feed.jump_to_post(499);
        assert!(feed.mounted().count() <= bound);
        assert!(feed.observer_count() <= bound);
        for _ in 0..32 {
            feed.tick();
            assert!(feed.mounted().count() <= bound);
            assert!(feed.observer_count() <= bound);
        }
        assert_eq!(feed.mounted().collect::<Vec<_>>(), vec![498, 499]);
        assert!(feed.card(499).unwrap().is_playing());
    }

    #[test]
    fn test_teardown_unmounts_everything() {
        let mut feed = feed_with(vec![post(0, ContentKind::Video, 0)], Vec::new());
        assert!(feed.card(0).unwrap().is_playing());
        feed.teardown();
        assert_eq!(feed.mounted().count(), 0);
        assert_eq!(feed.observer_count(), 0);
    }

    #[test]
    fn test_blocked_autoplay_leaves_video_paused() {
        let coordinator = LikeMutationCoordinator::new(Arc::new(ScriptedBackend::default()));
        let settings = FeedSettings {
            autoplay_allowed: false,
            ..FeedSettings::default()
        };
        let feed = FeedController::new(vec![post(0, ContentKind::Video, 0)], coordinator, settings);
        assert_eq!(feed.card(0).unwrap().visibility(), 1.0);
        assert!(!feed.card(0).unwrap().is_playing());
    }

    #[test]
    fn test_replace_posts_resets_gallery_of_rebound_cards() {
        let mut feed = feed_with(
            vec![post(1, ContentKind::Image, 3), post(2, ContentKind::Image, 3)],
            Vec::new(),
        );
        feed.card_mut(0).unwrap().panels.gallery_mut().scroll_to_image(2);
        settle(&mut feed);
        assert_eq!(feed.card(0).unwrap().panels.gallery().index(), 2);

        // Same post stays put
        feed.replace_posts(vec![post(1, ContentKind::Image, 3), post(2, ContentKind::Image, 3)]);
        assert_eq!(feed.card(0).unwrap().panels.gallery().index(), 2);

        // Reordered: slot 0 now shows post 2
        feed.replace_posts(vec![post(2, ContentKind::Image, 3), post(1, ContentKind::Image, 3)]);
        assert_eq!(feed.card(0).unwrap().post_id(), &PostId::Numeric(2));
        assert_eq!(feed.card(0).unwrap().panels.gallery().index(), 0);
    }

    #[test]
    fn test_like_state_folds_over_base_post() {
        let mut feed = feed_with(vec![post(1, ContentKind::Text, 0)], Vec::new());
        assert_eq!(feed.like_state(0), Some(LikeState { liked: false, like_count: 5 }));

        let mutation = feed.toggle_like(0).unwrap();
        assert!(mutation.requested);
        assert_eq!(feed.like_state(0), Some(LikeState { liked: true, like_count: 6 }));
        // The base post is untouched
        assert_eq!(feed.post(0).unwrap().like_state(), LikeState { liked: false, like_count: 5 });
    }

    #[tokio::test]
    async fn test_toggle_like_settled_converges_to_server() {
        let mut feed = feed_with(vec![post(1, ContentKind::Text, 0)], vec![ScriptedBackend::ok(true, 9)]);
        let settled = feed.toggle_like_settled(0).await;
        assert_eq!(settled, Some(LikeState { liked: true, like_count: 9 }));
        assert_eq!(feed.like_state(0), settled);
    }

    #[tokio::test]
    async fn test_failed_like_rolls_back() {
        let mut feed = feed_with(vec![post(1, ContentKind::Text, 0)], vec![ScriptedBackend::server_error()]);
        feed.toggle_like_settled(0).await;
        assert_eq!(feed.like_state(0), Some(LikeState { liked: false, like_count: 5 }));
    }

    #[tokio::test]
    async fn test_dispatch_like_round_trip() {
        let mut feed = feed_with(vec![post(1, ContentKind::Text, 0)], vec![ScriptedBackend::ok(true, 6)]);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        assert!(feed.dispatch_like(0, tx.clone()));
        assert!(!feed.dispatch_like(5, tx));

        let outcome = rx.recv().await.unwrap();
        feed.resolve_like(&outcome);
        assert_eq!(feed.like_state(0), Some(LikeState { liked: true, like_count: 6 }));
    }
}
