use anyhow::Result;
use crossterm::event::{Event, KeyEvent, MouseEvent};
use repdeck_types::ColorScheme;

use crate::feed::{FeedController, GestureRecognizer, GestureThresholds, InputFilter};
use crate::log_key_event;
use crate::logging::LogConfig;

pub mod state;
pub use state::*;
pub mod handlers;


impl App {
    /// Open the feed view, installing the key filter for `suppressed_keys`
    /// for as long as the view lives.
    pub fn new(feed: FeedController, suppressed_keys: &[char]) -> Self {
        let (like_tx, like_rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            running: true,
            feed,
            input_filter: InputFilter::install(suppressed_keys.iter().copied()),
            gestures: GestureRecognizer::new(GestureThresholds::TERMINAL_CELLS),
            drag: None,
            layout: FeedLayout::default(),
            show_help: false,
            color_scheme: ColorScheme::Default,
            log_config: LogConfig::default(),
            pending_likes: 0,
            like_tx,
            like_rx,
        }
    }

    /// Route one terminal event through the input filter to the handlers.
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        if !self.input_filter.admit(&event) {
            if let Event::Key(key) = event {
                log_key_event!(self.log_config, "suppressed key={:?}", key.code);
            }
            return Ok(());
        }

        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => Ok(()),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        handlers::handle_key_event(self, key)
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        handlers::handle_mouse_event(self, mouse)
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Optimistically toggle the like on the current post and send it.
    pub fn like_current(&mut self) -> bool {
        let index = self.feed.current_index();
        let sent = self.feed.dispatch_like(index, self.like_tx.clone());
        if sent {
            self.pending_likes += 1;
        }
        sent
    }

    /// Fold every like that settled since the last call into the feed.
    /// Returns how many settled.
    pub fn drain_like_outcomes(&mut self) -> usize {
        let mut settled = 0;
        while let Ok(outcome) = self.like_rx.try_recv() {
            self.feed.resolve_like(&outcome);
            self.pending_likes = self.pending_likes.saturating_sub(1);
            settled += 1;
        }
        settled
    }

    /// One animation frame. Returns true when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        let settled = self.drain_like_outcomes();
        self.feed.tick() || settled > 0
    }

    /// Close the feed view: remove the key filter and dispose every card.
    pub fn shutdown(&mut self) {
        self.input_filter.teardown();
        self.feed.teardown();
        self.gestures.cancel();
        self.drag = None;
        self.running = false;
    }
}
