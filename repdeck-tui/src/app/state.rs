use repdeck_types::ColorScheme;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::feed::{FeedController, GestureRecognizer, InputFilter, LikeOutcome};
use crate::logging::LogConfig;

/// Strip a horizontal drag pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Panels,
    /// The image gallery, when the drag starts on a pageable media panel
    Gallery,
}

/// A pointer drag in progress over the current card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Card the drag started on
    pub card: usize,
    pub target: DragTarget,
    /// Panel or image shown when the drag started
    pub origin: usize,
    pub start_column: u16,
    /// Set once the drag showed horizontal intent
    pub captured: bool,
}

/// Size of the card viewport in cells, refreshed on every render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedLayout {
    pub card_width: u16,
    pub card_height: u16,
}

impl Default for FeedLayout {
    fn default() -> Self {
        Self {
            card_width: 80,
            card_height: 24,
        }
    }
}

pub struct App {
    pub running: bool,
    pub feed: FeedController,
    pub input_filter: InputFilter,
    pub gestures: GestureRecognizer,
    pub drag: Option<DragState>,
    pub layout: FeedLayout,
    pub show_help: bool,
    pub color_scheme: ColorScheme,
    pub log_config: LogConfig,
    /// Like requests sent but not yet settled
    pub pending_likes: usize,
    pub(crate) like_tx: UnboundedSender<LikeOutcome>,
    pub(crate) like_rx: UnboundedReceiver<LikeOutcome>,
}
