//! Feed interaction engine: paging, gestures, autoplay and optimistic likes.

pub mod autoplay;
pub mod controller;
pub mod gesture;
pub mod input_filter;
pub mod like;
pub mod loader;
pub mod navigation;

pub use autoplay::{
    PlaybackCommand, PlaybackError, PlaybackSurface, VideoSurface, VisibilityAutoplayController,
    AUTOPLAY_THRESHOLD,
};
pub use controller::{CardState, FeedController, FeedSettings};
pub use gesture::{GestureRecognizer, GestureThresholds, Swipe, SwipeDirection};
pub use input_filter::InputFilter;
pub use like::{LikeBackend, LikeMutation, LikeMutationCoordinator, LikeOutcome};
pub use loader::{InitialDataSource, LoadError};
pub use navigation::{GalleryNavigator, NavigationState, PanelNavigator};
