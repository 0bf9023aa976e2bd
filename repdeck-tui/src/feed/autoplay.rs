use repdeck_types::ContentKind;
use thiserror::Error;

use crate::logging::targets;

/// Fraction of a card that must be on screen before its video plays.
pub const AUTOPLAY_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("autoplay blocked by policy")]
    Blocked,

    #[error("no media source")]
    NoSource,
}

/// Something that can play a video: the host's player widget.
pub trait PlaybackSurface {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
}

/// In-terminal stand-in for a looping, muted video element.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSurface {
    source: Option<String>,
    autoplay_allowed: bool,
    playing: bool,
    frames_played: u64,
}

impl VideoSurface {
    pub fn new(source: Option<String>, autoplay_allowed: bool) -> Self {
        Self {
            source,
            autoplay_allowed,
            playing: false,
            frames_played: 0,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn frames_played(&self) -> u64 {
        self.frames_played
    }

    /// Advance the playhead by one frame while playing.
    pub fn advance(&mut self) {
        if self.playing {
            self.frames_played += 1;
        }
    }
}

impl PlaybackSurface for VideoSurface {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSource);
        }
        if !self.autoplay_allowed {
            return Err(PlaybackError::Blocked);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Plays a card's video while it is substantially on screen and pauses it
/// otherwise. Commands are issued on threshold crossings, plus once when
/// observation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityAutoplayController {
    threshold: f32,
    observed_kind: Option<ContentKind>,
    above_threshold: Option<bool>,
}

impl Default for VisibilityAutoplayController {
    fn default() -> Self {
        Self::new(AUTOPLAY_THRESHOLD)
    }
}

impl VisibilityAutoplayController {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed_kind: None,
            above_threshold: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True while a video card is being observed.
    pub fn is_observing(&self) -> bool {
        self.observed_kind == Some(ContentKind::Video)
    }

    /// (Re-)establish observation for the card's current variant. Observing
    /// the same variant again is a no-op; a different variant drops the old
    /// observation first. Returns whether the card is now observed.
    pub fn observe(&mut self, kind: ContentKind, surface: &mut dyn PlaybackSurface) -> bool {
        if self.observed_kind == Some(kind) {
            return self.is_observing();
        }
        self.teardown(surface);
        self.observed_kind = Some(kind);
        self.is_observing()
    }

    /// Feed the card's current visibility ratio.
    pub fn on_visibility(
        &mut self,
        ratio: f32,
        surface: &mut dyn PlaybackSurface,
    ) -> Option<PlaybackCommand> {
        if !self.is_observing() || !ratio.is_finite() {
            return None;
        }

        let above = ratio >= self.threshold;
        if self.above_threshold == Some(above) {
            return None;
        }
        self.above_threshold = Some(above);

        if above {
            // Best effort: a rejected play leaves the video paused
            if let Err(e) = surface.play() {
                log::debug!(target: targets::AUTOPLAY, "play rejected at ratio {:.2}: {}", ratio, e);
            }
            Some(PlaybackCommand::Play)
        } else {
            surface.pause();
            Some(PlaybackCommand::Pause)
        }
    }

    /// Stop observing and pause anything still playing.
    pub fn teardown(&mut self, surface: &mut dyn PlaybackSurface) {
        if self.is_observing() && surface.is_playing() {
            surface.pause();
        }
        self.observed_kind = None;
        self.above_threshold = None;
    }
}
