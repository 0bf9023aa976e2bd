use std::time::{Duration, Instant};

/// Distances are in whatever unit the pointer reports (pixels, terminal cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Horizontal travel after which the gesture claims the pointer and
    /// default scrolling is suppressed
    pub intent: f32,
    /// Horizontal travel needed on release to page
    pub swipe: f32,
    /// How much horizontal travel must dominate vertical travel on release
    pub dominance: f32,
}

impl GestureThresholds {
    /// Tuned for pointer events in pixels.
    pub const PIXELS: Self = Self {
        intent: 30.0,
        swipe: 50.0,
        dominance: 2.0,
    };

    /// Tuned for mouse events in terminal cells.
    pub const TERMINAL_CELLS: Self = Self {
        intent: 3.0,
        swipe: 6.0,
        dominance: 2.0,
    };
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::PIXELS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right: go to the previous panel
    Back,
    /// Finger moved left: go to the next panel
    Forward,
}

impl SwipeDirection {
    pub fn delta(&self) -> i64 {
        match self {
            SwipeDirection::Back => -1,
            SwipeDirection::Forward => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub direction: SwipeDirection,
    pub dx: f32,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy)]
struct GestureStart {
    x: f32,
    y: f32,
    at: Instant,
}

/// Recognizes horizontal swipes from raw pointer down/move/up events.
///
/// A recognized swipe is only a request for a one-step jump; the caller feeds
/// it to the same navigator that keys and scroll observations drive.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    thresholds: GestureThresholds,
    start: Option<GestureStart>,
}

impl GestureRecognizer {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            start: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, at: Instant) {
        self.start = Some(GestureStart { x, y, at });
    }

    /// Returns true once the movement shows horizontal intent, meaning the
    /// host should suppress its default scrolling for this event.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Some(start) = self.start else {
            return false;
        };
        let dx = (x - start.x).abs();
        let dy = (y - start.y).abs();
        dx > self.thresholds.intent && dx > dy
    }

    /// Ends the gesture. Returns a swipe when the horizontal travel passed the
    /// swipe threshold and clearly dominated the vertical travel.
    pub fn pointer_up(&mut self, x: f32, y: f32, at: Instant) -> Option<Swipe> {
        let start = self.start.take()?;
        let dx = x - start.x;
        let dy = y - start.y;

        if dx.abs() > self.thresholds.swipe && dx.abs() > dy.abs() * self.thresholds.dominance {
            let direction = if dx > 0.0 {
                SwipeDirection::Back
            } else {
                SwipeDirection::Forward
            };
            Some(Swipe {
                direction,
                dx,
                duration: at.saturating_duration_since(start.at),
            })
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_left_pages_forward() {
        let mut gestures = GestureRecognizer::default();
        let t0 = Instant::now();
        gestures.pointer_down(200.0, 100.0, t0);
        let swipe = gestures
            .pointer_up(120.0, 110.0, t0 + Duration::from_millis(150))
            .expect("swipe");
        assert_eq!(swipe.direction, SwipeDirection::Forward);
        assert_eq!(swipe.direction.delta(), 1);
        assert_eq!(swipe.duration, Duration::from_millis(150));
        assert!(!gestures.is_tracking());
    }

    #[test]
    fn test_swipe_right_pages_back() {
        let mut gestures = GestureRecognizer::default();
        let t0 = Instant::now();
        gestures.pointer_down(10.0, 10.0, t0);
        let swipe = gestures.pointer_up(80.0, 20.0, t0).expect("swipe");
        assert_eq!(swipe.direction, SwipeDirection::Back);
    }

    #[test]
    fn test_diagonal_or_short_drag_is_not_a_swipe() {
        let mut gestures = GestureRecognizer::default();
        let t0 = Instant::now();

        gestures.pointer_down(0.0, 0.0, t0);
        assert_eq!(gestures.pointer_up(40.0, 0.0, t0), None);

        // 60 across but 40 down fails the 2:1 dominance check
        gestures.pointer_down(0.0, 0.0, t0);
        assert_eq!(gestures.pointer_up(60.0, 40.0, t0), None);
    }

    #[test]
    fn test_move_suppresses_scroll_only_after_horizontal_intent() {
        let mut gestures = GestureRecognizer::default();
        assert!(!gestures.pointer_move(100.0, 0.0));

        gestures.pointer_down(0.0, 0.0, Instant::now());
        assert!(!gestures.pointer_move(20.0, 0.0));
        assert!(!gestures.pointer_move(35.0, 50.0));
        assert!(gestures.pointer_move(35.0, 10.0));
    }

    #[test]
    fn test_terminal_thresholds() {
        let mut gestures = GestureRecognizer::new(GestureThresholds::TERMINAL_CELLS);
        let t0 = Instant::now();
        gestures.pointer_down(40.0, 10.0, t0);
        assert!(gestures.pointer_move(36.0, 10.0));
        let swipe = gestures.pointer_up(30.0, 11.0, t0).expect("swipe");
        assert_eq!(swipe.direction, SwipeDirection::Forward);
    }

    #[test]
    fn test_pointer_up_without_down_is_ignored() {
        let mut gestures = GestureRecognizer::default();
        assert_eq!(gestures.pointer_up(500.0, 0.0, Instant::now()), None);
    }
}
