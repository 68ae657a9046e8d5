//! Local gesture recognizers.
//!
//! Each recognizer reports what it sees through a single dispatch function
//! taking a tagged event, so one listener object can respond to every
//! gesture and a test can stand in a closure.

mod detector;
mod long_press;
mod scale;

pub use detector::GestureDetector;
pub use long_press::GestureDetectorProxy;
pub use scale::{ScaleEvent, ScaleGestureDetector, ScaleListener, ScaleState};

use crate::input::{MotionAction, MotionEvent};
use embedview_ui_graphics::Point;

/// Squared length of a whole-pixel displacement, saturating instead of
/// overflowing for pointers that travel far off screen.
pub(crate) fn distance_squared(dx: i64, dy: i64) -> i64 {
    dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
}

/// Squared length of `(dx, dy)` with each component truncated to whole
/// pixels.
pub(crate) fn truncated_distance_squared(dx: f32, dy: f32) -> i64 {
    distance_squared(dx as i64, dy as i64)
}

/// Where and when a gesture was observed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GesturePoint {
    pub position: Point,
    pub down_time: u64,
    pub event_time: u64,
}

impl GesturePoint {
    pub fn of(event: &MotionEvent) -> Self {
        Self {
            position: event.position(),
            down_time: event.down_time,
            event_time: event.event_time,
        }
    }

    /// How long the pointer had been down when this was observed.
    pub fn held_for(&self) -> u64 {
        self.event_time.saturating_sub(self.down_time)
    }
}

/// A gesture recognized by [`GestureDetector`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A gesture started.
    Down(GesturePoint),
    /// The pointer has been held long enough to show pressed feedback.
    ShowPress(GesturePoint),
    /// The pointer lifted without leaving the tap region.
    SingleTapUp(GesturePoint),
    /// A tap that is not followed by a second one.
    SingleTapConfirmed(GesturePoint),
    /// Second down of a double tap; carries the first down.
    DoubleTap(GesturePoint),
    /// Every event inside a double tap after its second down.
    DoubleTapEvent {
        action: MotionAction,
        at: GesturePoint,
    },
    /// Focus moved. Distances are previous focus minus current focus.
    Scroll {
        start: GesturePoint,
        current: GesturePoint,
        distance_x: f32,
        distance_y: f32,
    },
    /// Pointer lifted while moving fast enough. Velocities in px/s.
    Fling {
        start: GesturePoint,
        current: GesturePoint,
        velocity_x: f32,
        velocity_y: f32,
    },
    LongPress(GesturePoint),
}

/// Receives recognized gestures. The return value reports whether the
/// gesture was consumed.
pub trait GestureListener {
    fn on_gesture(&mut self, event: GestureEvent) -> bool;
}

impl<F> GestureListener for F
where
    F: FnMut(GestureEvent) -> bool,
{
    fn on_gesture(&mut self, event: GestureEvent) -> bool {
        self(event)
    }
}

/// Centroid of the event's pointers, leaving out the one lifting on a
/// `PointerUp`.
pub(crate) fn focus_of(event: &MotionEvent) -> Point {
    let skip = match event.action {
        MotionAction::PointerUp { index } => Some(index),
        _ => None,
    };
    let mut sum = Point::ZERO;
    let mut count = 0usize;
    for (index, pointer) in event.pointers.iter().enumerate() {
        if Some(index) == skip {
            continue;
        }
        sum = sum + pointer.position();
        count += 1;
    }
    if count == 0 {
        return event.position();
    }
    Point::new(sum.x / count as f32, sum.y / count as f32)
}

#[cfg(test)]
#[path = "../tests/gesture_detector_tests.rs"]
mod detector_tests;

#[cfg(test)]
#[path = "../tests/long_press_tests.rs"]
mod long_press_tests;

#[cfg(test)]
#[path = "../tests/scale_tests.rs"]
mod scale_tests;
