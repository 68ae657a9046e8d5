//! Contract between the view and the native rendering engine.

use embedview_foundation::{TouchEventType, TouchPoint};

/// How the engine took an offered touch sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardingDisposition {
    /// The page has no touch handlers for this sample; no acknowledgment
    /// will follow.
    NotForwarded,
    /// Sent to the page. An acknowledgment follows through
    /// `confirm_touch_event`.
    Forwarded,
    /// Sent to the page as a cancel. It is acknowledged like a forwarded
    /// sample but is handled locally as soon as it reaches the queue head.
    ConvertedToCancel,
}

/// The native engine as seen from the view's UI thread.
///
/// Only [`offer_touch_event`](NativeEngine::offer_touch_event) is required.
/// The gesture commands default to no-ops so engines can opt into the ones
/// they render.
pub trait NativeEngine {
    fn offer_touch_event(
        &mut self,
        event_type: TouchEventType,
        timestamp_ms: u64,
        points: &[TouchPoint],
    ) -> ForwardingDisposition;

    fn scroll_begin(&mut self, _x: i32, _y: i32) {}

    fn scroll_by(&mut self, _dx: i32, _dy: i32) {}

    fn scroll_end(&mut self) {}

    /// Velocities in pixels per second.
    fn fling_start(&mut self, _x: i32, _y: i32, _velocity_x: i32, _velocity_y: i32) {}

    fn fling_cancel(&mut self) {}

    fn pinch_begin(&mut self) {}

    /// `delta` is the ratio of the new page scale to the current one.
    fn pinch_by(&mut self, _delta: f32, _anchor_x: i32, _anchor_y: i32) {}

    fn pinch_end(&mut self) {}

    fn show_press_state(&mut self, _x: i32, _y: i32) {}

    fn single_tap(&mut self, _x: i32, _y: i32, _check_multiple_targets: bool) {}

    fn double_tap(&mut self, _x: i32, _y: i32) {}

    fn long_press(&mut self, _x: i32, _y: i32, _check_multiple_targets: bool) {}
}

impl<E: NativeEngine + ?Sized> NativeEngine for Box<E> {
    fn offer_touch_event(
        &mut self,
        event_type: TouchEventType,
        timestamp_ms: u64,
        points: &[TouchPoint],
    ) -> ForwardingDisposition {
        (**self).offer_touch_event(event_type, timestamp_ms, points)
    }

    fn scroll_begin(&mut self, x: i32, y: i32) {
        (**self).scroll_begin(x, y)
    }

    fn scroll_by(&mut self, dx: i32, dy: i32) {
        (**self).scroll_by(dx, dy)
    }

    fn scroll_end(&mut self) {
        (**self).scroll_end()
    }

    fn fling_start(&mut self, x: i32, y: i32, velocity_x: i32, velocity_y: i32) {
        (**self).fling_start(x, y, velocity_x, velocity_y)
    }

    fn fling_cancel(&mut self) {
        (**self).fling_cancel()
    }

    fn pinch_begin(&mut self) {
        (**self).pinch_begin()
    }

    fn pinch_by(&mut self, delta: f32, anchor_x: i32, anchor_y: i32) {
        (**self).pinch_by(delta, anchor_x, anchor_y)
    }

    fn pinch_end(&mut self) {
        (**self).pinch_end()
    }

    fn show_press_state(&mut self, x: i32, y: i32) {
        (**self).show_press_state(x, y)
    }

    fn single_tap(&mut self, x: i32, y: i32, check_multiple_targets: bool) {
        (**self).single_tap(x, y, check_multiple_targets)
    }

    fn double_tap(&mut self, x: i32, y: i32) {
        (**self).double_tap(x, y)
    }

    fn long_press(&mut self, x: i32, y: i32, check_multiple_targets: bool) {
        (**self).long_press(x, y, check_multiple_targets)
    }
}
