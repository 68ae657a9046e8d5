//! Raw motion samples from the platform and their engine-facing touch point
//! form.

mod motion_event;
mod touch_point;

pub use motion_event::{BatchedSample, MotionAction, MotionEvent, PointerCoords, PointerId};
pub use touch_point::{
    TouchConversionError, TouchEventType, TouchPoint, TouchPointState, TouchPoints,
};

#[cfg(test)]
#[path = "../tests/input_tests.rs"]
mod tests;
