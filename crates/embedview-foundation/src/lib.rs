//! Input foundation for embedview: the motion event model, the shared view
//! configuration, and the platform-style gesture recognizers that handle
//! whatever the native engine does not consume.

pub mod gesture_constants;
pub mod gestures;
pub mod input;
pub mod velocity_tracker;
mod view_configuration;

pub use embedview_ui_graphics::{Point, Size};
pub use gestures::{
    GestureDetector, GestureDetectorProxy, GestureEvent, GestureListener, GesturePoint,
    ScaleEvent, ScaleGestureDetector, ScaleListener, ScaleState,
};
pub use input::{
    BatchedSample, MotionAction, MotionEvent, PointerCoords, PointerId, TouchConversionError,
    TouchEventType, TouchPoint, TouchPointState, TouchPoints,
};
pub use velocity_tracker::VelocityTracker;
pub use view_configuration::{ConfigError, ViewConfiguration};

pub mod prelude {
    pub use crate::gestures::{GestureEvent, GestureListener, ScaleEvent, ScaleListener};
    pub use crate::input::{MotionAction, MotionEvent, PointerCoords, TouchPoint};
    pub use crate::view_configuration::ViewConfiguration;
}
