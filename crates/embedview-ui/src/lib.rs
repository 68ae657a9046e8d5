//! View-level touch handling for an embedded web view.
//!
//! [`TouchDispatchArbiter`] sits between the platform's raw touch stream
//! and two consumers: the native engine, which may want samples for page
//! script, and the local recognizers, whose gestures the
//! [`GestureResponder`] turns into scroll, fling, pinch and tap commands.

pub mod engine;
pub mod gesture_responder;
pub mod touch;

pub use engine::{ForwardingDisposition, NativeEngine};
pub use gesture_responder::{GestureResponder, ResponderSink, SnapScrollMode};
pub use touch::{
    PendingEventQueue, PendingMotionEvent, TouchDispatchArbiter, TouchDispatchStats, TouchRoute,
};

pub mod prelude {
    pub use crate::engine::{ForwardingDisposition, NativeEngine};
    pub use crate::gesture_responder::GestureResponder;
    pub use crate::touch::{TouchDispatchArbiter, TouchDispatchStats, TouchRoute};
    pub use embedview_foundation::prelude::*;
}
