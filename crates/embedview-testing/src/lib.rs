//! Testing utilities and harness for embedview

pub mod clock;
pub mod engine;
pub mod events;
pub mod rule;

pub use clock::ManualClock;
pub use engine::{EngineCall, RecordingEngine};
pub use events::MotionEventBuilder;
pub use rule::TouchTestRule;

pub mod prelude {
    pub use crate::clock::ManualClock;
    pub use crate::engine::{EngineCall, RecordingEngine};
    pub use crate::events::MotionEventBuilder;
    pub use crate::rule::TouchTestRule;
}
