//! Core platform services for the embedview input pipeline.
//!
//! Everything here runs on the single UI thread. The host owns a
//! [`MessageQueue`], hands it to the view as an `Rc<dyn Handler>`, and
//! services it from its event loop.

mod message_queue;
mod platform;
mod std_clock;

pub use message_queue::{Message, MessageQueue};
pub use platform::{CallbackId, Clock, Handler};
pub use std_clock::StdClock;

pub mod prelude {
    pub use crate::message_queue::MessageQueue;
    pub use crate::platform::{CallbackId, Clock, Handler};
}
