//! Platform abstraction traits for the input pipeline.
//!
//! These traits let the arbiter and the gesture recognizers delegate timing
//! and deferred work to the host's UI thread without depending on a
//! particular event loop.

use std::fmt;

/// Identity of a deferred callback.
///
/// Each component that schedules work owns a fixed set of ids; posting an id
/// that is already pending replaces the earlier post, and removing it cancels
/// whatever is pending under that id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId {
    raw: u32,
    name: &'static str,
}

impl CallbackId {
    pub const fn new(raw: u32, name: &'static str) -> Self {
        Self { raw, name }
    }

    pub fn raw(&self) -> u32 {
        self.raw
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.raw)
    }
}

/// Runs callbacks once, at or after an absolute uptime, on the UI thread.
///
/// The handler never calls back into the view itself. The host drains due
/// callbacks and routes them, so a callback firing can never re-enter a
/// component that is in the middle of handling an event.
pub trait Handler {
    /// Schedules `callback` at `uptime_millis`, replacing any pending post
    /// with the same id.
    fn post_at_time(&self, callback: CallbackId, uptime_millis: u64);

    /// Cancels a not-yet-fired callback. Does nothing if none is pending.
    fn remove_callbacks(&self, callback: CallbackId);

    /// Whether `callback` is pending.
    fn has_callbacks(&self, callback: CallbackId) -> bool;
}

/// Monotonic time source in milliseconds since an arbitrary origin.
///
/// Motion event timestamps and scheduled deadlines share this time base.
pub trait Clock {
    fn uptime_millis(&self) -> u64;
}
