//! Deadline-ordered callback queue backing [`Handler`].
//!
//! Callbacks are just ids sorted by due time. The host asks for the next due
//! one, routes it, and asks again, so callbacks posted or removed while one
//! is being handled are honored.

use crate::platform::{CallbackId, Handler};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};

/// A scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub callback: CallbackId,
    pub when: u64,
    sequence: u64,
}

/// Single-threaded message queue for the UI thread.
#[derive(Debug, Default)]
pub struct MessageQueue {
    // Kept sorted by (when, sequence).
    messages: RefCell<SmallVec<[Message; 4]>>,
    next_sequence: Cell<u64>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the earliest message due at `now`.
    ///
    /// Messages with equal deadlines come out in posting order.
    pub fn next_due(&self, now: u64) -> Option<Message> {
        let mut messages = self.messages.borrow_mut();
        match messages.first() {
            Some(first) if first.when <= now => Some(messages.remove(0)),
            _ => None,
        }
    }

    /// Deadline of the earliest pending message, if any.
    pub fn next_wake_time(&self) -> Option<u64> {
        self.messages.borrow().first().map(|message| message.when)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Deadline of the pending post for `callback`.
    pub fn deadline_of(&self, callback: CallbackId) -> Option<u64> {
        self.messages
            .borrow()
            .iter()
            .find(|message| message.callback == callback)
            .map(|message| message.when)
    }
}

impl Handler for MessageQueue {
    fn post_at_time(&self, callback: CallbackId, uptime_millis: u64) {
        let sequence = self.next_sequence.get();
        self.next_sequence.set(sequence + 1);

        let mut messages = self.messages.borrow_mut();
        messages.retain(|message| message.callback != callback);
        let message = Message {
            callback,
            when: uptime_millis,
            sequence,
        };
        let index = messages
            .iter()
            .position(|existing| (existing.when, existing.sequence) > (message.when, sequence))
            .unwrap_or(messages.len());
        messages.insert(index, message);
        log::trace!("post {:?} at {}", callback, uptime_millis);
    }

    fn remove_callbacks(&self, callback: CallbackId) {
        self.messages
            .borrow_mut()
            .retain(|message| message.callback != callback);
    }

    fn has_callbacks(&self, callback: CallbackId) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|message| message.callback == callback)
    }
}

#[cfg(test)]
#[path = "tests/message_queue_tests.rs"]
mod tests;
