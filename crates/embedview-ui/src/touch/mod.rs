//! Arbitration of raw touch samples between the native engine and the
//! local gesture recognizers.

mod arbiter;
mod pending_queue;

pub use arbiter::TouchDispatchArbiter;
pub use pending_queue::{PendingEventQueue, PendingMotionEvent};

/// Where a touch sample went. Reported to the route observer once per
/// routing decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchRoute {
    /// Handled by the local recognizers on arrival.
    Local,
    /// Offered to the engine and queued for its acknowledgment.
    Forwarded,
    /// Queued without being offered, behind samples that were.
    Queued,
    /// Merged into the queued move before it.
    Coalesced,
    /// Taken out of the queue and handled locally.
    Replayed,
    /// The engine handled it; only the pinch recognizer saw it.
    ScaleOnly,
    /// A cancel sent to the engine after its acknowledgment timed out.
    SyntheticCancel,
    /// Discarded from the queue without being handled.
    Dropped,
}

/// Running counts of routing decisions, one per [`TouchRoute`] plus ack
/// bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchDispatchStats {
    pub local: u64,
    pub forwarded: u64,
    pub queued: u64,
    pub coalesced: u64,
    pub replayed: u64,
    pub scale_only: u64,
    pub synthetic_cancels: u64,
    pub dropped: u64,
    pub timeouts: u64,
    pub ignored_acks: u64,
}

impl TouchDispatchStats {
    pub(crate) fn record(&mut self, route: TouchRoute) {
        let counter = match route {
            TouchRoute::Local => &mut self.local,
            TouchRoute::Forwarded => &mut self.forwarded,
            TouchRoute::Queued => &mut self.queued,
            TouchRoute::Coalesced => &mut self.coalesced,
            TouchRoute::Replayed => &mut self.replayed,
            TouchRoute::ScaleOnly => &mut self.scale_only,
            TouchRoute::SyntheticCancel => &mut self.synthetic_cancels,
            TouchRoute::Dropped => &mut self.dropped,
        };
        *counter += 1;
    }

    /// Samples that reached a final destination: handled locally, replayed,
    /// or taken by the engine.
    pub fn settled(&self) -> u64 {
        self.local + self.replayed + self.scale_only
    }
}

#[cfg(test)]
#[path = "../tests/arbiter_tests.rs"]
mod tests;
