use crate::engine::ForwardingDisposition;
use embedview_foundation::MotionEvent;
use std::collections::VecDeque;

/// A touch sample waiting for the engine's verdict, or waiting behind one.
#[derive(Debug)]
pub struct PendingMotionEvent {
    /// Position-independent identity, unique for the queue's lifetime.
    pub id: u64,
    pub event: MotionEvent,
    pub disposition: ForwardingDisposition,
    /// Uptime after which engine silence means "not interested".
    pub timeout_deadline: u64,
}

impl PendingMotionEvent {
    /// Whether an acknowledgment is expected for this entry.
    pub fn was_offered(&self) -> bool {
        self.disposition != ForwardingDisposition::NotForwarded
    }
}

/// FIFO of buffered touch samples in arrival order.
#[derive(Debug, Default)]
pub struct PendingEventQueue {
    entries: VecDeque<PendingMotionEvent>,
    next_id: u64,
}

impl PendingEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample and returns the id assigned to it.
    pub fn push_back(
        &mut self,
        event: MotionEvent,
        disposition: ForwardingDisposition,
        timeout_deadline: u64,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(PendingMotionEvent {
            id,
            event,
            disposition,
            timeout_deadline,
        });
        id
    }

    pub fn front(&self) -> Option<&PendingMotionEvent> {
        self.entries.front()
    }

    pub fn back_mut(&mut self) -> Option<&mut PendingMotionEvent> {
        self.entries.back_mut()
    }

    pub fn pop_front(&mut self) -> Option<PendingMotionEvent> {
        self.entries.pop_front()
    }

    /// Buffered samples in order, without their bookkeeping.
    pub fn events(&self) -> impl Iterator<Item = &MotionEvent> {
        self.entries.iter().map(|pending| &pending.event)
    }

    /// Removes every entry, handing them to the caller in order.
    pub fn drain(&mut self) -> impl Iterator<Item = PendingMotionEvent> + '_ {
        self.entries.drain(..)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedview_foundation::MotionAction;

    fn sample(time: u64, action: MotionAction) -> MotionEvent {
        MotionEvent::single(0, time, action, 0.0, 0.0)
    }

    #[test]
    fn entries_leave_in_arrival_order_with_unique_ids() {
        let mut queue = PendingEventQueue::new();
        let first = queue.push_back(
            sample(0, MotionAction::Down),
            ForwardingDisposition::Forwarded,
            200,
        );
        let second = queue.push_back(
            sample(10, MotionAction::Move),
            ForwardingDisposition::NotForwarded,
            10,
        );

        assert_ne!(first, second);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.front().map(|p| p.id), Some(first));
        assert_eq!(queue.back_mut().map(|p| p.id), Some(second));

        let head = queue.pop_front().expect("head");
        assert_eq!(head.event.action, MotionAction::Down);
        assert!(head.was_offered());
        let next = queue.pop_front().expect("second");
        assert!(!next.was_offered());
        assert!(queue.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_drain() {
        let mut queue = PendingEventQueue::new();
        let first = queue.push_back(
            sample(0, MotionAction::Down),
            ForwardingDisposition::Forwarded,
            200,
        );
        assert_eq!(queue.drain().count(), 1);
        let second = queue.push_back(
            sample(5, MotionAction::Down),
            ForwardingDisposition::Forwarded,
            205,
        );

        assert!(second > first);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drain_yields_everything_in_order() {
        let mut queue = PendingEventQueue::new();
        for time in 0..3 {
            queue.push_back(
                sample(time, MotionAction::Move),
                ForwardingDisposition::Forwarded,
                200,
            );
        }

        let times: Vec<u64> = queue.drain().map(|p| p.event.event_time).collect();
        assert_eq!(times, vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn tail_can_be_extended_in_place() {
        let mut queue = PendingEventQueue::new();
        queue.push_back(
            sample(0, MotionAction::Move),
            ForwardingDisposition::Forwarded,
            200,
        );
        queue
            .back_mut()
            .expect("tail")
            .event
            .add_batch(16, &[embedview_foundation::PointerCoords::new(0, 4.0, 0.0)])
            .expect("same pointer count");

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.events().next().map(|e| e.history_size()), Some(1));
    }
}
