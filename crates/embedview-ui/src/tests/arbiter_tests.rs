use super::*;
use crate::engine::{ForwardingDisposition, NativeEngine};
use embedview_core::MessageQueue;
use embedview_foundation::{
    MotionAction, MotionEvent, TouchEventType, TouchPoint, ViewConfiguration,
};
use embedview_testing::ManualClock;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Mutex;

#[derive(Default)]
struct ScriptedEngine {
    script: VecDeque<ForwardingDisposition>,
    offers: Vec<TouchEventType>,
    fling_cancels: usize,
}

impl NativeEngine for ScriptedEngine {
    fn offer_touch_event(
        &mut self,
        event_type: TouchEventType,
        _timestamp_ms: u64,
        _points: &[TouchPoint],
    ) -> ForwardingDisposition {
        self.offers.push(event_type);
        self.script
            .pop_front()
            .unwrap_or(ForwardingDisposition::Forwarded)
    }

    fn fling_cancel(&mut self) {
        self.fling_cancels += 1;
    }
}

static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct WarningLog;

impl log::Log for WarningLog {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            WARNINGS
                .lock()
                .expect("warning log")
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static WARNING_LOG: WarningLog = WarningLog;

fn capture_warnings() {
    let _ = log::set_logger(&WARNING_LOG);
    log::set_max_level(log::LevelFilter::Warn);
}

struct Harness {
    clock: Rc<ManualClock>,
    queue: Rc<MessageQueue>,
    arbiter: TouchDispatchArbiter<ScriptedEngine>,
    down_time: u64,
}

impl Harness {
    fn new() -> Self {
        Self::scripted(&[])
    }

    fn scripted(script: &[ForwardingDisposition]) -> Self {
        let clock = Rc::new(ManualClock::new(0));
        let queue = Rc::new(MessageQueue::new());
        let engine = ScriptedEngine {
            script: script.iter().copied().collect(),
            ..ScriptedEngine::default()
        };
        let config = ViewConfiguration::default();
        let mut arbiter = TouchDispatchArbiter::new(config, engine, queue.clone(), clock.clone())
            .expect("default configuration");
        arbiter.set_need_touch_events(true);
        Self {
            clock,
            queue,
            arbiter,
            down_time: 0,
        }
    }

    fn touch(&mut self, time: u64, action: MotionAction, x: f32, y: f32) -> bool {
        if action == MotionAction::Down {
            self.down_time = time;
        }
        self.clock.set(time);
        self.arbiter
            .on_touch_event(MotionEvent::single(self.down_time, time, action, x, y))
    }

    fn advance_to(&mut self, time: u64) {
        self.clock.set(time);
        while let Some(message) = self.queue.next_due(time) {
            self.arbiter.run_callback(message.callback);
        }
    }

    fn timeout_deadline(&self) -> Option<u64> {
        self.queue
            .deadline_of(TouchDispatchArbiter::<ScriptedEngine>::TOUCH_ACK_TIMEOUT)
    }

    fn offers(&self) -> Vec<TouchEventType> {
        self.arbiter
            .engine()
            .map(|engine| engine.offers.clone())
            .unwrap_or_default()
    }
}

#[test]
fn stats_count_each_route() {
    let mut stats = TouchDispatchStats::default();
    stats.record(TouchRoute::Local);
    stats.record(TouchRoute::Replayed);
    stats.record(TouchRoute::Replayed);
    stats.record(TouchRoute::ScaleOnly);
    stats.record(TouchRoute::Dropped);

    assert_eq!(stats.local, 1);
    assert_eq!(stats.replayed, 2);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.settled(), 4);
}

#[test]
fn invalid_configuration_is_rejected() {
    let queue = Rc::new(MessageQueue::new());
    let clock = Rc::new(ManualClock::new(0));
    let config = ViewConfiguration::default().with_engine_ack_timeout(0);

    let result = TouchDispatchArbiter::new(config, ScriptedEngine::default(), queue, clock);

    assert!(result.is_err());
}

#[test]
fn page_without_handlers_never_sees_touches() {
    let mut h = Harness::new();
    h.arbiter.set_need_touch_events(false);

    h.touch(0, MotionAction::Down, 10.0, 10.0);
    h.touch(10, MotionAction::Up, 10.0, 10.0);

    assert!(h.offers().is_empty());
    assert_eq!(h.arbiter.stats().local, 2);
    assert_eq!(h.arbiter.pending_event_count(), 0);
}

#[test]
fn forwarded_down_arms_the_timeout_at_its_deadline() {
    let mut h = Harness::new();
    h.clock.set(40);
    h.touch(40, MotionAction::Down, 0.0, 0.0);

    assert_eq!(h.arbiter.pending_event_count(), 1);
    assert_eq!(h.timeout_deadline(), Some(240));

    h.clock.set(60);
    h.arbiter.confirm_touch_event(true);

    assert_eq!(h.timeout_deadline(), None);
    assert!(h.arbiter.is_ack_timeout_suppressed());
    assert_eq!(h.arbiter.stats().scale_only, 1);
}

#[test]
fn fresh_down_gets_a_full_timeout_after_an_engine_gesture() {
    let mut h = Harness::new();
    h.touch(0, MotionAction::Down, 0.0, 0.0);
    h.clock.set(5);
    h.arbiter.confirm_touch_event(true);

    h.touch(10, MotionAction::Move, 20.0, 0.0);
    h.touch(20, MotionAction::Up, 20.0, 0.0);
    h.touch(30, MotionAction::Down, 100.0, 100.0);
    assert_eq!(h.arbiter.pending_event_count(), 3);
    assert_eq!(h.timeout_deadline(), None);

    h.clock.set(400);
    h.arbiter.confirm_touch_event(true);
    assert_eq!(h.timeout_deadline(), None);
    h.arbiter.confirm_touch_event(true);

    assert_eq!(h.arbiter.pending_event_count(), 1);
    assert!(!h.arbiter.is_ack_timeout_suppressed());
    assert_eq!(h.timeout_deadline(), Some(600));
}

#[test]
fn timeout_leaves_one_ignored_ack_per_unanswered_offer() {
    let mut h = Harness::new();
    h.touch(0, MotionAction::Down, 0.0, 0.0);
    h.touch(10, MotionAction::Move, 20.0, 0.0);

    h.advance_to(200);

    assert_eq!(
        h.offers(),
        vec![
            TouchEventType::Start,
            TouchEventType::Move,
            TouchEventType::Cancel
        ]
    );
    assert_eq!(h.arbiter.pending_event_count(), 0);
    assert_eq!(h.arbiter.pending_acks_to_ignore(), 3);
    assert!(h.arbiter.skips_native());
    assert_eq!(h.arbiter.stats().timeouts, 1);

    for _ in 0..3 {
        h.arbiter.confirm_touch_event(true);
    }
    assert_eq!(h.arbiter.pending_acks_to_ignore(), 0);
    assert_eq!(h.arbiter.stats().ignored_acks, 3);

    // A stray extra ack finds nothing to consume.
    h.arbiter.confirm_touch_event(true);
    assert_eq!(h.arbiter.stats().replayed, 2);
}

#[test]
fn timeout_with_nothing_pending_is_harmless() {
    let mut h = Harness::new();

    assert!(h
        .arbiter
        .run_callback(TouchDispatchArbiter::<ScriptedEngine>::TOUCH_ACK_TIMEOUT));

    assert_eq!(h.arbiter.pending_acks_to_ignore(), 0);
    assert_eq!(h.arbiter.stats().timeouts, 0);
}

#[test]
fn converted_to_cancel_is_replayed_even_when_acknowledged_handled() {
    let mut h = Harness::scripted(&[ForwardingDisposition::ConvertedToCancel]);
    h.touch(0, MotionAction::Down, 0.0, 0.0);
    assert_eq!(h.timeout_deadline(), Some(0));

    h.arbiter.confirm_touch_event(true);

    let stats = h.arbiter.stats();
    assert_eq!(stats.replayed, 1);
    assert_eq!(stats.scale_only, 0);
    assert_eq!(h.timeout_deadline(), None);
    assert!(!h.arbiter.is_ack_timeout_suppressed());
}

#[test]
fn disabling_touch_events_drops_everything_buffered() {
    let mut h = Harness::new();
    h.touch(0, MotionAction::Down, 0.0, 0.0);
    h.touch(10, MotionAction::Move, 3.0, 0.0);
    h.touch(20, MotionAction::Move, 30.0, 0.0);

    h.arbiter.set_need_touch_events(false);

    let stats = h.arbiter.stats();
    assert_eq!(stats.dropped, 3);
    assert_eq!(stats.replayed, 0);
    assert_eq!(h.arbiter.pending_event_count(), 0);
    assert_eq!(h.arbiter.pending_acks_to_ignore(), 0);
    assert_eq!(h.timeout_deadline(), None);

    h.arbiter.confirm_touch_event(false);
    assert_eq!(h.arbiter.stats().replayed, 0);
}

#[test]
fn every_down_stops_a_running_fling() {
    let mut h = Harness::scripted(&[ForwardingDisposition::NotForwarded; 4]);

    h.touch(0, MotionAction::Down, 0.0, 0.0);
    h.touch(10, MotionAction::Up, 0.0, 0.0);
    h.touch(500, MotionAction::Down, 0.0, 0.0);

    let cancels = h.arbiter.engine().map(|engine| engine.fling_cancels);
    assert_eq!(cancels, Some(2));
}

#[test]
fn detached_engine_is_returned_and_input_stays_local() {
    let mut h = Harness::new();
    h.touch(0, MotionAction::Down, 0.0, 0.0);

    let engine = h.arbiter.detach_engine().expect("engine was attached");
    assert_eq!(engine.offers, vec![TouchEventType::Start]);
    assert_eq!(h.arbiter.pending_event_count(), 0);

    assert!(h.touch(10, MotionAction::Down, 5.0, 5.0));
    assert_eq!(h.arbiter.stats().local, 1);
    assert!(h.arbiter.detach_engine().is_none());
}

#[test]
fn replayed_sample_nobody_handles_is_reported_as_a_warning() {
    capture_warnings();
    let mut h = Harness::new();
    h.touch(0, MotionAction::Down, 0.0, 0.0);
    // A leftover from a gesture the recognizers no longer track.
    h.arbiter
        .on_touch_event(MotionEvent::single(5_000, 10, MotionAction::Move, 40.0, 0.0));
    assert_eq!(h.arbiter.pending_event_count(), 2);

    h.arbiter.confirm_touch_event(false);
    h.arbiter.confirm_touch_event(false);

    assert_eq!(h.arbiter.stats().replayed, 2);
    let warnings = WARNINGS.lock().expect("warning log");
    assert!(
        warnings
            .iter()
            .any(|line| line == "unhandled deferred touch event Move"),
        "{warnings:?}"
    );
}
