//! Test rule wiring a [`TouchDispatchArbiter`] to a manual clock and a
//! message queue.
//!
//! # Example
//!
//! ```
//! use embedview_foundation::MotionAction;
//! use embedview_testing::TouchTestRule;
//!
//! let mut rule = TouchTestRule::new();
//! rule.touch(0, MotionAction::Down, 10.0, 10.0);
//! rule.advance_to(200);
//! assert_eq!(rule.arbiter().pending_event_count(), 0);
//! ```

use crate::clock::ManualClock;
use crate::engine::{EngineCall, RecordingEngine};
use embedview_core::{Clock, MessageQueue};
use embedview_foundation::{ConfigError, MotionAction, MotionEvent, ViewConfiguration};
use embedview_ui::{TouchDispatchArbiter, TouchRoute};
use std::cell::RefCell;
use std::rc::Rc;

type RouteLog = Rc<RefCell<Vec<(TouchRoute, MotionAction)>>>;

/// Drives a [`TouchDispatchArbiter`] the way a host UI thread would.
///
/// Every sample is delivered after running the callbacks due at its
/// timestamp, and [`advance_to`](Self::advance_to) lets time pass between
/// samples. The page is registered as wanting touch events.
pub struct TouchTestRule {
    clock: Rc<ManualClock>,
    queue: Rc<MessageQueue>,
    arbiter: TouchDispatchArbiter<RecordingEngine>,
    routes: RouteLog,
    down_time: u64,
}

impl TouchTestRule {
    /// Default configuration and an engine that forwards everything.
    pub fn new() -> Self {
        Self::with_engine(RecordingEngine::forwarding())
    }

    pub fn with_engine(engine: RecordingEngine) -> Self {
        Self::with_config(ViewConfiguration::default(), engine)
            .expect("default view configuration is valid")
    }

    pub fn with_config(
        config: ViewConfiguration,
        engine: RecordingEngine,
    ) -> Result<Self, ConfigError> {
        let clock = Rc::new(ManualClock::new(0));
        let queue = Rc::new(MessageQueue::new());
        let mut arbiter = TouchDispatchArbiter::new(config, engine, queue.clone(), clock.clone())?;
        arbiter.set_need_touch_events(true);

        let routes: RouteLog = Rc::default();
        let log = Rc::clone(&routes);
        arbiter.set_observer(Some(Box::new(move |route, event: &MotionEvent| {
            log.borrow_mut().push((route, event.action));
        })));

        Ok(Self {
            clock,
            queue,
            arbiter,
            routes,
            down_time: 0,
        })
    }

    /// Single-pointer sample of the current gesture at `time`. A `Down`
    /// starts a new gesture.
    pub fn touch(&mut self, time: u64, action: MotionAction, x: f32, y: f32) -> bool {
        if action == MotionAction::Down {
            self.down_time = time;
        }
        let event = MotionEvent::single(self.down_time, time, action, x, y);
        self.send(event)
    }

    /// Delivers `event` at its own timestamp.
    pub fn send(&mut self, event: MotionEvent) -> bool {
        self.advance_to(event.event_time);
        self.arbiter.on_touch_event(event)
    }

    /// The engine acknowledges the oldest offered sample.
    pub fn ack(&mut self, handled: bool) {
        self.arbiter.confirm_touch_event(handled);
    }

    /// Moves the clock to `time`, running every callback that comes due on
    /// the way.
    pub fn advance_to(&mut self, time: u64) {
        while let Some(message) = self.queue.next_due(time) {
            self.clock.set(message.when.max(self.clock.uptime_millis()));
            self.arbiter.run_callback(message.callback);
        }
        self.clock.set(time);
    }

    pub fn advance_by(&mut self, millis: u64) {
        let target = self.clock.uptime_millis() + millis;
        self.advance_to(target);
    }

    pub fn now(&self) -> u64 {
        self.clock.uptime_millis()
    }

    pub fn arbiter(&self) -> &TouchDispatchArbiter<RecordingEngine> {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut TouchDispatchArbiter<RecordingEngine> {
        &mut self.arbiter
    }

    /// The engine, or `None` once detached.
    pub fn engine(&self) -> Option<&RecordingEngine> {
        self.arbiter.engine()
    }

    pub fn engine_mut(&mut self) -> Option<&mut RecordingEngine> {
        self.arbiter.engine_mut()
    }

    /// Commands received so far, empty once the engine is detached.
    pub fn engine_calls(&self) -> Vec<EngineCall> {
        self.engine()
            .map(|engine| engine.calls().to_vec())
            .unwrap_or_default()
    }

    /// Gesture commands received so far, without touch offers or fling
    /// cancels.
    pub fn gesture_calls(&self) -> Vec<EngineCall> {
        self.engine()
            .map(RecordingEngine::gesture_calls)
            .unwrap_or_default()
    }

    /// Routing decisions reported so far.
    pub fn routes(&self) -> Vec<(TouchRoute, MotionAction)> {
        self.routes.borrow().clone()
    }

    /// Routing decisions reported since the last call.
    pub fn take_routes(&mut self) -> Vec<(TouchRoute, MotionAction)> {
        std::mem::take(&mut *self.routes.borrow_mut())
    }

    /// When the acknowledgment timeout is due, if armed.
    pub fn ack_timeout_deadline(&self) -> Option<u64> {
        self.queue
            .deadline_of(TouchDispatchArbiter::<RecordingEngine>::TOUCH_ACK_TIMEOUT)
    }

    pub fn message_queue(&self) -> &MessageQueue {
        &self.queue
    }
}

impl Default for TouchTestRule {
    fn default() -> Self {
        Self::new()
    }
}
