use super::{
    distance_squared, truncated_distance_squared, GestureDetector, GestureEvent, GestureListener,
    GesturePoint,
};
use crate::input::{MotionAction, MotionEvent};
use crate::view_configuration::ViewConfiguration;
use embedview_core::{CallbackId, Clock, Handler};
use std::rc::Rc;

/// Owns the long-press timer on behalf of a [`GestureDetector`].
///
/// Events can sit in the touch queue waiting for the native engine while the
/// detector has not seen them yet. The proxy arms the long-press timer as
/// soon as a `Down` reaches the detector and lets the caller cancel it from
/// events the detector has not seen, so a quick tap or a scroll that is
/// still queued does not turn into a long press.
///
/// It also tracks whether the current gesture has moved past the touch slop,
/// which decides when move events start being offered to the engine.
pub struct GestureDetectorProxy {
    detector: GestureDetector,
    handler: Rc<dyn Handler>,
    current_down: Option<GesturePoint>,
    touch_slop_square: i64,
    long_press_delay_ms: u64,
    in_long_press: bool,

    move_confirmed: bool,
    touch_initial: (i32, i32),
}

impl GestureDetectorProxy {
    pub const LONG_PRESS: CallbackId = CallbackId::new(12, "long_press");

    pub fn new(config: &ViewConfiguration, handler: Rc<dyn Handler>, clock: Rc<dyn Clock>) -> Self {
        let mut detector = GestureDetector::new(config, Rc::clone(&handler), clock);
        detector.set_is_longpress_enabled(false);
        Self {
            detector,
            handler,
            current_down: None,
            touch_slop_square: config.touch_slop_square(),
            long_press_delay_ms: config.tap_timeout_ms + config.long_press_timeout_ms,
            in_long_press: false,
            move_confirmed: false,
            touch_initial: (0, 0),
        }
    }

    pub fn detector(&self) -> &GestureDetector {
        &self.detector
    }

    /// Feeds the detector, arming the long-press timer on `Down`.
    pub fn on_touch_event(
        &mut self,
        event: &MotionEvent,
        listener: &mut dyn GestureListener,
    ) -> bool {
        if event.action == MotionAction::Down {
            let down = GesturePoint::of(event);
            self.current_down = Some(down);
            self.handler
                .post_at_time(Self::LONG_PRESS, down.down_time + self.long_press_delay_ms);
            self.in_long_press = false;
        }
        self.detector.on_touch_event(event, listener)
    }

    /// A `Down` starts a new gesture; anything else must belong to the
    /// current one.
    pub fn can_handle(&self, event: &MotionEvent) -> bool {
        event.action == MotionAction::Down
            || self
                .current_down
                .is_some_and(|down| down.down_time == event.down_time)
    }

    /// Cancels the pending long press if `event` rules it out: a move past
    /// the slop, or a lift before the deadline.
    pub fn cancel_long_press_if_needed(&mut self, event: &MotionEvent) {
        if !self.has_pending_long_press() {
            return;
        }
        let Some(down) = self.current_down else {
            return;
        };
        if event.down_time != down.down_time {
            return;
        }
        match event.action {
            MotionAction::Move => {
                let distance = truncated_distance_squared(
                    event.x() - down.position.x,
                    event.y() - down.position.y,
                );
                if distance > self.touch_slop_square {
                    self.in_long_press = false;
                    self.handler.remove_callbacks(Self::LONG_PRESS);
                }
            }
            MotionAction::Up => {
                if down.down_time + self.long_press_delay_ms > event.event_time {
                    self.in_long_press = false;
                    self.handler.remove_callbacks(Self::LONG_PRESS);
                }
            }
            _ => {}
        }
    }

    /// Applies [`cancel_long_press_if_needed`](Self::cancel_long_press_if_needed)
    /// to queued events of the current gesture, in order, stopping at the
    /// first event of another gesture.
    pub fn cancel_long_press_for_pending<'a, I>(&mut self, pending: I)
    where
        I: IntoIterator<Item = &'a MotionEvent>,
    {
        let Some(down) = self.current_down else {
            return;
        };
        if !self.has_pending_long_press() {
            return;
        }
        for event in pending {
            if event.down_time != down.down_time {
                break;
            }
            self.cancel_long_press_if_needed(event);
        }
    }

    pub fn cancel_long_press(&mut self) {
        self.handler.remove_callbacks(Self::LONG_PRESS);
    }

    pub fn has_pending_long_press(&self) -> bool {
        self.handler.has_callbacks(Self::LONG_PRESS)
    }

    /// Whether the current gesture already fired a long press. A tap from
    /// the same down should then be ignored.
    pub fn is_in_long_press(&self) -> bool {
        self.in_long_press
    }

    pub fn dispatch_long_press(&mut self, listener: &mut dyn GestureListener) {
        let Some(down) = self.current_down else {
            log::warn!("long press fired without a current down");
            return;
        };
        self.in_long_press = true;
        listener.on_gesture(GestureEvent::LongPress(down));
    }

    /// Delivers a due callback to the proxy or its detector. Returns `false`
    /// if `id` belongs to neither.
    pub fn on_callback(&mut self, id: CallbackId, listener: &mut dyn GestureListener) -> bool {
        if id == Self::LONG_PRESS {
            self.dispatch_long_press(listener);
            true
        } else {
            self.detector.on_callback(id, listener)
        }
    }

    /// Drops the long-press timer and every detector timer.
    pub fn cancel_all(&mut self) {
        self.cancel_long_press();
        self.detector.cancel();
        self.in_long_press = false;
    }

    /// Records where a gesture started when its `Down` is about to be offered
    /// to the engine.
    pub fn on_offer_touch_event_to_native(&mut self, event: &MotionEvent) {
        if event.action == MotionAction::Down {
            self.move_confirmed = false;
            self.touch_initial = event.position().rounded();
        }
    }

    /// Whether a move has now travelled at least the touch slop from the
    /// gesture start. Once true it stays true until the next `Down`.
    pub fn confirm_offer_move_event_to_native(&mut self, event: &MotionEvent) -> bool {
        if !self.move_confirmed {
            let (x, y) = event.position().rounded();
            let dx = i64::from(x) - i64::from(self.touch_initial.0);
            let dy = i64::from(y) - i64::from(self.touch_initial.1);
            if distance_squared(dx, dy) >= self.touch_slop_square {
                self.move_confirmed = true;
            }
        }
        self.move_confirmed
    }
}
