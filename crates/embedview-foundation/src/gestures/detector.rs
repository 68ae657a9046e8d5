use super::{focus_of, truncated_distance_squared, GestureEvent, GestureListener, GesturePoint};
use crate::input::{MotionAction, MotionEvent};
use crate::velocity_tracker::VelocityTracker;
use crate::view_configuration::ViewConfiguration;
use embedview_core::{CallbackId, Clock, Handler};
use embedview_ui_graphics::Point;
use std::rc::Rc;

/// Pan, fling, tap and double-tap recognizer.
///
/// Deferred recognitions (show press, tap confirmation, long press) are
/// scheduled on the shared [`Handler`] and delivered when the host routes
/// the callback back through [`GestureDetector::on_callback`].
pub struct GestureDetector {
    handler: Rc<dyn Handler>,
    clock: Rc<dyn Clock>,
    touch_slop_square: i64,
    double_tap_slop_square: i64,
    tap_timeout_ms: u64,
    long_press_timeout_ms: u64,
    double_tap_timeout_ms: u64,
    minimum_fling_velocity: f32,
    maximum_fling_velocity: f32,

    still_down: bool,
    deferred_confirm_single_tap: bool,
    in_long_press: bool,
    always_in_tap_region: bool,
    always_in_bigger_tap_region: bool,
    is_double_tapping: bool,
    is_longpress_enabled: bool,

    current_down: Option<GesturePoint>,
    previous_up: Option<GesturePoint>,
    last_focus: Point,
    down_focus: Point,
    velocity_tracker: VelocityTracker,
}

impl GestureDetector {
    pub const SHOW_PRESS: CallbackId = CallbackId::new(10, "show_press");
    pub const TAP: CallbackId = CallbackId::new(11, "tap");
    pub const LONG_PRESS: CallbackId = CallbackId::new(13, "detector_long_press");

    pub fn new(config: &ViewConfiguration, handler: Rc<dyn Handler>, clock: Rc<dyn Clock>) -> Self {
        Self {
            handler,
            clock,
            touch_slop_square: config.touch_slop_square(),
            double_tap_slop_square: config.double_tap_slop_square(),
            tap_timeout_ms: config.tap_timeout_ms,
            long_press_timeout_ms: config.long_press_timeout_ms,
            double_tap_timeout_ms: config.double_tap_timeout_ms,
            minimum_fling_velocity: config.minimum_fling_velocity,
            maximum_fling_velocity: config.maximum_fling_velocity,
            still_down: false,
            deferred_confirm_single_tap: false,
            in_long_press: false,
            always_in_tap_region: false,
            always_in_bigger_tap_region: false,
            is_double_tapping: false,
            is_longpress_enabled: true,
            current_down: None,
            previous_up: None,
            last_focus: Point::ZERO,
            down_focus: Point::ZERO,
            velocity_tracker: VelocityTracker::new(),
        }
    }

    pub fn set_is_longpress_enabled(&mut self, enabled: bool) {
        self.is_longpress_enabled = enabled;
    }

    pub fn is_longpress_enabled(&self) -> bool {
        self.is_longpress_enabled
    }

    pub fn is_double_tapping(&self) -> bool {
        self.is_double_tapping
    }

    /// Feeds one motion event. Returns whether the listener consumed
    /// whatever the event triggered.
    pub fn on_touch_event(
        &mut self,
        event: &MotionEvent,
        listener: &mut dyn GestureListener,
    ) -> bool {
        self.velocity_tracker.add_movement(event);
        let focus = focus_of(event);
        let mut handled = false;

        match event.action {
            MotionAction::PointerDown { .. } => {
                self.down_focus = focus;
                self.last_focus = focus;
                self.cancel_taps();
            }
            MotionAction::PointerUp { .. } => {
                self.down_focus = focus;
                self.last_focus = focus;
            }
            MotionAction::Down => {
                let had_tap_message = self.handler.has_callbacks(Self::TAP);
                if had_tap_message {
                    self.handler.remove_callbacks(Self::TAP);
                }
                let is_double_tap = match (self.current_down, self.previous_up) {
                    (Some(first_down), Some(first_up)) if had_tap_message => {
                        self.is_considered_double_tap(first_down, first_up, event)
                    }
                    _ => false,
                };
                if is_double_tap {
                    self.is_double_tapping = true;
                    if let Some(first_down) = self.current_down {
                        handled |= listener.on_gesture(GestureEvent::DoubleTap(first_down));
                    }
                    handled |= listener.on_gesture(GestureEvent::DoubleTapEvent {
                        action: event.action,
                        at: GesturePoint::of(event),
                    });
                } else {
                    let now = self.clock.uptime_millis();
                    self.handler
                        .post_at_time(Self::TAP, now + self.double_tap_timeout_ms);
                }

                self.down_focus = focus;
                self.last_focus = focus;
                let down = GesturePoint::of(event);
                self.current_down = Some(down);
                self.always_in_tap_region = true;
                self.always_in_bigger_tap_region = true;
                self.still_down = true;
                self.in_long_press = false;
                self.deferred_confirm_single_tap = false;

                if self.is_longpress_enabled {
                    self.handler.post_at_time(
                        Self::LONG_PRESS,
                        down.down_time + self.tap_timeout_ms + self.long_press_timeout_ms,
                    );
                }
                self.handler
                    .post_at_time(Self::SHOW_PRESS, down.down_time + self.tap_timeout_ms);
                handled |= listener.on_gesture(GestureEvent::Down(down));
            }
            MotionAction::Move => {
                if self.in_long_press {
                    return false;
                }
                let scroll_x = self.last_focus.x - focus.x;
                let scroll_y = self.last_focus.y - focus.y;
                if self.is_double_tapping {
                    handled |= listener.on_gesture(GestureEvent::DoubleTapEvent {
                        action: event.action,
                        at: GesturePoint::of(event),
                    });
                } else if self.always_in_tap_region {
                    let distance = truncated_distance_squared(
                        focus.x - self.down_focus.x,
                        focus.y - self.down_focus.y,
                    );
                    if distance > self.touch_slop_square {
                        handled = self.dispatch_scroll(event, scroll_x, scroll_y, listener);
                        self.last_focus = focus;
                        self.always_in_tap_region = false;
                        self.always_in_bigger_tap_region = false;
                        self.handler.remove_callbacks(Self::TAP);
                        self.handler.remove_callbacks(Self::SHOW_PRESS);
                        self.handler.remove_callbacks(Self::LONG_PRESS);
                    }
                } else if scroll_x.abs() >= 1.0 || scroll_y.abs() >= 1.0 {
                    handled = self.dispatch_scroll(event, scroll_x, scroll_y, listener);
                    self.last_focus = focus;
                }
            }
            MotionAction::Up => {
                self.still_down = false;
                let up = GesturePoint::of(event);
                if self.is_double_tapping {
                    handled |= listener.on_gesture(GestureEvent::DoubleTapEvent {
                        action: event.action,
                        at: up,
                    });
                } else if self.in_long_press {
                    self.handler.remove_callbacks(Self::TAP);
                    self.in_long_press = false;
                } else if self.always_in_tap_region {
                    handled = listener.on_gesture(GestureEvent::SingleTapUp(up));
                    if self.deferred_confirm_single_tap {
                        listener.on_gesture(GestureEvent::SingleTapConfirmed(up));
                    }
                } else {
                    let (velocity_x, velocity_y) = self
                        .velocity_tracker
                        .compute_velocity(self.maximum_fling_velocity);
                    if velocity_x.abs() > self.minimum_fling_velocity
                        || velocity_y.abs() > self.minimum_fling_velocity
                    {
                        if let Some(start) = self.current_down {
                            handled = listener.on_gesture(GestureEvent::Fling {
                                start,
                                current: up,
                                velocity_x,
                                velocity_y,
                            });
                        }
                    }
                }
                self.previous_up = Some(up);
                self.velocity_tracker.clear();
                self.is_double_tapping = false;
                self.deferred_confirm_single_tap = false;
                self.handler.remove_callbacks(Self::SHOW_PRESS);
                self.handler.remove_callbacks(Self::LONG_PRESS);
            }
            MotionAction::Cancel => self.cancel(),
            MotionAction::Outside => {}
        }
        handled
    }

    /// Delivers a due callback. Returns `false` if `id` is not one of this
    /// detector's.
    pub fn on_callback(&mut self, id: CallbackId, listener: &mut dyn GestureListener) -> bool {
        if id == Self::SHOW_PRESS {
            if let Some(down) = self.current_down {
                listener.on_gesture(GestureEvent::ShowPress(down));
            }
        } else if id == Self::LONG_PRESS {
            self.handler.remove_callbacks(Self::TAP);
            self.deferred_confirm_single_tap = false;
            self.in_long_press = true;
            if let Some(down) = self.current_down {
                listener.on_gesture(GestureEvent::LongPress(down));
            }
        } else if id == Self::TAP {
            if self.still_down {
                self.deferred_confirm_single_tap = true;
            } else if let Some(down) = self.current_down {
                listener.on_gesture(GestureEvent::SingleTapConfirmed(down));
            }
        } else {
            return false;
        }
        true
    }

    /// Drops every timer and resets per-gesture state.
    pub fn cancel(&mut self) {
        self.handler.remove_callbacks(Self::SHOW_PRESS);
        self.handler.remove_callbacks(Self::LONG_PRESS);
        self.handler.remove_callbacks(Self::TAP);
        self.velocity_tracker.clear();
        self.is_double_tapping = false;
        self.still_down = false;
        self.always_in_tap_region = false;
        self.always_in_bigger_tap_region = false;
        self.deferred_confirm_single_tap = false;
        self.in_long_press = false;
    }

    fn cancel_taps(&mut self) {
        self.handler.remove_callbacks(Self::SHOW_PRESS);
        self.handler.remove_callbacks(Self::LONG_PRESS);
        self.handler.remove_callbacks(Self::TAP);
        self.is_double_tapping = false;
        self.always_in_tap_region = false;
        self.always_in_bigger_tap_region = false;
        self.deferred_confirm_single_tap = false;
        self.in_long_press = false;
    }

    fn dispatch_scroll(
        &self,
        event: &MotionEvent,
        distance_x: f32,
        distance_y: f32,
        listener: &mut dyn GestureListener,
    ) -> bool {
        let Some(start) = self.current_down else {
            return false;
        };
        listener.on_gesture(GestureEvent::Scroll {
            start,
            current: GesturePoint::of(event),
            distance_x,
            distance_y,
        })
    }

    fn is_considered_double_tap(
        &self,
        first_down: GesturePoint,
        first_up: GesturePoint,
        second_down: &MotionEvent,
    ) -> bool {
        if !self.always_in_bigger_tap_region {
            return false;
        }
        if second_down.event_time.saturating_sub(first_up.event_time) > self.double_tap_timeout_ms
        {
            return false;
        }
        let distance = truncated_distance_squared(
            first_down.position.x - second_down.x(),
            first_down.position.y - second_down.y(),
        );
        distance < self.double_tap_slop_square
    }
}
