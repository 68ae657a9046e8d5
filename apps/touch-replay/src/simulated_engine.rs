use crate::options::PageBehavior;
use embedview_core::Clock;
use embedview_foundation::{TouchEventType, TouchPoint};
use embedview_ui::{ForwardingDisposition, NativeEngine};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Acknowledgments the simulated page will send, as (due time, handled).
pub type AckSchedule = Rc<RefCell<VecDeque<(u64, bool)>>>;

/// Stands in for the renderer: answers offered touches after a fixed
/// latency and logs the gesture commands it receives.
pub struct SimulatedEngine {
    page: PageBehavior,
    latency_ms: u64,
    clock: Rc<dyn Clock>,
    acks: AckSchedule,
}

impl SimulatedEngine {
    pub fn new(
        page: PageBehavior,
        latency_ms: u64,
        clock: Rc<dyn Clock>,
        acks: AckSchedule,
    ) -> Self {
        Self {
            page,
            latency_ms,
            clock,
            acks,
        }
    }
}

impl NativeEngine for SimulatedEngine {
    fn offer_touch_event(
        &mut self,
        event_type: TouchEventType,
        timestamp_ms: u64,
        points: &[TouchPoint],
    ) -> ForwardingDisposition {
        let handled = match self.page {
            PageBehavior::NoHandlers => return ForwardingDisposition::NotForwarded,
            PageBehavior::Ignores => false,
            PageBehavior::Consumes => true,
            PageBehavior::Silent => {
                log::debug!("page swallowed {event_type:?} at {timestamp_ms}");
                return ForwardingDisposition::Forwarded;
            }
        };
        let due = self.clock.uptime_millis() + self.latency_ms;
        self.acks.borrow_mut().push_back((due, handled));
        log::debug!(
            "page got {event_type:?} with {} point(s), answers at {due}",
            points.len()
        );
        ForwardingDisposition::Forwarded
    }

    fn scroll_begin(&mut self, x: i32, y: i32) {
        log::info!("scroll_begin({x}, {y})");
    }

    fn scroll_by(&mut self, dx: i32, dy: i32) {
        log::info!("scroll_by({dx}, {dy})");
    }

    fn scroll_end(&mut self) {
        log::info!("scroll_end");
    }

    fn fling_start(&mut self, x: i32, y: i32, velocity_x: i32, velocity_y: i32) {
        log::info!("fling_start({x}, {y}) at ({velocity_x}, {velocity_y}) px/s");
    }

    fn fling_cancel(&mut self) {
        log::debug!("fling_cancel");
    }

    fn pinch_begin(&mut self) {
        log::info!("pinch_begin");
    }

    fn pinch_by(&mut self, delta: f32, anchor_x: i32, anchor_y: i32) {
        log::info!("pinch_by({delta:.3}) around ({anchor_x}, {anchor_y})");
    }

    fn pinch_end(&mut self) {
        log::info!("pinch_end");
    }

    fn show_press_state(&mut self, x: i32, y: i32) {
        log::info!("show_press({x}, {y})");
    }

    fn single_tap(&mut self, x: i32, y: i32, _check_multiple_targets: bool) {
        log::info!("single_tap({x}, {y})");
    }

    fn double_tap(&mut self, x: i32, y: i32) {
        log::info!("double_tap({x}, {y})");
    }

    fn long_press(&mut self, x: i32, y: i32, _check_multiple_targets: bool) {
        log::info!("long_press({x}, {y})");
    }
}
