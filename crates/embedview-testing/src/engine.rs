//! A native engine double that records every command it receives.

use embedview_foundation::{TouchEventType, TouchPoint};
use embedview_ui::{ForwardingDisposition, NativeEngine};
use std::collections::VecDeque;

/// One command received by a [`RecordingEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Touch {
        event_type: TouchEventType,
        timestamp_ms: u64,
        pointer_count: usize,
        disposition: ForwardingDisposition,
    },
    ScrollBegin(i32, i32),
    ScrollBy(i32, i32),
    ScrollEnd,
    FlingStart(i32, i32, i32, i32),
    FlingCancel,
    PinchBegin,
    PinchBy(f32, i32, i32),
    PinchEnd,
    ShowPress(i32, i32),
    SingleTap(i32, i32),
    DoubleTap(i32, i32),
    LongPress(i32, i32),
}

impl EngineCall {
    pub fn is_touch(&self) -> bool {
        matches!(self, EngineCall::Touch { .. })
    }
}

/// Engine double with scripted touch dispositions.
///
/// Offers take the next scripted disposition, or the fallback once the
/// script runs out.
#[derive(Debug)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
    script: VecDeque<ForwardingDisposition>,
    fallback: ForwardingDisposition,
}

impl RecordingEngine {
    pub fn new(fallback: ForwardingDisposition) -> Self {
        Self {
            calls: Vec::new(),
            script: VecDeque::new(),
            fallback,
        }
    }

    /// A page with touch handlers that wants everything.
    pub fn forwarding() -> Self {
        Self::new(ForwardingDisposition::Forwarded)
    }

    /// A page whose handlers ignore everything.
    pub fn not_forwarding() -> Self {
        Self::new(ForwardingDisposition::NotForwarded)
    }

    /// Queues dispositions for the next offers.
    pub fn script(&mut self, dispositions: impl IntoIterator<Item = ForwardingDisposition>) {
        self.script.extend(dispositions);
    }

    pub fn set_fallback(&mut self, fallback: ForwardingDisposition) {
        self.fallback = fallback;
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }

    /// Event types of every touch offer, in order.
    pub fn offers(&self) -> Vec<TouchEventType> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Touch { event_type, .. } => Some(*event_type),
                _ => None,
            })
            .collect()
    }

    /// Everything except touch offers and the fling cancel sent on each
    /// down.
    pub fn gesture_calls(&self) -> Vec<EngineCall> {
        self.calls
            .iter()
            .filter(|call| !call.is_touch() && **call != EngineCall::FlingCancel)
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::forwarding()
    }
}

impl NativeEngine for RecordingEngine {
    fn offer_touch_event(
        &mut self,
        event_type: TouchEventType,
        timestamp_ms: u64,
        points: &[TouchPoint],
    ) -> ForwardingDisposition {
        let disposition = self.script.pop_front().unwrap_or(self.fallback);
        self.calls.push(EngineCall::Touch {
            event_type,
            timestamp_ms,
            pointer_count: points.len(),
            disposition,
        });
        disposition
    }

    fn scroll_begin(&mut self, x: i32, y: i32) {
        self.calls.push(EngineCall::ScrollBegin(x, y));
    }

    fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.calls.push(EngineCall::ScrollBy(dx, dy));
    }

    fn scroll_end(&mut self) {
        self.calls.push(EngineCall::ScrollEnd);
    }

    fn fling_start(&mut self, x: i32, y: i32, velocity_x: i32, velocity_y: i32) {
        self.calls
            .push(EngineCall::FlingStart(x, y, velocity_x, velocity_y));
    }

    fn fling_cancel(&mut self) {
        self.calls.push(EngineCall::FlingCancel);
    }

    fn pinch_begin(&mut self) {
        self.calls.push(EngineCall::PinchBegin);
    }

    fn pinch_by(&mut self, delta: f32, anchor_x: i32, anchor_y: i32) {
        self.calls.push(EngineCall::PinchBy(delta, anchor_x, anchor_y));
    }

    fn pinch_end(&mut self) {
        self.calls.push(EngineCall::PinchEnd);
    }

    fn show_press_state(&mut self, x: i32, y: i32) {
        self.calls.push(EngineCall::ShowPress(x, y));
    }

    fn single_tap(&mut self, x: i32, y: i32, _check_multiple_targets: bool) {
        self.calls.push(EngineCall::SingleTap(x, y));
    }

    fn double_tap(&mut self, x: i32, y: i32) {
        self.calls.push(EngineCall::DoubleTap(x, y));
    }

    fn long_press(&mut self, x: i32, y: i32, _check_multiple_targets: bool) {
        self.calls.push(EngineCall::LongPress(x, y));
    }
}
