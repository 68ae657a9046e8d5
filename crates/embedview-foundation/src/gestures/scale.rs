use super::focus_of;
use crate::input::{MotionAction, MotionEvent};
use crate::view_configuration::ViewConfiguration;
use embedview_ui_graphics::Point;

/// Snapshot of a pinch in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleState {
    pub focus: Point,
    pub current_span: f32,
    pub previous_span: f32,
    pub event_time: u64,
    /// Time of the last sample the listener accepted.
    pub previous_time: u64,
}

impl ScaleState {
    /// Ratio of the current span to the span at the last accepted update.
    pub fn scale_factor(&self) -> f32 {
        if self.previous_span > 0.0 {
            self.current_span / self.previous_span
        } else {
            1.0
        }
    }

    pub fn time_delta(&self) -> u64 {
        self.event_time.saturating_sub(self.previous_time)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleEvent {
    /// Asks whether a pinch may start. Declining keeps the detector idle.
    Begin(ScaleState),
    /// The span changed. Returning `false` keeps accumulating from the last
    /// accepted span.
    Scale(ScaleState),
    End(ScaleState),
}

pub trait ScaleListener {
    fn on_scale(&mut self, event: ScaleEvent) -> bool;
}

impl<F> ScaleListener for F
where
    F: FnMut(ScaleEvent) -> bool,
{
    fn on_scale(&mut self, event: ScaleEvent) -> bool {
        self(event)
    }
}

/// Two-finger pinch recognizer driven by the spread of the pointers around
/// their focus.
#[derive(Debug)]
pub struct ScaleGestureDetector {
    min_span: f32,
    span_slop: f32,
    in_progress: bool,
    focus: Point,
    initial_span: f32,
    current_span: f32,
    previous_span: f32,
    current_time: u64,
    previous_time: u64,
}

impl ScaleGestureDetector {
    pub fn new(config: &ViewConfiguration) -> Self {
        Self {
            min_span: config.min_scaling_span.0,
            span_slop: config.span_slop(),
            in_progress: false,
            focus: Point::ZERO,
            initial_span: 0.0,
            current_span: 0.0,
            previous_span: 0.0,
            current_time: 0,
            previous_time: 0,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn state(&self) -> ScaleState {
        ScaleState {
            focus: self.focus,
            current_span: self.current_span,
            previous_span: self.previous_span,
            event_time: self.current_time,
            previous_time: self.previous_time,
        }
    }

    /// Feeds one motion event. Every event of the stream must come through
    /// here, including ones the caller otherwise ignores.
    ///
    /// Returns `true` when a pinch was in progress on this event or ended
    /// because of it.
    pub fn on_touch_event(
        &mut self,
        event: &MotionEvent,
        listener: &mut dyn ScaleListener,
    ) -> bool {
        self.current_time = event.event_time;
        let was_in_progress = self.in_progress;
        let action = event.action;

        let stream_complete = matches!(action, MotionAction::Up | MotionAction::Cancel);
        if action == MotionAction::Down || stream_complete {
            if self.in_progress {
                listener.on_scale(ScaleEvent::End(self.state()));
                self.in_progress = false;
                self.initial_span = 0.0;
            }
            if stream_complete {
                return was_in_progress;
            }
        }

        let config_changed = matches!(
            action,
            MotionAction::Down | MotionAction::PointerDown { .. } | MotionAction::PointerUp { .. }
        );
        let skip = match action {
            MotionAction::PointerUp { index } => Some(index),
            _ => None,
        };
        let focus = focus_of(event);
        let mut deviation = Point::ZERO;
        let mut count = 0usize;
        for (index, pointer) in event.pointers.iter().enumerate() {
            if Some(index) == skip {
                continue;
            }
            deviation.x += (pointer.x - focus.x).abs();
            deviation.y += (pointer.y - focus.y).abs();
            count += 1;
        }
        if count == 0 {
            return was_in_progress;
        }
        let span_x = deviation.x / count as f32 * 2.0;
        let span_y = deviation.y / count as f32 * 2.0;
        let span = span_x.hypot(span_y);

        let in_progress_before_update = self.in_progress;
        self.focus = focus;
        if self.in_progress && (span < self.min_span || config_changed) {
            listener.on_scale(ScaleEvent::End(self.state()));
            self.in_progress = false;
            self.initial_span = span;
        }
        if config_changed {
            self.initial_span = span;
            self.previous_span = span;
            self.current_span = span;
        }
        if !self.in_progress
            && span >= self.min_span
            && (in_progress_before_update || (span - self.initial_span).abs() > self.span_slop)
        {
            self.previous_span = span;
            self.current_span = span;
            self.previous_time = self.current_time;
            self.in_progress = listener.on_scale(ScaleEvent::Begin(self.state()));
        }

        if action == MotionAction::Move {
            self.current_span = span;
            let mut update_previous = true;
            if self.in_progress {
                update_previous = listener.on_scale(ScaleEvent::Scale(self.state()));
            }
            if update_previous {
                self.previous_span = self.current_span;
                self.previous_time = self.current_time;
            }
        }

        was_in_progress || self.in_progress
    }
}
