//! Turns locally recognized gestures into native engine commands.
//!
//! The responder is plain state. It never owns the engine; each dispatch
//! borrows it through a [`ResponderSink`], which is what the recognizers
//! actually talk to.

use crate::engine::NativeEngine;
use embedview_foundation::{
    GestureEvent, GestureListener, GesturePoint, ScaleEvent, ScaleListener, ViewConfiguration,
};
use embedview_ui_graphics::{Point, Size};

// Drag angles in radians, measured from the horizontal axis.
const HSLOPE_TO_START_SNAP: f32 = 0.25;
const HSLOPE_TO_BREAK_SNAP: f32 = 0.6;
const VSLOPE_TO_START_SNAP: f32 = 1.25;
const VSLOPE_TO_BREAK_SNAP: f32 = 0.6;
const ANGLE_HORIZONTAL: f32 = 0.0;
const ANGLE_VERTICAL: f32 = std::f32::consts::FRAC_PI_2;
/// Weight of a new sample in the moving average of the drag angle is 1/N.
const MOVING_AVERAGE_WEIGHT: f32 = 5.0;

/// Tiles the compositor can upload in 100 ms. Fling speed is capped so a
/// fling never outruns tile uploads.
const MAX_UPLOAD_TILES: i32 = 12;
const TILE_SIZE: f32 = 256.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SnapScrollMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Gesture-to-command state for one view.
#[derive(Debug)]
pub struct GestureResponder {
    touch_slop_square: f32,
    double_tap_timeout_ms: u64,

    show_press_is_called: bool,
    /// Set when a tap from the current down must not turn into a click:
    /// the pointer wandered, a pinch began, or the tap was already sent.
    ignore_single_tap: bool,
    seen_first_scroll: bool,
    snap_scroll_mode: SnapScrollMode,
    average_angle: f32,
    last_raw: Point,
    scroll_error: Point,
    last_down_time: u64,

    native_scrolling: bool,
    pinch_event_sent: bool,
    min_page_scale: f32,
    max_page_scale: f32,
    viewport: Size,
    last_tap: Option<(i32, i32)>,
}

impl GestureResponder {
    pub fn new(config: &ViewConfiguration) -> Self {
        Self {
            touch_slop_square: config.touch_slop_square() as f32,
            double_tap_timeout_ms: config.double_tap_timeout_ms,
            show_press_is_called: false,
            ignore_single_tap: false,
            seen_first_scroll: false,
            snap_scroll_mode: SnapScrollMode::None,
            average_angle: 0.0,
            last_raw: Point::ZERO,
            scroll_error: Point::ZERO,
            last_down_time: 0,
            native_scrolling: false,
            pinch_event_sent: false,
            min_page_scale: 1.0,
            max_page_scale: 1.0,
            viewport: Size::ZERO,
            last_tap: None,
        }
    }

    /// True from just before the first scroll command until scrolling is
    /// reported finished.
    pub fn is_native_scrolling(&self) -> bool {
        self.native_scrolling
    }

    pub fn snap_scroll_mode(&self) -> SnapScrollMode {
        self.snap_scroll_mode
    }

    pub fn last_down_time(&self) -> u64 {
        self.last_down_time
    }

    /// Where the last single tap was sent.
    pub fn last_tap(&self) -> Option<(i32, i32)> {
        self.last_tap
    }

    /// Page scale limits reported by the engine. Equal limits mean the page
    /// cannot zoom, so taps need not wait for a possible double tap.
    pub fn update_page_scale_limits(&mut self, min_scale: f32, max_scale: f32) {
        self.min_page_scale = min_scale;
        self.max_page_scale = max_scale;
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
    }

    pub fn start_native_scrolling(
        &mut self,
        x: i32,
        y: i32,
        engine: Option<&mut (dyn NativeEngine + '_)>,
    ) {
        if !self.native_scrolling {
            self.native_scrolling = true;
            if let Some(engine) = engine {
                engine.scroll_begin(x, y);
            }
        }
    }

    /// Sends `scroll_end` if the engine still thinks a scroll is running.
    pub fn tell_native_scrolling_has_ended(
        &mut self,
        engine: Option<&mut (dyn NativeEngine + '_)>,
    ) {
        if self.native_scrolling {
            self.native_scrolling = false;
            if let Some(engine) = engine {
                engine.scroll_end();
            }
        }
    }

    /// Stops any fling and the scroll it belongs to.
    pub fn end_fling(&mut self, engine: Option<&mut (dyn NativeEngine + '_)>) {
        let Some(engine) = engine else {
            return;
        };
        engine.fling_cancel();
        self.tell_native_scrolling_has_ended(Some(engine));
    }

    /// Forgets per-view state when the engine goes away.
    pub fn reset(&mut self) {
        self.native_scrolling = false;
        self.pinch_event_sent = false;
        self.ignore_single_tap = false;
        self.seen_first_scroll = false;
        self.snap_scroll_mode = SnapScrollMode::None;
    }

    pub fn clamp_fling_velocity_x(&self, velocity: i32) -> i32 {
        clamp_to_tile_budget(velocity, self.viewport.height)
    }

    pub fn clamp_fling_velocity_y(&self, velocity: i32) -> i32 {
        clamp_to_tile_budget(velocity, self.viewport.width)
    }

    fn on_gesture(
        &mut self,
        event: GestureEvent,
        scale_in_progress: bool,
        in_long_press: bool,
        mut engine: Option<&mut (dyn NativeEngine + '_)>,
    ) -> bool {
        match event {
            GestureEvent::Down(down) => {
                self.show_press_is_called = false;
                self.ignore_single_tap = false;
                self.seen_first_scroll = false;
                self.snap_scroll_mode = SnapScrollMode::None;
                self.last_raw = down.position;
                self.scroll_error = Point::ZERO;
                self.last_down_time = down.down_time;
                true
            }
            GestureEvent::Scroll {
                start,
                current,
                distance_x,
                distance_y,
            } => self.on_scroll(
                start,
                current,
                distance_x,
                distance_y,
                scale_in_progress,
                engine,
            ),
            GestureEvent::Fling {
                start,
                velocity_x,
                velocity_y,
                ..
            } => {
                let (velocity_x, velocity_y) = self.snap_fling(velocity_x, velocity_y);
                let (x, y) = start.position.truncated();
                self.fling(x, y, velocity_x as i32, velocity_y as i32, engine);
                true
            }
            GestureEvent::ShowPress(at) => {
                self.show_press_is_called = true;
                if let Some(engine) = engine {
                    let (x, y) = at.position.truncated();
                    engine.show_press_state(x, y);
                }
                true
            }
            GestureEvent::SingleTapUp(up) => self.on_single_tap_up(up, in_long_press, engine),
            GestureEvent::SingleTapConfirmed(at) => {
                if in_long_press || self.ignore_single_tap {
                    return true;
                }
                self.handle_tap_or_press(at.position, false, engine);
                true
            }
            GestureEvent::DoubleTap(at) => {
                if let Some(engine) = engine.as_deref_mut() {
                    let (x, y) = at.position.truncated();
                    engine.double_tap(x, y);
                }
                true
            }
            GestureEvent::DoubleTapEvent { .. } => false,
            GestureEvent::LongPress(at) => {
                if !scale_in_progress {
                    self.handle_tap_or_press(at.position, true, engine);
                }
                true
            }
        }
    }

    fn on_scroll(
        &mut self,
        start: GesturePoint,
        current: GesturePoint,
        mut distance_x: f32,
        mut distance_y: f32,
        scale_in_progress: bool,
        engine: Option<&mut (dyn NativeEngine + '_)>,
    ) -> bool {
        let angle = drag_angle(distance_x, distance_y);
        if !self.seen_first_scroll {
            self.average_angle = angle;
            if !scale_in_progress {
                if self.average_angle < HSLOPE_TO_START_SNAP {
                    self.snap_scroll_mode = SnapScrollMode::Horizontal;
                    self.average_angle = ANGLE_HORIZONTAL;
                } else if self.average_angle > VSLOPE_TO_START_SNAP {
                    self.snap_scroll_mode = SnapScrollMode::Vertical;
                    self.average_angle = ANGLE_VERTICAL;
                }
            }
            self.seen_first_scroll = true;
            // The first delta jumps over the slop; dropping it avoids a visible jump.
            return true;
        }

        self.average_angle += (angle - self.average_angle) / MOVING_AVERAGE_WEIGHT;
        match self.snap_scroll_mode {
            SnapScrollMode::Vertical if self.average_angle < VSLOPE_TO_BREAK_SNAP => {
                self.snap_scroll_mode = SnapScrollMode::None;
            }
            SnapScrollMode::Horizontal if self.average_angle > HSLOPE_TO_BREAK_SNAP => {
                self.snap_scroll_mode = SnapScrollMode::None;
            }
            SnapScrollMode::None if !scale_in_progress => {
                if self.average_angle < HSLOPE_TO_START_SNAP {
                    self.snap_scroll_mode = SnapScrollMode::Horizontal;
                    self.average_angle = (self.average_angle + ANGLE_HORIZONTAL) / 2.0;
                } else if self.average_angle > VSLOPE_TO_START_SNAP {
                    self.snap_scroll_mode = SnapScrollMode::Vertical;
                    self.average_angle = (self.average_angle + ANGLE_VERTICAL) / 2.0;
                }
            }
            _ => {}
        }

        match self.snap_scroll_mode {
            SnapScrollMode::Horizontal => distance_y = 0.0,
            SnapScrollMode::Vertical => distance_x = 0.0,
            SnapScrollMode::None => {}
        }

        self.last_raw = current.position;
        let mut engine = engine;
        let (start_x, start_y) = start.position.truncated();
        self.start_native_scrolling(start_x, start_y, engine.as_deref_mut());

        // Commands take whole pixels; carry the fraction into the next scroll.
        let wanted_x = distance_x + self.scroll_error.x;
        let wanted_y = distance_y + self.scroll_error.y;
        let dx = wanted_x as i32;
        let dy = wanted_y as i32;
        self.scroll_error = Point::new(wanted_x - dx as f32, wanted_y - dy as f32);
        if dx != 0 || dy != 0 {
            if let Some(engine) = engine {
                engine.scroll_by(dx, dy);
            }
        }
        true
    }

    fn snap_fling(&mut self, mut velocity_x: f32, mut velocity_y: f32) -> (f32, f32) {
        if self.snap_scroll_mode == SnapScrollMode::None {
            let angle = drag_angle(velocity_x, velocity_y);
            if angle < HSLOPE_TO_START_SNAP {
                self.snap_scroll_mode = SnapScrollMode::Horizontal;
                self.average_angle = ANGLE_HORIZONTAL;
            } else if angle > VSLOPE_TO_START_SNAP {
                self.snap_scroll_mode = SnapScrollMode::Vertical;
                self.average_angle = ANGLE_VERTICAL;
            }
        }
        match self.snap_scroll_mode {
            SnapScrollMode::Horizontal => velocity_y = 0.0,
            SnapScrollMode::Vertical => velocity_x = 0.0,
            SnapScrollMode::None => {}
        }
        (velocity_x, velocity_y)
    }

    fn fling(
        &mut self,
        x: i32,
        y: i32,
        velocity_x: i32,
        velocity_y: i32,
        engine: Option<&mut (dyn NativeEngine + '_)>,
    ) {
        let Some(engine) = engine else {
            return;
        };
        self.end_fling(Some(&mut *engine));
        let velocity_x = self.clamp_fling_velocity_x(velocity_x);
        let velocity_y = self.clamp_fling_velocity_y(velocity_y);
        log::debug!("fling from ({x}, {y}) at ({velocity_x}, {velocity_y}) px/s");
        engine.fling_start(x, y, velocity_x, velocity_y);
    }

    fn on_single_tap_up(
        &mut self,
        up: GesturePoint,
        in_long_press: bool,
        engine: Option<&mut (dyn NativeEngine + '_)>,
    ) -> bool {
        if self.last_raw.distance_squared_to(up.position) > self.touch_slop_square {
            // The page consumed the moves in between; this is not a tap.
            self.ignore_single_tap = true;
            return true;
        }
        if self.ignore_single_tap || in_long_press {
            return false;
        }
        if up.held_for() > self.double_tap_timeout_ms {
            // Held past the double-tap window, so no confirmation will come.
            let (x, y) = up.position.truncated();
            if let Some(engine) = engine {
                engine.single_tap(x, y, true);
                self.ignore_single_tap = true;
            }
            self.last_tap = Some((x, y));
            return true;
        }
        if self.min_page_scale == self.max_page_scale {
            self.handle_tap_or_press(up.position, false, engine);
            self.ignore_single_tap = true;
        }
        false
    }

    fn handle_tap_or_press(
        &mut self,
        position: Point,
        is_long_press: bool,
        engine: Option<&mut (dyn NativeEngine + '_)>,
    ) {
        let (x, y) = position.truncated();
        if is_long_press {
            if let Some(engine) = engine {
                engine.long_press(x, y, true);
            }
            return;
        }
        if let Some(engine) = engine {
            if !self.show_press_is_called {
                engine.show_press_state(x, y);
            }
            engine.single_tap(x, y, true);
        }
        self.last_tap = Some((x, y));
    }

    fn on_scale(
        &mut self,
        event: ScaleEvent,
        ignore: bool,
        mut engine: Option<&mut (dyn NativeEngine + '_)>,
    ) -> bool {
        match event {
            ScaleEvent::Begin(_) => {
                if ignore {
                    return false;
                }
                self.pinch_event_sent = false;
                self.ignore_single_tap = true;
                true
            }
            ScaleEvent::Scale(state) => {
                if ignore {
                    return false;
                }
                let (x, y) = state.focus.truncated();
                // The begin may have gone to the page, leaving no pinch open.
                if !self.pinch_event_sent {
                    self.start_native_scrolling(x, y, engine.as_deref_mut());
                    if let Some(engine) = engine.as_deref_mut() {
                        engine.pinch_begin();
                    }
                    self.pinch_event_sent = true;
                }
                if let Some(engine) = engine {
                    engine.pinch_by(state.scale_factor(), x, y);
                }
                true
            }
            ScaleEvent::End(_) => {
                // Close an open pinch even when the page handled the lift.
                if self.pinch_event_sent {
                    if let Some(engine) = engine {
                        engine.pinch_end();
                    }
                    self.pinch_event_sent = false;
                }
                true
            }
        }
    }
}

fn drag_angle(dx: f32, dy: f32) -> f32 {
    dy.abs().atan2(dx.abs())
}

fn clamp_to_tile_budget(velocity: i32, cross_axis_extent: f32) -> i32 {
    let tiles_across = ((cross_axis_extent / TILE_SIZE).ceil() as i32).saturating_add(1);
    let lines = MAX_UPLOAD_TILES / tiles_across;
    let max_velocity = if lines > 0 { lines * 2560 } else { 1000 };
    velocity.clamp(-max_velocity, max_velocity)
}

/// Borrowed view of a [`GestureResponder`] and the engine for one dispatch.
///
/// The flags are snapshots taken before the recognizer runs.
pub struct ResponderSink<'a> {
    responder: &'a mut GestureResponder,
    engine: Option<&'a mut dyn NativeEngine>,
    scale_in_progress: bool,
    in_long_press: bool,
    ignore_scale_events: bool,
}

impl<'a> ResponderSink<'a> {
    pub fn new(
        responder: &'a mut GestureResponder,
        engine: Option<&'a mut dyn NativeEngine>,
    ) -> Self {
        Self {
            responder,
            engine,
            scale_in_progress: false,
            in_long_press: false,
            ignore_scale_events: false,
        }
    }

    pub fn with_scale_in_progress(mut self, in_progress: bool) -> Self {
        self.scale_in_progress = in_progress;
        self
    }

    pub fn with_long_press(mut self, in_long_press: bool) -> Self {
        self.in_long_press = in_long_press;
        self
    }

    /// Declines pinch begin and update so a sample the page already handled
    /// only advances the scale recognizer.
    pub fn ignoring_scale_events(mut self, ignore: bool) -> Self {
        self.ignore_scale_events = ignore;
        self
    }
}

impl GestureListener for ResponderSink<'_> {
    fn on_gesture(&mut self, event: GestureEvent) -> bool {
        self.responder.on_gesture(
            event,
            self.scale_in_progress,
            self.in_long_press,
            self.engine.as_deref_mut(),
        )
    }
}

impl ScaleListener for ResponderSink<'_> {
    fn on_scale(&mut self, event: ScaleEvent) -> bool {
        self.responder
            .on_scale(event, self.ignore_scale_events, self.engine.as_deref_mut())
    }
}

#[cfg(test)]
#[path = "tests/gesture_responder_tests.rs"]
mod tests;
