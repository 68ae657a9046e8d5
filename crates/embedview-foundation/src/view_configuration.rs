//! Timeouts and distances shared by the recognizers and the touch arbiter.
//!
//! A `ViewConfiguration` is built once by the embedder (usually from the
//! platform's scaled values) and passed by value to every component that
//! needs it.

use crate::gesture_constants::{
    DOUBLE_TAP_SLOP, DOUBLE_TAP_TIMEOUT_MS, DRAG_THRESHOLD, ENGINE_ACK_TIMEOUT_MS,
    LONG_PRESS_TIMEOUT_MS, MAX_FLING_VELOCITY, MIN_FLING_VELOCITY, MIN_SCALING_SPAN,
    TAP_TIMEOUT_MS,
};
use embedview_ui_graphics::{Dp, Px};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfiguration {
    pub touch_slop: Px,
    pub double_tap_slop: Px,
    pub tap_timeout_ms: u64,
    pub long_press_timeout_ms: u64,
    pub double_tap_timeout_ms: u64,
    pub engine_ack_timeout_ms: u64,
    pub minimum_fling_velocity: f32,
    pub maximum_fling_velocity: f32,
    pub min_scaling_span: Px,
}

impl Default for ViewConfiguration {
    fn default() -> Self {
        Self {
            touch_slop: Px(DRAG_THRESHOLD),
            double_tap_slop: Px(DOUBLE_TAP_SLOP),
            tap_timeout_ms: TAP_TIMEOUT_MS,
            long_press_timeout_ms: LONG_PRESS_TIMEOUT_MS,
            double_tap_timeout_ms: DOUBLE_TAP_TIMEOUT_MS,
            engine_ack_timeout_ms: ENGINE_ACK_TIMEOUT_MS,
            minimum_fling_velocity: MIN_FLING_VELOCITY,
            maximum_fling_velocity: MAX_FLING_VELOCITY,
            min_scaling_span: Px(MIN_SCALING_SPAN),
        }
    }
}

impl ViewConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current distances as [`Dp`] and converts them, along with
    /// the fling velocities, to device pixels at `density`.
    pub fn scaled_for_density(mut self, density: f32) -> Self {
        let to_px = |distance: Px| Dp(distance.0).to_px(density);
        self.touch_slop = to_px(self.touch_slop);
        self.double_tap_slop = to_px(self.double_tap_slop);
        self.minimum_fling_velocity *= density;
        self.maximum_fling_velocity *= density;
        self.min_scaling_span = to_px(self.min_scaling_span);
        self
    }

    pub fn with_touch_slop(mut self, touch_slop: Px) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn with_tap_timeout(mut self, millis: u64) -> Self {
        self.tap_timeout_ms = millis;
        self
    }

    pub fn with_long_press_timeout(mut self, millis: u64) -> Self {
        self.long_press_timeout_ms = millis;
        self
    }

    pub fn with_double_tap_timeout(mut self, millis: u64) -> Self {
        self.double_tap_timeout_ms = millis;
        self
    }

    pub fn with_engine_ack_timeout(mut self, millis: u64) -> Self {
        self.engine_ack_timeout_ms = millis;
        self
    }

    pub fn with_fling_velocity_range(mut self, minimum: f32, maximum: f32) -> Self {
        self.minimum_fling_velocity = minimum;
        self.maximum_fling_velocity = maximum;
        self
    }

    pub fn with_min_scaling_span(mut self, span: Px) -> Self {
        self.min_scaling_span = span;
        self
    }

    /// Square of the touch slop in whole pixels.
    pub fn touch_slop_square(&self) -> i64 {
        let slop = i64::from(self.touch_slop.round_to_int());
        slop * slop
    }

    pub fn double_tap_slop_square(&self) -> i64 {
        let slop = i64::from(self.double_tap_slop.round_to_int());
        slop * slop
    }

    /// Span change needed before a pinch may begin.
    pub fn span_slop(&self) -> f32 {
        self.touch_slop.0 * 2.0
    }

    /// Absolute uptime at which a press that went down at `down_time` becomes
    /// a long press.
    pub fn long_press_deadline(&self, down_time: u64) -> u64 {
        down_time + self.tap_timeout_ms + self.long_press_timeout_ms
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("touch_slop", self.touch_slop.0),
            ("double_tap_slop", self.double_tap_slop.0),
            ("min_scaling_span", self.min_scaling_span.0),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDistance { name, value });
            }
        }
        for (name, value) in [
            ("tap_timeout_ms", self.tap_timeout_ms),
            ("long_press_timeout_ms", self.long_press_timeout_ms),
            ("double_tap_timeout_ms", self.double_tap_timeout_ms),
            ("engine_ack_timeout_ms", self.engine_ack_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout { name });
            }
        }
        if !(self.minimum_fling_velocity >= 0.0
            && self.minimum_fling_velocity < self.maximum_fling_velocity)
        {
            return Err(ConfigError::FlingVelocityRange {
                minimum: self.minimum_fling_velocity,
                maximum: self.maximum_fling_velocity,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveDistance { name: &'static str, value: f32 },
    ZeroTimeout { name: &'static str },
    FlingVelocityRange { minimum: f32, maximum: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveDistance { name, value } => {
                write!(f, "{name} must be a positive distance, got {value}")
            }
            ConfigError::ZeroTimeout { name } => write!(f, "{name} must be non-zero"),
            ConfigError::FlingVelocityRange { minimum, maximum } => {
                write!(
                    f,
                    "fling velocity range is empty: minimum {minimum} >= maximum {maximum}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
