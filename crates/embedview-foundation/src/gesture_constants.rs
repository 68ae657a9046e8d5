//! Default gesture thresholds for touch handling.
//!
//! These are baseline-density values in device pixels and milliseconds. They
//! seed [`ViewConfiguration::default`](crate::ViewConfiguration), which is
//! what every recognizer and the arbiter actually read; scale them with
//! `ViewConfiguration::scaled_for_density` on high-density screens.

/// Touch slop in pixels.
///
/// A pointer that moves farther than this from where it went down is
/// dragging: scroll gestures begin, taps and long presses are cancelled, and
/// move events start being offered to the native engine.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Maximum distance between two taps for them to form a double tap.
pub const DOUBLE_TAP_SLOP: f32 = 100.0;

/// Delay before a held touch is shown as pressed.
pub const TAP_TIMEOUT_MS: u64 = 180;

/// Hold duration, after the tap timeout, that makes a press a long press.
pub const LONG_PRESS_TIMEOUT_MS: u64 = 500;

/// Window after an up in which a second down forms a double tap.
pub const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// How long the native engine may sit on a forwarded touch event before it
/// is treated as not interested.
pub const ENGINE_ACK_TIMEOUT_MS: u64 = 200;

/// Minimum fling velocity in pixels per second.
pub const MIN_FLING_VELOCITY: f32 = 50.0;

/// Maximum fling velocity in pixels per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on a
/// baseline density.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Smallest two-finger span, in pixels, that can start a pinch.
pub const MIN_SCALING_SPAN: f32 = 27.0;
