//! Pointer velocity for fling detection.
//!
//! Each axis runs the impulse strategy: the samples of the recent past are
//! treated as pushes on a unit mass and the velocity is recovered from the
//! kinetic energy they impart.

use crate::input::{MotionAction, MotionEvent, PointerId};

/// Samples kept per axis.
const HISTORY_SIZE: usize = 20;

/// Samples older than this, relative to the newest, are ignored.
const HORIZON_MS: u64 = 100;

/// A gap this long between consecutive samples means the pointer stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct Sample {
    time_ms: u64,
    position: f32,
}

#[derive(Clone, Debug)]
struct AxisTracker {
    ring: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl Default for AxisTracker {
    fn default() -> Self {
        Self {
            ring: [None; HISTORY_SIZE],
            newest: 0,
        }
    }
}

impl AxisTracker {
    fn push(&mut self, time_ms: u64, position: f32) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.ring[self.newest] = Some(Sample { time_ms, position });
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Velocity in units per second; 0.0 with fewer than two usable samples.
    fn velocity(&self) -> f32 {
        let Some(newest) = self.ring[self.newest] else {
            return 0.0;
        };

        // Walk backwards from the newest sample, collecting (age, position)
        // oldest-last.
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut ages = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut cursor = self.newest;
        let mut later = newest;
        while let Some(sample) = self.ring[cursor] {
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = later.time_ms.abs_diff(sample.time_ms);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            positions[count] = sample.position;
            ages[count] = -(age as f32);
            later = sample;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            cursor = cursor.checked_sub(1).unwrap_or(HISTORY_SIZE - 1);
        }
        if count < 2 {
            return 0.0;
        }

        let mut work = 0.0f32;
        let oldest = count - 1;
        for i in (1..=oldest).rev() {
            let dt = ages[i] - ages[i - 1];
            if dt == 0.0 {
                continue;
            }
            let v_segment = (positions[i - 1] - positions[i]) / -dt;
            let v_so_far = energy_to_velocity(work);
            work += (v_segment - v_so_far) * v_segment.abs();
            if i == oldest {
                work *= 0.5;
            }
        }
        energy_to_velocity(work) * 1000.0
    }
}

/// E = v^2 / 2 for a unit mass, keeping the sign of the energy.
fn energy_to_velocity(work: f32) -> f32 {
    work.signum() * (2.0 * work.abs()).sqrt()
}

/// Tracks one pointer of a gesture across motion events.
///
/// The first pointer of the `Down` is tracked; when it lifts the tracker
/// moves to whichever pointer is first in the next event and starts over.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    pointer: Option<PointerId>,
    x: AxisTracker,
    y: AxisTracker,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds every sample of `event`, batched history first.
    pub fn add_movement(&mut self, event: &MotionEvent) {
        if event.action == MotionAction::Down {
            self.clear();
        }
        let index = match self.pointer.and_then(|id| event.find_pointer_index(id)) {
            Some(index) => index,
            None => {
                let Some(first) = event.pointers.first() else {
                    return;
                };
                self.clear();
                self.pointer = Some(first.id);
                0
            }
        };

        for sample in event.history() {
            if let Some(coords) = sample.pointers.get(index) {
                self.x.push(sample.event_time, coords.x);
                self.y.push(sample.event_time, coords.y);
            }
        }
        if let Some(coords) = event.pointers.get(index) {
            self.x.push(event.event_time, coords.x);
            self.y.push(event.event_time, coords.y);
        }
    }

    /// Returns `(vx, vy)` in pixels per second, each clamped to
    /// `±max_velocity`.
    pub fn compute_velocity(&self, max_velocity: f32) -> (f32, f32) {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return (0.0, 0.0);
        }
        let clamp = |v: f32| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(-max_velocity, max_velocity)
            }
        };
        (clamp(self.x.velocity()), clamp(self.y.velocity()))
    }

    pub fn tracked_pointer(&self) -> Option<PointerId> {
        self.pointer
    }

    pub fn clear(&mut self) {
        self.pointer = None;
        self.x.clear();
        self.y.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerCoords;

    fn swipe(tracker: &mut VelocityTracker, step_ms: u64, step_px: f32, samples: u64) {
        tracker.add_movement(&MotionEvent::single(0, 0, MotionAction::Down, 0.0, 0.0));
        for i in 1..=samples {
            tracker.add_movement(&MotionEvent::single(
                0,
                i * step_ms,
                MotionAction::Move,
                i as f32 * step_px,
                0.0,
            ));
        }
    }

    #[test]
    fn empty_tracker_reports_no_velocity() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.compute_velocity(8_000.0), (0.0, 0.0));
    }

    #[test]
    fn single_sample_reports_no_velocity() {
        let mut tracker = VelocityTracker::new();
        tracker.add_movement(&MotionEvent::single(0, 0, MotionAction::Down, 5.0, 5.0));
        assert_eq!(tracker.compute_velocity(8_000.0), (0.0, 0.0));
    }

    #[test]
    fn steady_swipe_measures_its_speed() {
        let mut tracker = VelocityTracker::new();
        // 10 px every 10 ms is 1000 px/s.
        swipe(&mut tracker, 10, 10.0, 5);

        let (vx, vy) = tracker.compute_velocity(8_000.0);
        assert!((vx - 1_000.0).abs() < 100.0, "expected ~1000, got {vx}");
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn leftward_swipe_is_negative() {
        let mut tracker = VelocityTracker::new();
        swipe(&mut tracker, 10, -10.0, 5);

        let (vx, _) = tracker.compute_velocity(8_000.0);
        assert!(vx < -500.0, "expected negative velocity, got {vx}");
    }

    #[test]
    fn velocity_is_clamped_to_maximum() {
        let mut tracker = VelocityTracker::new();
        swipe(&mut tracker, 10, 200.0, 5);

        let (vx, _) = tracker.compute_velocity(5_000.0);
        assert_eq!(vx, 5_000.0);
    }

    #[test]
    fn pause_before_release_stops_the_pointer() {
        let mut tracker = VelocityTracker::new();
        swipe(&mut tracker, 10, 10.0, 5);
        tracker.add_movement(&MotionEvent::single(0, 200, MotionAction::Move, 50.0, 0.0));

        assert_eq!(tracker.compute_velocity(8_000.0), (0.0, 0.0));
    }

    #[test]
    fn batched_history_counts_as_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.add_movement(&MotionEvent::single(0, 0, MotionAction::Down, 0.0, 0.0));
        let mut batched = MotionEvent::single(0, 10, MotionAction::Move, 0.0, 10.0);
        for i in 2..=5u64 {
            batched
                .add_batch(i * 10, &[PointerCoords::new(0, 0.0, i as f32 * 10.0)])
                .expect("single pointer");
        }
        tracker.add_movement(&batched);

        let (_, vy) = tracker.compute_velocity(8_000.0);
        assert!((vy - 1_000.0).abs() < 100.0, "expected ~1000, got {vy}");
    }

    #[test]
    fn down_restarts_tracking() {
        let mut tracker = VelocityTracker::new();
        swipe(&mut tracker, 10, 10.0, 5);
        tracker.add_movement(&MotionEvent::single(100, 100, MotionAction::Down, 0.0, 0.0));

        assert_eq!(tracker.compute_velocity(8_000.0), (0.0, 0.0));
        assert_eq!(tracker.tracked_pointer(), Some(0));
    }
}
