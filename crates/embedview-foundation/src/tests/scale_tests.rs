use super::*;
use crate::input::{MotionAction, MotionEvent, PointerCoords};
use crate::view_configuration::ViewConfiguration;

#[derive(Default)]
struct Recorder {
    events: Vec<ScaleEvent>,
    decline_begin: bool,
}

impl ScaleListener for Recorder {
    fn on_scale(&mut self, event: ScaleEvent) -> bool {
        self.events.push(event);
        !(self.decline_begin && matches!(event, ScaleEvent::Begin(_)))
    }
}

fn pinch(time: u64, action: MotionAction, second_x: f32) -> MotionEvent {
    MotionEvent::new(
        0,
        time,
        action,
        [
            PointerCoords::new(0, 100.0, 100.0),
            PointerCoords::new(1, second_x, 100.0),
        ],
    )
}

fn names(recorder: &Recorder) -> Vec<&'static str> {
    recorder
        .events
        .iter()
        .map(|event| match event {
            ScaleEvent::Begin(_) => "begin",
            ScaleEvent::Scale(_) => "scale",
            ScaleEvent::End(_) => "end",
        })
        .collect()
}

#[test]
fn spreading_fingers_begin_scale_and_end() {
    let mut detector = ScaleGestureDetector::new(&ViewConfiguration::default());
    let mut recorder = Recorder::default();

    let down = MotionEvent::single(0, 0, MotionAction::Down, 100.0, 100.0);
    assert!(!detector.on_touch_event(&down, &mut recorder));
    let second_down = pinch(10, MotionAction::PointerDown { index: 1 }, 200.0);
    assert!(!detector.on_touch_event(&second_down, &mut recorder));
    assert!(recorder.events.is_empty());

    assert!(detector.on_touch_event(&pinch(20, MotionAction::Move, 220.0), &mut recorder));
    assert!(detector.is_in_progress());
    assert!(detector.on_touch_event(&pinch(30, MotionAction::Move, 260.0), &mut recorder));
    let second_up = pinch(40, MotionAction::PointerUp { index: 1 }, 260.0);
    assert!(detector.on_touch_event(&second_up, &mut recorder));
    assert!(!detector.is_in_progress());

    let up = MotionEvent::single(0, 50, MotionAction::Up, 100.0, 100.0);
    assert!(!detector.on_touch_event(&up, &mut recorder));

    assert_eq!(names(&recorder), vec!["begin", "scale", "scale", "end"]);
    match recorder.events[2] {
        ScaleEvent::Scale(state) => {
            assert!((state.scale_factor() - 160.0 / 120.0).abs() < 1e-4);
            assert_eq!(state.focus.x, 180.0);
            assert_eq!(state.time_delta(), 10);
        }
        other => panic!("expected scale, got {other:?}"),
    }
}

#[test]
fn small_span_change_does_not_begin() {
    let mut detector = ScaleGestureDetector::new(&ViewConfiguration::default());
    let mut recorder = Recorder::default();

    detector.on_touch_event(
        &pinch(0, MotionAction::PointerDown { index: 1 }, 200.0),
        &mut recorder,
    );
    detector.on_touch_event(&pinch(10, MotionAction::Move, 210.0), &mut recorder);

    assert!(recorder.events.is_empty());
    assert!(!detector.is_in_progress());
}

#[test]
fn declined_begin_keeps_the_detector_idle() {
    let mut detector = ScaleGestureDetector::new(&ViewConfiguration::default());
    let mut recorder = Recorder {
        decline_begin: true,
        ..Recorder::default()
    };

    detector.on_touch_event(
        &pinch(0, MotionAction::PointerDown { index: 1 }, 200.0),
        &mut recorder,
    );
    let handled = detector.on_touch_event(&pinch(10, MotionAction::Move, 260.0), &mut recorder);

    assert!(!handled);
    assert!(!detector.is_in_progress());
    assert_eq!(names(&recorder), vec!["begin"]);
}

#[test]
fn lifting_all_fingers_ends_the_pinch() {
    let mut detector = ScaleGestureDetector::new(&ViewConfiguration::default());
    let mut recorder = Recorder::default();

    detector.on_touch_event(
        &pinch(0, MotionAction::PointerDown { index: 1 }, 200.0),
        &mut recorder,
    );
    detector.on_touch_event(&pinch(10, MotionAction::Move, 260.0), &mut recorder);
    let handled = detector.on_touch_event(&pinch(20, MotionAction::Up, 260.0), &mut recorder);

    assert!(handled);
    assert_eq!(names(&recorder).last(), Some(&"end"));
}

#[test]
fn pointers_closer_than_min_span_never_pinch() {
    let mut detector = ScaleGestureDetector::new(&ViewConfiguration::default());
    let mut recorder = Recorder::default();

    detector.on_touch_event(
        &pinch(0, MotionAction::PointerDown { index: 1 }, 101.0),
        &mut recorder,
    );
    detector.on_touch_event(&pinch(10, MotionAction::Move, 120.0), &mut recorder);

    assert!(recorder.events.is_empty());
}
