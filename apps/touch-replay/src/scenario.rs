use crate::options::Scenario;
use embedview_foundation::{MotionAction, MotionEvent, PointerCoords};

/// Touch samples for `scenario`, timestamped from `start`.
pub fn samples(scenario: Scenario, start: u64) -> Vec<MotionEvent> {
    let single = |offset: u64, down: u64, action, x: f32, y: f32| {
        MotionEvent::single(start + down, start + offset, action, x, y)
    };
    match scenario {
        Scenario::Tap => vec![
            single(0, 0, MotionAction::Down, 120.0, 240.0),
            single(60, 0, MotionAction::Up, 121.0, 240.0),
        ],
        Scenario::DoubleTap => vec![
            single(0, 0, MotionAction::Down, 120.0, 240.0),
            single(50, 0, MotionAction::Up, 120.0, 240.0),
            single(160, 160, MotionAction::Down, 124.0, 242.0),
            single(210, 160, MotionAction::Up, 124.0, 242.0),
        ],
        Scenario::LongPress => vec![
            single(0, 0, MotionAction::Down, 200.0, 300.0),
            single(400, 0, MotionAction::Move, 201.0, 301.0),
            single(900, 0, MotionAction::Up, 201.0, 301.0),
        ],
        Scenario::Swipe => {
            let mut events = vec![single(0, 0, MotionAction::Down, 300.0, 600.0)];
            for step in 1..=20u64 {
                let y = 600.0 - step as f32 * 18.0;
                events.push(single(step * 8, 0, MotionAction::Move, 300.0, y));
            }
            events.push(single(168, 0, MotionAction::Up, 300.0, 240.0));
            events
        }
        Scenario::Pinch => pinch(start),
    }
}

fn pinch(start: u64) -> Vec<MotionEvent> {
    let at = |offset: u64, action, spread: f32| {
        MotionEvent::new(
            start,
            start + offset,
            action,
            [
                PointerCoords::new(0, 200.0 - spread, 400.0),
                PointerCoords::new(1, 200.0 + spread, 400.0),
            ],
        )
    };
    let mut events = vec![MotionEvent::single(
        start,
        start,
        MotionAction::Down,
        150.0,
        400.0,
    )];
    events.push(at(20, MotionAction::PointerDown { index: 1 }, 50.0));
    for step in 1..=10u64 {
        events.push(at(20 + step * 10, MotionAction::Move, 50.0 + step as f32 * 12.0));
    }
    events.push(at(140, MotionAction::PointerUp { index: 1 }, 170.0));
    events.push(MotionEvent::single(
        start,
        start + 150,
        MotionAction::Up,
        30.0,
        400.0,
    ));
    events
}
