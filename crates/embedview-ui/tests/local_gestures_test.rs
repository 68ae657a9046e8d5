/// Gestures recognized locally when the page has no interest in touches.
use embedview_foundation::MotionAction;
use embedview_testing::{EngineCall, MotionEventBuilder, RecordingEngine, TouchTestRule};

use MotionAction::{Down, Move, PointerDown, PointerUp, Up};

fn local_rule() -> TouchTestRule {
    TouchTestRule::with_engine(RecordingEngine::not_forwarding())
}

#[test]
fn horizontal_swipe_scrolls_then_flings() {
    let mut rule = local_rule();

    rule.touch(0, Down, 0.0, 0.0);
    for step in 1..=4u64 {
        rule.touch(step * 10, Move, step as f32 * 30.0, 0.0);
    }
    rule.touch(50, Up, 150.0, 0.0);

    let calls = rule.gesture_calls();
    assert_eq!(
        &calls[..4],
        &[
            EngineCall::ScrollBegin(0, 0),
            EngineCall::ScrollBy(-30, 0),
            EngineCall::ScrollBy(-30, 0),
            EngineCall::ScrollBy(-30, 0),
        ]
    );
    assert_eq!(calls[4], EngineCall::ScrollEnd);
    match calls[5] {
        EngineCall::FlingStart(0, 0, velocity_x, 0) => assert!(velocity_x > 1000),
        ref other => panic!("expected a horizontal fling, got {other:?}"),
    }
    assert_eq!(calls.len(), 6);
    assert!(!rule.arbiter().is_native_scrolling());
}

#[test]
fn slow_release_ends_scrolling_without_fling() {
    let mut rule = local_rule();

    rule.touch(0, Down, 0.0, 0.0);
    rule.touch(10, Move, 0.0, 30.0);
    rule.touch(20, Move, 0.0, 60.0);
    rule.touch(400, Up, 0.0, 60.0);

    assert_eq!(
        rule.gesture_calls(),
        vec![
            EngineCall::ScrollBegin(0, 0),
            EngineCall::ScrollBy(0, -30),
            EngineCall::ScrollEnd,
        ]
    );
}

#[test]
fn second_tap_in_time_is_a_double_tap_on_zoomable_pages() {
    let mut rule = local_rule();
    rule.arbiter_mut().update_page_scale_limits(0.5, 4.0);

    rule.touch(0, Down, 50.0, 50.0);
    rule.touch(40, Up, 50.0, 50.0);
    rule.touch(150, Down, 52.0, 52.0);
    rule.touch(200, Up, 52.0, 52.0);
    rule.advance_to(2000);

    assert_eq!(rule.gesture_calls(), vec![EngineCall::DoubleTap(50, 50)]);
}

#[test]
fn single_tap_on_zoomable_page_waits_for_the_double_tap_window() {
    let mut rule = local_rule();
    rule.arbiter_mut().update_page_scale_limits(0.5, 4.0);

    rule.touch(0, Down, 20.0, 30.0);
    rule.touch(40, Up, 20.0, 30.0);
    rule.advance_to(299);
    assert!(rule.gesture_calls().is_empty());

    rule.advance_to(300);
    assert_eq!(
        rule.gesture_calls(),
        vec![EngineCall::ShowPress(20, 30), EngineCall::SingleTap(20, 30)]
    );
    assert_eq!(rule.arbiter().responder().last_tap(), Some((20, 30)));
}

#[test]
fn holding_still_shows_press_then_long_presses() {
    let mut rule = local_rule();

    rule.touch(0, Down, 10.0, 20.0);
    rule.advance_to(700);
    rule.touch(800, Up, 10.0, 20.0);
    rule.advance_to(2000);

    assert_eq!(
        rule.gesture_calls(),
        vec![EngineCall::ShowPress(10, 20), EngineCall::LongPress(10, 20)]
    );
}

#[test]
fn moving_past_the_slop_cancels_the_long_press() {
    let mut rule = local_rule();

    rule.touch(0, Down, 0.0, 0.0);
    rule.touch(100, Move, 0.0, 20.0);
    rule.advance_to(2000);

    assert!(!rule.arbiter().is_in_long_press());
    assert!(!rule
        .gesture_calls()
        .iter()
        .any(|call| matches!(call, EngineCall::LongPress(..))));
}

#[test]
fn two_finger_spread_pinches_around_the_focus() {
    let mut rule = local_rule();
    let pinch = |action, time, second_x| {
        MotionEventBuilder::new(action)
            .down_time(0)
            .event_time(time)
            .pointer(0, 100.0, 100.0)
            .pointer(1, second_x, 100.0)
            .build()
    };

    rule.touch(0, Down, 100.0, 100.0);
    rule.send(pinch(PointerDown { index: 1 }, 10, 200.0));
    rule.send(pinch(Move, 20, 220.0));
    rule.send(pinch(Move, 30, 260.0));
    rule.send(pinch(PointerUp { index: 1 }, 40, 260.0));

    let pinch_calls: Vec<EngineCall> = rule
        .gesture_calls()
        .into_iter()
        .filter(|call| {
            matches!(
                call,
                EngineCall::PinchBegin | EngineCall::PinchBy(..) | EngineCall::PinchEnd
            )
        })
        .collect();
    assert_eq!(pinch_calls.len(), 4);
    assert_eq!(pinch_calls[0], EngineCall::PinchBegin);
    match pinch_calls[2] {
        EngineCall::PinchBy(delta, 180, 100) => assert!((delta - 160.0 / 120.0).abs() < 1e-4),
        ref other => panic!("expected pinch_by at the focus, got {other:?}"),
    }
    assert_eq!(pinch_calls[3], EngineCall::PinchEnd);
    assert!(rule.arbiter().is_native_scrolling());
}

#[test]
fn route_observer_sees_every_decision() {
    let mut rule = local_rule();

    rule.touch(0, Down, 0.0, 0.0);
    rule.touch(10, Move, 1.0, 0.0);
    rule.touch(20, Up, 1.0, 0.0);

    let stats = rule.arbiter().stats();
    assert_eq!(stats.local, 3);
    assert_eq!(rule.routes().len(), 3);
}
