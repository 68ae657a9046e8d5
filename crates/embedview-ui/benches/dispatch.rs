use criterion::{black_box, criterion_group, criterion_main, Criterion};
use embedview_foundation::MotionAction;
use embedview_testing::{RecordingEngine, TouchTestRule};

const SWIPE_SAMPLES: u64 = 120;

/// One fast swipe: every move is offered, coalesced behind the pending one,
/// then acknowledged as declined and replayed locally.
fn swipe(rule: &mut TouchTestRule, start: u64) {
    rule.touch(start, MotionAction::Down, 0.0, 0.0);
    for step in 1..=SWIPE_SAMPLES {
        rule.touch(start + step * 4, MotionAction::Move, step as f32 * 6.0, 0.0);
        if step % 8 == 0 {
            rule.ack(false);
        }
    }
    rule.touch(
        start + SWIPE_SAMPLES * 4 + 4,
        MotionAction::Up,
        SWIPE_SAMPLES as f32 * 6.0,
        0.0,
    );
    while rule.arbiter().pending_event_count() > 0 {
        rule.ack(false);
    }
}

fn fast_swipe_declined_by_engine(c: &mut Criterion) {
    let mut rule = TouchTestRule::new();
    let mut start = 0;

    c.bench_function("fast_swipe_declined_by_engine", |b| {
        b.iter(|| {
            swipe(&mut rule, start);
            start += 10_000;
            if let Some(engine) = rule.engine_mut() {
                engine.clear();
            }
            black_box(rule.take_routes());
        });
    });
}

fn fast_swipe_without_touch_handlers(c: &mut Criterion) {
    let mut rule = TouchTestRule::with_engine(RecordingEngine::not_forwarding());
    let mut start = 0;

    c.bench_function("fast_swipe_without_touch_handlers", |b| {
        b.iter(|| {
            swipe(&mut rule, start);
            start += 10_000;
            if let Some(engine) = rule.engine_mut() {
                engine.clear();
            }
            black_box(rule.arbiter().stats());
            rule.take_routes();
        });
    });
}

criterion_group!(
    benches,
    fast_swipe_declined_by_engine,
    fast_swipe_without_touch_handlers
);
criterion_main!(benches);
