//! Replays a scripted gesture through the touch arbiter in real time,
//! against a simulated page that answers after a configurable latency.

mod options;
mod scenario;
mod simulated_engine;

use clap::Parser;
use embedview_core::{Clock, MessageQueue, StdClock};
use embedview_foundation::{MotionEvent, ViewConfiguration};
use embedview_ui::TouchDispatchArbiter;
use options::{Options, PageBehavior};
use simulated_engine::{AckSchedule, SimulatedEngine};
use std::process::ExitCode;
use std::rc::Rc;

/// Lead time before the first sample so setup does not eat into it.
const START_DELAY_MS: u64 = 10;

fn main() -> ExitCode {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = Options::parse();
    match replay(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("touch-replay: {err}");
            ExitCode::FAILURE
        }
    }
}

fn replay(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Rc::new(StdClock::new());
    let queue = Rc::new(MessageQueue::new());
    let acks = AckSchedule::default();
    let config = ViewConfiguration::default().scaled_for_density(options.density);
    let engine = SimulatedEngine::new(
        options.page,
        options.latency_ms,
        clock.clone(),
        Rc::clone(&acks),
    );

    let mut arbiter = TouchDispatchArbiter::new(config, engine, queue.clone(), clock.clone())?;
    arbiter.set_need_touch_events(options.page != PageBehavior::NoHandlers);
    arbiter.set_observer(Some(Box::new(|route, event: &MotionEvent| {
        println!(
            "{:>6} ms  {:<16} {:?}",
            event.event_time,
            format!("{route:?}"),
            event.action
        );
    })));

    println!(
        "=== {:?} against a page that {:?}, {} ms latency ===",
        options.scenario, options.page, options.latency_ms
    );

    let start = clock.uptime_millis() + START_DELAY_MS;
    let mut samples = scenario::samples(options.scenario, start)
        .into_iter()
        .peekable();

    loop {
        let now = clock.uptime_millis();
        while let Some(message) = queue.next_due(now) {
            arbiter.run_callback(message.callback);
        }
        loop {
            let due = acks.borrow().front().copied();
            match due {
                Some((when, handled)) if when <= now => {
                    acks.borrow_mut().pop_front();
                    arbiter.confirm_touch_event(handled);
                }
                _ => break,
            }
        }
        while let Some(event) = samples.next_if(|event| event.event_time <= now) {
            arbiter.on_touch_event(event);
        }

        let next_ack = acks.borrow().front().map(|(when, _)| *when);
        let next_sample = samples.peek().map(|event| event.event_time);
        let wake = [queue.next_wake_time(), next_ack, next_sample]
            .into_iter()
            .flatten()
            .min();
        match wake {
            Some(when) => std::thread::sleep(clock.duration_until(when)),
            None => break,
        }
    }

    let stats = arbiter.stats();
    println!("{stats:#?}");
    if arbiter.pending_event_count() > 0 {
        log::warn!(
            "{} sample(s) still waiting for the page",
            arbiter.pending_event_count()
        );
    }
    Ok(())
}
