use super::pending_queue::{PendingEventQueue, PendingMotionEvent};
use super::{TouchDispatchStats, TouchRoute};
use crate::engine::{ForwardingDisposition, NativeEngine};
use crate::gesture_responder::{GestureResponder, ResponderSink};
use embedview_core::{CallbackId, Clock, Handler};
use embedview_foundation::{
    ConfigError, GestureDetectorProxy, MotionAction, MotionEvent, ScaleGestureDetector,
    TouchPoint, ViewConfiguration,
};
use std::rc::Rc;

type RouteObserver = Box<dyn FnMut(TouchRoute, &MotionEvent)>;

/// Decides, per touch sample, whether the native engine or the local
/// recognizers get it, and replays deferred samples once the engine's
/// verdict is known.
///
/// Every sample ends up handled exactly once: either locally (immediately,
/// or replayed from the pending queue) or by the engine when it
/// acknowledges a forwarded sample as handled. Replays keep arrival order.
/// The engine gets `engine_ack_timeout_ms` to answer for the head of the
/// queue; after that the rest of the gesture is replayed locally and the
/// engine receives a cancel.
///
/// All methods must be called on the UI thread. Deferred work is posted to
/// the [`Handler`] and comes back through [`run_callback`](Self::run_callback).
pub struct TouchDispatchArbiter<E: NativeEngine> {
    config: ViewConfiguration,
    engine: Option<E>,
    handler: Rc<dyn Handler>,
    clock: Rc<dyn Clock>,
    proxy: GestureDetectorProxy,
    scale: ScaleGestureDetector,
    responder: GestureResponder,
    queue: PendingEventQueue,

    need_touch_events: bool,
    /// Set after a timed-out gesture was cancelled in the engine; the rest
    /// of that gesture stays local.
    skip_send_to_native: bool,
    /// Set while the engine is consuming the current gesture, so its later
    /// samples wait for acknowledgments without a deadline.
    ack_timeout_suppressed: bool,
    pending_acks_to_ignore: u32,
    /// Offers the engine still owes an acknowledgment for.
    outstanding_acks: u32,
    /// Pending entry the armed timeout belongs to.
    timeout_owner: Option<u64>,

    observer: Option<RouteObserver>,
    stats: TouchDispatchStats,
}

impl<E: NativeEngine> TouchDispatchArbiter<E> {
    pub const TOUCH_ACK_TIMEOUT: CallbackId = CallbackId::new(20, "touch_ack_timeout");

    pub fn new(
        config: ViewConfiguration,
        engine: E,
        handler: Rc<dyn Handler>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let proxy = GestureDetectorProxy::new(&config, Rc::clone(&handler), Rc::clone(&clock));
        Ok(Self {
            scale: ScaleGestureDetector::new(&config),
            responder: GestureResponder::new(&config),
            config,
            engine: Some(engine),
            handler,
            clock,
            proxy,
            queue: PendingEventQueue::new(),
            need_touch_events: false,
            skip_send_to_native: false,
            ack_timeout_suppressed: false,
            pending_acks_to_ignore: 0,
            outstanding_acks: 0,
            timeout_owner: None,
            observer: None,
            stats: TouchDispatchStats::default(),
        })
    }

    /// Entry point for every raw touch sample delivered to the view.
    ///
    /// Returns `true` when the sample was taken: sent to the engine, queued,
    /// or consumed by a local recognizer.
    pub fn on_touch_event(&mut self, event: MotionEvent) -> bool {
        self.proxy.cancel_long_press_if_needed(&event);

        if event.action == MotionAction::Down {
            // The engine drops samples while it believes a fling is running.
            self.responder.end_fling(engine_ref(&mut self.engine));

            if self.queue.is_empty() {
                self.ack_timeout_suppressed = false;
            }
            self.skip_send_to_native = false;
        }

        match self.offer_touch_event_to_native(event) {
            Ok(()) => true,
            Err(event) => {
                let handled = self.process_touch_event(&event);
                self.report(TouchRoute::Local, &event);
                handled
            }
        }
    }

    /// Acknowledgment from the engine for the oldest sample it was offered.
    pub fn confirm_touch_event(&mut self, handled: bool) {
        self.outstanding_acks = self.outstanding_acks.saturating_sub(1);
        if self.pending_acks_to_ignore > 0 {
            self.pending_acks_to_ignore -= 1;
            self.stats.ignored_acks += 1;
            log::trace!(
                "ignoring late ack ({} more to ignore)",
                self.pending_acks_to_ignore
            );
            return;
        }
        self.consume_pending_touch_events(handled, false);
    }

    /// The page gained or lost touch handlers. Losing them (for example on
    /// navigation) drops everything buffered without replaying it.
    pub fn set_need_touch_events(&mut self, need: bool) {
        self.need_touch_events = need;
        if !need {
            self.reset_pending_state();
        }
    }

    /// Routes a due callback from the host's message loop. Returns `false`
    /// if `id` does not belong to this view.
    pub fn run_callback(&mut self, id: CallbackId) -> bool {
        if id == Self::TOUCH_ACK_TIMEOUT {
            self.on_ack_timeout();
            return true;
        }
        let scale_in_progress = self.scale.is_in_progress();
        let in_long_press = self.proxy.is_in_long_press();
        let mut sink = ResponderSink::new(&mut self.responder, engine_ref(&mut self.engine))
            .with_scale_in_progress(scale_in_progress)
            .with_long_press(in_long_press);
        self.proxy.on_callback(id, &mut sink)
    }

    /// The native view is gone. Buffered samples and timers are dropped and
    /// all further input is handled locally.
    pub fn detach_engine(&mut self) -> Option<E> {
        self.reset_pending_state();
        self.proxy.cancel_all();
        self.responder.reset();
        self.engine.take()
    }

    pub fn set_observer(&mut self, observer: Option<RouteObserver>) {
        self.observer = observer;
    }

    pub fn update_page_scale_limits(&mut self, min_scale: f32, max_scale: f32) {
        self.responder.update_page_scale_limits(min_scale, max_scale);
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.responder.set_viewport_size(width, height);
    }

    pub fn stats(&self) -> TouchDispatchStats {
        self.stats
    }

    pub fn config(&self) -> &ViewConfiguration {
        &self.config
    }

    pub fn pending_event_count(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_acks_to_ignore(&self) -> u32 {
        self.pending_acks_to_ignore
    }

    pub fn is_ack_timeout_suppressed(&self) -> bool {
        self.ack_timeout_suppressed
    }

    pub fn is_native_scrolling(&self) -> bool {
        self.responder.is_native_scrolling()
    }

    pub fn skips_native(&self) -> bool {
        self.skip_send_to_native
    }

    pub fn needs_touch_events(&self) -> bool {
        self.need_touch_events
    }

    pub fn is_in_long_press(&self) -> bool {
        self.proxy.is_in_long_press()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub fn responder(&self) -> &GestureResponder {
        &self.responder
    }

    /// Offers `event` to the engine. Hands it back when it must be handled
    /// locally right now.
    fn offer_touch_event_to_native(&mut self, event: MotionEvent) -> Result<(), MotionEvent> {
        self.proxy.on_offer_touch_event_to_native(&event);

        if !self.need_touch_events || self.skip_send_to_native || self.engine.is_none() {
            return Err(event);
        }

        if event.action == MotionAction::Move {
            if !self.proxy.confirm_offer_move_event_to_native(&event) {
                // Jitter inside the slop never reaches the engine. It still
                // has to wait its turn behind anything buffered.
                if self.queue.is_empty() {
                    if self.ack_timeout_suppressed {
                        // The page owns this gesture.
                        self.advance_scale_only(&event);
                        self.report(TouchRoute::ScaleOnly, &event);
                        return Ok(());
                    }
                    return Err(event);
                }
                let now = self.clock.uptime_millis();
                self.report(TouchRoute::Queued, &event);
                self.queue
                    .push_back(event, ForwardingDisposition::NotForwarded, now);
                return Ok(());
            }
            if let Some(previous) = self.queue.back_mut() {
                if previous.disposition == ForwardingDisposition::Forwarded
                    && previous.event.action == MotionAction::Move
                    && previous.event.pointer_count() == event.pointer_count()
                {
                    match previous
                        .event
                        .add_batch(event.event_time, &event.pointers)
                    {
                        Ok(()) => {
                            self.report(TouchRoute::Coalesced, &event);
                            return Ok(());
                        }
                        Err(err) => log::debug!("not coalescing move: {err}"),
                    }
                }
            }
        }

        let (event_type, points) = match TouchPoint::from_motion_event(&event) {
            Ok(converted) => converted,
            Err(err) => {
                log::debug!("handling {:?} locally: {err}", event.action);
                return Err(event);
            }
        };
        let Some(engine) = self.engine.as_mut() else {
            return Err(event);
        };
        let disposition = engine.offer_touch_event(event_type, event.event_time, &points);
        if disposition == ForwardingDisposition::NotForwarded && self.queue.is_empty() {
            return Err(event);
        }
        if disposition != ForwardingDisposition::NotForwarded {
            self.outstanding_acks += 1;
        }

        let now = self.clock.uptime_millis();
        let deadline = if disposition == ForwardingDisposition::Forwarded {
            now + self.config.engine_ack_timeout_ms
        } else {
            now
        };
        let was_empty = self.queue.is_empty();
        let route = if disposition == ForwardingDisposition::NotForwarded {
            TouchRoute::Queued
        } else {
            TouchRoute::Forwarded
        };
        self.report(route, &event);
        let id = self.queue.push_back(event, disposition, deadline);
        if was_empty && !self.ack_timeout_suppressed {
            self.arm_ack_timeout(id, deadline);
        }
        Ok(())
    }

    /// Feeds a sample to the local recognizers.
    fn process_touch_event(&mut self, event: &MotionEvent) -> bool {
        // A lift ends scrolling unless it turns into a fling.
        let possibly_end_scrolling =
            event.action == MotionAction::Up && self.responder.is_native_scrolling();
        let mut handled = false;

        if self.proxy.can_handle(event) {
            let scale_in_progress = self.scale.is_in_progress();
            let in_long_press = self.proxy.is_in_long_press();
            let mut sink = ResponderSink::new(&mut self.responder, engine_ref(&mut self.engine))
                .with_scale_in_progress(scale_in_progress)
                .with_long_press(in_long_press);
            handled |= self.proxy.on_touch_event(event, &mut sink);
        }

        let mut sink = ResponderSink::new(&mut self.responder, engine_ref(&mut self.engine));
        handled |= self.scale.on_touch_event(event, &mut sink);

        if possibly_end_scrolling && !handled {
            self.responder
                .tell_native_scrolling_has_ended(engine_ref(&mut self.engine));
        }
        handled
    }

    /// The page took `event`; only keep the pinch recognizer in step so a
    /// later pinch starts from the right span.
    fn advance_scale_only(&mut self, event: &MotionEvent) {
        let mut sink = ResponderSink::new(&mut self.responder, engine_ref(&mut self.engine))
            .ignoring_scale_events(true);
        self.scale.on_touch_event(event, &mut sink);
    }

    fn on_ack_timeout(&mut self) {
        self.timeout_owner = None;
        if self.queue.is_empty() {
            log::warn!("touch ack timeout fired with nothing pending");
            return;
        }
        self.stats.timeouts += 1;
        log::debug!(
            "engine did not answer within {} ms, draining gesture",
            self.config.engine_ack_timeout_ms
        );
        self.consume_pending_touch_events(false, true);
        // The timed-out head may still be acknowledged later.
        self.pending_acks_to_ignore += 1;
        self.check_ack_counters();
    }

    fn consume_pending_touch_events(&mut self, handled: bool, timed_out: bool) {
        let Some(head) = self.queue.pop_front() else {
            log::warn!("touch ack with nothing pending");
            return;
        };

        if !handled || head.disposition == ForwardingDisposition::ConvertedToCancel {
            if !self.process_touch_event(&head.event) {
                log::warn!("unhandled deferred touch event {:?}", head.event.action);
            }
            self.report(TouchRoute::Replayed, &head.event);
        } else {
            self.ack_timeout_suppressed = true;
            self.advance_scale_only(&head.event);
            self.report(TouchRoute::ScaleOnly, &head.event);
        }

        if self.timeout_owner == Some(head.id) {
            self.handler.remove_callbacks(Self::TOUCH_ACK_TIMEOUT);
            self.timeout_owner = None;
        }

        let mut within_same_sequence = head.event.action != MotionAction::Up;
        let mut continue_to_drain = timed_out && within_same_sequence;
        let touch_handled_by_engine = self.ack_timeout_suppressed;
        self.ack_timeout_suppressed &= within_same_sequence;

        // A lift or a scroll may still be queued behind a down whose long
        // press timer is running.
        self.proxy.cancel_long_press_for_pending(self.queue.events());

        let mut last_event = head.event;
        while let Some(next) = self.queue.front() {
            if next.was_offered() && !continue_to_drain {
                break;
            }
            let Some(PendingMotionEvent {
                event, disposition, ..
            }) = self.queue.pop_front()
            else {
                break;
            };
            within_same_sequence = event.action != MotionAction::Up;
            continue_to_drain &= within_same_sequence;
            self.ack_timeout_suppressed &= within_same_sequence;
            if disposition == ForwardingDisposition::NotForwarded && self.ack_timeout_suppressed {
                // Jitter held back behind a sample the page consumed.
                self.advance_scale_only(&event);
                self.report(TouchRoute::ScaleOnly, &event);
            } else {
                self.process_touch_event(&event);
                self.report(TouchRoute::Replayed, &event);
            }
            if disposition != ForwardingDisposition::NotForwarded {
                self.pending_acks_to_ignore += 1;
                self.check_ack_counters();
            }
            last_event = event;
        }

        if !self.ack_timeout_suppressed {
            if let Some(next) = self.queue.front() {
                let (id, deadline) = (next.id, next.timeout_deadline);
                let rearm_fresh_down = touch_handled_by_engine
                    && next.event.action == MotionAction::Down
                    && next.disposition == ForwardingDisposition::Forwarded;
                let when = if rearm_fresh_down {
                    // This down was queued while the engine worked on the
                    // previous gesture; its own deadline may already be gone.
                    self.clock.uptime_millis() + self.config.engine_ack_timeout_ms
                } else {
                    deadline
                };
                self.arm_ack_timeout(id, when);
            }
        }

        if self.queue.is_empty() && continue_to_drain {
            self.cancel_gesture_in_engine(&last_event);
        }
    }

    /// Stops sending the current gesture to the engine and tells it the
    /// gesture was cancelled.
    fn cancel_gesture_in_engine(&mut self, last_event: &MotionEvent) {
        if self.skip_send_to_native {
            log::error!("gesture cancelled in the engine twice");
        }
        self.skip_send_to_native = true;
        let cancel = last_event.with_action(MotionAction::Cancel);
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let disposition = match TouchPoint::from_motion_event(&cancel) {
            Ok((event_type, points)) => {
                engine.offer_touch_event(event_type, cancel.event_time, &points)
            }
            Err(err) => {
                log::warn!("could not send cancel to engine: {err}");
                return;
            }
        };
        log::debug!("sent cancel to engine for timed-out gesture ({disposition:?})");
        if disposition != ForwardingDisposition::NotForwarded {
            self.outstanding_acks += 1;
            self.pending_acks_to_ignore += 1;
            self.check_ack_counters();
        }
        self.report(TouchRoute::SyntheticCancel, &cancel);
    }

    fn arm_ack_timeout(&mut self, owner: u64, when: u64) {
        self.timeout_owner = Some(owner);
        self.handler.post_at_time(Self::TOUCH_ACK_TIMEOUT, when);
    }

    fn reset_pending_state(&mut self) {
        let dropped: Vec<PendingMotionEvent> = self.queue.drain().collect();
        for pending in &dropped {
            self.report(TouchRoute::Dropped, &pending.event);
        }
        self.handler.remove_callbacks(Self::TOUCH_ACK_TIMEOUT);
        self.timeout_owner = None;
        self.pending_acks_to_ignore = 0;
        self.outstanding_acks = 0;
        self.ack_timeout_suppressed = false;
        self.skip_send_to_native = false;
    }

    /// Every ignored acknowledgment must stand for an offer that is still
    /// unanswered.
    fn check_ack_counters(&self) {
        if self.pending_acks_to_ignore > self.outstanding_acks {
            log::error!(
                "ignoring {} acks but only {} offers are unanswered",
                self.pending_acks_to_ignore,
                self.outstanding_acks
            );
            debug_assert!(
                self.pending_acks_to_ignore <= self.outstanding_acks,
                "ack ignore counter exceeds unanswered offers"
            );
        }
    }

    fn report(&mut self, route: TouchRoute, event: &MotionEvent) {
        self.stats.record(route);
        log::trace!("{:?} {:?} at {}", route, event.action, event.event_time);
        if let Some(observer) = self.observer.as_mut() {
            observer(route, event);
        }
    }
}

fn engine_ref<E: NativeEngine>(engine: &mut Option<E>) -> Option<&mut dyn NativeEngine> {
    engine.as_mut().map(|engine| engine as &mut dyn NativeEngine)
}
