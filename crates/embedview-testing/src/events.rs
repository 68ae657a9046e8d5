use embedview_foundation::{MotionAction, MotionEvent, PointerCoords};

/// Builds multi-pointer motion events for tests.
///
/// ```
/// use embedview_foundation::MotionAction;
/// use embedview_testing::MotionEventBuilder;
///
/// let event = MotionEventBuilder::new(MotionAction::PointerDown { index: 1 })
///     .down_time(0)
///     .event_time(16)
///     .pointer(0, 100.0, 100.0)
///     .pointer(1, 200.0, 100.0)
///     .build();
/// assert_eq!(event.pointer_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct MotionEventBuilder {
    action: MotionAction,
    down_time: u64,
    event_time: u64,
    pointers: Vec<PointerCoords>,
}

impl MotionEventBuilder {
    pub fn new(action: MotionAction) -> Self {
        Self {
            action,
            down_time: 0,
            event_time: 0,
            pointers: Vec::new(),
        }
    }

    pub fn down_time(mut self, down_time: u64) -> Self {
        self.down_time = down_time;
        self
    }

    pub fn event_time(mut self, event_time: u64) -> Self {
        self.event_time = event_time;
        self
    }

    pub fn pointer(mut self, id: u32, x: f32, y: f32) -> Self {
        self.pointers.push(PointerCoords::new(id, x, y));
        self
    }

    pub fn pointer_with_size(mut self, id: u32, x: f32, y: f32, size: f32) -> Self {
        self.pointers
            .push(PointerCoords::new(id, x, y).with_size(size));
        self
    }

    pub fn build(self) -> MotionEvent {
        MotionEvent::new(self.down_time, self.event_time, self.action, self.pointers)
    }
}
