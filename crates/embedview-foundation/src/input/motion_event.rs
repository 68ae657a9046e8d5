use super::TouchConversionError;
use embedview_ui_graphics::Point;
use smallvec::SmallVec;

pub type PointerId = u32;

/// What a motion sample reports about the pointers it carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionAction {
    /// First pointer went down; starts a gesture.
    Down,
    /// Last pointer went up; ends a gesture.
    Up,
    Move,
    Cancel,
    /// Touch landed outside the view's bounds.
    Outside,
    /// An extra pointer went down at `index`.
    PointerDown { index: usize },
    /// A non-last pointer went up at `index`.
    PointerUp { index: usize },
}

impl MotionAction {
    /// Index of the pointer that changed for `PointerDown` and `PointerUp`.
    pub fn action_index(&self) -> Option<usize> {
        match self {
            MotionAction::PointerDown { index } | MotionAction::PointerUp { index } => {
                Some(*index)
            }
            _ => None,
        }
    }

    pub fn is_pointer_change(&self) -> bool {
        self.action_index().is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerCoords {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    /// Normalized contact area, 0.0 to 1.0.
    pub size: f32,
}

impl PointerCoords {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            pressure: 1.0,
            size: 0.0,
        }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// An earlier sample folded into a [`MotionEvent`] by [`MotionEvent::add_batch`].
#[derive(Clone, Debug, PartialEq)]
pub struct BatchedSample {
    pub event_time: u64,
    pub pointers: SmallVec<[PointerCoords; 4]>,
}

/// One raw touch sample as the platform delivers it.
///
/// Times are uptime milliseconds on the same base as the view's
/// [`Clock`](embedview_core::Clock). `down_time` identifies the gesture the
/// sample belongs to: every sample from one `Down` to the matching `Up` or
/// `Cancel` carries the same value.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    pub down_time: u64,
    pub event_time: u64,
    pub action: MotionAction,
    pub pointers: SmallVec<[PointerCoords; 4]>,
    history: Vec<BatchedSample>,
}

impl MotionEvent {
    pub fn new(
        down_time: u64,
        event_time: u64,
        action: MotionAction,
        pointers: impl IntoIterator<Item = PointerCoords>,
    ) -> Self {
        Self {
            down_time,
            event_time,
            action,
            pointers: pointers.into_iter().collect(),
            history: Vec::new(),
        }
    }

    /// Single-finger sample with pointer id 0.
    pub fn single(down_time: u64, event_time: u64, action: MotionAction, x: f32, y: f32) -> Self {
        Self::new(down_time, event_time, action, [PointerCoords::new(0, x, y)])
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pointer(&self, index: usize) -> Option<&PointerCoords> {
        self.pointers.get(index)
    }

    pub fn find_pointer_index(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|pointer| pointer.id == id)
    }

    /// X of the first pointer, 0.0 when there are no pointers.
    pub fn x(&self) -> f32 {
        self.pointers.first().map_or(0.0, |pointer| pointer.x)
    }

    pub fn y(&self) -> f32 {
        self.pointers.first().map_or(0.0, |pointer| pointer.y)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    /// Samples merged into this one, oldest first. The current coordinates
    /// are not part of the history.
    pub fn history(&self) -> &[BatchedSample] {
        &self.history
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    /// Appends a newer sample to this event.
    ///
    /// The current coordinates move into the history and `pointers` become
    /// the current ones. The pointer count must not change.
    pub fn add_batch(
        &mut self,
        event_time: u64,
        pointers: &[PointerCoords],
    ) -> Result<(), TouchConversionError> {
        if pointers.len() != self.pointers.len() {
            return Err(TouchConversionError::PointerCountMismatch {
                expected: self.pointers.len(),
                actual: pointers.len(),
            });
        }
        let previous = std::mem::replace(&mut self.pointers, pointers.iter().copied().collect());
        self.history.push(BatchedSample {
            event_time: self.event_time,
            pointers: previous,
        });
        self.event_time = event_time;
        Ok(())
    }

    /// Copy of this event reporting `action` instead, with the same
    /// coordinates and times.
    pub fn with_action(&self, action: MotionAction) -> Self {
        Self {
            action,
            ..self.clone()
        }
    }
}
