use super::{MotionAction, MotionEvent, PointerId};
use embedview_ui_graphics::Point;
use smallvec::SmallVec;
use std::f32::consts::PI;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPointState {
    Undefined,
    Released,
    Pressed,
    Moved,
    Stationary,
    Cancelled,
}

/// Kind of touch sample the native engine receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// Snapshot of one finger as offered to the native engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: PointerId,
    pub state: TouchPointState,
    pub position: Point,
    pub pressure: f32,
    pub size: f32,
}

pub type TouchPoints = SmallVec<[TouchPoint; 4]>;

impl TouchPoint {
    /// Converts a raw sample into the engine's touch event type and points.
    ///
    /// For `PointerDown`/`PointerUp` only the pointer at the action index
    /// changes state; the others are reported stationary.
    pub fn from_motion_event(
        event: &MotionEvent,
    ) -> Result<(TouchEventType, TouchPoints), TouchConversionError> {
        if event.pointers.is_empty() {
            return Err(TouchConversionError::NoPointers);
        }
        let (event_type, default_state) = match event.action {
            MotionAction::Down => (TouchEventType::Start, TouchPointState::Pressed),
            MotionAction::Up => (TouchEventType::End, TouchPointState::Released),
            MotionAction::Move => (TouchEventType::Move, TouchPointState::Moved),
            MotionAction::Cancel => (TouchEventType::Cancel, TouchPointState::Cancelled),
            MotionAction::PointerDown { .. } => {
                (TouchEventType::Start, TouchPointState::Stationary)
            }
            MotionAction::PointerUp { .. } => (TouchEventType::End, TouchPointState::Stationary),
            MotionAction::Outside => {
                return Err(TouchConversionError::UnsupportedAction(event.action))
            }
        };

        let changed = match event.action {
            MotionAction::PointerDown { index } => Some((index, TouchPointState::Pressed)),
            MotionAction::PointerUp { index } => Some((index, TouchPointState::Released)),
            _ => None,
        };
        if let Some((index, _)) = changed {
            if index >= event.pointers.len() {
                return Err(TouchConversionError::PointerIndexOutOfRange {
                    index,
                    pointer_count: event.pointers.len(),
                });
            }
        }

        let points = event
            .pointers
            .iter()
            .enumerate()
            .map(|(index, coords)| {
                let state = match changed {
                    Some((changed_index, state)) if changed_index == index => state,
                    _ => default_state,
                };
                TouchPoint {
                    id: coords.id,
                    state,
                    position: coords.position(),
                    pressure: coords.pressure,
                    size: coords.size,
                }
            })
            .collect();
        Ok((event_type, points))
    }

    /// Contact radius in engine units derived from the normalized size.
    pub fn radius(&self) -> i32 {
        (self.size.max(0.0).sqrt() / PI * 1024.0) as i32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchConversionError {
    /// The action has no touch point equivalent.
    UnsupportedAction(MotionAction),
    NoPointers,
    PointerIndexOutOfRange { index: usize, pointer_count: usize },
    /// A batched sample must carry as many pointers as the event it joins.
    PointerCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TouchConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchConversionError::UnsupportedAction(action) => {
                write!(f, "{action:?} cannot be sent as touch points")
            }
            TouchConversionError::NoPointers => write!(f, "motion event has no pointers"),
            TouchConversionError::PointerIndexOutOfRange {
                index,
                pointer_count,
            } => write!(
                f,
                "action index {index} out of range for {pointer_count} pointers"
            ),
            TouchConversionError::PointerCountMismatch { expected, actual } => write!(
                f,
                "batched sample has {actual} pointers, event has {expected}"
            ),
        }
    }
}

impl std::error::Error for TouchConversionError {}
