//! Pure math for touch input in embedview
//!
//! This crate contains the geometry primitives and pixel unit types that the
//! input pipeline passes between the platform, the recognizers and the
//! native engine.

mod geometry;
mod unit;

pub use geometry::*;
pub use unit::*;

pub mod prelude {
    pub use crate::geometry::{Point, Size};
    pub use crate::unit::{Dp, Px};
}
