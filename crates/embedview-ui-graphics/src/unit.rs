//! Unit types: Dp, Px, and conversions

/// Density-independent pixels
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Dp(pub f32);

impl Dp {
    pub fn to_px(&self, density: f32) -> Px {
        Px(self.0 * density)
    }
}

/// Raw device pixels, the unit of platform motion events.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Px(pub f32);

impl Px {
    /// Rounds to whole pixels the way the platform scales its slop values.
    pub fn round_to_int(&self) -> i32 {
        self.0.round() as i32
    }
}
