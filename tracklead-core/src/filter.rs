//! Constant-velocity lead prediction.

/// One-step linear extrapolation from the last two observed positions.
///
/// The previous position starts at the origin, so the first prediction
/// after construction is skewed by the distance from `(0, 0)`. The state
/// is not reset when one target disappears and another appears.
#[derive(Debug, Clone, Default)]
pub struct TrackingFilter {
    prev_x: f64,
    prev_y: f64,
}

impl TrackingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predict where the target will be one cycle from now and remember
    /// `(x, y)` as the latest observation.
    pub fn predict(&mut self, x: f64, y: f64) -> (f64, f64) {
        let velocity_x = x - self.prev_x;
        let velocity_y = y - self.prev_y;

        self.prev_x = x;
        self.prev_y = y;

        (x + velocity_x, y + velocity_y)
    }

    /// Last observed (not predicted) position.
    pub fn previous(&self) -> (f64, f64) {
        (self.prev_x, self.prev_y)
    }
}
