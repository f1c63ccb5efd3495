//! Shared value types passed between pipeline stages.

use serde::{Deserialize, Serialize};

// ── Detection ────────────────────────────────────────────────────

/// One observed target, in detection-window pixel coordinates.
///
/// `x`/`y` is the aim point reported by the vision pipeline and
/// `width`/`height` the size of its bounding box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Detection {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

// ── ScreenGeometry ───────────────────────────────────────────────

/// Size of the detection window the coordinates are expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScreenGeometry {
    pub width: f64,
    pub height: f64,
}

impl ScreenGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Centre of the window; the crosshair sits here.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::new(320.0, 320.0)
    }
}

// ── MotionCommand ────────────────────────────────────────────────

/// Relative pointer motion in device units, before truncation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    pub dx: f64,
    pub dy: f64,
}

impl MotionCommand {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Integer motion to dispatch, truncated toward zero.
    ///
    /// Returns `None` when either component is not a finite number,
    /// which suppresses motion for the cycle.
    pub fn to_device_units(&self) -> Option<(i32, i32)> {
        if !self.dx.is_finite() || !self.dy.is_finite() {
            return None;
        }
        Some((self.dx.trunc() as i32, self.dy.trunc() as i32))
    }
}

// ── MouseButton ──────────────────────────────────────────────────

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Numeric button id used by the vendor driver and the
    /// microcontroller link (1 = left, 2 = right, 3 = middle).
    pub fn code(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 3,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
