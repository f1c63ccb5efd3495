//! Live-tunable conversion parameters.
//!
//! With arrow-key tuning enabled, Left/Right cycle through the
//! adjustable parameters (edge triggered) and Up/Down nudge the
//! selected one every poll while held.

use serde::{Deserialize, Serialize};

use crate::input::{EdgeDetector, KeyboardState, VirtualKey};

// ── Tunables ─────────────────────────────────────────────────────

/// Parameters read by the movement model every cycle.
///
/// Values are not validated; a sensitivity of zero or below yields
/// non-finite or inverted motion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tunables {
    pub dpi: f64,
    pub sensitivity: f64,
    /// Horizontal field of view in degrees.
    pub fov_x: f64,
    /// Vertical field of view in degrees.
    pub fov_y: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            dpi: 1100.0,
            sensitivity: 3.0,
            fov_x: 106.0,
            fov_y: 74.0,
        }
    }
}

// ── Parameter table ──────────────────────────────────────────────

/// An adjustable member of [`Tunables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Dpi,
    Sensitivity,
    FovX,
    FovY,
}

/// Accessors and step size for one [`Parameter`].
pub struct ParameterInfo {
    pub parameter: Parameter,
    pub name: &'static str,
    pub delta: f64,
    pub get: fn(&Tunables) -> f64,
    pub set: fn(&mut Tunables, f64),
}

/// Selection order for the tuner.
pub static PARAMETERS: [ParameterInfo; 4] = [
    ParameterInfo {
        parameter: Parameter::Dpi,
        name: "dpi",
        delta: 1.0,
        get: |t| t.dpi,
        set: |t, v| t.dpi = v,
    },
    ParameterInfo {
        parameter: Parameter::Sensitivity,
        name: "sensitivity",
        delta: 0.1,
        get: |t| t.sensitivity,
        set: |t, v| t.sensitivity = v,
    },
    ParameterInfo {
        parameter: Parameter::FovX,
        name: "fov_x",
        delta: 1.0,
        get: |t| t.fov_x,
        set: |t, v| t.fov_x = v,
    },
    ParameterInfo {
        parameter: Parameter::FovY,
        name: "fov_y",
        delta: 1.0,
        get: |t| t.fov_y,
        set: |t, v| t.fov_y = v,
    },
];

impl Parameter {
    pub fn info(self) -> &'static ParameterInfo {
        &PARAMETERS[self as usize]
    }
}

// ── SettingsTuner ────────────────────────────────────────────────

/// Keyboard-driven cyclic selector over [`PARAMETERS`].
#[derive(Debug, Default)]
pub struct SettingsTuner {
    index: usize,
    left: EdgeDetector,
    right: EdgeDetector,
}

impl SettingsTuner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the selected parameter in [`PARAMETERS`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> &'static ParameterInfo {
        &PARAMETERS[self.index]
    }

    /// Select the next parameter, wrapping at the end.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % PARAMETERS.len();
        tracing::info!("selected setting: {}", self.selected().name);
    }

    /// Select the previous parameter, wrapping at the start.
    pub fn retreat(&mut self) {
        self.index = (self.index + PARAMETERS.len() - 1) % PARAMETERS.len();
        tracing::info!("selected setting: {}", self.selected().name);
    }

    /// Add `steps * delta` to the selected parameter and return the new value.
    pub fn nudge(&mut self, tunables: &mut Tunables, steps: f64) -> f64 {
        let info = self.selected();
        let value = (info.get)(tunables) + steps * info.delta;
        (info.set)(tunables, value);
        tracing::info!("{} adjusted to {value}", info.name);
        value
    }

    /// Read the arrow keys once and apply whatever they ask for.
    pub fn poll(&mut self, keyboard: &dyn KeyboardState, tunables: &mut Tunables) {
        if keyboard.is_down(VirtualKey::UP) {
            self.nudge(tunables, 1.0);
        }
        if keyboard.is_down(VirtualKey::DOWN) {
            self.nudge(tunables, -1.0);
        }

        if self.right.just_pressed(keyboard.is_down(VirtualKey::RIGHT)) {
            self.advance();
        }
        if self.left.just_pressed(keyboard.is_down(VirtualKey::LEFT)) {
            self.retreat();
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
