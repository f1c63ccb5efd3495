//! Immutable configuration snapshot consumed by the tracking loop.
//!
//! The loop receives one [`TrackingConfig`] at construction and a fresh
//! copy on every reload; nothing reads shared mutable state.

use serde::{Deserialize, Serialize};

use crate::input::Hotkeys;
use crate::settings::Tunables;
use crate::types::ScreenGeometry;

/// Behaviour switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ModeFlags {
    /// Fire while the hotkey is held and the target is in scope.
    pub auto_shoot: bool,
    /// Fire on scope entry without moving the pointer.
    pub triggerbot: bool,
    /// Move and fire without waiting for the hotkey.
    pub auto_aim: bool,
    /// Treat every target as in scope.
    pub force_fire: bool,
    /// A latched hotkey counts as held.
    pub lock_target: bool,
    /// Arrow keys tune [`Tunables`] at runtime.
    pub arrow_tuning: bool,
    /// Publish predicted positions to the prediction sink.
    pub show_prediction: bool,
}

/// Everything the loop needs per cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackingConfig {
    pub geometry: ScreenGeometry,
    pub tunables: Tunables,
    pub modes: ModeFlags,
    pub hotkeys: Hotkeys,
}
