//! Keyboard and mouse-button state queries.
//!
//! The loop never reads the OS directly: it asks a [`KeyboardState`]
//! implementation, which lets tests script key presses.
//!
//! # Platform
//!
//! [`SystemKeyboard`] reads `GetAsyncKeyState` / `GetKeyState` on
//! Windows. On other platforms it reports every key as released.

pub mod keys;

pub use keys::VirtualKey;

// ── KeyboardState ────────────────────────────────────────────────

/// Source of current key state.
pub trait KeyboardState: Send {
    /// Whether the key is physically held right now.
    fn is_down(&self, key: VirtualKey) -> bool;

    /// Whether the key's toggle bit is set (caps-lock style latch).
    fn is_toggled(&self, key: VirtualKey) -> bool {
        let _ = key;
        false
    }
}

// ── EdgeDetector ─────────────────────────────────────────────────

/// Turns a level signal into a rising-edge signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    was_down: bool,
}

impl EdgeDetector {
    /// Feed the current level; true only on a not-pressed → pressed
    /// transition.
    pub fn just_pressed(&mut self, down: bool) -> bool {
        let edge = down && !self.was_down;
        self.was_down = down;
        edge
    }
}

// ── Hotkeys ──────────────────────────────────────────────────────

/// The set of keys that arm aiming and shooting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hotkeys {
    pub keys: Vec<VirtualKey>,
    /// Treat a latched (toggled) key as held.
    pub lock_target: bool,
}

impl Hotkeys {
    pub fn new(keys: Vec<VirtualKey>, lock_target: bool) -> Self {
        Self { keys, lock_target }
    }

    /// True if any configured key is held (or latched, in lock mode).
    pub fn is_active(&self, keyboard: &dyn KeyboardState) -> bool {
        self.keys.iter().any(|&key| {
            keyboard.is_down(key) || (self.lock_target && keyboard.is_toggled(key))
        })
    }
}

// ── SystemKeyboard ───────────────────────────────────────────────

/// Reads key state from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemKeyboard;

impl SystemKeyboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::*;
    use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, GetKeyState};

    impl KeyboardState for SystemKeyboard {
        fn is_down(&self, key: VirtualKey) -> bool {
            // High bit set = currently down.
            let state = unsafe { GetAsyncKeyState(key.0 as i32) };
            state < 0
        }

        fn is_toggled(&self, key: VirtualKey) -> bool {
            let state = unsafe { GetKeyState(key.0 as i32) };
            state & 1 == 1
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::*;

    impl KeyboardState for SystemKeyboard {
        fn is_down(&self, _key: VirtualKey) -> bool {
            false
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
