//! Win32 `SendInput` relative mouse injection.
//!
//! # Platform
//!
//! Windows-only. On other platforms the injector is defined but every
//! call returns [`TrackError::Unsupported`].

use crate::actuator::Actuator;
use crate::error::TrackError;
use crate::types::MouseButton;

// ── Raw mouse input ──────────────────────────────────────────────

/// `MOUSEINPUT.dwFlags` values used by this crate.
pub mod flags {
    pub const MOVE: u32 = 0x0001;
    pub const LEFT_DOWN: u32 = 0x0002;
    pub const LEFT_UP: u32 = 0x0004;
    pub const RIGHT_DOWN: u32 = 0x0008;
    pub const RIGHT_UP: u32 = 0x0010;
    pub const MIDDLE_DOWN: u32 = 0x0020;
    pub const MIDDLE_UP: u32 = 0x0040;
}

/// A platform-neutral description of one `INPUT_MOUSE` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMouseInput {
    pub dx: i32,
    pub dy: i32,
    pub flags: u32,
}

impl RawMouseInput {
    /// Relative move by `(dx, dy)` counts.
    pub fn motion(dx: i32, dy: i32) -> Self {
        Self {
            dx,
            dy,
            flags: flags::MOVE,
        }
    }

    pub fn button_down(button: MouseButton) -> Self {
        let flags = match button {
            MouseButton::Left => flags::LEFT_DOWN,
            MouseButton::Right => flags::RIGHT_DOWN,
            MouseButton::Middle => flags::MIDDLE_DOWN,
        };
        Self { dx: 0, dy: 0, flags }
    }

    pub fn button_up(button: MouseButton) -> Self {
        let flags = match button {
            MouseButton::Left => flags::LEFT_UP,
            MouseButton::Right => flags::RIGHT_UP,
            MouseButton::Middle => flags::MIDDLE_UP,
        };
        Self { dx: 0, dy: 0, flags }
    }
}

// ── NativeInjector ───────────────────────────────────────────────

/// Injects pointer events through the OS input stream.
///
/// `SendInput` requires the calling process to run in the same desktop
/// session as the foreground application.
#[derive(Debug, Default)]
pub struct NativeInjector;

impl NativeInjector {
    /// Create a new injector (no initialisation cost).
    pub fn new() -> Self {
        Self
    }
}

impl Actuator for NativeInjector {
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError> {
        send(RawMouseInput::motion(dx, dy))
    }

    fn press(&mut self, button: MouseButton) -> Result<(), TrackError> {
        send(RawMouseInput::button_down(button))
    }

    fn release(&mut self, button: MouseButton) -> Result<(), TrackError> {
        send(RawMouseInput::button_up(button))
    }

    fn name(&self) -> &'static str {
        "os-native"
    }
}

// ── Windows implementation ───────────────────────────────────────

#[cfg(target_os = "windows")]
pub(crate) fn send(input: RawMouseInput) -> Result<(), TrackError> {
    use windows::Win32::UI::Input::KeyboardAndMouse::*;

    let record = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: input.dx,
                dy: input.dy,
                mouseData: 0,
                dwFlags: MOUSE_EVENT_FLAGS(input.flags),
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    let sent = unsafe { SendInput(&[record], std::mem::size_of::<INPUT>() as i32) };
    if sent == 0 {
        return Err(TrackError::Backend("SendInput (mouse) returned 0".into()));
    }
    Ok(())
}

// ── Non-Windows stub ─────────────────────────────────────────────

#[cfg(not(target_os = "windows"))]
pub(crate) fn send(_input: RawMouseInput) -> Result<(), TrackError> {
    Err(TrackError::Unsupported(
        "input injection is only available on Windows",
    ))
}

// ── Tests ────────────────────────────────────────────────────────
