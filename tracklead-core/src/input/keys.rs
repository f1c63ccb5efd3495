//! Virtual key codes and the names used for them in configuration.

use serde::{Deserialize, Serialize};

/// A Windows virtual-key code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const LEFT_MOUSE: Self = Self(0x01);
    pub const RIGHT_MOUSE: Self = Self(0x02);
    pub const MIDDLE_MOUSE: Self = Self(0x04);
    pub const X1_MOUSE: Self = Self(0x05);
    pub const X2_MOUSE: Self = Self(0x06);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);

    /// Resolve a configuration key name, e.g. `"RightMouseButton"` or `"F5"`.
    ///
    /// Letters and digits map to their ASCII codes; lookup is
    /// case-sensitive for named keys.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();

        if let [c] = name.as_bytes() {
            if c.is_ascii_uppercase() || c.is_ascii_digit() {
                return Some(Self(*c as u16));
            }
        }

        if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<u16>().ok()) {
            if (1..=24).contains(&n) {
                return Some(Self(0x70 + n - 1));
            }
        }

        let code = match name {
            "LeftMouseButton" => 0x01,
            "RightMouseButton" => 0x02,
            "ControlBreak" => 0x03,
            "MiddleMouseButton" => 0x04,
            "X1MouseButton" => 0x05,
            "X2MouseButton" => 0x06,
            "Backspace" => 0x08,
            "Tab" => 0x09,
            "Enter" => 0x0D,
            "Shift" => 0x10,
            "Ctrl" => 0x11,
            "Alt" => 0x12,
            "Pause" => 0x13,
            "Capslock" => 0x14,
            "Escape" => 0x1B,
            "Space" => 0x20,
            "PageUp" => 0x21,
            "PageDown" => 0x22,
            "End" => 0x23,
            "Home" => 0x24,
            "LeftArrow" => 0x25,
            "UpArrow" => 0x26,
            "RightArrow" => 0x27,
            "DownArrow" => 0x28,
            "Insert" => 0x2D,
            "Delete" => 0x2E,
            "LeftShift" => 0xA0,
            "RightShift" => 0xA1,
            "LeftControl" => 0xA2,
            "RightControl" => 0xA3,
            "LeftAlt" => 0xA4,
            "RightAlt" => 0xA5,
            _ => return None,
        };
        Some(Self(code))
    }

    /// Resolve a list of names, skipping (and logging) unknown ones.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let key = Self::from_name(name);
                if key.is_none() {
                    tracing::warn!("unknown key name {name:?}; ignored");
                }
                key
            })
            .collect()
    }
}
