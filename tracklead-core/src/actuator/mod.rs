//! Actuation backends.
//!
//! | Backend            | Module   | Transport                                 |
//! |--------------------|----------|-------------------------------------------|
//! | `OsNative`         | `native` | Win32 `SendInput`                         |
//! | `VendorDriver`     | `vendor` | vendor DLL, raw `SendInput` fallback      |
//! | `Microcontroller`  | `serial` | tagged frames over a device node          |
//!
//! Exactly one backend is opened per process and kept for its lifetime.

pub mod native;
pub mod serial;
pub mod vendor;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::types::MouseButton;

pub use native::{NativeInjector, RawMouseInput};
pub use serial::MicrocontrollerLink;
pub use vendor::VendorDriver;

// ── Actuator ─────────────────────────────────────────────────────

/// Uniform move / press / release contract.
///
/// Repeated presses without an intervening release must be harmless.
pub trait Actuator: Send {
    /// Relative pointer motion in device counts.
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError>;

    fn press(&mut self, button: MouseButton) -> Result<(), TrackError>;

    fn release(&mut self, button: MouseButton) -> Result<(), TrackError>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError> {
        (**self).move_by(dx, dy)
    }

    fn press(&mut self, button: MouseButton) -> Result<(), TrackError> {
        (**self).press(button)
    }

    fn release(&mut self, button: MouseButton) -> Result<(), TrackError> {
        (**self).release(button)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── Selection ────────────────────────────────────────────────────

/// Which backend to open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    OsNative,
    VendorDriver,
    Microcontroller,
}

/// Everything needed to open any backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    pub kind: BackendKind,
    /// Vendor driver library path.
    pub vendor_library: PathBuf,
    /// Microcontroller device node.
    pub serial_port: PathBuf,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::OsNative,
            vendor_library: PathBuf::from("ghub_mouse.dll"),
            serial_port: PathBuf::from(if cfg!(target_os = "windows") {
                r"\\.\COM3"
            } else {
                "/dev/ttyACM0"
            }),
        }
    }
}

/// Open the configured backend.
///
/// The vendor backend never fails here: it degrades internally.
pub fn open_backend(settings: &BackendSettings) -> Result<Box<dyn Actuator>, TrackError> {
    let backend: Box<dyn Actuator> = match settings.kind {
        BackendKind::OsNative => Box::new(NativeInjector::new()),
        BackendKind::VendorDriver => Box::new(VendorDriver::open(&settings.vendor_library)),
        BackendKind::Microcontroller => Box::new(MicrocontrollerLink::open(&settings.serial_port)?),
    };
    tracing::info!("actuation backend: {}", backend.name());
    Ok(backend)
}
