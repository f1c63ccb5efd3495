//! Injection through a vendor mouse-driver library.
//!
//! The library is loaded once at construction and must export
//! `mouse_open`, `moveR`, `press`, `release` and `mouse_close`. When it
//! cannot be loaded, a symbol is missing, or `mouse_open` reports
//! failure, the backend keeps working by submitting raw `INPUT` records
//! itself.

use std::path::Path;

use crate::actuator::Actuator;
use crate::actuator::native::{self, RawMouseInput};
use crate::error::TrackError;
use crate::types::MouseButton;

// ── VendorDriver ─────────────────────────────────────────────────

pub struct VendorDriver {
    library: Option<VendorLibrary>,
}

impl VendorDriver {
    /// Load the driver library at `path`, degrading to raw input events
    /// on any failure.
    pub fn open(path: &Path) -> Self {
        match VendorLibrary::open(path) {
            Ok(library) => {
                tracing::info!("vendor driver opened from {}", path.display());
                Self {
                    library: Some(library),
                }
            }
            Err(e) => {
                tracing::debug!("vendor driver unavailable ({e}); using raw input events");
                Self::raw()
            }
        }
    }

    /// A driver that only submits raw input records.
    pub fn raw() -> Self {
        Self { library: None }
    }

    /// Whether commands go through the vendor library.
    pub fn driver_active(&self) -> bool {
        self.library.is_some()
    }
}

impl Actuator for VendorDriver {
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError> {
        match &self.library {
            Some(lib) => lib.move_relative(dx, dy),
            None => native::send(RawMouseInput::motion(dx, dy)),
        }
    }

    fn press(&mut self, button: MouseButton) -> Result<(), TrackError> {
        match &self.library {
            Some(lib) => lib.press(button.code()),
            None => native::send(raw_button(button, true)?),
        }
    }

    fn release(&mut self, button: MouseButton) -> Result<(), TrackError> {
        match &self.library {
            Some(lib) => lib.release(),
            None => native::send(raw_button(button, false)?),
        }
    }

    fn name(&self) -> &'static str {
        "vendor-driver"
    }
}

/// Raw fallback record; only left and right buttons are mapped.
fn raw_button(button: MouseButton, down: bool) -> Result<RawMouseInput, TrackError> {
    match (button, down) {
        (MouseButton::Middle, _) => Err(TrackError::Backend(
            "vendor fallback has no middle-button mapping".into(),
        )),
        (b, true) => Ok(RawMouseInput::button_down(b)),
        (b, false) => Ok(RawMouseInput::button_up(b)),
    }
}

// ── Windows library binding ──────────────────────────────────────

#[cfg(target_os = "windows")]
mod platform {
    use super::*;
    use windows::Win32::Foundation::{FreeLibrary, HMODULE};
    use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
    use windows::core::{HSTRING, PCSTR, s};

    type OpenFn = unsafe extern "C" fn() -> i32;
    type MoveFn = unsafe extern "C" fn(i32, i32) -> i32;
    type PressFn = unsafe extern "C" fn(i32) -> i32;
    type ReleaseFn = unsafe extern "C" fn() -> i32;
    type CloseFn = unsafe extern "C" fn();

    /// Loaded driver library and its resolved entry points.
    pub struct VendorLibrary {
        module: HMODULE,
        move_r: MoveFn,
        press: PressFn,
        release: ReleaseFn,
        close: CloseFn,
    }

    // The module handle and function pointers are process-wide and
    // only ever used by the owning backend.
    unsafe impl Send for VendorLibrary {}

    unsafe fn symbol(module: HMODULE, name: PCSTR) -> Result<unsafe extern "system" fn() -> isize, TrackError> {
        unsafe { GetProcAddress(module, name) }.ok_or_else(|| {
            let name = unsafe { name.to_string() }.unwrap_or_default();
            TrackError::Backend(format!("missing export {name}"))
        })
    }

    impl VendorLibrary {
        pub fn open(path: &Path) -> Result<Self, TrackError> {
            let module = unsafe { LoadLibraryW(&HSTRING::from(path)) }
                .map_err(|e| TrackError::Backend(format!("LoadLibraryW failed: {e}")))?;

            let resolved = unsafe { Self::resolve(module) };
            let (open, lib) = match resolved {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = unsafe { FreeLibrary(module) };
                    return Err(e);
                }
            };

            if unsafe { open() } == 0 {
                // Never opened, so skip `mouse_close` in Drop.
                std::mem::forget(lib);
                let _ = unsafe { FreeLibrary(module) };
                return Err(TrackError::Backend("mouse_open reported failure".into()));
            }
            Ok(lib)
        }

        unsafe fn resolve(module: HMODULE) -> Result<(OpenFn, Self), TrackError> {
            unsafe {
                let open: OpenFn = std::mem::transmute(symbol(module, s!("mouse_open"))?);
                let lib = Self {
                    module,
                    move_r: std::mem::transmute(symbol(module, s!("moveR"))?),
                    press: std::mem::transmute(symbol(module, s!("press"))?),
                    release: std::mem::transmute(symbol(module, s!("release"))?),
                    close: std::mem::transmute(symbol(module, s!("mouse_close"))?),
                };
                Ok((open, lib))
            }
        }

        pub fn move_relative(&self, dx: i32, dy: i32) -> Result<(), TrackError> {
            unsafe { (self.move_r)(dx, dy) };
            Ok(())
        }

        pub fn press(&self, button: u8) -> Result<(), TrackError> {
            unsafe { (self.press)(button as i32) };
            Ok(())
        }

        pub fn release(&self) -> Result<(), TrackError> {
            unsafe { (self.release)() };
            Ok(())
        }
    }

    impl Drop for VendorLibrary {
        fn drop(&mut self) {
            unsafe {
                (self.close)();
                let _ = FreeLibrary(self.module);
            }
        }
    }
}

// ── Non-Windows stub ─────────────────────────────────────────────

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::*;

    /// Vendor libraries are never available off Windows.
    pub enum VendorLibrary {}

    impl VendorLibrary {
        pub fn open(_path: &Path) -> Result<Self, TrackError> {
            Err(TrackError::Unsupported(
                "vendor driver libraries are only available on Windows",
            ))
        }

        pub fn move_relative(&self, _dx: i32, _dy: i32) -> Result<(), TrackError> {
            match *self {}
        }

        pub fn press(&self, _button: u8) -> Result<(), TrackError> {
            match *self {}
        }

        pub fn release(&self) -> Result<(), TrackError> {
            match *self {}
        }
    }
}

use platform::VendorLibrary;

// ── Tests ────────────────────────────────────────────────────────
