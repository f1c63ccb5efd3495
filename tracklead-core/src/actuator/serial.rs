//! Microcontroller link: commands are written as tagged frames to a
//! device node and the board performs the physical actuation.
//!
//! ```text
//! tag 0  move     { dx: i32, dy: i32 }
//! tag 1  press    { button: u8 }
//! tag 2  release  { button: u8 }
//! ```
//!
//! # Port setup
//!
//! The device node is opened as a plain file and no line parameters
//! are set. Configure the port beforehand (baud rate, 8N1, raw mode;
//! e.g. `stty -F /dev/ttyACM0 115200 raw -echo` or `mode COM3
//! BAUD=115200 DATA=8 PARITY=N STOP=1`), otherwise the link runs with
//! whatever settings the OS last applied.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actuator::Actuator;
use crate::codec::Frame;
use crate::error::TrackError;
use crate::types::MouseButton;

pub const TAG_MOVE: u8 = 0;
pub const TAG_PRESS: u8 = 1;
pub const TAG_RELEASE: u8 = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveCommand {
    pub dx: i32,
    pub dy: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ButtonCommand {
    pub button: u8,
}

/// Writes actuation frames to any byte sink.
pub struct MicrocontrollerLink<W: Write + Send> {
    port: W,
}

impl MicrocontrollerLink<std::fs::File> {
    /// Open the device node (`/dev/ttyACM0`, `\\.\COM3`, …) once. The
    /// port must already be configured; see the module docs.
    pub fn open(path: &Path) -> Result<Self, TrackError> {
        let port = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| TrackError::Backend(format!("cannot open {}: {e}", path.display())))?;
        tracing::info!("microcontroller link on {}", path.display());
        Ok(Self::new(port))
    }
}

impl<W: Write + Send> MicrocontrollerLink<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> W {
        self.port
    }

    fn send(&mut self, frame: Frame) -> Result<(), TrackError> {
        self.port.write_all(&frame.to_bytes()?)?;
        self.port.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Actuator for MicrocontrollerLink<W> {
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError> {
        self.send(Frame::encode(TAG_MOVE, &MoveCommand { dx, dy })?)
    }

    fn press(&mut self, button: MouseButton) -> Result<(), TrackError> {
        self.send(Frame::encode(
            TAG_PRESS,
            &ButtonCommand {
                button: button.code(),
            },
        )?)
    }

    fn release(&mut self, button: MouseButton) -> Result<(), TrackError> {
        self.send(Frame::encode(
            TAG_RELEASE,
            &ButtonCommand {
                button: button.code(),
            },
        )?)
    }

    fn name(&self) -> &'static str {
        "microcontroller"
    }
}
