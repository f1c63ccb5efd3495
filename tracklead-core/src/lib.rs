//! # tracklead-core
//!
//! Turns a stream of target detections into pointer motion and clicks.
//!
//! This crate contains:
//! - **Types**: `Detection`, `ScreenGeometry`, `MotionCommand`, `MouseButton`
//! - **Filter**: `TrackingFilter`, constant-velocity lead prediction
//! - **Scope**: the crosshair-on-target test
//! - **Movement**: analytic and learned pixel → device-unit models
//! - **Settings**: `Tunables` and the arrow-key `SettingsTuner`
//! - **Input**: virtual keys, key-state queries, hotkeys
//! - **Actuator**: OS-native, vendor-driver and microcontroller backends
//! - **Codec**: `FrameCodec` tag/length framing
//! - **Tracking**: the latest-wins slot and the `TrackingLoop` worker
//! - **Error**: `TrackError`, a typed, `thiserror`-based error enum

pub mod actuator;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod movement;
pub mod scope;
pub mod settings;
pub mod tracking;
pub mod types;
pub mod visual;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use actuator::{Actuator, BackendKind, BackendSettings, open_backend};
pub use codec::{Frame, FrameCodec};
pub use config::{ModeFlags, TrackingConfig};
pub use error::TrackError;
pub use filter::TrackingFilter;
pub use input::{Hotkeys, KeyboardState, SystemKeyboard, VirtualKey};
pub use movement::{MovementKind, MovementModel};
pub use settings::{SettingsTuner, Tunables};
pub use tracking::{CycleStats, SlotReceiver, SlotSender, TrackingLoop, latest_slot};
pub use types::{Detection, MotionCommand, MouseButton, ScreenGeometry};
pub use visual::{ChannelSink, NoopSink, PredictionSink};
