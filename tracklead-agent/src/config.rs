//! Configuration for the tracklead agent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tracklead_core::actuator::{BackendKind, BackendSettings};
use tracklead_core::movement::MovementKind;
use tracklead_core::{Hotkeys, ModeFlags, ScreenGeometry, TrackingConfig, Tunables, VirtualKey};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Detection ingest.
    pub network: NetworkConfig,
    /// Detection window size.
    pub detection: DetectionConfig,
    /// Mouse conversion parameters.
    pub mouse: MouseConfig,
    /// Behaviour switches.
    pub modes: ModeFlags,
    /// Aim / fire hotkeys.
    pub hotkeys: HotkeyConfig,
    /// Actuation backend.
    pub backend: BackendConfig,
    /// Movement model.
    pub movement: MovementConfig,
    /// Config file polling.
    pub reload: ReloadConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Detection ingest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP address the detection producer connects to.
    pub listen: String,
}

/// Detection window geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
}

/// Pixel → device-unit conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MouseConfig {
    pub dpi: u32,
    /// In-game sensitivity (> 0; not validated).
    pub sensitivity: f64,
    /// Horizontal field of view in degrees.
    pub fov_width: f64,
    /// Vertical field of view in degrees.
    pub fov_height: f64,
}

/// Hotkeys, by name (see `VirtualKey::from_name`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HotkeyConfig {
    pub targeting: Vec<String>,
}

/// Actuation backend selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// "os_native", "vendor_driver" or "microcontroller".
    pub kind: BackendKind,
    /// Vendor driver library path.
    pub vendor_library: PathBuf,
    /// Microcontroller device node.
    pub serial_port: PathBuf,
}

/// Movement model selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// "analytic" or "learned".
    pub model: MovementKind,
    /// Weights artifact for the learned model.
    pub artifact: PathBuf,
}

/// Config file polling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReloadConfig {
    /// Re-read the config file when it changes.
    pub enabled: bool,
    /// Poll interval in milliseconds.
    pub interval_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            detection: DetectionConfig::default(),
            mouse: MouseConfig::default(),
            modes: ModeFlags::default(),
            hotkeys: HotkeyConfig::default(),
            backend: BackendConfig::default(),
            movement: MovementConfig::default(),
            reload: ReloadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:7340".into(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_width: 320,
            window_height: 320,
        }
    }
}

impl Default for MouseConfig {
    fn default() -> Self {
        let t = Tunables::default();
        Self {
            dpi: t.dpi as u32,
            sensitivity: t.sensitivity,
            fov_width: t.fov_x,
            fov_height: t.fov_y,
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            targeting: vec!["RightMouseButton".into()],
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        let b = BackendSettings::default();
        Self {
            kind: b.kind,
            vendor_library: b.vendor_library,
            serial_port: b.serial_port,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            model: MovementKind::Analytic,
            artifact: PathBuf::from("mouse_net.bin"),
        }
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl AgentConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Write the default configuration to a file (for bootstrapping).
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let text = toml::to_string_pretty(&Self::default()).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    /// Snapshot handed to the tracking loop.
    pub fn to_tracking_config(&self) -> TrackingConfig {
        TrackingConfig {
            geometry: ScreenGeometry::new(
                self.detection.window_width as f64,
                self.detection.window_height as f64,
            ),
            tunables: Tunables {
                dpi: self.mouse.dpi as f64,
                sensitivity: self.mouse.sensitivity,
                fov_x: self.mouse.fov_width,
                fov_y: self.mouse.fov_height,
            },
            modes: self.modes,
            hotkeys: Hotkeys::new(
                VirtualKey::parse_list(&self.hotkeys.targeting),
                self.modes.lock_target,
            ),
        }
    }

    pub fn to_backend_settings(&self) -> BackendSettings {
        BackendSettings {
            kind: self.backend.kind,
            vendor_library: self.backend.vendor_library.clone(),
            serial_port: self.backend.serial_port.clone(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = toml::to_string_pretty(&AgentConfig::default()).unwrap();
        assert!(text.contains("window_width"));
        assert!(text.contains("os_native"));
        assert!(text.contains("analytic"));
    }

    #[test]
    fn roundtrip_config() {
        let text = toml::to_string_pretty(&AgentConfig::default()).unwrap();
        let parsed = AgentConfig::parse(&text).unwrap();
        assert_eq!(parsed, AgentConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed = AgentConfig::parse(
            r#"
            [mouse]
            dpi = 800

            [modes]
            auto_shoot = true

            [backend]
            kind = "microcontroller"
            serial_port = "/dev/ttyACM1"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.mouse.dpi, 800);
        assert_eq!(parsed.mouse.sensitivity, MouseConfig::default().sensitivity);
        assert!(parsed.modes.auto_shoot);
        assert!(!parsed.modes.triggerbot);
        assert_eq!(parsed.backend.kind, BackendKind::Microcontroller);
        assert_eq!(parsed.detection.window_width, 320);
    }

    #[test]
    fn tracking_snapshot() {
        let mut cfg = AgentConfig::default();
        cfg.detection.window_width = 1920;
        cfg.detection.window_height = 1080;
        cfg.hotkeys.targeting = vec!["RightMouseButton".into(), "Nope".into(), "X2MouseButton".into()];
        cfg.modes.lock_target = true;

        let snap = cfg.to_tracking_config();
        assert_eq!(snap.geometry.center(), (960.0, 540.0));
        assert_eq!(snap.hotkeys.keys, vec![VirtualKey::RIGHT_MOUSE, VirtualKey::X2_MOUSE]);
        assert!(snap.hotkeys.lock_target);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = AgentConfig::load(Path::new("/nonexistent/tracklead.toml"));
        assert_eq!(cfg, AgentConfig::default());
    }
}
