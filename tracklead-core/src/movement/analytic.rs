//! Field-of-view based pixel → device-unit conversion.

use crate::settings::Tunables;
use crate::types::{MotionCommand, ScreenGeometry};

/// Converts a pixel offset from the window centre into mouse counts.
///
/// Per axis: `offset * (fov / screen_dim)` gives degrees, and one full
/// turn (360°) takes `dpi / sensitivity` counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticModel;

impl AnalyticModel {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(
        &self,
        target_x: f64,
        target_y: f64,
        tunables: &Tunables,
        geometry: &ScreenGeometry,
    ) -> MotionCommand {
        let (center_x, center_y) = geometry.center();
        let counts_per_turn = tunables.dpi * (1.0 / tunables.sensitivity);

        let degrees_per_pixel_x = tunables.fov_x / geometry.width;
        let degrees_per_pixel_y = tunables.fov_y / geometry.height;

        let angle_x = (target_x - center_x) * degrees_per_pixel_x;
        let angle_y = (target_y - center_y) * degrees_per_pixel_y;

        MotionCommand::new(
            (angle_x / 360.0) * counts_per_turn,
            (angle_y / 360.0) * counts_per_turn,
        )
    }
}
