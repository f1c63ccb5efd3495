//! Target position → device motion conversion.
//!
//! | Variant    | How                                                  |
//! |------------|------------------------------------------------------|
//! | `Analytic` | FOV / DPI / sensitivity formula, no state            |
//! | `Learned`  | Dense regressor loaded from a weights artifact       |
//!
//! The variant is chosen once at startup. A learned model that fails to
//! load is an error; there is no fallback to the analytic formula.

pub mod analytic;
pub mod learned;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::settings::Tunables;
use crate::types::{MotionCommand, ScreenGeometry};

pub use analytic::AnalyticModel;
pub use learned::{DenseLayer, LearnedModel, ModelArtifact};

/// Which conversion strategy to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    #[default]
    Analytic,
    Learned,
}

/// The active conversion strategy.
#[derive(Debug, Clone)]
pub enum MovementModel {
    Analytic(AnalyticModel),
    Learned(LearnedModel),
}

impl MovementModel {
    /// Build the configured strategy. `artifact` is only read for
    /// [`MovementKind::Learned`].
    pub fn open(kind: MovementKind, artifact: &Path) -> Result<Self, TrackError> {
        match kind {
            MovementKind::Analytic => Ok(Self::Analytic(AnalyticModel::new())),
            MovementKind::Learned => {
                let model = LearnedModel::load(artifact)?;
                tracing::info!("loaded movement model from {}", artifact.display());
                Ok(Self::Learned(model))
            }
        }
    }

    pub fn convert(
        &self,
        target_x: f64,
        target_y: f64,
        tunables: &Tunables,
        geometry: &ScreenGeometry,
    ) -> MotionCommand {
        match self {
            Self::Analytic(m) => m.convert(target_x, target_y, tunables, geometry),
            Self::Learned(m) => m.convert(target_x, target_y, tunables, geometry),
        }
    }

    pub fn kind(&self) -> MovementKind {
        match self {
            Self::Analytic(_) => MovementKind::Analytic,
            Self::Learned(_) => MovementKind::Learned,
        }
    }
}
