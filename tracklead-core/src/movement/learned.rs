//! Feed-forward regressor mapping screen/settings/target features
//! straight to device units.
//!
//! # Artifact format
//!
//! ```text
//! ModelArtifact (bincode)
//!   version:  u32          ARTIFACT_VERSION
//!   checksum: [u8; 32]     BLAKE3 of bincode(layers)
//!   layers:   Vec<DenseLayer>
//!     inputs, outputs: u64
//!     weights: Vec<f32>    row-major, outputs × inputs
//!     bias:    Vec<f32>    outputs
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::settings::Tunables;
use crate::types::{MotionCommand, ScreenGeometry};

/// Current artifact format version.
pub const ARTIFACT_VERSION: u32 = 1;

/// Number of input features.
pub const FEATURES: usize = 10;

/// `(inputs, outputs)` of each dense layer, in order.
pub const LAYER_SHAPES: [(usize, usize); 4] = [(FEATURES, 128), (128, 128), (128, 64), (64, 2)];

// ── DenseLayer ───────────────────────────────────────────────────

/// A fully-connected layer: `y = W·x + b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DenseLayer {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
}

impl DenseLayer {
    /// All-zero layer of the given shape.
    pub fn zeros(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs,
            outputs,
            weights: vec![0.0; inputs * outputs],
            bias: vec![0.0; outputs],
        }
    }

    fn forward(&self, input: &[f32], out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.weights.chunks_exact(self.inputs).zip(&self.bias).map(
            |(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b,
        ));
    }
}

// ── ModelArtifact ────────────────────────────────────────────────

/// On-disk container for the regressor weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub checksum: [u8; 32],
    pub layers: Vec<DenseLayer>,
}

impl ModelArtifact {
    /// Wrap a layer table, stamping the current version and checksum.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, TrackError> {
        let checksum = Self::digest(&layers)?;
        Ok(Self {
            version: ARTIFACT_VERSION,
            checksum,
            layers,
        })
    }

    fn digest(layers: &[DenseLayer]) -> Result<[u8; 32], TrackError> {
        let encoded = bincode::serialize(layers)?;
        Ok(*blake3::hash(&encoded).as_bytes())
    }

    pub fn save(&self, path: &Path) -> Result<(), TrackError> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let bytes = std::fs::read(path)
            .map_err(|e| TrackError::artifact(path, format!("cannot read: {e}")))?;
        let artifact: Self = bincode::deserialize(&bytes)
            .map_err(|e| TrackError::artifact(path, format!("cannot decode: {e}")))?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(TrackError::artifact(
                path,
                format!(
                    "unsupported version {} (expected {ARTIFACT_VERSION})",
                    artifact.version
                ),
            ));
        }
        if Self::digest(&artifact.layers)? != artifact.checksum {
            return Err(TrackError::artifact(path, "checksum mismatch"));
        }
        Ok(artifact)
    }
}

// ── LearnedModel ─────────────────────────────────────────────────

/// Regressor-backed movement model.
#[derive(Debug, Clone)]
pub struct LearnedModel {
    layers: Vec<DenseLayer>,
}

impl LearnedModel {
    /// Load and validate weights from an artifact file.
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let artifact = ModelArtifact::load(path)?;
        Self::from_layers(artifact.layers)
            .map_err(|e| TrackError::artifact(path, e.to_string()))
    }

    /// Build from an in-memory layer table, checking every shape.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self, TrackError> {
        if layers.len() != LAYER_SHAPES.len() {
            return Err(format!(
                "expected {} layers, found {}",
                LAYER_SHAPES.len(),
                layers.len()
            )
            .into());
        }
        for (i, (layer, &(inputs, outputs))) in layers.iter().zip(&LAYER_SHAPES).enumerate() {
            if layer.inputs != inputs
                || layer.outputs != outputs
                || layer.weights.len() != inputs * outputs
                || layer.bias.len() != outputs
            {
                return Err(format!(
                    "layer {i} has shape {}x{} ({} weights, {} biases), expected {inputs}x{outputs}",
                    layer.inputs,
                    layer.outputs,
                    layer.weights.len(),
                    layer.bias.len()
                )
                .into());
            }
        }
        Ok(Self { layers })
    }

    /// Feature vector in the order the regressor was trained on.
    pub fn features(
        target_x: f64,
        target_y: f64,
        tunables: &Tunables,
        geometry: &ScreenGeometry,
    ) -> [f32; FEATURES] {
        let (center_x, center_y) = geometry.center();
        [
            geometry.width,
            geometry.height,
            center_x,
            center_y,
            tunables.dpi,
            tunables.sensitivity,
            tunables.fov_x,
            tunables.fov_y,
            target_x,
            target_y,
        ]
        .map(|v| v as f32)
    }

    /// Run the network on a raw feature vector.
    pub fn infer(&self, features: &[f32; FEATURES]) -> [f32; 2] {
        let mut current = features.to_vec();
        let mut next = Vec::with_capacity(128);
        let last = self.layers.len() - 1;

        for (i, layer) in self.layers.iter().enumerate() {
            layer.forward(&current, &mut next);
            if i != last {
                next.iter_mut().for_each(|v| *v = v.max(0.0));
            }
            std::mem::swap(&mut current, &mut next);
        }

        [current[0], current[1]]
    }

    pub fn convert(
        &self,
        target_x: f64,
        target_y: f64,
        tunables: &Tunables,
        geometry: &ScreenGeometry,
    ) -> MotionCommand {
        let [dx, dy] = self.infer(&Self::features(target_x, target_y, tunables, geometry));
        MotionCommand::new(dx as f64, dy as f64)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_layers() -> Vec<DenseLayer> {
        LAYER_SHAPES
            .iter()
            .map(|&(i, o)| DenseLayer::zeros(i, o))
            .collect()
    }

    /// Network that routes `target_x - k` through hidden unit 0 of
    /// every layer and out as `dx`.
    fn passthrough_layers(k: f32) -> Vec<DenseLayer> {
        let mut layers = zero_layers();
        layers[0].weights[8] = 1.0; // hidden0 = target_x
        layers[0].bias[0] = -k;
        layers[1].weights[0] = 1.0;
        layers[2].weights[0] = 1.0;
        layers[3].weights[0] = 1.0; // dx = hidden0
        layers[3].bias[1] = 7.0; // dy constant
        layers
    }

    #[test]
    fn output_bias_only() {
        let mut layers = zero_layers();
        layers[3].bias = vec![3.5, -2.0];
        let model = LearnedModel::from_layers(layers).unwrap();
        let m = model.convert(10.0, 10.0, &Tunables::default(), &ScreenGeometry::default());
        assert_eq!(m, MotionCommand::new(3.5, -2.0));
    }

    #[test]
    fn hidden_layers_apply_relu() {
        let model = LearnedModel::from_layers(passthrough_layers(100.0)).unwrap();
        let t = Tunables::default();
        let g = ScreenGeometry::default();

        let above = model.convert(130.0, 0.0, &t, &g);
        assert_eq!(above, MotionCommand::new(30.0, 7.0));

        // Negative pre-activation is clamped to zero.
        let below = model.convert(60.0, 0.0, &t, &g);
        assert_eq!(below, MotionCommand::new(0.0, 7.0));
    }

    #[test]
    fn feature_order() {
        let t = Tunables {
            dpi: 800.0,
            sensitivity: 1.5,
            fov_x: 90.0,
            fov_y: 60.0,
        };
        let f = LearnedModel::features(11.0, 22.0, &t, &ScreenGeometry::new(640.0, 480.0));
        assert_eq!(f, [640.0, 480.0, 320.0, 240.0, 800.0, 1.5, 90.0, 60.0, 11.0, 22.0]);
    }

    #[test]
    fn rejects_wrong_shape() {
        let mut layers = zero_layers();
        layers[2] = DenseLayer::zeros(128, 32);
        match LearnedModel::from_layers(layers) {
            Err(TrackError::Other(msg)) => assert!(msg.starts_with("layer 2 has shape 128x32")),
            other => panic!("expected shape error, got {other:?}"),
        }
        match LearnedModel::from_layers(zero_layers()[..3].to_vec()) {
            Err(TrackError::Other(msg)) => assert_eq!(msg, "expected 4 layers, found 3"),
            other => panic!("expected layer count error, got {other:?}"),
        }
    }

    #[test]
    fn artifact_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mouse_net.bin");
        ModelArtifact::new(passthrough_layers(0.0))
            .unwrap()
            .save(&path)
            .unwrap();

        let model = LearnedModel::load(&path).unwrap();
        let m = model.convert(5.0, 0.0, &Tunables::default(), &ScreenGeometry::default());
        assert_eq!(m.dx, 5.0);
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let err = LearnedModel::load(Path::new("/nonexistent/mouse_net.bin")).unwrap_err();
        assert!(matches!(err, TrackError::ModelArtifact { .. }));
    }

    #[test]
    fn tampered_artifact_fails_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mouse_net.bin");
        let mut artifact = ModelArtifact::new(zero_layers()).unwrap();
        artifact.layers[3].bias[0] = 1.0;
        artifact.save(&path).unwrap();

        let err = LearnedModel::load(&path).unwrap_err();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mouse_net.bin");
        std::fs::write(&path, b"not a model").unwrap();
        assert!(matches!(
            LearnedModel::load(&path),
            Err(TrackError::ModelArtifact { .. })
        ));
    }
}
