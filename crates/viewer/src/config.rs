//! Viewer configuration.
//!
//! Every field has a default, and the defaults are the viewer's fixed
//! presentation: a 75° camera at (10, 10, 70), the model shrunk to half
//! size and lifted by half a unit, damped orbiting that stops at the horizon.

use std::path::{Path, PathBuf};

use glam::Vec3;
use orbitview_orbit::OrbitSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub model: ModelConfig,
    pub orbit: OrbitConfig,
    pub interaction: InteractionConfig,
    pub scene: SceneConfig,
}

impl ViewerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(10.0, 10.0, 70.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path, `file://` URL or `http(s)://` URL of the model.
    pub source: String,
    /// Uniform scale applied at load, regardless of the authored scale.
    pub scale: f32,
    /// Lift applied after recentering, keeping the model off the ground grid.
    pub vertical_offset: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            source: "assets/scene.gltf".into(),
            scale: 0.5,
            vertical_offset: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub damping_factor: f32,
    pub max_polar_angle_degrees: f32,
    /// Pivot used until a model reports its center.
    pub initial_target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.1,
            max_polar_angle_degrees: 90.0,
            initial_target: Vec3::new(0.0, 1.0, 0.0),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

impl OrbitConfig {
    pub fn settings(&self) -> OrbitSettings {
        OrbitSettings {
            enable_damping: true,
            damping_factor: self.damping_factor,
            max_polar_angle: self.max_polar_angle_degrees.to_radians(),
            rotate_speed: self.rotate_speed,
            zoom_speed: self.zoom_speed,
            pan_speed: self.pan_speed,
            screen_space_panning: false,
            ..OrbitSettings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of model rotation per pixel of drag.
    pub drag_sensitivity: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Packed `0xRRGGBB`.
    pub background: u32,
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub directional_position: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: 0xeeeeee,
            ambient_intensity: 1.0,
            directional_intensity: 2.0,
            directional_position: Vec3::new(10.0, 10.0, 10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use std::io::Write;

    #[test]
    fn defaults_match_fixed_presentation() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.position, Vec3::new(10.0, 10.0, 70.0));
        assert_eq!(config.model.scale, 0.5);
        assert_eq!(config.model.vertical_offset, 0.5);
        assert_eq!(config.interaction.drag_sensitivity, 0.01);

        let orbit = config.orbit.settings();
        assert!(orbit.enable_damping);
        assert_eq!(orbit.damping_factor, 0.1);
        assert!((orbit.max_polar_angle - FRAC_PI_2).abs() < 1e-6);
        assert!(!orbit.screen_space_panning);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = ViewerConfig::from_yaml_str(
            "model:\n  source: models/robot.glb\ncamera:\n  position: [0.0, 2.0, 8.0]\n",
        )
        .unwrap();
        assert_eq!(config.model.source, "models/robot.glb");
        assert_eq!(config.model.scale, 0.5);
        assert_eq!(config.camera.position, Vec3::new(0.0, 2.0, 8.0));
        assert_eq!(config.camera.fov_degrees, 75.0);
    }

    #[test]
    fn empty_mapping_is_default() {
        let config = ViewerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = ViewerConfig::from_yaml_str("camera: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "interaction:\n  drag_sensitivity: 0.02").unwrap();
        let config = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(config.interaction.drag_sensitivity, 0.02);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ViewerConfig::load("/nonexistent/orbitview.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
