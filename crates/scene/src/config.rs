use std::fmt;
use std::path::Path;
use std::str::FromStr;

use backdrop_common::{Color, Extents};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which background to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Rotating wireframe shapes over a spinning starfield.
    #[default]
    Wireframe,
    /// Shader-driven particle tunnel reacting to pointer and scroll.
    Field,
}

impl Variant {
    pub const ALL: [Self; 2] = [Self::Wireframe, Self::Field];

    pub fn name(self) -> &'static str {
        match self {
            Self::Wireframe => "wireframe",
            Self::Field => "field",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ConfigError::Invalid(format!("unknown variant {s:?} (expected wireframe or field)"))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapesConfig {
    pub count: usize,
    pub extents: Extents,
    /// Upper bound (exclusive) of each per-axis rotation speed, radians per frame.
    pub max_rotation_speed: f32,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            count: 12,
            extents: Extents::new(10.0, 6.0, 6.0),
            max_rotation_speed: 0.01,
        }
    }
}

/// One layer of points: how many, where, and how they look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleLayerConfig {
    pub count: usize,
    pub extents: Extents,
    pub color_start: Color,
    pub color_end: Color,
    pub size_min: f32,
    pub size_max: f32,
    pub opacity: f32,
}

impl ParticleLayerConfig {
    /// Sparse, uniformly colored points behind the wireframe shapes.
    pub fn starfield() -> Self {
        let color = Color::from_hex(0x38bdf8);
        Self {
            count: 400,
            extents: Extents::uniform(20.0),
            color_start: color,
            color_end: color,
            size_min: 0.05,
            size_max: 0.05,
            opacity: 0.7,
        }
    }

    /// Dense tunnel of points, deeper than it is wide.
    pub fn tunnel() -> Self {
        Self {
            count: 4000,
            extents: Extents::new(14.0, 10.0, 40.0),
            color_start: Color::from_hex(0x38bdf8),
            color_end: Color::from_hex(0xa855f7),
            size_min: 0.02,
            size_max: 0.08,
            opacity: 0.85,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.extents.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "{name}.extents must be finite and non-negative"
            )));
        }
        if !(self.size_min >= 0.0 && self.size_min <= self.size_max) {
            return Err(ConfigError::Invalid(format!(
                "{name}.size_min must be in [0, size_max]"
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::Invalid(format!(
                "{name}.opacity must be in [0, 1]"
            )));
        }
        Ok(())
    }
}

/// Per-frame motion constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Camera smoothing factor for the wireframe variant.
    pub camera_blend: f32,
    /// How far the camera follows the pointer on x and y.
    pub camera_reach: Vec2,
    /// Pointer smoothing factor for the field variant.
    pub pointer_blend: f32,
    /// Starfield rotation per frame around x and y.
    pub starfield_spin: Vec2,
    /// Plane the field variant projects the pointer onto.
    pub pointer_plane_z: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            camera_blend: 0.02,
            camera_reach: Vec2::new(0.8, 0.6),
            pointer_blend: 0.1,
            starfield_spin: Vec2::new(0.0004, 0.0008),
            pointer_plane_z: 0.0,
        }
    }
}

/// Complete description of a background scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub variant: Variant,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub shapes: ShapesConfig,
    pub starfield: ParticleLayerConfig,
    pub field: ParticleLayerConfig,
    pub motion: MotionConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            seed: None,
            camera: CameraConfig::default(),
            shapes: ShapesConfig::default(),
            starfield: ParticleLayerConfig::starfield(),
            field: ParticleLayerConfig::tunnel(),
            motion: MotionConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse and validate a YAML document.
    ///
    /// The document is overlaid onto the defaults, so any key may be omitted,
    /// including keys inside a nested section.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let mut merged = serde_yaml::to_value(Self::default())?;
        let overrides: Value = serde_yaml::from_str(text)?;
        overlay(&mut merged, overrides);
        let config: Self = serde_yaml::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), variant = ?config.variant, "loaded scene config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(
                "camera.fov_degrees must be in (0, 180)".into(),
            ));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::Invalid(
                "camera.near must be positive and below camera.far".into(),
            ));
        }
        if !(cam.distance.is_finite() && cam.distance > 0.0) {
            return Err(ConfigError::Invalid(
                "camera.distance must be finite and positive".into(),
            ));
        }
        if !self.shapes.extents.is_valid() {
            return Err(ConfigError::Invalid(
                "shapes.extents must be finite and non-negative".into(),
            ));
        }
        let speed = self.shapes.max_rotation_speed;
        if speed.is_nan() || speed < 0.0 {
            return Err(ConfigError::Invalid(
                "shapes.max_rotation_speed must be non-negative".into(),
            ));
        }
        self.starfield.validate("starfield")?;
        self.field.validate("field")?;
        if self.variant == Variant::Field && self.field.count == 0 {
            return Err(ConfigError::Invalid(
                "field.count must be positive for the field variant".into(),
            ));
        }
        let blend_ok = |b: f32| b > 0.0 && b <= 1.0;
        if !blend_ok(self.motion.camera_blend) || !blend_ok(self.motion.pointer_blend) {
            return Err(ConfigError::Invalid(
                "motion blend factors must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Camera starting position.
    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.camera.distance)
    }
}

fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Mapping(base), Value::Mapping(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (slot, value) => *slot = value,
    }
}
