use backdrop_common::{CameraRig, Color};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::Variant;
use crate::particles::ParticleField;
use crate::shape::Shape;

/// Light sources lighting the wireframe shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    /// Soft white fill plus a sky-blue point light up and to the right.
    pub fn neon_rig() -> Vec<Self> {
        vec![
            Self::Ambient {
                color: Color::WHITE,
                intensity: 0.3,
            },
            Self::Point {
                color: Color::from_hex(0x38bdf8),
                intensity: 1.2,
                position: Vec3::new(5.0, 5.0, 5.0),
            },
        ]
    }
}

/// Values the particle-field shader reads once per draw.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldUniforms {
    /// Seconds since the loop started.
    pub time: f32,
    /// Scroll progress in [0, 1].
    pub scroll: f32,
    /// Smoothed pointer position in world space.
    pub pointer: Vec3,
}

/// What a scene draws; one arm per [`Variant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum SceneContent {
    Wireframe {
        shapes: Vec<Shape>,
        starfield: ParticleField,
    },
    Field {
        particles: ParticleField,
        uniforms: FieldUniforms,
    },
}

/// A fully built background scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub camera: CameraRig,
    pub lights: Vec<Light>,
    pub content: SceneContent,
}

impl Scene {
    pub fn variant(&self) -> Variant {
        match self.content {
            SceneContent::Wireframe { .. } => Variant::Wireframe,
            SceneContent::Field { .. } => Variant::Field,
        }
    }

    /// Wireframe shapes; empty for the field variant.
    pub fn shapes(&self) -> &[Shape] {
        match &self.content {
            SceneContent::Wireframe { shapes, .. } => shapes,
            SceneContent::Field { .. } => &[],
        }
    }

    /// The point layer of either variant.
    pub fn particles(&self) -> &ParticleField {
        match &self.content {
            SceneContent::Wireframe { starfield, .. } => starfield,
            SceneContent::Field { particles, .. } => particles,
        }
    }

    pub fn uniforms(&self) -> Option<&FieldUniforms> {
        match &self.content {
            SceneContent::Field { uniforms, .. } => Some(uniforms),
            SceneContent::Wireframe { .. } => None,
        }
    }

    pub fn uniforms_mut(&mut self) -> Option<&mut FieldUniforms> {
        match &mut self.content {
            SceneContent::Field { uniforms, .. } => Some(uniforms),
            SceneContent::Wireframe { .. } => None,
        }
    }

    /// Number of drawable objects: shapes plus one point layer.
    pub fn object_count(&self) -> usize {
        self.shapes().len() + 1
    }
}
