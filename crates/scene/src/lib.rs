//! Scene construction for animated backgrounds.
//!
//! Two variants share one pipeline: `Variant::Wireframe` scatters rotating
//! wireframe shapes over a spinning starfield, `Variant::Field` builds one
//! large point cloud whose motion is driven by shader uniforms.
//!
//! # Invariants
//! - Particle attributes are sampled once at build time and never resampled.
//! - The same seed and config always build the same scene.

pub mod builder;
pub mod config;
pub mod particles;
pub mod scene;
pub mod shape;

pub use builder::SceneBuilder;
pub use config::{
    CameraConfig, ConfigError, MotionConfig, ParticleLayerConfig, SceneConfig, ShapesConfig,
    Variant,
};
pub use particles::ParticleField;
pub use scene::{FieldUniforms, Light, Scene, SceneContent};
pub use shape::{NeonMaterial, PALETTE, Shape, ShapeKind};

pub fn crate_info() -> &'static str {
    "backdrop-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
