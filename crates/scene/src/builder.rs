use backdrop_common::{CameraRig, Transform, Viewport};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SceneConfig, ShapesConfig, Variant};
use crate::particles::ParticleField;
use crate::scene::{FieldUniforms, Light, Scene, SceneContent};
use crate::shape::{PALETTE, Shape, ShapeKind};

/// Builds a [`Scene`] from a [`SceneConfig`] by uniform random sampling.
///
/// With `config.seed` set, two builders with the same config produce
/// identical scenes.
pub struct SceneBuilder {
    config: SceneConfig,
    rng: StdRng,
}

impl SceneBuilder {
    pub fn new(config: SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Build the scene for a surface of the given size.
    pub fn build(mut self, viewport: Viewport) -> Scene {
        let _span = tracing::info_span!("scene_build", variant = ?self.config.variant).entered();

        let cam = &self.config.camera;
        let camera = CameraRig::new(
            cam.fov_degrees,
            viewport.aspect(),
            cam.near,
            cam.far,
            self.config.camera_position(),
        );

        let (lights, content) = match self.config.variant {
            Variant::Wireframe => {
                let shapes = scatter_shapes(&mut self.rng, &self.config.shapes);
                let starfield = ParticleField::scatter(&mut self.rng, &self.config.starfield);
                (
                    Light::neon_rig(),
                    SceneContent::Wireframe { shapes, starfield },
                )
            }
            Variant::Field => {
                let particles = ParticleField::scatter(&mut self.rng, &self.config.field);
                (
                    Vec::new(),
                    SceneContent::Field {
                        particles,
                        uniforms: FieldUniforms::default(),
                    },
                )
            }
        };

        let scene = Scene {
            camera,
            lights,
            content,
        };
        tracing::info!(
            shapes = scene.shapes().len(),
            particles = scene.particles().len(),
            width = viewport.width,
            height = viewport.height,
            "scene built"
        );
        scene
    }
}

/// Place `config.count` shapes with random geometry, material, speed and position.
fn scatter_shapes<R: Rng>(rng: &mut R, config: &ShapesConfig) -> Vec<Shape> {
    (0..config.count)
        .map(|_| {
            let kind = if rng.random::<f32>() > 0.5 {
                ShapeKind::icosahedron(rng.random())
            } else {
                ShapeKind::TORUS_KNOT
            };
            let material = rng.random_range(0..PALETTE.len());
            let rotation_speed = Vec2::new(
                rng.random::<f32>() * config.max_rotation_speed,
                rng.random::<f32>() * config.max_rotation_speed,
            );
            let unit = Vec3::new(rng.random(), rng.random(), rng.random());
            Shape {
                kind,
                material,
                transform: Transform::at(config.extents.place(unit)),
                rotation_speed,
            }
        })
        .collect()
}
