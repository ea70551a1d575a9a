use backdrop_common::{Color, Extents};
use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ParticleLayerConfig;

/// A fixed set of points with per-point position, color and size.
///
/// Attributes are sampled once by [`ParticleField::scatter`] and never
/// change afterwards; only the whole-field `rotation` moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Color>,
    sizes: Vec<f32>,
    opacity: f32,
    /// Euler rotation (radians) applied to the whole field.
    pub rotation: Vec3,
}

impl ParticleField {
    /// Sample every attribute of every point in one pass.
    ///
    /// Positions are uniform per axis within `extents`, colors interpolate
    /// between the layer's endpoints with an independent fraction per point,
    /// sizes are uniform within `[size_min, size_max]`.
    pub fn scatter<R: Rng>(rng: &mut R, layer: &ParticleLayerConfig) -> Self {
        let mut positions = Vec::with_capacity(layer.count);
        let mut colors = Vec::with_capacity(layer.count);
        let mut sizes = Vec::with_capacity(layer.count);
        let size_span = layer.size_max - layer.size_min;

        for _ in 0..layer.count {
            let unit = Vec3::new(rng.random(), rng.random(), rng.random());
            positions.push(layer.extents.place(unit));
            colors.push(layer.color_start.lerp(layer.color_end, rng.random()));
            sizes.push(layer.size_min + rng.random::<f32>() * size_span);
        }

        Self {
            positions,
            colors,
            sizes,
            opacity: layer.opacity,
            rotation: Vec3::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Rotate the whole field by `delta` around x and y.
    pub fn spin(&mut self, delta: Vec2) {
        self.rotation.x += delta.x;
        self.rotation.y += delta.y;
    }

    /// Whether every point lies inside `extents`.
    pub fn within(&self, extents: &Extents) -> bool {
        self.positions.iter().all(|p| extents.contains(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn between(value: f32, a: f32, b: f32) -> bool {
        value >= a.min(b) - 1e-6 && value <= a.max(b) + 1e-6
    }

    #[test]
    fn positions_stay_within_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = ParticleLayerConfig {
            count: 5000,
            extents: Extents::uniform(20.0),
            ..ParticleLayerConfig::starfield()
        };
        let field = ParticleField::scatter(&mut rng, &layer);
        assert_eq!(field.len(), 5000);
        for p in field.positions() {
            assert!(p.x >= -10.0 && p.x <= 10.0);
            assert!(p.y >= -10.0 && p.y <= 10.0);
            assert!(p.z >= -10.0 && p.z <= 10.0);
        }
    }

    #[test]
    fn asymmetric_extents_respected_per_axis() {
        let mut rng = StdRng::seed_from_u64(2);
        let layer = ParticleLayerConfig::tunnel();
        let field = ParticleField::scatter(&mut rng, &layer);
        assert!(field.within(&layer.extents));
        // Depth reaches past the half-height of the box.
        assert!(field.positions().iter().any(|p| p.z.abs() > 5.0));
    }

    #[test]
    fn colors_stay_between_endpoints() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = ParticleLayerConfig::tunnel();
        let field = ParticleField::scatter(&mut rng, &layer);
        let (a, b) = (layer.color_start, layer.color_end);
        for c in field.colors() {
            assert!(between(c.r, a.r, b.r));
            assert!(between(c.g, a.g, b.g));
            assert!(between(c.b, a.b, b.b));
        }
    }

    #[test]
    fn sizes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let layer = ParticleLayerConfig::tunnel();
        let field = ParticleField::scatter(&mut rng, &layer);
        assert_eq!(field.sizes().len(), layer.count);
        assert!(
            field
                .sizes()
                .iter()
                .all(|s| between(*s, layer.size_min, layer.size_max))
        );
    }

    #[test]
    fn uniform_layer_has_constant_color_and_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let layer = ParticleLayerConfig::starfield();
        let field = ParticleField::scatter(&mut rng, &layer);
        assert!(field.colors().iter().all(|c| *c == layer.color_start));
        assert!(field.sizes().iter().all(|s| *s == 0.05));
        assert_eq!(field.opacity(), 0.7);
    }

    #[test]
    fn empty_layer() {
        let mut rng = StdRng::seed_from_u64(6);
        let layer = ParticleLayerConfig {
            count: 0,
            ..ParticleLayerConfig::starfield()
        };
        assert!(ParticleField::scatter(&mut rng, &layer).is_empty());
    }

    #[test]
    fn spin_rotates_whole_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ParticleField::scatter(&mut rng, &ParticleLayerConfig::starfield());
        let before = field.positions().to_vec();
        field.spin(Vec2::new(0.0004, 0.0008));
        assert!((field.rotation.x - 0.0004).abs() < 1e-9);
        assert!((field.rotation.y - 0.0008).abs() < 1e-9);
        assert_eq!(field.positions(), before.as_slice());
    }
}
