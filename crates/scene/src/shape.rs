use backdrop_common::{Color, Transform};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Procedural geometry of a wireframe shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Detail-0 icosahedron (12 vertices, 30 edges).
    Icosahedron { radius: f32 },
    /// (p, q) torus knot swept by a circular tube.
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl ShapeKind {
    /// The single torus knot every knot-shaped object uses.
    pub const TORUS_KNOT: Self = Self::TorusKnot {
        radius: 0.4,
        tube: 0.12,
        tubular_segments: 100,
        radial_segments: 16,
        p: 2,
        q: 3,
    };

    pub const ICOSAHEDRON_MIN_RADIUS: f32 = 0.6;
    pub const ICOSAHEDRON_RADIUS_SPAN: f32 = 0.4;

    /// Icosahedron with radius `0.6 + unit * 0.4`.
    pub fn icosahedron(unit: f32) -> Self {
        Self::Icosahedron {
            radius: Self::ICOSAHEDRON_MIN_RADIUS + unit * Self::ICOSAHEDRON_RADIUS_SPAN,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Icosahedron { .. } => "icosahedron",
            Self::TorusKnot { .. } => "torus_knot",
        }
    }
}

/// Emissive, wireframe-rendered material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeonMaterial {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub wireframe: bool,
}

impl NeonMaterial {
    pub const fn glow(hex: u32, emissive_intensity: f32) -> Self {
        Self {
            color: Color::from_hex(hex),
            emissive: Color::from_hex(hex),
            emissive_intensity,
            wireframe: true,
        }
    }
}

/// Teal, sky and violet neon materials shapes pick from.
pub const PALETTE: [NeonMaterial; 3] = [
    NeonMaterial::glow(0x2dd4bf, 0.5),
    NeonMaterial::glow(0x38bdf8, 0.6),
    NeonMaterial::glow(0xa855f7, 0.6),
];

/// A wireframe object that spins in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Index into [`PALETTE`].
    pub material: usize,
    pub transform: Transform,
    /// Rotation added around x and y every frame, in radians.
    pub rotation_speed: Vec2,
}

impl Shape {
    pub fn material(&self) -> &NeonMaterial {
        &PALETTE[self.material % PALETTE.len()]
    }

    /// Advance the rotation by one frame.
    pub fn spin(&mut self) {
        self.transform.rotation.x += self.rotation_speed.x;
        self.transform.rotation.y += self.rotation_speed.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn icosahedron_radius_range() {
        assert_eq!(ShapeKind::icosahedron(0.0), ShapeKind::Icosahedron { radius: 0.6 });
        let ShapeKind::Icosahedron { radius } = ShapeKind::icosahedron(0.999) else {
            panic!("expected icosahedron");
        };
        assert!(radius < 1.0);
    }

    #[test]
    fn palette_is_wireframe_and_emissive() {
        for material in &PALETTE {
            assert!(material.wireframe);
            assert!(material.emissive_intensity > 0.0);
            assert_eq!(material.color, material.emissive);
        }
    }

    #[test]
    fn spin_accumulates_per_axis() {
        let mut shape = Shape {
            kind: ShapeKind::TORUS_KNOT,
            material: 1,
            transform: Transform::default(),
            rotation_speed: Vec2::new(0.01, 0.005),
        };
        shape.spin();
        shape.spin();
        assert!((shape.transform.rotation.x - 0.02).abs() < 1e-6);
        assert!((shape.transform.rotation.y - 0.01).abs() < 1e-6);
        assert_eq!(shape.transform.rotation.z, 0.0);
        assert_eq!(shape.transform.position, Vec3::ZERO);
    }

    #[test]
    fn material_lookup_wraps() {
        let shape = Shape {
            kind: ShapeKind::icosahedron(0.5),
            material: 4,
            transform: Transform::default(),
            rotation_speed: Vec2::ZERO,
        };
        assert_eq!(*shape.material(), PALETTE[1]);
    }
}
