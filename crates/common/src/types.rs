use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, Euler rotation (radians, XYZ order), scale.
///
/// Rotation is kept as Euler angles because animation adds per-axis
/// increments every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Model matrix (translation * rotation * scale).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// Linear RGB color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Per-channel `self + (other - self) * t`; equal endpoints give `self` exactly.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let a = self.to_vec3();
        Self::from(a + (other.to_vec3() - a) * t)
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::from(self.to_vec3() * factor)
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self::rgb(v.x, v.y, v.z)
    }
}

/// Full per-axis widths of a box centered on the origin.
///
/// A box with extents `(10, 6, 6)` spans `[-5, 5] x [-3, 3] x [-3, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents(pub Vec3);

impl Extents {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    pub fn uniform(extent: f32) -> Self {
        Self(Vec3::splat(extent))
    }

    pub fn half(&self) -> Vec3 {
        self.0 * 0.5
    }

    /// Map a point of the unit cube `[0, 1)^3` into the box.
    pub fn place(&self, unit: Vec3) -> Vec3 {
        (unit - Vec3::splat(0.5)) * self.0
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.abs().cmple(self.half()).all()
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.0.cmpge(Vec3::ZERO).all()
    }
}

/// Size of a drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A region frames are composited into. Renderers own one.
pub trait DrawingSurface {
    /// Current size of the surface.
    fn size(&self) -> Viewport;

    /// Resize the surface; `size()` reports the new dimensions afterwards.
    fn resize(&mut self, viewport: Viewport);
}
