use backdrop_common::Viewport;
use glam::{Vec2, Vec3};

/// Map surface pixel coordinates to `[-1, 1] x [-1, 1]` with +y up.
pub fn normalize_pointer(position: Vec2, viewport: Viewport) -> Vec2 {
    let width = viewport.width.max(1) as f32;
    let height = viewport.height.max(1) as f32;
    Vec2::new(
        (position.x / width) * 2.0 - 1.0,
        -(position.y / height) * 2.0 + 1.0,
    )
}

/// Last pointer target and its exponentially smoothed follower.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub target: Vec3,
    pub current: Vec3,
}

impl PointerState {
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Move `current` a `blend` fraction of the way toward `target`.
    pub fn smooth(&mut self, blend: f32) -> Vec3 {
        self.current += (self.target - self.current) * blend;
        self.current
    }
}
