//! wgpu render backend for animated backgrounds.
//!
//! Wireframe shapes draw as instanced line lists (one mesh per shape kind),
//! starfields and particle fields as instanced camera-facing point sprites.
//! The particle-field motion runs in the point shader from the scene's field
//! uniforms.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Particle attributes are uploaded once per scene, not per frame.

mod gpu;
mod instances;
mod mesh;
mod shaders;
mod surface;

pub use gpu::WgpuRenderer;
pub use surface::{SurfaceFrame, SurfaceRenderer};

pub fn crate_info() -> &'static str {
    "backdrop-render-wgpu v0.1.0"
}
