//! Shared types used across the backdrop crates.
//!
//! # Invariants
//! - Everything here is plain data plus pure math; no rendering or host access.

pub mod camera;
pub mod types;

pub use camera::CameraRig;
pub use types::{Color, DrawingSurface, Extents, Transform, Viewport};

pub fn crate_info() -> &'static str {
    "backdrop-common v0.1.0"
}
