//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - Every renderer owns a drawing surface that reports its current size.
//!
//! The debug text renderer implements the same trait as the GPU backend, so the
//! frame loop and headless tools run without a GPU.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "backdrop-render v0.1.0"
}
