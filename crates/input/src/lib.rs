//! Input bridge: host pointer, resize and scroll events mapped to normalized
//! state the frame loop reads.
//!
//! # Invariants
//! - Pointer coordinates are normalized to [-1, 1] with +y up.
//! - Scroll progress stays in [0, 1] and never decreases while scrolling down.
//! - Handlers only write state; they never render.

pub mod bridge;
pub mod event;
pub mod pointer;
pub mod scroll;

pub use bridge::{InputBridge, InputOutcome, PointerMode};
pub use event::InputEvent;
pub use pointer::{PointerState, normalize_pointer};
pub use scroll::{ScrollSection, ScrollTracker};

pub fn crate_info() -> &'static str {
    "backdrop-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
