//! Frame loop: the per-frame callback that animates a background scene.
//!
//! # Invariants
//! - A `Background` owns its scene, input state and exactly one frame loop.
//! - Each frame issues exactly one render call, then requests the next frame
//!   only while the loop is running.
//! - At most one frame request is pending; restarting before it fires reuses
//!   it rather than starting a second callback chain.
//! - Once stopped, no further frames render until the loop is started again.
//!
//! # Workaround
//! The host's per-paint callback is abstracted as `FrameScheduler`; desktop
//! maps it to `Window::request_redraw`, tests count requests.

mod background;
mod clock;
mod error;
mod frame_loop;

pub use background::Background;
pub use clock::{FrameClock, FrameTimer};
pub use error::{Capability, SetupError};
pub use frame_loop::{FrameLoop, FrameScheduler, LoopHandle, LoopState};

pub fn crate_info() -> &'static str {
    "backdrop-frame v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("frame"));
    }
}
