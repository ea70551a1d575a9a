use std::fmt;

/// Something the host must provide before a background can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A GPU adapter or other renderer.
    Renderer,
    /// A non-empty surface to draw into.
    DrawingSurface,
    /// A scroll section driving scroll progress (field variant only).
    ScrollTracking,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Renderer => "renderer",
            Self::DrawingSurface => "drawing surface",
            Self::ScrollTracking => "scroll tracking",
        };
        f.write_str(name)
    }
}

/// Errors from setting up a background.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("required capability missing: {0}")]
    CapabilityMissing(Capability),
}
