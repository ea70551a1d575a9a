use backdrop_common::Viewport;

/// A host event the background reacts to.
///
/// Window backends translate their native events into these; the bridge never
/// sees raw platform types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to `(x, y)` in surface pixels, origin top-left.
    PointerMoved { x: f32, y: f32 },
    /// The drawing surface changed size.
    Resized(Viewport),
    /// Page scrolled by `delta` pixels (positive scrolls down).
    Scrolled { delta: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_copyable() {
        let e = InputEvent::PointerMoved { x: 1.0, y: 2.0 };
        let f = e;
        assert_eq!(e, f);
    }

    #[test]
    fn resized_carries_viewport() {
        let e = InputEvent::Resized(Viewport::new(800, 600));
        assert!(matches!(e, InputEvent::Resized(v) if v.width == 800));
    }
}
