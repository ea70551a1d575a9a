/// Vertical extent of the page section that drives scroll progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSection {
    /// Offset of the section's top edge from the top of the page, in pixels.
    pub top: f32,
    pub height: f32,
}

/// Tracks scroll position and converts it to progress through a section.
///
/// Progress is 0 while the section's top is at or below the viewport top and
/// 1 once its bottom reaches the viewport bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTracker {
    section: ScrollSection,
    viewport_height: f32,
    position: f32,
}

impl ScrollTracker {
    pub fn new(section: ScrollSection, viewport_height: f32) -> Self {
        Self {
            section,
            viewport_height,
            position: 0.0,
        }
    }

    pub fn section(&self) -> ScrollSection {
        self.section
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Furthest the page can scroll: the section bottom at the viewport bottom.
    pub fn max_scroll(&self) -> f32 {
        (self.section.top + self.section.height - self.viewport_height).max(0.0)
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
        self.position = self.position.min(self.max_scroll());
    }

    pub fn scroll_to(&mut self, position: f32) -> f32 {
        self.position = position.clamp(0.0, self.max_scroll());
        self.progress()
    }

    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        self.scroll_to(self.position + delta)
    }

    pub fn progress(&self) -> f32 {
        progress_at(self.position, self.section, self.viewport_height)
    }
}

/// Progress through `section` at scroll offset `position`.
fn progress_at(position: f32, section: ScrollSection, viewport_height: f32) -> f32 {
    let start = section.top;
    let end = section.top + section.height - viewport_height;
    if end <= start {
        return if position >= start { 1.0 } else { 0.0 };
    }
    ((position - start) / (end - start)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ScrollTracker {
        ScrollTracker::new(
            ScrollSection {
                top: 0.0,
                height: 3000.0,
            },
            1000.0,
        )
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(tracker().progress(), 0.0);
    }

    #[test]
    fn halfway_through_section() {
        let mut t = tracker();
        assert_eq!(t.scroll_to(1000.0), 0.5);
    }

    #[test]
    fn clamps_past_the_end() {
        let mut t = tracker();
        assert_eq!(t.scroll_by(10_000.0), 1.0);
        assert_eq!(t.position(), 2000.0);
        assert_eq!(t.scroll_by(-50_000.0), 0.0);
        assert_eq!(t.position(), 0.0);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut t = tracker();
        let mut last = t.progress();
        for _ in 0..100 {
            let p = t.scroll_by(37.0);
            assert!(p >= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn section_offset_delays_progress() {
        let section = ScrollSection {
            top: 500.0,
            height: 2000.0,
        };
        assert_eq!(progress_at(200.0, section, 1000.0), 0.0);
        assert_eq!(progress_at(1000.0, section, 1000.0), 0.5);
        assert_eq!(progress_at(1500.0, section, 1000.0), 1.0);
    }

    #[test]
    fn short_section_jumps_to_done() {
        let section = ScrollSection {
            top: 0.0,
            height: 500.0,
        };
        assert_eq!(progress_at(0.0, section, 1000.0), 1.0);
    }

    #[test]
    fn taller_viewport_clamps_position() {
        let mut t = tracker();
        t.scroll_to(2000.0);
        t.set_viewport_height(2500.0);
        assert_eq!(t.position(), 500.0);
        assert_eq!(t.progress(), 1.0);
    }
}
