use backdrop_common::{CameraRig, DrawingSurface, Viewport};
use glam::{Vec2, Vec3};

use crate::event::InputEvent;
use crate::pointer::{PointerState, normalize_pointer};
use crate::scroll::ScrollTracker;

/// How pointer positions become smoothing targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMode {
    /// Keep the normalized position (z = 0).
    Planar,
    /// Unproject through the camera onto the plane `z = plane_z`.
    Projected { plane_z: f32 },
}

/// What an event changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    /// New pointer smoothing target.
    Pointer(Vec3),
    /// Camera and surface now match this size.
    Resized(Viewport),
    /// New scroll progress in [0, 1].
    Scrolled(f32),
    /// The event does not apply to this background.
    Ignored,
}

/// Writes normalized pointer, size and scroll state from host events.
#[derive(Debug, Clone)]
pub struct InputBridge {
    pointer: PointerState,
    mode: PointerMode,
    scroll: Option<ScrollTracker>,
    viewport: Viewport,
}

impl InputBridge {
    pub fn new(viewport: Viewport, mode: PointerMode, scroll: Option<ScrollTracker>) -> Self {
        Self {
            pointer: PointerState::default(),
            mode,
            scroll,
            viewport,
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current scroll progress; 0 when scrolling is not tracked.
    pub fn scroll_progress(&self) -> f32 {
        self.scroll.map_or(0.0, |s| s.progress())
    }

    pub fn scroll(&self) -> Option<&ScrollTracker> {
        self.scroll.as_ref()
    }

    /// Apply one event. Resizes update `camera` and `surface` in place.
    pub fn handle<S: DrawingSurface + ?Sized>(
        &mut self,
        event: InputEvent,
        camera: &mut CameraRig,
        surface: &mut S,
    ) -> InputOutcome {
        match event {
            InputEvent::PointerMoved { x, y } => {
                let target = self.pointer_target(Vec2::new(x, y), camera);
                self.pointer.set_target(target);
                InputOutcome::Pointer(target)
            }
            InputEvent::Resized(viewport) => {
                if viewport.is_empty() {
                    tracing::debug!(?viewport, "ignoring resize to empty surface");
                    return InputOutcome::Ignored;
                }
                camera.set_viewport(viewport);
                surface.resize(viewport);
                self.viewport = viewport;
                if let Some(scroll) = &mut self.scroll {
                    scroll.set_viewport_height(viewport.height as f32);
                }
                tracing::debug!(
                    width = viewport.width,
                    height = viewport.height,
                    aspect = camera.aspect,
                    "surface resized"
                );
                InputOutcome::Resized(viewport)
            }
            InputEvent::Scrolled { delta } => match &mut self.scroll {
                Some(scroll) => {
                    let progress = scroll.scroll_by(delta);
                    tracing::debug!(position = scroll.position(), progress, "scrolled");
                    InputOutcome::Scrolled(progress)
                }
                None => InputOutcome::Ignored,
            },
        }
    }

    fn pointer_target(&self, position: Vec2, camera: &CameraRig) -> Vec3 {
        let ndc = normalize_pointer(position, self.viewport);
        match self.mode {
            PointerMode::Planar => ndc.extend(0.0),
            PointerMode::Projected { plane_z } => camera.pointer_on_plane(ndc, plane_z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollSection;

    struct FakeSurface {
        size: Viewport,
        resizes: usize,
    }

    impl DrawingSurface for FakeSurface {
        fn size(&self) -> Viewport {
            self.size
        }

        fn resize(&mut self, viewport: Viewport) {
            self.size = viewport;
            self.resizes += 1;
        }
    }

    fn setup(mode: PointerMode) -> (InputBridge, CameraRig, FakeSurface) {
        let viewport = Viewport::new(400, 400);
        let scroll = ScrollTracker::new(
            ScrollSection {
                top: 0.0,
                height: 2400.0,
            },
            400.0,
        );
        (
            InputBridge::new(viewport, mode, Some(scroll)),
            CameraRig::default(),
            FakeSurface {
                size: viewport,
                resizes: 0,
            },
        )
    }

    #[test]
    fn planar_pointer_center_is_zero() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Planar);
        let outcome = bridge.handle(
            InputEvent::PointerMoved { x: 200.0, y: 200.0 },
            &mut cam,
            &mut surface,
        );
        assert_eq!(outcome, InputOutcome::Pointer(Vec3::ZERO));
        assert_eq!(bridge.pointer().target, Vec3::ZERO);
    }

    #[test]
    fn planar_pointer_top_right() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Planar);
        bridge.handle(
            InputEvent::PointerMoved { x: 400.0, y: 0.0 },
            &mut cam,
            &mut surface,
        );
        assert_eq!(bridge.pointer().target, Vec3::new(1.0, 1.0, 0.0));
        // Only the target moves; smoothing happens per frame.
        assert_eq!(bridge.pointer().current, Vec3::ZERO);
    }

    #[test]
    fn projected_pointer_lands_on_plane() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Projected { plane_z: 0.0 });
        bridge.handle(
            InputEvent::PointerMoved { x: 300.0, y: 100.0 },
            &mut cam,
            &mut surface,
        );
        let target = bridge.pointer().target;
        assert!(target.z.abs() < 1e-4);
        assert!(target.x > 0.0 && target.y > 0.0);
    }

    #[test]
    fn resize_updates_camera_and_surface() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Planar);
        let outcome = bridge.handle(
            InputEvent::Resized(Viewport::new(1024, 768)),
            &mut cam,
            &mut surface,
        );
        assert_eq!(outcome, InputOutcome::Resized(Viewport::new(1024, 768)));
        assert_eq!(cam.aspect, 1024.0 / 768.0);
        assert_eq!(surface.size(), Viewport::new(1024, 768));
        assert_eq!(bridge.viewport(), Viewport::new(1024, 768));
        assert_eq!(surface.resizes, 1);
    }

    #[test]
    fn empty_resize_is_ignored() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Planar);
        let outcome = bridge.handle(
            InputEvent::Resized(Viewport::new(0, 0)),
            &mut cam,
            &mut surface,
        );
        assert_eq!(outcome, InputOutcome::Ignored);
        assert_eq!(surface.resizes, 0);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn pointer_uses_resized_viewport() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Planar);
        bridge.handle(
            InputEvent::Resized(Viewport::new(800, 600)),
            &mut cam,
            &mut surface,
        );
        bridge.handle(
            InputEvent::PointerMoved { x: 400.0, y: 300.0 },
            &mut cam,
            &mut surface,
        );
        assert_eq!(bridge.pointer().target, Vec3::ZERO);
    }

    #[test]
    fn scroll_reports_progress() {
        let (mut bridge, mut cam, mut surface) = setup(PointerMode::Planar);
        let outcome = bridge.handle(InputEvent::Scrolled { delta: 1000.0 }, &mut cam, &mut surface);
        assert_eq!(outcome, InputOutcome::Scrolled(0.5));
        assert_eq!(bridge.scroll_progress(), 0.5);
    }

    #[test]
    fn scroll_without_tracker_is_ignored() {
        let mut bridge = InputBridge::new(Viewport::new(400, 400), PointerMode::Planar, None);
        let mut cam = CameraRig::default();
        let mut surface = FakeSurface {
            size: Viewport::new(400, 400),
            resizes: 0,
        };
        let outcome = bridge.handle(InputEvent::Scrolled { delta: 10.0 }, &mut cam, &mut surface);
        assert_eq!(outcome, InputOutcome::Ignored);
        assert_eq!(bridge.scroll_progress(), 0.0);
    }
}
