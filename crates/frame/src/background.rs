use std::time::Duration;

use backdrop_common::DrawingSurface;
use backdrop_input::{
    InputBridge, InputEvent, InputOutcome, PointerMode, ScrollSection, ScrollTracker,
};
use backdrop_render::Renderer;
use backdrop_scene::{MotionConfig, Scene, SceneBuilder, SceneConfig, SceneContent, Variant};
use glam::{Vec2, Vec3};

use crate::error::{Capability, SetupError};
use crate::frame_loop::{FrameLoop, FrameScheduler, LoopHandle, LoopState};

/// One initialized background: the scene, the input state feeding it, and
/// the frame loop animating it.
///
/// Event handlers and the frame callback both take `&mut self`, so updates
/// and reads are serialized by the caller's event loop.
#[derive(Debug)]
pub struct Background {
    scene: Scene,
    input: InputBridge,
    motion: MotionConfig,
    frame_loop: FrameLoop,
}

impl Background {
    /// Build a background for `renderer`'s surface.
    ///
    /// Fails without building anything if the renderer is absent, its surface
    /// is empty, or the field variant has no scroll section to track.
    pub fn init<R: Renderer + ?Sized>(
        config: SceneConfig,
        renderer: Option<&R>,
        scroll_section: Option<ScrollSection>,
    ) -> Result<Self, SetupError> {
        let Some(renderer) = renderer else {
            return Err(missing(Capability::Renderer));
        };
        let viewport = renderer.size();
        if viewport.is_empty() {
            return Err(missing(Capability::DrawingSurface));
        }

        let (mode, scroll) = match config.variant {
            Variant::Wireframe => (PointerMode::Planar, None),
            Variant::Field => {
                let Some(section) = scroll_section else {
                    return Err(missing(Capability::ScrollTracking));
                };
                (
                    PointerMode::Projected {
                        plane_z: config.motion.pointer_plane_z,
                    },
                    Some(ScrollTracker::new(section, viewport.height as f32)),
                )
            }
        };

        let motion = config.motion.clone();
        let scene = SceneBuilder::new(config).build(viewport);

        Ok(Self {
            scene,
            input: InputBridge::new(viewport, mode, scroll),
            motion,
            frame_loop: FrameLoop::new(),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn input(&self) -> &InputBridge {
        &self.input
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    /// Frames rendered since init.
    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Start animating; see [`FrameLoop::start`].
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> LoopHandle {
        self.frame_loop.start(scheduler)
    }

    pub fn handle(&self) -> LoopHandle {
        self.frame_loop.handle()
    }

    /// Feed one host event. Scroll progress reaches the field uniforms
    /// immediately, independent of the frame cadence.
    pub fn handle_event<S: DrawingSurface + ?Sized>(
        &mut self,
        event: InputEvent,
        surface: &mut S,
    ) -> InputOutcome {
        let outcome = self.input.handle(event, &mut self.scene.camera, surface);
        if let InputOutcome::Scrolled(progress) = outcome {
            if let Some(uniforms) = self.scene.uniforms_mut() {
                uniforms.scroll = progress;
            }
        }
        outcome
    }

    /// Frame callback: animate, render once, and reschedule while running.
    ///
    /// Returns `None` without touching the scene or renderer when the loop is
    /// stopped. Either way the pending frame request counts as serviced.
    pub fn frame<R, S>(
        &mut self,
        elapsed: Duration,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Option<R::Output>
    where
        R: Renderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.frame_loop.begin_frame();
        if !self.frame_loop.is_running() {
            tracing::trace!("frame skipped, loop stopped");
            return None;
        }
        let _span = tracing::trace_span!("frame", n = self.frame_loop.frames()).entered();

        self.advance(elapsed);
        let output = renderer.render(&self.scene);
        self.frame_loop.finish_frame(scheduler);
        Some(output)
    }

    fn advance(&mut self, elapsed: Duration) {
        let motion = &self.motion;
        let Scene {
            camera, content, ..
        } = &mut self.scene;

        match content {
            SceneContent::Wireframe { shapes, starfield } => {
                for shape in shapes.iter_mut() {
                    shape.spin();
                }
                starfield.spin(motion.starfield_spin);

                let pointer = self.input.pointer().target;
                let goal = Vec2::new(
                    pointer.x * motion.camera_reach.x,
                    pointer.y * motion.camera_reach.y,
                );
                camera.drift_toward(goal, motion.camera_blend);
                camera.look_at(Vec3::ZERO);
            }
            SceneContent::Field { uniforms, .. } => {
                uniforms.time = elapsed.as_secs_f32();
                uniforms.scroll = self.input.scroll_progress();
                uniforms.pointer = self.input.pointer_mut().smooth(motion.pointer_blend);
            }
        }
    }
}

fn missing(capability: Capability) -> SetupError {
    tracing::error!(%capability, "cannot start background: required capability missing");
    SetupError::CapabilityMissing(capability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_common::Viewport;
    use backdrop_render::DebugTextRenderer;

    /// Renderer that only counts calls.
    struct CountingRenderer {
        size: Viewport,
        renders: usize,
    }

    impl CountingRenderer {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: Viewport::new(width, height),
                renders: 0,
            }
        }
    }

    impl DrawingSurface for CountingRenderer {
        fn size(&self) -> Viewport {
            self.size
        }

        fn resize(&mut self, viewport: Viewport) {
            self.size = viewport;
        }
    }

    impl Renderer for CountingRenderer {
        type Output = usize;

        fn render(&mut self, _scene: &Scene) -> usize {
            self.renders += 1;
            self.renders
        }
    }

    #[derive(Default)]
    struct Requests(usize);

    impl FrameScheduler for Requests {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    const SECTION: ScrollSection = ScrollSection {
        top: 0.0,
        height: 2400.0,
    };

    fn config(variant: Variant) -> SceneConfig {
        SceneConfig {
            seed: Some(42),
            ..SceneConfig::for_variant(variant)
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// One host tick: service every callback queued so far and return how
    /// many renders happened.
    fn tick(
        bg: &mut Background,
        renderer: &mut CountingRenderer,
        requests: &mut Requests,
    ) -> usize {
        let before = renderer.renders;
        for _ in 0..std::mem::take(&mut requests.0) {
            let elapsed = ms(16 * (bg.frames() + 1));
            bg.frame(elapsed, renderer, requests);
        }
        renderer.renders - before
    }

    #[test]
    fn missing_renderer_builds_nothing() {
        let err = Background::init::<CountingRenderer>(config(Variant::Wireframe), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::CapabilityMissing(Capability::Renderer)
        ));
    }

    #[test]
    fn empty_surface_is_missing_capability() {
        let renderer = CountingRenderer::new(0, 300);
        let err = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap_err();
        assert!(matches!(
            err,
            SetupError::CapabilityMissing(Capability::DrawingSurface)
        ));
    }

    #[test]
    fn field_requires_scroll_section() {
        let renderer = CountingRenderer::new(400, 400);
        let err = Background::init(config(Variant::Field), Some(&renderer), None).unwrap_err();
        assert!(matches!(
            err,
            SetupError::CapabilityMissing(Capability::ScrollTracking)
        ));
    }

    #[test]
    fn wireframe_does_not_need_scroll() {
        let renderer = CountingRenderer::new(400, 400);
        let bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        assert_eq!(bg.scene().shapes().len(), 12);
        assert_eq!(bg.loop_state(), LoopState::Stopped);
    }

    #[test]
    fn one_render_per_frame() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();
        bg.start(&mut requests);
        for i in 1..=5 {
            assert_eq!(bg.frame(ms(16 * i), &mut renderer, &mut requests), Some(i as usize));
        }
        assert_eq!(renderer.renders, 5);
        assert_eq!(bg.frames(), 5);
        // First frame from start, one more after each rendered frame.
        assert_eq!(requests.0, 6);
    }

    #[test]
    fn frames_before_start_do_nothing() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();
        assert_eq!(bg.frame(ms(16), &mut renderer, &mut requests), None);
        assert_eq!(renderer.renders, 0);
        assert_eq!(requests.0, 0);
    }

    #[test]
    fn stop_prevents_further_renders() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg =
            Background::init(config(Variant::Field), Some(&renderer), Some(SECTION)).unwrap();
        let mut requests = Requests::default();
        let handle = bg.start(&mut requests);
        bg.frame(ms(16), &mut renderer, &mut requests);
        assert_eq!(renderer.renders, 1);

        handle.stop();
        let scheduled = requests.0;
        let before = bg.scene().clone();
        assert_eq!(bg.frame(ms(32), &mut renderer, &mut requests), None);
        assert_eq!(bg.frame(ms(48), &mut renderer, &mut requests), None);
        assert_eq!(renderer.renders, 1);
        assert_eq!(requests.0, scheduled);
        assert_eq!(bg.scene(), &before);
        assert_eq!(bg.loop_state(), LoopState::Stopped);
    }

    #[test]
    fn restart_keeps_a_single_frame_chain() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();

        let handle = bg.start(&mut requests);
        assert_eq!(tick(&mut bg, &mut renderer, &mut requests), 1);
        handle.stop();
        bg.start(&mut requests);
        assert_eq!(requests.0, 1);

        let per_tick: Vec<usize> = (0..3)
            .map(|_| tick(&mut bg, &mut renderer, &mut requests))
            .collect();
        assert_eq!(per_tick, vec![1, 1, 1]);
        assert_eq!(requests.0, 1);
    }

    #[test]
    fn stopped_callback_clears_pending_request() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Field), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();
        let handle = bg.start(&mut requests);
        handle.stop();
        assert_eq!(bg.frame(ms(16), &mut renderer, &mut requests), None);

        // The stale callback ran, so a restart must schedule afresh.
        bg.start(&mut requests);
        assert_eq!(requests.0, 2);
        assert_eq!(bg.frame(ms(32), &mut renderer, &mut requests), Some(1));
    }

    #[test]
    fn stopped_scene_repaints_unchanged() {
        let mut renderer = DebugTextRenderer::new(Viewport::new(640, 480)).verbose();
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();
        let handle = bg.start(&mut requests);
        bg.frame(ms(16), &mut renderer, &mut requests);
        let last = bg.frame(ms(32), &mut renderer, &mut requests).unwrap();
        handle.stop();
        assert_eq!(bg.frame(ms(48), &mut renderer, &mut requests), None);

        // A host repaint of the stopped scene matches the last frame apart
        // from the frame counter header.
        let repaint = renderer.render(bg.scene());
        let body = |text: &str| text.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(body(&repaint), body(&last));
        assert_eq!(bg.frames(), 2);
    }

    #[test]
    fn shapes_spin_by_their_speed() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let speeds: Vec<Vec2> = bg.scene().shapes().iter().map(|s| s.rotation_speed).collect();
        let mut requests = Requests::default();
        bg.start(&mut requests);
        bg.frame(ms(16), &mut renderer, &mut requests);
        bg.frame(ms(32), &mut renderer, &mut requests);
        for (shape, speed) in bg.scene().shapes().iter().zip(speeds) {
            assert!((shape.transform.rotation.x - 2.0 * speed.x).abs() < 1e-6);
            assert!((shape.transform.rotation.y - 2.0 * speed.y).abs() < 1e-6);
        }
        let spin = bg.scene().particles().rotation;
        assert!((spin.x - 0.0008).abs() < 1e-7);
        assert!((spin.y - 0.0016).abs() < 1e-7);
    }

    #[test]
    fn camera_drifts_toward_pointer() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();
        bg.start(&mut requests);

        // Top-right corner: normalized (1, 1), camera goal (0.8, 0.6).
        bg.handle_event(InputEvent::PointerMoved { x: 400.0, y: 0.0 }, &mut renderer);
        bg.frame(ms(16), &mut renderer, &mut requests);
        let cam = bg.scene().camera;
        assert!((cam.position.x - 0.8 * 0.02).abs() < 1e-6);
        assert!((cam.position.y - 0.6 * 0.02).abs() < 1e-6);
        assert_eq!(cam.target, Vec3::ZERO);

        for i in 0..1000 {
            bg.frame(ms(32 + i), &mut renderer, &mut requests);
        }
        let cam = bg.scene().camera;
        assert!((cam.position.x - 0.8).abs() < 1e-3);
        assert!((cam.position.y - 0.6).abs() < 1e-3);
    }

    #[test]
    fn field_uniforms_follow_time_scroll_and_pointer() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg =
            Background::init(config(Variant::Field), Some(&renderer), Some(SECTION)).unwrap();
        let mut requests = Requests::default();
        bg.start(&mut requests);

        let outcome = bg.handle_event(InputEvent::Scrolled { delta: 500.0 }, &mut renderer);
        assert_eq!(outcome, InputOutcome::Scrolled(0.25));
        // Written at event time, before any frame runs.
        assert_eq!(bg.scene().uniforms().unwrap().scroll, 0.25);

        bg.handle_event(InputEvent::PointerMoved { x: 300.0, y: 100.0 }, &mut renderer);
        let target = bg.input().pointer().target;
        bg.frame(Duration::from_millis(1500), &mut renderer, &mut requests);

        let uniforms = *bg.scene().uniforms().unwrap();
        assert!((uniforms.time - 1.5).abs() < 1e-6);
        assert_eq!(uniforms.scroll, 0.25);
        assert!(uniforms.pointer.abs_diff_eq(target * 0.1, 1e-5));
    }

    #[test]
    fn resize_updates_camera_and_renderer_surface() {
        let mut renderer = CountingRenderer::new(400, 400);
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        bg.handle_event(InputEvent::Resized(Viewport::new(1280, 720)), &mut renderer);
        assert_eq!(bg.scene().camera.aspect, 1280.0 / 720.0);
        assert_eq!(renderer.size(), Viewport::new(1280, 720));
    }

    #[test]
    fn works_with_debug_text_renderer() {
        let mut renderer = DebugTextRenderer::new(Viewport::new(400, 400));
        let mut bg = Background::init(config(Variant::Wireframe), Some(&renderer), None).unwrap();
        let mut requests = Requests::default();
        bg.start(&mut requests);
        let text = bg.frame(ms(16), &mut renderer, &mut requests).unwrap();
        assert!(text.contains("Shapes: 12"));
        assert_eq!(renderer.frames(), 1);
    }
}
