use backdrop_common::{CameraRig, DrawingSurface, Viewport};
use backdrop_scene::{Scene, SceneContent};
use glam::Vec3;

/// Camera/view summary derived from a scene's camera rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
}

impl From<&CameraRig> for RenderView {
    fn from(camera: &CameraRig) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
            aspect: camera.aspect,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The frame loop calls `render` exactly once per frame with the scene as it
/// stands after that frame's updates.
pub trait Renderer: DrawingSurface {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene through its camera.
    fn render(&mut self, scene: &Scene) -> Self::Output;
}

/// Renders a human-readable description of the scene.
///
/// Used by the CLI, in logs, and for exercising the frame loop in tests.
#[derive(Debug)]
pub struct DebugTextRenderer {
    size: Viewport,
    frames: u64,
    verbose: bool,
}

impl DebugTextRenderer {
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            frames: 0,
            verbose: false,
        }
    }

    /// Also list every shape and the first few particles.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DrawingSurface for DebugTextRenderer {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene) -> String {
        self.frames += 1;
        let view = RenderView::from(&scene.camera);
        let mut out = String::new();

        out.push_str(&format!(
            "=== Frame {} ({:?}, {}x{}) ===\n",
            self.frames,
            scene.variant(),
            self.size.width,
            self.size.height
        ));
        out.push_str(&format!("Objects: {}\n", scene.object_count()));
        out.push_str(&format!(
            "Camera: eye=({:.3}, {:.3}, {:.3}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            view.aspect
        ));
        out.push_str(&format!("Lights: {}\n", scene.lights.len()));

        match &scene.content {
            SceneContent::Wireframe { shapes, starfield } => {
                out.push_str(&format!("Shapes: {}\n", shapes.len()));
                if self.verbose {
                    for (i, shape) in shapes.iter().enumerate() {
                        let p = shape.transform.position;
                        let r = shape.transform.rotation;
                        out.push_str(&format!(
                            "  [{i:02}] {} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}) material={}\n",
                            shape.kind.name(),
                            p.x,
                            p.y,
                            p.z,
                            r.x,
                            r.y,
                            shape.material
                        ));
                    }
                }
                let r = starfield.rotation;
                out.push_str(&format!(
                    "Starfield: {} points rot=({:.4}, {:.4})\n",
                    starfield.len(),
                    r.x,
                    r.y
                ));
            }
            SceneContent::Field {
                particles,
                uniforms,
            } => {
                out.push_str(&format!("Particles: {}\n", particles.len()));
                if self.verbose {
                    for (i, p) in particles.positions().iter().take(5).enumerate() {
                        out.push_str(&format!(
                            "  [{i}] pos=({:.2}, {:.2}, {:.2}) size={:.3}\n",
                            p.x,
                            p.y,
                            p.z,
                            particles.sizes()[i]
                        ));
                    }
                }
                let q = uniforms.pointer;
                out.push_str(&format!(
                    "Uniforms: time={:.3} scroll={:.3} pointer=({:.3}, {:.3}, {:.3})\n",
                    uniforms.time, uniforms.scroll, q.x, q.y, q.z
                ));
            }
        }

        tracing::trace!(frame = self.frames, "debug frame rendered");
        out
    }
}
