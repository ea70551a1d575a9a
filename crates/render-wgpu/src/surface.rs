use backdrop_common::{DrawingSurface, Viewport};
use backdrop_render::Renderer;
use backdrop_scene::Scene;

use crate::gpu::WgpuRenderer;

/// A rendered surface texture waiting for overlays and presentation.
pub struct SurfaceFrame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl SurfaceFrame {
    pub fn present(self) {
        self.texture.present();
    }
}

/// Window surface plus the device that draws into it.
///
/// Implements [`Renderer`] so the frame loop can drive it directly; each
/// render acquires the next surface texture and draws the scene into it.
pub struct SurfaceRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

impl SurfaceRenderer {
    /// Configure `surface` for `adapter` at `size` and build the pipelines.
    pub fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        size: Viewport,
    ) -> Self {
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);

        Self {
            surface,
            device,
            queue,
            config,
            renderer,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Upload a freshly built scene; see [`WgpuRenderer::load_scene`].
    pub fn load_scene(&mut self, scene: &Scene) {
        self.renderer.load_scene(&self.device, scene);
    }

    /// Draw `scene` into the next surface texture without advancing it.
    /// Hosts use this to refresh a stopped background.
    pub fn repaint(&mut self, scene: &Scene) -> Option<SurfaceFrame> {
        let frame = self.acquire()?;
        self.renderer
            .render(&self.device, &self.queue, &frame.view, scene);
        Some(frame)
    }

    fn acquire(&self) -> Option<SurfaceFrame> {
        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Some(SurfaceFrame { texture, view })
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                None
            }
        }
    }
}

impl DrawingSurface for SurfaceRenderer {
    fn size(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.config.width = viewport.width.max(1);
        self.config.height = viewport.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

impl Renderer for SurfaceRenderer {
    /// `None` when no surface texture was available this frame.
    type Output = Option<SurfaceFrame>;

    fn render(&mut self, scene: &Scene) -> Self::Output {
        self.repaint(scene)
    }
}
