use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use backdrop_common::{DrawingSurface, Viewport};
use backdrop_frame::{Background, FrameClock, FrameScheduler, LoopHandle, LoopState};
use backdrop_input::{InputEvent, ScrollSection};
use backdrop_render_wgpu::{SurfaceFrame, SurfaceRenderer};
use backdrop_scene::{SceneConfig, Variant};
use clap::Parser;
use egui::Context as EguiContext;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 40.0;

#[derive(Parser)]
#[command(name = "backdrop-desktop", about = "Animated background in a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Background variant: wireframe or field (overrides the config file)
    #[arg(long)]
    variant: Option<Variant>,

    /// RNG seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Height in pixels of the virtual page section the wheel scrolls through
    #[arg(long, default_value = "3000")]
    section_height: f32,
}

/// Schedules the next frame by asking winit for a redraw.
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

/// Values shown in the overlay, copied out before the egui pass.
struct OverlayStats {
    variant: Variant,
    frames: u64,
    fps: f32,
    pointer: [f32; 3],
    scroll: f32,
    state: LoopState,
}

/// Draw the stats window; returns whether Stop was clicked.
fn draw_overlay(ctx: &EguiContext, stats: &OverlayStats) -> bool {
    let mut stop = false;
    egui::Window::new("Background")
        .default_width(220.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Variant: {}", stats.variant));
            ui.label(format!("Frames: {}  FPS: {:.0}", stats.frames, stats.fps));
            ui.label(format!(
                "Pointer: ({:.2}, {:.2}, {:.2})",
                stats.pointer[0], stats.pointer[1], stats.pointer[2]
            ));
            ui.label(format!("Scroll: {:.3}", stats.scroll));
            ui.label(format!("Loop: {:?}", stats.state));
            ui.separator();
            if ui.button("Stop (Esc)").clicked() {
                stop = true;
            }
            ui.small("F1: Toggle overlay | Space: Restart");
        });
    stop
}

struct BackdropApp {
    config: Option<SceneConfig>,
    section: ScrollSection,
    window: Option<Arc<Window>>,
    renderer: Option<SurfaceRenderer>,
    background: Option<Background>,
    handle: Option<LoopHandle>,
    clock: FrameClock,
    show_overlay: bool,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl BackdropApp {
    fn new(config: SceneConfig, section: ScrollSection) -> Self {
        Self {
            config: Some(config),
            section,
            window: None,
            renderer: None,
            background: None,
            handle: None,
            clock: FrameClock::new(),
            show_overlay: true,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    /// Bring up the GPU for `window`. `None` when no adapter or device is
    /// available; the cause is logged.
    fn create_renderer(window: &Arc<Window>) -> Option<SurfaceRenderer> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = match instance.create_surface(window.clone()) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::error!("failed to create surface: {e}");
                return None;
            }
        };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let (device, queue) = match pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("backdrop_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!("failed to create device: {e}");
                return None;
            }
        };

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        let size = window.inner_size();
        Some(SurfaceRenderer::new(
            surface,
            &adapter,
            device,
            queue,
            Viewport::new(size.width, size.height),
        ))
    }

    fn stop(&self) {
        if let Some(handle) = &self.handle {
            handle.stop();
        }
    }

    fn restart(&mut self) {
        if let (Some(window), Some(background)) = (&self.window, &mut self.background) {
            self.handle = Some(background.start(&mut RedrawScheduler(window)));
        }
    }

    fn forward(&mut self, event: InputEvent) {
        if let (Some(background), Some(renderer)) = (&mut self.background, &mut self.renderer) {
            background.handle_event(event, renderer);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Escape => self.stop(),
            KeyCode::Space => self.restart(),
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    /// Animate one frame while running. A stopped background is repainted
    /// as it stands, so expose, resize and the overlay toggle still show.
    fn redraw(&mut self) {
        let (Some(window), Some(renderer), Some(background)) =
            (&self.window, &mut self.renderer, &mut self.background)
        else {
            return;
        };

        let elapsed = self.clock.tick();
        let frame = match background.frame(elapsed, renderer, &mut RedrawScheduler(window)) {
            Some(frame) => frame,
            None => renderer.repaint(background.scene()),
        };
        let Some(frame) = frame else {
            return;
        };

        if self.show_overlay {
            let pointer = background.input().pointer().target;
            let stats = OverlayStats {
                variant: background.scene().variant(),
                frames: background.frames(),
                fps: self.clock.timer().fps(),
                pointer: pointer.to_array(),
                scroll: background.input().scroll_progress(),
                state: background.loop_state(),
            };
            if self.paint_overlay(&frame, &stats) {
                self.stop();
            }
        }
        frame.present();
    }

    /// Run egui over the rendered frame; returns whether Stop was clicked.
    fn paint_overlay(&mut self, frame: &SurfaceFrame, stats: &OverlayStats) -> bool {
        let (Some(window), Some(renderer), Some(egui_winit), Some(egui_renderer)) = (
            &self.window,
            &self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return false;
        };

        let mut stop = false;
        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            stop = draw_overlay(ctx, stats);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = renderer.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let (device, queue) = (renderer.device(), renderer.queue());
        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }
        stop
    }
}

impl ApplicationHandler for BackdropApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(config) = self.config.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title("Backdrop")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let renderer = Self::create_renderer(&window);
        let mut background = match Background::init(config, renderer.as_ref(), Some(self.section))
        {
            Ok(background) => background,
            Err(e) => {
                tracing::error!("background disabled: {e}");
                event_loop.exit();
                return;
            }
        };
        // init succeeded, so the renderer exists.
        let Some(mut renderer) = renderer else {
            return;
        };
        renderer.load_scene(background.scene());

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(renderer.device(), renderer.format(), None, 1, false);

        self.clock = FrameClock::new();
        self.handle = Some(background.start(&mut RedrawScheduler(&window)));
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.background = Some(background);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.forward(InputEvent::Resized(Viewport::new(size.width, size.height)));
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.forward(InputEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel down scrolls the page down.
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.forward(InputEvent::Scrolled { delta });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(key),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    anyhow::ensure!(
        cli.section_height > 0.0,
        "section height must be positive, got {}",
        cli.section_height
    );

    tracing::info!(variant = %config.variant, "backdrop-desktop starting");

    let event_loop = EventLoop::new()?;
    // Frames are requested by the background's own loop.
    event_loop.set_control_flow(ControlFlow::Wait);

    let section = ScrollSection {
        top: 0.0,
        height: cli.section_height,
    };
    let mut app = BackdropApp::new(config, section);
    event_loop.run_app(&mut app)?;

    Ok(())
}
