use std::path::{Path, PathBuf};
use std::time::Duration;

use backdrop_common::Viewport;
use backdrop_frame::{Background, FrameScheduler};
use backdrop_input::{InputEvent, ScrollSection};
use backdrop_render::DebugTextRenderer;
use backdrop_scene::{SceneBuilder, SceneConfig, Variant};
use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

/// Simulated time between frames.
const FRAME_STEP: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "backdrop-cli", about = "Headless tools for animated backgrounds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the frame loop against the debug text renderer
    Simulate {
        /// Frames to render
        #[arg(short, long, default_value = "5")]
        frames: u64,
        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Background variant: wireframe or field
        #[arg(long)]
        variant: Option<Variant>,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        /// Height in pixels of the page section scroll progress runs over
        #[arg(long, default_value = "3000")]
        section_height: f32,
        /// Stop the loop after this many frames
        #[arg(long)]
        stop_after: Option<u64>,
        /// List every shape in each frame
        #[arg(long)]
        detail: bool,
    },
    /// Build a scene and print it as JSON
    Dump {
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(long)]
        variant: Option<Variant>,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
}

/// Config file (or defaults) with command-line overrides applied.
fn scene_config(
    path: Option<&Path>,
    variant: Option<Variant>,
    seed: Option<u64>,
) -> anyhow::Result<SceneConfig> {
    let mut config = match path {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(variant) = variant {
        config.variant = variant;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

/// Host stand-in: counts requested frames so the driver runs one callback per
/// request.
#[derive(Default)]
struct PendingFrames(u64);

impl FrameScheduler for PendingFrames {
    fn request_frame(&mut self) {
        self.0 += 1;
    }
}

/// Pointer position for frame `n`: a slow circle around the viewport center.
fn pointer_path(n: u64, viewport: Viewport) -> Vec2 {
    let angle = n as f32 * 0.2;
    let radius = Vec2::new(viewport.width as f32, viewport.height as f32) * 0.3;
    viewport.center() + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Scroll section starting at the top of the page; `height` must be positive
/// and finite.
fn scroll_section(height: f32) -> anyhow::Result<ScrollSection> {
    anyhow::ensure!(
        height.is_finite() && height > 0.0,
        "section height must be positive, got {height}"
    );
    Ok(ScrollSection { top: 0.0, height })
}

fn simulate(
    config: SceneConfig,
    viewport: Viewport,
    section_height: f32,
    frames: u64,
    stop_after: Option<u64>,
    detail: bool,
) -> anyhow::Result<()> {
    let section = scroll_section(section_height)?;
    let mut renderer = DebugTextRenderer::new(viewport);
    if detail {
        renderer = renderer.verbose();
    }
    let mut background = Background::init(config, Some(&renderer), Some(section))?;

    let mut pending = PendingFrames::default();
    let handle = background.start(&mut pending);
    let mut elapsed = Duration::ZERO;

    while pending.0 > 0 && background.frames() < frames {
        pending.0 -= 1;
        let n = background.frames();
        let pointer = pointer_path(n, viewport);
        background.handle_event(
            InputEvent::PointerMoved {
                x: pointer.x,
                y: pointer.y,
            },
            &mut renderer,
        );
        background.handle_event(InputEvent::Scrolled { delta: 40.0 }, &mut renderer);

        elapsed += FRAME_STEP;
        if let Some(text) = background.frame(elapsed, &mut renderer, &mut pending) {
            print!("{text}");
        }
        if stop_after == Some(background.frames()) {
            handle.stop();
        }
    }

    println!(
        "Rendered {} frame(s), loop {:?}",
        background.frames(),
        background.loop_state()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("backdrop-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", backdrop_common::crate_info());
            println!("scene: {}", backdrop_scene::crate_info());
            println!("input: {}", backdrop_input::crate_info());
            println!("render: {}", backdrop_render::crate_info());
            println!("frame: {}", backdrop_frame::crate_info());
            println!("render-wgpu: {}", backdrop_render_wgpu::crate_info());
            for variant in Variant::ALL {
                let config = SceneConfig::for_variant(variant);
                println!(
                    "variant {variant}: shapes={} starfield={} field={}",
                    config.shapes.count, config.starfield.count, config.field.count
                );
            }
        }
        Commands::Simulate {
            frames,
            seed,
            variant,
            width,
            height,
            section_height,
            stop_after,
            detail,
        } => {
            let config = scene_config(cli.config.as_deref(), variant, seed)?;
            println!(
                "Simulating {} background: {frames} frame(s) at {width}x{height}",
                config.variant
            );
            simulate(
                config,
                Viewport::new(width, height),
                section_height,
                frames,
                stop_after,
                detail,
            )?;
        }
        Commands::Dump {
            seed,
            variant,
            width,
            height,
            pretty,
        } => {
            let config = scene_config(cli.config.as_deref(), variant, seed)?;
            let viewport = Viewport::new(width, height);
            anyhow::ensure!(!viewport.is_empty(), "viewport must be non-empty");
            let scene = SceneBuilder::new(config).build(viewport);
            let json = if pretty {
                serde_json::to_string_pretty(&scene)?
            } else {
                serde_json::to_string(&scene)?
            };
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_height_must_be_positive() {
        assert!(scroll_section(0.0).is_err());
        assert!(scroll_section(-300.0).is_err());
        assert!(scroll_section(f32::NAN).is_err());
        let section = scroll_section(3000.0).unwrap();
        assert_eq!(section.top, 0.0);
        assert_eq!(section.height, 3000.0);
    }

    #[test]
    fn simulate_rejects_empty_section() {
        let err = simulate(
            SceneConfig::default(),
            Viewport::new(320, 240),
            0.0,
            3,
            None,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("section height"));
    }
}
