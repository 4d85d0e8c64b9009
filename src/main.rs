//! Bonnie Drive: chase-camera driving demo on a software rasterizer
//!
//! A box-built car on an endless grid, drawn with a hand-rolled
//! projection pipeline and painter's-algorithm polygon sorting:
//! - Arcade kinematics (throttle, brake, coast, speed-scaled steering)
//! - Rigid or smoothed look-at chase camera
//! - Window rendering via macroquad, or headless PNG snapshots

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod vehicle;
mod camera;
mod scene;
mod config;
mod sim;
mod input;
mod screen;
mod app;

use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;

use app::AppState;
use camera::CameraMode;
use config::{resolve_config, save_config, GameConfig};
use rasterizer::Framebuffer;
use screen::Screen;
use sim::Simulation;
use vehicle::ControlFlags;

/// Fixed step used when simulating frames for a snapshot
const SNAPSHOT_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Parser)]
#[command(name = "bonnie-drive", version, about = "Chase-camera driving demo")]
struct Args {
    /// RON tuning file (defaults to assets/drive.ron when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera policy, overrides the config file
    #[arg(long, value_enum)]
    camera: Option<CameraMode>,

    /// Render one frame to this PNG without opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the effective tuning to this RON file and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Frames to simulate (throttle held) before the snapshot
    #[arg(long, default_value_t = 120)]
    frames: u32,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn window_conf(args: &Args) -> Conf {
    Conf {
        window_title: format!("Bonnie Drive v{}", VERSION),
        window_width: args.width as i32,
        window_height: args.height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = resolve_config(args.config.as_deref()).context("failed to load config")?;
    if let Some(mode) = args.camera {
        config.camera.mode = mode;
    }

    if let Some(path) = &args.dump_config {
        save_config(&config, path).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    if let Some(path) = &args.snapshot {
        return render_snapshot(config, &args, path);
    }

    tracing::info!("=== Bonnie Drive v{} ===", VERSION);
    tracing::info!("Camera: {}", config.camera.mode.label());

    let app = AppState::new(Simulation::new(config));
    macroquad::Window::from_config(window_conf(&args), run(app));
    Ok(())
}

/// Simulate with the throttle held, then paint one frame into a PNG
fn render_snapshot(config: GameConfig, args: &Args, path: &Path) -> anyhow::Result<()> {
    let mut sim = Simulation::new(config);
    let controls = ControlFlags { forward: true, ..Default::default() };
    for _ in 0..args.frames {
        sim.step(controls, SNAPSHOT_DT);
    }

    let mut fb = Framebuffer::new(args.width as usize, args.height as usize);
    let stats = sim.render(&mut fb);
    fb.save_png(path)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    tracing::info!(
        "Wrote {} ({}x{}, {} faces, {} grid lines, speed {:.1})",
        path.display(),
        fb.width,
        fb.height,
        stats.faces_drawn,
        stats.lines_drawn,
        sim.vehicle.speed
    );
    Ok(())
}

async fn run(mut app: AppState) {
    loop {
        for action in input::pressed_actions() {
            app.handle_action(action);
        }
        if app.quit {
            break;
        }

        let now = get_time();
        app.sim.frame(now, input::read_controls());

        clear_background(BLACK);
        let stats = app.sim.render(&mut Screen);
        app.record_frame(now, stats);
        app.draw_hud();

        next_frame().await;
    }
}
