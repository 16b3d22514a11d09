//! Lester viewer
//!
//! Opens a window showing the demo scene (or a scene file), or renders an
//! animated sequence of PNG frames headlessly.
//!
//! Usage: lester [--config FILE] [--scene FILE] [--headless FRAMES --out DIR]

use std::path::PathBuf;

use lester::config::{load_config, RenderConfig};
use lester::rasterizer::{self as rast, Framebuffer, Renderer};
use lester::scene::{demo_scene, load_scene, DemoAnimation, Scene};
use lester::VERSION;
use macroquad::prelude::*;

struct Args {
    config: Option<PathBuf>,
    scene: Option<PathBuf>,
    headless: Option<usize>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        scene: None,
        headless: None,
        out: None,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().ok_or_else(|| format!("{} needs a value", flag));
        match arg.as_str() {
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--scene" => args.scene = Some(PathBuf::from(value("--scene")?)),
            "--out" => args.out = Some(PathBuf::from(value("--out")?)),
            "--headless" => {
                let frames = value("--headless")?;
                let frames = frames
                    .parse()
                    .map_err(|_| format!("--headless expects a frame count, got {}", frames))?;
                args.headless = Some(frames);
            }
            "--help" | "-h" => {
                return Err("usage: lester [--config FILE] [--scene FILE] [--headless FRAMES --out DIR]".to_string())
            }
            other => return Err(format!("unknown argument {}", other)),
        }
    }
    Ok(args)
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

fn main() {
    init_logging();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RenderConfig::default(),
    };

    // Only the built-in demo animates
    let (scene, animate) = match &args.scene {
        Some(path) => (load_scene(path)?, false),
        None => (demo_scene(), true),
    };

    let renderer = Renderer::new(config.clone())?;

    match args.headless {
        Some(frames) => {
            let out = args.out.unwrap_or_else(|| PathBuf::from("frames"));
            render_headless(renderer, scene, animate, frames, &out)
        }
        None => {
            if args.out.is_some() {
                log::warn!("--out has no effect without --headless");
            }
            log::info!("Lester v{} {}x{}", VERSION, config.width, config.height);
            let conf = window_conf(&config);
            macroquad::Window::from_config(conf, viewer(renderer, scene, animate));
            Ok(())
        }
    }
}

fn window_conf(config: &RenderConfig) -> Conf {
    Conf {
        window_title: format!("Lester v{}", VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

async fn viewer(mut renderer: Renderer, mut scene: Scene, animate: bool) {
    let (width, height) = (renderer.config().width, renderer.config().height);
    let mut fb = Framebuffer::new(width, height);
    let mut anim = DemoAnimation::default();

    let texture = Texture2D::from_rgba8(width as u16, height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        fb.clear(rast::Color::BLACK);
        let stats = renderer.render(scene.triangles(), &mut fb);
        if animate {
            anim.advance(&mut scene);
        }
        texture.update_from_bytes(width as u32, height as u32, &fb.pixels);

        // Letterbox to keep square pixels
        let scale = (screen_width() / width as f32).min(screen_height() / height as f32);
        let (draw_w, draw_h) = (width as f32 * scale, height as f32 * scale);
        let draw_x = (screen_width() - draw_w) * 0.5;
        let draw_y = (screen_height() - draw_h) * 0.5;

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_w, draw_h)),
                ..Default::default()
            },
        );

        draw_text(
            &format!(
                "{} fps | {} tris | {} px",
                get_fps(),
                stats.rasterized,
                stats.pixels_written
            ),
            draw_x + 8.0,
            draw_y + 20.0,
            16.0,
            YELLOW,
        );

        next_frame().await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn render_headless(
    mut renderer: Renderer,
    mut scene: Scene,
    animate: bool,
    frames: usize,
    out: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use indicatif::{ProgressBar, ProgressStyle};

    std::fs::create_dir_all(out)?;
    let (width, height) = (renderer.config().width, renderer.config().height);
    let mut fb = Framebuffer::new(width, height);
    let mut anim = DemoAnimation::default();

    let bar = ProgressBar::new(frames as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut total_pixels = 0;
    for frame in 0..frames {
        fb.clear(rast::Color::BLACK);
        let stats = renderer.render(scene.triangles(), &mut fb);
        if animate {
            anim.advance(&mut scene);
        }
        fb.save_png(out.join(format!("frame_{:04}.png", frame)))?;

        total_pixels += stats.pixels_written;
        bar.set_message(format!("{} px", stats.pixels_written));
        bar.inc(1);
    }
    bar.finish();

    log::info!(
        "Rendered {} frames to {} ({} pixels written)",
        frames,
        out.display(),
        total_pixels
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn render_headless(
    _renderer: Renderer,
    _scene: Scene,
    _animate: bool,
    _frames: usize,
    _out: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("headless rendering is not available on wasm".into())
}
