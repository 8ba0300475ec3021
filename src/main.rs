//! SGL demo: animated flower pattern rendered by the software rasterizer
//!
//! Usage: `sgl-demo [settings.ron]`
//!
//! Keys:
//! - Escape: quit
//! - S: save the current frame as PNG

use macroquad::prelude::*;
use sgl::demo::{load_settings, DemoSettings, FlowerScene};
use sgl::rasterizer::{Framebuffer, Rasterizer};
use sgl::VERSION;

fn window_conf() -> Conf {
    // Window size has to be known before the settings file is read
    let settings = startup_settings();
    Conf {
        window_title: format!("SGL Demo v{}", VERSION),
        window_width: settings.window_width as i32,
        window_height: settings.window_height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Settings from the path given on the command line, or the defaults
fn startup_settings() -> DemoSettings {
    match std::env::args().nth(1) {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings {}: {}, using defaults", path, e);
                DemoSettings::default()
            }
        },
        None => DemoSettings::default(),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let settings = startup_settings();
    let frame_time = 1.0 / settings.frames_per_second.max(1) as f64;
    let background = settings.background.to_rgba8();
    let output_path = settings.output_path.clone();

    let mut raster = Rasterizer::new(Framebuffer::new(settings.window_width, settings.window_height));
    let mut scene = FlowerScene::new(settings);
    let mut last_tick = get_time() - frame_time;

    println!("=== SGL Demo v{} ===", VERSION);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        // Reshape: reallocate the framebuffer to the window size
        let (w, h) = (screen_width() as usize, screen_height() as usize);
        if w > 0 && h > 0 && (w, h) != (raster.target().width, raster.target().height) {
            raster.target_mut().resize(w, h);
        }

        // Advance the animation at a fixed rate
        let now = get_time();
        if now - last_tick >= frame_time {
            last_tick = now;
            raster.target_mut().clear(background);
            if let Err(e) = scene.draw(&mut raster) {
                eprintln!("Frame {} failed: {}", scene.frame(), e);
            }
        }

        // Scene is y-up; the screen is y-down
        let shown = raster.target().flip_vertical();

        if is_key_pressed(KeyCode::S) {
            match shown.save_png(&output_path) {
                Ok(()) => println!("Saved {}", output_path.display()),
                Err(e) => eprintln!("Failed to save {}: {}", output_path.display(), e),
            }
        }

        clear_background(BLACK);
        let texture = Texture2D::from_rgba8(shown.width as u16, shown.height as u16, &shown.pixels);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
