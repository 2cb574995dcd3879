use glam::Vec2;
use glow::HasContext;
use sdl2::event::{Event, WindowEvent};
use sdl2::mouse::MouseButton;

use crate::abs::*;
use crate::demo::Demo;
use crate::render::Renderer;
use crate::settings::Settings;

mod abs;
mod camera;
mod demo;
mod logging;
mod render;
mod scene;
mod settings;

macro_rules! shader_program {
    ($gl:expr, $name:literal) => {
        $crate::abs::ShaderProgram::from_sources(
            &$gl,
            include_str!(concat!("shaders/", $name, "/shader.vert")),
            include_str!(concat!("shaders/", $name, "/shader.frag")),
        )
    };
}

fn load_settings() -> Result<(Settings, Option<std::path::PathBuf>), String> {
    let Some(path) = Settings::default_path() else {
        return Ok((Settings::default(), None));
    };
    match Settings::load_from(&path)? {
        Some(settings) => Ok((settings, Some(path))),
        None => Ok((Settings::default(), None)),
    }
}

fn main() {
    let (settings, source) = match load_settings() {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Err(log_err) = logging::init(log::LevelFilter::Info) {
                eprintln!("Failed to initialise logging: {log_err}");
                eprintln!("{e}");
            } else {
                log::error!("{e}");
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(settings.level_filter().unwrap_or(log::LevelFilter::Info)) {
        eprintln!("Failed to initialise logging: {e}");
    }

    match source {
        Some(path) => log::info!("Loaded settings from {}", path.display()),
        None => log::info!("No settings file found, using defaults"),
    }

    if let Err(e) = run(settings) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(settings: Settings) -> Result<(), String> {
    let mut app = App::new(
        "Pyramids",
        settings.width,
        settings.height,
        settings.fullscreen,
        settings.vsync,
    )?;

    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
    }

    let program = match settings.shader_paths() {
        Some((vert, frag)) => {
            log::info!("Loading shaders from {} and {}", vert.display(), frag.display());
            ShaderProgram::from_files(&app.gl, vert, frag)?
        }
        None => shader_program!(app.gl, "pyramid")?,
    };

    let mut renderer = Renderer::new(&app.gl, program);
    let pyramid = renderer.add_mesh(&scene::PYRAMID_VERTICES, &scene::PYRAMID_INDICES)?;

    let mut demo = Demo::new(&settings, pyramid);
    log::info!(
        "Drawing {} instances of a {}-index mesh ({:?} variant)",
        demo.scene.instance_count(),
        renderer.index_count(),
        demo.variant()
    );

    let [r, g, b, a] = settings.clear_color;
    let mut frames: u64 = 0;
    let started = std::time::Instant::now();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    unsafe {
                        app.gl.viewport(0, 0, width as i32, height as i32);
                    }
                    log::debug!("Drawable resized to {width}x{height}");
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    ..
                } => demo.drag.press(),
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    ..
                } => demo.drag.release(),
                _ => {}
            }
        }

        let mouse = app.event_pump.mouse_state();
        demo.update(Vec2::new(mouse.x() as f32, mouse.y() as f32));

        unsafe {
            app.gl.clear_color(r, g, b, a);
            app.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let view = demo.view();
        let projection = demo.projection(app.aspect_ratio());
        renderer.draw(demo.draw_commands(), &view, &projection);

        app.swap();
        frames += 1;
    }

    let elapsed = started.elapsed().as_secs_f64();
    log::info!(
        "Rendered {frames} frames in {elapsed:.1}s ({:.1} fps)",
        frames as f64 / elapsed.max(f64::EPSILON)
    );
    Ok(())
}
