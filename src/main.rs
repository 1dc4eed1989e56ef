mod application;

use application::Application;
use glossy::{config::ViewerConfig, version::parse_version_string};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use glium::{
    glutin::{
        dpi::PhysicalSize,
        event::{Event, WindowEvent},
        event_loop::{ControlFlow, EventLoop},
        window::WindowBuilder,
        ContextBuilder,
    },
    Display, Surface,
};
use log::{error, info, warn};

/// Shows a Phong-shaded cube.
#[derive(Parser)]
#[clap(author, version)]
struct Arguments {
    /// Specifies the viewer configuration path.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let arguments = Arguments::parse();
    let config = match &arguments.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let (event_loop, display) = initialize_window(&config)?;
    let mut app = Application::new(&display, config)?;

    info!("Starting event loop");
    let mut last_at = Instant::now();
    event_loop.run(move |ev, _, control_flow| {
        match ev {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
                return;
            }
            Event::MainEventsCleared => (),
            _ => return,
        }

        // delta time 計算
        let now = Instant::now();
        app.tick(now - last_at);
        last_at = now;

        let mut target = display.draw();
        target.clear_color_and_depth((0.0, 0.0, 0.0, 1.0), 1.0);
        let drawn = app.draw(&mut target);
        let finished = target.finish();

        if let Err(e) = drawn {
            error!("Failed to draw the frame: {}", e);
            *control_flow = ControlFlow::Exit;
            return;
        }
        if let Err(e) = finished {
            error!("Failed to finish drawing display: {}", e);
            *control_flow = ControlFlow::Exit;
            return;
        }

        *control_flow = ControlFlow::WaitUntil(now + Duration::from_micros(16_666));
    });
}

/// ウィンドウを生成する。
fn initialize_window(config: &ViewerConfig) -> Result<(EventLoop<()>, Display)> {
    let event_loop = EventLoop::new();
    let wb = WindowBuilder::new()
        .with_title(&config.window.title)
        .with_resizable(false)
        .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));
    let cb = ContextBuilder::new().with_depth_buffer(24);
    let display = Display::new(wb, cb, &event_loop)?;
    let version_string = display.get_opengl_version_string();
    info!("Supported OpenGL version: {}", version_string);

    // glium parses the same string on its own
    match parse_version_string(version_string) {
        Ok(parsed) if parsed != *display.get_opengl_version() => warn!(
            "Version string reads {:?} but the context reports {:?}",
            parsed,
            display.get_opengl_version()
        ),
        Ok(_) => (),
        Err(e) => warn!("{}", e),
    }

    Ok((event_loop, display))
}
