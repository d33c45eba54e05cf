mod audio;
mod cli;
mod render;
mod wav;

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use guitar_core::{
    Insets, Instrument, SessionClock, TouchId, TouchOutcome, Viewport,
};

use crate::audio::CpalSink;
use crate::cli::Args;
use crate::render::GpuState;

fn viewport_for(window: &Window, args: &Args) -> Viewport {
    let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
    Viewport::new(
        logical.width,
        logical.height,
        Insets::reserved(args.safe_top, args.safe_bottom),
    )
}

fn report(outcome: &TouchOutcome) {
    if let TouchOutcome::Silent { hit, error } = outcome {
        log::warn!("string {} vibrated without sound: {}", hit.index, error);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let sink = CpalSink::open(&args.samples).context("failed to open sample directory")?;
    let mut instrument = Instrument::new(args.instrument_config(), sink);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window = WindowBuilder::new()
        .with_title("Camera Guitar")
        .with_inner_size(LogicalSize::new(args.width, args.height))
        .build(&event_loop)
        .context("failed to create window")?;

    let mut state = pollster::block_on(GpuState::new(&window)).context("failed to set up GPU")?;

    let clock = SessionClock::start();
    instrument.set_viewport(viewport_for(&window, &args));
    instrument.view_appeared(clock.now_sec());

    let mut cursor = Vec2::ZERO;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                state.resize(size);
                instrument.set_viewport(viewport_for(state.window, &args));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                instrument.set_viewport(viewport_for(state.window, &args));
            }
            WindowEvent::CloseRequested => {
                instrument.view_disappeared();
                instrument.playback_mut().stop();
                elwt.exit();
            }
            WindowEvent::Occluded(true) => {
                instrument.view_disappeared();
            }
            WindowEvent::Occluded(false) => {
                instrument.view_appeared(clock.now_sec());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let p = position.to_logical::<f32>(state.window.scale_factor());
                cursor = Vec2::new(p.x, p.y);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => {
                    let outcome = instrument.touch_down(TouchId::MOUSE, cursor, clock.now_sec());
                    report(&outcome);
                }
                ElementState::Released => instrument.touch_up(TouchId::MOUSE),
            },
            WindowEvent::Touch(touch) => {
                let id = TouchId(touch.id);
                match touch.phase {
                    TouchPhase::Started => {
                        let p = touch.location.to_logical::<f32>(state.window.scale_factor());
                        let outcome =
                            instrument.touch_down(id, Vec2::new(p.x, p.y), clock.now_sec());
                        report(&outcome);
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => instrument.touch_up(id),
                    TouchPhase::Moved => {}
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            instrument.poll_playback();
            let lines = instrument.frame(clock.now_sec());
            match state.render(&lines) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::debug!("frame skipped: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
