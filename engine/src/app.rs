use std::error::Error;
use std::time::{Duration, Instant};

use log::{error, warn};
use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::graphics::{CpuRenderer, Renderer2d};
use crate::input::InputFrame;
use crate::surface::FrameSize;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Fixed logical resolution the app draws at; `pixels` scales it to the
    /// window.
    pub logical_size: FrameSize,
    /// Initial window size as a multiple of the logical resolution.
    pub window_scale: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Exit,
}

/// A windowed application: per-frame update from collected input, then a full
/// redraw into the logical frame buffer.
pub trait App {
    fn update(&mut self, input: &InputFrame, dt: Duration) -> AppFlow;
    fn render(&mut self, gfx: &mut dyn Renderer2d);
}

/// Open a window and drive `app` until it exits or the window closes.
///
/// Everything runs on the event-loop thread: keyboard events fill the current
/// [`InputFrame`], each redraw applies it, updates, and repaints.
pub fn run_app<A: App + 'static>(config: AppConfig, mut app: A) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let scale = config.window_scale.max(1);
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(
            config.logical_size.width * scale,
            config.logical_size.height * scale,
        ))
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels = PixelsBuilder::new(
        config.logical_size.width,
        config.logical_size.height,
        surface_texture,
    )
    .enable_vsync(config.vsync)
    .build()?;

    let logical_size = config.logical_size;
    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if size.width > 0 && size.height > 0 {
                        if let Err(err) = pixels.resize_surface(size.width, size.height) {
                            warn!("surface resize failed: {err}");
                        }
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match state {
                    ElementState::Pressed => input.on_key_pressed(*key),
                    ElementState::Released => input.on_key_released(*key),
                },
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                if app.update(&input, dt) == AppFlow::Exit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                let mut gfx = CpuRenderer::new(pixels.frame_mut(), logical_size);
                app.render(&mut gfx);

                if let Err(err) = pixels.render() {
                    error!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                input.end_frame();
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
