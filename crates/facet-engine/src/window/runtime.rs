use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::gfx::{Graphics, GraphicsConfig, WgpuBackend};
use crate::input::{translate_window_event, InputFrame, InputState};
use crate::time::FrameClock;

/// Window and device configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub graphics: GraphicsConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "facet".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            gpu: GpuInit::default(),
            graphics: GraphicsConfig::default(),
        }
    }
}

/// Requests an app can make of the runtime during a frame.
///
/// Requests are applied after the frame callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit event loop")?;
        let mut state = AppState {
            config,
            app,
            window: None,
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct WindowEntry {
    window: Arc<Window>,
    gfx: Graphics,
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
}

struct AppState<A: App> {
    config: RuntimeConfig,
    app: A,
    window: Option<WindowEntry>,
    /// First fatal error, reported when the loop returns.
    failure: Option<anyhow::Error>,
}

impl<A: App> AppState<A> {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), self.config.gpu.clone()))
            .context("GPU initialization failed")?;
        let backend = WgpuBackend::new(gpu);
        let mut gfx = Graphics::new(Box::new(backend), self.config.graphics.clone());

        self.app
            .on_start(&mut gfx)
            .context("application failed to start")?;
        log::info!("window `{}` ready", self.config.title);

        Ok(WindowEntry {
            window,
            gfx,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let time = entry.clock.tick();
        let mut runtime = RuntimeCtx::default();
        let control = {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: entry.window.id(),
                    window: &entry.window,
                },
                gfx: &mut entry.gfx,
                input: &entry.input_state,
                input_frame: &entry.input_frame,
                time,
                runtime: &mut runtime,
            };
            self.app.on_frame(&mut ctx)
        };
        entry.input_frame.clear();

        if control == AppControl::Exit || runtime.exit {
            event_loop.exit();
        }
    }
}

fn resize(entry: &mut WindowEntry, size: PhysicalSize<u32>) {
    entry.gfx.resize(size.width, size.height);
    entry.window.request_redraw();
}

impl<A: App> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.window.as_mut() {
            entry.clock.restart_step();
            return;
        }
        match self.create_window(event_loop) {
            Ok(entry) => {
                entry.window.request_redraw();
                self.window = Some(entry);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // continuous redraw: every drawable animates
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };
        if entry.window.id() != window_id {
            return;
        }

        if let Some(ev) = translate_window_event(&entry.window, &event) {
            entry.input_state.apply_event(&mut entry.input_frame, ev);
        }
        if self.app.on_window_event(&event) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.window = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => resize(entry, size),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.window.inner_size();
                resize(entry, size);
            }
            WindowEvent::Occluded(false) => entry.clock.restart_step(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
