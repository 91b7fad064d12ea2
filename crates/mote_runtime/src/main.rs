//! Mote Runtime
//!
//! Opens a window and runs one particle field behind it.
//!
//! Usage: `mote [settings.json]`

mod settings;

use anyhow::{Context, Result};
use mote_core::glam::Vec2;
use mote_core::time::FrameClock;
use mote_core::{DeterministicRng, Extent, MountHandle, Stage};
use mote_metrics::FrameTimer;
use mote_render::{window_attributes, PixelCanvas, Presenter};
use settings::Settings;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[cfg_attr(not(feature = "metrics"), allow(dead_code))]
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    stage: Stage<PixelCanvas>,
    mount: Option<MountHandle>,
    clock: FrameClock,
    frame_timer: FrameTimer,
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    last_report: Instant,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            window: None,
            presenter: None,
            stage: Stage::new(Extent::ZERO),
            mount: None,
            clock: FrameClock::new(),
            frame_timer: FrameTimer::new(120),
            last_report: Instant::now(),
        }
    }

    /// Replace any mounted field with a freshly seeded one.
    fn mount_field(&mut self) {
        self.unmount_field();

        // Without a presenter there is nothing to draw into.
        let canvas = if self.presenter.is_some() {
            PixelCanvas::new()
        } else {
            PixelCanvas::detached()
        };
        let canvas = canvas.with_scale(self.scale_factor() as f32);
        let rng = DeterministicRng::from_entropy();
        let seed = rng.seed();
        self.mount = self
            .stage
            .attach(self.settings.field.clone(), canvas, rng);

        if let Some(handle) = self.mount {
            tracing::info!(
                %handle,
                seed,
                particles = self.settings.field.particle_count,
                "particle field running"
            );
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |window| window.scale_factor())
    }

    fn unmount_field(&mut self) {
        if let Some(handle) = self.mount.take() {
            self.stage.detach(handle);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick(Instant::now());
        self.frame_timer.record_interval(dt);
        self.frame_timer.begin();

        self.stage.run_frame(dt);

        if let (Some(presenter), Some(handle)) = (self.presenter.as_mut(), self.mount) {
            if let Some(canvas) = self.stage.surface(handle) {
                if let Err(err) = presenter.present(canvas) {
                    tracing::error!(%err, "presenter failed, exiting");
                    event_loop.exit();
                    return;
                }
            }
        }

        self.frame_timer.end();

        mote_metrics::metrics! {
            if self.last_report.elapsed() >= REPORT_INTERVAL {
                self.last_report = Instant::now();
                let (min_ms, max_ms) = self.frame_timer.frame_time_range_ms();
                tracing::info!(
                    fps = format_args!("{:.1}", self.frame_timer.fps()),
                    frame_ms = format_args!("{:.2}", self.frame_timer.frame_time_ms()),
                    min_ms = format_args!("{:.2}", min_ms),
                    max_ms = format_args!("{:.2}", max_ms),
                    frames = self.clock.frame_count(),
                    "frame stats"
                );
            }
        }

        if self.stage.pending_frames() > 0 {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = match &self.window {
            Some(window) => window.clone(),
            None => {
                let attrs =
                    window_attributes(&self.settings.window, &self.settings.field.class_name);
                match event_loop.create_window(attrs) {
                    Ok(window) => {
                        let window = Arc::new(window);
                        self.window = Some(window.clone());
                        window
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to create window");
                        event_loop.exit();
                        return;
                    }
                }
            }
        };

        if self.presenter.is_none() {
            let background = self.settings.window.background;
            match pollster::block_on(Presenter::new(window.clone(), background)) {
                Ok(presenter) => self.presenter = Some(presenter),
                Err(err) => tracing::warn!(%err, "no presenter, particles will not be drawn"),
            }
        }

        let viewport = logical_extent(window.inner_size(), window.scale_factor());
        self.stage.dispatch_resize(viewport);
        self.mount_field();
        window.request_redraw();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount_field();
        self.presenter = None;
        self.clock.reset();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount_field();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
                self.stage
                    .dispatch_resize(logical_extent(size, self.scale_factor()));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                // The canvas resolution follows the new ratio; a `Resized` follows.
                if self.mount.is_some() {
                    self.mount_field();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.stage
                    .dispatch_pointer(logical_point(position, self.scale_factor()));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount_field();
        tracing::info!(frames = self.clock.frame_count(), "shutting down");
    }
}

/// The field works in logical pixels so radii and the interaction radius
/// keep their size on high-density displays.
fn logical_extent(size: PhysicalSize<u32>, scale_factor: f64) -> Extent {
    let size = size.to_logical::<f32>(scale_factor);
    Extent::new(size.width, size.height)
}

fn logical_point(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let position = position.to_logical::<f32>(scale_factor);
    Vec2::new(position.x, position.y)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };

    tracing::info!("Mote v{}", mote_core::VERSION);

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app).context("running event loop")?;

    Ok(())
}
