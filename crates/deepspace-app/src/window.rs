//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it creates the
//! window on resume, mounts the backdrop, routes input and drives one frame
//! per redraw. A failed mount leaves the window open and empty.

use std::sync::Arc;

use deepspace_config::Config;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::engine::BackdropEngine;

/// Errors that stop the host before or during the event loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Host state: the window and the backdrop mounted into it.
pub struct AppState {
    pub config: Config,
    pub window: Option<Arc<Window>>,
    pub engine: Option<BackdropEngine>,
    /// Set once a mount has been attempted, so failures are not retried
    /// every resume.
    mount_attempted: bool,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            window: None,
            engine: None,
            mount_attempted: false,
        }
    }

    fn mount(&mut self) {
        if self.mount_attempted {
            return;
        }
        match BackdropEngine::mount(
            self.window.clone(),
            &self.config.scene,
            self.config.window.vsync,
        ) {
            Ok(Some(engine)) => {
                engine.request_redraw();
                self.engine = Some(engine);
                self.mount_attempted = true;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Backdrop unavailable, continuing without it: {e}");
                self.mount_attempted = true;
            }
        }
    }

    /// Tear the backdrop down. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.teardown();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match event_loop.create_window(window_attributes_from_config(&self.config)) {
                Ok(window) => {
                    let size = window.inner_size();
                    info!(
                        "Window created: {}x{} (scale: {:.2})",
                        size.width,
                        size.height,
                        window.scale_factor()
                    );
                    self.window = Some(Arc::new(window));
                }
                Err(e) => warn!("Window creation failed: {e}"),
            }
        }
        self.mount();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(engine) = &mut self.engine {
                    engine.scale_factor_changed(scale_factor);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(engine) = &mut self.engine {
                    engine.frame();
                    engine.request_redraw();
                }
            }
            other => {
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(&other);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Creates an event loop and runs the backdrop with the given config.
///
/// Blocks until the window is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
