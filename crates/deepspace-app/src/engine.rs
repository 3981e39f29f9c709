//! Mounting the backdrop into a window.
//!
//! [`BackdropEngine`] owns the GPU context, the scene renderer, the
//! simulation and the input bridge. Teardown releases all of them in one
//! call and is safe to repeat.

use std::sync::Arc;

use deepspace_config::{ConfigError, SceneConfig};
use deepspace_input::InputBridge;
use deepspace_render::{
    Camera, FrameEncoder, RenderContext, RenderContextError, ShaderError, SurfaceError,
    SurfaceWrapper, init_render_context_blocking,
};
use deepspace_scene::{SceneRenderer, Simulation};
use tracing::{debug, error, info, warn};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::frame_clock::FrameClock;

/// Why the backdrop could not be mounted.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("invalid scene configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),
    #[error("scene shaders failed to build: {0}")]
    Shader(#[from] ShaderError),
}

/// What happened on one [`BackdropEngine::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface could not provide a texture; the simulation still advanced.
    Skipped,
    /// The engine has been torn down.
    Inactive,
}

/// GPU resources that teardown drops together.
struct Gpu {
    renderer: SceneRenderer,
    queue: Arc<wgpu::Queue>,
    context: RenderContext,
}

pub struct BackdropEngine {
    window: Arc<Window>,
    gpu: Option<Gpu>,
    simulation: Simulation,
    camera: Camera,
    surface: SurfaceWrapper,
    input: InputBridge,
    clock: FrameClock,
}

impl BackdropEngine {
    /// Mount the backdrop into `window`.
    ///
    /// A missing window is not an error: the call returns `Ok(None)` and the
    /// caller retries once the window exists.
    ///
    /// # Errors
    ///
    /// Returns [`MountError`] when the scene parameters are invalid, no GPU
    /// context can be created for the window, or the scene shaders fail to
    /// compile. Nothing is left mounted.
    pub fn mount(
        window: Option<Arc<Window>>,
        config: &SceneConfig,
        vsync: bool,
    ) -> Result<Option<Self>, MountError> {
        let Some(window) = window else {
            info!("No window to mount into yet, skipping");
            return Ok(None);
        };
        config.validate()?;

        let scale_factor = window.scale_factor();
        let context = init_render_context_blocking(window.clone(), vsync)?;
        let (width, height) = context.size();

        let simulation = Simulation::new(config);
        let renderer = SceneRenderer::new(
            &context.device,
            context.surface_format,
            (width, height),
            context.msaa_samples,
            &simulation,
            config.head_radius,
        )?;

        let mut camera = Camera::default();
        camera.set_aspect_ratio(width as f32, height as f32);

        let mut input = InputBridge::new((width, height));
        input.attach();

        info!(
            "Backdrop mounted: {}x{}, {} stars, {} clouds, {} shooting stars, planet {}",
            width,
            height,
            simulation.stars().len(),
            simulation.clouds().len(),
            simulation.shooting_stars().len(),
            if simulation.planet().is_some() { "on" } else { "off" }
        );

        Ok(Some(Self {
            window,
            gpu: Some(Gpu {
                renderer,
                queue: Arc::new(context.queue.clone()),
                context,
            }),
            simulation,
            camera,
            surface: SurfaceWrapper::new(width, height, scale_factor),
            input,
            clock: FrameClock::new(),
        }))
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn input(&self) -> &InputBridge {
        &self.input
    }

    /// Forward pointer and wheel events. Returns `true` if consumed.
    pub fn handle_input(&mut self, event: &WindowEvent) -> bool {
        self.input.handle_event(event, &mut self.simulation)
    }

    /// Match the surface, depth buffer and projection to a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(event) = self.surface.handle_resize(width, height) {
            self.apply_size(event.physical.width, event.physical.height);
            info!(
                "Backdrop resized to {}x{} (scale: {:.2})",
                event.physical.width, event.physical.height, event.scale_factor
            );
        }
    }

    pub fn scale_factor_changed(&mut self, scale_factor: f64) {
        let size = self.window.inner_size();
        if let Some(event) =
            self.surface
                .handle_scale_factor_changed(scale_factor, size.width, size.height)
        {
            self.apply_size(event.physical.width, event.physical.height);
            info!(
                "Backdrop rescaled to {}x{} (scale: {:.2})",
                event.physical.width, event.physical.height, scale_factor
            );
        }
    }

    fn apply_size(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        self.input.on_resized(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.context.resize(width, height);
            gpu.renderer.resize(&gpu.context.device, width, height);
        }
    }

    /// Advance the simulation by the measured delta and draw one frame.
    pub fn frame(&mut self) -> FrameOutcome {
        let Some(gpu) = &mut self.gpu else {
            return FrameOutcome::Inactive;
        };

        let dt = self.clock.tick();
        let sample = self.simulation.advance(dt);
        gpu.renderer
            .prepare(&gpu.queue, &self.simulation, &self.camera, sample);

        let surface_texture = match gpu.context.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                return FrameOutcome::Skipped;
            }
            Err(SurfaceError::Lost) => {
                let size = self.surface.physical_size();
                gpu.context.resize(size.width, size.height);
                debug!("Surface lost, reconfigured to {}x{}", size.width, size.height);
                return FrameOutcome::Skipped;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, skipping frame");
                return FrameOutcome::Skipped;
            }
        };

        let mut encoder =
            FrameEncoder::new(&gpu.context.device, gpu.queue.clone(), surface_texture);
        gpu.renderer.draw(&mut encoder);
        self.window.pre_present_notify();
        encoder.submit();
        FrameOutcome::Presented
    }

    /// Ask the window for the next redraw while mounted.
    pub fn request_redraw(&self) {
        if self.is_mounted() {
            self.window.request_redraw();
        }
    }

    /// Stop drawing, detach input and release every GPU resource.
    pub fn teardown(&mut self) {
        self.input.detach();
        if self.gpu.take().is_some() {
            info!("Backdrop torn down");
        }
    }
}

impl Drop for BackdropEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}
