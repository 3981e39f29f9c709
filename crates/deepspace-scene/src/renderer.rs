//! GPU side of the scene: the shared layer factory and the renderer that
//! draws every layer in one pass.

use deepspace_noise::NOISE_WGSL;
use deepspace_render::{
    BlendMode, BufferAllocator, Camera, DepthBuffer, DepthMode, FRAME_UNIFORM_WGSL, FrameBindings,
    FrameEncoder, FrameUniform, LayerPipelineDesc, MsaaTarget, RenderPassBuilder, SPACE_BLACK,
    ShaderError, ShaderLibrary, compose, create_layer_pipeline,
};

use crate::backdrop::renderer::BackdropRenderer;
use crate::clouds::renderer::CloudRenderer;
use crate::overlay::renderer::OverlayRenderer;
use crate::planet::renderer::PlanetRenderer;
use crate::shooting::renderer::ShootingStarRenderer;
use crate::simulation::{FrameSample, Simulation};
use crate::starfield::renderer::StarRenderer;

/// Device handles every layer renderer needs at construction.
pub struct LayerContext<'a> {
    pub device: &'a wgpu::Device,
    pub frame_layout: &'a wgpu::BindGroupLayout,
    pub surface_format: wgpu::TextureFormat,
    pub sample_count: u32,
}

/// A layer's shader body and fixed-function state.
pub struct LayerShader<'a> {
    pub label: &'a str,
    /// WGSL with `vs_main` and `fs_main`. The frame uniform and noise
    /// functions are prepended.
    pub source: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub blend: BlendMode,
    pub depth: DepthMode,
    pub cull_mode: Option<wgpu::Face>,
}

impl<'a> LayerContext<'a> {
    /// Compile `layer` into `shaders` and build its pipeline.
    pub fn pipeline(
        &self,
        shaders: &mut ShaderLibrary,
        layer: &LayerShader,
    ) -> Result<wgpu::RenderPipeline, ShaderError> {
        let source = compose(&[FRAME_UNIFORM_WGSL, NOISE_WGSL, layer.source]);
        let module = shaders.load_from_source(self.device, layer.label, &source)?;

        Ok(create_layer_pipeline(
            self.device,
            self.frame_layout,
            self.surface_format,
            &LayerPipelineDesc {
                label: layer.label,
                shader: &module,
                vertex_buffers: layer.vertex_buffers,
                blend: layer.blend,
                depth: layer.depth,
                cull_mode: layer.cull_mode,
                sample_count: self.sample_count,
            },
        ))
    }

    pub fn allocator(&self) -> BufferAllocator<'a> {
        BufferAllocator::new(self.device)
    }
}

/// Owns every GPU resource of the scene.
pub struct SceneRenderer {
    frame: FrameBindings,
    depth: DepthBuffer,
    /// Present only when drawing with more than one sample per pixel.
    msaa: Option<MsaaTarget>,
    shaders: ShaderLibrary,
    backdrop: BackdropRenderer,
    overlay: OverlayRenderer,
    clouds: CloudRenderer,
    stars: StarRenderer,
    shooting: ShootingStarRenderer,
    planet: Option<PlanetRenderer>,
}

impl SceneRenderer {
    /// Build every layer sized for `simulation`'s buffers, drawing with
    /// `sample_count` samples per pixel.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        sample_count: u32,
        simulation: &Simulation,
        head_radius: f32,
    ) -> Result<Self, ShaderError> {
        let frame = FrameBindings::new(device);
        let depth = DepthBuffer::new(device, size.0, size.1, sample_count);
        let msaa = (sample_count > 1)
            .then(|| MsaaTarget::new(device, surface_format, size.0, size.1, sample_count));
        let mut shaders = ShaderLibrary::new();
        let ctx = LayerContext {
            device,
            frame_layout: &frame.layout,
            surface_format,
            sample_count,
        };

        let backdrop = BackdropRenderer::new(&ctx, &mut shaders)?;
        let overlay = OverlayRenderer::new(&ctx, &mut shaders)?;
        let clouds = CloudRenderer::new(&ctx, &mut shaders, simulation.clouds().len())?;
        let stars = StarRenderer::new(&ctx, &mut shaders, simulation.stars().len())?;
        let pool = simulation.shooting_stars();
        let trail_length = pool.stars().first().map_or(1, |s| s.trail.len());
        let shooting =
            ShootingStarRenderer::new(&ctx, &mut shaders, pool.len(), trail_length, head_radius)?;
        let planet = match simulation.planet() {
            Some(_) => Some(PlanetRenderer::new(&ctx, &mut shaders)?),
            None => None,
        };

        log::info!(
            "Scene renderer ready: {} shaders, {}x{} depth, {}x MSAA",
            shaders.len(),
            depth.width(),
            depth.height(),
            sample_count
        );

        Ok(Self {
            frame,
            depth,
            msaa,
            shaders,
            backdrop,
            overlay,
            clouds,
            stars,
            shooting,
            planet,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, width, height);
        }
    }

    /// Upload the frame uniform and every instance buffer.
    pub fn prepare(
        &mut self,
        queue: &wgpu::Queue,
        simulation: &Simulation,
        camera: &Camera,
        sample: FrameSample,
    ) {
        let resolution = (self.depth.width(), self.depth.height());
        let uniform = FrameUniform::new(camera, resolution, sample.time, sample.sparkle);
        self.frame.update(queue, &uniform);

        self.clouds.update(queue, simulation.clouds());
        self.stars.update(queue, simulation.stars());
        self.shooting.update(queue, simulation.shooting_stars());
        if let (Some(renderer), Some(planet)) = (&mut self.planet, simulation.planet()) {
            renderer.update(queue, planet);
        }
    }

    /// Record the scene pass into `frame`.
    pub fn draw(&self, frame: &mut FrameEncoder) {
        let mut builder = RenderPassBuilder::new()
            .clear_color(SPACE_BLACK)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("deepspace-scene");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa_target(msaa.view.clone());
        }
        let mut pass = frame.begin_render_pass(&builder);
        pass.set_bind_group(0, self.frame.bind_group(), &[]);

        if let Some(planet) = &self.planet {
            planet.render_sphere(&mut pass);
        }
        self.backdrop.render(&mut pass);
        self.overlay.render(&mut pass);
        self.clouds.render(&mut pass);
        if let Some(planet) = &self.planet {
            planet.render_ring(&mut pass);
        }
        self.stars.render(&mut pass);
        self.shooting.render(&mut pass);
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn sample_count(&self) -> u32 {
        self.depth.sample_count()
    }
}
