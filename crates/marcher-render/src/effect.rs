//! Per-frame orchestration of the raymarching pass

use crate::config::EffectConfig;
use crate::device;
use crate::error::Result;
use crate::pass::FullScreenPass;
use marcher_scene::{CameraState, DirectionalLight, FrameUniforms, SharedShapeRegistry};
use std::sync::Arc;

/// Why a frame was copied instead of raymarched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No evaluator program is bound
    NoEvaluator,
    /// The camera cannot produce a frustum
    DegenerateCamera,
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Raymarched { shape_count: u32 },
    Copied(FallbackReason),
}

/// Image effect that raymarches registered shapes over a source image
///
/// Call [`render_image`](Self::render_image) once per frame after opaque
/// geometry. Scene objects attach to [`registry`](Self::registry).
pub struct RaymarchEffect {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    registry: SharedShapeRegistry,
    pass: FullScreenPass,
    config: EffectConfig,
    light: Option<DirectionalLight>,
}

impl RaymarchEffect {
    /// Create an effect with its own registry and default settings
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self::with_registry(
            device,
            queue,
            target_format,
            SharedShapeRegistry::new(),
            EffectConfig::default(),
        )
    }

    /// Create an effect reading from an existing registry
    pub fn with_registry(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        target_format: wgpu::TextureFormat,
        registry: SharedShapeRegistry,
        config: EffectConfig,
    ) -> Self {
        let pass = FullScreenPass::new(device.clone(), target_format, &config);
        Self {
            device,
            queue,
            registry,
            pass,
            config,
            light: None,
        }
    }

    /// Registry scene objects attach to
    pub fn registry(&self) -> &SharedShapeRegistry {
        &self.registry
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Bind or unbind the directional light
    pub fn set_light(&mut self, light: Option<DirectionalLight>) {
        self.light = light;
    }

    pub fn light(&self) -> Option<&DirectionalLight> {
        self.light.as_ref()
    }

    /// Compile and bind an evaluator fragment stage
    ///
    /// A rejected evaluator leaves the effect copying frames through.
    pub fn set_evaluator(&mut self, fragment_source: &str) -> Result<()> {
        match self.pass.set_program(fragment_source) {
            Ok(()) => {
                tracing::info!("Evaluator bound");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{}; frames will be copied through", e);
                Err(e)
            }
        }
    }

    /// Unbind the evaluator
    pub fn clear_evaluator(&mut self) {
        self.pass.clear_program();
    }

    pub fn has_evaluator(&self) -> bool {
        self.pass.has_program()
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.pass.target_format()
    }

    /// Pack this frame's uniforms from the registry, camera and light
    pub fn pack_frame(&self, camera: &CameraState) -> FrameUniforms {
        FrameUniforms::pack_with_fallback(
            &self.registry.snapshot(),
            camera,
            self.light.as_ref(),
            self.config.fallback_light(),
        )
    }

    /// Frame entry point: raymarch `source` into `destination`
    ///
    /// Without an evaluator, or with a degenerate camera, the source is
    /// copied unchanged. Uniforms are recorded into `encoder` ahead of the
    /// draw, so one encoder may carry several frames (for example a main
    /// and a preview camera) before it is submitted.
    pub fn render_image(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::Texture,
        destination: &wgpu::Texture,
        camera: &CameraState,
    ) -> Result<FrameOutcome> {
        if !self.pass.has_program() {
            FullScreenPass::copy(encoder, source, destination)?;
            return Ok(FrameOutcome::Copied(FallbackReason::NoEvaluator));
        }

        if camera.is_degenerate() {
            tracing::warn!(
                "Degenerate camera (fov {}, aspect {}), copying frame",
                camera.fov_degrees,
                camera.aspect
            );
            FullScreenPass::copy(encoder, source, destination)?;
            return Ok(FrameOutcome::Copied(FallbackReason::DegenerateCamera));
        }

        let frame = self.pack_frame(camera);
        self.pass.upload(encoder, &frame);
        self.pass.draw(encoder, source, destination)?;

        Ok(FrameOutcome::Raymarched {
            shape_count: frame.shape_count(),
        })
    }

    /// Run one frame over a CPU image and read the result back
    ///
    /// The target format must be `Rgba8Unorm` or `Rgba8UnormSrgb`.
    pub fn render_to_image(
        &self,
        source: &image::RgbaImage,
        camera: &CameraState,
    ) -> Result<(image::RgbaImage, FrameOutcome)> {
        let format = self.pass.target_format();

        let source_texture = device::upload_image(
            &self.device,
            &self.queue,
            source,
            format,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_SRC,
            "Source Texture",
        )?;

        let destination_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Destination Texture"),
            size: source_texture.size(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let outcome = self.render_image(&mut encoder, &source_texture, &destination_texture, camera)?;
        self.queue.submit(std::iter::once(encoder.finish()));

        let image = device::read_image(&self.device, &self.queue, &destination_texture)?;
        Ok((image, outcome))
    }
}
