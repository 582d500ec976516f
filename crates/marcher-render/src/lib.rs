//! Marcher Render - WGPU full-screen raymarching pass
//!
//! This crate drives an evaluator fragment program over a full-screen quad.
//! Each quad vertex carries the index of a frustum corner in its z channel,
//! so the vertex stage can rebuild the view ray without per-vertex ray data.
//!
//! ## Features
//!
//! - Per-frame uniform packing from a shared shape registry
//! - Corner-tagged full-screen quad under orthographic projection
//! - Identity copy when no evaluator is bound
//! - Headless rendering to image buffers
//!
//! ## Example
//!
//! ```rust,ignore
//! use marcher_render::{RaymarchEffect, init_headless, shader};
//!
//! let (device, queue) = pollster::block_on(init_headless())?;
//! let mut effect = RaymarchEffect::new(device, queue, wgpu::TextureFormat::Rgba8UnormSrgb);
//! effect.set_evaluator(shader::PASSTHROUGH_FRAGMENT)?;
//! let (image, outcome) = effect.render_to_image(&source, &camera.state())?;
//! ```

pub mod camera;
pub mod config;
pub mod device;
pub mod effect;
pub mod pass;
pub mod quad;
pub mod shader;

mod error;

pub use marcher_scene as scene;
// Re-export wgpu for users who need texture formats, etc.
pub use wgpu;

pub use camera::Camera;
pub use config::EffectConfig;
pub use device::init_headless;
pub use effect::{FallbackReason, FrameOutcome, RaymarchEffect};
pub use error::{RenderError, Result};
pub use pass::FullScreenPass;
pub use quad::{FULL_SCREEN_QUAD, QUAD_INDICES, QuadVertex};
pub use shader::build_program;
