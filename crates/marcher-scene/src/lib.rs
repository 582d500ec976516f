//! Marcher Scene - GPU-free core of the full-screen raymarching pass
//!
//! This crate owns the parts of the pass that need no device: the shape
//! registry, the frustum corner solver and the per-frame uniform packer.
//!
//! ## Key Types
//!
//! - [`SharedShapeRegistry`] - ordered set of live shapes, in compositing order
//! - [`ShapeNode`] - scene object that attaches itself to a registry
//! - [`FrustumCorners`] - camera-space corner rays for ray reconstruction
//! - [`FrameUniforms`] - everything an evaluator reads in one frame
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use marcher_scene::{
//!     CameraState, CombineOp, FrameUniforms, ShapeKind, ShapeNode, SharedShapeRegistry,
//! };
//!
//! let registry = SharedShapeRegistry::new();
//! let ball = Arc::new(ShapeNode::new(ShapeKind::Sphere, CombineOp::Union));
//! ball.attach(&registry);
//!
//! let frame = FrameUniforms::pack(&registry.snapshot(), &CameraState::default(), None);
//! assert_eq!(frame.shape_count(), 1);
//! ```

mod camera;
mod frustum;
mod node;
mod registry;
mod shape;
mod uniforms;

pub use camera::{CameraState, DirectionalLight};
pub use frustum::{Corner, FrustumCorners};
pub use node::ShapeNode;
pub use registry::{ShapeHandle, ShapeRegistry, ShapeSource, SharedShapeRegistry};
pub use shape::{CombineOp, ShapeDescriptor, ShapeKind, WIRE_VERSION, WireError};
pub use uniforms::{
    DEFAULT_LIGHT_DIRECTION, FrameUniforms, FrameUniformsGpu, MAX_SHAPES, ShapeArraysGpu,
};
