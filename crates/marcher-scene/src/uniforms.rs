//! Per-frame uniform packing
//!
//! [`FrameUniforms`] is the CPU-side view of everything an evaluator reads
//! in one frame. The `*Gpu` structs are the byte layouts uploaded to the two
//! uniform buffers and must match the WGSL declarations exactly.

use crate::camera::{CameraState, DirectionalLight};
use crate::frustum::FrustumCorners;
use crate::shape::{ShapeDescriptor, WIRE_VERSION, WireError};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Capacity of the fixed-size shape arrays
pub const MAX_SHAPES: usize = 32;

/// Light direction used when no light is bound
pub const DEFAULT_LIGHT_DIRECTION: Vec3 = Vec3::NEG_Y;

/// Everything packed for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    pub frustum_corners: FrustumCorners,
    pub camera_to_world: Mat4,
    pub camera_position: Vec3,
    /// Normalized light direction
    pub light_direction: Vec3,
    /// `(kind, op, 0, 0)` per shape, index-aligned with `position_scale`
    pub type_operator: Vec<[u32; 4]>,
    /// `(x, y, z, scale)` per shape
    pub position_scale: Vec<[f32; 4]>,
}

impl FrameUniforms {
    /// Pack a frame, falling back to [`DEFAULT_LIGHT_DIRECTION`]
    pub fn pack(
        shapes: &[ShapeDescriptor],
        camera: &CameraState,
        light: Option<&DirectionalLight>,
    ) -> Self {
        Self::pack_with_fallback(shapes, camera, light, DEFAULT_LIGHT_DIRECTION)
    }

    /// Pack a frame with an explicit fallback light direction
    ///
    /// Shapes past [`MAX_SHAPES`] are dropped from the end.
    pub fn pack_with_fallback(
        shapes: &[ShapeDescriptor],
        camera: &CameraState,
        light: Option<&DirectionalLight>,
        fallback_light: Vec3,
    ) -> Self {
        if shapes.len() > MAX_SHAPES {
            tracing::warn!(
                "{} shapes registered, only the first {} are uploaded",
                shapes.len(),
                MAX_SHAPES
            );
        }
        let shapes = &shapes[..shapes.len().min(MAX_SHAPES)];

        let light_direction = light
            .and_then(DirectionalLight::normalized_direction)
            .or_else(|| fallback_light.try_normalize())
            .unwrap_or(DEFAULT_LIGHT_DIRECTION);

        tracing::trace!("Packing {} shape(s)", shapes.len());

        Self {
            frustum_corners: FrustumCorners::solve(camera.fov_degrees, camera.aspect),
            camera_to_world: camera.camera_to_world,
            camera_position: camera.position,
            light_direction,
            type_operator: shapes.iter().map(ShapeDescriptor::type_operator).collect(),
            position_scale: shapes.iter().map(ShapeDescriptor::position_scale).collect(),
        }
    }

    /// Number of packed shapes
    pub fn shape_count(&self) -> u32 {
        self.type_operator.len() as u32
    }

    /// Decode shape `index` back out of the packed arrays
    pub fn shape(&self, index: usize) -> Option<Result<ShapeDescriptor, WireError>> {
        let type_operator = *self.type_operator.get(index)?;
        let position_scale = *self.position_scale.get(index)?;
        Some(ShapeDescriptor::unpack(type_operator, position_scale))
    }

    /// Scalar and matrix uniforms
    pub fn gpu_frame(&self) -> FrameUniformsGpu {
        FrameUniformsGpu {
            frustum_corners: self.frustum_corners.to_matrix().to_cols_array_2d(),
            camera_inv_view: self.camera_to_world.to_cols_array_2d(),
            camera_world_position: self.camera_position.to_array(),
            shape_count: self.shape_count(),
            light_direction: self.light_direction.to_array(),
            wire_version: WIRE_VERSION,
        }
    }

    /// Shape arrays, or `None` when there is nothing to upload
    pub fn gpu_shapes(&self) -> Option<ShapeArraysGpu> {
        if self.type_operator.is_empty() {
            return None;
        }

        let mut arrays = ShapeArraysGpu::zeroed();
        let count = self.type_operator.len();
        arrays.type_operator[..count].copy_from_slice(&self.type_operator);
        arrays.position_scale[..count].copy_from_slice(&self.position_scale);
        Some(arrays)
    }
}

/// GPU layout of the frame uniforms
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniformsGpu {
    pub frustum_corners: [[f32; 4]; 4],
    pub camera_inv_view: [[f32; 4]; 4],
    pub camera_world_position: [f32; 3],
    pub shape_count: u32,
    pub light_direction: [f32; 3],
    pub wire_version: u32,
}

/// GPU layout of the shape arrays
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeArraysGpu {
    pub type_operator: [[u32; 4]; MAX_SHAPES],
    pub position_scale: [[f32; 4]; MAX_SHAPES],
}

const _: () = assert!(std::mem::size_of::<FrameUniformsGpu>() == 160);
const _: () = assert!(std::mem::size_of::<ShapeArraysGpu>() == 32 * MAX_SHAPES);
