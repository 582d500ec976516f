//! Shape descriptors and their GPU wire encoding
//!
//! The numeric codes below are shared with every evaluator program. They are
//! the ordinal position of each enumerator and are versioned through
//! [`WIRE_VERSION`]; reordering a variant is a wire break.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the shape encoding table, uploaded alongside the frame uniforms
pub const WIRE_VERSION: u32 = 1;

/// Errors produced when decoding packed shape data
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// The type slot held a code with no matching primitive
    #[error("Unknown shape kind code: {0}")]
    UnknownShapeKind(u32),

    /// The operator slot held a code with no matching combine operator
    #[error("Unknown combine operator code: {0}")]
    UnknownCombineOp(u32),
}

/// Primitive family, interpreted by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Sphere,
    Box,
    Capsule,
    Torus,
}

impl ShapeKind {
    /// All kinds in code order
    pub const ALL: [ShapeKind; 4] = [Self::Sphere, Self::Box, Self::Capsule, Self::Torus];

    /// Wire code for this kind
    pub const fn code(self) -> u32 {
        match self {
            Self::Sphere => 0,
            Self::Box => 1,
            Self::Capsule => 2,
            Self::Torus => 3,
        }
    }
}

impl TryFrom<u32> for ShapeKind {
    type Error = WireError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(WireError::UnknownShapeKind(code))
    }
}

/// How a shape composites with the field accumulated from earlier shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineOp {
    #[default]
    Union,
    Subtraction,
    Intersection,
}

impl CombineOp {
    /// All operators in code order
    pub const ALL: [CombineOp; 3] = [Self::Union, Self::Subtraction, Self::Intersection];

    /// Wire code for this operator
    pub const fn code(self) -> u32 {
        match self {
            Self::Union => 0,
            Self::Subtraction => 1,
            Self::Intersection => 2,
        }
    }
}

impl TryFrom<u32> for CombineOp {
    type Error = WireError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(WireError::UnknownCombineOp(code))
    }
}

/// Per-frame snapshot of one scene primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    pub combine_op: CombineOp,
    /// World-space position
    pub position: Vec3,
    /// Uniform scale factor
    pub scale: f32,
}

impl ShapeDescriptor {
    pub fn new(kind: ShapeKind, combine_op: CombineOp, position: Vec3, scale: f32) -> Self {
        Self {
            kind,
            combine_op,
            position,
            scale,
        }
    }

    /// Pack as the `(kind, op, 0, 0)` type/operator slot
    pub fn type_operator(&self) -> [u32; 4] {
        [self.kind.code(), self.combine_op.code(), 0, 0]
    }

    /// Pack as the `(x, y, z, scale)` position/scale slot
    pub fn position_scale(&self) -> [f32; 4] {
        [self.position.x, self.position.y, self.position.z, self.scale]
    }

    /// Rebuild a descriptor from its two packed slots
    pub fn unpack(type_operator: [u32; 4], position_scale: [f32; 4]) -> Result<Self, WireError> {
        let [x, y, z, scale] = position_scale;
        Ok(Self {
            kind: ShapeKind::try_from(type_operator[0])?,
            combine_op: CombineOp::try_from(type_operator[1])?,
            position: Vec3::new(x, y, z),
            scale,
        })
    }
}

impl Default for ShapeDescriptor {
    fn default() -> Self {
        Self::new(ShapeKind::Sphere, CombineOp::Union, Vec3::ZERO, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_ordinals() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.code(), i as u32);
        }
        for (i, op) in CombineOp::ALL.iter().enumerate() {
            assert_eq!(op.code(), i as u32);
        }
    }

    #[test]
    fn test_box_subtraction_unpacks_exactly() {
        let shape = ShapeDescriptor::new(
            ShapeKind::Box,
            CombineOp::Subtraction,
            Vec3::new(1.0, 2.0, 3.0),
            2.0,
        );

        assert_eq!(shape.type_operator(), [1, 1, 0, 0]);
        assert_eq!(shape.position_scale(), [1.0, 2.0, 3.0, 2.0]);

        let decoded = ShapeDescriptor::unpack(shape.type_operator(), shape.position_scale());
        assert_eq!(decoded, Ok(shape));
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        assert_eq!(
            ShapeDescriptor::unpack([4, 0, 0, 0], [0.0; 4]),
            Err(WireError::UnknownShapeKind(4))
        );
        assert_eq!(
            ShapeDescriptor::unpack([0, 3, 0, 0], [0.0; 4]),
            Err(WireError::UnknownCombineOp(3))
        );
    }
}
