//! Scene-object wrapper that owns one shape's state
//!
//! Whatever layer manages object lifetime calls [`ShapeNode::attach`] when
//! the object becomes active and [`ShapeNode::detach`] when it goes away.

use crate::registry::{ShapeHandle, ShapeSource, SharedShapeRegistry};
use crate::shape::{CombineOp, ShapeDescriptor, ShapeKind};
use glam::Vec3;
use parking_lot::RwLock;
use std::sync::Arc;

/// A shape placed in the scene
#[derive(Debug, Default)]
pub struct ShapeNode {
    state: RwLock<ShapeDescriptor>,
}

impl ShapeNode {
    pub fn new(kind: ShapeKind, combine_op: CombineOp) -> Self {
        Self::from_descriptor(ShapeDescriptor::new(kind, combine_op, Vec3::ZERO, 1.0))
    }

    pub fn from_descriptor(descriptor: ShapeDescriptor) -> Self {
        Self {
            state: RwLock::new(descriptor),
        }
    }

    /// Set the world-space position
    pub fn with_position(self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Set the uniform scale
    pub fn with_scale(self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn set_kind(&self, kind: ShapeKind) {
        self.state.write().kind = kind;
    }

    pub fn set_combine_op(&self, combine_op: CombineOp) {
        self.state.write().combine_op = combine_op;
    }

    pub fn set_position(&self, position: Vec3) {
        self.state.write().position = position;
    }

    pub fn set_scale(&self, scale: f32) {
        self.state.write().scale = scale;
    }

    /// Non-owning handle for registry lookups
    pub fn handle(self: &Arc<Self>) -> ShapeHandle {
        ShapeHandle::new(self)
    }

    /// Register with `registry`; a node already attached stays in its slot
    pub fn attach(self: &Arc<Self>, registry: &SharedShapeRegistry) {
        if !registry.register(self.handle()) {
            tracing::trace!("Shape already attached");
        }
    }

    /// Unregister from `registry`; safe to call more than once
    pub fn detach(self: &Arc<Self>, registry: &SharedShapeRegistry) {
        registry.unregister(&self.handle());
    }
}

impl ShapeSource for ShapeNode {
    fn descriptor(&self) -> ShapeDescriptor {
        *self.state.read()
    }
}
