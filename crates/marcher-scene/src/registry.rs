//! Ordered registry of live shape sources
//!
//! Registration order is compositing order: the evaluator folds shapes
//! left to right. The registry only holds non-owning handles, so it never
//! keeps a scene object alive.

use crate::shape::ShapeDescriptor;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Anything that can describe itself as a shape once per frame
pub trait ShapeSource: Send + Sync {
    /// Snapshot of the source's current state
    fn descriptor(&self) -> ShapeDescriptor;
}

/// Non-owning handle to a shape source
///
/// Two handles are equal when they point at the same allocation.
#[derive(Clone)]
pub struct ShapeHandle(Weak<dyn ShapeSource>);

impl ShapeHandle {
    pub fn new<S: ShapeSource + 'static>(source: &Arc<S>) -> Self {
        let weak: Weak<S> = Arc::downgrade(source);
        Self(weak)
    }

    /// Whether the underlying object is still alive
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    fn descriptor(&self) -> Option<ShapeDescriptor> {
        self.0.upgrade().map(|source| source.descriptor())
    }
}

impl From<&Arc<dyn ShapeSource>> for ShapeHandle {
    fn from(source: &Arc<dyn ShapeSource>) -> Self {
        Self(Arc::downgrade(source))
    }
}

impl PartialEq for ShapeHandle {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ShapeHandle {}

impl std::fmt::Debug for ShapeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShapeHandle")
            .field(&self.0.as_ptr().cast::<()>())
            .finish()
    }
}

/// Insertion-ordered set of shape handles
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    entries: Vec<ShapeHandle>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape unless it is already registered
    ///
    /// Returns `true` if the shape was added.
    pub fn register(&mut self, shape: ShapeHandle) -> bool {
        if self.entries.contains(&shape) {
            return false;
        }
        self.entries.push(shape);
        true
    }

    /// Remove a shape if present
    ///
    /// Returns `true` if an entry was removed.
    pub fn unregister(&mut self, shape: &ShapeHandle) -> bool {
        match self.entries.iter().position(|entry| entry == shape) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, shape: &ShapeHandle) -> bool {
        self.entries.contains(shape)
    }

    /// Number of registered handles, including any whose owner has gone away
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every handle
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop handles whose owner was destroyed without unregistering
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(ShapeHandle::is_alive);
        before - self.entries.len()
    }

    /// Descriptors of all live shapes, in registration order
    pub fn snapshot(&self) -> Vec<ShapeDescriptor> {
        self.entries
            .iter()
            .filter_map(ShapeHandle::descriptor)
            .collect()
    }
}

/// A [`ShapeRegistry`] shared between the renderer and scene objects
///
/// Mutation and snapshot go through one lock, so the order seen by a
/// frame's packing cannot change halfway through.
#[derive(Debug, Clone, Default)]
pub struct SharedShapeRegistry {
    inner: Arc<Mutex<ShapeRegistry>>,
}

impl SharedShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, shape: ShapeHandle) -> bool {
        let added = self.inner.lock().register(shape);
        if added {
            tracing::debug!("Registered shape ({} total)", self.len());
        }
        added
    }

    pub fn unregister(&self, shape: &ShapeHandle) -> bool {
        let removed = self.inner.lock().unregister(shape);
        if removed {
            tracing::debug!("Unregistered shape ({} total)", self.len());
        }
        removed
    }

    pub fn contains(&self, shape: &ShapeHandle) -> bool {
        self.inner.lock().contains(shape)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Prune dead handles and take the frame's snapshot under one lock
    pub fn snapshot(&self) -> Vec<ShapeDescriptor> {
        let mut registry = self.inner.lock();
        let pruned = registry.prune();
        if pruned > 0 {
            tracing::warn!("Dropped {} shape(s) destroyed without unregistering", pruned);
        }
        registry.snapshot()
    }
}
