//! Mesh instantiation: one host object per mesh node, tracked in a fixed-capacity pool.

use std::fmt;

use nalgebra::{Quaternion, Vector3};

use crate::{
    document::{Document, NodeTransform, Primitive},
    primitive::{extract_positions, Extraction},
    report::{ProcessReport, Skip},
    stream::{GeometryBuffer, StreamLayout},
    walk::{NodeVisit, NodeVisitor},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("instance pool is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("factory not found: {0}")]
    FactoryNotFound(String),
    #[error("host error: {0}")]
    Host(String),
}

/// The host capability that creates objects.
///
/// Factories are resolved once per [Context](crate::Context); objects are owned by the
/// [InstancePool] until released.
pub trait Spawner {
    type Factory: Clone + fmt::Debug;
    type Object: fmt::Debug;

    fn resolve_factory(
        &mut self,
        collection: &str,
        factory: &str,
    ) -> Result<Self::Factory, SpawnError>;

    fn spawn(
        &mut self,
        factory: &Self::Factory,
        transform: &Transform,
        name: &str,
    ) -> Result<Self::Object, SpawnError>;

    /// Hand a populated geometry buffer for primitive `primitive` of mesh `mesh` to `object`.
    fn attach_geometry(
        &mut self,
        object: &Self::Object,
        mesh: &str,
        primitive: usize,
        geometry: GeometryBuffer,
    ) -> Result<(), SpawnError>;

    fn release(&mut self, factory: &Self::Factory, object: Self::Object);
}

/// A resolved local transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl Transform {
    /// Take each TRS component the node specifies; the rest stay at identity. Matrices are not
    /// decomposed.
    pub fn from_node(node: &NodeTransform) -> Self {
        let mut res = Self::default();
        if let Some([x, y, z]) = node.translation {
            res.translation = Vector3::new(x, y, z);
        }
        if let Some([x, y, z, w]) = node.rotation {
            res.rotation = Quaternion::new(w, x, y, z);
        }
        if let Some([x, y, z]) = node.scale {
            res.scale = Vector3::new(x, y, z);
        }
        res
    }

    /// Rotation as (x, y, z, w).
    #[inline]
    pub fn rotation_xyzw(&self) -> [f32; 4] {
        let c = &self.rotation.coords;
        [c.x, c.y, c.z, c.w]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance<F, O> {
    pub factory: F,
    pub object: O,
}

/// A fixed-capacity, insertion-ordered collection of spawned instances. Never evicts.
#[derive(Debug)]
pub struct InstancePool<F, O> {
    capacity: usize,
    instances: Vec<Instance<F, O>>,
}

impl<F, O> InstancePool<F, O> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            instances: Vec::with_capacity(capacity.min(1024)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.capacity
    }

    /// Fails with [SpawnError::CapacityExceeded] if another instance would not fit.
    pub fn reserve(&self) -> Result<(), SpawnError> {
        match self.is_full() {
            true => Err(SpawnError::CapacityExceeded {
                capacity: self.capacity,
            }),
            false => Ok(()),
        }
    }

    /// Append `instance`, returning its position in the pool.
    pub fn push(&mut self, instance: Instance<F, O>) -> Result<usize, SpawnError> {
        self.reserve()?;
        self.instances.push(instance);
        Ok(self.instances.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&Instance<F, O>> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance<F, O>> {
        self.instances.iter()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Instance<F, O>> {
        self.instances.drain(..)
    }
}

/// Spawns an instance for every visited mesh node and builds geometry for its triangle
/// primitives.
pub struct MeshInstantiator<'c, S: Spawner> {
    pub spawner: &'c mut S,
    pub factory: &'c S::Factory,
    pub pool: &'c mut InstancePool<S::Factory, S::Object>,
    pub layout: StreamLayout,
    pub scratch: &'c mut Vec<f32>,
    pub report: &'c mut ProcessReport,
}

impl<'c, S: Spawner> MeshInstantiator<'c, S> {
    /// Create one object at `transform` and add it to the pool, returning its pool position.
    pub fn spawn(&mut self, transform: &Transform, name: &str) -> Result<usize, SpawnError> {
        if let Err(e) = self.pool.reserve() {
            tracing::error!(capacity = self.pool.capacity(), name, "instance pool is full");
            return Err(e);
        }
        let object = self.spawner.spawn(self.factory, transform, name)?;
        tracing::debug!(name, ?object, "spawned instance");
        self.pool.push(Instance {
            factory: self.factory.clone(),
            object,
        })
    }

    fn build_geometry(
        &mut self,
        doc: &Document,
        (node, instance): (usize, usize),
        (mesh, mesh_name): (usize, &str),
        (index, primitive): (usize, &Primitive),
    ) {
        let skip = match extract_positions(doc, primitive, self.scratch) {
            Err(error) => {
                tracing::error!(mesh, primitive = index, %error, "could not decode positions");
                Skip::Decode {
                    mesh,
                    primitive: index,
                    error,
                }
            }
            Ok(Extraction::Unsupported(topology)) => Skip::UnsupportedTopology {
                mesh,
                primitive: index,
                topology,
            },
            Ok(Extraction::NoPositions) => Skip::MissingPositions {
                mesh,
                primitive: index,
            },
            Ok(Extraction::Positions(positions)) => {
                let geometry = GeometryBuffer::new(self.layout, positions.len())
                    .and_then(|mut g| g.write_positions(&positions).map(|_| g));
                let geometry = match geometry {
                    Ok(g) => g,
                    Err(error) => {
                        tracing::warn!(mesh, primitive = index, %error, "could not build geometry buffer");
                        self.report.skipped.push(Skip::Geometry {
                            mesh,
                            primitive: index,
                            error,
                        });
                        return;
                    }
                };
                let Some(target) = self.pool.get(instance) else {
                    return;
                };
                match self
                    .spawner
                    .attach_geometry(&target.object, mesh_name, index, geometry)
                {
                    Ok(()) => {
                        tracing::trace!(mesh, primitive = index, vertices = positions.len(), "attached geometry");
                        self.report.geometry_built += 1;
                        return;
                    }
                    Err(error) => {
                        tracing::error!(mesh, primitive = index, %error, "could not attach geometry");
                        Skip::Spawn { node, error }
                    }
                }
            }
        };
        self.report.skipped.push(skip);
    }
}

impl<'c, S: Spawner> NodeVisitor for MeshInstantiator<'c, S> {
    fn visit_node(&mut self, doc: &Document, visit: &NodeVisit) {
        self.report.nodes_visited += 1;
        let Some((mesh, mesh_name)) = &visit.mesh else {
            return;
        };
        let Some(node) = doc.nodes.get(visit.node) else {
            return;
        };
        if node.transform.has_matrix() {
            tracing::debug!(node = visit.node, "matrix transforms are not decomposed; spawning at identity");
        }
        let transform = Transform::from_node(&node.transform);
        let instance = match self.spawn(&transform, &visit.name) {
            Ok(i) => i,
            Err(error) => {
                self.report.skipped.push(Skip::Spawn {
                    node: visit.node,
                    error,
                });
                return;
            }
        };
        self.report.instances_spawned += 1;
        if let Some(m) = doc.meshes.get(*mesh) {
            for (index, primitive) in m.primitives.iter().enumerate() {
                self.build_geometry(
                    doc,
                    (visit.node, instance),
                    (*mesh, mesh_name.as_str()),
                    (index, primitive),
                );
            }
        }
    }

    fn skipped(&mut self, skip: Skip) {
        self.report.skipped.push(skip);
    }
}
