//! What a `process` call did, and what it had to leave out.

use std::fmt;

use crate::{
    document::Topology, resolve::DecodeError, spawn::SpawnError, stream::StreamError,
};

/// A piece of work `process` skipped, and why. Skips never abort the walk.
#[derive(Debug, Clone, PartialEq)]
pub enum Skip {
    /// A requested scene index outside the document's scenes.
    InvalidScene { scene: usize, len: usize },
    /// A root (`parent == None`) or child reference outside the document's nodes.
    InvalidNode {
        parent: Option<usize>,
        node: usize,
        len: usize,
    },
    /// A node reached again through its own descendants.
    Cycle { node: usize, parent: usize },
    /// The node was already entered through another parent or scene.
    AlreadyVisited { node: usize, parent: Option<usize> },
    InvalidMesh { node: usize, mesh: usize, len: usize },
    UnsupportedTopology {
        mesh: usize,
        primitive: usize,
        topology: Topology,
    },
    MissingPositions { mesh: usize, primitive: usize },
    Decode {
        mesh: usize,
        primitive: usize,
        error: DecodeError,
    },
    Geometry {
        mesh: usize,
        primitive: usize,
        error: StreamError,
    },
    Spawn { node: usize, error: SpawnError },
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScene { scene, len } => {
                write!(f, "scene {scene} out of range (0..{len})")
            }
            Self::InvalidNode {
                parent: Some(p),
                node,
                len,
            } => write!(f, "node {p}: child {node} out of range (0..{len})"),
            Self::InvalidNode {
                parent: None,
                node,
                len,
            } => write!(f, "root node {node} out of range (0..{len})"),
            Self::Cycle { node, parent } => {
                write!(f, "node {parent}: child {node} is its own ancestor")
            }
            Self::AlreadyVisited {
                node,
                parent: Some(parent),
            } => write!(f, "node {parent}: child {node} was already visited"),
            Self::AlreadyVisited { node, parent: None } => {
                write!(f, "root {node} was already visited")
            }
            Self::InvalidMesh { node, mesh, len } => {
                write!(f, "node {node}: mesh {mesh} out of range (0..{len})")
            }
            Self::UnsupportedTopology {
                mesh,
                primitive,
                topology,
            } => write!(f, "mesh {mesh} primitive {primitive}: unsupported topology {topology}"),
            Self::MissingPositions { mesh, primitive } => {
                write!(f, "mesh {mesh} primitive {primitive}: no POSITION attribute")
            }
            Self::Decode {
                mesh,
                primitive,
                error,
            } => write!(f, "mesh {mesh} primitive {primitive}: {error}"),
            Self::Geometry {
                mesh,
                primitive,
                error,
            } => write!(f, "mesh {mesh} primitive {primitive}: {error}"),
            Self::Spawn { node, error } => write!(f, "node {node}: {error}"),
        }
    }
}

/// Summary of one `process` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    pub identifier: String,
    /// Scene indices the walk covered, including rejected ones.
    pub scenes: Vec<usize>,
    pub nodes_visited: usize,
    pub instances_spawned: usize,
    pub geometry_built: usize,
    pub skipped: Vec<Skip>,
}

impl ProcessReport {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn capacity_exceeded(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    Skip::Spawn {
                        error: SpawnError::CapacityExceeded { .. },
                        ..
                    }
                )
            })
            .count()
    }
}

impl fmt::Display for ProcessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} nodes, {} instances, {} geometry buffers, {} skipped",
            self.identifier,
            self.nodes_visited,
            self.instances_spawned,
            self.geometry_built,
            self.skipped.len()
        )
    }
}
