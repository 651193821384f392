//! Depth-first traversal of a document's scene graph.
//!
//! Parent links are never stored on nodes; the walker keeps the chain of ancestors of the node it
//! is currently in, which also makes cycles detectable. Every node is entered at most once per
//! walker, however many parents or scenes list it. Invalid scene, root, child and mesh references
//! are logged, reported to the visitor, and skipped along with their subtree.

use crate::{document::Document, registry::NameTable, report::Skip};

/// A node as seen by a [NodeVisitor].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeVisit {
    pub node: usize,
    pub parent: Option<usize>,
    /// Number of ancestors.
    pub depth: usize,
    pub name: String,
    /// The node's mesh index and name, if it has a valid mesh reference.
    pub mesh: Option<(usize, String)>,
}

pub trait NodeVisitor {
    /// Called once per reachable node, after all of its children have been visited.
    fn visit_node(&mut self, doc: &Document, visit: &NodeVisit);

    fn skipped(&mut self, skip: Skip);
}

#[derive(Debug)]
struct Frame {
    node: usize,
    parent: Option<usize>,
    name: String,
    next_child: usize,
}

pub struct SceneWalker<'w> {
    doc: &'w Document,
    names: &'w mut NameTable,
    /// Ancestors of the node currently being walked, root first.
    frames: Vec<Frame>,
    /// `on_path[n]` iff node `n` is in `frames`.
    on_path: Vec<bool>,
    /// `visited[n]` iff node `n` has been entered by this walker.
    visited: Vec<bool>,
}

impl<'w> SceneWalker<'w> {
    pub fn new(doc: &'w Document, names: &'w mut NameTable) -> Self {
        Self {
            doc,
            names,
            frames: Vec::new(),
            on_path: vec![false; doc.nodes.len()],
            visited: vec![false; doc.nodes.len()],
        }
    }

    pub fn walk_scenes(&mut self, scenes: &[usize], visitor: &mut impl NodeVisitor) {
        for &scene in scenes {
            self.walk_scene(scene, visitor);
        }
    }

    #[tracing::instrument(skip(self, visitor))]
    pub fn walk_scene(&mut self, scene: usize, visitor: &mut impl NodeVisitor) {
        let doc = self.doc;
        let Some(s) = doc.scenes.get(scene) else {
            let len = doc.scenes.len();
            tracing::error!(len, "scene index out of range");
            visitor.skipped(Skip::InvalidScene { scene, len });
            return;
        };
        tracing::debug!(roots = s.nodes.len(), "walking scene");
        for &root in &s.nodes {
            self.walk_from(root, visitor);
        }
    }

    /// Walk the subtree rooted at node `root`.
    pub fn walk_from(&mut self, root: usize, visitor: &mut impl NodeVisitor) {
        let doc = self.doc;
        self.frames.clear();
        self.enter(None, root, visitor);
        while let Some(frame) = self.frames.last_mut() {
            let next = doc
                .nodes
                .get(frame.node)
                .and_then(|n| n.children.get(frame.next_child))
                .copied();
            match next {
                Some(child) => {
                    frame.next_child += 1;
                    let parent = frame.node;
                    self.enter(Some(parent), child, visitor);
                }
                None => {
                    if let Some(frame) = self.frames.pop() {
                        self.leave(frame, visitor);
                    }
                }
            }
        }
    }

    fn enter(&mut self, parent: Option<usize>, index: usize, visitor: &mut impl NodeVisitor) {
        let doc = self.doc;
        if index >= doc.nodes.len() {
            let len = doc.nodes.len();
            tracing::error!(parent, node = index, len, "node index out of range");
            visitor.skipped(Skip::InvalidNode {
                parent,
                node: index,
                len,
            });
            return;
        }
        if let Some(parent) = parent {
            if self.on_path[index] {
                tracing::error!(parent, node = index, "cycle in node graph");
                visitor.skipped(Skip::Cycle {
                    node: index,
                    parent,
                });
                return;
            }
        }
        if self.visited[index] {
            tracing::warn!(parent, node = index, "node already visited");
            visitor.skipped(Skip::AlreadyVisited {
                node: index,
                parent,
            });
            return;
        }
        let name = self.names.node(doc, index).unwrap_or_default().to_owned();
        tracing::trace!(node = index, parent, name = name.as_str(), "entering node");
        self.on_path[index] = true;
        self.visited[index] = true;
        self.frames.push(Frame {
            node: index,
            parent,
            name,
            next_child: 0,
        });
    }

    fn leave(&mut self, frame: Frame, visitor: &mut impl NodeVisitor) {
        let doc = self.doc;
        self.on_path[frame.node] = false;
        let mesh = match doc.nodes.get(frame.node).and_then(|n| n.mesh) {
            Some(mesh) if mesh >= doc.meshes.len() => {
                let len = doc.meshes.len();
                tracing::error!(node = frame.node, mesh, len, "mesh index out of range");
                visitor.skipped(Skip::InvalidMesh {
                    node: frame.node,
                    mesh,
                    len,
                });
                None
            }
            Some(mesh) => self
                .names
                .mesh(doc, mesh)
                .map(|name| (mesh, name.to_owned())),
            None => None,
        };
        visitor.visit_node(
            doc,
            &NodeVisit {
                node: frame.node,
                parent: frame.parent,
                depth: self.frames.len(),
                name: frame.name,
                mesh,
            },
        );
    }
}
