//! Structural & referential checks over a [Document].
//!
//! Validation only reads. Nothing else in the crate requires a document to pass it; every other
//! operation bounds-checks on its own.

use std::fmt;

use crate::document::{Dimensions, Document, Semantic};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationIssue {
    /// `from[index]` refers to `kind[target]`, which does not exist.
    DanglingReference {
        from: &'static str,
        index: usize,
        kind: &'static str,
        target: usize,
        len: usize,
    },
    BufferTooShort {
        buffer: usize,
        declared: usize,
        actual: usize,
    },
    ViewOutOfBuffer { view: usize, end: usize, len: usize },
    AccessorOutOfView {
        accessor: usize,
        end: usize,
        len: usize,
    },
    PositionNotVec3 {
        mesh: usize,
        primitive: usize,
        accessor: usize,
    },
    MultipleParents { node: usize },
    Cycle { node: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference {
                from,
                index,
                kind,
                target,
                len,
            } => write!(f, "{from} {index}: {kind} {target} out of range (0..{len})"),
            Self::BufferTooShort {
                buffer,
                declared,
                actual,
            } => write!(f, "buffer {buffer}: declares {declared} bytes, holds {actual}"),
            Self::ViewOutOfBuffer { view, end, len } => {
                write!(f, "buffer view {view}: ends at {end}, past buffer length {len}")
            }
            Self::AccessorOutOfView { accessor, end, len } => {
                write!(f, "accessor {accessor}: ends at {end}, past view length {len}")
            }
            Self::PositionNotVec3 {
                mesh,
                primitive,
                accessor,
            } => write!(
                f,
                "mesh {mesh} primitive {primitive}: POSITION accessor {accessor} is not a vec3"
            ),
            Self::MultipleParents { node } => write!(f, "node {node} has more than one parent"),
            Self::Cycle { node } => write!(f, "node {node} is its own ancestor"),
        }
    }
}

/// A validation that found at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed with {} issue(s)", .issues.len())]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// `"OK"` or `"FAILED"`.
    pub fn status(&self) -> &'static str {
        match self.is_ok() {
            true => "OK",
            false => "FAILED",
        }
    }

    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self.is_ok() {
            true => Ok(()),
            false => Err(ValidationFailure {
                issues: self.issues,
            }),
        }
    }
}

struct Checker<'doc> {
    doc: &'doc Document,
    issues: Vec<ValidationIssue>,
}

impl Checker<'_> {
    /// Returns whether the reference is in bounds.
    fn reference(
        &mut self,
        (from, index): (&'static str, usize),
        (kind, len): (&'static str, usize),
        target: usize,
    ) -> bool {
        let ok = target < len;
        if !ok {
            self.issues.push(ValidationIssue::DanglingReference {
                from,
                index,
                kind,
                target,
                len,
            });
        }
        ok
    }

    fn buffers(&mut self) {
        let doc = self.doc;
        for (i, b) in doc.buffers.iter().enumerate() {
            if b.as_slice().len() < b.byte_length {
                self.issues.push(ValidationIssue::BufferTooShort {
                    buffer: i,
                    declared: b.byte_length,
                    actual: b.as_slice().len(),
                });
            }
        }
        for (i, v) in doc.buffer_views.iter().enumerate() {
            if !self.reference(("buffer view", i), ("buffer", doc.buffers.len()), v.buffer) {
                continue;
            }
            let len = doc.buffers[v.buffer].as_slice().len();
            // unaddressable ends count as usize::MAX
            let end = v.offset.checked_add(v.length).unwrap_or(usize::MAX);
            if end > len {
                self.issues
                    .push(ValidationIssue::ViewOutOfBuffer { view: i, end, len });
            }
        }
        for (i, a) in doc.accessors.iter().enumerate() {
            let Some(view) = a.buffer_view else {
                continue;
            };
            if !self.reference(("accessor", i), ("buffer view", doc.buffer_views.len()), view) {
                continue;
            }
            let view = &doc.buffer_views[view];
            let size = a.element_size();
            let end = match a.count {
                0 => a.offset,
                n => (n - 1)
                    .checked_mul(view.stride_for(size))
                    .and_then(|e| e.checked_add(size))
                    .and_then(|e| e.checked_add(a.offset))
                    .unwrap_or(usize::MAX),
            };
            if end > view.length {
                self.issues.push(ValidationIssue::AccessorOutOfView {
                    accessor: i,
                    end,
                    len: view.length,
                });
            }
        }
    }

    fn meshes(&mut self) {
        let doc = self.doc;
        let accessors = ("accessor", doc.accessors.len());
        for (m, mesh) in doc.meshes.iter().enumerate() {
            for (p, prim) in mesh.primitives.iter().enumerate() {
                for attr in &prim.attributes {
                    if self.reference(("mesh", m), accessors, attr.accessor)
                        && attr.semantic == Semantic::Position
                        && doc.accessors[attr.accessor].dimensions != Dimensions::Vec3
                    {
                        self.issues.push(ValidationIssue::PositionNotVec3 {
                            mesh: m,
                            primitive: p,
                            accessor: attr.accessor,
                        });
                    }
                }
                if let Some(i) = prim.indices {
                    self.reference(("mesh", m), accessors, i);
                }
                if let Some(mat) = prim.material {
                    self.reference(("mesh", m), ("material", doc.materials.len()), mat);
                }
            }
        }
        for (i, t) in doc.textures.iter().enumerate() {
            self.reference(("texture", i), ("image", doc.images.len()), t.image);
            if let Some(s) = t.sampler {
                self.reference(("texture", i), ("sampler", doc.samplers.len()), s);
            }
        }
        for (i, img) in doc.images.iter().enumerate() {
            if let Some(v) = img.buffer_view {
                self.reference(("image", i), ("buffer view", doc.buffer_views.len()), v);
            }
        }
    }

    fn nodes(&mut self) {
        let doc = self.doc;
        let len = doc.nodes.len();
        let mut parents = vec![0usize; len];
        for (i, node) in doc.nodes.iter().enumerate() {
            for &child in &node.children {
                if self.reference(("node", i), ("node", len), child) {
                    parents[child] += 1;
                }
            }
            if let Some(m) = node.mesh {
                self.reference(("node", i), ("mesh", doc.meshes.len()), m);
            }
            if let Some(s) = node.skin {
                self.reference(("node", i), ("skin", doc.skins.len()), s);
            }
            if let Some(c) = node.camera {
                self.reference(("node", i), ("camera", doc.cameras.len()), c);
            }
            if let Some(l) = node.light {
                self.reference(("node", i), ("light", doc.lights.len()), l);
            }
        }
        for (node, _) in parents.iter().enumerate().filter(|(_, &n)| n > 1) {
            self.issues.push(ValidationIssue::MultipleParents { node });
        }
        for (i, scene) in doc.scenes.iter().enumerate() {
            for &root in &scene.nodes {
                self.reference(("scene", i), ("node", len), root);
            }
        }
        if let Some(s) = doc.default_scene {
            self.reference(("document", 0), ("scene", doc.scenes.len()), s);
        }
        self.cycles();
    }

    /// Iterative three-color DFS; reports the first node found on each back edge.
    fn cycles(&mut self) {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            New,
            Open,
            Done,
        }
        let nodes = &self.doc.nodes;
        let mut marks = vec![Mark::New; nodes.len()];
        let mut stack: Vec<(usize, usize)> = Vec::new();
        for start in 0..nodes.len() {
            if marks[start] != Mark::New {
                continue;
            }
            marks[start] = Mark::Open;
            stack.push((start, 0));
            while let Some((node, next)) = stack.last_mut() {
                let child = nodes[*node].children.get(*next).copied();
                *next += 1;
                match child {
                    Some(c) if c >= nodes.len() => {}
                    Some(c) => match marks[c] {
                        Mark::New => {
                            marks[c] = Mark::Open;
                            stack.push((c, 0));
                        }
                        Mark::Open => self.issues.push(ValidationIssue::Cycle { node: c }),
                        Mark::Done => {}
                    },
                    None => {
                        marks[*node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
    }
}

/// Check `doc` without modifying it.
pub fn validate(doc: &Document) -> ValidationReport {
    let mut checker = Checker {
        doc,
        issues: Vec::new(),
    };
    checker.buffers();
    checker.meshes();
    checker.nodes();
    ValidationReport {
        issues: checker.issues,
    }
}
