use std::collections::HashMap;

use crate::document::Document;

/// Names fixed for the nodes & meshes of one document.
///
/// The first request for an item's name fixes it: the author-supplied name if there is one,
/// otherwise `node_NNNN` / `mesh_NNN` from its index. The [Document] itself is never renamed.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    nodes: HashMap<usize, String>,
    meshes: HashMap<usize, String>,
}

fn fix<'t>(
    table: &'t mut HashMap<usize, String>,
    index: usize,
    authored: Option<&str>,
    synthesize: impl FnOnce() -> String,
) -> &'t str {
    table
        .entry(index)
        .or_insert_with(|| authored.map_or_else(synthesize, str::to_owned))
}

impl NameTable {
    pub fn synthesize_node(index: usize) -> String {
        format!("node_{index:04}")
    }

    pub fn synthesize_mesh(index: usize) -> String {
        format!("mesh_{index:03}")
    }

    /// The name of node `index`. Returns `None` if `doc` has no such node.
    pub fn node(&mut self, doc: &Document, index: usize) -> Option<&str> {
        let node = doc.nodes.get(index)?;
        Some(fix(&mut self.nodes, index, node.name.as_deref(), || {
            let name = Self::synthesize_node(index);
            tracing::trace!(node = index, name = name.as_str(), "synthesized node name");
            name
        }))
    }

    /// The name of mesh `index`. Returns `None` if `doc` has no such mesh.
    pub fn mesh(&mut self, doc: &Document, index: usize) -> Option<&str> {
        let mesh = doc.meshes.get(index)?;
        Some(fix(&mut self.meshes, index, mesh.name.as_deref(), || {
            let name = Self::synthesize_mesh(index);
            tracing::trace!(mesh = index, name = name.as_str(), "synthesized mesh name");
            name
        }))
    }

    /// Number of names fixed so far.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
