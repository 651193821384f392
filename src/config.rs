//! Settings resolved once when a [Context](crate::Context) is created.

use crate::{resolve::IndexBase, stream::StreamLayout};

/// Which scenes of a document `process` walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneSelection {
    /// The document's default scene if it names one; otherwise every scene, in order.
    #[default]
    Default,
    All,
    Index(usize),
}

impl SceneSelection {
    /// Scene indices to walk for `doc`. Out-of-range indices are returned as-is and rejected by
    /// the walker.
    pub fn scenes(self, doc: &crate::Document) -> Vec<usize> {
        match self {
            Self::Default => doc.implied_scenes(),
            Self::All => (0..doc.scenes.len()).collect(),
            Self::Index(i) => vec![i],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root object collection to instantiate into.
    pub collection: String,
    /// Factory component used to spawn mesh instances, relative to `collection`.
    pub factory: String,
    /// Instance pool capacity.
    pub capacity: usize,
    pub layout: StreamLayout,
    pub index_base: IndexBase,
    pub scenes: SceneSelection,
}

impl Config {
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// The full address of the mesh factory.
    pub fn factory_path(&self) -> String {
        format!("{}{}", self.collection, self.factory)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collection: "/root".to_owned(),
            factory: "#mesh_factory".to_owned(),
            capacity: Self::DEFAULT_CAPACITY,
            layout: StreamLayout::default(),
            index_base: IndexBase::default(),
            scenes: SceneSelection::default(),
        }
    }
}
