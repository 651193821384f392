//! The structured info record dumped by `validate` and `dump_info`.

use std::fmt;

use crate::document::Document;

/// Raw byte sizes of the source a document was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSizes {
    pub file: usize,
    /// Size of the JSON part: the whole file for `.gltf`, the JSON chunk for GLB.
    pub json: usize,
    /// Size of the GLB binary chunk, if any.
    pub bin: usize,
}

const GLB_MAGIC: &[u8; 4] = b"glTF";

impl SourceSizes {
    /// Measure `bytes`, reading the JSON chunk length from the GLB header when present.
    pub fn measure(bytes: &[u8], bin: usize) -> Self {
        let json = match bytes.get(..4) == Some(&GLB_MAGIC[..]) {
            true => bytes
                .get(12..16)
                .and_then(|b| b.try_into().ok())
                .map_or(0, |b| u32::from_le_bytes(b) as usize),
            false => bytes.len(),
        };
        Self {
            file: bytes.len(),
            json,
            bin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DocumentInfo {
    pub identifier: String,
    pub meshes: usize,
    pub primitives: usize,
    pub materials: usize,
    pub accessors: usize,
    pub buffer_views: usize,
    pub buffers: usize,
    pub images: usize,
    pub textures: usize,
    pub samplers: usize,
    pub skins: usize,
    pub cameras: usize,
    pub lights: usize,
    pub nodes: usize,
    pub scenes: usize,
    pub animations: usize,
    pub variants: usize,
    pub sizes: SourceSizes,
}

impl DocumentInfo {
    pub fn new(identifier: impl Into<String>, doc: &Document, sizes: SourceSizes) -> Self {
        Self {
            identifier: identifier.into(),
            meshes: doc.meshes.len(),
            primitives: doc.primitive_count(),
            materials: doc.materials.len(),
            accessors: doc.accessors.len(),
            buffer_views: doc.buffer_views.len(),
            buffers: doc.buffers.len(),
            images: doc.images.len(),
            textures: doc.textures.len(),
            samplers: doc.samplers.len(),
            skins: doc.skins.len(),
            cameras: doc.cameras.len(),
            lights: doc.lights.len(),
            nodes: doc.nodes.len(),
            scenes: doc.scenes.len(),
            animations: doc.animations.len(),
            variants: doc.variant_count,
            sizes,
        }
    }

    /// `(label, count)` for every counted collection, in display order.
    pub fn counts(&self) -> [(&'static str, usize); 16] {
        [
            ("meshes", self.meshes),
            ("primitives", self.primitives),
            ("materials", self.materials),
            ("accessors", self.accessors),
            ("buffer_views", self.buffer_views),
            ("buffers", self.buffers),
            ("images", self.images),
            ("textures", self.textures),
            ("samplers", self.samplers),
            ("skins", self.skins),
            ("cameras", self.cameras),
            ("lights", self.lights),
            ("nodes", self.nodes),
            ("scenes", self.scenes),
            ("animations", self.animations),
            ("variants", self.variants),
        ]
    }

    /// Emit this record as an `info` event.
    pub fn log(&self) {
        tracing::info!(
            identifier = self.identifier.as_str(),
            meshes = self.meshes,
            primitives = self.primitives,
            materials = self.materials,
            accessors = self.accessors,
            buffer_views = self.buffer_views,
            buffers = self.buffers,
            images = self.images,
            textures = self.textures,
            samplers = self.samplers,
            skins = self.skins,
            cameras = self.cameras,
            lights = self.lights,
            nodes = self.nodes,
            scenes = self.scenes,
            animations = self.animations,
            variants = self.variants,
            file_size = self.sizes.file,
            json_size = self.sizes.json,
            bin_size = self.sizes.bin,
            "document info"
        );
    }
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.identifier)?;
        for (label, count) in self.counts() {
            writeln!(f, "  {label:<13}{count}")?;
        }
        writeln!(f, "  {:<13}{}", "file_size", self.sizes.file)?;
        writeln!(f, "  {:<13}{}", "json_size", self.sizes.json)?;
        write!(f, "  {:<13}{}", "bin_size", self.sizes.bin)
    }
}
