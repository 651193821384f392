#![allow(dead_code)]

use scenery::{
    document::{
        Accessor, Attribute, Buffer, BufferView, ComponentType, Dimensions, Document, Mesh, Node,
        NodeTransform, Primitive, Scene, Semantic, Topology,
    },
    spawn::SpawnError,
    GeometryBuffer, Spawner, Transform,
};

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Assembles a minimal glTF asset in memory: every view lives in one buffer.
#[derive(Debug, Default)]
pub struct GltfBuilder {
    bin: Vec<u8>,
    views: Vec<String>,
    accessors: Vec<String>,
    meshes: Vec<String>,
    materials: Vec<String>,
    textures: Vec<String>,
    images: Vec<String>,
    samplers: Vec<String>,
    nodes: Vec<String>,
    scenes: Vec<String>,
    default_scene: Option<usize>,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn view(&mut self, bytes: &[u8], extra: &str) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        self.views.push(format!(
            r#"{{"buffer":0,"byteOffset":{offset},"byteLength":{}{extra}}}"#,
            bytes.len()
        ));
        self.views.len() - 1
    }

    /// A tightly packed view of u16 values.
    pub fn u16_view(&mut self, values: &[u16]) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.view(&bytes, "")
    }

    /// A VEC3 float accessor (with the bounds POSITION requires).
    pub fn positions(&mut self, points: &[[f32; 3]]) -> usize {
        let bytes: Vec<u8> = points.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.view(&bytes, r#","target":34962"#);
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        self.accessors.push(format!(
            r#"{{"bufferView":{view},"componentType":5126,"count":{},"type":"VEC3","min":{min:?},"max":{max:?}}}"#,
            points.len()
        ));
        self.accessors.len() - 1
    }

    /// A SCALAR u16 index accessor.
    pub fn indices(&mut self, values: &[u16]) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.view(&bytes, r#","target":34963"#);
        self.accessors.push(format!(
            r#"{{"bufferView":{view},"componentType":5123,"count":{},"type":"SCALAR"}}"#,
            values.len()
        ));
        self.accessors.len() - 1
    }

    /// A mesh with one primitive per `(mode, position accessor, index accessor)`.
    pub fn mesh(&mut self, name: Option<&str>, primitives: &[(u32, usize, Option<usize>)]) -> usize {
        let primitives: Vec<String> = primitives
            .iter()
            .map(|(mode, pos, indices)| {
                let indices = indices.map(|i| format!(r#","indices":{i}"#)).unwrap_or_default();
                format!(r#"{{"attributes":{{"POSITION":{pos}}},"mode":{mode}{indices}}}"#)
            })
            .collect();
        let name = name.map(|n| format!(r#""name":"{n}","#)).unwrap_or_default();
        self.meshes
            .push(format!(r#"{{{name}"primitives":[{}]}}"#, primitives.join(",")));
        self.meshes.len() - 1
    }

    /// A one-primitive triangle mesh drawn with `material`.
    pub fn textured_mesh(&mut self, name: &str, pos: usize, material: usize) -> usize {
        self.meshes.push(format!(
            r#"{{"name":"{name}","primitives":[{{"attributes":{{"POSITION":{pos}}},"material":{material}}}]}}"#
        ));
        self.meshes.len() - 1
    }

    /// A material from the JSON members between its braces.
    pub fn material(&mut self, members: &str) -> usize {
        self.materials.push(format!("{{{members}}}"));
        self.materials.len() - 1
    }

    /// An image stored in its own buffer view.
    pub fn image(&mut self, bytes: &[u8], mime_type: &str) -> usize {
        let view = self.view(bytes, "");
        self.images
            .push(format!(r#"{{"bufferView":{view},"mimeType":"{mime_type}"}}"#));
        self.images.len() - 1
    }

    pub fn sampler(&mut self, name: &str) -> usize {
        self.samplers
            .push(format!(r#"{{"name":"{name}","magFilter":9729}}"#));
        self.samplers.len() - 1
    }

    pub fn texture(&mut self, image: usize, sampler: Option<usize>) -> usize {
        let sampler = sampler.map(|s| format!(r#","sampler":{s}"#)).unwrap_or_default();
        self.textures.push(format!(r#"{{"source":{image}{sampler}}}"#));
        self.textures.len() - 1
    }

    /// A node from the JSON members between its braces, e.g. `"mesh":0`.
    pub fn node(&mut self, members: &str) -> usize {
        self.nodes.push(format!("{{{members}}}"));
        self.nodes.len() - 1
    }

    pub fn scene(&mut self, roots: &[usize]) -> usize {
        self.scenes.push(format!(r#"{{"nodes":{roots:?}}}"#));
        self.scenes.len() - 1
    }

    pub fn default_scene(&mut self, scene: usize) -> &mut Self {
        self.default_scene = Some(scene);
        self
    }

    fn padded_bin(&self) -> Vec<u8> {
        let mut bin = self.bin.clone();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
        bin
    }

    fn json(&self, buffer: &str) -> String {
        let mut members = vec![r#""asset":{"version":"2.0"}"#.to_owned()];
        if !self.bin.is_empty() {
            members.push(format!(r#""buffers":[{buffer}]"#));
            members.push(format!(r#""bufferViews":[{}]"#, self.views.join(",")));
        }
        for (key, items) in [
            ("accessors", &self.accessors),
            ("meshes", &self.meshes),
            ("materials", &self.materials),
            ("textures", &self.textures),
            ("images", &self.images),
            ("samplers", &self.samplers),
            ("nodes", &self.nodes),
            ("scenes", &self.scenes),
        ] {
            if !items.is_empty() {
                members.push(format!(r#""{key}":[{}]"#, items.join(",")));
            }
        }
        if let Some(s) = self.default_scene {
            members.push(format!(r#""scene":{s}"#));
        }
        format!("{{{}}}", members.join(","))
    }

    /// A binary glTF container.
    pub fn glb(&self) -> Vec<u8> {
        let bin = self.padded_bin();
        let mut json = self
            .json(&format!(r#"{{"byteLength":{}}}"#, bin.len()))
            .into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut chunks = Vec::new();
        chunks.extend_from_slice(&(json.len() as u32).to_le_bytes());
        chunks.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        chunks.extend_from_slice(&json);
        if !bin.is_empty() {
            chunks.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            chunks.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            chunks.extend_from_slice(&bin);
        }
        let mut res = Vec::with_capacity(12 + chunks.len());
        res.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        res.extend_from_slice(&2u32.to_le_bytes());
        res.extend_from_slice(&(12 + chunks.len() as u32).to_le_bytes());
        res.extend_from_slice(&chunks);
        res
    }

    /// A JSON glTF document with its buffer embedded as a `data:` URI.
    pub fn gltf_embedded(&self) -> Vec<u8> {
        let bin = self.padded_bin();
        self.json(&format!(
            r#"{{"byteLength":{},"uri":"data:application/octet-stream;base64,{}"}}"#,
            bin.len(),
            base64(&bin)
        ))
        .into_bytes()
    }

    /// A JSON glTF document referencing its buffer as `uri`; returns the document & buffer.
    pub fn gltf_external(&self, uri: &str) -> (Vec<u8>, Vec<u8>) {
        let bin = self.padded_bin();
        let json = self.json(&format!(r#"{{"byteLength":{},"uri":"{uri}"}}"#, bin.len()));
        (json.into_bytes(), bin)
    }
}

pub fn base64(bytes: &[u8]) -> String {
    const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut res = String::new();
    for chunk in bytes.chunks(3) {
        let n = chunk
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &b)| acc | (b as u32) << (16 - 8 * i));
        for i in 0..=chunk.len() {
            res.push(ALPHABET[(n >> (18 - 6 * i) & 0x3F) as usize] as char);
        }
        for _ in chunk.len()..3 {
            res.push('=');
        }
    }
    res
}

/// A one-triangle GLB: scene 0 holds `parent` (unnamed, translated) with one child carrying
/// the mesh.
pub fn triangle_glb() -> Vec<u8> {
    let mut b = GltfBuilder::new();
    let pos = b.positions(&TRIANGLE);
    let idx = b.indices(&[0, 1, 2]);
    let mesh = b.mesh(Some("tri"), &[(4, pos, Some(idx))]);
    let child = b.node(&format!(r#""name":"leaf","mesh":{mesh},"scale":[2.0,2.0,2.0]"#));
    let root = b.node(&format!(r#""translation":[1.0,2.0,3.0],"children":[{child}]"#));
    b.scene(&[root]);
    b.glb()
}

pub const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// A document with one buffer holding `floats`, one packed view over it, and one VEC3 accessor.
pub fn float_document(floats: &[f32]) -> Document {
    let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();
    let len = bytes.len();
    Document {
        buffers: vec![Buffer::from_bytes(bytes)],
        buffer_views: vec![BufferView {
            length: len,
            ..Default::default()
        }],
        accessors: vec![Accessor {
            buffer_view: Some(0),
            count: floats.len() / 3,
            component_type: ComponentType::F32,
            dimensions: Dimensions::Vec3,
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub fn primitive(topology: Topology, position: Option<usize>) -> Primitive {
    Primitive {
        topology,
        attributes: position
            .map(|p| vec![Attribute::new(Semantic::Position, p)])
            .unwrap_or_default(),
        ..Default::default()
    }
}

/// A node graph without geometry: `children[i]` lists the children of node `i`; `meshes` lists
/// the nodes given mesh 0.
pub fn graph(children: &[&[usize]], roots: &[usize], meshes: &[usize]) -> Document {
    let mut doc = float_document(&[0.0; 9]);
    doc.meshes.push(Mesh {
        name: None,
        primitives: vec![primitive(Topology::Triangles, Some(0))],
        weights: Vec::new(),
    });
    doc.nodes = children
        .iter()
        .enumerate()
        .map(|(i, c)| Node {
            children: c.to_vec(),
            mesh: meshes.contains(&i).then_some(0),
            transform: NodeTransform::default(),
            ..Default::default()
        })
        .collect();
    doc.scenes.push(Scene {
        name: None,
        nodes: roots.to_vec(),
    });
    doc
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spawned {
    pub id: usize,
    pub name: String,
    pub transform: Transform,
    pub geometry: Vec<(String, usize, GeometryBuffer)>,
}

/// Records every call instead of creating anything.
#[derive(Debug, Default)]
pub struct TestSpawner {
    pub spawned: Vec<Spawned>,
    pub released: Vec<usize>,
    pub missing_factory: bool,
}

impl Spawner for TestSpawner {
    type Factory = String;
    type Object = usize;

    fn resolve_factory(&mut self, collection: &str, factory: &str) -> Result<String, SpawnError> {
        match self.missing_factory {
            true => Err(SpawnError::FactoryNotFound(factory.to_owned())),
            false => Ok(format!("{collection}{factory}")),
        }
    }

    fn spawn(&mut self, _: &String, transform: &Transform, name: &str) -> Result<usize, SpawnError> {
        let id = self.spawned.len();
        self.spawned.push(Spawned {
            id,
            name: name.to_owned(),
            transform: *transform,
            geometry: Vec::new(),
        });
        Ok(id)
    }

    fn attach_geometry(
        &mut self,
        object: &usize,
        mesh: &str,
        primitive: usize,
        geometry: GeometryBuffer,
    ) -> Result<(), SpawnError> {
        let spawned = self
            .spawned
            .get_mut(*object)
            .ok_or_else(|| SpawnError::Host(format!("no object {object}")))?;
        spawned.geometry.push((mesh.to_owned(), primitive, geometry));
        Ok(())
    }

    fn release(&mut self, _: &String, object: usize) {
        self.released.push(object);
    }
}
