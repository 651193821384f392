/// A node's local transform as authored.
///
/// Each TRS component is `Some` only if the asset specified it. `matrix` is mutually exclusive
/// with the TRS components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeTransform {
    pub translation: Option<[f32; 3]>,
    /// Unit quaternion, (x, y, z, w).
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    /// Column-major 4x4 matrix.
    pub matrix: Option<[f32; 16]>,
}

impl NodeTransform {
    #[inline]
    pub fn has_translation(&self) -> bool {
        self.translation.is_some()
    }

    #[inline]
    pub fn has_rotation(&self) -> bool {
        self.rotation.is_some()
    }

    #[inline]
    pub fn has_scale(&self) -> bool {
        self.scale.is_some()
    }

    #[inline]
    pub fn has_matrix(&self) -> bool {
        self.matrix.is_some()
    }
}

/// An object within a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub transform: NodeTransform,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub camera: Option<usize>,
    pub light: Option<usize>,
    pub children: Vec<usize>,
}

/// A set of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}
