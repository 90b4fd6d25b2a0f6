use scene::components::TextureImage;

/// Material as authored in the source file. The viewer only keeps part of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SourceMaterial {
    pub base_color: [f32; 4],
    /// Index into `ModelAsset::textures`.
    pub base_color_texture: Option<usize>,
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub double_sided: bool,
}

impl Default for SourceMaterial {
    fn default() -> Self {
        // glTF default material.
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic: 1.0,
            roughness: 1.0,
            emissive: [0.0, 0.0, 0.0],
            double_sided: false,
        }
    }
}

/// Triangle list with node transforms already baked into the positions.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMesh {
    pub name: Option<String>,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    /// Index into `ModelAsset::materials`; `None` means the default material.
    pub material: Option<usize>,
}

/// Renderer-neutral result of parsing a model file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAsset {
    pub meshes: Vec<AssetMesh>,
    pub materials: Vec<SourceMaterial>,
    pub textures: Vec<TextureImage>,
}

impl ModelAsset {
    pub fn material_for(&self, mesh: &AssetMesh) -> SourceMaterial {
        mesh.material
            .and_then(|idx| self.materials.get(idx).copied())
            .unwrap_or_default()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }
}
