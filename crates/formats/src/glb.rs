use glam::{Mat4, Vec3};
use gltf::Gltf;
use scene::components::TextureImage;

use crate::asset::{AssetMesh, ModelAsset, SourceMaterial};

#[derive(Debug)]
pub enum GlbError {
    Parse(gltf::Error),
    MissingBinaryChunk,
    /// GLB files served to the viewer must be self-contained.
    ExternalResource { uri: String },
    NoScene,
    MissingPositions { mesh: usize },
    BufferOutOfRange { view: usize },
    ImageDecode { image: usize, source: image::ImageError },
}

impl std::fmt::Display for GlbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlbError::Parse(e) => write!(f, "invalid glTF: {e}"),
            GlbError::MissingBinaryChunk => write!(f, "GLB has no binary chunk"),
            GlbError::ExternalResource { uri } => {
                write!(f, "external resource {uri} is not supported")
            }
            GlbError::NoScene => write!(f, "glTF document has no scene"),
            GlbError::MissingPositions { mesh } => write!(f, "mesh {mesh} has no positions"),
            GlbError::BufferOutOfRange { view } => {
                write!(f, "buffer view {view} is outside its buffer")
            }
            GlbError::ImageDecode { image, source } => {
                write!(f, "failed to decode image {image}: {source}")
            }
        }
    }
}

impl std::error::Error for GlbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlbError::Parse(e) => Some(e),
            GlbError::ImageDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parses a binary glTF file.
///
/// Node transforms of the default scene are baked into mesh positions, so
/// the result can be placed with a single model transform.
pub fn parse_glb(bytes: &[u8]) -> Result<ModelAsset, GlbError> {
    let gltf = Gltf::from_slice(bytes).map_err(GlbError::Parse)?;
    let buffers = load_buffers(&gltf)?;
    let textures = decode_textures(&gltf, &buffers)?;
    let materials = gltf.materials().map(convert_material).collect();

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(GlbError::NoScene)?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
    }

    let asset = ModelAsset {
        meshes,
        materials,
        textures,
    };
    log::debug!(
        "parsed glb: {} meshes, {} vertices, {} materials, {} textures",
        asset.meshes.len(),
        asset.vertex_count(),
        asset.materials.len(),
        asset.textures.len()
    );
    Ok(asset)
}

fn load_buffers(gltf: &Gltf) -> Result<Vec<Vec<u8>>, GlbError> {
    let mut data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().ok_or(GlbError::MissingBinaryChunk)?;
                data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                return Err(GlbError::ExternalResource {
                    uri: uri.to_string(),
                });
            }
        }
    }
    Ok(data)
}

fn view_bytes<'b>(
    view: &gltf::buffer::View<'_>,
    buffers: &'b [Vec<u8>],
) -> Result<&'b [u8], GlbError> {
    let out_of_range = || GlbError::BufferOutOfRange {
        view: view.index(),
    };
    let buffer = buffers.get(view.buffer().index()).ok_or_else(out_of_range)?;
    let end = view
        .offset()
        .checked_add(view.length())
        .ok_or_else(out_of_range)?;
    buffer.get(view.offset()..end).ok_or_else(out_of_range)
}

/// One decoded image per glTF texture, indexed like `gltf.textures()`.
fn decode_textures(gltf: &Gltf, buffers: &[Vec<u8>]) -> Result<Vec<TextureImage>, GlbError> {
    let mut decoded: Vec<Option<TextureImage>> = vec![None; gltf.images().len()];
    let mut textures = Vec::with_capacity(gltf.textures().len());

    for texture in gltf.textures() {
        let source = texture.source();
        let idx = source.index();
        if decoded[idx].is_none() {
            decoded[idx] = Some(decode_image(&source, buffers)?);
        }
        if let Some(img) = &decoded[idx] {
            textures.push(img.clone());
        }
    }
    Ok(textures)
}

fn decode_image(img: &gltf::Image<'_>, buffers: &[Vec<u8>]) -> Result<TextureImage, GlbError> {
    let (bytes, mime_type) = match img.source() {
        gltf::image::Source::View { view, mime_type } => (view_bytes(&view, buffers)?, mime_type),
        gltf::image::Source::Uri { uri, .. } => {
            return Err(GlbError::ExternalResource {
                uri: uri.to_string(),
            });
        }
    };

    let decode_err = |source| GlbError::ImageDecode {
        image: img.index(),
        source,
    };
    let dynamic = match mime_type {
        "image/png" => image::load_from_memory_with_format(bytes, image::ImageFormat::Png),
        "image/jpeg" => image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg),
        _ => image::load_from_memory(bytes),
    }
    .map_err(decode_err)?;

    let rgba = dynamic.to_rgba8();
    Ok(TextureImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

fn convert_material(material: gltf::Material<'_>) -> SourceMaterial {
    let pbr = material.pbr_metallic_roughness();
    SourceMaterial {
        base_color: pbr.base_color_factor(),
        base_color_texture: pbr.base_color_texture().map(|info| info.texture().index()),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        emissive: material.emissive_factor(),
        double_sided: material.double_sided(),
    }
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<AssetMesh>,
) -> Result<(), GlbError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!(
                    "skipping non-triangle primitive in mesh {}",
                    mesh.index()
                );
                continue;
            }
            let reader = primitive.reader(|b| buffers.get(b.index()).map(Vec::as_slice));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or(GlbError::MissingPositions { mesh: mesh.index() })?
                .map(|p| world.transform_point3(Vec3::from(p)).to_array())
                .collect();
            let uvs = match reader.read_tex_coords(0) {
                Some(coords) => coords.into_f32().collect(),
                None => vec![[0.0, 0.0]; positions.len()],
            };
            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            out.push(AssetMesh {
                name: mesh.name().map(str::to_string),
                positions,
                uvs,
                indices,
                material: primitive.material().index(),
            });
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{GlbError, parse_glb};
    use pretty_assertions::assert_eq;

    const CHUNK_JSON: u32 = 0x4E4F_534A;
    const CHUNK_BIN: u32 = 0x004E_4942;

    fn pad(mut bytes: Vec<u8>, fill: u8) -> Vec<u8> {
        while bytes.len() % 4 != 0 {
            bytes.push(fill);
        }
        bytes
    }

    pub(crate) fn build_glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let json = pad(json.as_bytes().to_vec(), b' ');
        let bin = pad(bin.to_vec(), 0);
        let total = 12 + 8 + json.len() + if bin.is_empty() { 0 } else { 8 + bin.len() };

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json);
        if !bin.is_empty() {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            out.extend_from_slice(&bin);
        }
        out
    }

    /// Box spanning `min..max` as 8 corners and 12 triangles.
    fn box_glb(min: [f32; 3], max: [f32; 3], translation: [f32; 3]) -> Vec<u8> {
        let mut bin = Vec::new();
        for i in 0..8u32 {
            let x = if i & 1 == 0 { min[0] } else { max[0] };
            let y = if i & 2 == 0 { min[1] } else { max[1] };
            let z = if i & 4 == 0 { min[2] } else { max[2] };
            for v in [x, y, z] {
                bin.extend_from_slice(&v.to_le_bytes());
            }
        }
        let indices: [u16; 36] = [
            0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1, 2, 3, 7, 2, 7, 6, 0, 2, 6, 0,
            6, 4, 1, 5, 7, 1, 7, 3,
        ];
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        let json = format!(
            r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": [{{"mesh": 0, "translation": [{}, {}, {}]}}],
  "meshes": [{{"name": "box", "primitives": [{{"attributes": {{"POSITION": 0}}, "indices": 1, "material": 0}}]}}],
  "materials": [{{"pbrMetallicRoughness": {{"baseColorFactor": [0.5, 0.25, 1.0, 1.0]}}}}],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3",
      "min": [{}, {}, {}], "max": [{}, {}, {}]}},
    {{"bufferView": 1, "componentType": 5123, "count": 36, "type": "SCALAR"}}
  ],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 96, "target": 34962}},
    {{"buffer": 0, "byteOffset": 96, "byteLength": 72, "target": 34963}}
  ],
  "buffers": [{{"byteLength": {}}}]
}}"#,
            translation[0],
            translation[1],
            translation[2],
            min[0],
            min[1],
            min[2],
            max[0],
            max[1],
            max[2],
            bin.len()
        );
        build_glb(&json, &bin)
    }

    #[test]
    fn parses_box_and_bakes_node_translation() {
        let bytes = box_glb([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [2.0, 0.0, 0.0]);
        let asset = parse_glb(&bytes).expect("parse");

        assert_eq!(asset.meshes.len(), 1);
        assert_eq!(asset.vertex_count(), 8);
        let mesh = &asset.meshes[0];
        assert_eq!(mesh.name.as_deref(), Some("box"));
        assert_eq!(mesh.positions.len(), 8);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.uvs.len(), 8);
        assert_eq!(mesh.positions[0], [1.0, -1.0, -1.0]);
        assert_eq!(mesh.positions[7], [3.0, 1.0, 1.0]);
    }

    #[test]
    fn keeps_base_color_of_source_material() {
        let bytes = box_glb([0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [0.0, 0.0, 0.0]);
        let asset = parse_glb(&bytes).expect("parse");
        let material = asset.material_for(&asset.meshes[0]);
        assert_eq!(material.base_color, [0.5, 0.25, 1.0, 1.0]);
        assert_eq!(material.base_color_texture, None);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_glb(b"definitely not a model").expect_err("must fail");
        assert!(matches!(err, GlbError::Parse(_)));
    }

    #[test]
    fn external_buffers_are_rejected() {
        let json = r#"{
  "asset": {"version": "2.0"},
  "buffers": [{"byteLength": 4, "uri": "mesh.bin"}],
  "scenes": [{"nodes": []}]
}"#;
        let err = parse_glb(&build_glb(json, &[])).expect_err("must fail");
        assert!(matches!(err, GlbError::ExternalResource { uri } if uri == "mesh.bin"));
    }

    #[test]
    fn image_view_past_address_space_is_out_of_range() {
        let json = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": []}],
  "buffers": [{"byteLength": 8}],
  "bufferViews": [{"buffer": 0, "byteOffset": 18446744073709551615, "byteLength": 8}],
  "images": [{"bufferView": 0, "mimeType": "image/png"}],
  "textures": [{"source": 0}]
}"#;
        let err = parse_glb(&build_glb(json, &[0u8; 8])).expect_err("must fail");
        assert!(matches!(err, GlbError::BufferOutOfRange { view: 0 }));
    }

    #[test]
    fn document_without_scene_is_rejected() {
        let json = r#"{"asset": {"version": "2.0"}}"#;
        let err = parse_glb(&build_glb(json, &[])).expect_err("must fail");
        assert!(matches!(err, GlbError::NoScene));
    }
}
