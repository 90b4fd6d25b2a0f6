use scene::World;
use scene::components::UnlitMaterial;
use scene::entity::EntityId;

use crate::camera::Camera3D;

/// Background of the viewer (`#632c22`).
pub const DEFAULT_CLEAR_COLOR: [f64; 3] = [
    0x63 as f64 / 255.0,
    0x2c as f64 / 255.0,
    0x22 as f64 / 255.0,
];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawMesh {
    pub entity: EntityId,
    /// Index of the mesh within the attached model.
    pub mesh_index: usize,
    pub model_matrix: [[f32; 4]; 4],
    pub material: UnlitMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub view_proj: [[f32; 4]; 4],
    pub clear_color: [f64; 3],
    pub commands: Vec<DrawMesh>,
}

pub struct Renderer;

impl Renderer {
    pub fn collect(world: &World, camera: &Camera3D, clear_color: [f64; 3]) -> RenderFrame {
        let commands = world
            .meshes()
            .into_iter()
            .enumerate()
            .map(|(mesh_index, (entity, transform, mesh))| DrawMesh {
                entity,
                mesh_index,
                model_matrix: transform.to_cols_array_2d(),
                material: mesh.material,
                cast_shadow: mesh.cast_shadow,
                receive_shadow: mesh.receive_shadow,
            })
            .collect();

        RenderFrame {
            view_proj: camera.view_proj(),
            clear_color,
            commands,
        }
    }
}
