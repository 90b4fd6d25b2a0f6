use foundation::bounds::Aabb3;
use foundation::math::Vec3;

use super::UnlitMaterial;

/// One drawable surface of a model, in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub material: UnlitMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let uvs = vec![[0.0, 0.0]; positions.len()];
        Self {
            positions,
            uvs,
            indices,
            material: UnlitMaterial::default(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn local_bounds(&self) -> Aabb3 {
        Aabb3::from_points(
            self.positions
                .iter()
                .map(|p| Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        )
    }
}
