use foundation::bounds::Aabb3;
use foundation::ids::ModelId;

use crate::components::{Mesh, TextureImage, Transform};

/// A loaded model ready to be attached to the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub id: ModelId,
    pub meshes: Vec<Mesh>,
    pub textures: Vec<TextureImage>,
    pub transform: Transform,
}

impl Model {
    pub fn new(id: ModelId, meshes: Vec<Mesh>, textures: Vec<TextureImage>) -> Self {
        Self {
            id,
            meshes,
            textures,
            transform: Transform::identity(),
        }
    }

    pub fn local_bounds(&self) -> Aabb3 {
        self.meshes
            .iter()
            .fold(Aabb3::empty(), |acc, m| acc.union(&m.local_bounds()))
    }

    /// Bounds in scene space, after the model's transform.
    pub fn world_bounds(&self) -> Aabb3 {
        self.local_bounds()
            .scaled_then_translated(self.transform.scale, self.transform.position)
    }
}

#[cfg(test)]
mod tests {
    use super::Model;
    use crate::components::{Mesh, Transform};
    use foundation::ids::ModelId;
    use foundation::math::Vec3;

    #[test]
    fn world_bounds_follow_transform() {
        let mesh = Mesh::new(vec![[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]], vec![]);
        let mut model = Model::new(ModelId::new("Cube").expect("id"), vec![mesh], vec![]);
        model.transform = Transform {
            position: Vec3::new(0.0, 2.0, 0.0),
            scale: 2.0,
        };
        let b = model.world_bounds();
        assert_eq!(b.min, Vec3::new(-2.0, 0.0, -2.0));
        assert_eq!(b.max, Vec3::new(2.0, 4.0, 2.0));
    }
}
