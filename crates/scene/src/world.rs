use foundation::bounds::Aabb3;

use crate::components::{Mesh, Transform};
use crate::entity::EntityId;
use crate::model::Model;

/// Scene graph of the viewer: at most one model is attached at a time.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    active: Option<(EntityId, Model)>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `model`, returning the model it replaced, if any.
    pub fn attach(&mut self, model: Model) -> (EntityId, Option<Model>) {
        let id = EntityId(self.next_index);
        self.next_index += 1;
        let previous = self.active.replace((id, model)).map(|(_, m)| m);
        (id, previous)
    }

    pub fn detach(&mut self) -> Option<Model> {
        self.active.take().map(|(_, m)| m)
    }

    pub fn active(&self) -> Option<&Model> {
        self.active.as_ref().map(|(_, m)| m)
    }

    pub fn active_entity(&self) -> Option<EntityId> {
        self.active.as_ref().map(|(id, _)| *id)
    }

    pub fn model_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn world_bounds(&self) -> Option<Aabb3> {
        self.active().map(Model::world_bounds)
    }

    pub fn meshes(&self) -> Vec<(EntityId, Transform, &Mesh)> {
        let Some((id, model)) = &self.active else {
            return Vec::new();
        };
        model
            .meshes
            .iter()
            .map(|mesh| (*id, model.transform, mesh))
            .collect()
    }
}
