pub mod components;
pub mod entity;
pub mod model;
pub mod world;

pub use model::*;
pub use world::*;
