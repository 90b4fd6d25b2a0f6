pub mod material;
pub mod mesh;
pub mod transform;

pub use material::*;
pub use mesh::*;
pub use transform::*;
