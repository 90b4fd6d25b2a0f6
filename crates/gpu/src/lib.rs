pub mod camera;
pub mod orbit;
pub mod renderer;

pub use camera::*;
pub use orbit::*;
pub use renderer::*;
