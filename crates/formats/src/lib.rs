pub mod asset;
pub mod glb;
pub mod load_error;
pub mod progress;

pub use asset::*;
pub use glb::*;
pub use load_error::*;
pub use progress::*;
