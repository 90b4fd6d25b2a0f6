pub mod config;
pub mod viewer;

pub use config::*;
pub use viewer::*;
