//! Hands the current model off to the platform's native AR viewer.
//!
//! Android gets a Scene Viewer intent URL, iOS gets an AR Quick Look anchor,
//! Huawei devices are offered to a Harmony capability probe, and everything
//! else gets a notice. Side effects go through [`HandoffHost`] so the
//! decision logic runs without a browser.

pub mod handoff;
pub mod host;
pub mod platform;
pub mod quick_look;
pub mod scene_viewer;

pub use handoff::*;
pub use host::*;
pub use platform::*;
pub use quick_look::*;
pub use scene_viewer::*;
