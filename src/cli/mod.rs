//! CLI command handling

pub mod render;
pub mod serve;

pub use render::*;
pub use serve::*;
