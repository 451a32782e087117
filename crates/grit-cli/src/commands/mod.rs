//! CLI command implementations.

pub mod effects;
pub mod presets;
pub mod process;
