//! Domain logic for process metrics remapping
//!
//! - `process` - per-batch extraction, projection and emission
//! - `remapper` - walks an export and remaps process scraper scopes

pub mod process;
pub mod remapper;

pub use remapper::{RemapConfig, RemapStats, Remapper};
