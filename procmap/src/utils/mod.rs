//! Utility functions for the application

pub mod encoding;
pub mod file;
pub mod otlp;
pub mod time;
