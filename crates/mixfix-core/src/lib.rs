//! Mixfix Core - Shared library for the Mix Fix multi-track player

pub mod analysis;
pub mod decode;
pub mod engine;
pub mod error;
pub mod loader;
pub mod output;
pub mod types;

pub use types::*;
