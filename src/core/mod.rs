//! Core - math primitives and the crate error type

mod error;
mod vec2;

pub use error::EngineError;
pub use vec2::Vec2;
