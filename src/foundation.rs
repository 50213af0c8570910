//! Shared primitives: geometry, dimensions, and the crate error type.

pub mod core;
pub mod error;
