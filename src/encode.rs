//! Writing rendered frames to PNG and animated GIF.

pub mod gif;
pub mod still;
