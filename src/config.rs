//! Sprite sheet configuration and its JSON form.

pub mod color;
pub mod model;
