//! Compositing a sheet frame into an output buffer.

pub mod compositor;
pub mod pipeline;
pub mod raster;
