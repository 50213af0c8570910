use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PreviewError, PreviewResult};
use crate::render::compositor::FrameRGBA;

pub fn ensure_parent_dir(path: &Path) -> PreviewResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write one composited frame as a PNG, creating parent directories as needed.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> PreviewResult<()> {
    if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
        return Err(PreviewError::export(format!(
            "frame buffer is {} bytes, expected {}x{} rgba8",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| PreviewError::export(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;
