use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::{PreviewError, PreviewResult};

/// Decode encoded sheet bytes into straight-alpha RGBA8.
///
/// Any format the `image` crate can sniff is accepted. Empty images are rejected.
pub fn decode_sheet(bytes: &[u8]) -> PreviewResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode sheet from memory")?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(PreviewError::decode("sheet image has a zero dimension"));
    }
    Ok(rgba)
}

/// Read and decode a sheet from disk.
pub fn load_sheet(path: &Path) -> PreviewResult<RgbaImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read sheet '{}'", path.display()))?;
    let sheet = decode_sheet(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = sheet.width(),
        height = sheet.height(),
        "loaded sheet"
    );
    Ok(sheet)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
