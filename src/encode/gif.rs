use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::still::ensure_parent_dir;
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::render::compositor::FrameRGBA;

/// Per-frame delay for a loop played at `fps`.
pub fn frame_delay(fps: f64) -> PreviewResult<Duration> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(PreviewError::validation("gif fps must be finite and > 0"));
    }
    Ok(Duration::from_secs_f64(1.0 / fps))
}

/// Encode `frames` as an infinitely repeating animated GIF into `out`.
///
/// All frames must share the first frame's dimensions.
pub fn encode_gif<'a, W, I>(frames: I, fps: f64, out: W) -> PreviewResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a FrameRGBA>,
{
    let delay = Delay::from_saturating_duration(frame_delay(fps)?);
    let mut enc = GifEncoder::new(out);
    enc.set_repeat(Repeat::Infinite)
        .map_err(|e| PreviewError::export(format!("gif repeat: {e}")))?;

    let mut size = None;
    let mut written = 0usize;
    for frame in frames {
        let dims = (frame.width, frame.height);
        match size {
            None => size = Some(dims),
            Some(first) if first != dims => {
                return Err(PreviewError::export(format!(
                    "gif frame {written} is {}x{}, expected {}x{}",
                    dims.0, dims.1, first.0, first.1
                )));
            }
            Some(_) => {}
        }
        let img = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| PreviewError::export(format!("gif frame {written} buffer size")))?;
        enc.encode_frame(Frame::from_parts(img, 0, 0, delay))
            .map_err(|e| PreviewError::export(format!("encode gif frame {written}: {e}")))?;
        written += 1;
    }

    if written == 0 {
        return Err(PreviewError::export("gif needs at least one frame"));
    }
    Ok(written)
}

/// Encode and write an animated GIF to `path`.
pub fn write_gif<'a, I>(frames: I, fps: f64, path: &Path) -> PreviewResult<usize>
where
    I: IntoIterator<Item = &'a FrameRGBA>,
{
    let mut buf = Vec::new();
    let written = encode_gif(frames, fps, &mut buf)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, &buf).with_context(|| format!("write gif '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), frames = written, "wrote gif");
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
