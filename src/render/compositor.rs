use image::RgbaImage;

use crate::align::bbox::{ContentBounds, aligned_dest, find_content_bounds};
use crate::chroma::key::ChromaKey;
use crate::config::model::SpriteConfig;
use crate::extract::frame::FrameExtractor;
use crate::foundation::core::{Canvas, ImageDimensions, Rect};
use crate::render::raster::{BlitMode, Rasterize, blit_nearest, fill};

/// A composited preview frame as straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

/// Why a tick produced no output buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleReason {
    NoImage,
    EmptySheet,
    EmptySequence,
    InvalidFps,
    InvalidScale,
    /// A crop inset is negative or non-finite.
    InvalidCrop,
    CanvasTooLarge,
}

/// Result of compositing one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// The frame was drawn into a fresh buffer.
    Drawn(FrameRGBA),
    /// The buffer was sized and cleared, but auto-align found no content to draw.
    Cleared(FrameRGBA),
    /// Degenerate inputs; nothing was allocated.
    Idle(IdleReason),
}

impl RenderOutcome {
    pub fn frame(&self) -> Option<&FrameRGBA> {
        match self {
            Self::Drawn(f) | Self::Cleared(f) => Some(f),
            Self::Idle(_) => None,
        }
    }

    pub fn into_frame(self) -> Option<FrameRGBA> {
        match self {
            Self::Drawn(f) | Self::Cleared(f) => Some(f),
            Self::Idle(_) => None,
        }
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// Size of the output canvas for `cfg` on a sheet of `dims`, if renderable.
pub fn canvas_for(cfg: &SpriteConfig, dims: ImageDimensions) -> Result<Canvas, IdleReason> {
    prepare(cfg, dims).map(|p| p.canvas)
}

struct Prepared {
    extractor: FrameExtractor,
    canvas: Canvas,
    /// 1:1 inspection buffer size; present only with auto-align.
    scratch: Option<Canvas>,
}

fn prepare(cfg: &SpriteConfig, dims: ImageDimensions) -> Result<Prepared, IdleReason> {
    let extractor = FrameExtractor::new(cfg, dims).ok_or(IdleReason::EmptySheet)?;
    if !cfg.crop.is_valid() {
        return Err(IdleReason::InvalidCrop);
    }
    if !cfg.scale.is_finite() || cfg.scale <= 0.0 {
        return Err(IdleReason::InvalidScale);
    }
    let crop = extractor.crop_size();
    let canvas = Canvas::for_crop(crop, cfg.scale).ok_or(IdleReason::CanvasTooLarge)?;
    // The inspection buffer is unscaled, so it gets its own edge check.
    let scratch = if cfg.auto_align {
        Some(Canvas::for_crop(crop, 1.0).ok_or(IdleReason::CanvasTooLarge)?)
    } else {
        None
    };
    Ok(Prepared {
        extractor,
        canvas,
        scratch,
    })
}

/// Composite sheet frame `index` into a new canvas.
///
/// Without a key color the canvas is flattened onto `cfg.matte`; with one it stays transparent.
/// With `auto_align`, only the content bounding box is drawn, placed per `cfg.align_mode`;
/// otherwise the whole cropped cell is drawn at the origin. Sampling is nearest-neighbour.
pub fn render_frame<S: Rasterize + ?Sized>(
    sheet: &S,
    dims: ImageDimensions,
    cfg: &SpriteConfig,
    index: u32,
) -> RenderOutcome {
    render_frame_keyed(sheet, dims, cfg, &ChromaKey::from_config(cfg), index)
}

/// [`render_frame`] with the key already resolved from `cfg`.
///
/// Callers rendering many ticks of one config resolve the key once and pass it here.
#[tracing::instrument(level = "trace", skip(sheet, cfg, key))]
pub fn render_frame_keyed<S: Rasterize + ?Sized>(
    sheet: &S,
    dims: ImageDimensions,
    cfg: &SpriteConfig,
    key: &ChromaKey,
    index: u32,
) -> RenderOutcome {
    let Prepared {
        extractor,
        canvas,
        scratch,
    } = match prepare(cfg, dims) {
        Ok(p) => p,
        Err(reason) => return RenderOutcome::Idle(reason),
    };
    let src = extractor.source_rect(index);

    let mut out = RgbaImage::new(canvas.width, canvas.height);
    if key.key().is_none() {
        fill(&mut out, cfg.matte.to_rgba(255));
    }

    let Some(scratch) = scratch else {
        let dst = Rect::from_origin_size(
            (0.0, 0.0),
            (src.width() * cfg.scale, src.height() * cfg.scale),
        );
        blit_nearest(&mut out, sheet, src, dst, BlitMode::Over);
        return RenderOutcome::Drawn(FrameRGBA::from_image(out));
    };

    let Some(bounds) = inspect_frame(sheet, src, scratch, key) else {
        tracing::debug!(index, "auto-align found no content; skipping draw");
        return RenderOutcome::Cleared(FrameRGBA::from_image(out));
    };
    let dst = aligned_dest(bounds, canvas, cfg.scale, cfg.align_mode);
    blit_nearest(
        &mut out,
        sheet,
        bounds.source_rect(src),
        dst,
        BlitMode::Over,
    );
    RenderOutcome::Drawn(FrameRGBA::from_image(out))
}

/// Rasterize the frame region and locate its content.
///
/// The scratch buffer lives only for this call.
fn inspect_frame<S: Rasterize + ?Sized>(
    sheet: &S,
    src: Rect,
    scratch: Canvas,
    key: &ChromaKey,
) -> Option<ContentBounds> {
    let buf = sheet.rasterize(src, scratch.width, scratch.height);
    find_content_bounds(&buf, key)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
