pub use kurbo::{Point, Rect, Size};

/// Largest canvas edge, in pixels, the renderer will allocate.
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Sheet dimensions in pixels, as reported by the image collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Dimensions of a decoded RGBA image.
    pub fn of(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    /// Return `true` when either edge is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Size a canvas for a (possibly fractional) crop rectangle at `scale`.
    ///
    /// Each edge is `floor(edge * scale)`, clamped to at least one pixel. Returns `None` for a
    /// non-positive or non-finite scale, or when an edge would exceed [`MAX_CANVAS_DIM`].
    pub fn for_crop(crop: Size, scale: f64) -> Option<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let width = scaled_edge(crop.width, scale)?;
        let height = scaled_edge(crop.height, scale)?;
        Some(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

fn scaled_edge(edge: f64, scale: f64) -> Option<u32> {
    let v = (edge * scale).floor();
    if !v.is_finite() || v > f64::from(MAX_CANVAS_DIM) {
        return None;
    }
    Some((v as u32).max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
