use image::RgbaImage;

use crate::chroma::key::ChromaKey;
use crate::config::model::AlignMode;
use crate::foundation::core::{Canvas, Rect};

/// Inclusive pixel bounds of the content found in a frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl ContentBounds {
    pub fn width(self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// The bounds as a rectangle in `frame` space, offset by the frame origin.
    pub fn source_rect(self, frame: Rect) -> Rect {
        Rect::from_origin_size(
            (
                frame.x0 + f64::from(self.min_x),
                frame.y0 + f64::from(self.min_y),
            ),
            (f64::from(self.width()), f64::from(self.height())),
        )
    }
}

/// Scan every pixel of `frame` and return the tight bounds of its content pixels.
///
/// `None` when nothing in the buffer classifies as content.
pub fn find_content_bounds(frame: &RgbaImage, key: &ChromaKey) -> Option<ContentBounds> {
    let mut bounds: Option<ContentBounds> = None;

    for (x, y, px) in frame.enumerate_pixels() {
        if !key.is_content(px.0) {
            continue;
        }
        bounds = Some(match bounds {
            None => ContentBounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => ContentBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    bounds
}

/// Destination rectangle for drawing `bounds` at `scale` on `canvas`.
///
/// Horizontally the box is always centered (floored). Vertically, `Bottom` puts the box flush with
/// the bottom edge; every other mode centers it.
pub fn aligned_dest(bounds: ContentBounds, canvas: Canvas, scale: f64, mode: AlignMode) -> Rect {
    let w = f64::from(bounds.width()) * scale;
    let h = f64::from(bounds.height()) * scale;
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);

    let x = ((cw - w) / 2.0).floor();
    let y = match mode {
        AlignMode::Bottom => ch - h,
        AlignMode::Center | AlignMode::Other => ((ch - h) / 2.0).floor(),
    };
    Rect::from_origin_size((x, y), (w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/align/bbox.rs"]
mod tests;
