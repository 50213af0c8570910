use image::RgbaImage;

use crate::foundation::core::Rect;

/// Pixel access to a decoded sheet.
///
/// This is the narrow contract the preview needs from the image collaborator: point sampling
/// plus copying an arbitrary (possibly fractional) source rectangle into an addressable buffer.
pub trait Rasterize {
    fn dimensions(&self) -> (u32, u32);

    /// Straight-alpha RGBA at `(x, y)`, `None` outside the image.
    fn sample(&self, x: i64, y: i64) -> Option<[u8; 4]>;

    /// Copy `src` into a fresh `width x height` buffer, nearest-neighbour.
    ///
    /// Source pixels outside the image come back fully transparent.
    fn rasterize(&self, src: Rect, width: u32, height: u32) -> RgbaImage {
        let mut out = RgbaImage::new(width, height);
        let dst = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        blit_nearest(&mut out, self, src, dst, BlitMode::Copy);
        out
    }
}

impl Rasterize for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    #[inline]
    fn sample(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        let (w, h) = RgbaImage::dimensions(self);
        if x < 0 || y < 0 || x >= i64::from(w) || y >= i64::from(h) {
            return None;
        }
        Some(self.get_pixel(x as u32, y as u32).0)
    }
}

impl<T: Rasterize + ?Sized> Rasterize for std::sync::Arc<T> {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn sample(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        (**self).sample(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlitMode {
    /// Overwrite destination pixels.
    Copy,
    /// Straight-alpha source-over.
    Over,
}

/// Draw `src` (sheet space) into `dst` (canvas space) with nearest-neighbour sampling.
///
/// A canvas pixel is covered when its center lies inside `dst`; it samples the source pixel
/// under the proportionally mapped center. Coverage is clipped to the canvas and samples outside
/// the source image are skipped.
pub fn blit_nearest<S: Rasterize + ?Sized>(
    canvas: &mut RgbaImage,
    src: &S,
    src_rect: Rect,
    dst_rect: Rect,
    mode: BlitMode,
) {
    let (cw, ch) = canvas.dimensions();
    let dw = dst_rect.width();
    let dh = dst_rect.height();
    if cw == 0 || ch == 0 || !(dw.is_finite() && dw > 0.0) || !(dh.is_finite() && dh > 0.0) {
        return;
    }
    let sx_scale = src_rect.width() / dw;
    let sy_scale = src_rect.height() / dh;

    let Some((x_lo, x_hi)) = covered_span(dst_rect.x0, dst_rect.x1, cw) else {
        return;
    };
    let Some((y_lo, y_hi)) = covered_span(dst_rect.y0, dst_rect.y1, ch) else {
        return;
    };

    for y in y_lo..y_hi {
        let cy = f64::from(y) + 0.5;
        let sy = (src_rect.y0 + (cy - dst_rect.y0) * sy_scale).floor() as i64;
        for x in x_lo..x_hi {
            let cx = f64::from(x) + 0.5;
            let sx = (src_rect.x0 + (cx - dst_rect.x0) * sx_scale).floor() as i64;
            let Some(px) = src.sample(sx, sy) else {
                continue;
            };
            let d = canvas.get_pixel_mut(x, y);
            d.0 = match mode {
                BlitMode::Copy => px,
                BlitMode::Over => over_straight(d.0, px),
            };
        }
    }
}

/// Canvas pixels `[lo, hi)` along one axis whose centers fall in `[a, b)`.
fn covered_span(a: f64, b: f64, len: u32) -> Option<(u32, u32)> {
    // center x+0.5 >= a  <=>  x >= a-0.5
    let lo = (a - 0.5).ceil().max(0.0);
    let hi = (b - 0.5).ceil().min(f64::from(len));
    if lo >= hi {
        return None;
    }
    Some((lo as u32, hi as u32))
}

/// Straight-alpha source-over.
pub fn over_straight(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let da_inv = (da * (255 - sa) + 127) / 255;
    let out_a = sa + da_inv;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa + u32::from(dst[i]) * da_inv;
        out[i] = ((c + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

/// Fill every pixel with `rgba`.
pub fn fill(canvas: &mut RgbaImage, rgba: [u8; 4]) {
    for px in canvas.pixels_mut() {
        px.0 = rgba;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
