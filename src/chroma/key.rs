use crate::config::color::Rgb8;
use crate::config::model::SpriteConfig;

/// Squared length of the RGB cube diagonal, `255^2 * 3`.
pub const MAX_DIST_SQ: f64 = 255.0 * 255.0 * 3.0;

/// Content/background classifier for one tick.
///
/// With a key color, a pixel is content when its squared RGB distance to the key is strictly
/// greater than `(tolerance/100 * sqrt(MAX_DIST_SQ))^2`. Without one, any visible pixel is
/// content. Fully transparent pixels are always background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromaKey {
    key: Option<Rgb8>,
    threshold_sq: f64,
}

impl ChromaKey {
    /// Classify by alpha only.
    pub fn alpha_only() -> Self {
        Self {
            key: None,
            threshold_sq: 0.0,
        }
    }

    /// Key against `key`, `tolerance` in percent (clamped to `0..=100`).
    pub fn new(key: Rgb8, tolerance: f64) -> Self {
        let ratio = if tolerance.is_nan() {
            0.0
        } else {
            (tolerance / 100.0).clamp(0.0, 1.0)
        };
        Self {
            key: Some(key),
            // Squared directly so whole-percent tolerances land on exact thresholds.
            threshold_sq: ratio * ratio * MAX_DIST_SQ,
        }
    }

    pub fn from_config(cfg: &SpriteConfig) -> Self {
        match cfg.key_color() {
            Some(key) => Self::new(key, cfg.tolerance),
            None => Self::alpha_only(),
        }
    }

    pub fn key(&self) -> Option<Rgb8> {
        self.key
    }

    pub fn threshold_sq(&self) -> f64 {
        self.threshold_sq
    }

    /// Return `true` for a content pixel (straight-alpha RGBA).
    #[inline]
    pub fn is_content(&self, px: [u8; 4]) -> bool {
        if px[3] == 0 {
            return false;
        }
        let Some(key) = self.key else {
            return true;
        };
        let d2 = dist_sq(px, key);
        f64::from(d2) > self.threshold_sq
    }
}

#[inline]
fn dist_sq(px: [u8; 4], key: Rgb8) -> u32 {
    let dr = i32::from(px[0]) - i32::from(key.r);
    let dg = i32::from(px[1]) - i32::from(key.g);
    let db = i32::from(px[2]) - i32::from(key.b);
    (dr * dr + dg * dg + db * db) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/key.rs"]
mod tests;
