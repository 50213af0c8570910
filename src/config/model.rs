use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::color::{Rgb8, resolve_key_color};
use crate::foundation::error::{PreviewError, PreviewResult};

/// How a linear frame index maps onto the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadOrder {
    /// Left to right, then top to bottom.
    #[default]
    #[serde(alias = "row", alias = "rows")]
    RowMajor,
    /// Top to bottom, then left to right.
    #[serde(alias = "column", alias = "col", alias = "columns")]
    ColumnMajor,
}

/// Vertical placement of the auto-aligned content box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    #[default]
    Center,
    /// Content bottom flush with the canvas bottom edge.
    Bottom,
    /// Any unrecognized mode string; aligned like `Center`.
    #[serde(other)]
    Other,
}

/// Per-side insets, in source pixels, trimmed from every cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropInsets {
    /// Return `true` when every inset is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Preview configuration for one sprite sheet.
///
/// Field names follow the editor's JSON (`totalFrames`, `excludedFrames`, `readOrder`, ...).
/// Values are taken as supplied; [`SpriteConfig::validate`] reports precondition violations
/// and the renderer treats them as "draw nothing".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpriteConfig {
    pub rows: u32,
    pub cols: u32,
    /// Defaults to `rows * cols` when absent.
    pub total_frames: Option<u32>,
    pub excluded_frames: BTreeSet<u32>,
    pub read_order: ReadOrder,
    pub crop: CropInsets,
    pub scale: f64,
    pub fps: f64,
    /// Raw chroma key color. Resolved lazily by [`SpriteConfig::key_color`].
    pub transparent: Option<String>,
    /// Key tolerance in percent of the maximum RGB distance.
    pub tolerance: f64,
    pub auto_align: bool,
    pub align_mode: AlignMode,
    /// Fill used to flatten transparency when no key color is configured.
    pub matte: Rgb8,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            total_frames: None,
            excluded_frames: BTreeSet::new(),
            read_order: ReadOrder::RowMajor,
            crop: CropInsets::default(),
            scale: 1.0,
            fps: 12.0,
            transparent: None,
            tolerance: 0.0,
            auto_align: false,
            align_mode: AlignMode::Center,
            matte: Rgb8::BLACK,
        }
    }
}

impl SpriteConfig {
    /// A `rows x cols` grid with every other field defaulted.
    pub fn grid(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PreviewResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PreviewError::serde(format!("parse sprite config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PreviewError::validation(format!("open sprite config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Number of addressable frames, `rows * cols` unless overridden.
    pub fn total_frames(&self) -> u32 {
        let cells = self.rows.saturating_mul(self.cols);
        self.total_frames.unwrap_or(cells)
    }

    /// The resolved chroma key, or `None` if unset or unparseable.
    pub fn key_color(&self) -> Option<Rgb8> {
        resolve_key_color(self.transparent.as_deref())
    }

    /// Check the preconditions the preview pipeline relies on.
    pub fn validate(&self) -> PreviewResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(PreviewError::validation("rows and cols must be >= 1"));
        }
        let cells = u64::from(self.rows) * u64::from(self.cols);
        if u64::from(self.total_frames()) > cells {
            return Err(PreviewError::validation(format!(
                "totalFrames ({}) must be <= rows * cols ({cells})",
                self.total_frames()
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PreviewError::validation("scale must be > 0"));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(PreviewError::validation("fps must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.tolerance) {
            return Err(PreviewError::validation("tolerance must be within 0..=100"));
        }
        if !self.crop.is_valid() {
            return Err(PreviewError::validation("crop insets must be finite and >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
