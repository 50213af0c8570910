use crate::config::model::{CropInsets, ReadOrder, SpriteConfig};
use crate::foundation::core::{ImageDimensions, Rect, Size};

/// Grid cell addressed by a linear frame index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

impl GridCell {
    /// Recover the cell for `index` under `order`. `None` for an empty grid.
    pub fn from_index(index: u32, rows: u32, cols: u32, order: ReadOrder) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self::locate(index, rows, cols, order))
    }

    fn locate(index: u32, rows: u32, cols: u32, order: ReadOrder) -> Self {
        match order {
            ReadOrder::RowMajor => Self {
                row: index / cols,
                col: index % cols,
            },
            ReadOrder::ColumnMajor => Self {
                row: index % rows,
                col: index / rows,
            },
        }
    }
}

/// Maps frame indices to source rectangles on one sheet.
///
/// Cells are a uniform `width / cols` by `height / rows`; sheets that do not divide evenly give
/// fractional cell edges, which are carried through as-is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameExtractor {
    rows: u32,
    cols: u32,
    order: ReadOrder,
    crop: CropInsets,
    cell: Size,
}

impl FrameExtractor {
    /// `None` when the grid or the sheet is empty.
    pub fn new(cfg: &SpriteConfig, dims: ImageDimensions) -> Option<Self> {
        if cfg.rows == 0 || cfg.cols == 0 || dims.is_empty() {
            return None;
        }
        Some(Self {
            rows: cfg.rows,
            cols: cfg.cols,
            order: cfg.read_order,
            crop: cfg.crop,
            cell: Size::new(
                f64::from(dims.width) / f64::from(cfg.cols),
                f64::from(dims.height) / f64::from(cfg.rows),
            ),
        })
    }

    /// Uncropped cell size.
    pub fn cell_size(&self) -> Size {
        self.cell
    }

    /// Cell size after insets, each edge at least one pixel.
    pub fn crop_size(&self) -> Size {
        let c = self.crop;
        Size::new(
            (self.cell.width - c.left - c.right).max(1.0),
            (self.cell.height - c.top - c.bottom).max(1.0),
        )
    }

    pub fn cell_of(&self, index: u32) -> GridCell {
        // rows/cols are non-zero by construction.
        GridCell::locate(index, self.rows, self.cols, self.order)
    }

    /// Cropped source rectangle of `index`, in sheet pixel space.
    pub fn source_rect(&self, index: u32) -> Rect {
        let cell = self.cell_of(index);
        let x = f64::from(cell.col) * self.cell.width + self.crop.left;
        let y = f64::from(cell.row) * self.cell.height + self.crop.top;
        Rect::from_origin_size((x, y), self.crop_size())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/extract/frame.rs"]
mod tests;
