//! sprite-preview animates a sprite sheet: a grid of frames in one image.
//!
//! # Pipeline overview
//!
//! 1. **Index**: `SpriteConfig -> FrameSequence` (valid sheet frame indices, in read order)
//! 2. **Schedule**: `absolute time -> FramePick` (`floor(t_ms / (1000 / fps)) mod len`)
//! 3. **Extract**: `frame index -> source Rect` (grid cell minus crop insets)
//! 4. **Render**: `source Rect -> FrameRGBA` (nearest-neighbour, optional chroma key and
//!    bounding-box auto-alignment)
//!
//! [`PreviewLoop`] drives these steps one tick per display refresh. [`render_at`] and
//! [`render_loop`] are the stateless counterparts used for export.
//!
//! All pixel data is straight-alpha RGBA8.
#![forbid(unsafe_code)]

pub mod align;
pub mod assets;
pub mod chroma;
pub mod config;
pub mod encode;
pub mod extract;
pub mod foundation;
pub mod playback;
pub mod render;
pub mod sequence;

pub use align::bbox::{ContentBounds, aligned_dest, find_content_bounds};
pub use assets::decode::{decode_sheet, load_sheet};
pub use chroma::key::{ChromaKey, MAX_DIST_SQ};
pub use config::color::{Rgb8, resolve_key_color};
pub use config::model::{AlignMode, CropInsets, ReadOrder, SpriteConfig};
pub use encode::gif::{encode_gif, frame_delay, write_gif};
pub use encode::still::write_png;
pub use extract::frame::{FrameExtractor, GridCell};
pub use foundation::core::{Canvas, ImageDimensions, MAX_CANVAS_DIM, Point, Rect, Size};
pub use foundation::error::{PreviewError, PreviewResult};
pub use playback::preview_loop::{PreviewLoop, TickInputs, TickOutcome, TickToken};
pub use playback::scheduler::{Clock, FramePick, ManualClock, MonotonicClock, Scheduler};
pub use playback::state::PlaybackState;
pub use render::compositor::{
    FrameRGBA, IdleReason, RenderOutcome, canvas_for, render_frame, render_frame_keyed,
};
pub use render::pipeline::{LoopFrame, LoopStats, RenderThreading, render_at, render_loop};
pub use render::raster::{BlitMode, Rasterize, blit_nearest};
pub use sequence::indexer::{FrameSequence, SequenceCache, SequenceKey, build_sequence};
