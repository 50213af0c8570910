use std::time::Duration;

use rayon::prelude::*;

use crate::chroma::key::ChromaKey;
use crate::config::model::SpriteConfig;
use crate::foundation::core::ImageDimensions;
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::playback::scheduler::{FramePick, Scheduler};
use crate::render::compositor::{IdleReason, RenderOutcome, render_frame, render_frame_keyed};
use crate::render::raster::Rasterize;
use crate::sequence::indexer::{FrameSequence, SequenceKey, build_sequence};

/// Render the frame a preview would show at absolute time `t`.
///
/// Stateless counterpart of one [`crate::PreviewLoop`] tick.
pub fn render_at<S: Rasterize + ?Sized>(
    sheet: &S,
    dims: ImageDimensions,
    cfg: &SpriteConfig,
    t: Duration,
) -> Result<(FramePick, RenderOutcome), IdleReason> {
    if dims.is_empty() {
        return Err(IdleReason::EmptySheet);
    }
    let scheduler = Scheduler::new(cfg.fps).ok_or(IdleReason::InvalidFps)?;
    let seq = build_sequence(&SequenceKey::from_config(cfg));
    let pick = scheduler
        .pick_at(&seq, t)
        .ok_or(IdleReason::EmptySequence)?;
    match render_frame(sheet, dims, cfg, pick.index) {
        RenderOutcome::Idle(reason) => Err(reason),
        out => Ok((pick, out)),
    }
}

/// One composited position of a full loop.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopFrame {
    /// 0-based position in the frame sequence.
    pub position: usize,
    /// Sheet frame index.
    pub index: u32,
    pub outcome: RenderOutcome,
}

#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_total: u64,
    pub frames_drawn: u64,
    /// Frames where auto-align found nothing to draw.
    pub frames_cleared: u64,
}

/// Render every position of the sequence once, in playback order.
///
/// Ticks are independent, so the parallel path renders them on a rayon pool and reassembles
/// them in order.
pub fn render_loop<S: Rasterize + Sync + ?Sized>(
    sheet: &S,
    dims: ImageDimensions,
    cfg: &SpriteConfig,
    threading: &RenderThreading,
) -> PreviewResult<(Vec<LoopFrame>, LoopStats)> {
    let seq = build_sequence(&SequenceKey::from_config(cfg));
    if seq.is_empty() {
        return Err(PreviewError::validation("sprite config has no playable frames"));
    }
    let key = ChromaKey::from_config(cfg);

    let frames = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| render_positions_par(sheet, dims, cfg, &key, &seq))
    } else {
        seq.as_slice()
            .iter()
            .enumerate()
            .map(|(position, &index)| render_position(sheet, dims, cfg, &key, position, index))
            .collect::<PreviewResult<Vec<_>>>()
    }?;

    let mut stats = LoopStats::default();
    for f in &frames {
        stats.frames_total += 1;
        match f.outcome {
            RenderOutcome::Drawn(_) => stats.frames_drawn += 1,
            RenderOutcome::Cleared(_) => stats.frames_cleared += 1,
            RenderOutcome::Idle(_) => {}
        }
    }
    tracing::debug!(
        total = stats.frames_total,
        drawn = stats.frames_drawn,
        cleared = stats.frames_cleared,
        "rendered loop"
    );
    Ok((frames, stats))
}

fn render_positions_par<S: Rasterize + Sync + ?Sized>(
    sheet: &S,
    dims: ImageDimensions,
    cfg: &SpriteConfig,
    key: &ChromaKey,
    seq: &FrameSequence,
) -> PreviewResult<Vec<LoopFrame>> {
    seq.as_slice()
        .par_iter()
        .enumerate()
        .map(|(position, &index)| render_position(sheet, dims, cfg, key, position, index))
        .collect()
}

fn render_position<S: Rasterize + ?Sized>(
    sheet: &S,
    dims: ImageDimensions,
    cfg: &SpriteConfig,
    key: &ChromaKey,
    position: usize,
    index: u32,
) -> PreviewResult<LoopFrame> {
    match render_frame_keyed(sheet, dims, cfg, key, index) {
        RenderOutcome::Idle(reason) => Err(PreviewError::validation(format!(
            "frame {index} cannot be rendered: {reason:?}"
        ))),
        outcome => Ok(LoopFrame {
            position,
            index,
            outcome,
        }),
    }
}

fn build_thread_pool(threads: Option<usize>) -> PreviewResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PreviewError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PreviewError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
