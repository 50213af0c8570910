use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::chroma::key::ChromaKey;
use crate::config::model::SpriteConfig;
use crate::foundation::core::ImageDimensions;
use crate::playback::scheduler::{Clock, FramePick, Scheduler};
use crate::playback::state::PlaybackState;
use crate::render::compositor::{FrameRGBA, IdleReason, RenderOutcome, render_frame_keyed};
use crate::sequence::indexer::SequenceCache;

/// Everything one tick reads. Owned by the loop and handed to each tick explicitly.
#[derive(Clone, Debug, Default)]
pub struct TickInputs {
    /// Decoded sheet; `None` until the image collaborator delivers one.
    pub sheet: Option<Arc<RgbaImage>>,
    pub config: SpriteConfig,
    pub dims: ImageDimensions,
}

impl TickInputs {
    /// Inputs for a loaded sheet, taking dimensions from the image itself.
    pub fn for_sheet(sheet: Arc<RgbaImage>, config: SpriteConfig) -> Self {
        let dims = ImageDimensions::of(&sheet);
        Self {
            sheet: Some(sheet),
            config,
            dims,
        }
    }
}

/// Handle for one requested tick.
///
/// Only the most recently issued token is live; restarting or cancelling the loop invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// What a call to [`PreviewLoop::run_tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token was cancelled or superseded; nothing ran.
    Stale,
    /// Inputs are degenerate; the render target was left untouched.
    Idle(IdleReason),
    /// A new buffer was composited. `drawn` is false when auto-align found no content.
    Rendered { pick: FramePick, drawn: bool },
}

/// Single-threaded cooperative preview driver.
///
/// The host owns the refresh callback: it asks for [`PreviewLoop::pending_tick`] and, on the
/// next display refresh, passes the token back to [`PreviewLoop::run_tick`]. Each tick reads the
/// inputs current at that moment; any input or play-state change cancels the outstanding token
/// and, when playing, issues a fresh one.
pub struct PreviewLoop<C: Clock> {
    clock: C,
    inputs: TickInputs,
    playing: bool,
    torn_down: bool,
    pending: Option<TickToken>,
    next_token: u64,
    cache: SequenceCache,
    /// Resolved from `inputs.config` whenever the config changes.
    key: ChromaKey,
    state: PlaybackState,
    target: Option<FrameRGBA>,
}

impl<C: Clock> PreviewLoop<C> {
    /// A paused loop over `inputs`.
    pub fn new(clock: C, inputs: TickInputs) -> Self {
        let key = ChromaKey::from_config(&inputs.config);
        Self {
            clock,
            inputs,
            playing: false,
            torn_down: false,
            pending: None,
            next_token: 0,
            cache: SequenceCache::new(),
            key,
            state: PlaybackState::default(),
            target: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn inputs(&self) -> &TickInputs {
        &self.inputs
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The most recent composite, if any.
    pub fn target(&self) -> Option<&FrameRGBA> {
        self.target.as_ref()
    }

    /// Token the host should run on the next refresh, if a tick is scheduled.
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.playing == playing || self.torn_down {
            return;
        }
        self.playing = playing;
        self.state.is_playing = playing;
        tracing::debug!(playing, "play state changed");
        self.restart();
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    pub fn toggle(&mut self) {
        self.set_playing(!self.playing);
    }

    /// Replace all inputs and re-establish the loop.
    pub fn set_inputs(&mut self, inputs: TickInputs) {
        self.key = ChromaKey::from_config(&inputs.config);
        self.inputs = inputs;
        self.restart();
    }

    pub fn set_config(&mut self, config: SpriteConfig) {
        self.key = ChromaKey::from_config(&config);
        self.inputs.config = config;
        self.restart();
    }

    /// Swap the sheet; dimensions follow the new image.
    pub fn set_sheet(&mut self, sheet: Option<Arc<RgbaImage>>) {
        self.inputs.dims = sheet
            .as_deref()
            .map(ImageDimensions::of)
            .unwrap_or_default();
        self.inputs.sheet = sheet;
        self.restart();
    }

    pub fn set_dimensions(&mut self, dims: ImageDimensions) {
        self.inputs.dims = dims;
        self.restart();
    }

    /// Run the tick identified by `token`.
    ///
    /// Stale tokens are ignored. After compositing, the next tick is requested if still playing.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn run_tick(&mut self, token: TickToken) -> TickOutcome {
        if self.pending != Some(token) {
            return TickOutcome::Stale;
        }
        self.pending = None;

        let now = self.clock.now();
        let outcome = self.compose(now);
        if let TickOutcome::Idle(reason) = outcome {
            tracing::trace!(?reason, "tick idle");
        }

        if self.playing {
            self.pending = Some(self.issue());
        }
        outcome
    }

    /// Cancel any scheduled tick, then release the render target.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.torn_down = true;
        self.playing = false;
        self.state.is_playing = false;
        self.target = None;
    }

    fn compose(&mut self, now: Duration) -> TickOutcome {
        let inputs = &self.inputs;
        let Some(sheet) = inputs.sheet.as_deref() else {
            return TickOutcome::Idle(IdleReason::NoImage);
        };
        if inputs.dims.is_empty() {
            return TickOutcome::Idle(IdleReason::EmptySheet);
        }
        let Some(scheduler) = Scheduler::new(inputs.config.fps) else {
            return TickOutcome::Idle(IdleReason::InvalidFps);
        };

        let seq = self.cache.get(&inputs.config);
        self.state.sequence_len = seq.len();
        let Some(pick) = scheduler.pick_at(&seq, now) else {
            self.state.current_display_index = 0;
            return TickOutcome::Idle(IdleReason::EmptySequence);
        };

        let rendered =
            render_frame_keyed(sheet, inputs.dims, &inputs.config, &self.key, pick.index);
        let (frame, drawn) = match rendered {
            RenderOutcome::Drawn(f) => (f, true),
            RenderOutcome::Cleared(f) => (f, false),
            RenderOutcome::Idle(reason) => return TickOutcome::Idle(reason),
        };
        self.state.current_display_index = pick.display_position();
        self.target = Some(frame);
        TickOutcome::Rendered { pick, drawn }
    }

    fn restart(&mut self) {
        self.pending = None;
        if self.playing && !self.torn_down {
            self.pending = Some(self.issue());
        }
    }

    fn issue(&mut self) -> TickToken {
        let t = TickToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/preview_loop.rs"]
mod tests;
