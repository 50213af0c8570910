use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::sequence::indexer::FrameSequence;

/// Monotonic time source feeding the scheduler.
pub trait Clock {
    /// Time elapsed since the clock's fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Externally driven clock for headless rendering and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new(start: Duration) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, t: Duration) {
        self.now.set(t);
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// The frame chosen for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePick {
    /// Absolute tick count since the time origin.
    pub tick: u64,
    /// 0-based position within the sequence.
    pub position: usize,
    /// Sheet frame index at that position.
    pub index: u32,
}

impl FramePick {
    /// 1-based position, for frame-counter displays.
    pub fn display_position(self) -> usize {
        self.position + 1
    }
}

/// Maps absolute time to a sequence position at a fixed frame rate.
///
/// The time base is never rebased: pausing and resuming picks up wherever wall time has moved
/// to, not where playback stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scheduler {
    fps: f64,
}

impl Scheduler {
    /// `None` unless `fps` is finite and positive.
    pub fn new(fps: f64) -> Option<Self> {
        (fps.is_finite() && fps > 0.0).then_some(Self { fps })
    }

    pub fn fps(self) -> f64 {
        self.fps
    }

    /// Length of one frame in milliseconds.
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 / self.fps
    }

    pub fn tick_at_ms(self, t_ms: f64) -> u64 {
        if !t_ms.is_finite() || t_ms <= 0.0 {
            return 0;
        }
        (t_ms / self.frame_interval_ms()).floor() as u64
    }

    pub fn tick_at(self, t: Duration) -> u64 {
        self.tick_at_ms(duration_ms(t))
    }

    /// Select the frame shown at `t_ms`, or `None` for an empty sequence.
    pub fn pick_at_ms(self, seq: &FrameSequence, t_ms: f64) -> Option<FramePick> {
        if seq.is_empty() {
            return None;
        }
        let tick = self.tick_at_ms(t_ms);
        let position = (tick % seq.len() as u64) as usize;
        let index = seq.get(position)?;
        Some(FramePick {
            tick,
            position,
            index,
        })
    }

    pub fn pick_at(self, seq: &FrameSequence, t: Duration) -> Option<FramePick> {
        self.pick_at_ms(seq, duration_ms(t))
    }

    /// Start time of the given tick, in milliseconds.
    pub fn tick_start_ms(self, tick: u64) -> f64 {
        tick as f64 * self.frame_interval_ms()
    }
}

/// Whole and fractional milliseconds, exact for whole-millisecond durations.
pub fn duration_ms(t: Duration) -> f64 {
    t.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
