use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::model::{ReadOrder, SpriteConfig};

/// Inputs that fully determine a frame sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    pub rows: u32,
    pub cols: u32,
    pub total_frames: u32,
    pub excluded: BTreeSet<u32>,
    pub read_order: ReadOrder,
}

impl SequenceKey {
    pub fn from_config(cfg: &SpriteConfig) -> Self {
        Self {
            rows: cfg.rows,
            cols: cfg.cols,
            total_frames: cfg.total_frames(),
            excluded: cfg.excluded_frames.clone(),
            read_order: cfg.read_order,
        }
    }
}

/// Ordered list of playable frame indices.
///
/// Cheap to clone; the backing slice is shared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSequence(Arc<[u32]>);

impl FrameSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<u32> {
        self.0.get(position).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for FrameSequence {
    fn from(v: Vec<u32>) -> Self {
        Self(v.into())
    }
}

/// Walk the grid in `read_order` and keep every index below `total_frames` that is not excluded.
///
/// A grid with zero rows or columns yields an empty sequence.
pub fn build_sequence(key: &SequenceKey) -> FrameSequence {
    let SequenceKey {
        rows,
        cols,
        total_frames,
        ref excluded,
        read_order,
    } = *key;

    if rows == 0 || cols == 0 {
        return FrameSequence::default();
    }

    let (outer, inner) = match read_order {
        ReadOrder::RowMajor => (rows, cols),
        ReadOrder::ColumnMajor => (cols, rows),
    };

    let mut out = Vec::with_capacity(total_frames.min(rows.saturating_mul(cols)) as usize);
    for o in 0..outer {
        for i in 0..inner {
            // row*cols+col for row-major, col*rows+row for column-major.
            let idx = u64::from(o) * u64::from(inner) + u64::from(i);
            if idx >= u64::from(total_frames) {
                continue;
            }
            let idx = idx as u32;
            if !excluded.contains(&idx) {
                out.push(idx);
            }
        }
    }
    out.into()
}

/// Single-entry memo over [`build_sequence`].
///
/// The preview re-derives its sequence every tick; the cache returns the previous result as long
/// as the key is unchanged.
#[derive(Debug, Default)]
pub struct SequenceCache {
    entry: Option<(SequenceKey, FrameSequence)>,
    misses: u64,
}

impl SequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, cfg: &SpriteConfig) -> FrameSequence {
        let key = SequenceKey::from_config(cfg);
        if let Some((cached, seq)) = &self.entry
            && *cached == key
        {
            return seq.clone();
        }

        let seq = build_sequence(&key);
        tracing::debug!(
            rows = key.rows,
            cols = key.cols,
            len = seq.len(),
            "rebuilt frame sequence"
        );
        self.misses = self.misses.saturating_add(1);
        self.entry = Some((key, seq.clone()));
        seq
    }

    /// Number of times the sequence had to be rebuilt.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/indexer.rs"]
mod tests;
