/// Display-facing playback status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// 1-based position within the frame sequence; 0 before anything was shown.
    pub current_display_index: usize,
    /// Length of the frame sequence seen by the last tick.
    pub sequence_len: usize,
}

impl PlaybackState {
    /// `(position, length)` for a frame counter.
    pub fn counter(&self) -> (usize, usize) {
        (self.current_display_index, self.sequence_len)
    }
}
