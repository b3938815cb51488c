//! Bounded, oldest-evicting storage for completed frames.

use std::{collections::VecDeque, sync::Arc};

use crate::frame::FrameTree;

/// Fixed-capacity ring of sealed frame trees, newest-first addressable by
/// "how many frames ago". Frames are handed out as `Arc` clones, so a
/// consumer's copy survives eviction.
pub(crate) struct HistoryRing {
    frames: VecDeque<Arc<FrameTree>>,
    capacity: usize,
}

impl HistoryRing {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push(&mut self, frame: FrameTree) {
        if self.capacity == 0 {
            return;
        }
        if self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(Arc::new(frame));
    }

    /// Frame sealed `frames_ago` frames ago; 0 is the most recent.
    pub(crate) fn get(&self, frames_ago: usize) -> Option<Arc<FrameTree>> {
        let newest = self.frames.len().checked_sub(1)?;
        let index = newest.checked_sub(frames_ago)?;
        self.frames.get(index).cloned()
    }

    /// All retained frames, oldest to newest.
    pub(crate) fn snapshot(&self) -> Vec<Arc<FrameTree>> {
        self.frames.iter().cloned().collect()
    }
}
