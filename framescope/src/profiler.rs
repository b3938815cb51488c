//! The profiler instance: per-frame recording stack, pause gating and frame
//! history.
//!
//! One [`Profiler`] is owned by the application root and shared by reference
//! with every instrumented call site. All recording state lives behind a
//! [`parking_lot::Mutex`] so that the RAII [`ProfileScope`] guard can borrow
//! the profiler immutably; the lock is uncontended in the intended
//! single-threaded frame loop.
//!
//! `push`/`pop`/`begin_frame`/`end_frame` run on every instrumented call site
//! every frame: they read the clock, touch the span arena and nothing else.
//! Report structures are only ever allocated on demand by
//! [`ReportTree::build`](crate::ReportTree::build).

use std::sync::Arc;

use indextree::NodeId;
use parking_lot::Mutex;
use tracing::{error, warn};

use crate::{
    clock::{InstantTicks, TickSource},
    error::ProfilerError,
    frame::FrameTree,
    history::HistoryRing,
    scope::ProfileScope,
};

/// Default number of sealed frames retained by the history ring.
pub const DEFAULT_HISTORY_CAPACITY: usize = 128;

/// Construction parameters for [`Profiler::new`].
pub struct ProfilerConfig {
    /// How many sealed frames the history ring retains before evicting the
    /// oldest.
    pub history_capacity: usize,
    /// Clock supplying timestamps for every span.
    pub clock: Box<dyn TickSource>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            clock: Box::new(InstantTicks::new()),
        }
    }
}

/// The frame currently being recorded.
struct Recording {
    frame: FrameTree,
    /// Path of currently-open spans; the frame root is always the bottom
    /// entry, so the stack is never empty while recording.
    stack: Vec<NodeId>,
}

struct ProfilerState {
    clock: Box<dyn TickSource>,
    history: HistoryRing,
    recording: Option<Recording>,
    frame_counter: u64,
    paused: bool,
    /// Pause/unpause requests latch here and apply at the next
    /// `begin_frame` boundary, so a frame is never half-captured.
    pause_request: Option<bool>,
}

/// A hierarchical frame profiler.
///
/// See the [crate docs](crate) for the recording model. A profiler built with
/// [`Profiler::disabled`] accepts every call as a cheap no-op and reports an
/// empty history, so call sites are identical in both configurations.
pub struct Profiler {
    state: Option<Mutex<ProfilerState>>,
}

impl Profiler {
    /// Create an active profiler.
    pub fn new(config: ProfilerConfig) -> Self {
        Self {
            state: Some(Mutex::new(ProfilerState {
                clock: config.clock,
                history: HistoryRing::new(config.history_capacity),
                recording: None,
                frame_counter: 0,
                paused: false,
                pause_request: None,
            })),
        }
    }

    /// Create a profiler whose every operation is a no-op.
    pub fn disabled() -> Self {
        Self { state: None }
    }

    /// Whether this instance actually records anything.
    pub fn is_compiled_in(&self) -> bool {
        self.state.is_some()
    }

    /// Start recording a new frame.
    ///
    /// Pending [`pause`](Self::pause)/[`unpause`](Self::unpause) requests take
    /// effect here. While paused this is a no-op: no tree is allocated and the
    /// frame counter does not advance.
    pub fn begin_frame(&self) {
        let Some(state) = &self.state else { return };
        let mut state = state.lock();

        if let Some(paused) = state.pause_request.take() {
            state.paused = paused;
        }
        if state.paused {
            return;
        }

        if let Some(unfinished) = state.recording.take() {
            error!(
                frame = unfinished.frame.frame_number(),
                "begin_frame called while a frame was still open; discarding it"
            );
        }

        state.frame_counter += 1;
        let now = state.clock.now_ticks();
        let frame = FrameTree::begin(state.frame_counter, state.clock.ticks_per_second(), now);
        let root = frame.root();
        state.recording = Some(Recording {
            frame,
            stack: vec![root],
        });
    }

    /// Seal the current frame and commit it to the history ring.
    ///
    /// Dangling open regions (a `push` without a matching `pop`) are closed at
    /// the current tick and reported at error level, so committed history is
    /// always well-formed.
    pub fn end_frame(&self) {
        let Some(state) = &self.state else { return };
        let mut state = state.lock();

        if state.paused {
            return;
        }
        let Some(mut recording) = state.recording.take() else {
            warn!("end_frame called without a matching begin_frame");
            return;
        };

        let now = state.clock.now_ticks();
        let dangling = recording.stack.len().saturating_sub(1);
        if dangling > 0 {
            error!(
                frame = recording.frame.frame_number(),
                dangling, "unbalanced push without pop; closing open regions at end_frame"
            );
            debug_assert!(false, "unbalanced push without pop at end_frame");
        }
        while let Some(id) = recording.stack.pop() {
            recording.frame.close_span(id, now);
        }
        state.history.push(recording.frame);
    }

    /// Open a named region as a child of the innermost open region.
    ///
    /// Must be called between `begin_frame` and `end_frame`; a `push` outside
    /// a frame is ignored. No-op while paused or disabled.
    pub fn push(&self, name: &str) {
        let Some(state) = &self.state else { return };
        let mut state = state.lock();

        if state.paused {
            return;
        }
        let now = state.clock.now_ticks();
        let Some(recording) = state.recording.as_mut() else {
            warn!(name, "push outside begin_frame/end_frame; ignoring");
            return;
        };
        let parent = match recording.stack.last() {
            Some(parent) => *parent,
            None => return,
        };
        let id = recording.frame.open_span(parent, name, now);
        recording.stack.push(id);
    }

    /// Close the innermost open region.
    ///
    /// A `pop` with no matching `push` is a programmer error: it asserts in
    /// debug builds and is logged and ignored in release builds.
    pub fn pop(&self) {
        let Some(state) = &self.state else { return };
        let mut state = state.lock();

        if state.paused {
            return;
        }
        let now = state.clock.now_ticks();
        let Some(recording) = state.recording.as_mut() else {
            debug_assert!(false, "profiler pop without matching push");
            error!("pop outside begin_frame/end_frame; ignoring");
            return;
        };
        if recording.stack.len() <= 1 {
            debug_assert!(false, "profiler pop without matching push");
            error!("pop without matching push; ignoring");
            return;
        }
        if let Some(id) = recording.stack.pop() {
            recording.frame.close_span(id, now);
        }
    }

    /// Open a region and return a guard that closes it on drop.
    ///
    /// This is the preferred instrumentation form: the region stays balanced
    /// across early returns and unwinding.
    pub fn scope<'a>(&'a self, name: &str) -> ProfileScope<'a> {
        self.push(name);
        ProfileScope::new(self)
    }

    /// Whether recording is currently suspended.
    pub fn is_paused(&self) -> bool {
        match &self.state {
            Some(state) => state.lock().paused,
            None => false,
        }
    }

    /// Request that recording stop at the next `begin_frame` boundary.
    ///
    /// While paused the history is frozen: nothing is captured and nothing is
    /// evicted, so consumers can inspect historical frames indefinitely.
    pub fn pause(&self) {
        if let Some(state) = &self.state {
            state.lock().pause_request = Some(true);
        }
    }

    /// Request that recording resume at the next `begin_frame` boundary.
    pub fn unpause(&self) {
        if let Some(state) = &self.state {
            state.lock().pause_request = Some(false);
        }
    }

    /// Monotonic count of frames recorded so far.
    ///
    /// Does not advance while paused or disabled.
    pub fn frame_number(&self) -> u64 {
        match &self.state {
            Some(state) => state.lock().frame_counter,
            None => 0,
        }
    }

    /// Maximum number of sealed frames the history retains.
    pub fn history_capacity(&self) -> usize {
        match &self.state {
            Some(state) => state.lock().history.capacity(),
            None => 0,
        }
    }

    /// Number of sealed frames currently retained.
    pub fn history_len(&self) -> usize {
        match &self.state {
            Some(state) => state.lock().history.len(),
            None => 0,
        }
    }

    /// Frame sealed `frames_ago` frames ago; `0` is the most recent.
    ///
    /// # Errors
    ///
    /// [`ProfilerError::HistoryIndexOutOfRange`] if `frames_ago` is at or
    /// beyond [`history_len`](Self::history_len).
    pub fn previous_frame(&self, frames_ago: usize) -> Result<Arc<FrameTree>, ProfilerError> {
        let Some(state) = &self.state else {
            return Err(ProfilerError::HistoryIndexOutOfRange {
                requested: frames_ago,
                available: 0,
            });
        };
        let state = state.lock();
        state
            .history
            .get(frames_ago)
            .ok_or(ProfilerError::HistoryIndexOutOfRange {
                requested: frames_ago,
                available: state.history.len(),
            })
    }

    /// All retained frames, oldest to newest.
    pub fn all_previous_frames(&self) -> Vec<Arc<FrameTree>> {
        match &self.state {
            Some(state) => state.lock().history.snapshot(),
            None => Vec::new(),
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(ProfilerConfig::default())
    }
}
