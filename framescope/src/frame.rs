//! The raw per-frame call tree.
//!
//! A [`FrameTree`] is built incrementally while a frame is being recorded: one
//! [`ScopeSpan`] per push/pop pair, owned by an [`indextree::Arena`] so that
//! parent/child relationships are plain node handles rather than pointers.
//! Children are kept in call order. Once `end_frame` seals the tree it is
//! immutable; report generation reads it without copying.

use indextree::{Arena, NodeId};

/// Name of the synthetic root span covering one `begin_frame`..`end_frame`
/// interval.
///
/// Reports deduplicate by name, so a user region pushed under this exact
/// name merges with the root's row in flat reports. Pick a different name
/// for instrumented regions.
pub const FRAME_ROOT_NAME: &str = "frame";

/// One instrumented region instance within a frame.
#[derive(Debug, Clone)]
pub struct ScopeSpan {
    name: String,
    start_ticks: u64,
    end_ticks: Option<u64>,
}

impl ScopeSpan {
    pub(crate) fn open(name: &str, start_ticks: u64) -> Self {
        Self {
            name: name.to_owned(),
            start_ticks,
            end_ticks: None,
        }
    }

    /// Name of the instrumented region.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tick at which the region was entered.
    pub fn start_ticks(&self) -> u64 {
        self.start_ticks
    }

    /// Tick at which the region was exited, or `None` while still open.
    pub fn end_ticks(&self) -> Option<u64> {
        self.end_ticks
    }

    /// Whether the region has not been closed yet.
    pub fn is_open(&self) -> bool {
        self.end_ticks.is_none()
    }

    /// Wall-clock span between entry and exit, including descendants.
    ///
    /// Zero while the span is open.
    pub fn elapsed_ticks(&self) -> u64 {
        self.end_ticks
            .map_or(0, |end| end.saturating_sub(self.start_ticks))
    }

    fn close(&mut self, end_ticks: u64) {
        // Clamp so a backward clock jump can never produce end < start.
        self.end_ticks = Some(end_ticks.max(self.start_ticks));
    }
}

/// A sealed (or in-progress) call tree for one frame.
#[derive(Debug)]
pub struct FrameTree {
    arena: Arena<ScopeSpan>,
    root: NodeId,
    frame_number: u64,
    ticks_per_second: u64,
}

impl FrameTree {
    pub(crate) fn begin(frame_number: u64, ticks_per_second: u64, start_ticks: u64) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(ScopeSpan::open(FRAME_ROOT_NAME, start_ticks));
        Self {
            arena,
            root,
            frame_number,
            ticks_per_second,
        }
    }

    /// Open a new span as the last child of `parent` and return its handle.
    pub(crate) fn open_span(&mut self, parent: NodeId, name: &str, start_ticks: u64) -> NodeId {
        let id = self.arena.new_node(ScopeSpan::open(name, start_ticks));
        parent.append(id, &mut self.arena);
        id
    }

    pub(crate) fn close_span(&mut self, id: NodeId, end_ticks: u64) {
        if let Some(node) = self.arena.get_mut(id) {
            node.get_mut().close(end_ticks);
        }
    }

    /// Handle of the synthetic root span.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Monotonic number of the frame this tree was recorded in.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Tick rate of the clock that produced this tree's timestamps.
    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    /// Look up a span by handle.
    pub fn span(&self, id: NodeId) -> Option<&ScopeSpan> {
        self.arena.get(id).map(|node| node.get())
    }

    /// Direct children of `id`, in call order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Parent of `id`, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    /// Number of spans in the tree, the root included.
    pub fn span_count(&self) -> usize {
        self.arena.len()
    }

    /// Elapsed ticks of the span `id`, zero if the handle is stale.
    pub fn elapsed_ticks(&self, id: NodeId) -> u64 {
        self.span(id).map_or(0, ScopeSpan::elapsed_ticks)
    }

    /// Time attributable to `id` itself, excluding its direct children.
    ///
    /// Saturates at zero so that clock jitter (a child appearing longer than
    /// its parent) can never produce a negative bucket.
    pub fn self_ticks(&self, id: NodeId) -> u64 {
        let children: u64 = self.children(id).map(|child| self.elapsed_ticks(child)).sum();
        self.elapsed_ticks(id).saturating_sub(children)
    }
}
