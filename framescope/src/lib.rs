//! framescope is an in-process hierarchical frame profiler for real-time
//! application loops.
//!
//! # Overview
//!
//! A [`Profiler`] records one call tree per frame: the host loop brackets each
//! frame with [`Profiler::begin_frame`] and [`Profiler::end_frame`], and
//! instrumented code opens nested regions with [`Profiler::scope`] (or the
//! explicit [`Profiler::push`]/[`Profiler::pop`] pair). Completed frames are
//! kept in a bounded, oldest-evicting history that can be frozen with
//! [`Profiler::pause`] for stable inspection.
//!
//! Any retained frame can be aggregated into a [`ReportTree`], which merges
//! repeated same-named calls and yields two printable linearizations: a
//! depth-preserving nested report and a name-deduplicated flat report, each
//! sortable by self time or total time.
//!
//! # Usage
//!
//! ```
//! use framescope::{FlatSortMode, Profiler, ProfilerConfig, ReportTree};
//!
//! let profiler = Profiler::new(ProfilerConfig::default());
//!
//! profiler.begin_frame();
//! {
//!     let _update = profiler.scope("update");
//!     let _physics = profiler.scope("physics");
//! } // guards drop here, closing the regions in reverse order
//! profiler.end_frame();
//!
//! let frame = profiler.previous_frame(0).expect("one frame was recorded");
//! let report = ReportTree::build(&frame);
//! let rows = report.flat_report(FlatSortMode::TotalTime);
//! assert_eq!(rows[0].name, "frame");
//! ```
//!
//! Binding a scope guard to `_` (`let _ = profiler.scope("x")`) drops it
//! immediately and times nothing; always bind it to a named variable.
//!
//! # Determinism
//!
//! Report ordering is a documented contract, not an accident of iteration:
//! nested reports list children lexicographically by name, and flat reports
//! break metric ties by ascending name. Timestamps come from a pluggable
//! [`TickSource`], so tests and tools can drive the profiler with
//! [`ManualTicks`] instead of the wall clock.
//!
//! # Disabled builds
//!
//! [`Profiler::disabled`] constructs a profiler whose every entry point is a
//! cheap no-op or empty result, so instrumented call sites never need to
//! branch on whether profiling is active. See [`Profiler::is_compiled_in`].
#![deny(missing_docs, clippy::unwrap_used)]

pub mod clock;
mod error;
mod frame;
mod history;
mod profiler;
pub mod report;
mod scope;

pub use indextree::{Arena, NodeId};

pub use crate::{
    clock::{InstantTicks, ManualTicks, TickSource},
    error::ProfilerError,
    frame::{FRAME_ROOT_NAME, FrameTree, ScopeSpan},
    profiler::{DEFAULT_HISTORY_CAPACITY, Profiler, ProfilerConfig},
    report::{
        FlatSortMode, ReportLine, ReportNode, ReportNodeId, ReportTree, ScaledTime, SplitPercent,
        TimeUnit,
    },
    scope::{LoggedScope, ProfileScope},
};
