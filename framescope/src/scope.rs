//! RAII instrumentation guards.

use std::time::Instant;

use tracing::info;

use crate::profiler::Profiler;

/// Guard for one profiled region: created by [`Profiler::scope`], closes the
/// region when dropped.
///
/// Because the pop happens in `Drop`, the push/pop pair stays balanced on
/// every exit path, early returns and unwinding included.
pub struct ProfileScope<'a> {
    profiler: &'a Profiler,
}

impl<'a> ProfileScope<'a> {
    pub(crate) fn new(profiler: &'a Profiler) -> Self {
        Self { profiler }
    }
}

impl Drop for ProfileScope<'_> {
    fn drop(&mut self) {
        self.profiler.pop();
    }
}

/// A standalone stopwatch that logs its elapsed time when dropped.
///
/// Unlike [`ProfileScope`] this needs no profiler and no frame: it is meant
/// for one-off timings (asset loads, startup phases) reported straight to the
/// log.
///
/// ```
/// use framescope::LoggedScope;
///
/// {
///     let _timer = LoggedScope::new("load_textures");
///     // ... work ...
/// } // logs "load_textures" with its elapsed milliseconds
/// ```
pub struct LoggedScope {
    name: String,
    start: Instant,
}

impl LoggedScope {
    /// Start timing a named region.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for LoggedScope {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1_000.0;
        info!(name = %self.name, elapsed_ms, "scope finished");
    }
}
