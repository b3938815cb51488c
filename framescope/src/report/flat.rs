//! Name-deduplicated, globally sorted flattening of a report tree.

use std::collections::BTreeMap;

use super::{ReportLine, ReportTree, line};

/// Metric a flat report is sorted by, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatSortMode {
    /// Order rows by self time.
    SelfTime,
    /// Order rows by total time.
    TotalTime,
}

#[derive(Default)]
struct Totals {
    call_count: u32,
    total_ticks: u64,
    self_ticks: u64,
}

/// Fold every entry of the tree into one row per distinct name, then sort.
///
/// Accumulation goes through a `BTreeMap`, so rows start in ascending name
/// order; the stable sort by the chosen metric therefore leaves ties in
/// ascending name order, which is part of the report contract.
pub(super) fn build(tree: &ReportTree, sort_mode: FlatSortMode) -> Vec<ReportLine> {
    let mut by_name: BTreeMap<&str, Totals> = BTreeMap::new();
    for node in tree.iter() {
        let totals = by_name.entry(node.name()).or_default();
        totals.call_count += node.call_count();
        totals.total_ticks += node.total_ticks();
        totals.self_ticks += node.self_ticks();
    }

    let mut rows: Vec<(&str, Totals)> = by_name.into_iter().collect();
    match sort_mode {
        FlatSortMode::SelfTime => {
            rows.sort_by(|a, b| b.1.self_ticks.cmp(&a.1.self_ticks));
        }
        FlatSortMode::TotalTime => {
            rows.sort_by(|a, b| b.1.total_ticks.cmp(&a.1.total_ticks));
        }
    }

    rows.into_iter()
        .map(|(name, totals)| {
            line::make_line(
                name,
                0,
                totals.call_count,
                totals.total_ticks,
                totals.self_ticks,
                tree.total_ticks(),
                tree.ticks_per_second(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameTree;

    /// frame (0..100)
    /// ├── render (0..30) self 30
    /// ├── step (30..60)
    /// │   └── render (40..60) self 20
    /// └── step (60..90)
    ///     └── io (70..80) self 10
    fn sample_report() -> ReportTree {
        let mut frame = FrameTree::begin(1, 1_000, 0);
        let root = frame.root();

        let render_top = frame.open_span(root, "render", 0);
        frame.close_span(render_top, 30);

        let step_a = frame.open_span(root, "step", 30);
        let render_inner = frame.open_span(step_a, "render", 40);
        frame.close_span(render_inner, 60);
        frame.close_span(step_a, 60);

        let step_b = frame.open_span(root, "step", 60);
        let io = frame.open_span(step_b, "io", 70);
        frame.close_span(io, 80);
        frame.close_span(step_b, 90);

        frame.close_span(root, 100);
        ReportTree::build(&frame)
    }

    #[test]
    fn one_row_per_distinct_name_with_summed_metrics() {
        let report = sample_report();
        let rows = report.flat_report(FlatSortMode::TotalTime);

        // frame, render, step, io: 4 distinct names out of 5 tree entries.
        assert_eq!(report.len(), 5);
        assert_eq!(rows.len(), 4);

        let render = rows.iter().find(|row| row.name == "render").expect("render row");
        assert_eq!(render.call_count, 2);
        // 30 ticks at top level + 20 nested under step.
        assert_eq!(render.total_time.int_part, 50);

        let step = rows.iter().find(|row| row.name == "step").expect("step row");
        assert_eq!(step.call_count, 2);
        assert_eq!(step.total_time.int_part, 60);
    }

    #[test]
    fn rows_sort_descending_by_the_chosen_metric() {
        let report = sample_report();

        let by_total = report.flat_report(FlatSortMode::TotalTime);
        let totals: Vec<&str> = by_total.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(totals, ["frame", "step", "render", "io"]);

        let by_self = report.flat_report(FlatSortMode::SelfTime);
        let selfs: Vec<&str> = by_self.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(selfs, ["render", "step", "frame", "io"]);

        for pair in by_self.windows(2) {
            let a = pair[0].self_time.int_part;
            let b = pair[1].self_time.int_part;
            assert!(a >= b);
        }
    }

    #[test]
    fn metric_ties_break_by_ascending_name() {
        // Two regions with identical timings.
        let mut frame = FrameTree::begin(1, 1_000, 0);
        let root = frame.root();
        let beta = frame.open_span(root, "beta", 0);
        frame.close_span(beta, 10);
        let alpha = frame.open_span(root, "alpha", 10);
        frame.close_span(alpha, 20);
        frame.close_span(root, 20);

        let report = ReportTree::build(&frame);
        let rows = report.flat_report(FlatSortMode::TotalTime);
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["frame", "alpha", "beta"]);
    }

    #[test]
    fn percentages_are_against_the_frame_total() {
        let report = sample_report();
        let rows = report.flat_report(FlatSortMode::TotalTime);

        assert_eq!(rows[0].name, "frame");
        assert_eq!(rows[0].total_time_percent.int_part, 100);

        let render = rows.iter().find(|row| row.name == "render").expect("render row");
        assert_eq!(render.total_time_percent.int_part, 50);
        assert_eq!(render.self_time_percent.int_part, 50);

        let io = rows.iter().find(|row| row.name == "io").expect("io row");
        assert_eq!(io.total_time_percent.int_part, 10);
    }
}
