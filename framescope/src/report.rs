//! Aggregated report trees and their printable linearizations.
//!
//! [`ReportTree::build`] folds one raw [`FrameTree`] into an aggregated view:
//! same-named siblings under a parent merge into a single [`ReportNode`] that
//! accumulates call count, total ticks and self ticks. The tree is stored as
//! an arena of nodes indexed by [`ReportNodeId`], with each node keeping its
//! children in a `BTreeMap` keyed by name so that traversal order is a
//! documented, deterministic contract.
//!
//! Two linearizations are offered:
//!
//! - [`ReportTree::nested_report`]: pre-order depth-first rows carrying their
//!   nesting depth, children listed lexicographically.
//! - [`ReportTree::flat_report`]: one row per distinct name anywhere in the
//!   tree, sorted by self or total time, metric ties broken by ascending name.
//!
//! The whole report tree is owned by the caller that built it; the profiler
//! keeps no reference to it.

mod flat;
mod line;

use std::collections::BTreeMap;

use indextree::NodeId;

pub use flat::FlatSortMode;
pub use line::{ReportLine, ScaledTime, SplitPercent, TimeUnit};

use crate::frame::FrameTree;

/// Handle of a node within one [`ReportTree`].
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportNodeId(usize);

/// One aggregated entry of a report tree.
#[derive(Debug)]
pub struct ReportNode {
    name: String,
    call_count: u32,
    total_ticks: u64,
    self_ticks: u64,
    parent: Option<ReportNodeId>,
    children: BTreeMap<String, ReportNodeId>,
}

impl ReportNode {
    /// Name shared by every raw span merged into this entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many raw spans were merged into this entry.
    pub fn call_count(&self) -> u32 {
        self.call_count
    }

    /// Sum of elapsed ticks over every merged span.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Sum of self ticks over every merged span.
    pub fn self_ticks(&self) -> u64 {
        self.self_ticks
    }

    /// Parent entry, `None` for the root.
    pub fn parent(&self) -> Option<ReportNodeId> {
        self.parent
    }

    /// Child entries in ascending name order.
    pub fn children(&self) -> impl Iterator<Item = ReportNodeId> + '_ {
        self.children.values().copied()
    }
}

/// Aggregated view of one frame, caller-owned.
#[derive(Debug)]
pub struct ReportTree {
    nodes: Vec<ReportNode>,
    root: ReportNodeId,
    ticks_per_second: u64,
}

impl ReportTree {
    /// Aggregate a sealed frame into a report tree.
    ///
    /// The root maps one-to-one onto the frame's synthetic root span with a
    /// call count of 1; below it, raw spans sharing a name under the same
    /// aggregated parent merge into a single entry, however many raw siblings
    /// or branches contributed them.
    pub fn build(frame: &FrameTree) -> Self {
        let raw_root = frame.root();
        let mut tree = Self {
            nodes: Vec::with_capacity(frame.span_count()),
            root: ReportNodeId(0),
            ticks_per_second: frame.ticks_per_second(),
        };
        let root = tree.alloc(
            frame.span(raw_root).map_or("", |span| span.name()),
            None,
            frame.elapsed_ticks(raw_root),
            frame.self_ticks(raw_root),
        );
        tree.root = root;
        for child in frame.children(raw_root) {
            tree.merge(frame, child, root);
        }
        tree
    }

    fn alloc(
        &mut self,
        name: &str,
        parent: Option<ReportNodeId>,
        total_ticks: u64,
        self_ticks: u64,
    ) -> ReportNodeId {
        let id = ReportNodeId(self.nodes.len());
        self.nodes.push(ReportNode {
            name: name.to_owned(),
            call_count: 1,
            total_ticks,
            self_ticks,
            parent,
            children: BTreeMap::new(),
        });
        id
    }

    fn merge(&mut self, frame: &FrameTree, raw_id: NodeId, parent: ReportNodeId) {
        let Some(span) = frame.span(raw_id) else {
            return;
        };
        let total = frame.elapsed_ticks(raw_id);
        let own = frame.self_ticks(raw_id);

        let existing = self.nodes[parent.0].children.get(span.name()).copied();
        let merged = match existing {
            Some(existing) => {
                let node = &mut self.nodes[existing.0];
                node.call_count += 1;
                node.total_ticks += total;
                node.self_ticks += own;
                existing
            }
            None => {
                let name = span.name().to_owned();
                let id = self.alloc(&name, Some(parent), total, own);
                self.nodes[parent.0].children.insert(name, id);
                id
            }
        };

        for child in frame.children(raw_id) {
            self.merge(frame, child, merged);
        }
    }

    /// Handle of the root entry.
    pub fn root(&self) -> ReportNodeId {
        self.root
    }

    /// Look up an entry by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` comes from a different tree and is out of bounds.
    pub fn node(&self, id: ReportNodeId) -> &ReportNode {
        &self.nodes[id.0]
    }

    /// Number of aggregated entries, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no entries. Always false for a built tree.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every entry of the tree, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &ReportNode> {
        self.nodes.iter()
    }

    /// Total ticks of the whole frame (the root entry's total).
    pub fn total_ticks(&self) -> u64 {
        self.nodes[self.root.0].total_ticks
    }

    /// Tick rate inherited from the frame this report was built from.
    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    /// Linearize the tree depth-first, preserving hierarchy.
    ///
    /// The root is the first row at indent 0 and represents 100% of the
    /// frame; children are listed lexicographically by name at each level.
    pub fn nested_report(&self) -> Vec<ReportLine> {
        let mut rows = Vec::with_capacity(self.nodes.len());
        self.nested_rows(self.root, 0, &mut rows);
        rows
    }

    fn nested_rows(&self, id: ReportNodeId, indent: usize, rows: &mut Vec<ReportLine>) {
        let node = self.node(id);
        rows.push(line::make_line(
            node.name(),
            indent,
            node.call_count(),
            node.total_ticks(),
            node.self_ticks(),
            self.total_ticks(),
            self.ticks_per_second,
        ));
        for child in node.children() {
            self.nested_rows(child, indent + 1, rows);
        }
    }

    /// Flatten the tree into one sorted row per distinct name.
    ///
    /// See [`FlatSortMode`] for the available orderings. Rows key purely on
    /// name, so a user region named like the synthetic root
    /// ([`FRAME_ROOT_NAME`](crate::FRAME_ROOT_NAME)) shares its row.
    pub fn flat_report(&self, sort_mode: FlatSortMode) -> Vec<ReportLine> {
        flat::build(self, sort_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameTree;

    /// One frame of 100 ticks:
    ///
    /// frame
    /// ├── step (0..40)
    /// │   └── inner (10..30)
    /// ├── step (40..70)
    /// │   └── inner (45..65)
    /// └── audio (70..90)
    fn sample_frame() -> FrameTree {
        let mut frame = FrameTree::begin(1, 1_000, 0);
        let root = frame.root();

        let step_a = frame.open_span(root, "step", 0);
        let inner_a = frame.open_span(step_a, "inner", 10);
        frame.close_span(inner_a, 30);
        frame.close_span(step_a, 40);

        let step_b = frame.open_span(root, "step", 40);
        let inner_b = frame.open_span(step_b, "inner", 45);
        frame.close_span(inner_b, 65);
        frame.close_span(step_b, 70);

        let audio = frame.open_span(root, "audio", 70);
        frame.close_span(audio, 90);

        frame.close_span(root, 100);
        frame
    }

    #[test]
    fn same_named_siblings_merge_with_counts() {
        let report = ReportTree::build(&sample_frame());
        let root = report.node(report.root());

        assert_eq!(root.name(), "frame");
        assert_eq!(root.call_count(), 1);
        assert_eq!(root.total_ticks(), 100);

        let names: Vec<&str> = root
            .children()
            .map(|id| report.node(id).name())
            .collect();
        assert_eq!(names, ["audio", "step"]);

        let step_id = root.children().nth(1).expect("step entry");
        let step = report.node(step_id);
        assert_eq!(step.call_count(), 2);
        assert_eq!(step.total_ticks(), 70);
        assert_eq!(step.self_ticks(), 30);
        assert_eq!(step.parent(), Some(report.root()));

        let inner_id = step.children().next().expect("inner entry");
        let inner = report.node(inner_id);
        assert_eq!(inner.call_count(), 2);
        assert_eq!(inner.total_ticks(), 40);
        assert_eq!(inner.self_ticks(), 40);
    }

    #[test]
    fn self_time_partitions_the_whole_frame() {
        let report = ReportTree::build(&sample_frame());
        let self_sum: u64 = report.iter().map(ReportNode::self_ticks).sum();
        assert_eq!(self_sum, report.total_ticks());
    }

    #[test]
    fn deep_repeats_merge_under_their_own_parents() {
        // Two branches each containing a "leaf": the leaves must NOT merge
        // with each other because they live under different aggregated
        // parents.
        let mut frame = FrameTree::begin(1, 1_000, 0);
        let root = frame.root();
        let left = frame.open_span(root, "left", 0);
        let leaf_l = frame.open_span(left, "leaf", 0);
        frame.close_span(leaf_l, 10);
        frame.close_span(left, 10);
        let right = frame.open_span(root, "right", 10);
        let leaf_r = frame.open_span(right, "leaf", 10);
        frame.close_span(leaf_r, 30);
        frame.close_span(right, 30);
        frame.close_span(root, 30);

        let report = ReportTree::build(&frame);
        assert_eq!(report.len(), 5);

        let leaves: Vec<u64> = report
            .iter()
            .filter(|node| node.name() == "leaf")
            .map(ReportNode::total_ticks)
            .collect();
        assert_eq!(leaves.len(), 2);
        assert!(leaves.contains(&10));
        assert!(leaves.contains(&20));
    }

    #[test]
    fn nested_report_is_preorder_with_lexicographic_children() {
        let report = ReportTree::build(&sample_frame());
        let rows = report.nested_report();

        let shape: Vec<(usize, &str)> = rows
            .iter()
            .map(|row| (row.indent, row.name.as_str()))
            .collect();
        assert_eq!(
            shape,
            [
                (0, "frame"),
                (1, "audio"),
                (1, "step"),
                (2, "inner"),
            ]
        );

        assert_eq!(rows[0].total_time_percent.int_part, 100);
        assert_eq!(rows[0].call_count, 1);
        assert_eq!(rows[2].call_count, 2);
    }

    #[test]
    fn nested_percentages_are_against_the_frame_total() {
        let report = ReportTree::build(&sample_frame());
        let rows = report.nested_report();

        let step = rows.iter().find(|row| row.name == "step").expect("step row");
        assert_eq!(step.total_time_percent.int_part, 70);
        assert_eq!(step.self_time_percent.int_part, 30);

        let audio = rows.iter().find(|row| row.name == "audio").expect("audio row");
        assert_eq!(audio.total_time_percent.int_part, 20);
    }
}
