//! Best split plane search.
//!
//! A node's sorted edge lists are swept once per axis. Running counts give
//! the number of triangles on each side of every candidate plane:
//!
//! ```text
//!   END   -> ended += 1, then evaluate
//!   START -> evaluate, then started += 1
//!
//!   nA = started
//!   nB = total - ended
//! ```
//!
//! # Chunked search
//!
//! [`find_best_plane_chunked`] splits every axis list into contiguous chunks
//! and runs four phases:
//!
//! 1. prescan: each chunk tallies its starts and ends (parallel)
//! 2. exclusive prefix sum of the tallies gives each chunk its baseline
//! 3. final scan: each chunk sweeps from its baseline (parallel)
//! 4. reduction over (axis, chunk) in order, strict `<`
//!
//! Phase 3 depends on phase 2 finishing. Because each chunk sees exactly the
//! counts the sequential sweep would, and the reduction keeps the earliest of
//! equal costs, the result is bit-identical to [`find_best_plane`] for any
//! chunk count.

use rayon::prelude::*;

use crate::config::SahParams;
use crate::geometry::{Axis, BoundingBox, BoxEdge, EdgeLists};
use crate::sah;

/// Winning plane of one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate {
  /// SAH cost of the split.
  pub cost: f32,
  pub axis: Axis,
  pub position: f32,
  /// Index of `edge` in the list it was found in.
  pub edge_index: usize,
  /// Edge the plane passes through.
  pub edge: BoxEdge,
  /// Triangles left of the plane.
  pub n_a: usize,
  /// Triangles right of the plane.
  pub n_b: usize,
}

impl SplitCandidate {
  /// Keep the cheaper of two candidates; ties keep `current`.
  #[inline]
  pub fn pick(current: Option<Self>, next: Option<Self>) -> Option<Self> {
    match (current, next) {
      (Some(a), Some(b)) if b.cost < a.cost => Some(b),
      (None, next) => next,
      (current, _) => current,
    }
  }
}

/// Start/end counts of a run of edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTally {
  pub starts: usize,
  pub ends: usize,
}

impl EdgeTally {
  pub fn of(edges: &[BoxEdge]) -> Self {
    let mut tally = Self::default();
    for edge in edges {
      tally.count(edge);
    }
    tally
  }

  #[inline]
  pub fn count(&mut self, edge: &BoxEdge) {
    if edge.is_start() {
      self.starts += 1;
    } else {
      self.ends += 1;
    }
  }

  #[inline]
  pub fn add(self, other: Self) -> Self {
    Self {
      starts: self.starts + other.starts,
      ends: self.ends + other.ends,
    }
  }
}

/// Exclusive prefix sums: entry `i` covers tallies `0..i`.
pub fn exclusive_prefix(tallies: &[EdgeTally]) -> Vec<EdgeTally> {
  let mut running = EdgeTally::default();
  tallies
    .iter()
    .map(|tally| {
      let baseline = running;
      running = running.add(*tally);
      baseline
    })
    .collect()
}

/// Sweep state for one node along one axis.
///
/// Shared by every search path: the sequential sweep, each chunk of the
/// chunked search, and each live node of the level-synchronous builder.
#[derive(Clone, Debug)]
pub struct PlaneScanner<'a> {
  params: &'a SahParams,
  extent: BoundingBox,
  axis: Axis,
  total: usize,
  started: usize,
  ended: usize,
  threshold: f32,
  best: Option<SplitCandidate>,
}

impl<'a> PlaneScanner<'a> {
  /// Scanner for a node of `total` triangles starting at `baseline`.
  ///
  /// Only candidates strictly cheaper than the leaf cost are kept.
  pub fn new(
    params: &'a SahParams,
    extent: BoundingBox,
    axis: Axis,
    total: usize,
    baseline: EdgeTally,
  ) -> Self {
    Self {
      params,
      extent,
      axis,
      total,
      started: baseline.starts,
      ended: baseline.ends,
      threshold: params.leaf_cost(total),
      best: None,
    }
  }

  /// Advance over `edge`, found at `index` of its list.
  #[inline]
  pub fn visit(&mut self, index: usize, edge: &BoxEdge) {
    if edge.is_end() {
      self.ended += 1;
    }

    let n_a = self.started;
    let n_b = self.total - self.ended;
    let cost = sah::cost(self.params, &self.extent, self.axis, n_a, n_b, edge.position);
    if cost < self.threshold {
      self.threshold = cost;
      self.best = Some(SplitCandidate {
        cost,
        axis: self.axis,
        position: edge.position,
        edge_index: index,
        edge: *edge,
        n_a,
        n_b,
      });
    }

    if edge.is_start() {
      self.started += 1;
    }
  }

  /// Visit a contiguous run whose first edge sits at `offset`.
  pub fn visit_run(&mut self, offset: usize, edges: &[BoxEdge]) {
    for (i, edge) in edges.iter().enumerate() {
      self.visit(offset + i, edge);
    }
  }

  /// Current `(started, ended)` counts.
  pub fn counts(&self) -> (usize, usize) {
    (self.started, self.ended)
  }

  pub fn finish(self) -> Option<SplitCandidate> {
    self.best
  }
}

/// Sequential search over all three axes.
///
/// Returns None when no plane beats keeping the node as a leaf.
pub fn find_best_plane(
  lists: &EdgeLists,
  extent: &BoundingBox,
  params: &SahParams,
) -> Option<SplitCandidate> {
  let total = lists.triangle_count();
  Axis::ALL.iter().fold(None, |best, &axis| {
    let mut scanner = PlaneScanner::new(params, *extent, axis, total, EdgeTally::default());
    scanner.visit_run(0, lists.axis(axis));
    SplitCandidate::pick(best, scanner.finish())
  })
}

/// Length of each of `chunks` contiguous chunks covering `len` items.
#[inline]
pub fn chunk_len(len: usize, chunks: usize) -> usize {
  len.div_ceil(chunks.max(1)).max(1)
}

/// Four-phase chunked search; same result as [`find_best_plane`].
pub fn find_best_plane_chunked(
  lists: &EdgeLists,
  extent: &BoundingBox,
  params: &SahParams,
  chunks: usize,
) -> Option<SplitCandidate> {
  let total = lists.triangle_count();
  let size = chunk_len(lists.len(), chunks);

  // Phase 1
  let tallies: Vec<Vec<EdgeTally>> = Axis::ALL
    .par_iter()
    .map(|&axis| lists.axis(axis).par_chunks(size).map(EdgeTally::of).collect())
    .collect();

  // Phase 2
  let jobs: Vec<(Axis, usize, EdgeTally)> = Axis::ALL
    .iter()
    .zip(&tallies)
    .flat_map(|(&axis, tallies)| {
      exclusive_prefix(tallies)
        .into_iter()
        .enumerate()
        .map(move |(chunk, baseline)| (axis, chunk, baseline))
    })
    .collect();

  // Phase 3
  let locals: Vec<Option<SplitCandidate>> = jobs
    .par_iter()
    .map(|&(axis, chunk, baseline)| {
      let edges = lists.axis(axis);
      let start = chunk * size;
      let end = (start + size).min(edges.len());
      let mut scanner = PlaneScanner::new(params, *extent, axis, total, baseline);
      scanner.visit_run(start, &edges[start..end]);
      scanner.finish()
    })
    .collect();

  // Phase 4
  locals.into_iter().fold(None, SplitCandidate::pick)
}

#[cfg(test)]
#[path = "plane_test.rs"]
mod plane_test;
