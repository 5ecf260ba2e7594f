//! Box edges - start/end events of triangle bounds along one axis.
//!
//! Every triangle contributes two events per axis. Sorting the events turns a
//! plane sweep into a single linear scan:
//!
//! ```text
//!   tri 0  [=====]
//!   tri 1        [=====]
//!   tri 2     [===========]
//!          S0 S2 E0 S1   E1 E2      (sorted by position)
//! ```
//!
//! # Ordering
//!
//! Position first, then triangle index, then `Start < End`. The tie-breaks
//! make coincident edges resolve the same way under any parallel split of the
//! work, so the chosen planes do not depend on thread count.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::{Axis, TriangleSource};
use crate::sort::parallel_mergesort_by;

/// Whether an edge opens or closes a triangle's extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
  /// Lower bound of the triangle along the axis.
  #[default]
  Start = 0,
  /// Upper bound of the triangle along the axis.
  End = 1,
}

/// One start or end event of a triangle's bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxEdge {
  /// Coordinate of the event along `axis`.
  pub position: f32,
  /// Index of the triangle in the mesh.
  pub triangle: u32,
  /// Start or end.
  pub kind: EdgeType,
  /// Axis the event lives on.
  pub axis: Axis,
}

impl BoxEdge {
  /// Start event.
  pub fn start(position: f32, triangle: u32, axis: Axis) -> Self {
    Self {
      position,
      triangle,
      kind: EdgeType::Start,
      axis,
    }
  }

  /// End event.
  pub fn end(position: f32, triangle: u32, axis: Axis) -> Self {
    Self {
      position,
      triangle,
      kind: EdgeType::End,
      axis,
    }
  }

  #[inline]
  pub fn is_start(&self) -> bool {
    self.kind == EdgeType::Start
  }

  #[inline]
  pub fn is_end(&self) -> bool {
    self.kind == EdgeType::End
  }

  /// Total order used for every edge list.
  ///
  /// Positions compare with `==` semantics, so `-0.0` and `0.0` tie and fall
  /// through to the triangle index.
  #[inline]
  pub fn total_order(a: &BoxEdge, b: &BoxEdge) -> Ordering {
    a.position
      .partial_cmp(&b.position)
      .unwrap_or(Ordering::Equal)
      .then(a.triangle.cmp(&b.triangle))
      .then(a.kind.cmp(&b.kind))
  }

  /// `self` sorts strictly before `other`.
  #[inline]
  pub fn precedes(&self, other: &BoxEdge) -> bool {
    Self::total_order(self, other) == Ordering::Less
  }
}

impl Default for BoxEdge {
  fn default() -> Self {
    Self::start(0.0, 0, Axis::X)
  }
}

/// Sorted edge lists, one per axis, for one set of active triangles.
///
/// Every triangle present has exactly one start and one end edge in each list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeLists {
  /// Lists indexed by [`Axis::index`].
  pub axes: [Vec<BoxEdge>; 3],
}

impl EdgeLists {
  /// Generate and sort the edges of every triangle of `mesh`.
  ///
  /// Generation runs in parallel per axis; each list is then ordered with
  /// [`parallel_mergesort_by`]. Call inside the worker pool.
  #[tracing::instrument(skip_all, name = "kdtree::edges")]
  pub fn from_source<S: TriangleSource + ?Sized>(mesh: &S) -> Self {
    let mut axes: [Vec<BoxEdge>; 3] = Default::default();
    axes[..]
      .par_iter_mut()
      .enumerate()
      .for_each(|(index, list)| {
        let axis = Axis::ALL[index];
        *list = generate_edges(mesh, axis);
        parallel_mergesort_by(list, BoxEdge::total_order);
      });

    tracing::debug!(edges_per_axis = axes[0].len(), "edge lists sorted");
    Self { axes }
  }

  /// List for one axis.
  #[inline]
  pub fn axis(&self, axis: Axis) -> &[BoxEdge] {
    &self.axes[axis.index()]
  }

  /// Number of active triangles.
  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.axes[0].len() / 2
  }

  /// Length of each list (twice the triangle count).
  #[inline]
  pub fn len(&self) -> usize {
    self.axes[0].len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.axes[0].is_empty()
  }

  /// Triangle indices in the order their X start edges appear.
  pub fn leaf_triangles(&self) -> Vec<u32> {
    self.axes[0]
      .iter()
      .filter(|edge| edge.is_start())
      .map(|edge| edge.triangle)
      .collect()
  }
}

/// Start and end edges of one triangle along one axis, in the given order.
pub fn triangle_edges(triangle: u32, lo: f32, hi: f32, axis: Axis) -> [BoxEdge; 2] {
  [BoxEdge::start(lo, triangle, axis), BoxEdge::end(hi, triangle, axis)]
}

/// Unsorted start/end edges of every triangle along `axis`.
pub fn generate_edges<S: TriangleSource + ?Sized>(mesh: &S, axis: Axis) -> Vec<BoxEdge> {
  (0..mesh.triangle_count())
    .into_par_iter()
    .flat_map_iter(|index| {
      let bounds = mesh.triangle_bounds(index);
      triangle_edges(index as u32, bounds.lo(axis), bounds.hi(axis), axis)
    })
    .collect()
}

/// Check a list against [`BoxEdge::total_order`].
pub fn is_sorted(edges: &[BoxEdge]) -> bool {
  edges
    .windows(2)
    .all(|pair| BoxEdge::total_order(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Rank of every triangle's start and end edge in the global sorted lists.
///
/// Lets "does this edge come before the split edge" be answered with an
/// integer comparison instead of a search.
#[derive(Clone, Debug, Default)]
pub struct EdgeRanks {
  ranks: [Vec<[u32; 2]>; 3],
}

impl EdgeRanks {
  /// Record ranks for `triangle_count` triangles from sorted lists.
  pub fn from_lists(lists: &EdgeLists, triangle_count: usize) -> Self {
    let mut ranks: [Vec<[u32; 2]>; 3] = Default::default();
    ranks[..]
      .par_iter_mut()
      .zip(lists.axes[..].par_iter())
      .for_each(|(ranks, edges)| {
        *ranks = vec![[0; 2]; triangle_count];
        for (rank, edge) in edges.iter().enumerate() {
          ranks[edge.triangle as usize][edge.kind as usize] = rank as u32;
        }
      });
    Self { ranks }
  }

  /// Rank of the start edge of `triangle` on `axis`.
  #[inline]
  pub fn start(&self, axis: Axis, triangle: u32) -> u32 {
    self.ranks[axis.index()][triangle as usize][EdgeType::Start as usize]
  }

  /// Rank of the end edge of `triangle` on `axis`.
  #[inline]
  pub fn end(&self, axis: Axis, triangle: u32) -> u32 {
    self.ranks[axis.index()][triangle as usize][EdgeType::End as usize]
  }
}

#[cfg(test)]
#[path = "edge_test.rs"]
mod edge_test;
