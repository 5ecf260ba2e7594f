//! Triangle classification and edge-list splitting.
//!
//! Given the winning edge of a node, each active triangle is tested on the
//! split axis:
//!
//! ```text
//!   left   iff  its START edge precedes the split edge
//!   right  iff  its END edge follows the split edge
//! ```
//!
//! A triangle passing both tests straddles the plane and belongs to both
//! children. The split edge itself takes part in neither test, so the child
//! sizes equal the `n_a` and `n_b` of the candidate.
//!
//! A node records sides in a [`MembershipTable`] indexed by triangle id, so
//! every lookup while filtering the child lists is a single load. The
//! level-synchronous builder keeps a bounded [`Membership`] set per triangle
//! instead. In both, inserting past the bound is an error, never a silent
//! truncation.

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::config::AllocationStrategy;
use crate::constants::MEMBERSHIP_INLINE;
use crate::error::MembershipOverflow;
use crate::geometry::{Axis, BoxEdge, EdgeLists};
use crate::plane::{SplitCandidate, chunk_len};

/// Bounded set of node slots a triangle currently belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Membership {
  slots: SmallVec<[u32; MEMBERSHIP_INLINE]>,
}

impl Membership {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set holding only `slot`.
  pub fn single(slot: u32) -> Self {
    let mut slots = SmallVec::new();
    slots.push(slot);
    Self { slots }
  }

  /// Add `slot` for `triangle`.
  ///
  /// Inserting a slot already present is a no-op. Fails when the set already
  /// holds `capacity` slots.
  pub fn try_insert(
    &mut self,
    triangle: u32,
    slot: u32,
    capacity: usize,
  ) -> Result<(), MembershipOverflow> {
    if self.slots.contains(&slot) {
      return Ok(());
    }
    if self.slots.len() >= capacity {
      return Err(MembershipOverflow { triangle, capacity });
    }
    self.slots.push(slot);
    Ok(())
  }

  #[inline]
  pub fn contains(&self, slot: u32) -> bool {
    self.slots.contains(&slot)
  }

  #[inline]
  pub fn slots(&self) -> &[u32] {
    &self.slots
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }
}

/// Child side of a split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
  Left = 0,
  Right = 1,
}

impl Side {
  /// Bit of this side in a [`MembershipTable`] entry.
  #[inline]
  pub fn bit(self) -> u8 {
    1 << self as u8
  }
}

/// Sides of every triangle of one node, indexed directly by triangle id.
///
/// Entries are side bitmasks; triangles outside the node stay zero. Setting
/// a side counts against the membership capacity like
/// [`Membership::try_insert`].
#[derive(Clone, Debug, Default)]
pub struct MembershipTable {
  sides: Vec<u8>,
  capacity: usize,
}

impl MembershipTable {
  /// Empty table covering triangle ids `0..len`.
  pub fn new(len: usize, capacity: usize) -> Self {
    Self {
      sides: vec![0; len],
      capacity,
    }
  }

  /// Side bits of `triangle`; zero when it is not in the node.
  #[inline]
  pub fn bits(&self, triangle: u32) -> u8 {
    self.sides.get(triangle as usize).copied().unwrap_or(0)
  }

  /// Whether `triangle` goes to `side`.
  #[inline]
  pub fn on_side(&self, triangle: u32, side: Side) -> bool {
    self.bits(triangle) & side.bit() != 0
  }

  fn insert(&mut self, triangle: u32, side: Side) -> Result<(), MembershipOverflow> {
    let capacity = self.capacity;
    let Some(bits) = self.sides.get_mut(triangle as usize) else {
      return Ok(());
    };
    if *bits & side.bit() != 0 {
      return Ok(());
    }
    if bits.count_ones() as usize >= capacity {
      return Err(MembershipOverflow { triangle, capacity });
    }
    *bits |= side.bit();
    Ok(())
  }

  /// Triangle ids covered, one past the largest id in the node.
  pub fn len(&self) -> usize {
    self.sides.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sides.is_empty()
  }
}

/// Outcome of classifying a node's triangles against its split.
#[derive(Clone, Debug)]
pub struct Classification {
  pub table: MembershipTable,
  /// Triangles only in the left child.
  pub left_only: usize,
  /// Triangles only in the right child.
  pub right_only: usize,
  /// Triangles in both children, counted once.
  pub straddling: usize,
}

/// Assign every triangle of `lists` to the sides of `candidate`.
///
/// `candidate` must come from a search over these same lists, so that
/// `edge_index` points into `lists.axis(candidate.axis)`.
pub fn classify(
  lists: &EdgeLists,
  candidate: &SplitCandidate,
  capacity: usize,
) -> Result<Classification, MembershipOverflow> {
  let edges = lists.axis(candidate.axis);
  let split = candidate.edge_index;

  let len = edges
    .iter()
    .map(|edge| edge.triangle as usize + 1)
    .max()
    .unwrap_or(0);
  let mut table = MembershipTable::new(len, capacity);

  for (index, edge) in edges.iter().enumerate() {
    if index < split && edge.is_start() {
      table.insert(edge.triangle, Side::Left)?;
    } else if index > split && edge.is_end() {
      table.insert(edge.triangle, Side::Right)?;
    }
  }

  let (left, right) = (Side::Left.bit(), Side::Right.bit());
  let mut classification = Classification {
    table,
    left_only: 0,
    right_only: 0,
    straddling: 0,
  };
  for edge in edges.iter().filter(|edge| edge.is_start()) {
    let bits = classification.table.bits(edge.triangle);
    match (bits & left != 0, bits & right != 0) {
      (true, true) => classification.straddling += 1,
      (true, false) => classification.left_only += 1,
      (false, true) => classification.right_only += 1,
      (false, false) => {}
    }
  }
  Ok(classification)
}

impl Classification {
  /// Triangles in the left child, straddlers included.
  #[inline]
  pub fn left_count(&self) -> usize {
    self.left_only + self.straddling
  }

  /// Triangles in the right child, straddlers included.
  #[inline]
  pub fn right_count(&self) -> usize {
    self.right_only + self.straddling
  }

  /// Distinct triangles across both children.
  #[inline]
  pub fn total(&self) -> usize {
    self.left_only + self.right_only + self.straddling
  }

  /// Filter `lists` into the left and right child lists.
  ///
  /// Filtering keeps the order of every list. With `chunks > 1` each axis is
  /// filtered in parallel chunks, allocating per `allocation`.
  pub fn split_lists(
    &self,
    lists: &EdgeLists,
    allocation: AllocationStrategy,
    chunks: usize,
  ) -> (EdgeLists, EdgeLists) {
    let counts = [2 * self.left_count(), 2 * self.right_count()];
    let mut left: [Vec<BoxEdge>; 3] = Default::default();
    let mut right: [Vec<BoxEdge>; 3] = Default::default();

    left[..]
      .par_iter_mut()
      .zip(right[..].par_iter_mut())
      .enumerate()
      .for_each(|(index, (left, right))| {
        let edges = lists.axis(Axis::ALL[index]);
        let (l, r) = if chunks <= 1 {
          self.filter_sequential(edges, counts)
        } else {
          match allocation {
            AllocationStrategy::Exact => self.filter_presplit(edges, counts, chunks),
            AllocationStrategy::Amortized => self.filter_amortized(edges),
          }
        };
        *left = l;
        *right = r;
      });

    (EdgeLists { axes: left }, EdgeLists { axes: right })
  }

  fn filter_sequential(
    &self,
    edges: &[BoxEdge],
    counts: [usize; 2],
  ) -> (Vec<BoxEdge>, Vec<BoxEdge>) {
    let mut left = Vec::with_capacity(counts[0]);
    let mut right = Vec::with_capacity(counts[1]);
    for edge in edges {
      let bits = self.table.bits(edge.triangle);
      if bits & Side::Left.bit() != 0 {
        left.push(*edge);
      }
      if bits & Side::Right.bit() != 0 {
        right.push(*edge);
      }
    }
    (left, right)
  }

  fn filter_amortized(&self, edges: &[BoxEdge]) -> (Vec<BoxEdge>, Vec<BoxEdge>) {
    rayon::join(
      || {
        edges
          .par_iter()
          .filter(|edge| self.table.on_side(edge.triangle, Side::Left))
          .copied()
          .collect()
      },
      || {
        edges
          .par_iter()
          .filter(|edge| self.table.on_side(edge.triangle, Side::Right))
          .copied()
          .collect()
      },
    )
  }

  /// Count each chunk's output, then write every chunk into its own region
  /// of exactly sized outputs.
  fn filter_presplit(
    &self,
    edges: &[BoxEdge],
    counts: [usize; 2],
    chunks: usize,
  ) -> (Vec<BoxEdge>, Vec<BoxEdge>) {
    let size = chunk_len(edges.len(), chunks);

    let per_chunk: Vec<[usize; 2]> = edges
      .par_chunks(size)
      .map(|chunk| {
        let mut count = [0usize; 2];
        for edge in chunk {
          let bits = self.table.bits(edge.triangle);
          count[0] += (bits & Side::Left.bit() != 0) as usize;
          count[1] += (bits & Side::Right.bit() != 0) as usize;
        }
        count
      })
      .collect();

    let mut left = vec![BoxEdge::default(); counts[0]];
    let mut right = vec![BoxEdge::default(); counts[1]];
    let left_parts = carve(&mut left, per_chunk.iter().map(|c| c[0]));
    let right_parts = carve(&mut right, per_chunk.iter().map(|c| c[1]));

    edges
      .par_chunks(size)
      .zip(left_parts)
      .zip(right_parts)
      .for_each(|((chunk, left), right)| {
        let (mut l, mut r) = (0, 0);
        for edge in chunk {
          let bits = self.table.bits(edge.triangle);
          if bits & Side::Left.bit() != 0 {
            left[l] = *edge;
            l += 1;
          }
          if bits & Side::Right.bit() != 0 {
            right[r] = *edge;
            r += 1;
          }
        }
        debug_assert_eq!((l, r), (left.len(), right.len()));
      });

    (left, right)
  }
}

/// Cut `out` into consecutive disjoint slices of the given lengths.
fn carve<'a, T>(mut out: &'a mut [T], lengths: impl Iterator<Item = usize>) -> Vec<&'a mut [T]> {
  let mut parts = Vec::new();
  for len in lengths {
    let (head, tail) = std::mem::take(&mut out).split_at_mut(len);
    parts.push(head);
    out = tail;
  }
  parts
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;
