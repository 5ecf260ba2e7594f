//! Build errors.

use thiserror::Error;

/// A triangle would belong to more live nodes than its membership set holds.
///
/// Returned by [`Membership::try_insert`](crate::classify::Membership::try_insert)
/// instead of truncating the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("triangle {triangle} exceeds membership capacity {capacity}")]
pub struct MembershipOverflow {
  /// Triangle whose membership overflowed.
  pub triangle: u32,
  /// Configured bound.
  pub capacity: usize,
}

/// Errors produced while validating input or building a tree.
#[derive(Debug, Error)]
pub enum BuildError {
  /// `num_workers == 0`.
  #[error("worker count must be at least 1")]
  ZeroWorkers,

  /// `max_depth == 0`.
  #[error("maximum depth must be at least 1")]
  ZeroDepth,

  /// The mesh has no triangles.
  #[error("mesh has no triangles")]
  EmptyMesh,

  /// A triangle has a NaN or infinite bound.
  #[error("triangle {triangle} has non-finite bounds")]
  NonFiniteBounds {
    /// Offending triangle index.
    triangle: u32,
  },

  /// SAH parameters out of range.
  #[error("invalid SAH parameters: {reason}")]
  InvalidSah {
    /// What was wrong.
    reason: &'static str,
  },

  /// An index triple points past the vertex buffer.
  #[error("triangle {triangle} references missing vertex {index}")]
  IndexOutOfRange {
    /// Triangle being assembled.
    triangle: u32,
    /// Offending vertex index.
    index: u32,
  },

  /// Membership capacity of zero.
  #[error("membership capacity must be at least 1")]
  InvalidMembershipCapacity,

  /// Fatal: a triangle belongs to more live nodes than allowed.
  #[error("membership overflow: capacity {capacity} exceeded with {live} live nodes")]
  MembershipOverflow {
    /// Configured bound.
    capacity: usize,
    /// Live nodes sharing the overflowing membership set: every node of the
    /// level for the level-synchronous build, the two children of the split
    /// for the nested build.
    live: usize,
  },

  /// The worker pool could not be created.
  #[error("failed to build worker pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),

  /// A reserved node slot was never filled.
  #[error("node {id} was reserved but never built")]
  UnbuiltNode {
    /// Arena index of the empty slot.
    id: u32,
  },
}

impl BuildError {
  /// Wrap a membership overflow with the live-node count it happened at.
  pub fn overflow(err: MembershipOverflow, live: usize) -> Self {
    tracing::warn!(
      triangle = err.triangle,
      capacity = err.capacity,
      live,
      "membership overflow"
    );
    BuildError::MembershipOverflow {
      capacity: err.capacity,
      live,
    }
  }
}
