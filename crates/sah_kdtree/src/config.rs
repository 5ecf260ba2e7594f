//! Build configuration.
//!
//! [`SahParams`] holds the cost model; [`BuildConfig`] adds everything that
//! controls how the work is spread across threads. Both are plain data with
//! public fields and `const` presets.

use crate::constants::{
  DEFAULT_EMPTY_BONUS, DEFAULT_FORK_THRESHOLD, DEFAULT_INTERSECTION_COST, DEFAULT_MAX_DEPTH,
  DEFAULT_MEMBERSHIP_CAPACITY, DEFAULT_MIN_PARALLEL_EDGES, DEFAULT_TRAVERSAL_COST,
};
use crate::error::BuildError;

/// Surface area heuristic parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SahParams {
  /// Cost of traversing one interior node (`Ct`).
  pub traversal_cost: f32,
  /// Cost of intersecting one triangle (`Ci`).
  pub intersection_cost: f32,
  /// Discount in `[0, 1]` for splits that leave one side empty.
  pub empty_bonus: f32,
}

impl SahParams {
  pub const DEFAULT: Self = Self {
    traversal_cost: DEFAULT_TRAVERSAL_COST,
    intersection_cost: DEFAULT_INTERSECTION_COST,
    empty_bonus: DEFAULT_EMPTY_BONUS,
  };

  /// Cost of keeping `triangles` in a leaf.
  #[inline]
  pub fn leaf_cost(&self, triangles: usize) -> f32 {
    self.intersection_cost * triangles as f32
  }

  /// Reject negative or non-finite costs and a bonus outside `[0, 1]`.
  pub fn validate(&self) -> Result<(), BuildError> {
    if !(self.traversal_cost.is_finite() && self.traversal_cost >= 0.0) {
      return Err(BuildError::InvalidSah {
        reason: "traversal cost must be finite and non-negative",
      });
    }
    if !(self.intersection_cost.is_finite() && self.intersection_cost >= 0.0) {
      return Err(BuildError::InvalidSah {
        reason: "intersection cost must be finite and non-negative",
      });
    }
    if !(0.0..=1.0).contains(&self.empty_bonus) {
      return Err(BuildError::InvalidSah {
        reason: "empty bonus must lie in [0, 1]",
      });
    }
    Ok(())
  }
}

impl Default for SahParams {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Backing strategy for the build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
  /// Every node owns filtered copies of its edge lists.
  #[default]
  Nested,
  /// One global edge array per axis, processed level by level.
  LevelSynchronous,
}

/// How the nested strategy schedules child subtrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheduling {
  /// Build both children on the calling thread.
  Sequential,
  /// Fork children whose edge lists exceed `fork_threshold`.
  #[default]
  ForkJoin,
}

/// How child edge lists are allocated during a parallel split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AllocationStrategy {
  /// Count each chunk's output first, then write into exactly sized lists.
  #[default]
  Exact,
  /// Let each chunk's output grow on demand and concatenate.
  Amortized,
}

/// Full build configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
  /// Maximum tree depth; the root is at depth 0.
  pub max_depth: u32,
  /// Worker threads in the pool.
  pub num_workers: usize,
  /// Child edge-list length above which a subtree becomes its own task.
  pub fork_threshold: usize,
  pub sah: SahParams,
  pub strategy: Strategy,
  pub scheduling: Scheduling,
  /// Live nodes one triangle may belong to at once.
  pub membership_capacity: usize,
  /// Chunks per parallel scan (0 = one per worker).
  pub scan_chunks: usize,
  /// Lists shorter than this are scanned and split sequentially.
  pub min_parallel_edges: usize,
  pub allocation: AllocationStrategy,
  /// Take the chunked scan and split paths even when they cannot pay off.
  pub superfluous_prescans: bool,
}

impl BuildConfig {
  /// Configuration with the given depth, workers and cost model; everything
  /// else at defaults.
  pub fn new(max_depth: u32, num_workers: usize, sah: SahParams) -> Self {
    Self {
      max_depth,
      num_workers,
      sah,
      ..Self::default()
    }
  }

  /// Chunks used by the parallel scan and split.
  #[inline]
  pub fn chunk_count(&self) -> usize {
    if self.scan_chunks == 0 {
      self.num_workers.max(1)
    } else {
      self.scan_chunks
    }
  }

  /// Chunks for a list that takes the chunked path.
  ///
  /// Forced prescans always get at least two chunks so the split path is
  /// chunked too.
  #[inline]
  pub fn parallel_chunks(&self) -> usize {
    if self.superfluous_prescans {
      self.chunk_count().max(2)
    } else {
      self.chunk_count()
    }
  }

  /// Whether a list of `len` edges takes the chunked path.
  #[inline]
  pub fn use_parallel_scan(&self, len: usize) -> bool {
    self.superfluous_prescans || (self.chunk_count() > 1 && len >= self.min_parallel_edges)
  }

  /// Entry checks that do not need the mesh.
  pub fn validate(&self) -> Result<(), BuildError> {
    if self.num_workers == 0 {
      return Err(BuildError::ZeroWorkers);
    }
    if self.max_depth == 0 {
      return Err(BuildError::ZeroDepth);
    }
    if self.membership_capacity == 0 {
      return Err(BuildError::InvalidMembershipCapacity);
    }
    self.sah.validate()
  }
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
      num_workers: std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1),
      fork_threshold: DEFAULT_FORK_THRESHOLD,
      sah: SahParams::DEFAULT,
      strategy: Strategy::default(),
      scheduling: Scheduling::default(),
      membership_capacity: DEFAULT_MEMBERSHIP_CAPACITY,
      scan_chunks: 0,
      min_parallel_edges: DEFAULT_MIN_PARALLEL_EDGES,
      allocation: AllocationStrategy::default(),
      superfluous_prescans: false,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
