//! Build-wide defaults and tuning thresholds.
//!
//! Cost defaults follow the classic kd-tree SAH setup: traversing a node is
//! cheaper than intersecting a triangle, and empty-space cuts get no bonus
//! unless asked for.
//!
//! ```text
//! cost(split) = Ct + Ci * (pA * nA + pB * nB)
//! cost(leaf)  =      Ci * n
//! ```

/// Default node traversal cost (`Ct`).
pub const DEFAULT_TRAVERSAL_COST: f32 = 15.0;

/// Default triangle intersection cost (`Ci`).
pub const DEFAULT_INTERSECTION_COST: f32 = 20.0;

/// Default empty-space bonus, in `[0, 1]`.
pub const DEFAULT_EMPTY_BONUS: f32 = 0.0;

/// Default maximum tree depth.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Maximum number of live nodes a single triangle may belong to at once.
///
/// Exceeding it aborts the build with
/// [`BuildError::MembershipOverflow`](crate::BuildError::MembershipOverflow).
pub const DEFAULT_MEMBERSHIP_CAPACITY: usize = 11;

/// Inline slots of a [`Membership`](crate::classify::Membership) before it
/// spills to the heap.
pub const MEMBERSHIP_INLINE: usize = 4;

/// Sequential cutoff for [`parallel_mergesort`](crate::sort::parallel_mergesort)
/// and its merge step.
pub const MERGESORT_MIN_SIZE: usize = 1024;

/// Edge lists shorter than this are scanned and split sequentially.
pub const DEFAULT_MIN_PARALLEL_EDGES: usize = 4096;

/// Child edge-list length above which a subtree is forked as its own task.
pub const DEFAULT_FORK_THRESHOLD: usize = 2048;

/// Number of coordinate axes.
pub const AXES: usize = 3;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
