//! Copy-based recursive builder.
//!
//! Each node receives its own sorted edge lists, searches them for the best
//! plane, classifies its triangles and filters the lists into two owned child
//! copies. Children are built recursively into an [`InterimNode`] tree, which
//! is flattened into the arena in pre-order once every subtree is done.
//!
//! # Scheduling
//!
//! | left list > threshold | right list > threshold | action                        |
//! |-----------------------|------------------------|-------------------------------|
//! | yes                   | yes                    | `join(left, right)`           |
//! | no                    | yes                    | left inline, right stealable  |
//! | yes                   | no                     | right inline, left stealable  |
//! | no                    | no                     | both inline                   |

use super::{BuildContext, BuildStrategy};
use crate::classify::classify;
use crate::config::{BuildConfig, Scheduling};
use crate::error::BuildError;
use crate::geometry::{Axis, BoundingBox, EdgeLists};
use crate::plane::{find_best_plane, find_best_plane_chunked};
use crate::tree::{KdTree, KdTreeNode, NodeId};

/// Live nodes reported on membership overflow. Each split classifies into
/// its own table, so only its two children share it.
const CHILDREN: usize = 2;

/// Copy-based strategy with fork/join subtree scheduling.
#[derive(Clone, Copy, Debug, Default)]
pub struct NestedBuild;

impl BuildStrategy for NestedBuild {
  fn build(&self, ctx: &BuildContext<'_>) -> Result<KdTree, BuildError> {
    let root = subtree(ctx, &ctx.edges, ctx.bounds, ctx.config.max_depth)?;
    let mut nodes = Vec::with_capacity(root.count());
    let root = root.crystallize(&mut nodes);
    Ok(KdTree::from_nodes(nodes, root))
  }
}

/// Subtree built by one task, before it is placed in the arena.
#[derive(Debug)]
pub enum InterimNode {
  Leaf {
    extent: BoundingBox,
    triangles: Vec<u32>,
  },
  Interior {
    extent: BoundingBox,
    axis: Axis,
    position: f32,
    children: Box<[InterimNode; 2]>,
  },
}

impl InterimNode {
  fn leaf(extent: BoundingBox, lists: &EdgeLists) -> Self {
    InterimNode::Leaf {
      extent,
      triangles: lists.leaf_triangles(),
    }
  }

  /// Nodes in this subtree.
  pub fn count(&self) -> usize {
    match self {
      InterimNode::Leaf { .. } => 1,
      InterimNode::Interior { children, .. } => 1 + children[0].count() + children[1].count(),
    }
  }

  /// Append this subtree to `nodes` in pre-order and return its id.
  pub fn crystallize(self, nodes: &mut Vec<KdTreeNode>) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    match self {
      InterimNode::Leaf { extent, triangles } => {
        nodes.push(KdTreeNode::leaf(extent, triangles));
      }
      InterimNode::Interior {
        extent,
        axis,
        position,
        children,
      } => {
        // Placeholder until both child ids are known.
        nodes.push(KdTreeNode::leaf(extent, Vec::new()));
        let [left, right] = *children;
        let left = left.crystallize(nodes);
        let right = right.crystallize(nodes);
        nodes[id.index()] = KdTreeNode::interior(extent, axis, position, left, right);
      }
    }
    id
  }
}

fn subtree(
  ctx: &BuildContext<'_>,
  lists: &EdgeLists,
  extent: BoundingBox,
  depth: u32,
) -> Result<InterimNode, BuildError> {
  if depth == 0 || lists.is_empty() {
    return Ok(InterimNode::leaf(extent, lists));
  }

  let config = ctx.config;
  let parallel = config.use_parallel_scan(lists.len());
  let best = if parallel {
    find_best_plane_chunked(lists, &extent, &config.sah, config.parallel_chunks())
  } else {
    find_best_plane(lists, &extent, &config.sah)
  };
  let Some(best) = best else {
    return Ok(InterimNode::leaf(extent, lists));
  };

  tracing::trace!(
    axis = ?best.axis,
    position = best.position,
    cost = best.cost,
    n_a = best.n_a,
    n_b = best.n_b,
    "split"
  );

  let (left_lists, right_lists) = {
    let class = classify(lists, &best, config.membership_capacity)
      .map_err(|err| BuildError::overflow(err, CHILDREN))?;
    let chunks = if parallel { config.parallel_chunks() } else { 1 };
    class.split_lists(lists, config.allocation, chunks)
  };
  let (left_extent, right_extent) = extent.split(best.axis, best.position);

  let (left, right) = schedule(
    config,
    left_lists.len(),
    right_lists.len(),
    || subtree(ctx, &left_lists, left_extent, depth - 1),
    || subtree(ctx, &right_lists, right_extent, depth - 1),
  );

  Ok(InterimNode::Interior {
    extent,
    axis: best.axis,
    position: best.position,
    children: Box::new([left?, right?]),
  })
}

/// Run both child builds according to their list sizes.
fn schedule<L, R, A, B>(
  config: &BuildConfig,
  left_len: usize,
  right_len: usize,
  left: L,
  right: R,
) -> (A, B)
where
  L: FnOnce() -> A + Send,
  R: FnOnce() -> B + Send,
  A: Send,
  B: Send,
{
  if config.scheduling == Scheduling::Sequential {
    return (left(), right());
  }

  let threshold = config.fork_threshold;
  match (left_len > threshold, right_len > threshold) {
    // `join` runs its first closure inline and offers the second for stealing.
    (_, true) => rayon::join(left, right),
    (true, false) => {
      let (b, a) = rayon::join(right, left);
      (a, b)
    }
    (false, false) => (left(), right()),
  }
}

#[cfg(test)]
#[path = "nested_test.rs"]
mod nested_test;
