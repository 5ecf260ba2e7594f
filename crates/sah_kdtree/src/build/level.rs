//! Level-synchronous builder over one global edge array per axis.
//!
//! Instead of copying edge lists per node, every triangle carries a small
//! [`Membership`] set naming the live nodes it belongs to. A node's edge list
//! is the global list filtered by membership, which keeps it sorted.
//!
//! # Per level
//!
//! 1. best-plane search for every live node at once (four-phase, chunked
//!    over the global lists)
//! 2. the coordinating thread decides leaf or split for each node and
//!    reserves child slots from the frontier (the arena length)
//! 3. classification in parallel over disjoint triangle ranges; each range
//!    rewrites its own memberships and collects leaf triangles privately
//! 4. leaf buffers are merged sequentially and the leaves written
//!
//! Node ids come out level by level; the finished tree is renumbered to
//! pre-order so it matches [`NestedBuild`](super::NestedBuild) exactly.

use rayon::prelude::*;

use super::{BuildContext, BuildStrategy};
use crate::classify::Membership;
use crate::error::{BuildError, MembershipOverflow};
use crate::geometry::{Axis, BoundingBox};
use crate::plane::{EdgeTally, PlaneScanner, SplitCandidate, chunk_len};
use crate::tree::{KdTree, KdTreeNode, NodeId};

/// Flat strategy with per-triangle live-node membership.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelBuild;

/// A node waiting to be processed at the current level.
#[derive(Clone, Copy, Debug)]
struct LiveNode {
  id: NodeId,
  extent: BoundingBox,
  /// Triangles in the node.
  count: usize,
  /// Remaining depth.
  depth: u32,
}

impl LiveNode {
  fn can_split(&self) -> bool {
    self.depth > 0 && self.count > 0
  }
}

/// What happens to a live node; slots index the next level.
#[derive(Clone, Copy, Debug)]
enum Decision {
  Leaf,
  Split {
    candidate: SplitCandidate,
    left: u32,
    right: u32,
  },
}

impl BuildStrategy for LevelBuild {
  fn build(&self, ctx: &BuildContext<'_>) -> Result<KdTree, BuildError> {
    let mut arena: Vec<Option<KdTreeNode>> = vec![None];
    let mut live = vec![LiveNode {
      id: NodeId(0),
      extent: ctx.bounds,
      count: ctx.triangle_count,
      depth: ctx.config.max_depth,
    }];
    let mut memberships = vec![Membership::single(0); ctx.triangle_count];
    let mut level = 0u32;

    while !live.is_empty() {
      let candidates = best_planes(ctx, &live, &memberships);

      // Frontier: only this thread reserves slots.
      let mut decisions = Vec::with_capacity(live.len());
      let mut next = Vec::new();
      for (node, candidate) in live.iter().zip(candidates) {
        let Some(candidate) = candidate else {
          decisions.push(Decision::Leaf);
          continue;
        };

        let left_id = NodeId(arena.len() as u32);
        let right_id = NodeId(arena.len() as u32 + 1);
        arena.push(None);
        arena.push(None);
        arena[node.id.index()] = Some(KdTreeNode::interior(
          node.extent,
          candidate.axis,
          candidate.position,
          left_id,
          right_id,
        ));

        tracing::trace!(
          axis = ?candidate.axis,
          position = candidate.position,
          cost = candidate.cost,
          n_a = candidate.n_a,
          n_b = candidate.n_b,
          "split"
        );

        let (left_extent, right_extent) = node.extent.split(candidate.axis, candidate.position);
        let left = next.len() as u32;
        next.push(LiveNode {
          id: left_id,
          extent: left_extent,
          count: candidate.n_a,
          depth: node.depth - 1,
        });
        next.push(LiveNode {
          id: right_id,
          extent: right_extent,
          count: candidate.n_b,
          depth: node.depth - 1,
        });
        decisions.push(Decision::Split {
          candidate,
          left,
          right: left + 1,
        });
      }

      let leaf_lists = classify_level(ctx, &decisions, &mut memberships)
        .map_err(|err| BuildError::overflow(err, live.len()))?;

      let mut leaves = 0usize;
      for ((node, decision), triangles) in live.iter().zip(&decisions).zip(leaf_lists) {
        if let Decision::Leaf = decision {
          arena[node.id.index()] = Some(KdTreeNode::leaf(node.extent, triangles));
          leaves += 1;
        }
      }

      tracing::debug!(level, live = live.len(), next = next.len(), leaves, "level finished");
      live = next;
      level += 1;
    }

    let nodes = arena
      .into_iter()
      .enumerate()
      .map(|(id, node)| node.ok_or(BuildError::UnbuiltNode { id: id as u32 }))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(KdTree::from_nodes(nodes, NodeId(0)).into_preorder())
  }
}

/// Four-phase search over the global lists for every live node.
fn best_planes(
  ctx: &BuildContext<'_>,
  live: &[LiveNode],
  memberships: &[Membership],
) -> Vec<Option<SplitCandidate>> {
  let config = ctx.config;
  let active: Vec<bool> = live.iter().map(LiveNode::can_split).collect();
  if !active.contains(&true) {
    return vec![None; live.len()];
  }

  let len = ctx.edges.len();
  let chunks = if config.use_parallel_scan(len) {
    config.parallel_chunks()
  } else {
    1
  };
  let size = chunk_len(len, chunks);

  // Phase 1: tallies[axis][chunk][slot]
  let tallies: Vec<Vec<Vec<EdgeTally>>> = Axis::ALL
    .par_iter()
    .map(|&axis| {
      ctx
        .edges
        .axis(axis)
        .par_chunks(size)
        .map(|chunk| {
          let mut tally = vec![EdgeTally::default(); live.len()];
          for edge in chunk {
            for slot in searching_slots(&memberships[edge.triangle as usize], &active) {
              tally[slot].count(edge);
            }
          }
          tally
        })
        .collect()
    })
    .collect();

  // Phase 2
  let mut jobs: Vec<(Axis, usize, Vec<EdgeTally>)> = Vec::new();
  for (&axis, per_chunk) in Axis::ALL.iter().zip(&tallies) {
    let mut running = vec![EdgeTally::default(); live.len()];
    for (chunk, tally) in per_chunk.iter().enumerate() {
      jobs.push((axis, chunk, running.clone()));
      for (sum, part) in running.iter_mut().zip(tally) {
        *sum = sum.add(*part);
      }
    }
  }

  // Phase 3
  let locals: Vec<Vec<Option<SplitCandidate>>> = jobs
    .par_iter()
    .map(|(axis, chunk, baselines)| {
      let edges = ctx.edges.axis(*axis);
      let start = chunk * size;
      let end = (start + size).min(edges.len());
      let mut scanners: Vec<PlaneScanner<'_>> = live
        .iter()
        .zip(baselines)
        .map(|(node, &baseline)| {
          PlaneScanner::new(&config.sah, node.extent, *axis, node.count, baseline)
        })
        .collect();
      for (offset, edge) in edges[start..end].iter().enumerate() {
        for slot in searching_slots(&memberships[edge.triangle as usize], &active) {
          scanners[slot].visit(start + offset, edge);
        }
      }
      scanners.into_iter().map(PlaneScanner::finish).collect()
    })
    .collect();

  // Phase 4
  let mut best = vec![None; live.len()];
  for local in locals {
    for (best, candidate) in best.iter_mut().zip(local) {
      *best = SplitCandidate::pick(*best, candidate);
    }
  }
  best
}

/// Slots of `membership` whose nodes are still looking for a split.
fn searching_slots<'a>(
  membership: &'a Membership,
  active: &'a [bool],
) -> impl Iterator<Item = usize> + 'a {
  membership
    .slots()
    .iter()
    .map(|&slot| slot as usize)
    .filter(move |&slot| active[slot])
}

/// Move every triangle into the child slots of its nodes, returning the
/// triangles of each leaf slot ordered by X start edge.
fn classify_level(
  ctx: &BuildContext<'_>,
  decisions: &[Decision],
  memberships: &mut [Membership],
) -> Result<Vec<Vec<u32>>, MembershipOverflow> {
  let config = ctx.config;
  let capacity = config.membership_capacity;
  let ranks = &ctx.ranks;

  let chunks = if config.use_parallel_scan(ctx.edges.len()) {
    config.parallel_chunks()
  } else {
    1
  };
  let size = chunk_len(memberships.len(), chunks);

  let buffers = memberships
    .par_chunks_mut(size)
    .enumerate()
    .map(|(chunk, owned)| -> Result<Vec<(u32, u32)>, MembershipOverflow> {
      let first = chunk * size;
      let mut leaves = Vec::new();
      for (offset, membership) in owned.iter_mut().enumerate() {
        let triangle = (first + offset) as u32;
        let current = std::mem::take(membership);
        for &slot in current.slots() {
          match decisions[slot as usize] {
            Decision::Leaf => leaves.push((slot, triangle)),
            Decision::Split {
              candidate,
              left,
              right,
            } => {
              let split = candidate.edge_index as u32;
              if ranks.start(candidate.axis, triangle) < split {
                membership.try_insert(triangle, left, capacity)?;
              }
              if ranks.end(candidate.axis, triangle) > split {
                membership.try_insert(triangle, right, capacity)?;
              }
            }
          }
        }
      }
      Ok(leaves)
    })
    .collect::<Result<Vec<_>, MembershipOverflow>>()?;

  let mut lists = vec![Vec::new(); decisions.len()];
  for buffer in buffers {
    for (slot, triangle) in buffer {
      lists[slot as usize].push(triangle);
    }
  }
  lists
    .par_iter_mut()
    .for_each(|list| list.sort_unstable_by_key(|&triangle| ranks.start(Axis::X, triangle)));
  Ok(lists)
}

#[cfg(test)]
#[path = "level_test.rs"]
mod level_test;
