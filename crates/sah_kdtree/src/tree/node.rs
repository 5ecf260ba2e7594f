//! Tree nodes and their ids.

use crate::geometry::{Axis, BoundingBox};

/// Index of a node in the tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Leaf payload or split description.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
  /// Triangle indices, in the order of their X start edges.
  Leaf { triangles: Vec<u32> },
  /// Split plane and the two children.
  Interior {
    axis: Axis,
    position: f32,
    left: NodeId,
    right: NodeId,
  },
}

/// One node of a [`KdTree`](super::KdTree).
#[derive(Clone, Debug, PartialEq)]
pub struct KdTreeNode {
  /// Region of space the node covers.
  pub extent: BoundingBox,
  pub kind: NodeKind,
}

impl KdTreeNode {
  pub fn leaf(extent: BoundingBox, triangles: Vec<u32>) -> Self {
    Self {
      extent,
      kind: NodeKind::Leaf { triangles },
    }
  }

  pub fn interior(
    extent: BoundingBox,
    axis: Axis,
    position: f32,
    left: NodeId,
    right: NodeId,
  ) -> Self {
    Self {
      extent,
      kind: NodeKind::Interior {
        axis,
        position,
        left,
        right,
      },
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf { .. })
  }

  /// Leaf triangles; None for interior nodes.
  #[inline]
  pub fn triangles(&self) -> Option<&[u32]> {
    match &self.kind {
      NodeKind::Leaf { triangles } => Some(triangles.as_slice()),
      NodeKind::Interior { .. } => None,
    }
  }

  /// `(left, right)` children; None for leaves.
  #[inline]
  pub fn children(&self) -> Option<(NodeId, NodeId)> {
    match self.kind {
      NodeKind::Interior { left, right, .. } => Some((left, right)),
      NodeKind::Leaf { .. } => None,
    }
  }

  /// `(axis, position)` of the split; None for leaves.
  #[inline]
  pub fn split(&self) -> Option<(Axis, f32)> {
    match self.kind {
      NodeKind::Interior { axis, position, .. } => Some((axis, position)),
      NodeKind::Leaf { .. } => None,
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
