//! Finished KD-tree.
//!
//! Nodes live in one arena and refer to each other by [`NodeId`]. The tree is
//! read-only once built; serializers and visualizers walk it through the
//! accessors here.
//!
//! ```text
//!   nodes: [ root | left ... | right ... ]     (pre-order)
//!            |
//!            +-- Interior { axis, position, left, right }
//! ```

pub mod node;

pub use node::{KdTreeNode, NodeId, NodeKind};

use crate::geometry::{Axis, BoundingBox};

/// KD-tree over triangle bounding boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct KdTree {
  nodes: Vec<KdTreeNode>,
  root: NodeId,
}

impl KdTree {
  /// Wrap an arena. Every child id must index into `nodes`.
  pub fn from_nodes(nodes: Vec<KdTreeNode>, root: NodeId) -> Self {
    debug_assert!(root.index() < nodes.len());
    Self { nodes, root }
  }

  #[inline]
  pub fn root(&self) -> NodeId {
    self.root
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> Option<&KdTreeNode> {
    self.nodes.get(id.index())
  }

  /// All nodes in arena order.
  #[inline]
  pub fn nodes(&self) -> &[KdTreeNode] {
    &self.nodes
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn left(&self, id: NodeId) -> Option<NodeId> {
    self.node(id)?.children().map(|(left, _)| left)
  }

  pub fn right(&self, id: NodeId) -> Option<NodeId> {
    self.node(id)?.children().map(|(_, right)| right)
  }

  pub fn extent(&self, id: NodeId) -> Option<BoundingBox> {
    self.node(id).map(|node| node.extent)
  }

  pub fn split(&self, id: NodeId) -> Option<(Axis, f32)> {
    self.node(id)?.split()
  }

  pub fn triangles(&self, id: NodeId) -> Option<&[u32]> {
    self.node(id)?.triangles()
  }

  pub fn is_leaf(&self, id: NodeId) -> bool {
    self.node(id).is_some_and(KdTreeNode::is_leaf)
  }

  /// Pre-order walk from the root: node, left subtree, right subtree.
  pub fn iter(&self) -> PreOrder<'_> {
    PreOrder {
      tree: self,
      stack: vec![(self.root, 0)],
    }
  }

  /// Deepest leaf level; a lone root leaf has depth 0.
  pub fn depth(&self) -> u32 {
    self.iter().map(|(_, depth, _)| depth).max().unwrap_or(0)
  }

  pub fn leaf_count(&self) -> usize {
    self.iter().filter(|(_, _, node)| node.is_leaf()).count()
  }

  /// Total triangle references over all leaves, straddlers counted per leaf.
  pub fn triangle_references(&self) -> usize {
    self
      .iter()
      .filter_map(|(_, _, node)| node.triangles())
      .map(<[u32]>::len)
      .sum()
  }

  /// Renumber the arena so node ids follow pre-order, root first.
  pub fn into_preorder(self) -> Self {
    let order: Vec<NodeId> = self.iter().map(|(id, _, _)| id).collect();
    let mut remap = vec![NodeId(0); self.nodes.len()];
    for (new, old) in order.iter().enumerate() {
      remap[old.index()] = NodeId(new as u32);
    }

    let mut slots: Vec<Option<KdTreeNode>> = self.nodes.into_iter().map(Some).collect();
    let nodes = order
      .iter()
      .filter_map(|old| slots[old.index()].take())
      .map(|mut node| {
        if let NodeKind::Interior { left, right, .. } = &mut node.kind {
          *left = remap[left.index()];
          *right = remap[right.index()];
        }
        node
      })
      .collect();

    Self {
      nodes,
      root: NodeId(0),
    }
  }
}

/// Pre-order iterator yielding `(id, depth, node)`.
pub struct PreOrder<'a> {
  tree: &'a KdTree,
  stack: Vec<(NodeId, u32)>,
}

impl<'a> Iterator for PreOrder<'a> {
  type Item = (NodeId, u32, &'a KdTreeNode);

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let (id, depth) = self.stack.pop()?;
      let Some(node) = self.tree.node(id) else {
        continue;
      };
      if let Some((left, right)) = node.children() {
        self.stack.push((right, depth + 1));
        self.stack.push((left, depth + 1));
      }
      return Some((id, depth, node));
    }
  }
}
