use std::collections::HashSet;

use glam::Vec3;
use proptest::prelude::*;

use super::*;
use crate::geometry::BoundingBox;

fn slab(lo: f32, hi: f32) -> BoundingBox {
  BoundingBox::new(Vec3::new(lo, 0.0, 0.0), Vec3::new(hi, 1.0, 1.0))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_order_by_position() {
  let a = BoxEdge::end(1.0, 7, Axis::X);
  let b = BoxEdge::start(2.0, 0, Axis::X);
  assert!(a.precedes(&b));
  assert!(!b.precedes(&a));
}

#[test]
fn test_order_ties_break_on_triangle_then_kind() {
  let start_0 = BoxEdge::start(1.0, 0, Axis::X);
  let end_0 = BoxEdge::end(1.0, 0, Axis::X);
  let start_1 = BoxEdge::start(1.0, 1, Axis::X);

  assert!(start_0.precedes(&end_0));
  assert!(end_0.precedes(&start_1));
  assert_eq!(BoxEdge::total_order(&start_0, &start_0), Ordering::Equal);
}

#[test]
fn test_negative_zero_ties_with_zero() {
  let a = BoxEdge::start(-0.0, 3, Axis::Y);
  let b = BoxEdge::start(0.0, 2, Axis::Y);
  // Equal positions, so triangle 2 wins.
  assert!(b.precedes(&a));
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn test_generate_two_edges_per_triangle() {
  let boxes = vec![slab(0.0, 1.0), slab(2.0, 3.0), slab(0.5, 2.5)];
  let edges = generate_edges(&boxes, Axis::X);

  assert_eq!(edges.len(), 6);
  for (index, pair) in edges.chunks(2).enumerate() {
    assert_eq!(pair[0].triangle, index as u32);
    assert!(pair[0].is_start());
    assert!(pair[1].is_end());
    assert_eq!(pair[0].position, boxes[index].min.x);
    assert_eq!(pair[1].position, boxes[index].max.x);
  }
}

#[test]
fn test_from_source_sorts_every_axis() {
  let boxes = vec![slab(4.0, 5.0), slab(0.0, 1.0), slab(0.5, 2.5)];
  let lists = EdgeLists::from_source(&boxes);

  assert_eq!(lists.triangle_count(), 3);
  for axis in Axis::ALL {
    let list = lists.axis(axis);
    assert_eq!(list.len(), 6);
    assert!(is_sorted(list));
    assert!(list.iter().all(|edge| edge.axis == axis));
  }

  let order: Vec<f32> = lists.axis(Axis::X).iter().map(|e| e.position).collect();
  assert_eq!(order, vec![0.0, 0.5, 1.0, 2.5, 4.0, 5.0]);
}

#[test]
fn test_zero_width_triangle_starts_before_it_ends() {
  let boxes = vec![slab(1.0, 1.0)];
  let lists = EdgeLists::from_source(&boxes);
  let x = lists.axis(Axis::X);
  assert!(x[0].is_start());
  assert!(x[1].is_end());
}

#[test]
fn test_leaf_triangles_follow_start_order() {
  let boxes = vec![slab(4.0, 5.0), slab(0.0, 1.0), slab(0.5, 2.5)];
  let lists = EdgeLists::from_source(&boxes);
  assert_eq!(lists.leaf_triangles(), vec![1, 2, 0]);
}

#[test]
fn test_ranks_match_positions() {
  let boxes = vec![slab(4.0, 5.0), slab(0.0, 1.0), slab(0.5, 2.5)];
  let lists = EdgeLists::from_source(&boxes);
  let ranks = EdgeRanks::from_lists(&lists, boxes.len());

  for axis in Axis::ALL {
    let list = lists.axis(axis);
    for triangle in 0..boxes.len() as u32 {
      let start = &list[ranks.start(axis, triangle) as usize];
      let end = &list[ranks.end(axis, triangle) as usize];
      assert_eq!(start.triangle, triangle);
      assert!(start.is_start());
      assert_eq!(end.triangle, triangle);
      assert!(end.is_end());
      assert!(ranks.start(axis, triangle) < ranks.end(axis, triangle));
    }
  }
}

// =============================================================================
// Filtering
// =============================================================================

fn random_boxes() -> impl Strategy<Value = Vec<BoundingBox>> {
  // Coarse grid so coincident edges are common.
  prop::collection::vec((0u8..16, 0u8..16), 1..64).prop_map(|pairs| {
    pairs
      .into_iter()
      .map(|(a, b)| slab(a.min(b) as f32 * 0.5, a.max(b) as f32 * 0.5))
      .collect()
  })
}

proptest! {
  /// Keeping any subset of triangles leaves the list sorted.
  #[test]
  fn test_filter_preserves_order(
    boxes in random_boxes(),
    keep in prop::collection::vec(any::<bool>(), 64),
  ) {
    let lists = EdgeLists::from_source(&boxes);
    let kept: HashSet<u32> = (0..boxes.len() as u32)
      .filter(|&t| keep[t as usize])
      .collect();

    for axis in Axis::ALL {
      let filtered: Vec<BoxEdge> = lists
        .axis(axis)
        .iter()
        .copied()
        .filter(|edge| kept.contains(&edge.triangle))
        .collect();
      prop_assert!(is_sorted(&filtered));
      prop_assert_eq!(filtered.len(), kept.len() * 2);
    }
  }
}
