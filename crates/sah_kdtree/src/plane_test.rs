use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::geometry::EdgeType;
use crate::threading::WorkerPool;

fn slab(lo: f32, hi: f32) -> BoundingBox {
  BoundingBox::new(Vec3::new(lo, 0.0, 0.0), Vec3::new(hi, 1.0, 1.0))
}

fn bounds_of(boxes: &[BoundingBox]) -> BoundingBox {
  boxes.iter().fold(BoundingBox::EMPTY, |acc, b| acc.union(b))
}

/// Boxes snapped to a coarse grid so coincident edges are frequent.
fn random_boxes(seed: u64, count: usize) -> Vec<BoundingBox> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      let min = Vec3::new(
        rng.random_range(0..32) as f32,
        rng.random_range(0..32) as f32,
        rng.random_range(0..32) as f32,
      );
      let size = Vec3::new(
        rng.random_range(0..4) as f32,
        rng.random_range(0..4) as f32,
        rng.random_range(0..4) as f32,
      );
      BoundingBox::new(min, min + size)
    })
    .collect()
}

// =============================================================================
// Sequential sweep
// =============================================================================

#[test]
fn test_four_slabs_split_at_first_gap() {
  let boxes = vec![slab(0.0, 1.0), slab(2.0, 3.0), slab(4.0, 5.0), slab(6.0, 7.0)];
  let lists = EdgeLists::from_source(&boxes);
  let best = find_best_plane(&lists, &bounds_of(&boxes), &SahParams::DEFAULT).unwrap();

  assert_eq!(best.axis, Axis::X);
  assert_eq!(best.position, 3.0);
  assert_eq!(best.edge.triangle, 1);
  assert_eq!(best.edge.kind, EdgeType::End);
  assert_eq!(best.edge_index, 3);
  assert_eq!((best.n_a, best.n_b), (2, 2));
  assert!(best.cost < SahParams::DEFAULT.leaf_cost(4));
}

#[test]
fn test_single_triangle_has_no_split() {
  let boxes = vec![BoundingBox::new(Vec3::ZERO, Vec3::ONE)];
  let lists = EdgeLists::from_source(&boxes);
  assert_eq!(find_best_plane(&lists, &boxes[0], &SahParams::DEFAULT), None);
}

#[test]
fn test_no_triangles_has_no_split() {
  let lists = EdgeLists::default();
  let extent = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
  assert_eq!(find_best_plane(&lists, &extent, &SahParams::DEFAULT), None);
  assert_eq!(
    find_best_plane_chunked(&lists, &extent, &SahParams::DEFAULT, 4),
    None
  );
}

#[test]
fn test_scanner_counts_reach_total() {
  let boxes = random_boxes(3, 50);
  let lists = EdgeLists::from_source(&boxes);
  for axis in Axis::ALL {
    let mut scanner = PlaneScanner::new(
      &SahParams::DEFAULT,
      bounds_of(&boxes),
      axis,
      boxes.len(),
      EdgeTally::default(),
    );
    scanner.visit_run(0, lists.axis(axis));
    assert_eq!(scanner.counts(), (50, 50));
  }
}

#[test]
fn test_counts_match_definition() {
  // Candidate counts agree with a brute-force count over the boxes.
  let boxes = random_boxes(5, 40);
  let lists = EdgeLists::from_source(&boxes);
  let best = find_best_plane(&lists, &bounds_of(&boxes), &SahParams::DEFAULT).unwrap();

  let edges = lists.axis(best.axis);
  let before = edges[..best.edge_index]
    .iter()
    .filter(|e| e.is_start())
    .count();
  let after = edges[best.edge_index + 1..]
    .iter()
    .filter(|e| e.is_end())
    .count();
  assert_eq!(best.n_a, before);
  assert_eq!(best.n_b, after);
}

// =============================================================================
// Chunked search
// =============================================================================

#[test]
fn test_exclusive_prefix() {
  let tallies = [
    EdgeTally { starts: 2, ends: 1 },
    EdgeTally { starts: 0, ends: 3 },
    EdgeTally { starts: 1, ends: 0 },
  ];
  let prefix = exclusive_prefix(&tallies);
  assert_eq!(prefix[0], EdgeTally::default());
  assert_eq!(prefix[1], EdgeTally { starts: 2, ends: 1 });
  assert_eq!(prefix[2], EdgeTally { starts: 2, ends: 4 });
}

#[test]
fn test_pick_keeps_earliest_tie() {
  let boxes = vec![slab(0.0, 1.0)];
  let lists = EdgeLists::from_source(&boxes);
  let edge = lists.axis(Axis::X)[0];
  let first = SplitCandidate {
    cost: 10.0,
    axis: Axis::X,
    position: 0.0,
    edge_index: 0,
    edge,
    n_a: 0,
    n_b: 1,
  };
  let second = SplitCandidate {
    axis: Axis::Y,
    ..first
  };
  assert_eq!(SplitCandidate::pick(Some(first), Some(second)), Some(first));
  assert_eq!(SplitCandidate::pick(None, Some(second)), Some(second));
  assert_eq!(SplitCandidate::pick(Some(first), None), Some(first));
}

#[test]
fn test_chunk_len_covers_input() {
  assert_eq!(chunk_len(10, 4), 3);
  assert_eq!(chunk_len(8, 4), 2);
  assert_eq!(chunk_len(3, 8), 1);
  assert_eq!(chunk_len(0, 4), 1);
  assert_eq!(chunk_len(5, 0), 5);
}

#[test]
fn test_chunked_matches_sequential() {
  for seed in 0..8 {
    let boxes = random_boxes(seed, 200);
    let extent = bounds_of(&boxes);
    let lists = EdgeLists::from_source(&boxes);
    let expected = find_best_plane(&lists, &extent, &SahParams::DEFAULT);
    assert!(expected.is_some());

    for workers in [1, 2, 4, 8] {
      let pool = WorkerPool::new(workers).unwrap();
      let actual = pool.install(|| {
        find_best_plane_chunked(&lists, &extent, &SahParams::DEFAULT, workers)
      });
      assert_eq!(actual, expected, "seed {seed}, {workers} workers");
    }
  }
}

#[test]
fn test_chunked_matches_sequential_with_odd_chunks() {
  let boxes = random_boxes(99, 37);
  let extent = bounds_of(&boxes);
  let lists = EdgeLists::from_source(&boxes);
  let expected = find_best_plane(&lists, &extent, &SahParams::DEFAULT);

  // More chunks than edges, and chunk sizes that cut coincident runs.
  for chunks in [3, 7, 13, 100] {
    let actual = find_best_plane_chunked(&lists, &extent, &SahParams::DEFAULT, chunks);
    assert_eq!(actual, expected, "{chunks} chunks");
  }
}

#[test]
fn test_chunked_matches_sequential_with_bonus() {
  let params = SahParams {
    empty_bonus: 0.8,
    ..SahParams::DEFAULT
  };
  let boxes = random_boxes(17, 120);
  let extent = bounds_of(&boxes);
  let lists = EdgeLists::from_source(&boxes);
  let expected = find_best_plane(&lists, &extent, &params);
  let actual = find_best_plane_chunked(&lists, &extent, &params, 6);
  assert_eq!(actual, expected);
}
