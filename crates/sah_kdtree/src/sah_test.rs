use glam::Vec3;
use proptest::prelude::*;

use super::*;

fn unit_cube() -> BoundingBox {
  BoundingBox::new(Vec3::ZERO, Vec3::ONE)
}

fn approx(a: f32, b: f32) -> bool {
  (a - b).abs() < 1e-4
}

#[test]
fn test_balanced_split_of_unit_cube() {
  // pA = pB = 2/3
  let c = cost(&SahParams::DEFAULT, &unit_cube(), Axis::X, 1, 1, 0.5);
  assert!(approx(c, 15.0 + 20.0 * (4.0 / 3.0)), "got {c}");
}

#[test]
fn test_outside_extent_is_infinite() {
  let extent = unit_cube();
  for axis in Axis::ALL {
    assert_eq!(cost(&SahParams::DEFAULT, &extent, axis, 1, 1, -0.01), f32::INFINITY);
    assert_eq!(cost(&SahParams::DEFAULT, &extent, axis, 1, 1, 1.01), f32::INFINITY);
  }
}

#[test]
fn test_boundaries_are_valid_candidates() {
  let extent = unit_cube();
  assert!(cost(&SahParams::DEFAULT, &extent, Axis::Y, 0, 3, 0.0).is_finite());
  assert!(cost(&SahParams::DEFAULT, &extent, Axis::Y, 3, 0, 1.0).is_finite());
}

#[test]
fn test_flat_extent_is_infinite() {
  let extent = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
  assert_eq!(cost(&SahParams::DEFAULT, &extent, Axis::X, 1, 1, 0.5), f32::INFINITY);
}

#[test]
fn test_empty_bonus_discounts_empty_side() {
  let extent = unit_cube();
  let plain = cost(&SahParams::DEFAULT, &extent, Axis::Z, 0, 4, 0.25);
  let bonus = SahParams {
    empty_bonus: 0.5,
    ..SahParams::DEFAULT
  };
  let discounted = cost(&bonus, &extent, Axis::Z, 0, 4, 0.25);
  assert!(discounted < plain);

  // Full bonus leaves only the traversal cost.
  let full = SahParams {
    empty_bonus: 1.0,
    ..SahParams::DEFAULT
  };
  assert_eq!(cost(&full, &extent, Axis::Z, 0, 4, 0.25), 15.0);
}

#[test]
fn test_bonus_ignored_when_both_sides_populated() {
  let extent = unit_cube();
  let bonus = SahParams {
    empty_bonus: 0.9,
    ..SahParams::DEFAULT
  };
  assert_eq!(
    cost(&bonus, &extent, Axis::X, 2, 3, 0.4),
    cost(&SahParams::DEFAULT, &extent, Axis::X, 2, 3, 0.4)
  );
}

#[test]
fn test_empty_left_at_min_uses_general_branch() {
  // Position at the lower face with nA == 0 is not an empty-space cut.
  // pB covers the whole cube.
  let extent = unit_cube();
  let bonus = SahParams {
    empty_bonus: 1.0,
    ..SahParams::DEFAULT
  };
  let c = cost(&bonus, &extent, Axis::X, 0, 2, 0.0);
  assert!(approx(c, 15.0 + 20.0 * 2.0), "got {c}");
}

#[test]
fn test_scenario_gap_split_beats_leaf() {
  let extent = BoundingBox::new(Vec3::ZERO, Vec3::new(7.0, 1.0, 1.0));
  let c = cost(&SahParams::DEFAULT, &extent, Axis::X, 2, 2, 3.0);
  assert!(approx(c, 15.0 + 20.0 * 64.0 / 30.0), "got {c}");
  assert!(c < SahParams::DEFAULT.leaf_cost(4));
}

proptest! {
  /// Infinite exactly when the position leaves the extent.
  #[test]
  fn test_infinite_iff_outside(
    lo in -10.0f32..10.0,
    size in 0.1f32..10.0,
    position in -25.0f32..25.0,
    n_a in 0usize..50,
    n_b in 0usize..50,
    axis in 0usize..3,
  ) {
    let extent = BoundingBox::new(Vec3::splat(lo), Vec3::splat(lo + size));
    let axis = Axis::from_index(axis).unwrap();
    let c = cost(&SahParams::DEFAULT, &extent, axis, n_a, n_b, position);
    let inside = position >= lo && position <= lo + size;
    prop_assert_eq!(c.is_infinite(), !inside);
  }

  /// Raising `Ci` never lowers the cost.
  #[test]
  fn test_non_decreasing_in_intersection_cost(
    ci in 0.0f32..100.0,
    extra in 0.0f32..100.0,
    position in 0.0f32..1.0,
    n_a in 0usize..50,
    n_b in 0usize..50,
    bonus in 0.0f32..=1.0,
  ) {
    let low = SahParams { intersection_cost: ci, empty_bonus: bonus, ..SahParams::DEFAULT };
    let high = SahParams { intersection_cost: ci + extra, ..low };
    let extent = unit_cube();
    prop_assert!(
      cost(&low, &extent, Axis::X, n_a, n_b, position)
        <= cost(&high, &extent, Axis::X, n_a, n_b, position)
    );
  }
}
