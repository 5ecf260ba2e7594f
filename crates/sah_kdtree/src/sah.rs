//! Surface area heuristic.
//!
//! Cutting `extent` at `position` along `axis` gives two boxes. Their surface
//! areas relative to the parent estimate how likely a ray that hits the parent
//! also hits each child:
//!
//! ```text
//!   cost = Ct + Ci * (pA * nA + pB * nB)
//! ```
//!
//! Cuts with one empty side are discounted by `(1 - empty_bonus)`.

use crate::config::SahParams;
use crate::geometry::{Axis, BoundingBox};

/// Cost of splitting `extent` at `position` with `n_a` triangles on the left
/// and `n_b` on the right.
///
/// Returns `f32::INFINITY` when `position` lies outside the extent on `axis`
/// or the extent has no surface area.
#[inline]
pub fn cost(
  params: &SahParams,
  extent: &BoundingBox,
  axis: Axis,
  n_a: usize,
  n_b: usize,
  position: f32,
) -> f32 {
  let lo = extent.lo(axis);
  let hi = extent.hi(axis);
  if !(lo..=hi).contains(&position) {
    return f32::INFINITY;
  }

  let d = extent.size();
  let half_area = d.x * d.y + d.y * d.z + d.z * d.x;
  if half_area.is_nan() || half_area <= 0.0 {
    return f32::INFINITY;
  }
  let inv = 0.5 / half_area;

  let (a1, a2) = axis.others();
  let cross = d[a1.index()] * d[a2.index()];
  let perimeter = d[a1.index()] + d[a2.index()];

  let p_a = 2.0 * (cross + (position - lo) * perimeter) * inv;
  let p_b = 2.0 * (cross + (hi - position) * perimeter) * inv;

  let ct = params.traversal_cost;
  let ci = params.intersection_cost;
  let discount = 1.0 - params.empty_bonus;

  if n_a == 0 && position > lo {
    ct + ci * p_b * n_b as f32 * discount
  } else if n_b == 0 && position < hi {
    ct + ci * p_a * (n_a + n_b) as f32 * discount
  } else {
    ct + ci * (p_a * n_a as f32 + p_b * n_b as f32)
  }
}

#[cfg(test)]
#[path = "sah_test.rs"]
mod sah_test;
