//! Stable parallel merge sort.
//!
//! The input is cut into quarters that are sorted independently, merged
//! pairwise into a scratch buffer, then merged back:
//!
//! ```text
//!   data     [ q0 | q1 | q2 | q3 ]   sort quarters (recursive, in parallel)
//!   scratch  [  q0+q1  |  q2+q3  ]   merge pairs (in parallel)
//!   data     [   q0+q1+q2+q3     ]   final merge
//! ```
//!
//! Merges split the longer run at its midpoint and binary-search the other
//! run for the matching cut, so the two halves merge independently. Ties
//! always favour the left run, which keeps the sort stable.

use std::cmp::Ordering;

use crate::constants::MERGESORT_MIN_SIZE;

/// Sort `data` in its natural order.
pub fn parallel_mergesort<T>(data: &mut [T])
where
  T: Ord + Clone + Send + Sync,
{
  parallel_mergesort_by(data, T::cmp);
}

/// Stable sort of `data` with `cmp`.
///
/// Runs on the current rayon pool. Inputs below the sequential cutoff fall
/// back to `sort_by`; larger ones allocate one scratch buffer of equal size.
pub fn parallel_mergesort_by<T, F>(data: &mut [T], cmp: F)
where
  T: Clone + Send + Sync,
  F: Fn(&T, &T) -> Ordering + Sync,
{
  if data.len() < MERGESORT_MIN_SIZE {
    data.sort_by(&cmp);
    return;
  }
  let mut scratch = data.to_vec();
  sort_quarters(data, &mut scratch, &cmp);
}

fn sort_quarters<T, F>(data: &mut [T], scratch: &mut [T], cmp: &F)
where
  T: Clone + Send + Sync,
  F: Fn(&T, &T) -> Ordering + Sync,
{
  let len = data.len();
  if len < MERGESORT_MIN_SIZE {
    data.sort_by(cmp);
    return;
  }

  // The last quarter takes the remainder.
  let quarter = len / 4;
  {
    let (d01, d23) = data.split_at_mut(2 * quarter);
    let (d0, d1) = d01.split_at_mut(quarter);
    let (d2, d3) = d23.split_at_mut(quarter);
    let (s01, s23) = scratch.split_at_mut(2 * quarter);
    let (s0, s1) = s01.split_at_mut(quarter);
    let (s2, s3) = s23.split_at_mut(quarter);

    rayon::join(
      || {
        rayon::join(
          || sort_quarters(d0, s0, cmp),
          || sort_quarters(d1, s1, cmp),
        )
      },
      || {
        rayon::join(
          || sort_quarters(d2, s2, cmp),
          || sort_quarters(d3, s3, cmp),
        )
      },
    );
  }

  {
    let (d01, d23) = data.split_at(2 * quarter);
    let (d0, d1) = d01.split_at(quarter);
    let (d2, d3) = d23.split_at(quarter);
    let (s01, s23) = scratch.split_at_mut(2 * quarter);
    rayon::join(
      || parallel_merge(d0, d1, s01, cmp),
      || parallel_merge(d2, d3, s23, cmp),
    );
  }

  let (low, high) = scratch.split_at(2 * quarter);
  parallel_merge(low, high, data, cmp);
}

/// Merge sorted runs `a` and `b` into `out`; equal elements keep `a` first.
fn parallel_merge<T, F>(a: &[T], b: &[T], out: &mut [T], cmp: &F)
where
  T: Clone + Send + Sync,
  F: Fn(&T, &T) -> Ordering + Sync,
{
  debug_assert_eq!(a.len() + b.len(), out.len());
  if out.len() < MERGESORT_MIN_SIZE {
    sequential_merge(a, b, out, cmp);
    return;
  }

  // (a_cut, b_cut, pivot) where the pivot lands at out[a_cut + b_cut]
  let (a_cut, b_cut, pivot, pivot_in_a) = if a.len() >= b.len() {
    let mid = a.len() / 2;
    let pivot = &a[mid];
    let cut = b.partition_point(|x| cmp(x, pivot) == Ordering::Less);
    (mid, cut, pivot, true)
  } else {
    let mid = b.len() / 2;
    let pivot = &b[mid];
    let cut = a.partition_point(|x| cmp(x, pivot) != Ordering::Greater);
    (cut, mid, pivot, false)
  };

  let (out_low, rest) = out.split_at_mut(a_cut + b_cut);
  let (out_pivot, out_high) = rest.split_at_mut(1);
  out_pivot[0] = pivot.clone();

  let (a_low, a_high, b_low, b_high) = if pivot_in_a {
    (&a[..a_cut], &a[a_cut + 1..], &b[..b_cut], &b[b_cut..])
  } else {
    (&a[..a_cut], &a[a_cut..], &b[..b_cut], &b[b_cut + 1..])
  };

  rayon::join(
    || parallel_merge(a_low, b_low, out_low, cmp),
    || parallel_merge(a_high, b_high, out_high, cmp),
  );
}

fn sequential_merge<T, F>(a: &[T], b: &[T], out: &mut [T], cmp: &F)
where
  T: Clone,
  F: Fn(&T, &T) -> Ordering,
{
  let (mut i, mut j) = (0, 0);
  for slot in out.iter_mut() {
    let take_b = i == a.len() || (j < b.len() && cmp(&b[j], &a[i]) == Ordering::Less);
    if take_b {
      *slot = b[j].clone();
      j += 1;
    } else {
      *slot = a[i].clone();
      i += 1;
    }
  }
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;
