//! Axis-aligned bounding box in single precision.

use glam::Vec3;

use super::Axis;

/// Axis-aligned bounding box.
///
/// Used both for per-triangle bounds and for node extents. Bounds are closed:
/// a box touching another at a face overlaps it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl BoundingBox {
	/// Inverted box that any `grow` replaces.
	pub const EMPTY: Self = Self {
		min: Vec3::splat(f32::MAX),
		max: Vec3::splat(-f32::MAX),
	};

	/// Create a new box from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"BoundingBox min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Smallest box holding every point.
	pub fn from_points(points: &[Vec3]) -> Self {
		let mut bounds = Self::EMPTY;
		for &p in points {
			bounds.min = bounds.min.min(p);
			bounds.max = bounds.max.max(p);
		}
		bounds
	}

	/// True until something has been grown into the box.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
	}

	/// Extend this box to cover `other`.
	#[inline]
	pub fn grow(&mut self, other: &BoundingBox) {
		self.min = self.min.min(other.min);
		self.max = self.max.max(other.max);
	}

	/// Union of two boxes.
	#[inline]
	pub fn union(&self, other: &BoundingBox) -> BoundingBox {
		let mut out = *self;
		out.grow(other);
		out
	}

	/// Check if this box overlaps with another.
	///
	/// Two boxes overlap if they share any interior or boundary points.
	#[inline]
	pub fn overlaps(&self, other: &BoundingBox) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Check if this box contains a point.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.cmpge(self.min).all() && point.cmple(self.max).all()
	}

	/// Check if this box fully contains another.
	#[inline]
	pub fn contains(&self, other: &BoundingBox) -> bool {
		self.contains_point(other.min) && self.contains_point(other.max)
	}

	/// True when both corners are finite.
	#[inline]
	pub fn is_finite(&self) -> bool {
		self.min.is_finite() && self.max.is_finite()
	}

	/// Get the size of the box (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Total surface area.
	#[inline]
	pub fn surface_area(&self) -> f32 {
		let d = self.size();
		2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
	}

	/// Lower bound along `axis`.
	#[inline]
	pub fn lo(&self, axis: Axis) -> f32 {
		self.min[axis.index()]
	}

	/// Upper bound along `axis`.
	#[inline]
	pub fn hi(&self, axis: Axis) -> f32 {
		self.max[axis.index()]
	}

	/// Cut the box with the plane `axis = position`.
	///
	/// The left box keeps `min`, the right box keeps `max`; both share the
	/// plane. The position is not clamped.
	pub fn split(&self, axis: Axis, position: f32) -> (BoundingBox, BoundingBox) {
		let mut left = *self;
		let mut right = *self;
		left.max[axis.index()] = position;
		right.min[axis.index()] = position;
		(left, right)
	}
}

impl Default for BoundingBox {
	fn default() -> Self {
		Self::EMPTY
	}
}
