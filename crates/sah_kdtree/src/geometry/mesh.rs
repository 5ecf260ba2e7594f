//! Mesh input.
//!
//! The builder only ever asks three things of a mesh: how many triangles it
//! has, the bounds of one triangle, and the bounds of the whole. Anything that
//! can answer those implements [`TriangleSource`]. [`TriangleMesh`] is the
//! owned implementation used by tests and benches; a plain slice of
//! [`BoundingBox`] also works when only the boxes are known.

use glam::Vec3;

use super::BoundingBox;
use crate::error::BuildError;

/// Read-only mesh interface consumed by the builder.
///
/// Must be `Sync`: edge generation reads triangle bounds from every worker.
pub trait TriangleSource: Sync {
  /// Number of triangles.
  fn triangle_count(&self) -> usize;

  /// Bounding box of triangle `index`.
  fn triangle_bounds(&self, index: usize) -> BoundingBox;

  /// Bounding box of the whole mesh.
  fn bounds(&self) -> BoundingBox {
    let mut bounds = BoundingBox::EMPTY;
    for index in 0..self.triangle_count() {
      bounds.grow(&self.triangle_bounds(index));
    }
    bounds
  }
}

/// A triangle and its cached bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
  pub vertices: [Vec3; 3],
  pub bounds: BoundingBox,
}

impl Triangle {
  pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
    let vertices = [a, b, c];
    Self {
      vertices,
      bounds: BoundingBox::from_points(&vertices),
    }
  }
}

/// Owned triangle soup with incrementally maintained bounds.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
  triangles: Vec<Triangle>,
  bounds: BoundingBox,
}

impl TriangleMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build from a vertex buffer and triangle index triples.
  ///
  /// Fails with [`BuildError::IndexOutOfRange`] when a triple points past
  /// the end of `vertices`.
  pub fn from_indexed(vertices: &[Vec3], indices: &[[u32; 3]]) -> Result<Self, BuildError> {
    let mut mesh = Self {
      triangles: Vec::with_capacity(indices.len()),
      bounds: BoundingBox::EMPTY,
    };
    for (triangle, triple) in indices.iter().enumerate() {
      let mut corners = [Vec3::ZERO; 3];
      for (corner, &index) in corners.iter_mut().zip(triple) {
        *corner = *vertices
          .get(index as usize)
          .ok_or(BuildError::IndexOutOfRange {
            triangle: triangle as u32,
            index,
          })?;
      }
      mesh.push(Triangle::new(corners[0], corners[1], corners[2]));
    }
    Ok(mesh)
  }

  pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
    let mut mesh = Self::new();
    for triangle in triangles {
      mesh.push(triangle);
    }
    mesh
  }

  /// Append a triangle and grow the mesh bounds.
  pub fn push(&mut self, triangle: Triangle) {
    self.bounds.grow(&triangle.bounds);
    self.triangles.push(triangle);
  }

  #[inline]
  pub fn triangles(&self) -> &[Triangle] {
    &self.triangles
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.triangles.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.triangles.is_empty()
  }
}

impl TriangleSource for TriangleMesh {
  fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  fn triangle_bounds(&self, index: usize) -> BoundingBox {
    self.triangles[index].bounds
  }

  fn bounds(&self) -> BoundingBox {
    self.bounds
  }
}

impl TriangleSource for [BoundingBox] {
  fn triangle_count(&self) -> usize {
    self.len()
  }

  fn triangle_bounds(&self, index: usize) -> BoundingBox {
    self[index]
  }
}

impl TriangleSource for Vec<BoundingBox> {
  fn triangle_count(&self) -> usize {
    self.len()
  }

  fn triangle_bounds(&self, index: usize) -> BoundingBox {
    self[index]
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
