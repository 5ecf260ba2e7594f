//! Geometric primitives consumed by the builder.
//!
//! # Module Structure
//!
//! - [`bounds`]: `BoundingBox` - axis-aligned box in single precision
//! - [`edge`]: `BoxEdge` - start/end events along one axis, and their total
//!   order
//! - [`mesh`]: `TriangleSource` - what the builder needs from a mesh, plus an
//!   owned `TriangleMesh`

pub mod bounds;
pub mod edge;
pub mod mesh;

pub use bounds::BoundingBox;
pub use edge::{BoxEdge, EdgeLists, EdgeRanks, EdgeType};
pub use mesh::{Triangle, TriangleMesh, TriangleSource};

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
  /// X axis.
  X = 0,
  /// Y axis.
  Y = 1,
  /// Z axis.
  Z = 2,
}

impl Axis {
  /// All axes in scan order.
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

  /// Component index (0, 1, 2).
  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }

  /// Axis from a component index.
  ///
  /// Returns None for indices above 2.
  pub fn from_index(index: usize) -> Option<Self> {
    Self::ALL.get(index).copied()
  }

  /// The two remaining axes, in cyclic order.
  #[inline]
  pub fn others(self) -> (Axis, Axis) {
    match self {
      Axis::X => (Axis::Y, Axis::Z),
      Axis::Y => (Axis::Z, Axis::X),
      Axis::Z => (Axis::X, Axis::Y),
    }
  }
}
