//! sah_kdtree - Parallel kd-tree construction with the surface area heuristic
//!
//! Builds an axis-aligned kd-tree over the bounding boxes of a triangle mesh,
//! choosing every split plane by exhaustive SAH sweep over sorted box edges.
//! All work runs inside a dedicated rayon pool sized by the caller.
//!
//! # Features
//!
//! - **Exact sweep**: every candidate plane on every axis is evaluated, so the
//!   resulting tree does not depend on the worker count
//! - **Nested strategy**: each node owns filtered copies of its edge lists;
//!   large subtrees are forked with `rayon::join`
//! - **Level-synchronous strategy**: one global edge array per axis and a small
//!   per-triangle membership set, processed one tree level at a time
//! - **Chunked scans**: per-chunk prescans plus a prefix sum let one node's
//!   sweep run in parallel
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use sah_kdtree::{build, SahParams, Triangle, TriangleMesh};
//!
//! let mesh = TriangleMesh::from_triangles([
//!   Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y),
//!   Triangle::new(Vec3::splat(4.0), Vec3::new(5.0, 4.0, 4.0), Vec3::new(4.0, 5.0, 4.0)),
//! ]);
//!
//! let tree = build(&mesh, 8, 2, SahParams::DEFAULT).unwrap();
//! assert!(tree.len() >= 1);
//! ```

pub mod build;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod plane;
pub mod sah;
pub mod sort;
pub mod threading;
pub mod tree;

pub use build::{build, build_with_config, BuildContext, BuildStrategy, LevelBuild, NestedBuild};
pub use classify::{Membership, MembershipTable, Side};
pub use config::{AllocationStrategy, BuildConfig, SahParams, Scheduling, Strategy};
pub use error::{BuildError, MembershipOverflow};
pub use geometry::{Axis, BoundingBox, BoxEdge, EdgeLists, EdgeType, Triangle, TriangleMesh, TriangleSource};
pub use plane::SplitCandidate;
pub use sort::{parallel_mergesort, parallel_mergesort_by};
pub use threading::WorkerPool;
pub use tree::{KdTree, KdTreeNode, NodeId, NodeKind};
