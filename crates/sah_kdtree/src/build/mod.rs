//! Tree construction.
//!
//! # Pipeline
//!
//! ```text
//!   validate -> worker pool -> edges + sort -> ranks -> strategy -> KdTree
//! ```
//!
//! Both strategies share the SAH evaluator, the [`PlaneScanner`] sweep, the
//! classification rule and the bounded membership set. They differ only in
//! how the per-node work is laid out:
//!
//! - [`NestedBuild`]: every node owns filtered copies of its edge lists;
//!   subtrees are forked with `rayon::join` when their lists are large.
//! - [`LevelBuild`]: one global edge array per axis; all live nodes of a
//!   level are scanned and classified together.
//!
//! For the same input both produce the same tree.
//!
//! [`PlaneScanner`]: crate::plane::PlaneScanner

pub mod level;
pub mod nested;

pub use level::LevelBuild;
pub use nested::NestedBuild;

use crate::config::{BuildConfig, SahParams, Strategy};
use crate::error::BuildError;
use crate::geometry::{BoundingBox, EdgeLists, EdgeRanks, TriangleSource};
use crate::threading::WorkerPool;
use crate::tree::KdTree;

/// One way of turning sorted edges into a tree.
pub trait BuildStrategy {
  fn build(&self, ctx: &BuildContext<'_>) -> Result<KdTree, BuildError>;
}

/// Everything a strategy needs, prepared once per build.
#[derive(Debug)]
pub struct BuildContext<'a> {
  pub config: &'a BuildConfig,
  /// Root extent.
  pub bounds: BoundingBox,
  /// Globally sorted edge lists of every triangle.
  pub edges: EdgeLists,
  /// Rank of each triangle's edges in `edges`.
  pub ranks: EdgeRanks,
  pub triangle_count: usize,
}

impl<'a> BuildContext<'a> {
  /// Generate, sort and rank the edges of `mesh`. Call inside the pool.
  pub fn new<S: TriangleSource + ?Sized>(mesh: &S, config: &'a BuildConfig) -> Self {
    let triangle_count = mesh.triangle_count();
    let edges = EdgeLists::from_source(mesh);
    let ranks = EdgeRanks::from_lists(&edges, triangle_count);
    Self {
      config,
      bounds: mesh.bounds(),
      edges,
      ranks,
      triangle_count,
    }
  }
}

/// Build a tree with default settings for everything but depth, workers and
/// the cost model.
pub fn build<S: TriangleSource + ?Sized>(
  mesh: &S,
  max_depth: u32,
  num_workers: usize,
  sah: SahParams,
) -> Result<KdTree, BuildError> {
  build_with_config(mesh, &BuildConfig::new(max_depth, num_workers, sah))
}

/// Build a tree on a dedicated pool of `config.num_workers` threads.
pub fn build_with_config<S: TriangleSource + ?Sized>(
  mesh: &S,
  config: &BuildConfig,
) -> Result<KdTree, BuildError> {
  config.validate()?;
  validate_mesh(mesh)?;

  let pool = WorkerPool::new(config.num_workers)?;
  pool.install(|| {
    let _span = tracing::info_span!(
      "kdtree::build",
      triangles = mesh.triangle_count(),
      max_depth = config.max_depth,
      workers = config.num_workers,
    )
    .entered();

    let ctx = BuildContext::new(mesh, config);
    let tree = match config.strategy {
      Strategy::Nested => NestedBuild.build(&ctx)?,
      Strategy::LevelSynchronous => LevelBuild.build(&ctx)?,
    };

    tracing::debug!(
      nodes = tree.len(),
      leaves = tree.leaf_count(),
      depth = tree.depth(),
      references = tree.triangle_references(),
      "kd-tree built"
    );
    Ok(tree)
  })
}

/// Reject empty meshes and triangles with non-finite bounds.
pub fn validate_mesh<S: TriangleSource + ?Sized>(mesh: &S) -> Result<(), BuildError> {
  if mesh.triangle_count() == 0 {
    return Err(BuildError::EmptyMesh);
  }
  for index in 0..mesh.triangle_count() {
    if !mesh.triangle_bounds(index).is_finite() {
      return Err(BuildError::NonFiniteBounds {
        triangle: index as u32,
      });
    }
  }
  Ok(())
}
