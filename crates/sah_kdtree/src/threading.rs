//! Fixed-size fork/join worker pool built on rayon.
//!
//! Each build gets its own `rayon::ThreadPool` with exactly the requested
//! number of threads. Work runs inside [`WorkerPool::install`], so every
//! `rayon::join`, `par_chunks` and `par_iter` the builder issues lands on
//! this pool rather than the global one.
//!
//! # Usage
//!
//! ```ignore
//! let pool = WorkerPool::new(4)?;
//! let tree = pool.install(|| strategy.build(&ctx))?;
//! ```

use crate::error::BuildError;

/// Dedicated worker pool for one build.
pub struct WorkerPool {
  pool: rayon::ThreadPool,
}

impl WorkerPool {
  /// Create a pool with exactly `num_workers` threads.
  ///
  /// Threads are named `kdtree-worker-{i}`.
  pub fn new(num_workers: usize) -> Result<Self, BuildError> {
    if num_workers == 0 {
      return Err(BuildError::ZeroWorkers);
    }
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(num_workers)
      .thread_name(|index| format!("kdtree-worker-{index}"))
      .build()?;
    Ok(Self { pool })
  }

  /// Run `work` on the pool and block until it returns.
  pub fn install<F, T>(&self, work: F) -> T
  where
    F: FnOnce() -> T + Send,
    T: Send,
  {
    self.pool.install(work)
  }

  /// Number of worker threads.
  pub fn num_threads(&self) -> usize {
    self.pool.current_num_threads()
  }
}

impl std::fmt::Debug for WorkerPool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WorkerPool")
      .field("threads", &self.num_threads())
      .finish()
  }
}

// =============================================================================
// Tests
// =============================================================================
