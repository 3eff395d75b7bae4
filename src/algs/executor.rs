//! Thin façade over serial or Rayon-backed data-parallel loops.
//!
//! The builders only ever need "apply this per-vertex function to this list
//! and collect the results in list order", plus a keyed sort and a fork-join
//! of two independent jobs. Results are always returned in input order, so
//! every backend produces identical trees.

#[cfg(feature = "rayon")]
use crate::contour_error::ContourTreeError;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Data-parallel dispatch interface (minimal by design).
pub trait Executor: Send + Sync {
    /// `f(i)` for every `i` in `0..n`, in index order.
    fn map_indices<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;

    /// `f(v)` for every `v` in `list`, in list order.
    fn map_list<T, F>(&self, list: &[usize], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;

    /// The entries of `list` for which `keep` holds, order preserved.
    fn compact<F>(&self, list: &[usize], keep: F) -> Vec<usize>
    where
        F: Fn(usize) -> bool + Send + Sync;

    /// Unstable sort of `items` by `key`.
    fn sort_by_key<K, F>(&self, items: &mut [usize], key: F)
    where
        K: Ord + Send,
        F: Fn(&usize) -> K + Send + Sync;

    /// Run two independent jobs, possibly concurrently.
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;
}

/// Plain loops on the calling thread.
#[derive(Clone, Debug, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn map_indices<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..n).map(f).collect()
    }

    fn map_list<T, F>(&self, list: &[usize], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        list.iter().map(|&v| f(v)).collect()
    }

    fn compact<F>(&self, list: &[usize], keep: F) -> Vec<usize>
    where
        F: Fn(usize) -> bool + Send + Sync,
    {
        list.iter().copied().filter(|&v| keep(v)).collect()
    }

    fn sort_by_key<K, F>(&self, items: &mut [usize], key: F)
    where
        K: Ord + Send,
        F: Fn(&usize) -> K + Send + Sync,
    {
        items.sort_unstable_by_key(key);
    }

    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        (a(), b())
    }
}

// --- RayonExecutor: intra-process / multi-thread ---
#[cfg(feature = "rayon")]
mod rayon_backend {
    use super::*;
    use rayon::prelude::*;

    /// Rayon work stealing, on the global pool or a dedicated one.
    #[derive(Clone, Debug, Default)]
    pub struct RayonExecutor {
        pool: Option<Arc<rayon::ThreadPool>>,
    }

    impl RayonExecutor {
        /// Use the global Rayon pool.
        pub fn new() -> Self {
            Self { pool: None }
        }

        /// Use a dedicated pool with exactly `threads` workers.
        pub fn with_threads(threads: usize) -> Result<Self, ContourTreeError> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| {
                    log::error!("rayon pool with {threads} threads failed: {e}");
                    ContourTreeError::InvalidConfiguration("could not build rayon thread pool")
                })?;
            Ok(Self {
                pool: Some(Arc::new(pool)),
            })
        }

        fn install<R, OP>(&self, op: OP) -> R
        where
            R: Send,
            OP: FnOnce() -> R + Send,
        {
            match &self.pool {
                Some(pool) => pool.install(op),
                None => op(),
            }
        }
    }

    impl Executor for RayonExecutor {
        fn map_indices<T, F>(&self, n: usize, f: F) -> Vec<T>
        where
            T: Send,
            F: Fn(usize) -> T + Send + Sync,
        {
            self.install(|| (0..n).into_par_iter().map(f).collect())
        }

        fn map_list<T, F>(&self, list: &[usize], f: F) -> Vec<T>
        where
            T: Send,
            F: Fn(usize) -> T + Send + Sync,
        {
            self.install(|| list.par_iter().map(|&v| f(v)).collect())
        }

        fn compact<F>(&self, list: &[usize], keep: F) -> Vec<usize>
        where
            F: Fn(usize) -> bool + Send + Sync,
        {
            self.install(|| list.par_iter().copied().filter(|&v| keep(v)).collect())
        }

        fn sort_by_key<K, F>(&self, items: &mut [usize], key: F)
        where
            K: Ord + Send,
            F: Fn(&usize) -> K + Send + Sync,
        {
            self.install(|| items.par_sort_unstable_by_key(key));
        }

        fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
        where
            A: FnOnce() -> RA + Send,
            B: FnOnce() -> RB + Send,
            RA: Send,
            RB: Send,
        {
            self.install(|| rayon::join(a, b))
        }
    }
}

#[cfg(feature = "rayon")]
pub use rayon_backend::RayonExecutor;

/// The executor used when the caller does not pick one.
#[cfg(feature = "rayon")]
pub type DefaultExecutor = RayonExecutor;
/// The executor used when the caller does not pick one.
#[cfg(not(feature = "rayon"))]
pub type DefaultExecutor = SerialExecutor;
