//! Parallel all-pairs distance computation and per-row neighbor selection.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, debug_span, trace, warn};

use super::params::{CancelToken, KnnParams};
use crate::distance::distance;
use crate::error::{KnnError, Result};
use crate::matrix::DistanceMatrix;
use crate::select::smallest_k;
use crate::tokenize::{tokenize, PathKey, Segments};

/// Ranked neighbors of one node: `(neighbor_index, distance)`, ascending.
pub type Neighbors = Vec<(usize, f64)>;

/// Exact k-nearest-neighbor search over path keys.
///
/// Owns a fixed-size worker pool, built once in [`KnnBuilder::new`] and released
/// on drop. Reuse one builder across calls to avoid rebuilding the pool.
///
/// Each call tokenizes every path once, then fans out one unit of work per row
/// `i` (distances to `i + 1..n`). Row results are gathered in index order and
/// assembled into a [`DistanceMatrix`] on the calling thread, so the parallel
/// phase shares nothing mutable.
pub struct KnnBuilder {
    pool: ThreadPool,
    cancel: Option<CancelToken>,
}

impl std::fmt::Debug for KnnBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnnBuilder")
            .field("num_threads", &self.pool.current_num_threads())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl KnnBuilder {
    /// Validate `params` and build the worker pool.
    pub fn new(params: KnnParams) -> Result<Self> {
        params.validate()?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("pathknn-{i}"));
        if let Some(n) = params.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        debug!(threads = pool.current_num_threads(), "built knn worker pool");

        Ok(Self {
            pool,
            cancel: params.cancel,
        })
    }

    /// Number of worker threads in the pool.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// For every node, its `k` nearest other nodes by path distance.
    ///
    /// The result has one entry per node, in input order. Each entry holds
    /// `min(k, n - 1)` neighbors sorted by distance, ties by lower index, and
    /// never the node itself. `k >= n` returns all other nodes. Empty input
    /// returns an empty result.
    ///
    /// # Errors
    ///
    /// Fails fast with the first error observed in the parallel phase; see
    /// [`distance_matrix`](Self::distance_matrix).
    pub fn k_nearest<N>(&self, k: usize, nodes: &[N]) -> Result<Vec<Neighbors>>
    where
        N: PathKey + Sync,
    {
        let _span = debug_span!("k_nearest", nodes = nodes.len(), k).entered();

        let matrix = self.distance_matrix(nodes)?;
        let k = k.min(matrix.len().saturating_sub(1));

        let neighbors: Vec<Neighbors> = self.pool.install(|| {
            (0..matrix.len())
                .into_par_iter()
                .map(|i| smallest_k(matrix.neighbors_of(i), k))
                .collect()
        });

        debug!(rows = neighbors.len(), k, "k_nearest complete");
        Ok(neighbors)
    }

    /// Full symmetric distance matrix over `nodes`.
    ///
    /// # Errors
    ///
    /// - [`KnnError::Cancelled`] if the cancel token is set.
    /// - [`KnnError::WorkerFailure`] if a unit of work fails or panics, naming
    ///   its row.
    ///
    /// No partial matrix is ever returned.
    pub fn distance_matrix<N>(&self, nodes: &[N]) -> Result<DistanceMatrix>
    where
        N: PathKey + Sync,
    {
        self.check_cancelled()?;
        let n = nodes.len();

        let segments: Vec<Segments<'_>> = self.pool.install(|| {
            nodes
                .par_iter()
                .enumerate()
                .map(|(i, node)| self.run_unit(i, || Ok(tokenize(node.path()))))
                .collect::<Result<Vec<_>>>()
        })?;

        let rows: Vec<Vec<f64>> = self.pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| self.run_unit(i, || row_tail(i, &segments)))
                .collect::<Result<Vec<_>>>()
        })?;

        let matrix = DistanceMatrix::from_row_tails(rows);
        debug!(nodes = n, cells = matrix.stored_cells(), "distance matrix assembled");
        Ok(matrix)
    }

    /// The `k` nodes nearest to an external `path`, ascending by distance.
    ///
    /// Unlike [`k_nearest`](Self::k_nearest), nothing is excluded: a node whose
    /// path equals `path` comes back at distance `0.0`. Returns
    /// `min(k, nodes.len())` entries.
    ///
    /// # Errors
    ///
    /// - [`KnnError::Cancelled`] if the cancel token is set.
    /// - [`KnnError::WorkerFailure`] if a unit of work fails or panics, naming
    ///   the node index.
    pub fn query<N>(&self, path: &str, k: usize, nodes: &[N]) -> Result<Neighbors>
    where
        N: PathKey + Sync,
    {
        self.check_cancelled()?;
        let target = tokenize(path);

        let distances: Vec<(usize, f64)> = self.pool.install(|| {
            nodes
                .par_iter()
                .enumerate()
                .map(|(i, node)| {
                    self.run_unit(i, || Ok((i, distance(&target, &tokenize(node.path()))?)))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(smallest_k(distances, k.min(nodes.len())))
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(KnnError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Run one unit of work for `row`. Errors and panics raised by `work` both
    /// come back as [`KnnError::WorkerFailure`] carrying the row.
    fn run_unit<T>(&self, row: usize, work: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Err(e) = self.check_cancelled() {
            warn!(row, "cancelled before unit start");
            return Err(e);
        }

        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(value)) => {
                trace!(row, "unit complete");
                Ok(value)
            }
            Ok(Err(e)) => {
                warn!(row, error = %e, "unit failed");
                Err(KnnError::WorkerFailure {
                    row,
                    reason: e.to_string(),
                })
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(row, %reason, "unit panicked");
                Err(KnnError::WorkerFailure { row, reason })
            }
        }
    }
}

/// Distances from row `i` to every later row.
fn row_tail(i: usize, segments: &[Segments<'_>]) -> Result<Vec<f64>> {
    let s = &segments[i];
    let mut out = Vec::with_capacity(segments.len() - i - 1);
    for t in &segments[i + 1..] {
        out.push(distance(s, t)?);
    }
    Ok(out)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(threads: usize) -> KnnBuilder {
        KnnBuilder::new(KnnParams::default().with_threads(threads)).unwrap()
    }

    #[test]
    fn pool_has_requested_size() {
        assert_eq!(builder(3).num_threads(), 3);
    }

    #[test]
    fn zero_threads_is_invalid() {
        let err = KnnBuilder::new(KnnParams::default().with_threads(0)).unwrap_err();
        assert!(matches!(err, KnnError::InvalidParameter(_)));
    }

    #[test]
    fn row_tail_lengths() {
        let segs: Vec<Segments<'_>> = ["a", "a/b", "c"].iter().map(|p| tokenize(*p)).collect();
        assert_eq!(row_tail(0, &segs).unwrap(), vec![0.5, 1.0]);
        assert_eq!(row_tail(1, &segs).unwrap(), vec![1.0]);
        assert!(row_tail(2, &segs).unwrap().is_empty());
    }

    #[test]
    fn matrix_matches_pairwise_distance() {
        let paths = ["a/b/c", "a/b/d", "a/x", "q"];
        let m = builder(2).distance_matrix(&paths).unwrap();
        for i in 0..paths.len() {
            for j in 0..paths.len() {
                let expected = crate::path_distance(paths[i], paths[j]).unwrap();
                assert_eq!(m.get(i, j), expected, "({i}, {j})");
            }
        }
    }

    #[test]
    fn excludes_self_and_sorts() {
        let paths = ["a/b/c", "a/b/d", "a/x/y", "z"];
        let nn = builder(2).k_nearest(2, &paths).unwrap();
        assert_eq!(nn.len(), 4);
        for (i, row) in nn.iter().enumerate() {
            assert_eq!(row.len(), 2);
            assert!(row.iter().all(|&(j, _)| j != i));
            assert!(row.windows(2).all(|w| w[0].1 <= w[1].1));
        }
        assert_eq!(nn[0][0], (1, 1.0 / 3.0));
    }

    #[test]
    fn query_includes_exact_match() {
        let paths = ["a/b", "a/c", "d"];
        let hits = builder(2).query("a/c", 2, &paths).unwrap();
        assert_eq!(hits, vec![(1, 0.0), (0, 0.5)]);
    }

    #[test]
    fn query_with_huge_k_returns_every_node() {
        let paths = ["a/b", "a/c"];
        let hits = builder(2).query("a/b", usize::MAX, &paths).unwrap();
        assert_eq!(hits, vec![(0, 0.0), (1, 0.5)]);
        let hits = builder(2).query("a/b", 1 << 40, &paths).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn metric_error_in_row_names_the_row() {
        let segs: Vec<Segments<'_>> = vec![Segments::new(), Segments::new()];
        assert_eq!(row_tail(0, &segs), Err(KnnError::InvalidMetricInput));

        let err = builder(1).run_unit(0, || row_tail(0, &segs)).unwrap_err();
        match err {
            KnnError::WorkerFailure { row, reason } => {
                assert_eq!(row, 0);
                assert!(reason.contains("both segment sequences are empty"), "{reason}");
            }
            other => panic!("expected WorkerFailure, got {other:?}"),
        }
    }

    #[test]
    fn panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn Any + Send> = Box::new(5_u8);
        assert_eq!(panic_message(s.as_ref()), "unknown panic payload");
    }
}
