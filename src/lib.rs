//! pathknn: exact k-nearest-neighbor search over slash-delimited path keys.
//!
//! Keys like `"org/team/service/handler"` are compared by a segment-level
//! normalized edit distance: Levenshtein over whole path segments, divided by the
//! longer key's segment count.
//!
//! - [`tokenize`](mod@tokenize): split a path into segments (empty segments kept)
//! - [`distance`](mod@distance): the metric, with common prefix/suffix trimming
//! - [`select`]: bounded-heap top-k with stable ties
//! - [`matrix`]: symmetric distance matrix, upper triangle only
//! - [`knn`]: row-parallel all-pairs computation on an explicit rayon pool
//!
//! # Exhaustive by construction
//!
//! Every pair is measured: `n * (n - 1) / 2` metric evaluations per call. There is
//! no index and nothing is cached between calls. For the few thousand keys this
//! is meant for, the trimmed DP is cheap because shared path prefixes are cut
//! before the quadratic part runs.
//!
//! # Errors
//!
//! Everything fallible returns [`Result`]. The parallel phase is fail-fast: the
//! first failing unit aborts the call and no partial matrix escapes.

pub mod distance;
pub mod error;
pub mod knn;
pub mod matrix;
pub mod select;
pub mod tokenize;

pub use distance::{distance, edit_distance, path_distance};
pub use error::{KnnError, Result};
pub use knn::{k_nearest, CancelToken, KnnBuilder, KnnParams, Neighbors};
pub use matrix::DistanceMatrix;
pub use select::smallest_k;
pub use tokenize::{tokenize, Node, PathKey, Segments};
