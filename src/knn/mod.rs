//! Exact parallel k-nearest-neighbor search over path keys.
//!
//! [`KnnBuilder`] is the explicit handle: it owns a sized worker pool and can be
//! reused across calls. [`k_nearest`] is the one-shot form that builds a default
//! pool for the call and drops it on return.
//!
//! # Example
//!
//! ```
//! use pathknn::{k_nearest, Node};
//!
//! let nodes = vec![
//!     Node::new(0, "zoo/mammals/cat"),
//!     Node::new(1, "zoo/mammals/dog"),
//!     Node::new(2, "zoo/birds/owl"),
//! ];
//! let nn = k_nearest(1, &nodes).unwrap();
//! assert_eq!(nn[0][0].0, 1);
//! ```

mod builder;
mod params;

pub use builder::{KnnBuilder, Neighbors};
pub use params::{CancelToken, KnnParams};

use crate::error::Result;
use crate::tokenize::PathKey;

/// For every node, its `k` nearest other nodes, using a pool sized to the
/// machine's available parallelism.
///
/// See [`KnnBuilder::k_nearest`] for result shape and ordering.
pub fn k_nearest<N>(k: usize, nodes: &[N]) -> Result<Vec<Neighbors>>
where
    N: PathKey + Sync,
{
    KnnBuilder::new(KnnParams::default())?.k_nearest(k, nodes)
}
