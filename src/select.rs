//! Bounded top-k selection.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered by `(distance, index)`, largest first.
#[derive(Clone, Copy, PartialEq)]
struct Entry {
    index: usize,
    distance: f64,
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on (distance, index): the root is the current worst keeper.
        // total_cmp gives IEEE 754 total ordering, so NaN sorts after +inf.
        self.distance
            .total_cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Return the `k` smallest `(index, distance)` pairs in ascending order.
///
/// Ties on distance go to the lower index, so the result is deterministic for a
/// given input regardless of iteration order. Runs in `O(n log k)` with
/// `O(min(k, n))` extra memory; `k` larger than the input returns everything.
pub fn smallest_k<I>(items: I, k: usize) -> Vec<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    if k == 0 {
        return Vec::new();
    }

    let items = items.into_iter();
    let mut heap: BinaryHeap<Entry> = BinaryHeap::with_capacity(k.min(items.size_hint().0));
    for (index, distance) in items {
        let entry = Entry { index, distance };
        if heap.len() < k {
            heap.push(entry);
        } else if let Some(mut worst) = heap.peek_mut() {
            if entry < *worst {
                *worst = entry;
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|e| (e.index, e.distance))
        .collect()
}
