//! Symmetric distance matrix with triangular storage.

/// An `n × n` symmetric distance matrix with a zero diagonal.
///
/// Only the strict upper triangle is stored (`n * (n - 1) / 2` cells, row-major),
/// but [`get`](Self::get) and [`row`](Self::row) behave as if every cell were
/// populated.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    upper: Vec<f64>,
}

impl DistanceMatrix {
    /// Assemble from per-row tails: `rows[i]` holds distances from `i` to
    /// `i + 1..n`, in order.
    ///
    /// # Panics
    ///
    /// Panics if a row has the wrong length.
    pub(crate) fn from_row_tails(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        let mut upper = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for (i, tail) in rows.into_iter().enumerate() {
            assert_eq!(tail.len(), n - i - 1, "row {i} has wrong length");
            upper.extend_from_slice(&tail);
        }
        Self { n, upper }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between `i` and `j`. The diagonal is `0.0`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds for {}", self.n);
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Less => self.upper[self.offset(i, j)],
            std::cmp::Ordering::Greater => self.upper[self.offset(j, i)],
        }
    }

    /// Full logical row `i` as `(j, distance)` pairs, `j` ascending, diagonal included.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.n).map(move |j| (j, self.get(i, j)))
    }

    /// Row `i` without the diagonal.
    pub(crate) fn neighbors_of(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row(i).filter(move |&(j, _)| j != i)
    }

    /// Number of stored cells.
    #[must_use]
    pub fn stored_cells(&self) -> usize {
        self.upper.len()
    }

    /// Offset of `(i, j)` with `i < j` in the packed upper triangle.
    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        // Rows 0..i contribute (n-1) + (n-2) + ... + (n-i) cells.
        i * (2 * self.n - i - 1) / 2 + (j - i - 1)
    }
}
