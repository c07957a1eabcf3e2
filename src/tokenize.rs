//! Path tokenization.
//!
//! A path key such as `"zoo/mammals/cat"` is compared segment by segment, so the
//! edit distance works over whole segments, not characters. Splitting keeps empty
//! segments: `"a//b"` has three segments and `""` has one.

use smallvec::SmallVec;

/// Segment separator for path keys.
pub const SEPARATOR: char = '/';

/// Ordered segments of a single path, borrowed from the path string.
///
/// Inline capacity covers typical hierarchy depths without a heap allocation.
pub type Segments<'a> = SmallVec<[&'a str; 8]>;

/// Split `path` on `/` without trimming or dropping empty segments.
#[inline]
#[must_use]
pub fn tokenize(path: &str) -> Segments<'_> {
    path.split(SEPARATOR).collect()
}

/// Anything that exposes a slash-delimited path key.
pub trait PathKey {
    /// The path string, e.g. `"a/b/c"`.
    fn path(&self) -> &str;
}

impl PathKey for str {
    fn path(&self) -> &str {
        self
    }
}

impl PathKey for String {
    fn path(&self) -> &str {
        self.as_str()
    }
}

impl<T: PathKey + ?Sized> PathKey for &T {
    fn path(&self) -> &str {
        (**self).path()
    }
}

/// A minimal caller record: an identifier plus its path key.
///
/// Neighbor results refer to nodes by their position in the input slice, not by
/// `id`; the identifier is carried for the caller's convenience.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: u32,
    pub path: String,
}

impl Node {
    pub fn new(id: u32, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

impl PathKey for Node {
    fn path(&self) -> &str {
        &self.path
    }
}
