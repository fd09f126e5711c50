//! Vector search abstraction for chunk vectors.
//!
//! Defines a trait separating nearest-neighbor search from index
//! construction, so the retriever never depends on a concrete backend.

use scholar_core::AppResult;

/// A single search hit: the stored vector's position and its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the stored vector (aligns with the chunk sequence)
    pub position: usize,

    /// Squared Euclidean distance to the query (lower is closer)
    pub distance: f32,
}

/// Trait for nearest-neighbor search backends.
///
/// An implementation is built once from a document's chunk vectors and
/// queried many times. Results come back ascending by distance; any
/// exact or approximate structure can sit behind this trait as long as
/// it honors that ordering.
pub trait VectorSearch: Send + Sync {
    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// True when the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the stored vectors.
    fn dimension(&self) -> usize;

    /// Return up to `k` nearest stored vectors, ascending by distance.
    ///
    /// An empty index yields an empty result for any query. A query
    /// whose dimension differs from the stored vectors is an error.
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<Neighbor>>;
}
