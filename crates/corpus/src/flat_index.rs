//! Flat exact-scan vector index.
//!
//! Stores one document's chunk vectors contiguously and answers queries
//! with a full scan under squared Euclidean distance. No normalization,
//! no approximation: every stored vector is compared on every query, so
//! results are exact and reproducible.

use crate::vector_index::{Neighbor, VectorSearch};
use scholar_core::{AppError, AppResult};
use std::cmp::Ordering;

/// Exact nearest-neighbor index over a fixed set of vectors.
///
/// The vector at position `i` corresponds to chunk `i` of the owning
/// document. Built once per document per build; never mutated after.
pub struct FlatIndex {
    /// Row-major vector data, `count * dimension` values
    data: Vec<f32>,
    dimension: usize,
    count: usize,
}

impl FlatIndex {
    /// Bulk-load an index from equal-dimension vectors.
    ///
    /// Vector order is preserved: position `i` in search results refers
    /// to `vectors[i]`. Mixed dimensions are rejected.
    pub fn build(vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        let Some(first) = vectors.first() else {
            return Ok(Self {
                data: Vec::new(),
                dimension: 0,
                count: 0,
            });
        };

        let dimension = first.len();
        if dimension == 0 {
            return Err(AppError::Corpus(
                "cannot index zero-dimension vectors".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(vectors.len() * dimension);
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(AppError::Corpus(format!(
                    "vector {} has dimension {}, expected {}",
                    position,
                    vector.len(),
                    dimension
                )));
            }
            data.extend_from_slice(vector);
        }

        Ok(Self {
            data,
            dimension,
            count: vectors.len(),
        })
    }

    fn row(&self, position: usize) -> &[f32] {
        let start = position * self.dimension;
        &self.data[start..start + self.dimension]
    }
}

/// Squared Euclidean distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

impl VectorSearch for FlatIndex {
    fn len(&self) -> usize {
        self.count
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<Neighbor>> {
        if self.count == 0 || k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(AppError::Corpus(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut neighbors: Vec<Neighbor> = (0..self.count)
            .map(|position| Neighbor {
                position,
                distance: squared_l2(query, self.row(position)),
            })
            .collect();

        // Stable sort keeps the earlier position first on exact ties
        neighbors.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        neighbors.truncate(k);

        Ok(neighbors)
    }
}
