//! Exact nearest-neighbour search over an in-memory matrix

use ccbot_core::{Error, Result};
use std::cmp::Ordering;

/// Squared Euclidean distance
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Row-major vectors of one fixed dimension, searched by full scan
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build from vectors that must all have the same width
    pub fn from_vectors(vectors: &[Vec<f32>]) -> Result<Self> {
        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(dim * vectors.len());
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(Error::IndexAlignment(format!(
                    "vector {} has dimension {}, expected {}",
                    i,
                    v.len(),
                    dim
                )));
            }
            data.extend_from_slice(v);
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` closest positions as `(distance, position)`, ascending by
    /// distance with ties broken by position.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, usize)>> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, v)| (squared_l2(query, v), i))
            .collect();

        let by_distance = |a: &(f32, usize), b: &(f32, usize)| -> Ordering {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
        };

        if k < scored.len() {
            scored.select_nth_unstable_by(k, by_distance);
            scored.truncate(k);
        }
        scored.sort_by(by_distance);
        Ok(scored)
    }
}
