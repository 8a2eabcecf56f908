//! Vector similarity: L2 normalization and the pluggable top-k index.
//!
//! Callers normalize vectors before handing them to an index, so inner
//! product and cosine similarity coincide.

use crate::errors::Error;

/// A candidate returned by a similarity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the candidate in the slice passed to the index.
    pub index: usize,
    /// Cosine similarity to the query, in [-1, 1].
    pub similarity: f32,
}

/// Finds the candidates most similar to a query vector.
///
/// Implementations return at most `k` neighbors sorted by descending
/// similarity. Inputs are expected to be L2-normalized.
pub trait SimilarityIndex: Send {
    fn top_k(
        &self,
        query: &[f32],
        candidates: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Neighbor>, Error>;
}

/// Exact brute-force index using inner product.
///
/// Adequate for tens to low hundreds of vectors per user. Ties keep the
/// candidates' original order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatIndex;

impl SimilarityIndex for FlatIndex {
    fn top_k(
        &self,
        query: &[f32],
        candidates: &[Vec<f32>],
        k: usize,
    ) -> Result<Vec<Neighbor>, Error> {
        if k == 0 || candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for (index, candidate) in candidates.iter().enumerate() {
            if candidate.len() != query.len() {
                return Err(Error::DimensionMismatch {
                    expected: query.len(),
                    actual: candidate.len(),
                });
            }
            scored.push(Neighbor {
                index,
                similarity: dot(query, candidate),
            });
        }

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scale a vector to unit length. Zero vectors stay zero.
pub fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-9);

    vec.iter().map(|&x| x / norm).collect()
}
