use sha2::{Digest, Sha256};

use super::{Embedder, EmbeddingTask};
use crate::error::Result;

pub const MODEL_ID: &str = "hashing-v1";

/// Offline embedder: bag of lowercase alphanumeric tokens hashed into a
/// fixed number of buckets, then L2-normalised.
///
/// Identical token multisets always produce identical vectors, so the same
/// text embeds to distance zero from itself.
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(head) % self.dimensions as u64) as usize
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            v[self.bucket(&token.to_lowercase())] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, texts: &[String], _task: EmbeddingTask) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn model_id(&self) -> &str {
        MODEL_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tokens_same_vector() {
        let e = HashingEmbedder::new(64);
        let a = e.embed_one("Contra Costa 18-49");
        let b = e.embed_one("contra   COSTA, 18 49");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn vectors_are_unit_length() {
        let e = HashingEmbedder::new(32);
        let v = e.embed_one("fully vaccinated in the week ending 2022-01-02");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn punctuation_only_is_zero() {
        let e = HashingEmbedder::new(8);
        assert_eq!(e.embed_one("?!"), vec![0.0; 8]);
    }
}
