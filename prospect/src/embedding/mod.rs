//! Embedding provider boundary and vector similarity helpers.
//!
//! Prospect never runs an embedding model itself. Callers bring their own
//! provider (OpenAI, Cohere, a local ONNX model, ...) behind the
//! [`EmbeddingProvider`] trait; the engine only requires that a provider is
//! deterministic for a given text and model version.

use async_trait::async_trait;
use std::fmt::Debug;

/// Type for embedding vectors
pub type Embedding = Vec<f32>;

/// Error type for embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The underlying provider failed
    #[error("Embedding provider error: {0}")]
    Provider(String),

    /// A returned vector did not match the provider's declared dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Declared dimension
        expected: usize,
        /// Dimension of the returned vector
        actual: usize,
    },
}

/// Interface for services that turn text into fixed-length dense vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + 'static + Debug {
    /// The fixed dimension of vectors this provider produces.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Generate embeddings for a batch of texts.
    ///
    /// The default implementation embeds sequentially; providers with a
    /// batch endpoint should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` for mismatched lengths or zero-norm inputs rather than
/// producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

pub mod deterministic {
    //! A dependency-free deterministic provider.
    //!
    //! [`HashEmbedding`] hashes whitespace tokens into a fixed number of
    //! buckets and L2-normalizes the result. It carries no semantics beyond
    //! token overlap and exists for tests, examples, and offline smoke runs
    //! where wiring a real model is overkill.

    use super::{Embedding, EmbeddingError, EmbeddingProvider};
    use async_trait::async_trait;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    /// Token-hashing embedding provider.
    #[derive(Debug, Clone)]
    pub struct HashEmbedding {
        dimension: usize,
    }

    impl HashEmbedding {
        /// Create a provider producing vectors of the given dimension.
        pub fn new(dimension: usize) -> Self {
            Self { dimension }
        }
    }

    impl Default for HashEmbedding {
        fn default() -> Self {
            Self::new(384)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for HashEmbedding {
        fn dimension(&self) -> usize {
            self.dimension
        }

        async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            let mut vector = vec![0.0f32; self.dimension];
            for token in text.to_lowercase().split_whitespace() {
                let mut hasher = DefaultHasher::new();
                token.hash(&mut hasher);
                let bucket = (hasher.finish() as usize) % self.dimension;
                vector[bucket] += 1.0;
            }

            let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for value in &mut vector {
                    *value /= norm;
                }
            }
            Ok(vector)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::deterministic::HashEmbedding;
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, 0.5, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_guards_zero_norm_and_length_mismatch() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn hash_embedding_is_deterministic_and_normalized() {
        let provider = HashEmbedding::new(64);
        let a = provider.embed("gene therapy delivery").await.unwrap();
        let b = provider.embed("gene therapy delivery").await.unwrap();
        assert_eq!(a, b);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn overlapping_texts_are_more_similar_than_disjoint_ones() {
        let provider = HashEmbedding::new(64);
        let query = provider.embed("crispr gene editing").await.unwrap();
        let close = provider.embed("crispr gene editing review").await.unwrap();
        let far = provider.embed("volcanic soil chemistry").await.unwrap();
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }
}
