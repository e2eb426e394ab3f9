use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Dimension of Gemini's text-embedding-004 vectors. The fallback embedding
/// uses the same dimension so one vector store serves every provider.
pub const EMBEDDING_DIMENSION: usize = 768;

/// Deterministic bag-of-words embedding for providers without an embedding
/// endpoint. Each token is hashed into a bucket; the vector is L2-normalized
/// so cosine scores stay in a sane range. Crude, but stable across runs and
/// enough to rank a dozen documents.
pub fn hashed_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimension];

    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let bucket = (hasher.finish() as usize) % dimension;
        vector[bucket] += 1.0;
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_embedding_dimension_and_determinism() {
        let a = hashed_embedding("fried rice with egg", EMBEDDING_DIMENSION);
        let b = hashed_embedding("fried rice with egg", EMBEDDING_DIMENSION);
        assert_eq!(a.len(), EMBEDDING_DIMENSION);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hashed_embedding_is_normalized() {
        let v = hashed_embedding("coconut milk curry", 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_gives_zero_vector() {
        let v = hashed_embedding("   ", 16);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_similar_texts_score_higher_than_unrelated() {
        use crate::retrieval::cosine_similarity;

        let rice = hashed_embedding("jasmine rice water ratio for cooking rice", 256);
        let rice_q = hashed_embedding("how much water for jasmine rice", 256);
        let knives = hashed_embedding("sharpening carbon steel knives whetstone", 256);

        assert!(
            cosine_similarity(&rice_q, &rice) > cosine_similarity(&rice_q, &knives),
            "token overlap should dominate"
        );
    }
}
