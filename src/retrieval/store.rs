use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// One knowledge-base passage: a short titled snippet of cooking lore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitchenDoc {
    pub id: String,
    pub title: String,
    pub text: String,
}

/// A passage with its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scored {
    pub document: KitchenDoc,
    pub score: f32,
}

/// Brute-force in-memory vector store. The knowledge base is a handful of
/// documents, so a linear scan beats any index.
pub struct VectorStore {
    entries: Vec<(KitchenDoc, Vec<f32>)>,
    dimension: usize,
}

impl VectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            entries: Vec::new(),
            dimension,
        }
    }

    pub fn add(&mut self, document: KitchenDoc, embedding: Vec<f32>) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(anyhow!(
                "Embedding for '{}' has dimension {}, store expects {}",
                document.id,
                embedding.len(),
                self.dimension
            ));
        }
        self.entries.push((document, embedding));
        Ok(())
    }

    /// Scores every document against the query and returns the top `k` by
    /// cosine similarity, highest first. Ties keep insertion order.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<Scored>> {
        if query_embedding.len() != self.dimension {
            return Err(anyhow!(
                "Query embedding dimension {} does not match store dimension {}",
                query_embedding.len(),
                self.dimension
            ));
        }

        let mut scored: Vec<Scored> = self
            .entries
            .iter()
            .map(|(doc, embedding)| Scored {
                document: doc.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        // Stable sort so equal scores keep insertion order; NaN sinks to
        // the bottom instead of poisoning the ordering.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    /// Like `search`, but drops anything scoring below `min_score`.
    pub fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        k: usize,
        min_score: f32,
    ) -> Result<Vec<Scored>> {
        let mut results = self.search(query_embedding, k)?;
        results.retain(|s| s.score >= min_score);
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(doc, _)| doc.title.as_str())
            .collect()
    }
}

/// dot(a, b) / (|a| * |b|), with 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> KitchenDoc {
        KitchenDoc {
            id: id.to_string(),
            title: format!("title-{}", id),
            text: format!("text-{}", id),
        }
    }

    #[test]
    fn test_cosine_identity_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_search_ranks_descending() {
        let mut store = VectorStore::new(2);
        store.add(doc("far"), vec![0.0, 1.0]).unwrap();
        store.add(doc("near"), vec![1.0, 0.1]).unwrap();
        store.add(doc("mid"), vec![1.0, 1.0]).unwrap();

        let results = store.search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<&str> = results.iter().map(|s| s.document.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[test]
    fn test_search_top_k_and_zero_k() {
        let mut store = VectorStore::new(2);
        store.add(doc("a"), vec![1.0, 0.0]).unwrap();
        store.add(doc("b"), vec![0.0, 1.0]).unwrap();

        assert_eq!(store.search(&[1.0, 0.0], 1).unwrap().len(), 1);
        assert!(store.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_drops_weak_matches() {
        let mut store = VectorStore::new(2);
        store.add(doc("hit"), vec![1.0, 0.0]).unwrap();
        store.add(doc("miss"), vec![0.0, 1.0]).unwrap();

        let results = store.search_with_threshold(&[1.0, 0.0], 5, 0.5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "hit");
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut store = VectorStore::new(3);
        assert!(store.add(doc("a"), vec![1.0]).is_err());
        assert!(store.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = VectorStore::new(2);
        store.add(doc("first"), vec![1.0, 0.0]).unwrap();
        store.add(doc("second"), vec![2.0, 0.0]).unwrap();

        let results = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].document.id, "first");
        assert_eq!(results[1].document.id, "second");
    }
}
