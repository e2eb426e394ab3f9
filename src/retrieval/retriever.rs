use anyhow::Result;
use log::{debug, info};

use super::knowledge::builtin_knowledge;
use super::store::{Scored, VectorStore};
use crate::providers::traits::CompletionProvider;

/// Embeds the knowledge base once, then answers queries with a ranked,
/// thresholded top-k over it.
pub struct Retriever {
    store: VectorStore,
    top_k: usize,
    min_score: f32,
}

impl Retriever {
    /// Builds the store from the built-in knowledge base. Embeddings are
    /// requested sequentially; the base is a dozen entries, so there is
    /// nothing to parallelize.
    pub async fn from_builtin(
        provider: &dyn CompletionProvider,
        top_k: usize,
        min_score: f32,
    ) -> Result<Self> {
        let docs = builtin_knowledge();
        let mut store = VectorStore::new(provider.embedding_dimension());

        for doc in docs {
            let embedding = provider.embed(&doc.text).await?;
            debug!("embedded knowledge entry '{}'", doc.id);
            store.add(doc, embedding)?;
        }

        info!("knowledge base ready: {} entries", store.len());
        Ok(Self {
            store,
            top_k,
            min_score,
        })
    }

    /// Embeds the query and returns the passages that clear the score
    /// threshold, best first.
    pub async fn retrieve(
        &self,
        provider: &dyn CompletionProvider,
        query: &str,
    ) -> Result<Vec<Scored>> {
        let query_embedding = provider.embed(query).await?;
        let hits = self
            .store
            .search_with_threshold(&query_embedding, self.top_k, self.min_score)?;
        debug!(
            "retrieval for query ({} chars): {} of {} entries above {:.2}",
            query.len(),
            hits.len(),
            self.store.len(),
            self.min_score
        );
        Ok(hits)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.store.titles()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Lays retrieved passages above the question so the model answers from
    /// them. When nothing cleared the threshold we say so explicitly rather
    /// than hand the model an empty context block.
    pub fn build_grounded_prompt(hits: &[Scored], user_message: &str) -> String {
        if hits.is_empty() {
            return format!(
                "No knowledge base passage matched this question. Answer from your own \
                 cooking knowledge, and say when you are unsure.\n\nUser: {}\nAssistant:",
                user_message
            );
        }

        let mut context = String::from("Relevant kitchen notes:\n");
        for (i, hit) in hits.iter().enumerate() {
            context.push_str(&format!(
                "{}. [Score: {:.2}] {}: {}\n",
                i + 1,
                hit.score,
                hit.document.title,
                hit.document.text
            ));
        }

        format!(
            "{}\nAnswer the question using these notes where they apply.\n\nUser: {}\nAssistant:",
            context, user_message
        )
    }
}
