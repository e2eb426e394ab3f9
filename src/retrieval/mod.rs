pub mod knowledge;
pub mod retriever;
pub mod store;

pub use knowledge::builtin_knowledge;
pub use retriever::Retriever;
pub use store::{cosine_similarity, KitchenDoc, Scored, VectorStore};
