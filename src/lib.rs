pub mod chat;
pub mod commands;
pub mod config;
pub mod persona;
pub mod providers;
pub mod retrieval;
pub mod tools;

// Re-export commonly used items
pub use chat::ChatSession;
pub use persona::PersonaProfile;
pub use providers::CompletionProvider;
