pub mod deepseek;
pub mod gemini;
pub mod traits;
pub mod utils;

pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;
pub use traits::{Completion, CompletionProvider};
