pub mod backend;
pub mod fetcher;
pub mod normalizer;
pub mod prompts;
pub mod registry;
pub mod summarizer;
pub mod types;

pub use backend::{AnthropicBackend, MockBackend, OllamaBackend, TextGenerator};
pub use fetcher::Fetcher;
pub use registry::BlogRegistry;
pub use summarizer::Summarizer;
pub use types::*;
