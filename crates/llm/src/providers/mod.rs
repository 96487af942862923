//! LLM provider implementations.

pub mod ollama;
pub mod openai;
pub mod scripted;

pub use ollama::OllamaClient;
pub use openai::OpenAiCompatClient;
pub use scripted::ScriptedClient;
