//! LLM integration crate for ragplay.
//!
//! Provider-agnostic access to text-generation models through the
//! [`LlmClient`] trait, plus the [`Generator`] that strategies call.
//!
//! # Providers
//! - **Groq** (default) and **OpenAI**: OpenAI-compatible chat completions
//! - **Ollama**: local LLM runtime
//! - **Scripted**: canned responses for tests and offline runs
//!
//! # Example
//! ```no_run
//! use ragplay_llm::{create_client, Generator};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client("ollama", None, None, None)?;
//! let generator = Generator::new(client, "llama3", 0.7);
//! let text = generator.generate_default("Hello, world!", &CancellationToken::new()).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generator;
pub mod providers;
pub mod types;

pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use generator::Generator;
pub use providers::{OllamaClient, OpenAiCompatClient, ScriptedClient};
pub use types::ProviderType;
