//! Prompt system for ragplay.
//!
//! Every strategy prompt is a Handlebars template with a stable id.
//! Built-in templates ship with the crate; a workspace can override any
//! of them with a YAML file under `.ragplay/prompts/`.

pub mod builder;
pub mod library;
pub mod loader;
pub mod templates;
pub mod types;

pub use builder::render_template;
pub use library::PromptLibrary;
pub use loader::{list_prompts, load_prompt};
pub use types::PromptDefinition;
