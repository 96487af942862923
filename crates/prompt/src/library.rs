//! Prompt library: built-in templates plus workspace overrides.

use crate::builder::registry;
use crate::loader::{list_prompts, load_prompt, validate_prompt};
use crate::templates::builtin_definitions;
use crate::types::PromptDefinition;
use handlebars::Handlebars;
use ragplay_core::{AppError, AppResult};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Compiled set of prompt templates keyed by id.
///
/// Loaded once at start and shared read-only by every strategy.
pub struct PromptLibrary {
    definitions: BTreeMap<String, PromptDefinition>,
    handlebars: Handlebars<'static>,
}

impl PromptLibrary {
    /// Library holding only the built-in templates.
    pub fn builtin() -> AppResult<Self> {
        let mut library = Self {
            definitions: BTreeMap::new(),
            handlebars: registry(),
        };
        for definition in builtin_definitions() {
            library.insert(definition)?;
        }
        Ok(library)
    }

    /// Built-in templates overlaid with `.ragplay/prompts/*.yml` from `workspace`.
    pub fn load(workspace: &Path) -> AppResult<Self> {
        let mut library = Self::builtin()?;

        for id in list_prompts(workspace)? {
            let definition = load_prompt(workspace, &id)?;
            if !library.definitions.contains_key(&id) {
                tracing::warn!(prompt = %id, "Prompt override does not match a built-in template");
            }
            tracing::info!(prompt = %id, title = %definition.title, "Loaded prompt override");
            library.insert(definition)?;
        }

        Ok(library)
    }

    /// Add or replace a template.
    pub fn insert(&mut self, definition: PromptDefinition) -> AppResult<()> {
        validate_prompt(&definition)?;
        self.handlebars
            .register_template_string(&definition.id, &definition.template)
            .map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to register template '{}': {}",
                    definition.id, e
                ))
            })?;
        self.definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&PromptDefinition> {
        self.definitions.get(id)
    }

    /// Template ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Render template `id` with `vars`.
    pub fn render(&self, id: &str, vars: &[(&str, &str)]) -> AppResult<String> {
        if !self.definitions.contains_key(id) {
            return Err(AppError::Prompt(format!("Unknown prompt: {}", id)));
        }

        let data: HashMap<&str, &str> = vars.iter().copied().collect();
        self.handlebars
            .render(id, &data)
            .map_err(|e| AppError::Prompt(format!("Failed to render '{}': {}", id, e)))
    }
}

impl std::fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLibrary")
            .field("ids", &self.definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}
