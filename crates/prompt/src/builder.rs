//! Prompt builder for rendering templates.

use handlebars::Handlebars;
use ragplay_core::{AppError, AppResult};
use std::collections::HashMap;

/// Handlebars registry configured for plain-text prompts.
///
/// HTML escaping is off and a variable missing from the input fails the
/// render instead of silently producing an empty string.
pub(crate) fn registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    handlebars
}

/// Render a Handlebars template with variables.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    registry()
        .render_template(template, variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
