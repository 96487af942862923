//! Prompt loader for workspace YAML overrides.

use crate::builder::render_template;
use crate::types::PromptDefinition;
use ragplay_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding prompt overrides, relative to the workspace.
pub const PROMPTS_DIR: &str = ".ragplay/prompts";

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(PROMPTS_DIR)
}

/// Load a prompt definition by ID from the workspace.
///
/// Looks for `<id>.yml` in `.ragplay/prompts/`.
///
/// # Example
/// ```no_run
/// use ragplay_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "rag.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let definition = read_definition(&prompt_file)?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}', expected '{}'",
            prompt_file, definition.id, prompt_id
        )));
    }

    Ok(definition)
}

/// List all prompt IDs overridden in the workspace, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let dir = prompts_dir(workspace_path);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

fn read_definition(path: &Path) -> AppResult<PromptDefinition> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
pub(crate) fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // Declared variables must cover every placeholder.
    if !def.variables.is_empty() {
        let placeholders: HashMap<String, String> = def
            .variables
            .iter()
            .map(|v| (v.clone(), String::new()))
            .collect();
        render_template(&def.template, &placeholders).map_err(|e| {
            AppError::Prompt(format!("Prompt '{}' does not render: {}", def.id, e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, body: &str) -> PathBuf {
        let prompts_dir = dir.join(PROMPTS_DIR);
        fs::create_dir_all(&prompts_dir).unwrap();

        let file_path = prompts_dir.join(format!("{}.yml", id));
        fs::write(&file_path, body).unwrap();
        file_path
    }

    fn valid_body(id: &str) -> String {
        format!(
            "id: {}\ntitle: \"Override\"\napiVersion: \"1.0\"\ntemplate: \"Q: {{{{question}}}}\"\n",
            id
        )
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "rag.answer", &valid_body("rag.answer"));

        let prompt = load_prompt(temp_dir.path(), "rag.answer").unwrap();
        assert_eq!(prompt.title, "Override");
        assert_eq!(prompt.template, "Q: {{question}}");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "broken", "invalid: yaml: content:");

        assert!(load_prompt(temp_dir.path(), "broken").is_err());
    }

    #[test]
    fn test_mismatched_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "rag.answer", &valid_body("rag.other"));

        assert!(load_prompt(temp_dir.path(), "rag.answer").is_err());
    }

    #[test]
    fn test_list_prompts_sorted() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "rag.fusion.subqueries", &valid_body("rag.fusion.subqueries"));
        write_prompt(temp_dir.path(), "rag.answer", &valid_body("rag.answer"));

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts, vec!["rag.answer", "rag.fusion.subqueries"]);
    }

    #[test]
    fn test_list_prompts_without_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_prompts(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_undeclared_placeholder_rejected() {
        let mut def = PromptDefinition::builtin("t", "Test", &["question"], "{{context}} {{question}}");
        assert!(matches!(validate_prompt(&def), Err(AppError::Prompt(_))));

        def.variables.push("context".to_string());
        assert!(validate_prompt(&def).is_ok());
    }
}
