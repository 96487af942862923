//! Configuration management for ragplay.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - A `.env` file in the working directory
//! - Config file (.ragplay/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Generation providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 4] = ["groq", "openai", "ollama", "scripted"];

/// Embedding providers the factory knows how to build.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Default model and dimensions for an embedding provider.
pub fn embedding_defaults(provider: &str) -> Option<(&'static str, usize)> {
    match provider {
        "trigram" => Some(("trigram-v1", 384)),
        "ollama" => Some(("nomic-embed-text", 768)),
        _ => None,
    }
}

/// Chunk splitters.
pub const KNOWN_SPLITTERS: [&str; 2] = ["window", "recursive"];

/// Main application configuration.
///
/// Holds the shared settings every strategy runs with: where the corpus
/// lives, which embedder and generator to use, and the retrieval knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .ragplay/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Plain-text corpus the index is built from
    pub corpus_path: PathBuf,

    /// Generation provider (e.g., "groq", "openai", "ollama")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,

    /// Optional per-call generation timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Embedding provider (e.g., "trigram", "ollama")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimensions
    pub embedding_dim: usize,

    /// Number of chunks retrieved per query
    pub top_k: usize,

    /// Chunk window length in characters
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,

    /// Chunk splitter ("window" or "recursive")
    pub splitter: String,

    /// API key for the generation provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(rename = "activeEmbeddingProvider", default)]
    pub active_embedding_provider: Option<String>,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    /// Hosted OpenAI-compatible endpoint (Groq, OpenAI)
    OpenAiCompatible {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        timeout: Option<u64>,
    },
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    corpus: Option<CorpusSection>,
    retrieval: Option<RetrievalSection>,
    generation: Option<GenerationSection>,
    embedding: Option<EmbeddingSection>,
    llm: Option<LlmConfig>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorpusSection {
    path: Option<String>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    splitter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSection {
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub corpus_path: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub top_k: Option<usize>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            corpus_path: PathBuf::from("data/documents.txt"),
            provider: "groq".to_string(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.7,
            request_timeout_secs: None,
            embedding_provider: "trigram".to_string(),
            embedding_model: "trigram-v1".to_string(),
            embedding_dim: 384,
            top_k: 4,
            chunk_size: 500,
            chunk_overlap: 50,
            splitter: "window".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the YAML config file and environment variables.
    ///
    /// Environment variables:
    /// - `RAGPLAY_WORKSPACE`: Override workspace path
    /// - `RAGPLAY_CONFIG`: Path to config file
    /// - `RAGPLAY_CORPUS`: Corpus file path
    /// - `RAGPLAY_PROVIDER` / `RAGPLAY_MODEL`: Generation provider and model
    /// - `RAGPLAY_TEMPERATURE`: Sampling temperature
    /// - `RAGPLAY_EMBEDDING_PROVIDER` / `RAGPLAY_EMBEDDING_MODEL`: Embedder
    /// - `RAGPLAY_EMBEDDING_DIM`: Embedding dimensions
    /// - `RAGPLAY_TOP_K`: Chunks retrieved per query
    /// - `RAGPLAY_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use ragplay_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Corpus: {:?}", config.corpus_path);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(&ConfigOverrides::default())
    }

    /// Load configuration with command-line overrides applied.
    ///
    /// The workspace and config-file overrides are resolved first so the
    /// YAML file they point at is the one merged.
    pub fn load_with(overrides: &ConfigOverrides) -> AppResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(AppError::Config(format!("Failed to read .env: {}", e))),
        }

        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("RAGPLAY_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }
        if let Some(ref workspace) = overrides.workspace {
            config.workspace = workspace.clone();
        }

        if let Ok(config_file) = std::env::var("RAGPLAY_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }
        if let Some(ref config_file) = overrides.config_file {
            config.config_file = Some(config_file.clone());
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        match config.config_file.clone() {
            Some(path) if !path.exists() => {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            Some(path) => config = config.merge_yaml(&path)?,
            None => {
                let default_path = config.ragplay_dir().join("config.yaml");
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        config.apply_env()?;

        Ok(config.with_overrides(overrides.clone()))
    }

    /// Environment variables override YAML config.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(corpus) = std::env::var("RAGPLAY_CORPUS") {
            self.corpus_path = PathBuf::from(corpus);
        }

        if let Ok(provider) = std::env::var("RAGPLAY_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(model) = std::env::var("RAGPLAY_MODEL") {
            self.model = model;
        }

        if let Ok(temperature) = std::env::var("RAGPLAY_TEMPERATURE") {
            self.temperature = temperature.parse().map_err(|_| {
                AppError::Config(format!("RAGPLAY_TEMPERATURE is not a number: {}", temperature))
            })?;
        }

        if let Ok(provider) = std::env::var("RAGPLAY_EMBEDDING_PROVIDER") {
            self.set_embedding_provider(provider);
        }

        if let Ok(model) = std::env::var("RAGPLAY_EMBEDDING_MODEL") {
            self.embedding_model = model;
        }

        if let Ok(dim) = std::env::var("RAGPLAY_EMBEDDING_DIM") {
            self.embedding_dim = dim.parse().map_err(|_| {
                AppError::Config(format!("RAGPLAY_EMBEDDING_DIM is not an integer: {}", dim))
            })?;
        }

        if let Ok(top_k) = std::env::var("RAGPLAY_TOP_K") {
            self.top_k = top_k.parse().map_err(|_| {
                AppError::Config(format!("RAGPLAY_TOP_K is not an integer: {}", top_k))
            })?;
        }

        self.api_key = std::env::var("RAGPLAY_API_KEY").ok();
        self.log_level = std::env::var("RUST_LOG").ok().or(self.log_level.take());

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Switch embedding provider, resetting model and dimensions to the
    /// provider's defaults when it changes. Explicit settings applied
    /// afterwards still win.
    fn set_embedding_provider(&mut self, provider: String) {
        if provider == self.embedding_provider {
            return;
        }
        if let Some((model, dim)) = embedding_defaults(&provider) {
            self.embedding_model = model.to_string();
            self.embedding_dim = dim;
        }
        self.embedding_provider = provider;
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.merge_file(config_file))
    }

    fn merge_file(&self, config_file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(corpus) = config_file.corpus {
            if let Some(path) = corpus.path {
                result.corpus_path = PathBuf::from(path);
            }
            if let Some(size) = corpus.chunk_size {
                result.chunk_size = size;
            }
            if let Some(overlap) = corpus.chunk_overlap {
                result.chunk_overlap = overlap;
            }
            if let Some(splitter) = corpus.splitter {
                result.splitter = splitter;
            }
        }

        if let Some(top_k) = config_file.retrieval.and_then(|r| r.top_k) {
            result.top_k = top_k;
        }

        if let Some(generation) = config_file.generation {
            if let Some(temperature) = generation.temperature {
                result.temperature = temperature;
            }
            result.request_timeout_secs = generation.timeout_secs.or(result.request_timeout_secs);
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.set_embedding_provider(provider);
            }
            if let Some(model) = embedding.model {
                result.embedding_model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding_dim = dimensions;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            if let Some(embedding_provider) = &llm.active_embedding_provider {
                result.set_embedding_provider(embedding_provider.clone());
                if let Some(ProviderConfig::Ollama {
                    embedding_model: Some(model),
                    ..
                }) = llm.providers.get(embedding_provider)
                {
                    result.embedding_model = model.clone();
                }
            }

            result.llm = Some(llm);
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(workspace) = overrides.workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = overrides.config_file {
            self.config_file = Some(config_file);
        }

        if let Some(corpus_path) = overrides.corpus_path {
            self.corpus_path = corpus_path;
        }

        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .ragplay directory.
    pub fn ragplay_dir(&self) -> PathBuf {
        self.workspace.join(".ragplay")
    }

    /// Corpus path, resolved against the workspace when relative.
    pub fn resolved_corpus_path(&self) -> PathBuf {
        if self.corpus_path.is_absolute() {
            self.corpus_path.clone()
        } else {
            self.workspace.join(&self.corpus_path)
        }
    }

    /// Get the configuration block for a provider.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the endpoint for a provider, if one is configured.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider)? {
            ProviderConfig::OpenAiCompatible { endpoint, .. } => endpoint.clone(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.clone()),
        }
    }

    /// Resolve API key from environment variable.
    ///
    /// `RAGPLAY_API_KEY` wins; otherwise the provider's configured `apiKeyEnv`,
    /// falling back to the conventional variable for hosted providers.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        let env_var = match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAiCompatible { api_key_env, .. }) => {
                Some(api_key_env.clone())
            }
            Some(ProviderConfig::Ollama { .. }) => None,
            None => default_api_key_env(provider).map(str::to_string),
        };

        env_var.and_then(|var| std::env::var(var).ok())
    }

    /// Validate provider names and numeric parameters.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_SPLITTERS.contains(&self.splitter.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown splitter: {}. Supported: {}",
                self.splitter,
                KNOWN_SPLITTERS.join(", ")
            )));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AppError::InvalidParameter(format!(
                "temperature must be within 0.0-1.0, got {}",
                self.temperature
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }

        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::InvalidParameter(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.embedding_dim == 0 {
            return Err(AppError::InvalidParameter(
                "embedding dimensions must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Get the generation model for this provider.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAiCompatible { model, .. } => model,
            Self::Ollama { model, .. } => model,
        }
    }
}

fn default_api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "groq" => Some("GROQ_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}
