//! Configuration for the chat backend
//!
//! Defaults are overridden by an optional TOML file (path in `SAFINA_CONFIG`)
//! and then by environment variables. `validate` runs last and fails fast when
//! a required credential is missing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "SAFINA_CONFIG";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Hosted LLM configuration
    pub llm: LlmConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Vector database configuration
    pub vector_db: VectorDbConfig,
    /// Pipeline policy parameters
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allowed CORS origins (empty allows any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

/// Hosted LLM (Groq, OpenAI-compatible) configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.2,
            max_tokens: 900,
            timeout_secs: 60,
        }
    }
}

// Keeps the key out of startup logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Embedding (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Chroma HTTP API generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaApi {
    /// `/api/v1/collections/...`, served by Chroma 0.4 and 0.5
    V1,
    /// `/api/v2/tenants/{tenant}/databases/{database}/collections/...`, Chroma 0.6 and 1.x
    #[default]
    V2,
}

impl FromStr for ChromaApi {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(format!("unknown Chroma API version: {}", other)),
        }
    }
}

/// Vector database (Chroma) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Chroma server base URL
    pub base_url: String,
    /// API generation the server speaks
    pub api: ChromaApi,
    /// Tenant (v2 only)
    pub tenant: String,
    /// Database (v2 only)
    pub database: String,
    /// Collection holding the catalog chunks
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            api: ChromaApi::V2,
            tenant: "default_tenant".to_string(),
            database: "default_database".to_string(),
            collection: "safina_carpets".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Pipeline policy parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Most recent history turns shown to the condenser
    pub history_turns: usize,
    /// Characters kept from each history turn
    pub history_turn_chars: usize,
    /// Chunks requested from the retrieval index
    pub top_k: usize,
    /// Maximum sources returned to the caller
    pub max_sources: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_turns: 6,
            history_turn_chars: 200,
            top_k: 4,
            max_sources: 3,
        }
    }
}

impl RagConfig {
    /// Load configuration from the optional TOML file and the process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("GROQ_API_KEY") {
            self.llm.api_key = v;
        }
        if let Some(v) = get("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = get("EMBEDDING_MODEL") {
            self.embeddings.model = v;
        }
        if let Some(v) = get("OLLAMA_URL") {
            self.embeddings.base_url = v;
        }
        if let Some(v) = get("CHROMA_URL") {
            self.vector_db.base_url = v;
        }
        if let Some(v) = get("CHROMA_COLLECTION") {
            self.vector_db.collection = v;
        }
        if let Some(v) = get("CHROMA_API") {
            self.vector_db.api = parse_env("CHROMA_API", &v)?;
        }
        if let Some(v) = get("CHROMA_TENANT") {
            self.vector_db.tenant = v;
        }
        if let Some(v) = get("CHROMA_DATABASE") {
            self.vector_db.database = v;
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = get("CORS_ORIGINS") {
            self.server.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = get("HISTORY_TURNS") {
            self.pipeline.history_turns = parse_env("HISTORY_TURNS", &v)?;
        }
        if let Some(v) = get("HISTORY_TURN_CHARS") {
            self.pipeline.history_turn_chars = parse_env("HISTORY_TURN_CHARS", &v)?;
        }
        if let Some(v) = get("RETRIEVAL_TOP_K") {
            self.pipeline.top_k = parse_env("RETRIEVAL_TOP_K", &v)?;
        }
        if let Some(v) = get("MAX_SOURCES") {
            self.pipeline.max_sources = parse_env("MAX_SOURCES", &v)?;
        }

        Ok(())
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(Error::config("GROQ_API_KEY missing"));
        }
        if self.pipeline.top_k == 0 {
            return Err(Error::config("RETRIEVAL_TOP_K must be at least 1"));
        }
        if self.pipeline.history_turns == 0 {
            return Err(Error::config("HISTORY_TURNS must be at least 1"));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::config(format!("{} has an invalid value: {:?}", key, value)))
}
