//! Application configuration.
//!
//! Everything is read from the environment exactly once at process start
//! and carried through `AppState`; business logic never consults env vars
//! directly.

use std::env;
use std::path::PathBuf;

use crate::llm::engine::EngineConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port for the HTTP server.
    pub port: u16,
    /// Allowed CORS origins; a literal `*` entry means any origin.
    pub allowed_origins: Vec<String>,
    /// Model API credential. May be empty — startup proceeds, model calls fail.
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub openai_base_url: String,
    /// Model used for ingestion and retrieval embeddings.
    pub embedding_model: String,
    /// Retry/fallback/timeout tuning for the answer engine.
    pub engine: EngineConfig,
    /// Whether retrieval-augmented context is enabled. Off by default.
    pub enable_retrieval: bool,
    /// Number of chunks prepended as context when retrieval is enabled.
    pub retrieval_top_k: usize,
    /// Backing file of the vector store.
    pub vector_store_path: PathBuf,
    /// Seed URLs for the ingestion tool.
    pub seed_urls: Vec<String>,
    pub smtp_host: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub email_from: Option<String>,
    pub email_to: Option<String>,
    /// When set, logs are additionally written to a rolling file in this dir.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            allowed_origins: vec!["*".to_string()],
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            engine: EngineConfig::default(),
            enable_retrieval: false,
            retrieval_top_k: 3,
            vector_store_path: PathBuf::from("data/embeddings.json"),
            seed_urls: Vec::new(),
            smtp_host: None,
            smtp_user: None,
            smtp_pass: None,
            email_from: None,
            email_to: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_var("PORT").and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Some(origins) = env_var("ALLOWED_ORIGIN") {
            config.allowed_origins = split_list(&origins);
        }
        if let Some(key) = env_var("OPENAI_API_KEY") {
            config.openai_api_key = key;
        }
        if let Some(url) = env_var("OPENAI_BASE_URL") {
            config.openai_base_url = url;
        }
        if let Some(flag) = env_var("ENABLE_RETRIEVAL") {
            config.enable_retrieval = parse_bool(&flag);
        }
        if let Some(path) = env_var("VECTOR_STORE_PATH") {
            config.vector_store_path = PathBuf::from(path);
        }
        if let Some(urls) = env_var("SEED_URLS") {
            config.seed_urls = split_list(&urls);
        }

        config.smtp_host = env_var("SMTP_HOST");
        config.smtp_user = env_var("SMTP_USER");
        config.smtp_pass = env_var("SMTP_PASS");
        config.email_from = env_var("EMAIL_FROM");
        config.email_to = env_var("EMAIL_TO");
        config.log_dir = env_var("LOG_DIR").map(PathBuf::from);

        config
    }

    /// Whether the CORS layer should allow any origin.
    pub fn cors_wildcard(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empty_entries() {
        let origins = split_list("https://a.example , https://b.example,, ");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn parse_bool_accepts_common_truthy_spellings() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" yes "));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn default_config_is_fast_mode_with_wildcard_cors() {
        let config = AppConfig::default();
        assert!(!config.enable_retrieval);
        assert!(config.cors_wildcard());
        assert_eq!(config.retrieval_top_k, 3);
        assert_eq!(config.vector_store_path, PathBuf::from("data/embeddings.json"));
    }
}
