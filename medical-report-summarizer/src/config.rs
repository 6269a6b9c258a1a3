use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context as _, anyhow};

pub const DEFAULT_OCR_MODEL: &str = "openai/gpt-4.1-mini";

/// Runtime settings, read from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerConfig {
    pub port: u16,
    pub max_file_size_mb: u64,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Number of passages requested from the vector store per report
    pub context_results: usize,
    /// Leading characters of the report used as the retrieval query
    pub context_query_chars: usize,
    pub vector_store_path: Option<PathBuf>,
    pub collection_name: String,
    pub openrouter_api_key: Option<String>,
    pub ocr_model: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            max_file_size_mb: 50,
            chunk_size: 500,
            chunk_overlap: 50,
            context_results: 5,
            context_query_chars: 500,
            vector_store_path: Some(PathBuf::from("./vector_store/medical_reports.json")),
            collection_name: "medical_reports".to_string(),
            openrouter_api_key: None,
            ocr_model: DEFAULT_OCR_MODEL.to_string(),
        }
    }
}

impl SummarizerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source; unset keys keep
    /// their defaults, malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            port: parse_or(&value, "PORT", defaults.port)?,
            max_file_size_mb: parse_or(&value, "MAX_FILE_SIZE_MB", defaults.max_file_size_mb)?,
            chunk_size: parse_or(&value, "CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(&value, "CHUNK_OVERLAP", defaults.chunk_overlap)?,
            context_results: parse_or(&value, "CONTEXT_RESULTS", defaults.context_results)?,
            context_query_chars: parse_or(
                &value,
                "CONTEXT_QUERY_CHARS",
                defaults.context_query_chars,
            )?,
            vector_store_path: match value("VECTOR_STORE_PATH") {
                Some(path) if path.eq_ignore_ascii_case("memory") => None,
                Some(path) => Some(PathBuf::from(path)),
                None => defaults.vector_store_path,
            },
            collection_name: value("COLLECTION_NAME").unwrap_or(defaults.collection_name),
            openrouter_api_key: value("OPENROUTER_API_KEY"),
            ocr_model: value("OCR_MODEL").unwrap_or(defaults.ocr_model),
        };

        if config.chunk_size == 0 {
            return Err(anyhow!("CHUNK_SIZE must be greater than zero"));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(anyhow!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                config.chunk_overlap,
                config.chunk_size
            ));
        }

        Ok(config)
    }
}

fn parse_or<T, F>(value: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match value(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
