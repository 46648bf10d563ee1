//! Provider selection from config plus credentials taken from the environment

use anyhow::{anyhow, Context, Result};
use ccbot_config::{Config, EmbeddingBackend, EmbeddingConfig, LlmBackend, LlmConfig};
use ccbot_core::embeddings::{
    Embedder, GeminiEmbedder, HashingEmbedder, OllamaEmbedder, OpenAiEmbedder,
};
use ccbot_core::llm::{EchoGenerator, Generator, OllamaGenerator, OpenAiGenerator};
use ccbot_index::Retriever;
use ccbot_pipeline::{AnswerGenerator, DynPipeline, PromptProfile, QueryPipeline};
use std::env;
use std::time::Duration;

/// Secrets and endpoints that never live in config files
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ollama_base_url: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: read("OPENAI_API_KEY"),
            gemini_api_key: read("GEMINI_API_KEY"),
            ollama_base_url: read("OLLAMA_BASE_URL"),
        }
    }

    fn require(value: &Option<String>, name: &str, backend: &str) -> Result<String> {
        value
            .clone()
            .ok_or_else(|| anyhow!("{} not set; required by the {} backend", name, backend))
    }
}

pub fn select_embedder(cfg: &EmbeddingConfig, creds: &Credentials) -> Result<Box<dyn Embedder>> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let embedder: Box<dyn Embedder> = match cfg.backend {
        EmbeddingBackend::OpenAi => {
            let key = Credentials::require(&creds.openai_api_key, "OPENAI_API_KEY", "openai")?;
            Box::new(OpenAiEmbedder::new(
                key,
                cfg.model(),
                cfg.api_base.as_deref(),
                timeout,
            )?)
        }
        EmbeddingBackend::Gemini => {
            let key = Credentials::require(&creds.gemini_api_key, "GEMINI_API_KEY", "gemini")?;
            Box::new(GeminiEmbedder::new(
                key,
                cfg.model(),
                cfg.api_base.as_deref(),
                timeout,
            )?)
        }
        EmbeddingBackend::Ollama => {
            let base = cfg.api_base.as_deref().or(creds.ollama_base_url.as_deref());
            Box::new(OllamaEmbedder::new(cfg.model(), base, timeout)?)
        }
        EmbeddingBackend::Hashing => Box::new(HashingEmbedder::new(cfg.dimensions)),
    };
    Ok(embedder)
}

pub fn select_generator(cfg: &LlmConfig, creds: &Credentials) -> Result<Box<dyn Generator>> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let generator: Box<dyn Generator> = match cfg.backend {
        LlmBackend::OpenAi => {
            let key = Credentials::require(&creds.openai_api_key, "OPENAI_API_KEY", "openai")?;
            Box::new(OpenAiGenerator::new(
                key,
                cfg.model_name(),
                cfg.max_tokens,
                cfg.api_base.as_deref(),
                timeout,
            )?)
        }
        LlmBackend::Ollama => {
            let base = cfg.api_base.as_deref().or(creds.ollama_base_url.as_deref());
            Box::new(OllamaGenerator::new(
                cfg.model_name(),
                cfg.max_tokens,
                base,
                timeout,
            )?)
        }
        LlmBackend::Echo => Box::new(EchoGenerator),
    };
    Ok(generator)
}

/// Open the configured index and wire it to the configured providers
pub fn build_pipeline(config: &Config, creds: &Credentials) -> Result<DynPipeline> {
    let stem = config.data.index_stem(config.retrieval.granularity);
    let embedder = select_embedder(&config.embedding, creds)?;
    let retriever = Retriever::open(&stem, embedder).with_context(|| {
        format!(
            "failed to open {} index at {} (run `ccbot index` first)",
            config.retrieval.granularity,
            stem.display()
        )
    })?;
    let generator = select_generator(&config.llm, creds)?;
    let answerer = AnswerGenerator::new(generator, PromptProfile::from_config(&config.retrieval));
    Ok(QueryPipeline::new(retriever, answerer))
}
