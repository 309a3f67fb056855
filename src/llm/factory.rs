use anyhow::{bail, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use super::client::{LlmClient, MockLlmClient};
use super::client_impl::{AzureOpenAiClient, OllamaClient, OpenAiClient};
use crate::config::LlmConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Azure,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Azure => "azure",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ModelSpecError {
    #[error("invalid model spec '{0}': expected format 'provider/model' (e.g. 'openai/gpt-4o')")]
    MissingSlash(String),
    #[error("unsupported provider '{0}': expected one of openai, azure, ollama")]
    UnknownProvider(String),
}

/// A `provider/model` pair as given to `--use-ai`.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub provider: Provider,
    pub model: String,
}

impl FromStr for ModelSpec {
    type Err = ModelSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = s
            .split_once('/')
            .ok_or_else(|| ModelSpecError::MissingSlash(s.to_string()))?;
        let provider = match provider.to_lowercase().as_str() {
            "openai" => Provider::OpenAi,
            "azure" => Provider::Azure,
            "ollama" => Provider::Ollama,
            other => return Err(ModelSpecError::UnknownProvider(other.to_string())),
        };
        if model.is_empty() {
            return Err(ModelSpecError::MissingSlash(s.to_string()));
        }
        Ok(Self {
            provider,
            model: model.to_string(),
        })
    }
}

impl ModelSpec {
    /// Parse a `--use-ai` value, falling back to the openai provider on a
    /// malformed spec or unknown provider (with a warning) rather than failing.
    pub fn parse_lenient(s: &str) -> Self {
        match s.parse() {
            Ok(spec) => spec,
            Err(ModelSpecError::MissingSlash(raw)) => {
                warn!(
                    "Invalid model format: {}. Expected 'provider/model'; assuming openai.",
                    raw
                );
                Self {
                    provider: Provider::OpenAi,
                    model: s.to_string(),
                }
            }
            Err(ModelSpecError::UnknownProvider(p)) => {
                warn!("Unsupported provider: {}. Falling back to openai.", p);
                let model = s.split_once('/').map(|(_, m)| m).unwrap_or(s);
                Self {
                    provider: Provider::OpenAi,
                    model: model.to_string(),
                }
            }
        }
    }
}

fn require_env(var: &str) -> Result<String> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{} environment variable not set", var),
    }
}

/// Create an LLM client for the given model spec and config
pub fn create_client(
    spec: &ModelSpec,
    llm_config: &LlmConfig,
    dry_run: bool,
) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        return Ok(Box::new(MockLlmClient::new()));
    }

    let max_tokens = llm_config.get_max_tokens(spec.provider.as_str());
    let temperature = llm_config.temperature;
    let timeout_secs = llm_config.timeout_secs;

    match spec.provider {
        Provider::OpenAi => {
            let key_var = llm_config.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
            let api_key = require_env(key_var)?;
            match &llm_config.base_url {
                Some(base_url) => Ok(Box::new(OpenAiClient::with_base_url(
                    api_key,
                    spec.model.clone(),
                    base_url.clone(),
                    max_tokens,
                    temperature,
                    timeout_secs,
                )?)),
                None => Ok(Box::new(OpenAiClient::new(
                    api_key,
                    spec.model.clone(),
                    max_tokens,
                    temperature,
                    timeout_secs,
                )?)),
            }
        }

        Provider::Azure => {
            let endpoint = require_env("AZURE_OPENAI_ENDPOINT")?;
            let key_var = llm_config
                .api_key_env
                .as_deref()
                .unwrap_or("AZURE_OPENAI_API_KEY");
            let api_key = require_env(key_var)?;
            Ok(Box::new(AzureOpenAiClient::new(
                api_key,
                endpoint,
                spec.model.clone(),
                max_tokens,
                temperature,
                timeout_secs,
            )?))
        }

        Provider::Ollama => {
            let base_url = llm_config
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            Ok(Box::new(OllamaClient::new(
                spec.model.clone(),
                base_url,
                timeout_secs,
            )?))
        }
    }
}
