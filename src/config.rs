use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_TEMPLATE_REPO: &str =
    "https://github.com/NASA-AMMOS/slim-docsite-template.git";

/// All documentation sections, in sidebar order.
pub const ALL_SECTIONS: [&str; 5] = [
    "overview",
    "installation",
    "api",
    "development",
    "contributing",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Optional: override the environment variable the API key is read from.
    /// Providers default to their conventional variable (e.g. OPENAI_API_KEY).
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// For OpenAI-compatible and Ollama endpoints
    #[serde(default)]
    pub base_url: Option<String>,

    /// Optional: Override max_tokens for LLM requests.
    /// If not specified, uses provider-specific defaults:
    /// - openai: 4096
    /// - azure: 4096
    /// - ollama: 16384
    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// URL or local path of the docsite template repository
    #[serde(default = "default_template_repo")]
    pub repo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Documentation sections to generate, in sidebar order
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
}

fn default_template_repo() -> String {
    DEFAULT_TEMPLATE_REPO.to_string()
}

fn default_sections() -> Vec<String> {
    ALL_SECTIONS.iter().map(|s| s.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: None,
            base_url: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            repo: default_template_repo(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            template: TemplateConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Get max_tokens value, using provider-specific default if not specified
    pub fn get_max_tokens(&self, provider: &str) -> u32 {
        if let Some(tokens) = self.max_tokens {
            return tokens;
        }

        match provider {
            "openai" => 4096,
            "azure" => 4096,
            "ollama" => 16384, // local models accept larger completions
            _ => 4096,
        }
    }
}

impl Config {
    /// Load config from repo root or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        // Try working directory first (per-project config)
        if let Ok(config) = Self::load_from_path("docgen.toml") {
            debug!("Loaded config from ./docgen.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("slim-docgen").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.template.repo, DEFAULT_TEMPLATE_REPO);
        assert_eq!(config.generation.sections.len(), 5);
        assert_eq!(config.llm.timeout_secs, 120);
        assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
        assert!(config.llm.max_tokens.is_none());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("slim-docsite-template"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.sections, config.generation.sections);
    }

    #[test]
    fn test_max_tokens_provider_defaults() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.get_max_tokens("openai"), 4096);
        assert_eq!(llm.get_max_tokens("azure"), 4096);
        assert_eq!(llm.get_max_tokens("ollama"), 16384);
        assert_eq!(llm.get_max_tokens("something-else"), 4096);

        // Explicit override wins
        llm.max_tokens = Some(2000);
        assert_eq!(llm.get_max_tokens("ollama"), 2000);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            r#"
[llm]
max_tokens = 1024
temperature = 0.7

[template]
repo = "https://example.com/my-template.git"

[generation]
sections = ["overview", "api"]
"#,
        )
        .unwrap();

        let config =
            Config::load_with_path(Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(config.llm.max_tokens, Some(1024));
        assert_eq!(config.template.repo, "https://example.com/my-template.git");
        assert_eq!(config.generation.sections, vec!["overview", "api"]);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = Config::load_with_path(Some("/nonexistent/docgen.toml".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("partial.toml");
        fs::write(&path, "[llm]\nbase_url = \"http://localhost:11434\"\n").unwrap();

        let config =
            Config::load_with_path(Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(
            config.llm.base_url.as_deref(),
            Some("http://localhost:11434")
        );
        assert_eq!(config.template.repo, DEFAULT_TEMPLATE_REPO);
        assert_eq!(config.generation.sections.len(), 5);
    }
}
