//! AI enhancement of generated documentation content.
//!
//! Wraps an [`LlmClient`] with per-section prompts. Enhancement is strictly
//! best-effort: any provider failure logs a warning and the original content
//! is returned unchanged.

use tracing::{info, warn};

use crate::llm::client::LlmClient;
use crate::llm::factory::ModelSpec;

const SYSTEM_CONTEXT: &str = "You are a technical documentation specialist helping to improve \
software documentation. Your job is to enhance the provided documentation while maintaining \
factual accuracy. Improve clarity, organization, and comprehensiveness. Add examples where \
helpful. Format using markdown.";

pub struct AiEnhancer {
    client: Box<dyn LlmClient>,
    spec: ModelSpec,
}

impl AiEnhancer {
    pub fn new(client: Box<dyn LlmClient>, spec: ModelSpec) -> Self {
        info!(
            "Initialized AI enhancer with {}/{}",
            spec.provider, spec.model
        );
        Self { client, spec }
    }

    pub fn model_spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Enhance a documentation section. Returns the original content unchanged
    /// if the provider call fails or produces an empty response.
    pub async fn enhance(&self, content: &str, section: &str) -> String {
        info!("Enhancing {} content with AI", section);

        let prompt = enhancement_prompt(content, section);

        match self.client.complete(&prompt).await {
            Ok(enhanced) if !enhanced.trim().is_empty() => enhanced,
            Ok(_) => {
                warn!(
                    "AI enhancement returned empty output. Using original content for {}.",
                    section
                );
                content.to_string()
            }
            Err(e) => {
                warn!(
                    "AI enhancement failed for {}: {}. Using original content.",
                    section, e
                );
                content.to_string()
            }
        }
    }

    /// Run an arbitrary prompt through the underlying client. Used by the site
    /// reviser, which builds its own structure-preserving prompts.
    pub async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.client.complete(prompt).await
    }
}

/// Build the full enhancement prompt for a section: system context, a
/// section-specific instruction, then the content itself.
fn enhancement_prompt(content: &str, section: &str) -> String {
    let instruction = match section {
        "overview" => {
            "Enhance this project overview to be more comprehensive and user-friendly \
             while maintaining accuracy. Add clear sections for features, use cases, and key \
             concepts if they're not already present: "
        }
        "installation" => {
            "Improve this installation guide by adding clear prerequisites, \
             troubleshooting tips, and platform-specific instructions while \
             maintaining accuracy: "
        }
        "api" => {
            "Enhance this API documentation by adding more detailed descriptions, usage \
             examples, and parameter explanations while maintaining technical accuracy: "
        }
        "development" => {
            "Improve this development guide by adding more context, best practices, \
             and workflow descriptions while maintaining accuracy: "
        }
        "contributing" => {
            "Enhance these contributing guidelines by adding more specific examples, \
             workflow descriptions, and best practices while maintaining accuracy: "
        }
        _ => "Enhance this documentation while maintaining accuracy and improving clarity: ",
    };

    format!("{}\n\n{}\n\n{}", SYSTEM_CONTEXT, instruction, content)
}
