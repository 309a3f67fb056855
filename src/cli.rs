//! Command-line orchestration: configuration loading, CLI overrides, and
//! dispatch between generate / template-only / revise-site modes.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::enhancer::AiEnhancer;
use crate::generator::{self, DocGenerator};
use crate::llm::factory::{self, ModelSpec};
use crate::reviser::SiteReviser;
use crate::template::TemplateManager;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    repo_path: Option<String>,
    output_dir: String,
    template_repo: Option<String>,
    use_ai: Option<String>,
    template_only: bool,
    revise_site: bool,
    install: bool,
    start: bool,
    config_path: Option<String>,
    dry_run: bool,
) -> Result<()> {
    // Load config (explicit path, working dir, or user config dir)
    let mut config = Config::load_with_path(config_path)?;

    // Apply CLI overrides
    if let Some(ref template) = template_repo {
        info!("CLI override: template repo = {}", template);
        config.template.repo = template.clone();
    }

    let output = Path::new(&output_dir);
    info!("Output: {}", output.display());

    // Build the AI enhancer when requested
    let enhancer = match &use_ai {
        Some(spec_str) => {
            let spec = ModelSpec::parse_lenient(spec_str);
            let client = factory::create_client(&spec, &config.llm, dry_run)?;
            if dry_run {
                info!("Using mock LLM client");
            } else {
                info!("Using {} LLM provider", spec.provider);
            }
            Some(AiEnhancer::new(client, spec))
        }
        None => None,
    };

    if revise_site {
        let enhancer = enhancer
            .as_ref()
            .context("--revise-site requires --use-ai: the AI enhancer is not available")?;
        SiteReviser::new(output, enhancer).revise().await?;
    } else if template_only {
        info!("Generating template scaffold only");
        TemplateManager::new(&config.template.repo, output).fetch()?;
    } else {
        let repo = repo_path
            .context("REPO_PATH is required unless --template-only or --revise-site is given")?;
        let repo = Path::new(&repo);
        info!("Repository path: {}", repo.display());

        let mut doc_generator = DocGenerator::new(
            repo,
            output,
            &config.template.repo,
            config.generation.sections.clone(),
        );
        if let Some(enhancer) = enhancer {
            doc_generator = doc_generator.with_enhancer(enhancer);
        }
        doc_generator.generate().await?;
    }

    // Optionally install dependencies and start the dev server
    if install {
        generator::install_dependencies(output)?;
    }
    if start {
        generator::start_server(output)?;
    }

    Ok(())
}
