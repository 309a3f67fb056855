//! End-to-end documentation site generation.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analyzer::{RepoAnalyzer, RepoInfo};
use crate::content::{self, section_title};
use crate::enhancer::AiEnhancer;
use crate::site::ConfigUpdater;
use crate::template::TemplateManager;
use crate::util::run_command;

pub struct DocGenerator {
    target_repo_path: PathBuf,
    output_dir: PathBuf,
    template_repo: String,
    sections: Vec<String>,
    enhancer: Option<AiEnhancer>,
}

impl DocGenerator {
    pub fn new(
        target_repo_path: &Path,
        output_dir: &Path,
        template_repo: &str,
        sections: Vec<String>,
    ) -> Self {
        Self {
            target_repo_path: target_repo_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            template_repo: template_repo.to_string(),
            sections,
            enhancer: None,
        }
    }

    pub fn with_enhancer(mut self, enhancer: AiEnhancer) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    /// Generate the documentation site: template, analysis, content, site
    /// config, structure verification.
    pub async fn generate(&self) -> Result<()> {
        // Step 1: Fetch the template into the output directory
        TemplateManager::new(&self.template_repo, &self.output_dir).fetch()?;

        // Step 2: Analyze the target repository
        let analyzer = RepoAnalyzer::new(&self.target_repo_path)?;
        let repo_info = analyzer.analyze()?;

        // Step 3: Create the docs directory
        let docs_dir = self.output_dir.join("docs");
        fs::create_dir_all(&docs_dir)
            .with_context(|| format!("Failed to create {}", docs_dir.display()))?;

        // Step 4: Generate content for each configured section
        let mut generated_sections = Vec::new();
        for section_id in &self.sections {
            let generator = match content::generator_for(section_id, &self.target_repo_path) {
                Some(generator) => generator,
                None => {
                    warn!("Unknown section '{}' in config, skipping", section_id);
                    continue;
                }
            };

            let body = generator.generate(&repo_info)?;
            let Some(mut body) = body else {
                info!("No content for {} section, skipping", section_id);
                continue;
            };

            if let Some(enhancer) = &self.enhancer {
                body = enhancer.enhance(&body, section_id).await;
            }

            let page = format!(
                "---\nid: {}\ntitle: {}\n---\n\n{}",
                section_id,
                generator.title(),
                body
            );
            let file_path = docs_dir.join(format!("{}.md", section_id));
            fs::write(&file_path, page)
                .with_context(|| format!("Failed to write {}", file_path.display()))?;
            info!("Generated {} content", section_id);
            generated_sections.push(section_id.clone());
        }

        // Step 5: Generate index.md
        self.generate_index(&repo_info, &docs_dir)?;

        // Step 6: Update site configuration. Must come after content generation
        // so we know which sections were actually created
        let config_updater = ConfigUpdater::new(&self.output_dir);
        config_updater.update_config(&repo_info)?;

        // Step 7: Generate sidebars.js from the sections that exist on disk
        let sections_with_content: Vec<String> = self
            .sections
            .iter()
            .filter(|id| docs_dir.join(format!("{}.md", id)).exists())
            .cloned()
            .collect();
        config_updater.update_sidebars(&sections_with_content)?;

        // Step 8: Verify the structure is correct for Docusaurus
        self.verify_docusaurus_structure()?;

        info!(
            "Documentation successfully generated at {}",
            self.output_dir.display()
        );
        Ok(())
    }

    fn generate_index(&self, repo_info: &RepoInfo, docs_dir: &Path) -> Result<()> {
        let project_name = &repo_info.project_name;
        let description = repo_info
            .description
            .clone()
            .unwrap_or_else(|| format!("{} documentation", project_name));

        let exists = |id: &str| docs_dir.join(format!("{}.md", id)).exists();

        let mut content = vec![
            format!("# {} Documentation", project_name),
            String::new(),
            description,
            String::new(),
            "## Getting Started".to_string(),
            String::new(),
        ];

        for id in ["overview", "installation"] {
            if exists(id) {
                content.push(format!("- [{}]({}.md)", section_title(id), id));
            }
        }

        content.extend([String::new(), "## Reference".to_string(), String::new()]);

        for id in ["api", "development", "contributing"] {
            if exists(id) {
                content.push(format!("- [{}]({}.md)", section_title(id), id));
            }
        }

        let page = format!(
            "---\nslug: /\nid: index\ntitle: {} Documentation\n---\n\n{}",
            project_name,
            content.join("\n")
        );
        fs::write(docs_dir.join("index.md"), page).context("Failed to write index.md")?;
        info!("Generated index.md");
        Ok(())
    }

    /// Check for common issues in the generated Docusaurus structure and fix
    /// them to prevent errors during build/runtime.
    fn verify_docusaurus_structure(&self) -> Result<()> {
        // Check 1: the docs directory contains an index.md file
        let docs_dir = self.output_dir.join("docs");
        let index_path = docs_dir.join("index.md");
        if !index_path.exists() {
            warn!("index.md not found in docs directory. Generating a basic one.");
            fs::write(
                &index_path,
                "---\nslug: /\nid: index\ntitle: Documentation\n---\n\n\
                 # Documentation\n\nWelcome to the documentation.\n",
            )
            .context("Failed to write fallback index.md")?;
        }

        // Check 2: sidebars.js exists
        let sidebars_path = self.output_dir.join("sidebars.js");
        if !sidebars_path.exists() {
            warn!("sidebars.js not found. Generating a basic one.");
            ConfigUpdater::new(&self.output_dir).update_sidebars(&[])?;
        }

        // Check 3: docusaurus.config.js references the tutorialSidebar
        static SIDEBAR_ID_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"sidebarId:\s*["'][^"']+["']"#).unwrap());
        let config_path = self.output_dir.join("docusaurus.config.js");
        if config_path.exists() {
            let config_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            if !config_content.contains(r#"sidebarId: "tutorialSidebar""#)
                && !config_content.contains("sidebarId: 'tutorialSidebar'")
                && SIDEBAR_ID_RE.is_match(&config_content)
            {
                warn!("tutorialSidebar not referenced in docusaurus.config.js. Fixing.");
                let fixed = SIDEBAR_ID_RE
                    .replace(&config_content, r#"sidebarId: "tutorialSidebar""#)
                    .to_string();
                fs::write(&config_path, fixed)
                    .with_context(|| format!("Failed to write {}", config_path.display()))?;
            }
        }

        // Check 4: static directories exist
        fs::create_dir_all(self.output_dir.join("static").join("img"))
            .context("Failed to create static/img")?;

        info!("Verified Docusaurus structure");
        Ok(())
    }
}

/// Install the generated site's dependencies with npm.
pub fn install_dependencies(site_dir: &Path) -> Result<()> {
    info!("Installing dependencies");
    run_command(&["npm", "install"], site_dir)
}

/// Start the development server for the generated site. Blocks until the
/// server process exits.
pub fn start_server(site_dir: &Path) -> Result<()> {
    info!("Starting development server");
    run_command(&["npm", "start"], site_dir)
}
