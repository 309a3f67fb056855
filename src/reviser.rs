//! Revise-site mode: update landing-page files of an already-generated site
//! from `docs/overview.md`, using AI prompts that preserve code structure.
//!
//! Each file is updated independently; a failure on one file never blocks the
//! others. A response that drops imports or the `siteConfig` reference is
//! rejected and the file left untouched.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::enhancer::AiEnhancer;

pub struct SiteReviser<'a> {
    output_dir: PathBuf,
    docs_dir: PathBuf,
    pages_dir: PathBuf,
    components_dir: PathBuf,
    enhancer: &'a AiEnhancer,
}

impl<'a> SiteReviser<'a> {
    pub fn new(output_dir: &Path, enhancer: &'a AiEnhancer) -> Self {
        let src_dir = output_dir.join("src");
        Self {
            output_dir: output_dir.to_path_buf(),
            docs_dir: output_dir.join("docs"),
            pages_dir: src_dir.join("pages"),
            components_dir: src_dir.join("components"),
            enhancer,
        }
    }

    /// Revise the site landing page content based on docs/overview.md.
    pub async fn revise(&self) -> Result<()> {
        info!("Revising site landing page content based on docs/overview.md");

        if !self.docs_dir.exists() {
            bail!("Docs directory not found at {}", self.docs_dir.display());
        }
        if !self.pages_dir.exists() {
            bail!("Pages directory not found at {}", self.pages_dir.display());
        }

        let overview_path = self.docs_dir.join("overview.md");
        let overview_content = fs::read_to_string(&overview_path)
            .with_context(|| format!("overview.md not found at {}", overview_path.display()))?;

        // Update each file independently so one failure doesn't stop the rest
        let mut failures = 0;

        match self.update_index_js(&overview_content).await {
            Ok(true) => {}
            Ok(false) => failures += 1,
            Err(e) => {
                warn!("Error updating index.js: {}", e);
                failures += 1;
            }
        }

        match self.update_homepage_features(&overview_content).await {
            Ok(true) => {}
            Ok(false) => failures += 1,
            Err(e) => {
                warn!("Error updating HomepageFeatures: {}", e);
                failures += 1;
            }
        }

        match self.update_docusaurus_config(&overview_content).await {
            Ok(true) => {}
            Ok(false) => failures += 1,
            Err(e) => {
                warn!("Error updating docusaurus.config.js: {}", e);
                failures += 1;
            }
        }

        if failures == 0 {
            info!("Successfully revised site landing page content");
        } else {
            warn!(
                "{} file(s) could not be updated, but the process completed",
                failures
            );
        }
        Ok(())
    }

    /// Update src/pages/index.js, preserving component structure.
    async fn update_index_js(&self, overview_content: &str) -> Result<bool> {
        static IMPORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^import .+?;?$").unwrap());

        let index_js_path = self.pages_dir.join("index.js");
        if !index_js_path.exists() {
            warn!("index.js not found at {}", index_js_path.display());
            return Ok(false);
        }

        let current_content = fs::read_to_string(&index_js_path)
            .with_context(|| format!("Failed to read {}", index_js_path.display()))?;

        let uses_site_config = current_content.contains("const { siteConfig }")
            || current_content.contains("const {siteConfig}");
        let import_lines: Vec<&str> = IMPORT_RE
            .find_iter(&current_content)
            .map(|m| m.as_str())
            .collect();

        let prompt = format!(
            r#"Using the provided overview.md content as context, update ONLY the text content in this React component (index.js) while preserving its existing structure completely.

OVERVIEW.MD CONTENT (Use this as the source of information):
```
{overview}
```

CURRENT INDEX.JS IMPORTS:
```
{imports}
```

CURRENT INDEX.JS:
```
{current}
```

INSTRUCTIONS:
1. Update ONLY textual content (titles, descriptions, feature text) based on overview.md
2. DO NOT change any component structure, imports, exports, or function definitions
3. DO NOT modify any className values or styling
4. DO NOT change any hooks or hook calls (useState, useEffect, useDocusaurusContext, etc.)
5. Preserve ALL variable references like {{siteConfig.title}} exactly as they appear
6. If the component uses useDocusaurusContext() to get siteConfig, KEEP this pattern exactly as is
7. Do not change any function parameters or how props are used
8. If overview.md doesn't have relevant content for a section, leave it unchanged
9. IMPORTANT: Make minimal changes to the code - only replace static text strings

You MUST preserve the exact same component structure with identical function calls.
Any structural changes could break the component.

Return ONLY the complete, updated index.js code."#,
            overview = overview_content,
            imports = import_lines.join("\n"),
            current = current_content,
        );

        info!("Updating index.js content with AI");
        let response = self.enhancer.complete(&prompt).await?;
        let updated_content = extract_code_block(&response, "javascript");

        // Safety check: the siteConfig reference must survive
        if uses_site_config
            && !updated_content.contains("const { siteConfig }")
            && !updated_content.contains("const {siteConfig}")
        {
            warn!("AI removed siteConfig reference - keeping original index.js");
            return Ok(false);
        }

        // Safety check: all imports must survive
        for import_line in &import_lines {
            if !updated_content.contains(import_line) {
                warn!("AI removed import - keeping original index.js: {}", import_line);
                return Ok(false);
            }
        }

        if updated_content != current_content {
            fs::write(&index_js_path, updated_content)
                .with_context(|| format!("Failed to write {}", index_js_path.display()))?;
            info!("Updated index.js content using overview.md context");
        } else {
            info!("No changes needed for index.js");
        }
        Ok(true)
    }

    /// Update the HomepageFeatures component, located case-insensitively
    /// under src/components.
    async fn update_homepage_features(&self, overview_content: &str) -> Result<bool> {
        let Some(component_dir) = find_dir_case_insensitive(&self.components_dir, "homepagefeatures")
        else {
            warn!("HomepageFeatures component not found");
            return Ok(false);
        };

        let Some(index_js_path) = find_file_case_insensitive(&component_dir, "index.js") else {
            warn!("HomepageFeatures/index.js not found");
            return Ok(false);
        };

        let current_content = fs::read_to_string(&index_js_path)
            .with_context(|| format!("Failed to read {}", index_js_path.display()))?;

        let prompt = format!(
            r#"Using the provided overview.md content as context, update ONLY the feature descriptions in this React component (HomepageFeatures/index.js) while preserving its structure.

OVERVIEW.MD CONTENT (Use this as the source of information):
```
{overview}
```

CURRENT COMPONENT:
```
{current}
```

INSTRUCTIONS:
1. Update ONLY the feature titles and descriptions based on the Features section in overview.md
2. If the component has a FeatureList array, update the text in that array
3. If features are defined as individual components, update the text within them
4. DO NOT change the component structure, imports, or exports
5. DO NOT modify any className values or styling
6. DO NOT add or remove features - only update existing ones
7. Ensure the component remains functionally identical, just with updated content
8. If overview.md doesn't have relevant content for features, leave them unchanged

Return ONLY the updated component code."#,
            overview = overview_content,
            current = current_content,
        );

        info!("Updating HomepageFeatures content with AI");
        let response = self.enhancer.complete(&prompt).await?;
        let updated_content = extract_code_block(&response, "javascript");

        if updated_content != current_content {
            fs::write(&index_js_path, updated_content)
                .with_context(|| format!("Failed to write {}", index_js_path.display()))?;
            info!("Updated HomepageFeatures content using overview.md context");
        } else {
            info!("No changes needed for HomepageFeatures");
        }
        Ok(true)
    }

    /// Update the title and tagline of docusaurus.config.js.
    async fn update_docusaurus_config(&self, overview_content: &str) -> Result<bool> {
        let config_path = self.output_dir.join("docusaurus.config.js");
        if !config_path.exists() {
            warn!(
                "docusaurus.config.js not found at {}",
                config_path.display()
            );
            return Ok(false);
        }

        let current_config = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let prompt = format!(
            r#"Using the provided overview.md content as context, update ONLY the title and tagline in this docusaurus.config.js file.

OVERVIEW.MD CONTENT (Use this as the source of information):
```
{overview}
```

CURRENT CONFIG:
```
{current}
```

INSTRUCTIONS:
1. Update ONLY the title and tagline values based on overview.md
2. The title should be based on the main heading or title from overview.md
3. The tagline should be based on the first paragraph or description from overview.md
4. DO NOT change any other configuration settings
5. DO NOT modify any structural elements, plugins, or presets
6. DO NOT add or remove any configuration options
7. Preserve all routing and sidebar configuration
8. Ensure the configuration file remains functionally identical, just with updated text content

Return ONLY the updated configuration code."#,
            overview = overview_content,
            current = current_config,
        );

        info!("Updating docusaurus.config.js content with AI");
        let response = self.enhancer.complete(&prompt).await?;
        let updated_config = extract_code_block(&response, "javascript");

        if updated_config != current_config {
            fs::write(&config_path, updated_config)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            info!("Updated docusaurus.config.js content using overview.md context");
        } else {
            info!("No changes needed for docusaurus.config.js");
        }
        Ok(true)
    }
}

/// Extract code from an LLM response, removing markdown fences and any
/// surrounding explanation.
fn extract_code_block(content: &str, language: &str) -> String {
    let fence_re = Regex::new(&format!(r"(?s)```(?:{})?\n(.*?)```", regex::escape(language)))
        .expect("static fence pattern");
    if let Some(caps) = fence_re.captures(content) {
        return caps[1].trim().to_string();
    }

    // Not fenced: heuristically skip any leading explanatory text
    if language == "javascript" {
        static JS_START_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?m)^(?:import|export|const|let|var|function|class|/\*\*)").unwrap()
        });
        if let Some(m) = JS_START_RE.find(content) {
            return content[m.start()..].trim().to_string();
        }
    }

    content.trim().to_string()
}

fn find_dir_case_insensitive(parent: &Path, name_lower: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(parent).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if entry.file_name().to_string_lossy().to_lowercase() == name_lower {
                return Some(path);
            }
            // Components may be nested one level down (e.g. src/components/home/)
            if let Some(found) = find_dir_case_insensitive(&path, name_lower) {
                return Some(found);
            }
        }
    }
    None
}

fn find_file_case_insensitive(dir: &Path, name_lower: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .flatten()
        .find(|e| e.file_name().to_string_lossy().to_lowercase() == name_lower)
        .map(|e| e.path())
}
