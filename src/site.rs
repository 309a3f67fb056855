//! Docusaurus site configuration updates: `docusaurus.config.js` title and
//! tagline, and `sidebars.js` generation.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analyzer::RepoInfo;
use crate::config::ALL_SECTIONS;
use crate::content::section_title;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"title:\s*(['"])(?:[^'"\\]|\\.)*['"]"#).unwrap());
static TAGLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"tagline:\s*(['"])(?:[^'"\\]|\\.)*['"]"#).unwrap());

pub struct ConfigUpdater {
    output_dir: PathBuf,
}

impl ConfigUpdater {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Rewrite the site title and tagline in docusaurus.config.js from the
    /// analyzed repository. Only the first occurrence of each is touched
    /// (the top-level site fields come before any navbar entries).
    pub fn update_config(&self, repo_info: &RepoInfo) -> Result<()> {
        let config_path = self.output_dir.join("docusaurus.config.js");
        if !config_path.exists() {
            warn!(
                "docusaurus.config.js not found at {}",
                config_path.display()
            );
            return Ok(());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let title = &repo_info.project_name;
        let tagline = repo_info
            .description
            .clone()
            .unwrap_or_else(|| format!("{} documentation", repo_info.project_name));

        let updated = TITLE_RE
            .replace(&content, |caps: &regex::Captures| {
                let quote = &caps[1];
                format!("title: {}{}{}", quote, js_escape(title, quote), quote)
            })
            .to_string();
        let updated = TAGLINE_RE
            .replace(&updated, |caps: &regex::Captures| {
                let quote = &caps[1];
                format!("tagline: {}{}{}", quote, js_escape(&tagline, quote), quote)
            })
            .to_string();

        if updated != content {
            fs::write(&config_path, updated)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            info!("Updated site title and tagline in docusaurus.config.js");
        }

        Ok(())
    }

    /// Write sidebars.js listing index plus the sections that were generated,
    /// in canonical order.
    pub fn update_sidebars(&self, sections: &[String]) -> Result<()> {
        let sidebars_path = self.output_dir.join("sidebars.js");

        let mut items = vec!["index".to_string()];
        for id in ALL_SECTIONS {
            if sections.iter().any(|s| s == id) {
                items.push(id.to_string());
            }
        }

        let mut content = String::new();
        content.push_str(
            "/** @type {import('@docusaurus/plugin-content-docs').SidebarsConfig} */\n",
        );
        content.push_str("const sidebars = {\n");
        content.push_str("  tutorialSidebar: [\n");
        for id in &items {
            content.push_str("    {\n");
            content.push_str("      type: 'doc',\n");
            content.push_str(&format!("      id: '{}',\n", id));
            content.push_str(&format!("      label: '{}',\n", section_title(id)));
            content.push_str("    },\n");
        }
        content.push_str("  ],\n");
        content.push_str("};\n\n");
        content.push_str("module.exports = sidebars;\n");

        fs::write(&sidebars_path, content)
            .with_context(|| format!("Failed to write {}", sidebars_path.display()))?;
        info!("Generated sidebars.js with {} entries", items.len());

        Ok(())
    }
}

/// Escape a string for inclusion in a single- or double-quoted JS literal
fn js_escape(s: &str, quote: &str) -> String {
    let escaped = s.replace('\\', "\\\\");
    match quote {
        "'" => escaped.replace('\'', "\\'"),
        _ => escaped.replace('"', "\\\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG_JS: &str = r#"const config = {
  title: 'My Site',
  tagline: 'Dinosaurs are cool',
  themeConfig: {
    navbar: {
      title: 'My Site',
      items: [{ type: 'docSidebar', sidebarId: "tutorialSidebar", label: 'Docs' }],
    },
  },
};

module.exports = config;
"#;

    fn repo_info(name: &str, description: Option<&str>) -> RepoInfo {
        RepoInfo {
            project_name: name.to_string(),
            description: description.map(str::to_string),
            ..RepoInfo::default()
        }
    }

    #[test]
    fn test_update_config_replaces_title_and_tagline() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("docusaurus.config.js"), CONFIG_JS).unwrap();

        let updater = ConfigUpdater::new(tmp.path());
        updater
            .update_config(&repo_info("proj-x", Some("Does things")))
            .unwrap();

        let updated = fs::read_to_string(tmp.path().join("docusaurus.config.js")).unwrap();
        assert!(updated.contains("title: 'proj-x'"));
        assert!(updated.contains("tagline: 'Does things'"));
        // The navbar title (second occurrence) is left alone
        assert!(updated.contains("title: 'My Site'"));
    }

    #[test]
    fn test_update_config_escapes_quotes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("docusaurus.config.js"), CONFIG_JS).unwrap();

        let updater = ConfigUpdater::new(tmp.path());
        updater
            .update_config(&repo_info("proj", Some("It's great")))
            .unwrap();

        let updated = fs::read_to_string(tmp.path().join("docusaurus.config.js")).unwrap();
        assert!(updated.contains(r"tagline: 'It\'s great'"));
    }

    #[test]
    fn test_update_config_missing_file_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let updater = ConfigUpdater::new(tmp.path());
        assert!(updater.update_config(&repo_info("p", None)).is_ok());
    }

    #[test]
    fn test_update_config_default_tagline() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("docusaurus.config.js"), CONFIG_JS).unwrap();

        ConfigUpdater::new(tmp.path())
            .update_config(&repo_info("proj", None))
            .unwrap();

        let updated = fs::read_to_string(tmp.path().join("docusaurus.config.js")).unwrap();
        assert!(updated.contains("tagline: 'proj documentation'"));
    }

    #[test]
    fn test_update_sidebars_orders_and_filters() {
        let tmp = TempDir::new().unwrap();
        let updater = ConfigUpdater::new(tmp.path());
        updater
            .update_sidebars(&["api".to_string(), "overview".to_string()])
            .unwrap();

        let sidebars = fs::read_to_string(tmp.path().join("sidebars.js")).unwrap();
        assert!(sidebars.contains("tutorialSidebar"));
        assert!(sidebars.contains("id: 'index'"));
        let overview_pos = sidebars.find("id: 'overview'").unwrap();
        let api_pos = sidebars.find("id: 'api'").unwrap();
        assert!(overview_pos < api_pos);
        assert!(!sidebars.contains("id: 'development'"));
        assert!(sidebars.contains("module.exports = sidebars;"));
    }
}
