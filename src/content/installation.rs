//! Installation page generator.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use super::{extract_section, SectionGenerator};
use crate::analyzer::RepoInfo;

pub struct InstallationGenerator {
    repo_path: PathBuf,
}

impl InstallationGenerator {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    /// Look for an installation section the project already wrote
    fn existing_instructions(&self, info: &RepoInfo) -> Option<String> {
        let readme = info.key_files.readme.as_ref()?;
        let content = fs::read_to_string(self.repo_path.join(readme)).ok()?;

        for name in [
            "Installation",
            "Install",
            "Getting Started",
            "Setup",
            "Quick Start",
        ] {
            if let Some(section) = extract_section(&content, name) {
                return Some(section);
            }
        }
        None
    }

    /// Generate setup steps from the package files present in the repo
    fn generated_instructions(&self, info: &RepoInfo) -> Vec<String> {
        let mut content = Vec::new();

        if info.has_file("package.json") {
            content.push("## Node.js\n".to_string());
            content.push("```bash".to_string());
            content.push("# Install dependencies".to_string());
            content.push("npm install".to_string());
            content.push("```\n".to_string());
        }

        if info.has_file("requirements.txt") {
            content.push("## Python\n".to_string());
            content.push("```bash".to_string());
            content.push("# Create a virtual environment".to_string());
            content.push("python -m venv venv".to_string());
            content
                .push("source venv/bin/activate  # On Windows: venv\\Scripts\\activate".to_string());
            content.push(String::new());
            content.push("# Install dependencies".to_string());
            content.push("pip install -r requirements.txt".to_string());
            content.push("```\n".to_string());
        } else if info.has_any_file(&["setup.py", "pyproject.toml"]) {
            content.push("## Python\n".to_string());
            content.push("```bash".to_string());
            content.push("# Create a virtual environment".to_string());
            content.push("python -m venv venv".to_string());
            content
                .push("source venv/bin/activate  # On Windows: venv\\Scripts\\activate".to_string());
            content.push(String::new());
            content.push("# Install in development mode".to_string());
            content.push("pip install -e .".to_string());
            content.push("```\n".to_string());
        }

        if info.has_file("Cargo.toml") {
            content.push("## Rust\n".to_string());
            content.push("```bash".to_string());
            content.push("# Build the project".to_string());
            content.push("cargo build --release".to_string());
            content.push("```\n".to_string());
        }

        if info.has_file("go.mod") {
            content.push("## Go\n".to_string());
            content.push("```bash".to_string());
            content.push("go build ./...".to_string());
            content.push("```\n".to_string());
        }

        content
    }
}

impl SectionGenerator for InstallationGenerator {
    fn id(&self) -> &'static str {
        "installation"
    }

    fn title(&self) -> &'static str {
        "Installation"
    }

    fn generate(&self, info: &RepoInfo) -> Result<Option<String>> {
        let mut content = Vec::new();
        content.push("# Installation\n".to_string());
        content.push("This page explains how to install and set up this project.\n".to_string());

        if let Some(existing) = self.existing_instructions(info) {
            content.push(existing);
            return Ok(Some(content.join("\n")));
        }

        let generated = self.generated_instructions(info);
        if generated.is_empty() {
            // Nothing to say; skip the page rather than publish filler
            return Ok(None);
        }
        content.extend(generated);

        Ok(Some(content.join("\n")))
    }
}
