//! Contributing guidelines generator.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{extract_section, strip_frontmatter, SectionGenerator};
use crate::analyzer::RepoInfo;

pub struct ContributingGenerator {
    repo_path: PathBuf,
}

impl ContributingGenerator {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }
}

impl SectionGenerator for ContributingGenerator {
    fn id(&self) -> &'static str {
        "contributing"
    }

    fn title(&self) -> &'static str {
        "Contributing"
    }

    fn generate(&self, info: &RepoInfo) -> Result<Option<String>> {
        // A CONTRIBUTING file is authoritative, use it as-is
        if let Some(contributing) = &info.key_files.contributing {
            match fs::read_to_string(self.repo_path.join(contributing)) {
                Ok(content) => return Ok(Some(strip_frontmatter(&content))),
                Err(e) => warn!("Error reading {}: {}", contributing, e),
            }
        }

        let mut content = Vec::new();
        content.push("# Contributing\n".to_string());
        content.push("This page provides guidelines for contributing to this project.\n".to_string());

        // Next best: a contributing section in the README
        if let Some(readme) = &info.key_files.readme {
            if let Ok(readme_content) = fs::read_to_string(self.repo_path.join(readme)) {
                for name in ["Contributing", "How to Contribute"] {
                    if let Some(section) = extract_section(&readme_content, name) {
                        content.push(section);
                        return Ok(Some(content.join("\n")));
                    }
                }
            }
        }

        // Default guidelines
        content.push("## How to Contribute\n".to_string());
        content.push("1. Fork the repository".to_string());
        content.push("2. Create a new branch for your changes".to_string());
        content.push("3. Make your changes and commit them with clear messages".to_string());
        content.push("4. Push your branch and open a pull request\n".to_string());

        content.push("## Reporting Issues\n".to_string());
        content.push(
            "If you find a bug or have a feature request, please open an issue. Include \
             as much detail as possible: steps to reproduce, expected behavior, and your \
             environment.\n"
                .to_string(),
        );

        content.push("## Pull Requests\n".to_string());
        content.push("- Keep changes focused; one feature or fix per pull request".to_string());
        content.push("- Add or update tests for your changes".to_string());
        content.push("- Make sure the existing tests pass".to_string());
        content.push("- Follow the project's existing code style\n".to_string());

        if let Some(url) = &info.repo_url {
            content.push("## Getting the Code\n".to_string());
            content.push("```bash".to_string());
            content.push(format!("git clone {}", url));
            content.push("```".to_string());
        }

        Ok(Some(content.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RepoAnalyzer;
    use tempfile::TempDir;

    #[test]
    fn test_uses_contributing_file_verbatim() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("CONTRIBUTING.md"),
            "# How we work\n\nSign the CLA first.\n",
        )
        .unwrap();

        let info = RepoAnalyzer::new(tmp.path()).unwrap().analyze().unwrap();
        let content = ContributingGenerator::new(tmp.path())
            .generate(&info)
            .unwrap()
            .unwrap();
        assert!(content.contains("Sign the CLA first."));
        assert!(!content.contains("## How to Contribute"));
    }

    #[test]
    fn test_uses_readme_contributing_section() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("README.md"),
            "# P\n\nDesc.\n\n## Contributing\n\nPRs welcome, squash your commits.\n",
        )
        .unwrap();

        let info = RepoAnalyzer::new(tmp.path()).unwrap().analyze().unwrap();
        let content = ContributingGenerator::new(tmp.path())
            .generate(&info)
            .unwrap()
            .unwrap();
        assert!(content.contains("squash your commits"));
    }

    #[test]
    fn test_default_guidelines_generated() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "x = 1\n").unwrap();

        let info = RepoAnalyzer::new(tmp.path()).unwrap().analyze().unwrap();
        let content = ContributingGenerator::new(tmp.path())
            .generate(&info)
            .unwrap()
            .unwrap();
        assert!(content.contains("## How to Contribute"));
        assert!(content.contains("## Reporting Issues"));
        assert!(content.contains("## Pull Requests"));
    }
}
