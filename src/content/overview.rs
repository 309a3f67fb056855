//! Overview page generator.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use super::{extract_section, SectionGenerator};
use crate::analyzer::RepoInfo;

pub struct OverviewGenerator {
    repo_path: PathBuf,
}

impl OverviewGenerator {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    fn readme_content(&self, info: &RepoInfo) -> Option<String> {
        let readme = info.key_files.readme.as_ref()?;
        fs::read_to_string(self.repo_path.join(readme)).ok()
    }
}

impl SectionGenerator for OverviewGenerator {
    fn id(&self) -> &'static str {
        "overview"
    }

    fn title(&self) -> &'static str {
        "Overview"
    }

    fn generate(&self, info: &RepoInfo) -> Result<Option<String>> {
        let mut content = Vec::new();
        content.push(format!("# {}\n", info.project_name));

        if let Some(description) = &info.description {
            content.push(format!("{}\n", description));
        }

        let readme = self.readme_content(info);

        // Prefer the project's own prose where the README provides it
        if let Some(readme) = &readme {
            for name in ["About", "Introduction", "Overview"] {
                if let Some(section) = extract_section(readme, name) {
                    content.push(section);
                    content.push(String::new());
                    break;
                }
            }
            for name in ["Features", "Key Features", "Highlights"] {
                if let Some(section) = extract_section(readme, name) {
                    content.push(section);
                    content.push(String::new());
                    break;
                }
            }
            for name in ["Usage", "Examples", "Quick Start"] {
                if let Some(section) = extract_section(readme, name) {
                    content.push(section);
                    content.push(String::new());
                    break;
                }
            }
        }

        if !info.languages.is_empty() {
            content.push("## Technology\n".to_string());
            content.push(format!(
                "This project is written in {}.\n",
                info.languages.join(", ")
            ));
        }

        if let Some(url) = &info.repo_url {
            content.push("## Source\n".to_string());
            content.push(format!("The source code is available at {}\n", url));
        }

        Ok(Some(content.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RepoAnalyzer;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_readme(readme: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), readme).unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/main.py"), "x = 1\n").unwrap();
        tmp
    }

    #[test]
    fn test_overview_includes_features_section() {
        let tmp = repo_with_readme(
            "# Proj\n\nA tool.\n\n## Features\n\n- fast\n- small\n\n## License\n\nMIT\n",
        );
        let info = RepoAnalyzer::new(tmp.path()).unwrap().analyze().unwrap();
        let generator = OverviewGenerator::new(tmp.path());

        let content = generator.generate(&info).unwrap().unwrap();
        assert!(content.contains("## Features"));
        assert!(content.contains("- fast"));
        assert!(!content.contains("## License"));
        assert!(content.contains("A tool."));
    }

    #[test]
    fn test_overview_without_readme_still_generates() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/lib.rs"), "pub fn f() {}\n").unwrap();

        let info = RepoAnalyzer::new(tmp.path()).unwrap().analyze().unwrap();
        let generator = OverviewGenerator::new(tmp.path());

        let content = generator.generate(&info).unwrap().unwrap();
        assert!(content.contains("## Technology"));
        assert!(content.contains("Rust"));
    }
}
