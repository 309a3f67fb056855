//! Repository analysis: walks the target repo and extracts the facts the
//! content generators work from.

use anyhow::{bail, Result};
use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Well-known files detected at the repository root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyFiles {
    pub readme: Option<String>,
    pub contributing: Option<String>,
    pub license: Option<String>,
    pub changelog: Option<String>,
}

/// Everything the content generators need to know about the target repository.
/// Paths are relative to the repo root, `/`-separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoInfo {
    pub project_name: String,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub files: Vec<String>,
    pub directories: Vec<String>,
    pub key_files: KeyFiles,
    pub src_dirs: Vec<String>,
    pub doc_dirs: Vec<String>,
    pub test_dirs: Vec<String>,
    pub languages: Vec<String>,
}

impl RepoInfo {
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    pub fn has_any_file(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_file(n))
    }
}

pub struct RepoAnalyzer {
    repo_path: PathBuf,
    is_git_repo: bool,
}

const SRC_DIR_NAMES: [&str; 4] = ["src", "lib", "app", "source"];
const DOC_DIR_NAMES: [&str; 4] = ["docs", "doc", "documentation", "wiki"];
const TEST_DIR_NAMES: [&str; 4] = ["test", "tests", "spec", "specs"];

impl RepoAnalyzer {
    pub fn new(repo_path: &Path) -> Result<Self> {
        if !repo_path.exists() {
            bail!(
                "Target repository path does not exist: {}",
                repo_path.display()
            );
        }
        let is_git_repo = repo_path.join(".git").exists();
        Ok(Self {
            repo_path: repo_path.to_path_buf(),
            is_git_repo,
        })
    }

    pub fn is_git_repo(&self) -> bool {
        self.is_git_repo
    }

    pub fn analyze(&self) -> Result<RepoInfo> {
        info!("Analyzing repository at {}", self.repo_path.display());

        let mut info = RepoInfo {
            project_name: self.detect_project_name(),
            ..RepoInfo::default()
        };

        self.walk_files(&mut info)?;
        self.detect_key_files(&mut info);
        self.categorize_directories(&mut info);
        self.detect_languages(&mut info);
        self.extract_metadata(&mut info);

        if self.is_git_repo {
            if let Some(url) = self.git_remote_url() {
                info.repo_url.get_or_insert(url);
            }
        }

        // README first paragraph as a last-resort description
        if info.description.is_none() {
            info.description = self.readme_description(&info);
        }

        info!(
            "Analyzed {}: {} files, {} directories, languages: {}",
            info.project_name,
            info.files.len(),
            info.directories.len(),
            info.languages.join(", ")
        );

        Ok(info)
    }

    /// Project name from the repository directory (canonicalized so "." works)
    fn detect_project_name(&self) -> String {
        let canonical = self
            .repo_path
            .canonicalize()
            .unwrap_or_else(|_| self.repo_path.clone());
        canonical
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .unwrap_or("unknown")
            .to_string()
    }

    /// Walk the repository (gitignore-aware), recording relative file and
    /// directory paths.
    fn walk_files(&self, info: &mut RepoInfo) -> Result<()> {
        let walker = WalkBuilder::new(&self.repo_path)
            .hidden(false) // dotfiles like .eslintrc matter for analysis
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !matches!(
                    name.as_ref(),
                    ".git" | "node_modules" | "__pycache__" | "target" | ".tox" | "venv" | ".venv"
                )
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let rel = match entry.path().strip_prefix(&self.repo_path) {
                Ok(rel) if !rel.as_os_str().is_empty() => rel,
                _ => continue, // the root itself
            };
            let rel_str = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            match entry.file_type() {
                Some(ft) if ft.is_dir() => info.directories.push(rel_str),
                Some(ft) if ft.is_file() => info.files.push(rel_str),
                _ => {}
            }
        }

        info.files.sort();
        info.directories.sort();
        Ok(())
    }

    fn detect_key_files(&self, info: &mut RepoInfo) {
        let find_first = |candidates: &[&str]| -> Option<String> {
            candidates
                .iter()
                .find(|name| self.repo_path.join(name).is_file())
                .map(|name| name.to_string())
        };

        info.key_files.readme =
            find_first(&["README.md", "README.rst", "README.txt", "README"]);
        info.key_files.contributing =
            find_first(&["CONTRIBUTING.md", "CONTRIBUTING.rst", "CONTRIBUTING"]);
        info.key_files.license = find_first(&["LICENSE", "LICENSE.md", "LICENSE.txt"]);
        info.key_files.changelog =
            find_first(&["CHANGELOG.md", "CHANGELOG.rst", "CHANGELOG", "HISTORY.md"]);
    }

    fn categorize_directories(&self, info: &mut RepoInfo) {
        for dir in &info.directories {
            // Only categorize top-level directories
            if dir.contains('/') {
                continue;
            }
            let lower = dir.to_lowercase();
            if SRC_DIR_NAMES.contains(&lower.as_str()) {
                info.src_dirs.push(dir.clone());
            } else if DOC_DIR_NAMES.contains(&lower.as_str()) {
                info.doc_dirs.push(dir.clone());
            } else if TEST_DIR_NAMES.contains(&lower.as_str()) {
                info.test_dirs.push(dir.clone());
            }
        }
    }

    fn detect_languages(&self, info: &mut RepoInfo) {
        let known: [(&str, &[&str]); 10] = [
            ("Python", &["py"]),
            ("JavaScript", &["js", "jsx"]),
            ("TypeScript", &["ts", "tsx"]),
            ("Rust", &["rs"]),
            ("Go", &["go"]),
            ("Java", &["java"]),
            ("C", &["c", "h"]),
            ("C++", &["cpp", "cc", "hpp"]),
            ("Ruby", &["rb"]),
            ("Shell", &["sh", "bash"]),
        ];

        for (language, extensions) in known {
            let present = info.files.iter().any(|f| {
                Path::new(f)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| extensions.contains(&e))
                    .unwrap_or(false)
            });
            if present {
                info.languages.push(language.to_string());
            }
        }
    }

    /// Pull name/description/repository from package manifests, first match
    /// wins per field. Order: package.json, pyproject.toml, setup.py, Cargo.toml.
    fn extract_metadata(&self, info: &mut RepoInfo) {
        if let Some((name, description, url)) = self.from_package_json() {
            if let Some(name) = name {
                info.project_name = name;
            }
            info.description = info.description.take().or(description);
            info.repo_url = info.repo_url.take().or(url);
        }
        if let Some((name, description)) = self.from_pyproject() {
            if info.description.is_none() {
                if let Some(name) = name {
                    info.project_name = name;
                }
                info.description = description;
            }
        }
        if info.description.is_none() {
            if let Some((name, description)) = self.from_setup_py() {
                if let Some(name) = name {
                    info.project_name = name;
                }
                info.description = description;
            }
        }
        if let Some((name, description, url)) = self.from_cargo_toml() {
            if info.description.is_none() {
                if let Some(name) = name {
                    info.project_name = name;
                }
                info.description = description;
            }
            info.repo_url = info.repo_url.take().or(url);
        }
    }

    fn from_package_json(&self) -> Option<(Option<String>, Option<String>, Option<String>)> {
        let content = fs::read_to_string(self.repo_path.join("package.json")).ok()?;
        let json: serde_json::Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                warn!("Error parsing package.json: {}", e);
                return None;
            }
        };
        let name = json["name"].as_str().map(str::to_string);
        let description = json["description"].as_str().map(str::to_string);
        // "repository" can be a plain string or an object with a "url" field
        let url = json["repository"]
            .as_str()
            .or_else(|| json["repository"]["url"].as_str())
            .map(str::to_string);
        Some((name, description, url))
    }

    fn from_pyproject(&self) -> Option<(Option<String>, Option<String>)> {
        let content = fs::read_to_string(self.repo_path.join("pyproject.toml")).ok()?;
        let value: toml::Value = match content.parse() {
            Ok(v) => v,
            Err(e) => {
                warn!("Error parsing pyproject.toml: {}", e);
                return None;
            }
        };
        let project = value.get("project")?;
        let name = project
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let description = project
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Some((name, description))
    }

    fn from_setup_py(&self) -> Option<(Option<String>, Option<String>)> {
        // Anchored to line starts so long_description and friends don't match
        static NAME_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"(?m)^\s*name\s*=\s*["']([^"']+)["']"#).unwrap());
        static DESC_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"(?m)^\s*description\s*=\s*["']([^"']+)["']"#).unwrap());

        let content = fs::read_to_string(self.repo_path.join("setup.py")).ok()?;
        let name = NAME_RE.captures(&content).map(|c| c[1].to_string());
        let description = DESC_RE.captures(&content).map(|c| c[1].to_string());
        Some((name, description))
    }

    fn from_cargo_toml(&self) -> Option<(Option<String>, Option<String>, Option<String>)> {
        let content = fs::read_to_string(self.repo_path.join("Cargo.toml")).ok()?;
        let value: toml::Value = match content.parse() {
            Ok(v) => v,
            Err(e) => {
                warn!("Error parsing Cargo.toml: {}", e);
                return None;
            }
        };
        let package = value.get("package")?;
        let field = |key: &str| {
            package
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        Some((field("name"), field("description"), field("repository")))
    }

    /// Origin remote URL, via the git CLI (absent remote or git binary is fine)
    fn git_remote_url(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["-C"])
            .arg(&self.repo_path)
            .args(["remote", "get-url", "origin"])
            .output()
            .ok()?;
        if !output.status.success() {
            debug!("No origin remote found");
            return None;
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!url.is_empty()).then_some(url)
    }

    /// First plain-text paragraph of the README (skipping headings and badges)
    fn readme_description(&self, info: &RepoInfo) -> Option<String> {
        let readme = info.key_files.readme.as_ref()?;
        let content = fs::read_to_string(self.repo_path.join(readme)).ok()?;
        let (_, body) = crate::util::extract_frontmatter(&content);

        for line in body.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with("[![")
                || trimmed.starts_with("![")
                || trimmed.starts_with('-')
                || trimmed.starts_with('>')
            {
                continue;
            }
            return Some(trimmed.to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture_repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::create_dir_all(tmp.path().join("tests")).unwrap();
        fs::write(
            tmp.path().join("README.md"),
            "# Test Project\n\nThis is a test project.\n",
        )
        .unwrap();
        fs::write(tmp.path().join("src/main.py"), "# Test Python file\n").unwrap();
        tmp
    }

    #[test]
    fn test_new_rejects_missing_path() {
        let result = RepoAnalyzer::new(Path::new("/nonexistent/repo/xyz"));
        assert!(result.is_err());
    }

    #[test]
    fn test_not_a_git_repo() {
        let tmp = fixture_repo();
        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        assert!(!analyzer.is_git_repo());
    }

    #[test]
    fn test_analyze_basics() {
        let tmp = fixture_repo();
        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();

        let expected_name = tmp
            .path()
            .canonicalize()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert_eq!(info.project_name, expected_name);

        assert!(info.directories.contains(&"src".to_string()));
        assert!(info.directories.contains(&"docs".to_string()));
        assert!(info.directories.contains(&"tests".to_string()));

        assert!(info.files.contains(&"README.md".to_string()));
        assert!(info.files.contains(&"src/main.py".to_string()));

        assert_eq!(info.key_files.readme.as_deref(), Some("README.md"));

        assert!(info.src_dirs.contains(&"src".to_string()));
        assert!(info.doc_dirs.contains(&"docs".to_string()));
        assert!(info.test_dirs.contains(&"tests".to_string()));

        assert!(info.languages.contains(&"Python".to_string()));
    }

    #[test]
    fn test_readme_description_fallback() {
        let tmp = fixture_repo();
        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();
        assert_eq!(info.description.as_deref(), Some("This is a test project."));
    }

    #[test]
    fn test_package_json_metadata_wins() {
        let tmp = fixture_repo();
        fs::write(
            tmp.path().join("package.json"),
            r#"{"name": "test-project", "description": "Test description",
                "repository": {"url": "https://github.com/example/test-project"}}"#,
        )
        .unwrap();

        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();
        assert_eq!(info.project_name, "test-project");
        assert_eq!(info.description.as_deref(), Some("Test description"));
        assert_eq!(
            info.repo_url.as_deref(),
            Some("https://github.com/example/test-project")
        );
        assert!(!info.languages.contains(&"JavaScript".to_string()));
    }

    #[test]
    fn test_setup_py_metadata() {
        let tmp = fixture_repo();
        fs::write(
            tmp.path().join("setup.py"),
            "from setuptools import setup\nsetup(\n    name=\"my-pkg\",\n    description=\"A Python package\",\n)\n",
        )
        .unwrap();

        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();
        assert_eq!(info.project_name, "my-pkg");
        assert_eq!(info.description.as_deref(), Some("A Python package"));
    }

    #[test]
    fn test_cargo_toml_metadata() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("Cargo.toml"),
            "[package]\nname = \"my-crate\"\ndescription = \"A Rust crate\"\nrepository = \"https://github.com/example/my-crate\"\n",
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/lib.rs"), "pub fn f() {}\n").unwrap();

        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();
        assert_eq!(info.project_name, "my-crate");
        assert_eq!(info.description.as_deref(), Some("A Rust crate"));
        assert_eq!(
            info.repo_url.as_deref(),
            Some("https://github.com/example/my-crate")
        );
        assert!(info.languages.contains(&"Rust".to_string()));
    }

    #[test]
    fn test_skips_node_modules_and_git() {
        let tmp = fixture_repo();
        fs::create_dir_all(tmp.path().join("node_modules/dep")).unwrap();
        fs::write(tmp.path().join("node_modules/dep/index.js"), "x").unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git/config"), "x").unwrap();

        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();
        assert!(!info.files.iter().any(|f| f.starts_with("node_modules")));
        assert!(!info.files.iter().any(|f| f.starts_with(".git/")));
    }

    #[test]
    fn test_has_file_helpers() {
        let tmp = fixture_repo();
        fs::write(tmp.path().join("requirements.txt"), "requests\n").unwrap();
        let analyzer = RepoAnalyzer::new(tmp.path()).unwrap();
        let info = analyzer.analyze().unwrap();
        assert!(info.has_file("requirements.txt"));
        assert!(!info.has_file("package.json"));
        assert!(info.has_any_file(&["setup.py", "requirements.txt"]));
    }
}
