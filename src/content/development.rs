//! Development guide generator.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{extract_section, strip_frontmatter, SectionGenerator};
use crate::analyzer::RepoInfo;

const DEV_DOC_NAMES: [&str; 4] = [
    "development.md",
    "developers.md",
    "dev-guide.md",
    "hacking.md",
];

pub struct DevelopmentGenerator {
    repo_path: PathBuf,
}

impl DevelopmentGenerator {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    /// Look for a development guide the project already wrote
    fn existing_guide(&self, info: &RepoInfo) -> Option<String> {
        for doc_dir in &info.doc_dirs {
            let dir_path = self.repo_path.join(doc_dir);
            let entries = match fs::read_dir(&dir_path) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_lowercase();
                if DEV_DOC_NAMES.contains(&name.as_str()) {
                    match fs::read_to_string(entry.path()) {
                        Ok(content) => return Some(strip_frontmatter(&content)),
                        Err(e) => warn!("Error reading development documentation: {}", e),
                    }
                }
            }
        }

        let readme = info.key_files.readme.as_ref()?;
        let content = fs::read_to_string(self.repo_path.join(readme)).ok()?;
        for name in ["Development", "Developing", "For Developers", "Hacking"] {
            if let Some(section) = extract_section(&content, name) {
                return Some(section);
            }
        }
        None
    }

    fn add_project_structure(&self, content: &mut Vec<String>, info: &RepoInfo) {
        content.push("\n## Project Structure\n".to_string());
        content
            .push("Below is an overview of the key directories and files in this project:\n".to_string());
        content.push("```".to_string());

        for dir_path in &info.directories {
            // Top-level directories, plus key subdirectories
            let top_level = !dir_path.contains('/');
            let key_subdir = dir_path
                .split('/')
                .next()
                .map(|root| matches!(root, "src" | "docs" | "tests" | "examples"))
                .unwrap_or(false);
            if top_level || key_subdir {
                content.push(format!("{}/", dir_path));
            }
        }

        let mut key_files: Vec<&String> = info
            .files
            .iter()
            .filter(|f| {
                !f.contains('/')
                    && (f.starts_with('.') || f.starts_with("README") || f.starts_with("LICENSE"))
            })
            .collect();
        key_files.sort();
        for file in key_files {
            content.push(file.clone());
        }

        content.push("```\n".to_string());

        if !info.src_dirs.is_empty() {
            content.push("### Source Code\n".to_string());
            for dir in &info.src_dirs {
                content.push(format!("- `{}/`: Contains the main source code", dir));
            }
        }

        if !info.test_dirs.is_empty() {
            content.push("\n### Tests\n".to_string());
            for dir in &info.test_dirs {
                content.push(format!("- `{}/`: Contains tests for the project", dir));
            }
        }
    }

    fn add_development_workflow(&self, content: &mut Vec<String>, info: &RepoInfo) {
        content.push("\n## Development Workflow\n".to_string());

        content.push("### Setup Development Environment\n".to_string());
        content.push("To set up your development environment, follow these steps:\n".to_string());
        content.push("```bash".to_string());
        content.push("# Clone the repository".to_string());
        content.push(format!(
            "git clone {}",
            info.repo_url.as_deref().unwrap_or("[REPO_URL]")
        ));
        content.push(format!("cd {}", info.project_name));
        content.push(String::new());

        if info.has_file("package.json") {
            content.push("# Install dependencies".to_string());
            content.push("npm install".to_string());
        } else if info.has_file("requirements.txt") {
            content.push("# Create a virtual environment".to_string());
            content.push("python -m venv venv".to_string());
            content
                .push("source venv/bin/activate  # On Windows: venv\\Scripts\\activate".to_string());
            content.push(String::new());
            content.push("# Install dependencies".to_string());
            content.push("pip install -r requirements.txt".to_string());
        } else if info.has_any_file(&["setup.py", "pyproject.toml"]) {
            content.push("# Create a virtual environment".to_string());
            content.push("python -m venv venv".to_string());
            content
                .push("source venv/bin/activate  # On Windows: venv\\Scripts\\activate".to_string());
            content.push(String::new());
            content.push("# Install in development mode".to_string());
            content.push("pip install -e .".to_string());
        } else if info.has_file("Cargo.toml") {
            content.push("# Build the project".to_string());
            content.push("cargo build".to_string());
        }

        content.push("```\n".to_string());

        content.push("### Making Changes\n".to_string());
        content.push("1. Create a new branch for your feature or bugfix".to_string());
        content.push("2. Make your changes".to_string());
        content.push("3. Write or update tests".to_string());
        content.push("4. Run the tests to ensure they pass".to_string());
        content.push("5. Submit a pull request\n".to_string());

        content.push("```bash".to_string());
        content.push("# Create a new branch".to_string());
        content.push("git checkout -b feature/your-feature-name".to_string());
        content.push(String::new());
        content.push("# Commit your changes".to_string());
        content.push("git add .".to_string());
        content.push("git commit -m \"Add your feature\"".to_string());
        content.push(String::new());
        content.push("# Push your changes".to_string());
        content.push("git push origin feature/your-feature-name".to_string());
        content.push("```\n".to_string());
    }

    fn add_testing_info(&self, content: &mut Vec<String>, info: &RepoInfo) {
        content.push("\n## Testing\n".to_string());

        if info.test_dirs.is_empty() && !info.has_file("Cargo.toml") {
            content.push("*No testing information available.*".to_string());
            return;
        }

        content.push(
            "This project includes tests to ensure code quality and functionality. \
             Here's how to run them:\n"
                .to_string(),
        );

        if info.has_file("package.json") {
            content.push("```bash".to_string());
            content.push("npm test".to_string());
            content.push("```\n".to_string());
            self.add_npm_test_scripts(content);
        } else if info.languages.iter().any(|l| l == "Python") {
            content.push("```bash".to_string());
            content.push("# Run tests with pytest".to_string());
            content.push("pytest".to_string());
            content.push("```\n".to_string());
            content.push("For more detailed test output:\n".to_string());
            content.push("```bash".to_string());
            content.push("pytest -v".to_string());
            content.push("```\n".to_string());
        } else if info.has_file("Cargo.toml") {
            content.push("```bash".to_string());
            content.push("cargo test".to_string());
            content.push("```\n".to_string());
        } else {
            content.push(
                "Refer to the test directory documentation for instructions on running tests."
                    .to_string(),
            );
        }
    }

    /// List extra test scripts advertised by package.json
    fn add_npm_test_scripts(&self, content: &mut Vec<String>) {
        let package_json = self.repo_path.join("package.json");
        let data = match fs::read_to_string(&package_json)
            .ok()
            .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok())
        {
            Some(data) => data,
            None => return,
        };

        if let Some(scripts) = data["scripts"].as_object() {
            let extra: Vec<&String> = scripts
                .keys()
                .filter(|k| k.contains("test") && *k != "test")
                .collect();
            if !extra.is_empty() {
                content.push("Additional test commands available:\n".to_string());
                for script in extra {
                    content.push(format!("```bash\nnpm run {}\n```\n", script));
                }
            }
        }
    }

    fn add_coding_standards(&self, content: &mut Vec<String>, info: &RepoInfo) {
        content.push("\n## Coding Standards\n".to_string());

        let has_eslint =
            info.has_any_file(&[".eslintrc", ".eslintrc.js", ".eslintrc.json", ".eslintrc.yml"]);
        let has_prettier =
            info.has_any_file(&[".prettierrc", ".prettierrc.js", ".prettierrc.json"]);
        let has_flake8 = info.has_any_file(&[".flake8", "setup.cfg"]);
        let has_black = info.has_file("pyproject.toml");
        let has_rustfmt = info.has_file("Cargo.toml");

        if !(has_eslint || has_prettier || has_flake8 || has_black || has_rustfmt) {
            content.push(
                "Refer to the repository's contribution guidelines for information on \
                 coding standards and style."
                    .to_string(),
            );
            return;
        }

        content.push(
            "This project maintains consistent coding standards using the following tools:\n"
                .to_string(),
        );

        if has_eslint {
            content.push("### ESLint\n".to_string());
            content.push("```bash\nnpm run lint\n```\n".to_string());
        }
        if has_prettier {
            content.push("### Prettier\n".to_string());
            content.push("```bash\nnpm run format\n```\n".to_string());
        }
        if has_flake8 {
            content.push("### Flake8\n".to_string());
            content.push("```bash\nflake8\n```\n".to_string());
        }
        if has_black {
            content.push("### Black\n".to_string());
            content.push("```bash\nblack .\n```\n".to_string());
        }
        if has_rustfmt {
            content.push("### rustfmt and clippy\n".to_string());
            content.push("```bash\ncargo fmt\ncargo clippy\n```\n".to_string());
        }
    }
}

impl SectionGenerator for DevelopmentGenerator {
    fn id(&self) -> &'static str {
        "development"
    }

    fn title(&self) -> &'static str {
        "Development"
    }

    fn generate(&self, info: &RepoInfo) -> Result<Option<String>> {
        let mut content = Vec::new();
        content.push("# Development\n".to_string());
        content
            .push("This page provides information for developers working on this project.\n".to_string());

        if let Some(existing) = self.existing_guide(info) {
            content.push(existing);
            return Ok(Some(content.join("\n")));
        }

        self.add_project_structure(&mut content, info);
        self.add_development_workflow(&mut content, info);
        self.add_testing_info(&mut content, info);
        self.add_coding_standards(&mut content, info);

        Ok(Some(content.join("\n")))
    }
}
