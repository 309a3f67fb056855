//! API reference page generator.
//!
//! Prefers API documentation the project already ships; otherwise derives a
//! lightweight reference by scanning source files for public types and
//! functions.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{extract_section, strip_frontmatter, SectionGenerator};
use crate::analyzer::RepoInfo;

/// Cap on files listed per source directory
const MAX_FILES_PER_DIR: usize = 10;

const API_DOC_NAMES: [&str; 4] = ["api.md", "api-reference.md", "api-docs.md", "reference.md"];

const SOURCE_EXTENSIONS: [&str; 6] = ["py", "js", "ts", "jsx", "tsx", "rs"];

/// A named item extracted from source, with an optional one-line description
type CodeElement = (String, String);

pub struct ApiGenerator {
    repo_path: PathBuf,
}

impl ApiGenerator {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    /// Look for existing API documentation in the repository
    fn find_api_documentation(&self, info: &RepoInfo) -> Option<String> {
        for doc_dir in &info.doc_dirs {
            let dir_path = self.repo_path.join(doc_dir);
            let entries = match fs::read_dir(&dir_path) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_lowercase();
                if API_DOC_NAMES.contains(&name.as_str()) {
                    match fs::read_to_string(entry.path()) {
                        Ok(content) => return Some(strip_frontmatter(&content)),
                        Err(e) => warn!("Error reading API documentation: {}", e),
                    }
                }
            }
        }

        // Check for an API section in the README
        let readme = info.key_files.readme.as_ref()?;
        let content = fs::read_to_string(self.repo_path.join(readme)).ok()?;
        extract_section(&content, "API")
    }

    /// Generate API documentation from source files
    fn generate_from_source(&self, info: &RepoInfo) -> String {
        let mut content = Vec::new();

        for src_dir in &info.src_dirs {
            let dir_path = self.repo_path.join(src_dir);
            if !dir_path.is_dir() {
                continue;
            }

            let mut source_files = Vec::new();
            collect_source_files(&dir_path, &mut source_files);
            if source_files.is_empty() {
                continue;
            }
            source_files.sort();

            content.push(format!("\n## {} Module\n", capitalize(src_dir)));

            for file_path in source_files.iter().take(MAX_FILES_PER_DIR) {
                let file_name = file_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let rel = file_path
                    .strip_prefix(&self.repo_path)
                    .unwrap_or(file_path)
                    .to_string_lossy()
                    .replace('\\', "/");

                content.push(format!("\n### {}\n", file_name));
                content.push(format!("Path: `{}`\n", rel));

                let (types, functions) = extract_code_elements(file_path);

                if !types.is_empty() {
                    content.push("**Types:**\n".to_string());
                    for (name, desc) in &types {
                        if desc.is_empty() {
                            content.push(format!("- `{}`", name));
                        } else {
                            content.push(format!("- `{}`: {}", name, desc));
                        }
                    }
                }

                if !functions.is_empty() {
                    content.push("\n**Functions:**\n".to_string());
                    for (name, desc) in &functions {
                        if desc.is_empty() {
                            content.push(format!("- `{}()`", name));
                        } else {
                            content.push(format!("- `{}()`: {}", name, desc));
                        }
                    }
                }
            }

            if source_files.len() > MAX_FILES_PER_DIR {
                content.push(format!(
                    "\n*...and {} more files*\n",
                    source_files.len() - MAX_FILES_PER_DIR
                ));
            }
        }

        content.join("\n")
    }
}

impl SectionGenerator for ApiGenerator {
    fn id(&self) -> &'static str {
        "api"
    }

    fn title(&self) -> &'static str {
        "API Reference"
    }

    fn generate(&self, info: &RepoInfo) -> Result<Option<String>> {
        let mut content = Vec::new();
        content.push("# API Reference\n".to_string());
        content.push("This page provides documentation for the API of this project.\n".to_string());

        if let Some(api_docs) = self.find_api_documentation(info) {
            content.push(api_docs);
            return Ok(Some(content.join("\n")));
        }

        let from_source = self.generate_from_source(info);
        if !from_source.trim().is_empty() {
            content.push(from_source);
        } else {
            content.push("\n*No API documentation is available at this time.*\n".to_string());
            content.push("\nConsider adding API documentation to your project by:\n".to_string());
            content.push("- Adding a dedicated API.md file in your docs directory".to_string());
            content.push("- Using doc comments in your code".to_string());
            content.push(
                "- Implementing API documentation tools like Swagger, JSDoc, or Sphinx".to_string(),
            );
        }

        Ok(Some(content.join("\n")))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn collect_source_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !matches!(
                    name,
                    "node_modules" | "__pycache__" | ".git" | "target" | "venv" | ".venv"
                ) {
                    collect_source_files(&path, files);
                }
            }
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if SOURCE_EXTENSIONS.contains(&ext) {
                files.push(path);
            }
        }
    }
}

/// Extract (types, functions) from a source file, dispatching on extension
fn extract_code_elements(path: &Path) -> (Vec<CodeElement>, Vec<CodeElement>) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            return (Vec::new(), Vec::new());
        }
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("py") => extract_python_elements(&content),
        Some("js") | Some("ts") | Some("jsx") | Some("tsx") => {
            extract_javascript_elements(&content)
        }
        Some("rs") => extract_rust_elements(&content),
        _ => (Vec::new(), Vec::new()),
    }
}

fn extract_python_elements(content: &str) -> (Vec<CodeElement>, Vec<CodeElement>) {
    static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?s)class\s+(\w+)(?:\([^)]*\))?:\s*(?:"""(.*?)""")?"#).unwrap()
    });
    static FUNC_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?sm)^def\s+(\w+)\s*\([^)]*\)(?:\s*->\s*[^:]+)?:\s*(?:"""(.*?)""")?"#)
            .unwrap()
    });

    let mut classes = Vec::new();
    for caps in CLASS_RE.captures_iter(content) {
        let name = caps[1].to_string();
        let desc = caps
            .get(2)
            .map(|m| first_line(m.as_str()))
            .unwrap_or_default();
        classes.push((name, desc));
    }

    let mut functions = Vec::new();
    for caps in FUNC_RE.captures_iter(content) {
        let name = caps[1].to_string();
        if name.starts_with('_') {
            continue; // private
        }
        let desc = caps
            .get(2)
            .map(|m| first_line(m.as_str()))
            .unwrap_or_default();
        functions.push((name, desc));
    }

    (classes, functions)
}

fn extract_javascript_elements(content: &str) -> (Vec<CodeElement>, Vec<CodeElement>) {
    static CLASS_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"class\s+(\w+)(?:\s+extends\s+[\w.]+)?\s*\{").unwrap());
    static FUNC_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
        vec![
            Regex::new(r"function\s+(\w+)\s*\(").unwrap(),
            Regex::new(r"const\s+(\w+)\s*=\s*(?:async\s*)?\([^)]*\)\s*=>").unwrap(),
        ]
    });

    let mut classes = Vec::new();
    for caps in CLASS_RE.captures_iter(content) {
        classes.push((caps[1].to_string(), String::new()));
    }

    let mut functions = Vec::new();
    for re in FUNC_RES.iter() {
        for caps in re.captures_iter(content) {
            let name = caps[1].to_string();
            if !name.starts_with('_') && !functions.iter().any(|(n, _)| *n == name) {
                functions.push((name, String::new()));
            }
        }
    }

    (classes, functions)
}

fn extract_rust_elements(content: &str) -> (Vec<CodeElement>, Vec<CodeElement>) {
    static TYPE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?m)^\s*pub\s+(?:struct|enum|trait)\s+(\w+)").unwrap());
    static FUNC_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?m)^\s*pub\s+(?:async\s+)?fn\s+(\w+)").unwrap());

    let types = TYPE_RE
        .captures_iter(content)
        .map(|caps| (caps[1].to_string(), doc_comment_before(content, &caps)))
        .collect();
    let functions = FUNC_RE
        .captures_iter(content)
        .map(|caps| (caps[1].to_string(), doc_comment_before(content, &caps)))
        .collect();

    (types, functions)
}

/// First `///` doc line immediately above a captured item
fn doc_comment_before(content: &str, caps: &regex::Captures) -> String {
    let start = match caps.get(0) {
        Some(m) => m.start(),
        None => return String::new(),
    };
    let mut doc_lines: Vec<&str> = Vec::new();
    for line in content[..start].lines().rev() {
        let trimmed = line.trim();
        if let Some(doc) = trimmed.strip_prefix("///") {
            doc_lines.push(doc.trim());
        } else if trimmed.is_empty() || trimmed.starts_with("#[") {
            continue;
        } else {
            break;
        }
    }
    doc_lines.last().map(|s| s.to_string()).unwrap_or_default()
}

fn first_line(s: &str) -> String {
    s.trim().lines().next().unwrap_or("").trim().to_string()
}
