// Documentation section generators.
//
// Each generator prefers material already present in the target repository
// (dedicated doc files, README sections) and falls back to content derived
// from the repository structure.

pub mod api;
pub mod contributing;
pub mod development;
pub mod installation;
pub mod overview;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::analyzer::RepoInfo;

pub trait SectionGenerator {
    /// Docusaurus doc id (also the output file stem)
    fn id(&self) -> &'static str;

    /// Frontmatter / sidebar title
    fn title(&self) -> &'static str;

    /// Generate the markdown body, or None when there is nothing worth writing
    fn generate(&self, info: &RepoInfo) -> Result<Option<String>>;
}

/// Look up the generator for a configured section id.
pub fn generator_for(section: &str, repo_path: &Path) -> Option<Box<dyn SectionGenerator>> {
    match section {
        "overview" => Some(Box::new(overview::OverviewGenerator::new(repo_path))),
        "installation" => Some(Box::new(installation::InstallationGenerator::new(repo_path))),
        "api" => Some(Box::new(api::ApiGenerator::new(repo_path))),
        "development" => Some(Box::new(development::DevelopmentGenerator::new(repo_path))),
        "contributing" => Some(Box::new(contributing::ContributingGenerator::new(repo_path))),
        _ => None,
    }
}

/// Sidebar title for a section id
pub fn section_title(id: &str) -> &'static str {
    match id {
        "index" => "Home",
        "overview" => "Overview",
        "installation" => "Installation",
        "api" => "API Reference",
        "development" => "Development",
        "contributing" => "Contributing",
        _ => "Documentation",
    }
}

static FRONTMATTER_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\r?\n.*?\r?\n---\r?\n").unwrap());

/// Drop a leading frontmatter block from existing documentation content
pub(crate) fn strip_frontmatter(content: &str) -> String {
    FRONTMATTER_BLOCK_RE.replace(content, "").to_string()
}

/// Extract a `##`/`###` markdown section by heading name (case-insensitive).
/// The section runs until the next heading of the same or a higher level.
pub(crate) fn extract_section(content: &str, section_name: &str) -> Option<String> {
    let heading_re = Regex::new(&format!(
        r"(?mi)^(\#{{2,3}})\s+{}\b.*$",
        regex::escape(section_name)
    ))
    .ok()?;

    let caps = heading_re.captures(content)?;
    let whole = caps.get(0)?;
    let level = caps.get(1)?.as_str().len();

    let mut section = String::new();
    for (i, line) in content[whole.start()..].lines().enumerate() {
        if i > 0 && heading_level(line).map(|l| l <= level).unwrap_or(false) {
            break;
        }
        section.push_str(line);
        section.push('\n');
    }

    let section = section.trim().to_string();
    (!section.is_empty()).then_some(section)
}

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    (hashes >= 1 && hashes <= 6 && line[hashes..].starts_with(' ')).then_some(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "\
# Project

Intro paragraph.

## Installation

Run the installer.

### From source

Build it yourself.

## Usage

Do things.
";

    #[test]
    fn test_extract_section_includes_subsections() {
        let section = extract_section(README, "Installation").unwrap();
        assert!(section.starts_with("## Installation"));
        assert!(section.contains("### From source"));
        assert!(!section.contains("## Usage"));
    }

    #[test]
    fn test_extract_section_case_insensitive() {
        assert!(extract_section(README, "installation").is_some());
    }

    #[test]
    fn test_extract_section_missing() {
        assert!(extract_section(README, "Deployment").is_none());
    }

    #[test]
    fn test_extract_section_runs_to_end_of_file() {
        let section = extract_section(README, "Usage").unwrap();
        assert_eq!(section, "## Usage\n\nDo things.");
    }

    #[test]
    fn test_strip_frontmatter() {
        let content = "---\nid: api\n---\n# API\n";
        assert_eq!(strip_frontmatter(content), "# API\n");
        assert_eq!(strip_frontmatter("# API\n"), "# API\n");
    }

    #[test]
    fn test_generator_for_known_sections() {
        let path = Path::new(".");
        for id in crate::config::ALL_SECTIONS {
            let generator = generator_for(id, path).unwrap();
            assert_eq!(generator.id(), id);
        }
        assert!(generator_for("changelog", path).is_none());
    }

    #[test]
    fn test_section_titles() {
        assert_eq!(section_title("api"), "API Reference");
        assert_eq!(section_title("index"), "Home");
        assert_eq!(section_title("mystery"), "Documentation");
    }
}
