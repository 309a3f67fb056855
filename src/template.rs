//! Retrieval of the SLIM docsite template into the output directory.

use anyhow::{bail, Context, Result};
use auth_git2::GitAuthenticator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Entries never copied out of a template checkout
const SKIP_ENTRIES: [&str; 2] = [".git", "node_modules"];

pub struct TemplateManager {
    template_repo: String,
    output_dir: PathBuf,
}

impl TemplateManager {
    pub fn new(template_repo: &str, output_dir: &Path) -> Self {
        Self {
            template_repo: template_repo.to_string(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Fetch the template into the output directory: clone when the template
    /// is a URL, copy when it is a local path. Refuses a non-empty output
    /// directory so an existing site is never clobbered.
    pub fn fetch(&self) -> Result<()> {
        if self.output_dir.exists() {
            let mut entries = fs::read_dir(&self.output_dir)
                .with_context(|| format!("Failed to read {}", self.output_dir.display()))?;
            if entries.next().is_some() {
                bail!(
                    "Output directory {} is not empty. Use --revise-site to update an \
                     existing site, or choose a fresh directory.",
                    self.output_dir.display()
                );
            }
        }
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let local = Path::new(&self.template_repo);
        if local.is_dir() {
            info!(
                "Copying local template from {} to {}",
                local.display(),
                self.output_dir.display()
            );
            copy_dir(local, &self.output_dir)?;
        } else {
            self.clone_template()?;
        }

        info!("Template ready at {}", self.output_dir.display());
        Ok(())
    }

    /// Clone the template repository into a staging directory, then copy its
    /// contents (minus `.git`) into the output directory.
    fn clone_template(&self) -> Result<()> {
        info!("Cloning template repository: {}", self.template_repo);

        let staging = tempfile::tempdir().context("Failed to create staging directory")?;
        let checkout = staging.path().join("template");

        let auth = GitAuthenticator::default();
        auth.clone_repo(&self.template_repo, &checkout)
            .with_context(|| format!("Failed to clone template {}", self.template_repo))?;

        copy_dir(&checkout, &self.output_dir)
    }
}

/// Recursively copy a directory tree, skipping `.git` and `node_modules`.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

    for entry in fs::read_dir(src).with_context(|| format!("Failed to read {}", src.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(name_str) = name.to_str() {
            if SKIP_ENTRIES.contains(&name_str) {
                debug!("Skipping {}", name_str);
                continue;
            }
        }

        let src_path = entry.path();
        let dst_path = dst.join(&name);
        if entry.file_type()?.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)
                .with_context(|| format!("Failed to copy {}", src_path.display()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture_template() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("docusaurus.config.js"), "module.exports = {};\n").unwrap();
        fs::write(tmp.path().join("package.json"), "{}\n").unwrap();
        fs::create_dir_all(tmp.path().join("src/pages")).unwrap();
        fs::write(tmp.path().join("src/pages/index.js"), "export default 1;\n").unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/react")).unwrap();
        fs::write(tmp.path().join("node_modules/react/index.js"), "x\n").unwrap();
        tmp
    }

    #[test]
    fn test_fetch_copies_local_template() {
        let template = fixture_template();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("site");

        let manager = TemplateManager::new(&template.path().to_string_lossy(), &dest);
        manager.fetch().unwrap();

        assert!(dest.join("docusaurus.config.js").exists());
        assert!(dest.join("src/pages/index.js").exists());
        assert!(!dest.join(".git").exists());
        assert!(!dest.join("node_modules").exists());
    }

    #[test]
    fn test_fetch_refuses_non_empty_output() {
        let template = fixture_template();
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("existing.txt"), "hello").unwrap();

        let manager = TemplateManager::new(&template.path().to_string_lossy(), out.path());
        let result = manager.fetch();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not empty"));
    }

    #[test]
    fn test_fetch_into_missing_directory_creates_it() {
        let template = fixture_template();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("nested/site");

        let manager = TemplateManager::new(&template.path().to_string_lossy(), &dest);
        manager.fetch().unwrap();
        assert!(dest.join("package.json").exists());
    }

    #[test]
    fn test_clone_of_bogus_url_fails() {
        let out = TempDir::new().unwrap();
        let dest = out.path().join("site");
        let manager = TemplateManager::new("file:///nonexistent/template-repo.git", &dest);
        assert!(manager.fetch().is_err());
    }
}
