//! Shared utilities: secret masking, external commands, frontmatter handling.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{error, info, warn};

/// A string wrapper that masks its contents in Debug/Display output.
/// Prevents accidental logging of API keys and other secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Intentionally access the raw secret value (for headers, URLs, etc.)
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for SecretString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Run an external command in `cwd`, streaming its stdout to the log line by line.
/// Returns an error if the command cannot be spawned or exits nonzero.
pub fn run_command(cmd: &[&str], cwd: &Path) -> Result<()> {
    let (program, args) = cmd
        .split_first()
        .context("run_command called with empty command")?;

    info!("Running command: {}", cmd.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn `{}` (is it installed?)", program))?;

    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) => info!("{}", line.trim_end()),
                Err(e) => {
                    warn!("Error reading command output: {}", e);
                    break;
                }
            }
        }
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("Failed to wait for `{}`", program))?;

    if !output.status.success() {
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            error!("{}", line.trim_end());
        }
        bail!(
            "Command `{}` failed with status {}",
            cmd.join(" "),
            output.status
        );
    }

    Ok(())
}

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---\r?\n").unwrap());

/// Split markdown content into its YAML frontmatter fields and the body.
/// Returns an empty map and the full content when no frontmatter is present
/// or it fails to parse.
pub fn extract_frontmatter(content: &str) -> (BTreeMap<String, String>, &str) {
    if let Some(caps) = FRONTMATTER_RE.captures(content) {
        let yaml = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        match serde_yaml::from_str::<BTreeMap<String, serde_yaml::Value>>(yaml) {
            Ok(map) => {
                let fields = map
                    .into_iter()
                    .filter_map(|(k, v)| yaml_scalar(&v).map(|s| (k, s)))
                    .collect();
                let body = &content[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
                return (fields, body);
            }
            Err(e) => warn!("Error parsing frontmatter: {}", e),
        }
    }
    (BTreeMap::new(), content)
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
