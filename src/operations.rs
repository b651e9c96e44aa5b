//! Operations config and shell command execution.
//!
//! An operations file maps each category to a shell command template. The `{}`
//! placeholder in a template is replaced with the path being processed.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use indexmap::IndexMap;
use tracing::info;

use crate::error::{Error, Result};

/// Placeholder replaced by the path in command templates.
pub const PATH_PLACEHOLDER: &str = "{}";

/// At least two categories are needed for categorizing to mean anything.
pub const MIN_CATEGORIES: usize = 2;

/// Category -> command template, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationsConfig {
    commands: IndexMap<String, String>,
}

impl OperationsConfig {
    /// Build and validate an operations config.
    pub fn new(commands: IndexMap<String, String>) -> Result<Self> {
        info!("validating operations config");
        if commands.len() < MIN_CATEGORIES {
            return Err(Error::InvalidOperations(format!(
                "Operations config, expected minimum \"{}\" keys in the config",
                MIN_CATEGORIES
            )));
        }
        for (category, command) in &commands {
            if !command.contains(PATH_PLACEHOLDER) {
                return Err(Error::InvalidOperations(format!(
                    "Operations config - category \"{}\" expected templated command with \"{}\" got \"{}\"",
                    category, PATH_PLACEHOLDER, command
                )));
            }
        }
        Ok(Self { commands })
    }

    /// Category names in file order.
    pub fn categories(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    pub fn template(&self, category: &str) -> Option<&str> {
        self.commands.get(category).map(String::as_str)
    }

    /// Render the command for `path` in `category`.
    pub fn render(&self, category: &str, path: &Path) -> Option<String> {
        self.template(category)
            .map(|t| t.replace(PATH_PLACEHOLDER, &path.to_string_lossy()))
    }

    /// Check that this config covers exactly `expected` categories.
    pub fn ensure_categories(&self, source: &Path, expected: &[String]) -> Result<()> {
        let missing: Vec<&String> = expected
            .iter()
            .filter(|c| !self.commands.contains_key(c.as_str()))
            .collect();
        let redundant: Vec<&String> = self
            .commands
            .keys()
            .filter(|c| !expected.contains(*c))
            .collect();
        if missing.is_empty() && redundant.is_empty() {
            return Ok(());
        }

        let mut lines = vec![format!("Invalid operations config - \"{}\"", source.display())];
        if !missing.is_empty() {
            lines.push("Missing categories".to_string());
            lines.extend(missing.iter().map(|c| format!("* {}", c)));
        }
        if !redundant.is_empty() {
            lines.push("Redundant categories".to_string());
            lines.extend(redundant.iter().map(|c| format!("* {}", c)));
        }
        Err(Error::InvalidOperations(lines.join("\n")))
    }
}

/// Parse an operations document.
pub fn parse_operations(source: &Path, data: &str) -> Result<OperationsConfig> {
    let commands: Option<IndexMap<String, String>> =
        serde_yaml::from_str(data).map_err(|e| Error::Yaml {
            path: source.to_path_buf(),
            source: e,
        })?;
    OperationsConfig::new(commands.unwrap_or_default())
}

/// Load an operations file, optionally checking it against the config categories.
pub fn load_operations(path: &Path, expected: Option<&[String]>) -> Result<OperationsConfig> {
    info!(path = %path.display(), "loading operations config");
    if !path.exists() {
        return Err(Error::InvalidOperations(format!(
            "Operations config \"{}\" does not exist",
            path.display()
        )));
    }
    let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let operations = parse_operations(path, &data)?;
    if let Some(expected) = expected {
        operations.ensure_categories(path, expected)?;
    }
    Ok(operations)
}

/// Run `command` through `sh -c`.
///
/// With `capture` the standard output is collected and returned, otherwise it is
/// inherited. With `check` a non-zero exit status is an error.
pub fn run_command(command: &str, capture: bool, check: bool) -> Result<(i32, Option<String>)> {
    info!(
        command,
        on_failure = if check { "exit" } else { "continue" },
        "running command"
    );
    let mut process = Command::new("sh");
    process.arg("-c").arg(command);
    if capture {
        process.stdout(Stdio::piped());
    }
    let output = process
        .output()
        .map_err(|e| Error::io(Path::new("sh"), e))?;

    let code = output.status.code().unwrap_or(-1);
    if check && !output.status.success() {
        return Err(Error::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
        });
    }
    let stdout = capture.then(|| String::from_utf8_lossy(&output.stdout).into_owned());
    Ok((code, stdout))
}
