//! Error types for ctgrzr commands.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the category store, the commands and the interactive walk.
#[derive(Debug, Error)]
pub enum Error {
    /// The process lacks permission to read or write a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// The prompt returned a selection that was never offered.
    #[error("Invalid action \"{0}\"")]
    InvalidAction(String),

    /// Strict add of a path that is already present in a category.
    #[error("Path \"{path}\" already present in category \"{category}\"")]
    ConfigMutationConflict { path: PathBuf, category: String },

    #[error("No category specified")]
    NoCategory,

    #[error("Path \"{path}\" does not exist")]
    NotFound { path: PathBuf },

    #[error("Path \"{path}\" should be regular file or directory")]
    NotFileOrDirectory { path: PathBuf },

    #[error("Path \"{path}\" cannot be a symlink, otherwise run with \"-s\" option")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Categories {} don't exist", .0.join(", "))]
    UnknownCategories(Vec<String>),

    #[error("Path \"{path}\" is not present in category \"{category}\"")]
    PathNotInCategory { path: PathBuf, category: String },

    /// A loaded category lists the same path more than once.
    #[error("Category \"{category}\" has duplicate paths: {}", join_paths(.paths))]
    DuplicatePaths {
        category: String,
        paths: Vec<PathBuf>,
    },

    #[error("{0}")]
    InvalidOperations(String),

    /// Aggregated `validate` failures, one line per problem.
    #[error("Following errors were encountered\n{}", bullet_list(.0))]
    Validation(Vec<String>),

    #[error("Command \"{command}\" failed with {status}")]
    CommandFailed { command: String, status: String },

    #[error("Config and template config path cannot be same")]
    SameConfigAndTemplate,

    #[error("{message}")]
    NotWritable { message: String },

    /// Input ended while a prompt was waiting for an answer.
    #[error("Prompt input closed")]
    PromptClosed,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn bullet_list(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("* {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
