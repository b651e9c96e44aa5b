//! ctgrzr - sort filesystem paths into categories and run per-category commands

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod prompt;
pub mod symlinks;
pub mod walk;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use commands::{CommandOutcome, SymlinkReport, WalkStart};
pub use config::{AddMode, CategoryConfig, ClassifiedIndex, load_config, save_config};
pub use error::{Error, Result};
pub use operations::{OperationsConfig, load_operations};
pub use prompt::{Prompt, TerminalPrompt};
pub use symlinks::{SymlinkScan, scan_directory, scan_paths};
pub use walk::{Action, Choice, InteractiveWalker, WalkOptions, WalkReport, WalkStatus};
