//! The ctgrzr commands.
//!
//! Each command works on an already-loaded `CategoryConfig` and reports whether the
//! config has to be written back. Loading and saving stay with the caller.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::{AddMode, CategoryConfig, ClassifiedIndex, load_config};
use crate::error::{Error, Result};
use crate::operations::{OperationsConfig, run_command};
use crate::prompt::Prompt;
use crate::symlinks::scan_paths;
use crate::walk::{InteractiveWalker, WalkOptions, WalkStatus};

/// Result of a command: exit code and whether the config must be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub config_changed: bool,
}

impl CommandOutcome {
    pub fn changed() -> Self {
        Self {
            exit_code: 0,
            config_changed: true,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            exit_code: 0,
            config_changed: false,
        }
    }
}

/// Add a single existing file or directory to categories.
pub fn add(
    config: &mut CategoryConfig,
    path: &Path,
    categories: &[String],
    force: bool,
    allow_symlink: bool,
) -> Result<CommandOutcome> {
    info!("running \"add\" command");
    if categories.is_empty() {
        return Err(Error::NoCategory);
    }
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    if !(path.is_file() || path.is_dir()) {
        return Err(Error::NotFileOrDirectory {
            path: path.to_path_buf(),
        });
    }
    if !allow_symlink && path.is_symlink() {
        return Err(Error::SymlinkNotAllowed {
            path: path.to_path_buf(),
        });
    }
    config.add_path(path, categories, AddMode::from_force(force))?;
    Ok(CommandOutcome::changed())
}

/// Remove a path from categories.
pub fn remove(
    config: &mut CategoryConfig,
    path: &Path,
    categories: &[String],
    force: bool,
) -> Result<CommandOutcome> {
    info!("running \"remove\" command");
    if categories.is_empty() {
        return Err(Error::NoCategory);
    }
    config.remove_path(path, categories, force)?;
    Ok(CommandOutcome::changed())
}

/// Copy the categorization of every still-existing path from a template config.
pub fn autoadd(
    config: &mut CategoryConfig,
    template: &CategoryConfig,
    force: bool,
    allow_symlinks: bool,
) -> Result<CommandOutcome> {
    info!("running \"autoadd\" command");
    for (path, categories) in template.by_path() {
        if path.exists() && (path.is_file() || path.is_dir()) {
            add(config, &path, &categories, force, allow_symlinks)?;
        } else {
            info!(path = %path.display(), "template path no longer exists, skipping");
        }
    }
    Ok(CommandOutcome::changed())
}

/// Run each category's command for each of its paths.
///
/// With `strict` the first failing command aborts; otherwise failures are logged and
/// the remaining commands still run.
pub fn apply(
    config: &CategoryConfig,
    operations: &OperationsConfig,
    strict: bool,
) -> Result<CommandOutcome> {
    info!(strict, "running \"apply\" command");
    for (category, paths) in config.iter() {
        for path in paths {
            let command = operations.render(category, path).ok_or_else(|| {
                Error::InvalidOperations(format!(
                    "No operation defined for category \"{}\"",
                    category
                ))
            })?;
            if let Err(e) = run_command(&command, false, true) {
                if strict {
                    return Err(e);
                }
                error!("{}", e);
            }
        }
    }
    Ok(CommandOutcome::unchanged())
}

/// Check that configured paths exist and are files or directories.
///
/// Only the named categories are checked; all of them when none are named.
pub fn validate(config: &CategoryConfig, categories: &[String]) -> Result<CommandOutcome> {
    info!("running \"validate\" command");
    let selected: Vec<String> = if categories.is_empty() {
        info!("no categories specified, assuming all");
        config.category_names()
    } else {
        categories.to_vec()
    };

    let mut problems = Vec::new();
    for (category, paths) in config.iter() {
        if !selected.contains(category) {
            continue;
        }
        for path in paths {
            if !path.exists() {
                problems.push(format!(
                    "Category \"{}\" - Path \"{}\" does not exist",
                    category,
                    path.display()
                ));
            } else if !(path.is_file() || path.is_dir()) {
                problems.push(format!(
                    "Category \"{}\" - Path \"{}\" should be regular file or directory",
                    category,
                    path.display()
                ));
            }
        }
    }
    if !problems.is_empty() {
        return Err(Error::Validation(problems));
    }
    Ok(CommandOutcome::unchanged())
}

/// Starting point of an interactive walk.
#[derive(Debug, Default)]
pub struct WalkStart {
    pub config: CategoryConfig,
    pub classified: ClassifiedIndex,
}

/// Decide what an interactive walk starts from.
///
/// An existing config is resumed: its paths are kept and never asked about again.
/// With `overwrite` the walk starts empty, after confirmation unless `assume_yes`.
/// Returns `None` when the user declines.
pub fn prepare_interactive<P: Prompt>(
    config_path: &Path,
    overwrite: bool,
    assume_yes: bool,
    prompt: &mut P,
) -> Result<Option<WalkStart>> {
    if !config_path.exists() {
        load_config(config_path)?;
        return Ok(Some(WalkStart::default()));
    }
    if overwrite {
        let message = format!(
            "Config \"{}\" already exists, do you want to continue and overwrite?",
            config_path.display()
        );
        if !assume_yes && !prompt.confirm(&message, false)? {
            return Ok(None);
        }
        return Ok(Some(WalkStart::default()));
    }

    let config = load_config(config_path)?;
    info!(paths = config.all_paths().len(), "resuming from existing config");
    Ok(Some(WalkStart {
        classified: config.by_path(),
        config,
    }))
}

/// Walk `roots` interactively, categorizing into the operations' categories.
pub fn interactive<P: Prompt>(
    config: &mut CategoryConfig,
    classified: ClassifiedIndex,
    operations: &OperationsConfig,
    roots: &[PathBuf],
    options: WalkOptions,
    prompt: &mut P,
) -> Result<CommandOutcome> {
    info!("running \"interactive\" command");
    let categories = operations.categories();
    let report = InteractiveWalker::new(options)
        .with_classified(classified)
        .walk(config, &categories, roots, prompt)?;
    if report.status == WalkStatus::Halted {
        info!(processed = report.processed, "walk halted by user");
    }
    Ok(CommandOutcome {
        exit_code: report.exit_code(),
        config_changed: report.config_changed,
    })
}

/// Where symlink findings go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymlinkReport {
    /// One line per symlink on the output
    Print,
    /// Warning-level log events
    Log,
    /// JSON array on the output
    Json,
}

/// Report symlinks among and under the configured paths.
///
/// With `interactive` the user first picks which configured directories to scan,
/// picking none scans them all. Configured paths that are symlinks themselves are
/// always reported.
pub fn search_symlinks<P: Prompt, W: Write>(
    config: &CategoryConfig,
    interactive: bool,
    report: SymlinkReport,
    prompt: &mut P,
    out: &mut W,
) -> Result<CommandOutcome> {
    info!("running \"search_symlinks\" command");
    let mut paths = config.all_paths();
    if interactive {
        let symlinks: Vec<PathBuf> = paths.iter().filter(|p| p.is_symlink()).cloned().collect();
        let directories: Vec<PathBuf> = paths.iter().filter(|p| p.is_dir()).cloned().collect();
        let labels: Vec<String> = directories.iter().map(|p| p.display().to_string()).collect();
        let picked = prompt.multi_select("Choose relevant directories (none for all)", &labels)?;
        paths = if picked.is_empty() {
            info!("no directories picked, scanning all of them");
            directories
        } else {
            picked
                .into_iter()
                .filter_map(|i| directories.get(i).cloned())
                .collect()
        };
        for link in symlinks {
            if !paths.contains(&link) {
                paths.push(link);
            }
        }
    }

    let found = scan_paths(paths);
    let io_err = |e: std::io::Error| Error::io("<stdout>", e);
    match report {
        SymlinkReport::Print => {
            for link in found {
                writeln!(out, "Symlink found: \"{}\"", link.display()).map_err(io_err)?;
            }
        }
        SymlinkReport::Log => {
            for link in found {
                warn!("Symlink found: \"{}\"", link.display());
            }
        }
        SymlinkReport::Json => {
            let links: Vec<PathBuf> = found.collect();
            let json = serde_json::to_string_pretty(&links)?;
            writeln!(out, "{}", json).map_err(io_err)?;
        }
    }
    Ok(CommandOutcome::unchanged())
}
