//! Which paths the interactive walk offers

use std::fs::{self, File};
use std::path::Path;

use glob::Pattern;
use tracing::{debug, info};

/// Whether the process can read `path`, following symlinks.
///
/// Directories must be listable and files openable. Anything else, including a
/// missing path or a dangling symlink, is unreadable.
pub fn is_readable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => fs::read_dir(path).is_ok(),
        Ok(meta) if meta.is_file() => File::open(path).is_ok(),
        _ => false,
    }
}

/// Why the walk passes over a path without asking about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Symlink while symlinks are excluded
    Symlink,
    /// Missing, dangling or not readable by this process
    Unreadable,
    /// Neither a regular file nor a directory
    OtherKind,
}

/// Decide whether the walk should offer `path` at all.
///
/// The symlink policy is applied first, so an excluded symlink is reported as
/// such even when it dangles. Symlinks are offered only with `include_symlinks`,
/// and then only when they resolve to a file or directory. Unreadable paths are
/// never offered.
pub fn eligibility(path: &Path, include_symlinks: bool) -> Result<(), SkipReason> {
    let meta = fs::symlink_metadata(path).map_err(|_| SkipReason::Unreadable)?;
    if meta.file_type().is_symlink() && !include_symlinks {
        return Err(SkipReason::Symlink);
    }
    // Followed, so a symlink to a file or directory counts as one
    let target = fs::metadata(path).map_err(|_| SkipReason::Unreadable)?;
    if !(target.is_file() || target.is_dir()) {
        return Err(SkipReason::OtherKind);
    }
    if !is_readable(path) {
        return Err(SkipReason::Unreadable);
    }
    Ok(())
}

/// Whether the walk should offer `path`, logging the reason when it should not.
pub fn is_eligible(path: &Path, include_symlinks: bool) -> bool {
    match eligibility(path, include_symlinks) {
        Ok(()) => true,
        Err(SkipReason::Symlink) => {
            info!(path = %path.display(), "skipping symlink");
            false
        }
        Err(SkipReason::Unreadable) => {
            info!(path = %path.display(), "skipping unreadable path");
            false
        }
        Err(SkipReason::OtherKind) => {
            debug!(path = %path.display(), "skipping path that is neither file nor directory");
            false
        }
    }
}

/// Check if a child name matches one of the ignore patterns.
pub fn is_ignored(path: &Path, ignore_patterns: &[String]) -> bool {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    ignore_patterns
        .iter()
        .any(|pattern| name == *pattern || glob_match(pattern, &name))
}

fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}
