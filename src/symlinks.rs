//! Symlink scanning
//!
//! Finds symlinks under directories, or among paths already recorded in a config.
//! The scan is a lazy breadth-first iterator and never touches the filesystem
//! beyond reading it.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Lazy breadth-first search for symlinks.
///
/// A visited path is yielded when it is a symlink and expanded when it is a
/// directory (following symlinks). The two checks are independent, so a symlink to a
/// directory is reported and its target is scanned as well. Real directories are
/// always expanded; a symlinked directory is expanded only if its target has not
/// been expanded before. Every cycle passes through a symlink, so the scan stays
/// finite.
#[derive(Debug)]
pub struct SymlinkScan {
    roots: VecDeque<PathBuf>,
    queue: VecDeque<PathBuf>,
    /// Canonical paths of expanded directories
    expanded: HashSet<PathBuf>,
    /// Real directories expanded, by the path they were reached through
    visited: HashSet<PathBuf>,
    reported: HashSet<PathBuf>,
}

impl SymlinkScan {
    fn new<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            roots: roots.into_iter().collect(),
            queue: VecDeque::new(),
            expanded: HashSet::new(),
            visited: HashSet::new(),
            reported: HashSet::new(),
        }
    }

    /// Enqueue the children of `path` if it is a directory due for expansion.
    fn expand(&mut self, path: &Path) {
        if !path.is_dir() {
            return;
        }
        let real = match path.canonicalize() {
            Ok(real) => real,
            Err(_) => return,
        };
        if path.is_symlink() {
            if !self.expanded.insert(real) {
                debug!(path = %path.display(), "symlink target already scanned");
                return;
            }
        } else {
            if !self.visited.insert(path.to_path_buf()) {
                return;
            }
            self.expanded.insert(real);
        }
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot list directory");
                return;
            }
        };
        let mut children: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        children.sort();
        self.queue.extend(children);
    }
}

impl Iterator for SymlinkScan {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let path = match self.queue.pop_front() {
                Some(path) => path,
                None => {
                    let root = self.roots.pop_front()?;
                    info!(root = %root.display(), "checking for symlinks");
                    root
                }
            };
            self.expand(&path);
            if path.is_symlink() && self.reported.insert(path.clone()) {
                return Some(path);
            }
        }
    }
}

/// Symlinks found under `root`, including `root` itself if it is one.
pub fn scan_directory(root: impl Into<PathBuf>) -> SymlinkScan {
    SymlinkScan::new([root.into()])
}

/// Symlinks among `paths` and under those of them that are directories.
///
/// Paths are scanned one after another; a symlink is reported once even when
/// several paths reach it.
pub fn scan_paths<I>(paths: I) -> SymlinkScan
where
    I: IntoIterator<Item = PathBuf>,
{
    SymlinkScan::new(paths)
}
