//! Category config: which paths belong to which categories.
//!
//! The config is a YAML mapping from category name to a list of absolute paths.
//! Category order and path order are preserved across load and save.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::paths::{is_default_config_path, to_absolute_path, validate_writable_directory};

/// Path -> categories it belongs to, built from a config snapshot.
pub type ClassifiedIndex = IndexMap<PathBuf, Vec<String>>;

/// How `CategoryConfig::add_path` treats a path already present in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Duplicate is an error.
    Strict,
    /// Duplicate is removed and the path re-appended.
    Overwrite,
    /// Duplicate is ignored.
    Tolerant,
}

impl AddMode {
    pub fn from_force(force: bool) -> Self {
        if force { Self::Overwrite } else { Self::Strict }
    }
}

/// Mapping from category name to its ordered, unique list of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryConfig {
    categories: IndexMap<String, Vec<PathBuf>>,
}

impl CategoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names in config order.
    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn paths(&self, category: &str) -> &[PathBuf] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<PathBuf>)> {
        self.categories.iter()
    }

    /// Add `path` to every category in `categories`, creating missing categories.
    ///
    /// Returns whether the config changed.
    pub fn add_path(&mut self, path: &Path, categories: &[String], mode: AddMode) -> Result<bool> {
        if mode == AddMode::Strict {
            // Check everything first so a conflict leaves the config untouched
            for category in categories {
                if self.paths(category).iter().any(|p| p == path) {
                    return Err(Error::ConfigMutationConflict {
                        path: path.to_path_buf(),
                        category: category.clone(),
                    });
                }
            }
        }

        let mut changed = false;
        for category in categories {
            let entries = self.categories.entry(category.clone()).or_default();
            if entries.iter().any(|p| p == path) {
                match mode {
                    AddMode::Tolerant => continue,
                    AddMode::Overwrite => entries.retain(|p| p != path),
                    AddMode::Strict => unreachable!("conflicts are rejected above"),
                }
            }
            entries.push(path.to_path_buf());
            changed = true;
        }
        Ok(changed)
    }

    /// Remove `path` from the given categories.
    ///
    /// Unknown categories are always an error. A path missing from a category is an
    /// error unless `force` is set.
    pub fn remove_path(&mut self, path: &Path, categories: &[String], force: bool) -> Result<bool> {
        let unknown: Vec<String> = categories
            .iter()
            .filter(|c| !self.categories.contains_key(c.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownCategories(unknown));
        }
        if !force {
            if let Some(category) = categories
                .iter()
                .find(|c| !self.paths(c).iter().any(|p| p == path))
            {
                return Err(Error::PathNotInCategory {
                    path: path.to_path_buf(),
                    category: category.clone(),
                });
            }
        }

        let mut changed = false;
        for category in categories {
            if let Some(entries) = self.categories.get_mut(category) {
                let before = entries.len();
                entries.retain(|p| p != path);
                changed |= entries.len() != before;
            }
        }
        Ok(changed)
    }

    /// Invert the config into path -> categories.
    pub fn by_path(&self) -> ClassifiedIndex {
        let mut index = ClassifiedIndex::new();
        for (category, paths) in &self.categories {
            for path in paths {
                index.entry(path.clone()).or_default().push(category.clone());
            }
        }
        index
    }

    /// Every configured path once, in first-seen order.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        self.by_path().into_keys().collect()
    }

    fn validate_unique(&self) -> Result<()> {
        for (category, paths) in &self.categories {
            let mut seen = HashSet::new();
            let mut duplicates = Vec::new();
            for path in paths {
                if !seen.insert(path) && !duplicates.contains(path) {
                    duplicates.push(path.clone());
                }
            }
            if !duplicates.is_empty() {
                return Err(Error::DuplicatePaths {
                    category: category.clone(),
                    paths: duplicates,
                });
            }
        }
        Ok(())
    }

    fn absolutize(self) -> Self {
        let categories = self
            .categories
            .into_iter()
            .map(|(category, paths)| {
                let paths = paths.iter().map(|p| to_absolute_path(p)).collect();
                (category, paths)
            })
            .collect();
        Self { categories }
    }
}

/// Parse a config document. Empty or null documents yield an empty config.
pub fn parse_config(source: &Path, data: &str) -> Result<CategoryConfig> {
    if data.trim().is_empty() {
        return Ok(CategoryConfig::new());
    }
    let parsed: Option<IndexMap<String, Option<Vec<PathBuf>>>> =
        serde_yaml::from_str(data).map_err(|e| Error::Yaml {
            path: source.to_path_buf(),
            source: e,
        })?;
    let categories = parsed
        .unwrap_or_default()
        .into_iter()
        .map(|(category, paths)| (category, paths.unwrap_or_default()))
        .collect();
    let config = CategoryConfig { categories }.absolutize();
    config.validate_unique()?;
    Ok(config)
}

/// Load the config from `config_path`.
///
/// A missing file is an empty config, provided its parent directory can hold one.
/// The default `~/.ctgrzr` directory is created on demand.
pub fn load_config(config_path: &Path) -> Result<CategoryConfig> {
    info!(path = %config_path.display(), "loading config");
    if config_path.exists() {
        let data = fs::read_to_string(config_path).map_err(|e| Error::io(config_path, e))?;
        return parse_config(config_path, &data);
    }

    info!("config not found, starting from an empty config");
    let parent = config_path.parent().unwrap_or_else(|| Path::new("/"));
    if is_default_config_path(config_path) && !parent.exists() {
        warn!(dir = %parent.display(), "default config directory not found, creating");
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    validate_writable_directory(parent)?;
    Ok(CategoryConfig::new())
}

/// Write the config to `config_path` as YAML.
pub fn save_config(config_path: &Path, config: &CategoryConfig) -> Result<()> {
    info!(path = %config_path.display(), "saving config");
    let data = serde_yaml::to_string(config).map_err(|e| Error::Yaml {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    fs::write(config_path, data).map_err(|e| Error::io(config_path, e))
}
