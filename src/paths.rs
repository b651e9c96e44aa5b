//! Path helpers: config path resolution, home expansion and normalization.

use std::env;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Default location of the category config.
pub const DEFAULT_CONFIG_PATH: &str = "~/.ctgrzr/config.yaml";

/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "CTGRZR_CONFIG";

/// Pick the config path: CLI argument, then `CTGRZR_CONFIG`, then the default.
pub fn config_path_source(cli: Option<&Path>) -> PathBuf {
    debug!(cli = ?cli, "resolving config path");
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    match env::var_os(CONFIG_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Resolve the config path to an absolute path.
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    to_absolute_path(&config_path_source(cli))
}

/// Whether `path` points at the default config location.
pub fn is_default_config_path(path: &Path) -> bool {
    path == to_absolute_path(Path::new(DEFAULT_CONFIG_PATH))
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Make a path absolute without following symlinks.
///
/// `~` is expanded, relative paths are joined onto the current directory and
/// `.`/`..` components are folded lexically. Symlinks are kept as-is so that a
/// classified symlink stays a symlink in the config.
pub fn to_absolute_path(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Check that `dir` exists, is a directory and is writable.
pub fn validate_writable_directory(dir: &Path) -> Result<()> {
    let metadata = match dir.metadata() {
        Ok(m) => m,
        Err(_) => {
            return Err(Error::NotWritable {
                message: format!("Parent path \"{}\" does not exist", dir.display()),
            });
        }
    };
    if !metadata.is_dir() {
        return Err(Error::NotWritable {
            message: format!("Parent path \"{}\" is not a directory", dir.display()),
        });
    }
    if !can_write(dir) {
        return Err(Error::NotWritable {
            message: format!(
                "No writable permissions in the \"{}\" directory",
                dir.display()
            ),
        });
    }
    Ok(())
}

/// Whether this process may create files in `dir`.
#[cfg(unix)]
fn can_write(dir: &Path) -> bool {
    rustix::fs::access(dir, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn can_write(dir: &Path) -> bool {
    dir.metadata().is_ok_and(|m| !m.permissions().readonly())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(
            normalize(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_absolute_path_keeps_absolute() {
        assert_eq!(
            to_absolute_path(Path::new("/tmp/x/../y")),
            PathBuf::from("/tmp/y")
        );
    }

    #[test]
    fn test_relative_path_joins_cwd() {
        let cwd = env::current_dir().unwrap();
        assert_eq!(to_absolute_path(Path::new("some/file")), cwd.join("some/file"));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/cfg.yaml")), home.join("cfg.yaml"));
        }
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
        assert_eq!(expand_home(Path::new("a~b")), PathBuf::from("a~b"));
    }

    #[test]
    fn test_cli_config_wins() {
        assert_eq!(
            config_path_source(Some(Path::new("/etc/ctgrzr.yaml"))),
            PathBuf::from("/etc/ctgrzr.yaml")
        );
    }

    #[test]
    fn test_validate_writable_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_writable_directory(dir.path()).is_ok());

        let missing = dir.path().join("missing");
        let err = validate_writable_directory(&missing).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        let err = validate_writable_directory(&file).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    #[cfg(unix)]
    fn test_read_only_directory_is_not_writable() {
        use std::os::unix::fs::PermissionsExt;

        // Root bypasses permission bits
        if rustix::process::geteuid().is_root() {
            return;
        }
        let dir = tempfile::TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let result = validate_writable_directory(&locked);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("No writable permissions"));
    }
}
