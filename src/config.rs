//! Configuration loading for Playlint
//!
//! The lint configuration comes from, in order of precedence:
//! - An explicit `--config` path
//! - The first of [`CONFIG_FILE_NAMES`] found in the working directory
//! - Built-in defaults
//!
//! Command-line options are merged on top by the binary.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::lint::LintConfig;

/// Project configuration files, checked in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".playlint.yml", ".playlint.yaml", ".ansible-lint"];

/// A configuration and the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: LintConfig,
    /// `None` when the defaults were used.
    pub source: Option<PathBuf>,
}

/// Load the configuration for a run started in `dir`.
///
/// An explicit path must exist. Discovered files are optional.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        return load_from(path);
    }

    match discover(dir) {
        Some(path) => load_from(&path),
        None => {
            debug!(dir = %dir.display(), "no configuration file found, using defaults");
            Ok(LoadedConfig::default())
        }
    }
}

/// Find the project configuration file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn load_from(path: &Path) -> Result<LoadedConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::config(path, e.to_string()))?;
    let config = LintConfig::from_yaml(&content).map_err(|e| Error::config(path, e.to_string()))?;
    debug!(path = %path.display(), "loaded configuration");

    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Severity;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(None, dir.path()).unwrap();
        assert!(loaded.source.is_none());
        assert!(loaded.config.skip_list.is_empty());
    }

    #[test]
    fn test_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".ansible-lint"), "skip_list: [a]\n").unwrap();
        std::fs::write(dir.path().join(".playlint.yml"), "skip_list: [b]\nmin_severity: high\n").unwrap();

        let loaded = load_config(None, dir.path()).unwrap();
        assert_eq!(loaded.source, Some(dir.path().join(".playlint.yml")));
        assert_eq!(loaded.config.skip_list, vec!["b".to_string()]);
        assert_eq!(loaded.config.min_severity, Severity::High);
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lint.yml");
        std::fs::write(&path, "parallel: true\n").unwrap();
        assert!(load_config(Some(&path), dir.path()).unwrap().config.parallel);

        let missing = dir.path().join("missing.yml");
        assert!(matches!(
            load_config(Some(&missing), dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".playlint.yml"), "skip_list: 3\n").unwrap();
        assert!(matches!(load_config(None, dir.path()), Err(Error::Config { .. })));
    }
}
