use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::cache::CACHE_FILE_NAME;
use crate::license::policy::ALLOW_LIST_FILE_NAME;

/// Root configuration structure, deserialized from `.license-gate/config.toml`.
///
/// Carries file locations only; the acceptable-license policy itself is not
/// configurable here.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
}

/// Locations of the policy inputs, resolved against the scanned project
/// unless absolute.
#[derive(Debug, Deserialize)]
pub struct FilesConfig {
    /// Package-scoped license exceptions.
    #[serde(default = "default_allow_list")]
    pub allow_list: PathBuf,
    /// Durable license store.
    #[serde(default = "default_cache")]
    pub cache: PathBuf,
}

fn default_allow_list() -> PathBuf {
    PathBuf::from(ALLOW_LIST_FILE_NAME)
}

fn default_cache() -> PathBuf {
    PathBuf::from(CACHE_FILE_NAME)
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            allow_list: default_allow_list(),
            cache: default_cache(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-gate/config.toml`
/// 3. `~/.config/license-gate/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let project_config = project_path.join(".license-gate").join("config.toml");
    if project_config.exists() {
        let content = std::fs::read_to_string(&project_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("license-gate").join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}

/// Resolve a configured path against the project directory.
pub fn resolve_path(project_path: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        project_path.join(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_when_no_config_present() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.files.allow_list, PathBuf::from(ALLOW_LIST_FILE_NAME));
        assert_eq!(config.files.cache, PathBuf::from(CACHE_FILE_NAME));
    }

    #[test]
    fn test_project_local_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".license-gate");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.toml"),
            "[files]\nallow_list = \"legal/exceptions.txt\"\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.files.allow_list, PathBuf::from("legal/exceptions.txt"));
        // Unset fields keep their defaults
        assert_eq!(config.files.cache, PathBuf::from(CACHE_FILE_NAME));
    }

    #[test]
    fn test_override_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let override_path = dir.path().join("custom.toml");
        fs::write(&override_path, "[files]\ncache = \"/var/cache/licenses.cache\"\n").unwrap();

        let config = load_config(dir.path(), Some(&override_path)).unwrap();
        assert_eq!(config.files.cache, PathBuf::from("/var/cache/licenses.cache"));
    }

    #[test]
    fn test_unreadable_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(dir.path(), Some(Path::new("/nonexistent.toml"))).is_err());
    }

    #[test]
    fn test_resolve_path() {
        let project = Path::new("/work/project");
        assert_eq!(
            resolve_path(project, Path::new("licenses.cache")),
            PathBuf::from("/work/project/licenses.cache")
        );
        assert_eq!(
            resolve_path(project, Path::new("/abs/licenses.cache")),
            PathBuf::from("/abs/licenses.cache")
        );
    }
}
