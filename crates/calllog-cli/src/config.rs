//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use calllog_core::GroupingMode;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How records are turned into rows when `--flat` is not given.
    pub mode: GroupingMode,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mode", &self.mode.as_str())
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CALLLOG_*)
        figment = figment.merge(Env::prefixed("CALLLOG_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for calllog.
///
/// On Linux: `~/.config/calllog`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calllog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_calllog() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "calllog");
    }

    #[test]
    fn test_default_config_uses_merged_mode() {
        assert_eq!(Config::default().mode, GroupingMode::Merged);
    }

    #[test]
    fn test_explicit_config_file_sets_mode() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "mode = \"flat\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.mode, GroupingMode::Flat);
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "mode = \"sideways\"\n").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_debug_shows_mode_name() {
        let config = Config {
            mode: GroupingMode::Flat,
        };
        assert_eq!(format!("{config:?}"), "Config { mode: \"flat\" }");
    }
}
