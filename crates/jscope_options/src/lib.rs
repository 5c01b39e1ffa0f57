//! jscope_options: feature flags and `jscope.json` configuration.
//!
//! Parses configuration files and provides the [`Features`] toggles the
//! analysis and the language service consult.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The file name searched for by [`find_config`].
pub const CONFIG_FILE_NAME: &str = "jscope.json";

/// Feature name: report function parameters that are never used.
pub const UNUSED_FUNCTION_ARGS: &str = "unusedFunctionArgs";
/// Feature name: return occurrence markers from cursor queries.
pub const INSTANCE_HIGHLIGHT: &str = "instanceHighlight";

/// Every feature name known to [`Features::is_enabled`].
pub const FEATURE_NAMES: &[&str] = &[UNUSED_FUNCTION_ARGS, INSTANCE_HIGHLIGHT];

/// Analysis feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Features {
    pub unused_function_args: bool,
    pub instance_highlight: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            unused_function_args: false,
            instance_highlight: true,
        }
    }
}

impl Features {
    /// Whether the feature called `name` is on. Unknown names are off.
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            UNUSED_FUNCTION_ARGS => self.unused_function_args,
            INSTANCE_HIGHLIGHT => self.instance_highlight,
            _ => false,
        }
    }

    /// Turn the feature called `name` on or off. Returns `false` when the
    /// name is unknown.
    pub fn set(&mut self, name: &str, enabled: bool) -> bool {
        match name {
            UNUSED_FUNCTION_ARGS => self.unused_function_args = enabled,
            INSTANCE_HIGHLIGHT => self.instance_highlight = enabled,
            _ => return false,
        }
        true
    }
}

/// The `jscope.json` file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JscopeConfig {
    #[serde(default)]
    pub features: Features,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`JscopeConfig`].
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Parse a `jscope.json` document from a string.
pub fn parse_config(content: &str) -> Result<JscopeConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Read and parse a `jscope.json` file.
pub fn load_config(path: &Path) -> Result<JscopeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Search `start` and its ancestors for a `jscope.json` file.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let features = Features::default();
        assert!(!features.is_enabled(UNUSED_FUNCTION_ARGS));
        assert!(features.is_enabled(INSTANCE_HIGHLIGHT));
        assert!(!features.is_enabled("noSuchFeature"));
    }

    #[test]
    fn test_set_by_name() {
        let mut features = Features::default();
        assert!(features.set(UNUSED_FUNCTION_ARGS, true));
        assert!(features.set(INSTANCE_HIGHLIGHT, false));
        assert!(!features.set("noSuchFeature", true));
        assert_eq!(
            features,
            Features {
                unused_function_args: true,
                instance_highlight: false,
            }
        );
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"{
                "features": { "unusedFunctionArgs": true },
                "include": ["src/**/*.js"]
            }"#,
        )
        .unwrap();
        assert!(config.features.unused_function_args);
        // Omitted features keep their defaults.
        assert!(config.features.instance_highlight);
        assert_eq!(config.include, Some(vec!["src/**/*.js".to_string()]));
        assert_eq!(config.exclude, None);
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(parse_config("{}").unwrap(), JscopeConfig::default());
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(parse_config(r#"{ "features": { "instanceHighlight": "yes" } }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/definitely/not/here/jscope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read config"));
    }

    #[test]
    fn test_load_and_find_config() {
        let dir = std::env::temp_dir().join(format!("jscope-options-{}", std::process::id()));
        let nested = dir.join("src").join("lib");
        std::fs::create_dir_all(&nested).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "features": { "instanceHighlight": false } }"#).unwrap();

        assert_eq!(find_config(&nested), Some(path.clone()));
        let config = load_config(&path).unwrap();
        assert!(!config.features.instance_highlight);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Parse { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
