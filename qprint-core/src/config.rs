// Rendering configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched by [`Config::from_dir`]
pub const CONFIG_FILE: &str = "qprint.json";

/// Process-level rendering options, passed explicitly to every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Prefix `{x}` output with `0x` and `{o}` output with `0o`.
    ///
    /// Octal uses Rust's `0o` literal prefix, not the single leading `0`
    /// of C, so `8` under `{o}` is `0o10` and never reads as decimal `10`.
    #[serde(default = "default_true")]
    pub show_base: bool,

    /// How booleans render under a plain `{}`
    #[serde(default)]
    pub bool_style: BoolStyle,

    /// Digits after the decimal point for `{f}` and `{e}`
    #[serde(default = "default_float_precision")]
    pub float_precision: usize,
}

/// Boolean rendering without the `{b}` modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolStyle {
    /// `1` / `0`
    #[default]
    Numeric,
    /// `true` / `false`
    Word,
}

fn default_true() -> bool {
    true
}
fn default_float_precision() -> usize {
    6
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_base: true,
            bool_style: BoolStyle::Numeric,
            float_precision: default_float_precision(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        log::debug!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Search `dir` and its ancestors for `qprint.json`, falling back to defaults
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut current = Some(dir.as_ref());
        while let Some(path) = current {
            let config_path = path.join(CONFIG_FILE);
            if config_path.exists() {
                return Self::from_file(config_path);
            }
            current = path.parent();
        }

        Ok(Self::default())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Pretty-printed default configuration
    pub fn example() -> String {
        serde_json::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    pub fn with_show_base(mut self, show_base: bool) -> Self {
        self.show_base = show_base;
        self
    }

    pub fn with_bool_style(mut self, bool_style: BoolStyle) -> Self {
        self.bool_style = bool_style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.show_base);
        assert_eq!(config.bool_style, BoolStyle::Numeric);
        assert_eq!(config.float_precision, 6);
    }

    #[test]
    fn test_show_base_prefixes() {
        let with_base = Config::default();
        let bare = Config::default().with_show_base(false);

        assert_eq!(crate::format_with(&with_base, "{o} {x}", &[&8, &255]).unwrap(), "0o10 0xff");
        assert_eq!(crate::format_with(&bare, "{o} {x}", &[&8, &255]).unwrap(), "10 ff");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default().with_bool_style(BoolStyle::Word);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
        assert!(json.contains("\"word\""));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"show_base": false}"#).unwrap();
        assert!(!config.show_base);
        assert_eq!(config.float_precision, 6);
        assert_eq!(config.bool_style, BoolStyle::Numeric);
    }

    #[test]
    fn test_example_config() {
        let example = Config::example();
        assert!(example.contains("show_base"));
        assert!(example.contains("bool_style"));
        assert!(example.contains("float_precision"));
    }

    #[test]
    fn test_from_dir_searches_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let saved = Config::default().with_show_base(false);
        saved.save(root.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(Config::from_dir(&nested).unwrap(), saved);
    }

    #[test]
    fn test_from_file_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
