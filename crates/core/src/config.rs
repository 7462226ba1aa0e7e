use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".nova.json";

/// Build settings discovered next to (or above) a source file.
///
/// Every field is optional in the file; missing ones fall back to the
/// defaults below.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// C compiler that generated code is handed to
    pub cc: String,
    /// Extra arguments appended to every C compiler invocation
    pub cc_args: Vec<String>,
    /// Keep the generated C file and executable next to the source
    pub keep_intermediates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cc: "cc".to_string(),
            cc_args: Vec::new(),
            keep_intermediates: false,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Walks from `dir` toward the filesystem root and returns the first
    /// config file found.
    pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }
            current = dir.parent();
        }
        None
    }

    /// The configuration governing a source file: the nearest config on
    /// the way up from its directory, or the defaults when there is none.
    pub fn for_source(source: &Path) -> Result<Self> {
        let dir = source.parent().unwrap_or(Path::new("."));
        match Self::find_config_file(dir) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_system_compiler() {
        let config = Config::default();
        assert_eq!(config.cc, "cc");
        assert!(config.cc_args.is_empty());
        assert!(!config.keep_intermediates);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"cc": "clang"}"#).unwrap();
        assert_eq!(config.cc, "clang");
        assert!(config.cc_args.is_empty());
        assert!(!config.keep_intermediates);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn the_nearest_config_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"cc": "outer"}"#).unwrap();
        fs::write(
            dir.path().join("a").join(CONFIG_FILE_NAME),
            r#"{"cc": "inner"}"#,
        )
        .unwrap();

        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join("a").join(CONFIG_FILE_NAME));
        assert_eq!(Config::load_from_file(&found).unwrap().cc, "inner");
    }

    #[test]
    fn sources_without_a_config_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("program.nova");

        let config = Config::for_source(&source).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn for_source_reads_the_sibling_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"cc": "gcc", "cc_args": ["-O2"], "keep_intermediates": true}"#,
        )
        .unwrap();

        let config = Config::for_source(&dir.path().join("program.nova")).unwrap();
        assert_eq!(config.cc, "gcc");
        assert_eq!(config.cc_args, vec!["-O2".to_string()]);
        assert!(config.keep_intermediates);
    }
}
