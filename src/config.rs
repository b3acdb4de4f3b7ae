use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detection rules and report limits.
///
/// Built once at startup and passed by reference into the analyzer and
/// classifier. Every field has a built-in default, so a config file only
/// needs to list the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Case-sensitive substrings that mark a URL as suspicious
    pub keywords: Vec<String>,
    /// HTTP methods flagged on exact match
    pub methods: Vec<String>,
    /// Case-sensitive substrings that identify scanner user agents
    pub user_agents: Vec<String>,
    /// Query parameters longer than this many characters are flagged
    pub long_param_threshold: usize,
    /// Minimum number of reasons before a line is reported
    pub min_reasons: usize,
    /// Maximum number of entries in the report
    pub top_n: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            keywords: to_strings(&["admin", "login", "config"]),
            methods: to_strings(&["PATCH", "TRACE"]),
            user_agents: to_strings(&["curl", "Nmap", "sqlmap"]),
            long_param_threshold: 10,
            min_reasons: 2,
            top_n: 20,
        }
    }
}

impl DetectionConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_builtin_rules() {
        let config = DetectionConfig::default();
        assert_eq!(config.keywords, vec!["admin", "login", "config"]);
        assert_eq!(config.methods, vec!["PATCH", "TRACE"]);
        assert_eq!(config.user_agents, vec!["curl", "Nmap", "sqlmap"]);
        assert_eq!(config.long_param_threshold, 10);
        assert_eq!(config.min_reasons, 2);
        assert_eq!(config.top_n, 20);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = DetectionConfig::from_toml("top_n = 5\nkeywords = [\"wp-admin\"]\n").unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.keywords, vec!["wp-admin"]);
        assert_eq!(config.methods, DetectionConfig::default().methods);
        assert_eq!(config.min_reasons, 2);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(DetectionConfig::from_toml("").unwrap(), DetectionConfig::default());
    }

    #[test]
    fn rejects_wrong_field_type() {
        assert!(DetectionConfig::from_toml("top_n = \"twenty\"").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_reasons = 1").unwrap();
        let config = DetectionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_reasons, 1);
    }

    #[test]
    fn invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_n = \"twenty\"").unwrap();
        let err = DetectionConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DetectionConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
