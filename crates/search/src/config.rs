//! Search configuration via `lodestar.toml`
//!
//! Every tunable has a default; a missing file or an empty file yields the
//! defaults. To change settings, edit the file and reopen the searcher.

use serde::{Deserialize, Serialize};
use std::path::Path;

use lodestar_core::{Error, Result};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "lodestar.toml";

// ============================================================================
// Direct-scan importances
// ============================================================================

/// Score added to a record for each direct-scan lookup that returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Importance {
    /// Field equals the whole query
    pub exact: f64,
    /// Field contains the whole query, case-insensitively
    pub contains: f64,
    /// Field starts with the whole query, case-insensitively
    pub prefix: f64,
    /// Field starts with a keyword
    pub keyword_prefix: f64,
    /// Field equals a keyword
    pub keyword_exact: f64,
    /// Field contains a keyword
    pub keyword_contains: f64,
}

impl Default for Importance {
    fn default() -> Self {
        Importance {
            exact: 100.0,
            contains: 70.0,
            prefix: 15.0,
            keyword_prefix: 15.0,
            keyword_exact: 40.0,
            keyword_contains: 20.0,
        }
    }
}

impl Importance {
    fn all(&self) -> [(&'static str, f64); 6] {
        [
            ("exact", self.exact),
            ("contains", self.contains),
            ("prefix", self.prefix),
            ("keyword_prefix", self.keyword_prefix),
            ("keyword_exact", self.keyword_exact),
            ("keyword_contains", self.keyword_contains),
        ]
    }
}

// ============================================================================
// SearchConfig
// ============================================================================

/// Search configuration loaded from `lodestar.toml`
///
/// # Example
///
/// ```toml
/// max_concurrent_lookups = 4
/// scan_page_size = 50
///
/// [importance]
/// exact = 100.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Direct-scan lookups in flight at once
    pub max_concurrent_lookups: usize,
    /// Maximum records returned by one direct-scan lookup
    pub scan_page_size: usize,
    /// Records fetched per maintenance batch
    pub maintenance_batch_size: usize,
    /// Records reindexed concurrently within a maintenance batch
    pub maintenance_parallelism: usize,
    /// Direct-scan importances
    pub importance: Importance,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_concurrent_lookups: 4,
            scan_page_size: 50,
            maintenance_batch_size: 200,
            maintenance_parallelism: 8,
            importance: Importance::default(),
        }
    }
}

impl SearchConfig {
    /// Check bounds
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if a count is zero or an importance is
    /// negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("max_concurrent_lookups", self.max_concurrent_lookups),
            ("scan_page_size", self.scan_page_size),
            ("maintenance_batch_size", self.maintenance_batch_size),
            ("maintenance_parallelism", self.maintenance_parallelism),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }
        for (name, value) in self.importance.all() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "importance.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SearchConfig =
            toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Lodestar search configuration

# Direct-scan lookups in flight at once (default: 4)
max_concurrent_lookups = 4

# Records returned by one direct-scan lookup (default: 50)
scan_page_size = 50

# Bulk maintenance: records per batch and concurrent reindexes per batch
maintenance_batch_size = 200
maintenance_parallelism = 8

# Score a record gains per direct-scan lookup that returns it
[importance]
exact = 100.0
contains = 70.0
prefix = 15.0
keyword_prefix = 15.0
keyword_exact = 40.0
keyword_contains = 20.0
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::InvalidConfig` if it cannot be parsed or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => Error::InvalidConfig(format!(
                "Failed to load config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_toml_matches_default() {
        let parsed = SearchConfig::from_toml(SearchConfig::default_toml()).unwrap();
        assert_eq!(parsed, SearchConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SearchConfig::from_toml("").unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml = "scan_page_size = 10\n[importance]\nexact = 500.0\n";
        let config = SearchConfig::from_toml(toml).unwrap();
        assert_eq!(config.scan_page_size, 10);
        assert_eq!(config.max_concurrent_lookups, 4);
        assert_eq!(config.importance.exact, 500.0);
        assert_eq!(config.importance.contains, 70.0);
    }

    #[test]
    fn test_zero_bound_rejected() {
        let err = SearchConfig::from_toml("max_concurrent_lookups = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("max_concurrent_lookups")));
    }

    #[test]
    fn test_negative_importance_rejected() {
        let err = SearchConfig::from_toml("[importance]\nprefix = -1.0").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            SearchConfig::from_toml("scan_page_size = \"lots\""),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_write_default_if_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        SearchConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());
        assert_eq!(SearchConfig::from_file(&path).unwrap(), SearchConfig::default());

        // Existing file is left alone
        std::fs::write(&path, "scan_page_size = 7\n").unwrap();
        SearchConfig::write_default_if_missing(&path).unwrap();
        assert_eq!(SearchConfig::from_file(&path).unwrap().scan_page_size, 7);
    }

    #[test]
    fn test_write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = SearchConfig {
            maintenance_parallelism: 2,
            ..SearchConfig::default()
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(SearchConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = SearchConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
