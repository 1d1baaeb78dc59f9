use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Framework names and method conventions the engine keys on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MigrationConfig {
    #[serde(default)]
    pub legacy: LegacyFramework,
    #[serde(default)]
    pub modern: ModernFramework,
    #[serde(default)]
    pub test_methods: TestMethodNaming,
    #[serde(default)]
    pub lifecycle: LifecycleMethods,
}

/// The framework being migrated away from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LegacyFramework {
    pub module: String,
    pub base_type: String,
    /// Callee prefixes that mark a file as legacy code.
    pub call_prefixes: Vec<String>,
    /// Calls that make a whole file unmigratable.
    pub unsupported_calls: Vec<String>,
}

/// The framework being migrated to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModernFramework {
    pub module: String,
    pub test_attribute: String,
}

/// How test methods are recognised and renamed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestMethodNaming {
    pub prefix: String,
    pub excluded_prefix: String,
    pub separator_prefix: String,
}

/// Setup and teardown method names and their forwarding calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LifecycleMethods {
    pub setup: Vec<String>,
    pub teardown: Vec<String>,
    pub setup_forwarding: String,
    pub teardown_forwarding: String,
}

/// Errors returned when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Default for LegacyFramework {
    fn default() -> Self {
        Self {
            module: "XCTest".to_string(),
            base_type: "XCTestCase".to_string(),
            call_prefixes: vec![
                "XCTAssert".to_string(),
                "XCTFail".to_string(),
                "XCTUnwrap".to_string(),
            ],
            unsupported_calls: vec!["expectation".to_string(), "waitForExpectations".to_string()],
        }
    }
}

impl Default for ModernFramework {
    fn default() -> Self {
        Self {
            module: "Testing".to_string(),
            test_attribute: "Test".to_string(),
        }
    }
}

impl Default for TestMethodNaming {
    fn default() -> Self {
        Self {
            prefix: "test".to_string(),
            excluded_prefix: "testable".to_string(),
            separator_prefix: "test_".to_string(),
        }
    }
}

impl Default for LifecycleMethods {
    fn default() -> Self {
        Self {
            setup: vec!["setUp".to_string(), "setUpWithError".to_string()],
            teardown: vec!["tearDown".to_string(), "tearDownWithError".to_string()],
            setup_forwarding: "super.setUp".to_string(),
            teardown_forwarding: "super.tearDown".to_string(),
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        default_config()
    }
}

impl TestMethodNaming {
    /// `testFoo` and `test_foo` are tests; `testableThing` is not.
    pub fn is_test(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && !name.starts_with(&self.excluded_prefix)
    }
}

impl LifecycleMethods {
    pub fn is_setup(&self, name: &str) -> bool {
        self.setup.iter().any(|setup| setup == name)
    }

    pub fn is_teardown(&self, name: &str) -> bool {
        self.teardown.iter().any(|teardown| teardown == name)
    }
}

/// Load a configuration file. Keys it leaves out keep their defaults.
pub fn load_config(path: &Path) -> Result<MigrationConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_config(&raw, path.display().to_string())
}

/// Built-in configuration.
pub fn default_config() -> MigrationConfig {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));
    parse_config(embedded, "embedded config".to_string()).unwrap_or_else(|_| fallback_config())
}

fn parse_config(raw: &str, path: String) -> Result<MigrationConfig, ConfigLoadError> {
    toml::from_str(raw).map_err(|source| ConfigLoadError::Parse { path, source })
}

fn fallback_config() -> MigrationConfig {
    MigrationConfig {
        legacy: LegacyFramework::default(),
        modern: ModernFramework::default(),
        test_methods: TestMethodNaming::default(),
        lifecycle: LifecycleMethods::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_fallback() {
        assert_eq!(default_config(), fallback_config());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("migrate.toml");
        fs::write(&path, "[modern]\ntest_attribute = \"Suite.Test\"\n").expect("write config");

        let config = load_config(&path).expect("config should load");
        assert_eq!(config.modern.test_attribute, "Suite.Test");
        assert_eq!(config.modern.module, "Testing");
        assert_eq!(config.legacy, LegacyFramework::default());
    }

    #[test]
    fn load_errors_name_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[legacy\nmodule = 1").expect("write config");

        let err = load_config(&path).expect_err("malformed config should fail");
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));

        let missing = load_config(&dir.path().join("missing.toml")).expect_err("missing file");
        assert!(matches!(missing, ConfigLoadError::Io { .. }));
    }

    #[test]
    fn test_method_prefixes() {
        let naming = TestMethodNaming::default();
        assert!(naming.is_test("testAddition"));
        assert!(naming.is_test("test_addition"));
        assert!(!naming.is_test("testableHelper"));
        assert!(!naming.is_test("helperTest"));
    }
}
