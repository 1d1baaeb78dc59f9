use std::fs;
use std::path::Path;

use swift_cst_core::{parse, render, SyntaxError};
use tracing::debug;

use crate::config::MigrationConfig;
use crate::detect::find_legacy_marker;
use crate::error::MigrationError;
use crate::reconcile::reconcile;
use crate::rewrite::rewrite_file;
use crate::validate::validate;

/// Runs the migration pipeline with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    config: MigrationConfig,
}

impl Migrator {
    pub fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrate one source file's text.
    ///
    /// Input without any legacy marker is returned unchanged, even when it
    /// does not parse cleanly. Otherwise the file must parse without errors
    /// and must not use an unsupported construct; on any error no output is
    /// produced.
    pub fn migrate(&self, source: &str) -> Result<String, MigrationError> {
        let parsed = parse(source);
        let Some(marker) = find_legacy_marker(&parsed.tree, &self.config) else {
            debug!("no legacy markers, leaving input unchanged");
            return Ok(source.to_string());
        };
        debug!(?marker, "legacy code detected");

        if let Some(error) = parsed.errors.first() {
            return Err(MigrationError::InvalidSyntax(describe_syntax_error(
                source, error,
            )));
        }
        validate(&parsed.tree, &self.config)?;
        debug!("validation passed");

        let tree = rewrite_file(parsed.tree, &self.config);
        debug!("structural rewrite done");
        let tree = reconcile(tree);
        debug!("formatting reconciled");
        Ok(render(&tree))
    }

    /// Read `path` and migrate its contents. Writing is left to the caller.
    pub fn migrate_file(&self, path: &Path) -> Result<String, MigrationError> {
        let source = fs::read_to_string(path).map_err(|source| MigrationError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.migrate(&source)
    }
}

/// Migrate with the built-in configuration.
pub fn migrate(source: &str) -> Result<String, MigrationError> {
    Migrator::default().migrate(source)
}

/// `message at line:column`, both 1-based.
fn describe_syntax_error(source: &str, error: &SyntaxError) -> String {
    let offset = usize::from(error.offset).min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    format!("{} at {line}:{column}", error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn input_without_markers_is_returned_as_is() {
        let source = "struct Point {\n    var x = 0\n}\n";
        assert_eq!(migrate(source).unwrap(), source);
    }

    #[test]
    fn broken_input_without_markers_is_returned_as_is() {
        let source = "let a = 1)\n";
        assert_eq!(migrate(source).unwrap(), source);
    }

    #[test]
    fn broken_legacy_input_reports_position() {
        let err = migrate("import XCTest\n\nlet a = 1)\n").unwrap_err();
        let message = match err {
            MigrationError::InvalidSyntax(message) => message,
            other => panic!("expected invalid syntax, got {other:?}"),
        };
        assert!(message.ends_with(" at 3:10"), "{message}");
    }

    #[test]
    fn migrate_file_reports_missing_file() {
        let err = Migrator::default()
            .migrate_file(Path::new("/definitely/not/here.swift"))
            .unwrap_err();
        assert!(matches!(err, MigrationError::FileRead { .. }));
    }

    #[test]
    fn custom_config_changes_the_target_module() {
        let mut config = MigrationConfig::default();
        config.modern.module = "ModernTesting".into();
        let output = Migrator::new(config).migrate("import XCTest\n").unwrap();
        assert_eq!(output, "import ModernTesting\n");
    }
}
