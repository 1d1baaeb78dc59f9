//! Migrate XCTest suites to Swift Testing.
//!
//! The engine rewrites one Swift source file at a time and keeps every
//! byte it does not need to change: comments, blank lines, indentation and
//! unrelated declarations come out exactly as they went in.
//!
//! # Architecture
//!
//! ## Pipeline
//!
//! - [`detect`]: Decide whether a file uses the legacy framework at all
//! - [`validate`]: Reject files that use constructs with no mechanical translation
//! - [`scope`]: Per-suite analysis: value or reference representation, spacing
//! - [`rewrite`]: Imports, suite headers, lifecycle hooks, test methods, assertions
//! - [`reconcile`]: Import sorting and spacing fixes after the rewrite
//! - [`migrator`]: Runs the stages in order
//!
//! ## Surroundings
//!
//! - [`config`]: Framework names and naming rules, loadable from TOML
//! - [`error`]: Closed error taxonomy with recovery hints
//! - [`batch`]: Folder mode: parallel per-file migration with a summary
//! - [`report`]: Text and JSON rendering of batch summaries
//!
//! # Pipeline
//!
//! 1. **Parse** the file into a lossless tree (`swift-cst-core`)
//! 2. **Detect** legacy markers; files without any are returned unchanged
//! 3. **Validate**: syntax errors and unsupported constructs stop here
//! 4. **Rewrite** every legacy construct
//! 5. **Reconcile** formatting
//! 6. **Render** the tree back to text
//!
//! # Examples
//!
//! ```
//! let source = "import XCTest\n\nfinal class MathTests: XCTestCase {\n    func testAdd() {\n        XCTAssertEqual(total, 2)\n    }\n}\n";
//! let migrated = xctest_migrate::migrate(source).unwrap();
//! assert!(migrated.contains("import Testing"));
//! assert!(migrated.contains("struct MathTests {"));
//! assert!(migrated.contains("#expect(total == 2)"));
//! ```

pub mod batch;
pub mod config;
pub mod detect;
pub mod error;
pub mod migrator;
pub mod reconcile;
pub mod report;
pub mod rewrite;
pub mod scope;
pub mod validate;

pub use config::MigrationConfig;
pub use error::MigrationError;
pub use migrator::{migrate, Migrator};
