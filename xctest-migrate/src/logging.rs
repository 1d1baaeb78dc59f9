//! Tracing setup for the command-line tool.
//!
//! `XCTEST_MIGRATE_LOG` takes precedence over `RUST_LOG`; both use the
//! `RUST_LOG` directive syntax. Without either, warnings are shown, or
//! debug events with `--verbose`. Output goes to stderr so migrated text
//! printed by `--dry-run` stays clean on stdout.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "XCTEST_MIGRATE_LOG";

fn build_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        return EnvFilter::builder().parse_lossy(directives);
    }
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(if verbose { "debug" } else { "warn" })
}

pub fn init_tracing(verbose: bool) {
    // A second init (tests driving main twice) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
