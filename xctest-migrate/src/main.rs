use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use xctest_migrate::batch::{backup_path, collect_swift_files, run_batch, BatchOptions};
use xctest_migrate::config::{load_config, MigrationConfig};
use xctest_migrate::report::{render_batch_json, render_batch_text};
use xctest_migrate::Migrator;

mod cli;
mod logging;
mod path_guard;

use cli::{Cli, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MigrationConfig::default(),
    };
    let migrator = Migrator::new(config);

    match (&cli.file, &cli.folder) {
        (Some(file), _) => run_file(&migrator, file, &cli),
        (None, Some(folder)) => run_folder(&migrator, folder, &cli),
        (None, None) => bail!("either --file or --folder is required"),
    }
}

fn run_file(migrator: &Migrator, input: &Path, cli: &Cli) -> Result<()> {
    if !input.is_file() {
        bail!("file not found: {}", input.display());
    }
    let source =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let migrated = match migrator.migrate(&source) {
        Ok(migrated) => migrated,
        Err(err) => bail!(
            "failed to migrate {}: {err}\n{}",
            input.display(),
            err.recovery_suggestion()
        ),
    };

    if cli.dry_run {
        print!("{migrated}");
        return Ok(());
    }

    let output = cli.output.as_deref().unwrap_or(input);
    let in_place = path_guard::same_file(output, input)?;
    if migrated == source && in_place {
        println!("Already migrated: {}", input.display());
        return Ok(());
    }

    if cli.backup && output.exists() {
        let backup = backup_path(output);
        path_guard::ensure_distinct(&backup, input)?;
        fs::copy(output, &backup)
            .with_context(|| format!("failed to write backup {}", backup.display()))?;
        debug!(backup = %backup.display(), "wrote backup");
    }
    fs::write(output, &migrated)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Successfully migrated {}", output.display());
    Ok(())
}

fn run_folder(migrator: &Migrator, folder: &Path, cli: &Cli) -> Result<()> {
    if !folder.is_dir() {
        bail!("folder not found: {}", folder.display());
    }
    let files = collect_swift_files(folder);
    debug!(count = files.len(), folder = %folder.display(), "collected swift files");

    let options = BatchOptions {
        dry_run: cli.dry_run,
        backup: cli.backup,
    };
    let summary = run_batch(migrator, &files, options);
    match cli.format {
        OutputFormat::Text => println!("{}", render_batch_text(&summary)),
        OutputFormat::Json => println!(
            "{}",
            render_batch_json(&summary).context("failed to serialize summary")?
        ),
    }
    Ok(())
}
