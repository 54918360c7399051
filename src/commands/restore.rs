//! `pg_br restore` — load one of a database's backups back into it.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use tracing::info;

use crate::{
    commands::validate_database,
    prompt::Prompter,
    registry::Registry,
    runner::pg_restore_args,
    selection,
    ui::{self, status_line},
};

/// Arguments of `pg_br restore`.
#[derive(Debug, Default)]
pub struct RestoreArgs {
    pub database: Option<String>,
    /// Pre-supplied answer to the file selection prompt.
    pub select: Option<String>,
}

pub fn run<R: BufRead, W: Write>(
    registry: &Registry,
    args: RestoreArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let database = match args.database {
        Some(db) => db,
        None => match choose_database(registry, prompter)? {
            Some(db) => {
                writeln!(prompter.output(), "Selected database: {db}")?;
                db
            },
            None => return Ok(()),
        },
    };
    validate_database(&database)?;

    writeln!(prompter.output(), "Preparing to restore database '{database}'...")?;

    let backups = registry.list_for_database(&database)?;
    if backups.is_empty() {
        writeln!(
            prompter.output(),
            "No backup files found for database '{database}'."
        )?;
        writeln!(prompter.output(), "Use \"pg_br ls\" to check available backups.")?;
        return Ok(());
    }

    // The index refers to `backups` exactly as listed above; it is never
    // re-resolved against a fresh listing.
    let idx = match args.select {
        Some(answer) => selection::parse_single(&answer, backups.len())? - 1,
        None => {
            let labels: Vec<String> = backups.iter().map(|b| b.name.clone()).collect();
            prompter.select_one(
                "Available backup files:",
                &labels,
                "Select a backup file (enter number): ",
            )?
        },
    };
    let source = &backups[idx].path;

    writeln!(prompter.output())?;
    writeln!(prompter.output(), "Selected backup file: {}", source.display())?;
    writeln!(prompter.output(), "Restoring to database '{database}'...")?;

    let cmd = pg_restore_args(&database, source);
    info!(command = %cmd.join(" "), "running pg_restore");
    let outcome = ui::run_stage(&format!("pg_restore {database}"), &cmd);
    outcome.print();
    if outcome.failed() {
        bail!("restore of database '{database}' failed");
    }

    status_line(
        prompter.output(),
        true,
        &format!(
            "Database '{database}' restored successfully from {}",
            source.display()
        ),
    )?;
    Ok(())
}

/// Let the operator pick among the databases that have backups.
///
/// Returns `None` (after saying so) when there is nothing to restore.
fn choose_database<R: BufRead, W: Write>(
    registry: &Registry,
    prompter: &mut Prompter<R, W>,
) -> Result<Option<String>> {
    let databases: Vec<String> = registry.list_grouped()?.into_keys().collect();
    if databases.is_empty() {
        writeln!(
            prompter.output(),
            "No backup files found in {}.",
            registry.root().display()
        )?;
        return Ok(None);
    }

    let idx = prompter.select_one(
        "Databases with backups:",
        &databases,
        "Select a database (enter number): ",
    )?;
    Ok(Some(databases[idx].clone()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
