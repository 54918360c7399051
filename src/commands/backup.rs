//! `pg_br backup` — dump a database into the backup directory.
//!
//! The dump lands in `<root>/<database>/<name>.dump`; the database directory
//! is created on demand.  Both the database and the name may be omitted, in
//! which case they are asked for.

use std::{
    fs,
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use tracing::info;

use crate::{
    commands::validate_database,
    prompt::Prompter,
    registry::{BACKUP_SUFFIX, Registry},
    runner::{parse_database_list, pg_dump_args, psql_list_databases_args},
    ui::{self, status_line},
};

/// Arguments of `pg_br backup`.
#[derive(Debug, Default)]
pub struct BackupArgs {
    pub database: Option<String>,
    pub name: Option<String>,
    pub force: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

pub fn run<R: BufRead, W: Write>(
    registry: &Registry,
    args: BackupArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let database = match args.database {
        Some(db) => db,
        None => {
            let db = choose_database(prompter)?;
            writeln!(prompter.output(), "Selected database: {db}")?;
            db
        },
    };
    validate_database(&database)?;

    let name = match args.name {
        Some(name) => name,
        None => prompter.backup_name(&default_backup_name(&database, Local::now()))?,
    };
    let file_name = format!("{}{BACKUP_SUFFIX}", normalize_name(&name)?);

    let dir = registry.database_dir(&database);
    if !dir.exists() {
        writeln!(prompter.output(), "Creating backup directory: {}", dir.display())?;
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let target = dir.join(&file_name);
    if target.exists() && !args.force && !prompter.confirm_overwrite(&file_name)? {
        writeln!(prompter.output(), "Backup cancelled.")?;
        return Ok(());
    }

    writeln!(
        prompter.output(),
        "Creating backup of database '{database}' as '{file_name}'..."
    )?;
    dump(&database, target, prompter.output())
}

fn dump(database: &str, target: PathBuf, out: &mut impl Write) -> Result<()> {
    let cmd = pg_dump_args(database, &target);
    info!(command = %cmd.join(" "), "running pg_dump");

    let outcome = ui::run_stage(&format!("pg_dump {database}"), &cmd);
    outcome.print();
    if outcome.failed() {
        bail!("backup of database '{database}' failed");
    }
    if !target.exists() {
        bail!("backup file was not created: {}", target.display());
    }

    status_line(
        out,
        true,
        &format!("Backup created successfully: {}", target.display()),
    )?;
    Ok(())
}

// ─── Interactive helpers ──────────────────────────────────────────────────────

/// Ask the server for its databases and let the operator pick one.
fn choose_database<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<String> {
    let (ok, stdout, stderr) = ui::run_captured(&psql_list_databases_args())?;
    if !ok {
        bail!("could not list databases: {}", stderr.trim());
    }

    let databases = parse_database_list(&stdout);
    if databases.is_empty() {
        bail!("no databases found on the server");
    }

    let idx = prompter.select_one(
        "Available databases:",
        &databases,
        "Select a database (enter number): ",
    )?;
    Ok(databases[idx].clone())
}

/// `<database>_<YYYYmmdd_HHMMSS>`.
pub fn default_backup_name(database: &str, now: DateTime<Local>) -> String {
    format!("{database}_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Trim `name` and drop a trailing `.dump`; reject names that are empty or
/// would leave the database directory.
pub fn normalize_name(name: &str) -> Result<&str> {
    let name = name.trim();
    let name = name.strip_suffix(BACKUP_SUFFIX).unwrap_or(name);
    if name.is_empty() {
        bail!("backup name must not be empty");
    }
    if name.contains(['/', '\\']) {
        bail!("backup name must not contain a path separator: {name:?}");
    }
    Ok(name)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
