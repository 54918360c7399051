//! Argument construction for the PostgreSQL client tools.
//!
//! Nothing here executes a process; [`crate::ui`] owns execution so the
//! spinner can hold the terminal while a tool runs.  Every builder is pure and
//! unit-testable without PostgreSQL installed.
//!
//! All tools talk to the server on [`PG_HOST`] and rely on the usual libpq
//! environment (`PGUSER`, `PGPASSWORD`, `~/.pgpass`) for credentials.

use std::path::Path;

/// Host every client tool connects to.
pub const PG_HOST: &str = "localhost";

/// Query listing the databases an operator may back up.
const LIST_DATABASES_SQL: &str =
    "SELECT datname FROM pg_database WHERE datistemplate = false ORDER BY datname";

// ─── pg_dump ──────────────────────────────────────────────────────────────────

/// `pg_dump` in custom format, without ownership or privilege statements so
/// the dump restores cleanly into a database owned by someone else.
pub fn pg_dump_args(database: &str, target: &Path) -> Vec<String> {
    vec![
        "pg_dump".into(),
        "-Fc".into(),
        "--no-acl".into(),
        "--no-owner".into(),
        "-h".into(),
        PG_HOST.into(),
        "-f".into(),
        target.display().to_string(),
        database.into(),
    ]
}

// ─── pg_restore ───────────────────────────────────────────────────────────────

/// `pg_restore` dropping existing objects before recreating them.
pub fn pg_restore_args(database: &str, source: &Path) -> Vec<String> {
    vec![
        "pg_restore".into(),
        "--verbose".into(),
        "--clean".into(),
        "--no-acl".into(),
        "--no-owner".into(),
        "-h".into(),
        PG_HOST.into(),
        "-d".into(),
        database.into(),
        source.display().to_string(),
    ]
}

// ─── psql ─────────────────────────────────────────────────────────────────────

/// `psql` printing one non-template database name per line.
pub fn psql_list_databases_args() -> Vec<String> {
    vec![
        "psql".into(),
        "-h".into(),
        PG_HOST.into(),
        "-At".into(),
        "-c".into(),
        LIST_DATABASES_SQL.into(),
    ]
}

/// Database names from the output of [`psql_list_databases_args`].
pub fn parse_database_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
