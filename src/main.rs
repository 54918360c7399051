//! `pg_br` — PostgreSQL backup housekeeping from the command line.
//!
//! # Overview
//!
//! A thin orchestration layer around `pg_dump`, `pg_restore` and `psql`.
//! Dumps are plain files organised per database under one destination
//! directory, so listing, restoring and pruning them is just a matter of
//! looking at the filesystem.
//!
//! # Usage
//!
//! ```text
//! pg_br backup [DATABASE] [NAME]   # dump DATABASE into <dest>/DATABASE/NAME.dump
//! pg_br ls                         # list backups grouped by database
//! pg_br restore [DATABASE]         # pick a backup and restore it
//! pg_br remove                     # pick backups and delete them
//! pg_br --print-config             # show the resolved destination
//! ```
//!
//! The destination comes from `~/.pg_br.yml` (`destination: ...`) and
//! defaults to the current directory.
//!
//! # Module layout
//!
//! | Module                   | Responsibility                              |
//! |--------------------------|---------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap               |
//! | [`config`]               | `Config` struct + YAML loader               |
//! | [`paths`]                | `$VAR` / `~` expansion                      |
//! | [`registry`]             | Backup discovery and ordering               |
//! | [`selection`]            | `1,3-5` style selector parsing              |
//! | [`prompt`]               | Blocking operator prompts                   |
//! | [`runner`]               | pg_dump / pg_restore / psql arguments       |
//! | [`ui`]                   | Spinner, captured execution, formatting     |
//! | [`commands`]             | One handler per subcommand                  |

mod cli;
mod commands;
mod config;
mod paths;
mod prompt;
mod registry;
mod runner;
mod selection;
mod ui;

use std::io::IsTerminal;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Subcommand};
use commands::{backup::BackupArgs, remove::RemoveArgs, restore::RestoreArgs};
use prompt::Prompter;
use registry::Registry;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load();
    let registry = Registry::from_config(&cfg)?;

    if cli.print_config {
        println!("{cfg:#?}");
        println!("backup root: {}", registry.root().display());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut prompter = Prompter::stdio();

    match command {
        // ── pg_br backup ──────────────────────────────────────────────────────
        Subcommand::Backup {
            database,
            name,
            force,
        } => {
            let args = BackupArgs {
                database,
                name,
                force,
            };
            commands::backup::run(&registry, args, &mut prompter)?;
        },

        // ── pg_br ls ──────────────────────────────────────────────────────────
        Subcommand::Ls { flat } => {
            commands::list::run(&registry, flat)?;
        },

        // ── pg_br restore ─────────────────────────────────────────────────────
        Subcommand::Restore { database, select } => {
            commands::restore::run(&registry, RestoreArgs { database, select }, &mut prompter)?;
        },

        // ── pg_br remove ──────────────────────────────────────────────────────
        Subcommand::Remove { select, yes } => {
            commands::remove::run(&registry, RemoveArgs { select, yes }, &mut prompter)?;
        },
    }

    Ok(())
}

/// Diagnostics go to stderr.  `PG_BR_LOG` takes a full filter; otherwise the
/// level follows `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("PG_BR_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
