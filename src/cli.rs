//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and the
//! subcommand's fields are handed to the matching handler in
//! [`crate::commands`].

use clap::Parser;

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "pg_br",
    about   = "Back up, list, restore and remove PostgreSQL dumps",
    version,
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Subcommand to run.  Omit to print this help.
    #[command(subcommand)]
    pub command: Option<Subcommand>,

    /// Print the resolved configuration and backup directory, then exit.
    ///
    /// Shows `~/.pg_br.yml` after `$VAR` and `~` expansion, which makes it
    /// easy to check where backups will be written.
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Increase log verbosity (`-v` info, `-vv` debug, `-vvv` trace).
    ///
    /// `PG_BR_LOG` overrides this with a full tracing filter.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Subcommand {
    /// Dump a database into `<destination>/<database>/<name>.dump`.
    ///
    /// Without DATABASE the databases on the server are listed for
    /// selection; without NAME a timestamped name is proposed.
    Backup {
        /// Database to dump.
        database: Option<String>,

        /// Backup name, without the `.dump` extension.
        name: Option<String>,

        /// Overwrite an existing backup of the same name without asking.
        #[arg(short, long)]
        force: bool,
    },

    /// List backups grouped by database.
    #[command(visible_alias = "list")]
    Ls {
        /// List `.dump` files stored directly in the destination instead.
        #[arg(long)]
        flat: bool,
    },

    /// Restore a database from one of its backups.
    Restore {
        /// Database to restore.  Omit to choose among databases with backups.
        database: Option<String>,

        /// Number of the backup to restore, as shown in the listing
        /// (1 = newest).  Omit to choose interactively.
        #[arg(short, long, value_name = "N")]
        select: Option<String>,
    },

    /// Delete backups.
    #[command(visible_alias = "rm")]
    Remove {
        /// Backups to delete, e.g. `2`, `1,3` or `1-3,5`, numbered as in the
        /// interactive listing.  Omit to choose interactively.
        #[arg(short, long, value_name = "SELECTOR")]
        select: Option<String>,

        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

// ─── Tests ────────────────────────────────────────────────────────────────────
