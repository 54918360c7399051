//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File         | Invocation          | Description                          |
//! |--------------|---------------------|--------------------------------------|
//! | `backup.rs`  | `pg_br backup`      | Dump a database with `pg_dump`       |
//! | `list.rs`    | `pg_br ls`          | Show backups grouped by database     |
//! | `restore.rs` | `pg_br restore`     | Restore a backup with `pg_restore`   |
//! | `remove.rs`  | `pg_br remove`      | Delete selected backups              |

use anyhow::{Result, bail};

pub mod backup;
pub mod list;
pub mod remove;
pub mod restore;

/// Reject database names that would escape the backup root when used as a
/// directory name.
pub fn validate_database(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("invalid database name: {name:?}");
    }
    Ok(())
}
