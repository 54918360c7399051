//! Configuration types and loading logic.
//!
//! The only configuration source is `~/.pg_br.yml`.  The file is entirely
//! optional: without it `pg_br` stores and looks for backups in the current
//! working directory.
//!
//! # File format
//!
//! ```yaml
//! destination: ~/backups/postgres   # $VAR, ${VAR} and a leading ~ are expanded
//! ```
//!
//! Unknown keys are ignored so older binaries keep working with newer files.
//! A file that cannot be read or parsed never aborts a command: a warning is
//! logged and the empty configuration is used instead.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::paths;

/// File name of the per-user configuration, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".pg_br.yml";

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Parsed contents of `~/.pg_br.yml`.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the backups.
    ///
    /// After [`load`] / [`load_from`] this is already expanded and never
    /// empty; `None` means "use the current working directory".
    #[serde(default)]
    pub destination: Option<String>,
}

impl Config {
    /// Expand `destination` and drop it when it is empty.
    fn expanded(mut self) -> Self {
        self.destination = self
            .destination
            .filter(|d| !d.is_empty())
            .map(|d| paths::expand(&d));
        self
    }
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Location of the configuration file, if a home directory is known.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Load the per-user configuration.
///
/// Never fails; see [`load_from`].
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            debug!("no home directory; using empty configuration");
            Config::default()
        },
    }
}

/// Load the configuration stored at `path`.
///
/// A missing file yields the empty configuration silently.  A file that
/// exists but cannot be read or parsed yields the empty configuration and a
/// warning on stderr.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found");
        return Config::default();
    }

    match read_config(path) {
        Ok(cfg) => cfg.expanded(),
        Err(e) => {
            warn!("Failed to load config file {}: {e:#}", path.display());
            Config::default()
        },
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    parse_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Decode a YAML document into a [`Config`] without expanding anything.
pub fn parse_str(text: &str) -> Result<Config> {
    let raw = ::config::Config::builder()
        .add_source(::config::File::from_str(text, ::config::FileFormat::Yaml))
        .build()?;

    Ok(raw.try_deserialize()?)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, body).unwrap();
        path
    }

    // ── parse_str ─────────────────────────────────────────────────────────────

    #[test]
    fn empty_document_has_no_destination() {
        let cfg = parse_str("").expect("empty yaml should parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn destination_is_read() {
        let cfg = parse_str("destination: /var/backups/pg\n").unwrap();
        assert_eq!(cfg.destination.as_deref(), Some("/var/backups/pg"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = parse_str(
            "destination: /srv/bk\nretention: 7\nhosts:\n  - a\n  - b\n",
        )
        .unwrap();
        assert_eq!(cfg.destination.as_deref(), Some("/srv/bk"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(parse_str("destination: [unclosed, list").is_err());
    }

    // ── load_from ─────────────────────────────────────────────────────────────

    #[test]
    fn missing_file_yields_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join(CONFIG_FILE_NAME));
        assert!(cfg.destination.is_none());
    }

    #[test]
    fn malformed_file_yields_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "destination: [unclosed, list");
        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn unreadable_path_yields_empty_config() {
        // A directory where the file should be: exists, but cannot be read.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::create_dir(&path).unwrap();
        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn absolute_destination_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "destination: /tmp/bk\n");
        assert_eq!(load_from(&path).destination.as_deref(), Some("/tmp/bk"));
    }

    #[test]
    fn empty_destination_counts_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "destination: \"\"\n");
        assert!(load_from(&path).destination.is_none());
    }

    #[test]
    fn tilde_destination_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "destination: ~/pg-dumps\n");
        assert_eq!(
            load_from(&path).destination,
            Some(format!("{}/pg-dumps", home.display()))
        );
    }

    #[test]
    fn unset_variable_destination_stays_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "destination: /tmp/$PG_BR_TEST_NEVER_SET_42/bak\n");
        assert_eq!(
            load_from(&path).destination.as_deref(),
            Some("/tmp/$PG_BR_TEST_NEVER_SET_42/bak")
        );
    }
}
