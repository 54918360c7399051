//! Discovery of backup files on disk.
//!
//! The registry is a read-only view over a backup root.  Nothing is cached:
//! every call re-reads the directory, so results always reflect the
//! filesystem at the moment of the call.
//!
//! # Layouts
//!
//! ```text
//! <root>/<name>.dump              flat (legacy)
//! <root>/<database>/<name>.dump   grouped, written by `pg_br backup`
//! ```
//!
//! Only regular files ending in [`BACKUP_SUFFIX`] are recognised.  Every
//! listing is ordered newest first by creation time, ties broken by file
//! name.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use thiserror::Error;
use tracing::debug;

use crate::config::Config;

/// Extension of every file the registry recognises as a backup.
pub const BACKUP_SUFFIX: &str = ".dump";

/// Backups grouped by database name, iterated in name order.
pub type Grouped = BTreeMap<String, Vec<BackupArtifact>>;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RegistryError {
    /// A directory exists but could not be enumerated.
    #[error("cannot read backup directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The current working directory could not be determined.
    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

// ─── Artifact ─────────────────────────────────────────────────────────────────

/// A single backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    /// File name including the `.dump` suffix.
    pub name: String,
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Birth time, or the modification time where the filesystem has none.
    pub created: SystemTime,
    pub modified: SystemTime,
}

impl BackupArtifact {
    /// Name without the `.dump` suffix, as shown in listings.
    pub fn display_name(&self) -> &str {
        self.name.strip_suffix(BACKUP_SUFFIX).unwrap_or(&self.name)
    }

    fn from_path(path: PathBuf) -> io::Result<Option<Self>> {
        let meta = fs::metadata(&path)?;
        if !meta.is_file() {
            return Ok(None);
        }
        let modified = meta.modified()?;
        let created = meta.created().unwrap_or(modified);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some(Self {
            name,
            path,
            size: meta.len(),
            created,
            modified,
        }))
    }
}

/// Newest first; equal timestamps fall back to name order.
pub fn newest_first(a: &BackupArtifact, b: &BackupArtifact) -> Ordering {
    b.created.cmp(&a.created).then_with(|| a.name.cmp(&b.name))
}

// ─── Root resolution ──────────────────────────────────────────────────────────

/// Directory the registry operates on: the configured destination made
/// absolute, or the current working directory.
pub fn backup_root(cfg: &Config) -> Result<PathBuf, RegistryError> {
    match cfg.destination.as_deref() {
        Some(dest) => std::path::absolute(dest).map_err(RegistryError::CurrentDir),
        None => std::env::current_dir().map_err(RegistryError::CurrentDir),
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

/// Read-only view over a backup root.
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Registry rooted at [`backup_root`] for `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self, RegistryError> {
        backup_root(cfg).map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the backups of `database`.
    pub fn database_dir(&self, database: &str) -> PathBuf {
        self.root.join(database)
    }

    /// Backups stored directly under the root.
    pub fn list_flat(&self) -> Result<Vec<BackupArtifact>, RegistryError> {
        list_dir(&self.root)
    }

    /// Backups stored under `<root>/<database>`.
    pub fn list_for_database(&self, database: &str) -> Result<Vec<BackupArtifact>, RegistryError> {
        list_dir(&self.database_dir(database))
    }

    /// Backups of every database that has at least one.
    ///
    /// Each immediate subdirectory of the root is a database; plain files at
    /// the top level are not part of any group.
    pub fn list_grouped(&self) -> Result<Grouped, RegistryError> {
        let mut groups = Grouped::new();

        for entry in read_dir(&self.root)? {
            let path = entry.path();
            // Follow symlinks so a linked database directory still counts.
            if !fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
                continue;
            }
            let artifacts = list_dir(&path)?;
            if artifacts.is_empty() {
                continue;
            }
            let database = entry.file_name().to_string_lossy().into_owned();
            groups.insert(database, artifacts);
        }

        Ok(groups)
    }
}

/// Flatten grouped backups into one list in display order (database name,
/// then newest first), pairing each backup with its database.
pub fn flatten(groups: &Grouped) -> Vec<(&str, &BackupArtifact)> {
    groups
        .iter()
        .flat_map(|(db, artifacts)| artifacts.iter().map(move |a| (db.as_str(), a)))
        .collect()
}

// ─── Directory scanning ───────────────────────────────────────────────────────

/// Entries of `dir`; an absent directory has none.
fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, RegistryError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(RegistryError::ReadDir {
                path: dir.to_path_buf(),
                source,
            });
        },
    };

    entries
        .collect::<io::Result<Vec<_>>>()
        .map_err(|source| RegistryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })
}

fn list_dir(dir: &Path) -> Result<Vec<BackupArtifact>, RegistryError> {
    let mut artifacts = Vec::new();

    for entry in read_dir(dir)? {
        if !entry.file_name().to_string_lossy().ends_with(BACKUP_SUFFIX) {
            continue;
        }
        let path = entry.path();
        match BackupArtifact::from_path(path.clone()) {
            Ok(Some(artifact)) => artifacts.push(artifact),
            Ok(None) => {},
            Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable entry"),
        }
    }

    artifacts.sort_by(newest_first);
    Ok(artifacts)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    /// Create `names` under `dir` in order, far enough apart that their
    /// timestamps differ.
    fn touch_in_order(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            fs::write(dir.join(name), name.as_bytes()).unwrap();
            thread::sleep(Duration::from_millis(20));
        }
    }

    fn names(artifacts: &[BackupArtifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.name.as_str()).collect()
    }

    fn artifact(name: &str, secs: u64) -> BackupArtifact {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        BackupArtifact {
            name: name.into(),
            path: PathBuf::from("/bk").join(name),
            size: 0,
            created: t,
            modified: t,
        }
    }

    // ── ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn newest_first_orders_by_creation_time() {
        let mut v = vec![artifact("old.dump", 1), artifact("new.dump", 2)];
        v.sort_by(newest_first);
        assert_eq!(names(&v), ["new.dump", "old.dump"]);
    }

    #[test]
    fn newest_first_breaks_ties_by_name() {
        let mut v = vec![
            artifact("c.dump", 5),
            artifact("a.dump", 5),
            artifact("b.dump", 5),
            artifact("z.dump", 9),
        ];
        v.sort_by(newest_first);
        assert_eq!(names(&v), ["z.dump", "a.dump", "b.dump", "c.dump"]);
    }

    #[test]
    fn display_name_strips_suffix() {
        assert_eq!(artifact("nightly.dump", 0).display_name(), "nightly");
    }

    // ── backup_root ───────────────────────────────────────────────────────────

    #[test]
    fn root_defaults_to_current_dir() {
        let root = backup_root(&Config::default()).unwrap();
        assert_eq!(root, std::env::current_dir().unwrap());
    }

    #[test]
    fn root_uses_absolute_destination() {
        let cfg = Config {
            destination: Some("/tmp/bk".into()),
        };
        assert_eq!(backup_root(&cfg).unwrap(), PathBuf::from("/tmp/bk"));
    }

    #[test]
    fn relative_destination_is_made_absolute() {
        let cfg = Config {
            destination: Some("rel/bk".into()),
        };
        let root = backup_root(&cfg).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("rel/bk"));
    }

    // ── list_flat ─────────────────────────────────────────────────────────────

    #[test]
    fn flat_listing_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reg = Registry::new(dir.path().join("absent"));
        assert!(reg.list_flat().unwrap().is_empty());
        assert!(!dir.path().join("absent").exists(), "reads never create");
    }

    #[test]
    fn flat_listing_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(dir.path(), &["a.dump", "b.dump", "c.txt", "d.dump.bak"]);

        let listed = Registry::new(dir.path()).list_flat().unwrap();
        let mut got = names(&listed);
        got.sort_unstable();
        assert_eq!(got, ["a.dump", "b.dump"]);
    }

    #[test]
    fn flat_listing_ignores_directories_named_like_dumps() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("weird.dump")).unwrap();
        touch_in_order(dir.path(), &["real.dump"]);

        let got = Registry::new(dir.path()).list_flat().unwrap();
        assert_eq!(names(&got), ["real.dump"]);
    }

    #[test]
    fn flat_listing_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(dir.path(), &["first.dump", "second.dump", "third.dump"]);

        let got = Registry::new(dir.path()).list_flat().unwrap();
        assert_eq!(names(&got), ["third.dump", "second.dump", "first.dump"]);
    }

    #[test]
    fn flat_listing_records_size_and_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.dump"), vec![0u8; 1234]).unwrap();

        let got = Registry::new(dir.path()).list_flat().unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].size, 1234);
        assert_eq!(got[0].path, dir.path().join("x.dump"));
    }

    #[test]
    fn flat_listing_skips_dangling_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(dir.path(), &["ok.dump"]);
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken.dump"))
            .unwrap();

        let got = Registry::new(dir.path()).list_flat().unwrap();
        assert_eq!(names(&got), ["ok.dump"]);
    }

    #[test]
    fn flat_listing_reflects_later_changes() {
        let dir = tempfile::tempdir().unwrap();
        let reg = Registry::new(dir.path());
        assert!(reg.list_flat().unwrap().is_empty());

        touch_in_order(dir.path(), &["late.dump"]);
        assert_eq!(names(&reg.list_flat().unwrap()), ["late.dump"]);
    }

    // ── list_grouped ──────────────────────────────────────────────────────────

    #[test]
    fn grouped_listing_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reg = Registry::new(dir.path().join("absent"));
        assert!(reg.list_grouped().unwrap().is_empty());
    }

    #[test]
    fn grouped_listing_omits_empty_databases() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(&dir.path().join("users"), &["u1.dump", "u2.dump"]);
        touch_in_order(&dir.path().join("orders"), &["notes.txt"]);
        fs::create_dir(dir.path().join("empty")).unwrap();

        let groups = Registry::new(dir.path()).list_grouped().unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["users"]);
        assert_eq!(names(&groups["users"]), ["u2.dump", "u1.dump"]);
    }

    #[test]
    fn grouped_listing_ignores_top_level_files() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(dir.path(), &["stray.dump"]);
        touch_in_order(&dir.path().join("shop"), &["s.dump"]);

        let groups = Registry::new(dir.path()).list_grouped().unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key("shop"));
    }

    #[test]
    fn grouped_listing_is_ordered_by_database_name() {
        let dir = tempfile::tempdir().unwrap();
        for db in ["zeta", "alpha", "mid"] {
            touch_in_order(&dir.path().join(db), &["x.dump"]);
        }

        let groups = Registry::new(dir.path()).list_grouped().unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn grouped_listing_does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(&dir.path().join("db").join("nested"), &["deep.dump"]);

        let groups = Registry::new(dir.path()).list_grouped().unwrap();
        assert!(groups.is_empty());
    }

    // ── list_for_database ─────────────────────────────────────────────────────

    #[test]
    fn database_listing_of_unknown_database_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reg = Registry::new(dir.path());
        assert!(reg.list_for_database("nobody").unwrap().is_empty());
    }

    #[test]
    fn database_listing_is_scoped_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch_in_order(&dir.path().join("users"), &["u1.dump", "u2.dump", "u3.txt"]);
        touch_in_order(&dir.path().join("orders"), &["o1.dump"]);

        let got = Registry::new(dir.path()).list_for_database("users").unwrap();
        assert_eq!(names(&got), ["u2.dump", "u1.dump"]);
    }

    // ── flatten ───────────────────────────────────────────────────────────────

    #[test]
    fn flatten_keeps_database_then_time_order() {
        let mut groups = Grouped::new();
        groups.insert("b".into(), vec![artifact("b2.dump", 2), artifact("b1.dump", 1)]);
        groups.insert("a".into(), vec![artifact("a1.dump", 1)]);

        let flat: Vec<(&str, &str)> = flatten(&groups)
            .into_iter()
            .map(|(db, a)| (db, a.name.as_str()))
            .collect();
        assert_eq!(flat, [("a", "a1.dump"), ("b", "b2.dump"), ("b", "b1.dump")]);
    }

    // ── errors ────────────────────────────────────────────────────────────────

    #[test]
    fn root_that_is_a_file_is_an_enumeration_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        let err = Registry::new(&file).list_flat().unwrap_err();
        assert!(matches!(err, RegistryError::ReadDir { .. }));
        assert!(err.to_string().contains("not-a-dir"));
    }
}
