//! `pg_br remove` — delete selected backups.
//!
//! Every backup of every database is shown as one numbered list (databases
//! in name order, newest backup first) labelled `[<database>] <file>`.  The
//! selector is evaluated against that list as shown; the directory is not
//! re-read between listing and deletion, so a file removed by someone else
//! in the meantime shows up as a failed removal.

use std::{
    fs,
    io::{self, BufRead, Write},
};

use anyhow::{Result, bail};
use tracing::debug;

use crate::{
    prompt::Prompter,
    registry::{self, BackupArtifact, Registry},
    selection,
    ui::status_line,
};

/// Arguments of `pg_br remove`.
#[derive(Debug, Default)]
pub struct RemoveArgs {
    /// Pre-supplied selector, e.g. `1-3,5`.
    pub select: Option<String>,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

/// Tally of a deletion pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: usize,
    pub failed: usize,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

pub fn run<R: BufRead, W: Write>(
    registry: &Registry,
    args: RemoveArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    writeln!(prompter.output(), "Preparing to remove backup files...")?;

    let groups = registry.list_grouped()?;
    let candidates = registry::flatten(&groups);
    if candidates.is_empty() {
        writeln!(
            prompter.output(),
            "No backup files found in the destination directory."
        )?;
        writeln!(prompter.output(), "Use \"pg_br ls\" to check available backups.")?;
        return Ok(());
    }

    let labels: Vec<String> = candidates.iter().map(|(db, a)| label(db, a)).collect();

    let chosen: Vec<&(&str, &BackupArtifact)> = match args.select {
        Some(selector) => selection::pick(&selector, &candidates)?,
        None => prompter
            .select_many(
                "Available backup files:",
                &labels,
                "Select files to remove (e.g. \"1,3,5\" or \"1-3,5\"): ",
            )?
            .into_iter()
            .map(|i| &candidates[i])
            .collect(),
    };

    if chosen.is_empty() {
        writeln!(prompter.output(), "No files selected.")?;
        return Ok(());
    }

    let artifacts: Vec<&BackupArtifact> = chosen.iter().map(|(_, a)| *a).collect();
    let names: Vec<String> = chosen.iter().map(|(db, a)| label(db, a)).collect();

    if !args.yes && !prompter.confirm_removal(&names)? {
        writeln!(prompter.output(), "Operation cancelled.")?;
        return Ok(());
    }

    writeln!(prompter.output())?;
    writeln!(prompter.output(), "Removing selected files...")?;
    let report = remove_files(prompter.output(), &artifacts)?;

    writeln!(prompter.output())?;
    writeln!(
        prompter.output(),
        "Operation completed: {} removed, {} failed.",
        report.removed, report.failed
    )?;

    if report.failed > 0 {
        bail!("{} backup file(s) could not be removed", report.failed);
    }
    Ok(())
}

fn label(database: &str, artifact: &BackupArtifact) -> String {
    format!("[{database}] {}", artifact.name)
}

/// Delete every artifact, reporting each one on `out`.  Failures do not stop
/// the remaining deletions.
pub fn remove_files(out: &mut impl Write, artifacts: &[&BackupArtifact]) -> io::Result<RemovalReport> {
    let mut report = RemovalReport::default();

    for artifact in artifacts {
        match fs::remove_file(&artifact.path) {
            Ok(()) => {
                report.removed += 1;
                status_line(out, true, &format!("Removed: {}", artifact.name))?;
            },
            Err(e) => {
                debug!(path = %artifact.path.display(), error = %e, "remove failed");
                report.failed += 1;
                status_line(out, false, &format!("Failed to remove: {} ({e})", artifact.name))?;
            },
        }
    }

    Ok(report)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
