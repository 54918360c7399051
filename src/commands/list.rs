//! `pg_br ls` — show what is in the backup directory.
//!
//! The default view groups backups by database (one subdirectory each),
//! databases in name order and backups newest first.  `--flat` shows the
//! `.dump` files lying directly in the destination instead.

use std::io::{self, Write};

use anyhow::Result;
use console::style;

use crate::{
    registry::{BackupArtifact, Registry},
    ui::{format_size, format_time},
};

/// Width of the rule printed between databases.
const RULE_WIDTH: usize = 50;

// ─── Entry point ──────────────────────────────────────────────────────────────

pub fn run(registry: &Registry, flat: bool) -> Result<()> {
    let stdout = io::stdout();
    render(&mut stdout.lock(), registry, flat)
}

/// Write the listing for `registry` to `out`.
pub fn render(out: &mut impl Write, registry: &Registry, flat: bool) -> Result<()> {
    writeln!(out, "Listing backups from: {}", registry.root().display())?;
    writeln!(out)?;

    if !registry.root().exists() {
        writeln!(out, "No backup directory found.")?;
        return Ok(());
    }

    if flat {
        render_flat(out, registry)
    } else {
        render_grouped(out, registry)
    }
}

// ─── Views ────────────────────────────────────────────────────────────────────

fn render_flat(out: &mut impl Write, registry: &Registry) -> Result<()> {
    let artifacts = registry.list_flat()?;
    if artifacts.is_empty() {
        writeln!(out, "No backup files found.")?;
        return Ok(());
    }

    writeln!(out, "Found {} backup(s):", artifacts.len())?;
    writeln!(out)?;
    write_artifacts(out, &artifacts)
}

fn render_grouped(out: &mut impl Write, registry: &Registry) -> Result<()> {
    let groups = registry.list_grouped()?;
    if groups.is_empty() {
        writeln!(out, "No backup files found.")?;
        return Ok(());
    }

    let total: usize = groups.values().map(Vec::len).sum();
    writeln!(
        out,
        "Found {total} backup(s) across {} database(s):",
        groups.len()
    )?;
    writeln!(out)?;

    for (i, (database, artifacts)) in groups.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
            writeln!(out, "{}", style("─".repeat(RULE_WIDTH)).dim())?;
            writeln!(out)?;
        }
        let count = artifacts.len();
        writeln!(
            out,
            "Database: {} ({count} backup{})",
            style(database).cyan().bold(),
            if count == 1 { "" } else { "s" }
        )?;
        writeln!(out)?;
        write_artifacts(out, artifacts)?;
    }

    Ok(())
}

fn write_artifacts(out: &mut impl Write, artifacts: &[BackupArtifact]) -> Result<()> {
    for (i, artifact) in artifacts.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "   {}", style(artifact.display_name()).bold())?;
        writeln!(out, "      Size: {}", format_size(artifact.size))?;
        writeln!(out, "      Created: {}", format_time(artifact.created))?;
        if artifact.modified != artifact.created {
            writeln!(out, "      Modified: {}", format_time(artifact.modified))?;
        }
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
