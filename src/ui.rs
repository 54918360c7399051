//! Terminal UI — spinners, status lines, and captured tool output.
//!
//! While `pg_dump` / `pg_restore` run the operator sees a spinner and a short
//! label; the tool's own output is captured and only replayed when it fails,
//! so a clean run stays a single line.
//!
//! Rendering helpers that are worth testing take a `&mut impl Write` instead
//! of printing directly.

use std::{
    io::{self, Write},
    process::{Command, Output, Stdio},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames — same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}

fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}

// ─── Stage result ─────────────────────────────────────────────────────────────

/// The outcome of one external tool run.
#[derive(Debug)]
pub struct StageOutcome {
    /// Human-readable label, e.g. `"pg_dump shop"`.
    pub label: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Why the stage failed, if it did.
    pub error: Option<String>,
}

impl StageOutcome {
    /// Print the ✓/✗ line; on failure also replay the captured output.
    pub fn print(&self) {
        if self.success {
            println!("  {}  {}", icon_ok(), style(&self.label).bold());
            return;
        }

        println!("  {}  {}", icon_err(), style(&self.label).bold());
        if let Some(ref msg) = self.error {
            eprintln!();
            eprintln!("  {} {}", style("Error:").red().bold(), msg);
        }
        for (name, text) in [("stdout", &self.stdout), ("stderr", &self.stderr)] {
            if text.is_empty() {
                continue;
            }
            eprintln!();
            eprintln!("  {} {name}:", style("►").dim());
            for line in text.lines() {
                eprintln!("    {line}");
            }
        }
    }

    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::with_template("  {spinner:.cyan}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    pb.set_style(spinner_style);
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Captured execution ───────────────────────────────────────────────────────

/// Run `args[0]` with the remaining arguments, capturing stdout and stderr.
///
/// Returns `(success, stdout_text, stderr_text)`.
pub fn run_captured(args: &[String]) -> Result<(bool, String, String)> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let output: Output = Command::new(prog)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    Ok((
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    ))
}

/// Run `args` behind a spinner labelled `label`.
pub fn run_stage(label: &str, args: &[String]) -> StageOutcome {
    let spinner = make_spinner(label);
    let result = run_captured(args);
    spinner.finish_and_clear();

    let (success, stdout, stderr, error) = match result {
        Ok((true, out, err)) => (true, out, err, None),
        Ok((false, out, err)) => (
            false,
            out,
            err,
            Some(format!("command exited non-zero: {}", args.join(" "))),
        ),
        Err(e) => (false, String::new(), String::new(), Some(format!("{e:#}"))),
    };

    StageOutcome {
        label: label.to_string(),
        success,
        stdout,
        stderr,
        error,
    }
}

// ─── Status lines ─────────────────────────────────────────────────────────────

/// Write a `✓ message` or `✗ message` line.
pub fn status_line(out: &mut impl Write, success: bool, message: &str) -> io::Result<()> {
    let icon = if success { icon_ok() } else { icon_err() };
    writeln!(out, "{icon} {message}")
}

// ─── Formatting ───────────────────────────────────────────────────────────────

/// Size in megabytes with two decimals, e.g. `"1.50 MB"`.
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let mb = bytes as f64 / (1024.0 * 1024.0);
    format!("{mb:.2} MB")
}

/// Local date and time, e.g. `"2024-03-01 14:05:09"`.
pub fn format_time(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
