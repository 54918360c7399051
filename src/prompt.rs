//! Blocking operator prompts.
//!
//! One question is outstanding at a time: the prompt is written, flushed,
//! and a single line is read back.  [`Prompter`] is generic over its reader
//! and writer so the interactive flows can be driven from tests with an
//! in-memory script.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::selection;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter reading from stdin and writing to stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The sink prompts are written to; commands print their report here too.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask `question` and return the trimmed answer.
    ///
    /// Fails when the input is closed before a line arrives.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("reading answer")?;
        if read == 0 {
            bail!("no answer given (input closed)");
        }
        Ok(line.trim().to_string())
    }

    /// Print `labels` as a numbered list under `heading`.
    pub fn show_list(&mut self, heading: &str, labels: &[String]) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{heading}")?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.output, "  {}. {label}", i + 1)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Show `labels` and let the operator pick exactly one.
    ///
    /// Returns the 0-based position in `labels`.
    pub fn select_one(&mut self, heading: &str, labels: &[String], question: &str) -> Result<usize> {
        self.show_list(heading, labels)?;
        let answer = self.ask(question)?;
        Ok(selection::parse_single(&answer, labels.len())? - 1)
    }

    /// Show `labels` and let the operator pick any number of them with a
    /// selector such as `1,3` or `1-3,5`.
    ///
    /// Returns 0-based positions in selection order.
    pub fn select_many(&mut self, heading: &str, labels: &[String], question: &str) -> Result<Vec<usize>> {
        self.show_list(heading, labels)?;
        let answer = self.ask(question)?;
        Ok(selection::parse(&answer, labels.len())?
            .into_iter()
            .map(|i| i - 1)
            .collect())
    }

    /// List what is about to be deleted and require the literal answer `yes`.
    pub fn confirm_removal(&mut self, names: &[String]) -> Result<bool> {
        writeln!(self.output)?;
        writeln!(self.output, "Files to be removed:")?;
        for name in names {
            writeln!(self.output, "  - {name}")?;
        }
        writeln!(self.output)?;

        let answer = self.ask("Are you sure you want to remove these files? (yes/no): ")?;
        Ok(answer.eq_ignore_ascii_case("yes"))
    }

    /// Ask before replacing an existing backup.  An empty answer means yes.
    pub fn confirm_overwrite(&mut self, file_name: &str) -> Result<bool> {
        let answer =
            self.ask(&format!("Backup file '{file_name}' already exists. Overwrite? (Y/n): "))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "" | "y" | "yes"))
    }

    /// Ask for a backup name, offering `default` for an empty answer.
    pub fn backup_name(&mut self, default: &str) -> Result<String> {
        let answer = self.ask(&format!("Backup name [{default}]: "))?;
        Ok(if answer.is_empty() { default.to_string() } else { answer })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
