//! Operator selection strings: `"2"`, `"1,3,5"`, `"1-3,5"`.
//!
//! Indices are 1-based and refer to the list exactly as it was last shown to
//! the operator.  Parsing is all-or-nothing: one bad token rejects the whole
//! input, so a typo can never delete a partial selection.

use std::collections::HashSet;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A single number outside `1..=count`.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A `start-end` pair that is reversed or leaves `1..=count`.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A token that is neither a number nor a `start-end` pair.
    #[error(
        "Invalid selection format: {0:?}. Use numbers separated by commas (e.g. \"1,3,5\") \
         or ranges (e.g. \"1-3,5\")."
    )]
    Format(String),

    /// Input for a single-item prompt that is not one valid number.
    #[error("Invalid selection. Please enter a valid number.")]
    NotANumber,
}

/// Parse `input` against the index space `1..=count`.
///
/// Returns the selected indices in the order given, duplicates removed.
/// Blank input selects nothing.
pub fn parse(input: &str, count: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut picked = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |i: usize| {
        if seen.insert(i) {
            picked.push(i);
        }
    };

    for token in input.split(',').map(str::trim) {
        if let Some((start, end)) = token.split_once('-') {
            let (Some(start), Some(end)) = (as_index(start.trim()), as_index(end.trim())) else {
                return Err(SelectionError::Format(token.to_string()));
            };
            if start < 1 || start > end || end > count {
                return Err(SelectionError::InvalidRange(token.to_string()));
            }
            (start..=end).for_each(&mut push);
        } else {
            let Some(n) = as_index(token) else {
                return Err(SelectionError::Format(token.to_string()));
            };
            if !(1..=count).contains(&n) {
                return Err(SelectionError::InvalidSelection(token.to_string()));
            }
            push(n);
        }
    }

    Ok(picked)
}

/// Parse a prompt answer that must name exactly one item of `1..=count`.
pub fn parse_single(input: &str, count: usize) -> Result<usize, SelectionError> {
    as_index(input.trim())
        .filter(|n| (1..=count).contains(n))
        .ok_or(SelectionError::NotANumber)
}

/// Resolve `input` to the matching `candidates`, in selection order.
pub fn pick<'a, T>(input: &str, candidates: &'a [T]) -> Result<Vec<&'a T>, SelectionError> {
    Ok(parse(input, candidates.len())?
        .into_iter()
        .map(|i| &candidates[i - 1])
        .collect())
}

/// A run of ASCII digits as a number.  Values too large for `usize` saturate,
/// which keeps them numeric but out of any real range.
fn as_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(usize::MAX))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
