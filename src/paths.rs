//! Path expansion for user-supplied locations.
//!
//! Configured paths may contain `$VAR` / `${VAR}` references and a leading
//! `~`.  Variables are substituted first, then a leading `~` is replaced by
//! the home directory, so a variable whose value starts with `~` is expanded
//! too.
//!
//! Expansion never fails.  A variable that is unset (or set to the empty
//! string) is left in the output verbatim, e.g. `$NOPE/bak` stays
//! `$NOPE/bak`.

use std::path::Path;

/// Expand `raw` against the process environment and the current user's home
/// directory.
pub fn expand(raw: &str) -> String {
    let home = dirs::home_dir();
    expand_with(raw, home.as_deref(), |name| {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    })
}

/// Expand `raw` using an explicit home directory and variable lookup.
///
/// `lookup` returning `None` keeps the original `$NAME` / `${NAME}` token.
/// With `home` set to `None` a leading `~` is kept as-is.
pub fn expand_with<F>(raw: &str, home: Option<&Path>, lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let substituted = shellexpand::env_with_context_no_errors(raw, lookup);

    if let (Some(home), Some(rest)) = (home, substituted.strip_prefix('~')) {
        return format!("{}{rest}", home.display());
    }
    substituted.into_owned()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
