use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` to the current user's home directory.
///
/// Both `~/` and the Windows-style `~\` prefixes are recognized. When the home
/// directory cannot be determined the path is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let Some(home) = home_dir() else {
        return PathBuf::from(trimmed);
    };
    if trimmed == "~" {
        return home;
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(trimmed),
    }
}
