//! `~` expansion for configured paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory, returning a new path.
pub fn expand_tilde_path(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Expand a leading `~` in place.
pub fn expand_tilde(path: &mut PathBuf) {
    *path = expand_tilde_path(path);
}
