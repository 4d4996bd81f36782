pub(crate) mod cofactors;
pub(crate) mod disulfide;
pub(crate) mod gpr;
pub(crate) mod ros;
pub(crate) mod summary;

use std::path::{Path, PathBuf};
use tracing::error;

/// Canonical path of an input, logging the failure when it does not exist.
pub(crate) fn resolve_input(path: &Path) -> Option<PathBuf> {
    match path.canonicalize() {
        Ok(path) => Some(path),
        Err(e) => {
            error!("Failed to retrieve input {}: {e}", path.display());
            None
        }
    }
}
