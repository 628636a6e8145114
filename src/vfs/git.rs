//! Remote template fetching over git.
//!
//! Clones the default branch of a repository (shallow) into a scratch
//! directory and loads the checkout into a [`MemoryTree`]. The scratch
//! directory is removed before returning, so the engine only ever sees the
//! in-memory view. Nothing is cached across calls.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{RejigError, Result};
use crate::vfs::{MemoryTree, Vfs};

/// Clone `url` and return an in-memory view of its work tree.
///
/// Transport and authentication failures surface as [`RejigError::Fetch`]
/// carrying the source URL. Failures while reading the cloned content back
/// off disk surface as plain I/O errors instead, so callers can tell a bad
/// network from a bad checkout.
pub fn clone_to_memory(url: &str) -> Result<Vfs> {
    let scratch = tempfile::tempdir()?;
    let dest = scratch.path().join("checkout");

    debug!(url, "cloning remote template source");
    run_clone(url, &dest)?;

    let tree = MemoryTree::from_disk(&dest)?;
    Ok(Vfs::Memory(tree))
}

fn run_clone(url: &str, dest: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["clone", "--depth", "1"])
        .arg(url)
        .arg(dest)
        .output()
        .map_err(|e| RejigError::Fetch {
            source_url: url.to_string(),
            message: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        return Err(RejigError::Fetch {
            source_url: url.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
